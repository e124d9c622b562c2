//! # Sample Metadata
//!
//! Maps every sample of the export to the experimental group it belongs to,
//! using the `#!{Sample}` and `#!{Group}` annotation rows.
//!
//! Raw sample labels follow `<researcher>_<sample>_<suffix>`; only the second
//! underscore-delimited segment is kept. Group labels have `-` replaced by `_`
//! so they stay usable as column names downstream.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::export::{normalize_group, RawExport, GROUP_TAG, SAMPLE_TAG, TOKEN_DELIMITER};

/// One sample → group assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleEntry {
    /// Bare sample identifier
    pub sample: String,
    /// Normalized group identifier
    pub group: String,
    /// Label as written in the export
    pub raw_label: String,
}

/// Immutable sample → group mapping, in export column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleMetadata {
    entries: Vec<SampleEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SampleMetadata {
    /// Build a mapping from `(raw_label, group_label)` pairs
    pub fn from_labels<'a, I>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut metadata = Self::default();
        for (raw_label, group_label) in labels {
            let sample = sample_from_label(raw_label)?;
            let group = normalize_group(group_label);
            if group.is_empty() {
                return Err(PipelineError::MalformedInput(format!(
                    "sample label '{raw_label}' has no group"
                )));
            }
            metadata.insert(SampleEntry {
                sample,
                group,
                raw_label: raw_label.to_string(),
            })?;
        }
        Ok(metadata)
    }

    fn insert(&mut self, entry: SampleEntry) -> Result<()> {
        if let Some(&existing) = self.index.get(&entry.sample) {
            let first = &self.entries[existing];
            if first.group != entry.group {
                return Err(PipelineError::ConflictingGroup {
                    sample: entry.sample,
                    first: first.group.clone(),
                    second: entry.group,
                });
            }
            return Ok(());
        }
        self.index.insert(entry.sample.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Group of `sample`, if the sample is known
    pub fn group_of(&self, sample: &str) -> Option<&str> {
        self.index
            .get(sample)
            .map(|&i| self.entries[i].group.as_str())
    }

    /// Whether `sample` has an entry
    pub fn contains(&self, sample: &str) -> bool {
        self.index.contains_key(sample)
    }

    /// Whether any sample belongs to `group`
    pub fn has_group(&self, group: &str) -> bool {
        self.entries.iter().any(|e| e.group == group)
    }

    /// Entries in export order
    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    /// Sample identifiers in export order
    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.sample.as_str())
    }

    /// Distinct groups in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !groups.contains(&entry.group.as_str()) {
                groups.push(&entry.group);
            }
        }
        groups
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the sample → group mapping from the export's annotation rows.
///
/// Columns whose sample-label cell is blank carry no metadata and are
/// skipped; that is how a sample ends up unmatched downstream.
pub fn build_metadata(raw: &RawExport) -> Result<SampleMetadata> {
    let samples = raw.annotation_row(SAMPLE_TAG).ok_or_else(|| {
        PipelineError::MalformedInput("export has no '#!{Sample}' annotation row".to_string())
    })?;
    let groups = raw.annotation_row(GROUP_TAG).ok_or_else(|| {
        PipelineError::MalformedInput("export has no '#!{Group}' annotation row".to_string())
    })?;

    let labels = samples
        .cells
        .iter()
        .zip(&groups.cells)
        .map(|(sample, group)| (sample.trim(), group.trim()))
        .filter(|(sample, _)| !sample.is_empty());

    let metadata = SampleMetadata::from_labels(labels)?;
    debug!(
        "Sample metadata: {} samples in {} groups",
        metadata.len(),
        metadata.groups().len()
    );
    Ok(metadata)
}

/// Keep the text between the first and second `_` of a raw label
fn sample_from_label(label: &str) -> Result<String> {
    let mut segments = label.split(TOKEN_DELIMITER);
    let _researcher = segments.next();
    match segments.next() {
        Some(sample) if !sample.is_empty() => Ok(sample.to_string()),
        _ => Err(PipelineError::MalformedInput(format!(
            "sample label '{label}' is not of the form <researcher>_<sample>_..."
        ))),
    }
}
