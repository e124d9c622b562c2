//! # Perseus Export Ingestion
//!
//! Reads the tab-separated matrix exported by Perseus and describes its
//! columns once, up front.
//!
//! ## File shape
//!
//! ```text
//! Protein IDs  Gene names  jdoe_s1_23_001  number_peptides_jdoe_s1_23_001  GroupA  p value GroupA/GroupB ...
//! #!{Sample}   ...         jdoe_s1_R1
//! #!{Group}    ...         GroupA
//! P12345       ACTB        10.0            12                              10.0    0.01
//! ```
//!
//! Annotation rows start with `#!{Tag}`; the remainder of their first cell is
//! the value of the first column. Tags are case-insensitive and may carry the
//! Perseus categorical prefix `C:`.
//!
//! ## Column identification
//!
//! [`ExportLayout::describe`] classifies every column by name (see
//! [`ColumnConventions`]) and strips the run qualifiers (see
//! [`strip_run_qualifiers`]) so that sample, group and comparison identifiers
//! match across blocks.

mod conventions;
mod layout;
mod naming;

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub use conventions::ColumnConventions;
pub use layout::{AnnotationField, BlockKind, ColumnDescriptor, ColumnKind, ExportLayout};
pub use naming::{
    normalize_group, strip_run_qualifiers, Comparison, QualifierPolicy, RunNaming,
    TOKEN_DELIMITER,
};

use crate::error::{PipelineError, Result};

/// Annotation-row tag holding raw sample labels
pub const SAMPLE_TAG: &str = "sample";

/// Annotation-row tag holding group labels
pub const GROUP_TAG: &str = "group";

const ANNOTATION_MARKER: &str = "#!{";
const CATEGORICAL_PREFIX: &str = "c:";
const MISSING_MARKERS: [&str; 5] = ["", "NaN", "nan", "NA", "#N/A"];

/// A `#!{Tag}` row of per-column annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    /// Tag as written in the export (e.g. `C:Group`)
    pub tag: String,
    /// One cell per header column
    pub cells: Vec<String>,
}

impl AnnotationRow {
    /// Tag lowercased and stripped of the categorical `C:` prefix
    pub fn normalized_tag(&self) -> String {
        let tag = self.tag.trim().to_lowercase();
        match tag.strip_prefix(CATEGORICAL_PREFIX) {
            Some(stripped) => stripped.to_string(),
            None => tag,
        }
    }
}

/// Raw Perseus export: header, annotation rows and protein rows as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExport {
    header: Vec<String>,
    annotation_rows: Vec<AnnotationRow>,
    rows: Vec<Vec<String>>,
}

impl RawExport {
    /// Assemble an export from already-split cells.
    ///
    /// Rows shorter than the header are padded with empty cells; longer rows
    /// are truncated.
    pub fn from_parts(
        header: Vec<String>,
        annotation_rows: Vec<AnnotationRow>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        let width = header.len();
        let fit = |mut cells: Vec<String>| {
            cells.resize(width, String::new());
            cells
        };
        Self {
            annotation_rows: annotation_rows
                .into_iter()
                .map(|row| AnnotationRow {
                    tag: row.tag,
                    cells: fit(row.cells),
                })
                .collect(),
            rows: rows.into_iter().map(fit).collect(),
            header,
        }
    }

    /// Parse an export from a TSV file
    pub fn from_tsv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse an export from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        // Perseus never quotes fields, and protein names may contain '"'
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(true)
            .quoting(false)
            .from_reader(reader);

        let header: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if header.iter().all(String::is_empty) {
            return Err(PipelineError::MalformedInput(
                "export has an empty header line".to_string(),
            ));
        }

        let mut annotation_rows = Vec::new();
        let mut rows = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();

            let annotation = cells
                .first()
                .and_then(|first| split_annotation_marker(first));
            match annotation {
                Some((tag, first_value)) => {
                    if let Some(first) = cells.first_mut() {
                        *first = first_value;
                    }
                    annotation_rows.push(AnnotationRow { tag, cells });
                }
                None => {
                    if cells.iter().all(|c| c.trim().is_empty()) {
                        continue;
                    }
                    rows.push(cells);
                }
            }
        }

        Ok(Self::from_parts(header, annotation_rows, rows))
    }

    /// Column names in header order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// All annotation rows in file order
    pub fn annotation_rows(&self) -> &[AnnotationRow] {
        &self.annotation_rows
    }

    /// First annotation row whose normalized tag equals `tag` (case-insensitive)
    pub fn annotation_row(&self, tag: &str) -> Option<&AnnotationRow> {
        let tag = tag.to_lowercase();
        self.annotation_rows
            .iter()
            .find(|row| row.normalized_tag() == tag)
    }

    /// Number of protein rows
    pub fn protein_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of header columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Raw text of one body cell, trimmed
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(|c| c.trim())
            .unwrap_or("")
    }

    /// Numeric value of one body cell; missing markers become `None`
    pub fn numeric(&self, row: usize, column: usize) -> Result<Option<f64>> {
        let raw = self.cell(row, column);
        parse_numeric(raw).ok_or_else(|| PipelineError::InvalidValue {
            row: row + 1,
            column: self.header.get(column).cloned().unwrap_or_default(),
            value: raw.to_string(),
        })
    }
}

/// Parse a numeric cell. The outer `None` means unparseable text.
///
/// Infinities are read as missing, like `NaN`.
pub(crate) fn parse_numeric(raw: &str) -> Option<Option<f64>> {
    let raw = raw.trim();
    if MISSING_MARKERS.contains(&raw) {
        return Some(None);
    }
    let value: f64 = raw.parse().ok()?;
    Some(value.is_finite().then_some(value))
}

/// Split `#!{Tag}value` into `("Tag", "value")`
fn split_annotation_marker(cell: &str) -> Option<(String, String)> {
    let rest = cell.trim_start().strip_prefix(ANNOTATION_MARKER)?;
    let end = rest.find('}')?;
    Some((rest[..end].to_string(), rest[end + 1..].to_string()))
}
