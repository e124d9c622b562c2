//! # Cross-Block Reconciliation
//!
//! The assembly steps join blocks by identifier, and an identifier missing
//! from one side turns into a null rather than an error. This module lists
//! every such mismatch up front so it can be reported instead of silently
//! corrupting downstream plots.
//!
//! ```rust,no_run
//! use perseus_report::export::{ColumnConventions, ExportLayout, RawExport, RunNaming};
//! use perseus_report::metadata::build_metadata;
//! use perseus_report::reconcile::{find_mismatches, UnmatchedSamplePolicy};
//!
//! let raw = RawExport::from_tsv_file("perseus_export.txt")?;
//! let layout = ExportLayout::describe(
//!     raw.header(),
//!     &ColumnConventions::default(),
//!     &RunNaming::new("jdoe", "23_001"),
//! )?;
//! let metadata = build_metadata(&raw)?;
//! let mismatches = find_mismatches(&layout, &metadata);
//! println!("{}", mismatches.to_report("perseus_export.txt", UnmatchedSamplePolicy::Retain));
//! # Ok::<(), perseus_report::PipelineError>(())
//! ```

mod report;


use serde::{Deserialize, Serialize};

pub use report::{CheckStatus, ReconciliationCheck, ReconciliationReport};

use crate::export::{BlockKind, ExportLayout};
use crate::metadata::SampleMetadata;

/// What to do with abundance samples that have no metadata entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedSamplePolicy {
    /// Keep their rows with no group and report a warning
    #[default]
    Retain,
    /// Remove their rows and report a warning
    Drop,
    /// Abort the run
    Reject,
}

/// Identifiers present in one block but absent from another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mismatches {
    /// Abundance samples missing from metadata; the unmatched-sample policy applies to these
    pub samples_without_metadata: Vec<String>,
    /// Metadata samples with no abundance column
    pub metadata_without_abundance: Vec<String>,
    /// Abundance samples with no peptide-count column
    pub abundance_without_peptides: Vec<String>,
    /// Peptide-count samples with no abundance column
    pub peptides_without_abundance: Vec<String>,
    /// Group-median groups no sample belongs to
    pub medians_without_samples: Vec<String>,
    /// Sample groups with no group-median column
    pub groups_without_median: Vec<String>,
    /// Comparisons naming a group no sample belongs to
    pub comparisons_with_unknown_groups: Vec<String>,
    /// Comparisons with a p-value column but no difference column, or vice versa
    pub unpaired_comparisons: Vec<String>,
}

impl Mismatches {
    /// Whether every identifier lines up
    pub fn is_clean(&self) -> bool {
        self.findings().iter().all(|(_, values)| values.is_empty())
    }

    fn findings(&self) -> [(&'static str, &Vec<String>); 8] {
        [
            ("Abundance samples have metadata", &self.samples_without_metadata),
            ("Metadata samples have abundance columns", &self.metadata_without_abundance),
            ("Abundance samples have peptide counts", &self.abundance_without_peptides),
            ("Peptide-count samples have abundance columns", &self.peptides_without_abundance),
            ("Group medians match sample groups", &self.medians_without_samples),
            ("Sample groups have group medians", &self.groups_without_median),
            ("Comparisons refer to known groups", &self.comparisons_with_unknown_groups),
            ("Comparisons have both p-value and difference", &self.unpaired_comparisons),
        ]
    }

    /// One human-readable message per non-empty finding
    pub fn warnings(&self) -> Vec<String> {
        self.findings()
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, values)| format!("{}: mismatch for {}", name, values.join(", ")))
            .collect()
    }

    /// Render the findings as a report, applying `policy` to unmatched samples
    pub fn to_report(
        &self,
        source: impl Into<String>,
        policy: UnmatchedSamplePolicy,
    ) -> ReconciliationReport {
        let mut report = ReconciliationReport::new(source);
        for (index, (name, values)) in self.findings().iter().enumerate() {
            let check = if values.is_empty() {
                ReconciliationCheck::ok(*name)
            } else {
                let listed = values.join(", ");
                match (index, policy) {
                    (0, UnmatchedSamplePolicy::Reject) => {
                        ReconciliationCheck::failed(*name, format!("rejected: {listed}"))
                    }
                    (0, UnmatchedSamplePolicy::Drop) => {
                        ReconciliationCheck::warning(*name, format!("rows dropped for {listed}"))
                    }
                    (0, UnmatchedSamplePolicy::Retain) => ReconciliationCheck::warning(
                        *name,
                        format!("rows kept without group for {listed}"),
                    ),
                    _ => ReconciliationCheck::warning(*name, listed),
                }
            };
            report.add_check(check);
        }
        report
    }
}

/// Compare identifiers across every block of the layout and the metadata
pub fn find_mismatches(layout: &ExportLayout, metadata: &SampleMetadata) -> Mismatches {
    let abundance = layout.keys(BlockKind::Abundance);
    let peptides = layout.keys(BlockKind::PeptideCount);
    let medians = layout.keys(BlockKind::GroupMedian);
    let groups = metadata.groups();
    let p_values: Vec<String> = layout
        .comparisons(BlockKind::PValue)
        .iter()
        .map(|c| c.to_string())
        .collect();
    let differences: Vec<String> = layout
        .comparisons(BlockKind::Difference)
        .iter()
        .map(|c| c.to_string())
        .collect();

    let mut comparisons_with_unknown_groups = Vec::new();
    for block in [BlockKind::Difference, BlockKind::PValue] {
        for comparison in layout.comparisons(block) {
            let name = comparison.to_string();
            if !comparison.groups_known(|g| metadata.has_group(g))
                && !comparisons_with_unknown_groups.contains(&name)
            {
                comparisons_with_unknown_groups.push(name);
            }
        }
    }

    Mismatches {
        samples_without_metadata: missing_from(&abundance, |s| metadata.contains(s)),
        metadata_without_abundance: missing_from(&metadata.samples().collect::<Vec<_>>(), |s| {
            abundance.contains(&s)
        }),
        abundance_without_peptides: missing_from(&abundance, |s| peptides.contains(&s)),
        peptides_without_abundance: missing_from(&peptides, |s| abundance.contains(&s)),
        medians_without_samples: missing_from(&medians, |g| groups.contains(&g)),
        groups_without_median: missing_from(&groups, |g| medians.contains(&g)),
        comparisons_with_unknown_groups,
        unpaired_comparisons: p_values
            .iter()
            .filter(|c| !differences.contains(*c))
            .chain(differences.iter().filter(|c| !p_values.contains(*c)))
            .cloned()
            .collect(),
    }
}

fn missing_from<F: Fn(&str) -> bool>(values: &[&str], present: F) -> Vec<String> {
    values
        .iter()
        .filter(|v| !present(**v))
        .map(|v| v.to_string())
        .collect()
}
