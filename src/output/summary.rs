use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::columns::FORMAT_VERSION;
use crate::analysis::{regulation_counts, AnalysisConfig, RegulationCounts};
use crate::export::RunNaming;
use crate::pipeline::ReportTables;
use crate::reconcile::Mismatches;

/// Run overview written next to the tables as `summary.json`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Output format version
    pub format_version: String,
    /// When the summary was produced
    pub generated_at: DateTime<Utc>,
    /// Source export
    pub source: String,
    /// Run naming the columns were stripped with
    pub naming: RunNaming,
    /// Thresholds behind the regulation counts
    pub analysis: AnalysisConfig,
    /// Proteins in the export
    pub proteins: usize,
    /// Samples in the sample-level table
    pub samples: Vec<String>,
    /// Groups declared in the metadata
    pub groups: Vec<String>,
    /// Comparison identifiers
    pub comparisons: Vec<String>,
    /// Row count of the sample-level table
    pub sample_rows: usize,
    /// Row count of the group-level table
    pub group_rows: usize,
    /// Row count of the comparison table
    pub comparison_rows: usize,
    /// Sample rows removed by the `drop` policy
    pub dropped_rows: usize,
    /// Up/down/unchanged per comparison
    pub regulation: BTreeMap<String, RegulationCounts>,
    /// Cross-block mismatches
    pub mismatches: Mismatches,
    /// Mismatches as messages
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Summarize a pipeline run
    pub fn new(
        tables: &ReportTables,
        naming: &RunNaming,
        source: impl Into<String>,
        analysis: &AnalysisConfig,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            generated_at: Utc::now(),
            source: source.into(),
            naming: naming.clone(),
            analysis: *analysis,
            proteins: tables.protein_count,
            samples: tables.samples.samples().into_iter().map(str::to_string).collect(),
            groups: tables.metadata.groups().into_iter().map(str::to_string).collect(),
            comparisons: tables
                .comparisons
                .comparisons()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            sample_rows: tables.samples.len(),
            group_rows: tables.groups.len(),
            comparison_rows: tables.comparisons.len(),
            dropped_rows: tables.dropped_rows,
            regulation: regulation_counts(&tables.comparisons, analysis),
            mismatches: tables.mismatches.clone(),
            warnings: tables.mismatches.warnings(),
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
