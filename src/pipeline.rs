//! # Report Pipeline
//!
//! Runs the whole reconciliation in one forward pass:
//!
//! 1. describe the export layout (classification, identifier recovery,
//!    collision checks)
//! 2. build the sample metadata
//! 3. find cross-block mismatches and apply the unmatched-sample policy
//! 4. assemble the sample-level, group-level and comparison tables
//!
//! Any error aborts the run; there is no partial output.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::error::{PipelineError, Result};
use crate::export::{BlockKind, ColumnConventions, ExportLayout, RawExport, RunNaming};
use crate::metadata::{build_metadata, SampleMetadata};
use crate::reconcile::{find_mismatches, Mismatches, UnmatchedSamplePolicy};
use crate::tables::{
    assemble_comparisons, assemble_group_level, assemble_sample_level, ComparisonTable,
    GroupLevelTable, SampleLevelTable,
};

/// Reconciliation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Handling of abundance samples without metadata
    pub unmatched_samples: UnmatchedSamplePolicy,
}

/// Everything the pipeline needs besides the run naming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column naming conventions
    pub columns: ColumnConventions,
    /// Reconciliation settings
    pub reconciliation: ReconciliationConfig,
    /// Volcano-plot thresholds
    pub analysis: AnalysisConfig,
}

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct ReportTables {
    /// Column layout of the export
    pub layout: ExportLayout,
    /// Sample → group mapping
    pub metadata: SampleMetadata,
    /// Number of proteins in the export
    pub protein_count: usize,
    /// Protein × sample table
    pub samples: SampleLevelTable,
    /// Protein × group table
    pub groups: GroupLevelTable,
    /// Protein × comparison table
    pub comparisons: ComparisonTable,
    /// Identifiers that did not line up across blocks
    pub mismatches: Mismatches,
    /// Sample rows removed under the `drop` policy
    pub dropped_rows: usize,
}

/// Export-to-tables pipeline for one run
#[derive(Debug, Clone)]
pub struct Pipeline {
    naming: RunNaming,
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline for the given run naming
    pub fn new(naming: RunNaming, config: PipelineConfig) -> Self {
        Self { naming, config }
    }

    /// Run naming parameters
    pub fn naming(&self) -> &RunNaming {
        &self.naming
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse the export at `path` and run the pipeline on it
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<ReportTables> {
        let path = path.as_ref();
        info!("Reading Perseus export {}", path.display());
        let raw = RawExport::from_tsv_file(path)?;
        self.run(&raw)
    }

    /// Describe the export layout under this pipeline's naming and conventions
    pub fn describe(&self, raw: &RawExport) -> Result<ExportLayout> {
        ExportLayout::describe(raw.header(), &self.config.columns, &self.naming)
    }

    /// Run the pipeline on a parsed export
    pub fn run(&self, raw: &RawExport) -> Result<ReportTables> {
        info!(
            "Reconciling export: {} columns, {} proteins",
            raw.column_count(),
            raw.protein_count()
        );

        let layout = self.describe(raw)?;
        for block in BlockKind::ALL {
            debug!("  {}: {} columns", block, layout.block_len(block));
        }

        let metadata = build_metadata(raw)?;
        info!(
            "Metadata: {} samples in {} groups",
            metadata.len(),
            metadata.groups().len()
        );

        let mismatches = find_mismatches(&layout, &metadata);
        for warning in mismatches.warnings() {
            warn!("{}", warning);
        }

        let policy = self.config.reconciliation.unmatched_samples;
        if policy == UnmatchedSamplePolicy::Reject && !mismatches.samples_without_metadata.is_empty()
        {
            return Err(PipelineError::UnmatchedSamples(
                mismatches.samples_without_metadata.clone(),
            ));
        }

        let mut samples = assemble_sample_level(raw, &layout, &metadata)?;
        let mut dropped_rows = 0;
        if policy == UnmatchedSamplePolicy::Drop {
            let (kept, removed) = samples.without_samples(&mismatches.samples_without_metadata);
            if removed > 0 {
                warn!("Dropped {} sample rows without a group", removed);
            }
            samples = kept;
            dropped_rows = removed;
        }

        let groups = assemble_group_level(raw, &layout)?;
        let comparisons = assemble_comparisons(raw, &layout)?;

        info!(
            "Assembled {} sample rows, {} group rows, {} comparison rows",
            samples.len(),
            groups.len(),
            comparisons.len()
        );

        Ok(ReportTables {
            layout,
            metadata,
            protein_count: raw.protein_count(),
            samples,
            groups,
            comparisons,
            mismatches,
            dropped_rows,
        })
    }
}
