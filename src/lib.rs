//! # perseus-report - Perseus Export Reconciliation
//!
//! `perseus_report` turns a wide Perseus proteomics export into the
//! analysis-ready long tables a QC report is plotted from.
//!
//! A Perseus export packs several kinds of columns side by side in one
//! table: protein annotations, per-sample abundances, per-sample peptide
//! counts, per-group medians and per-comparison t-test statistics. Sample
//! columns are named after the run (`<researcher>_<sample>_<work_order>`),
//! and the sample → group design travels as `#!{Sample}` / `#!{Group}`
//! annotation rows above the protein rows.
//!
//! ## Key Features
//!
//! - **Column classification**: every header is assigned to an annotation,
//!   a measurement block, or ignored, using configurable name conventions.
//!
//! - **Identifier recovery**: run qualifiers are stripped so that the same
//!   sample or group carries the same identifier in every block.
//!
//! - **Reconciliation**: identifiers that do not line up across blocks are
//!   reported instead of silently producing null-filled rows.
//!
//! - **Long tables**: protein × sample, protein × group and protein ×
//!   comparison tables, written as TSV and/or ZSTD-compressed Parquet.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perseus_report::prelude::*;
//!
//! let naming = RunNaming::new("jdoe", "23_001");
//! let pipeline = Pipeline::new(naming.clone(), PipelineConfig::default());
//! let tables = pipeline.run_file("proteinGroups_perseus.txt")?;
//!
//! println!(
//!     "{} sample rows, {} comparison rows",
//!     tables.samples.len(),
//!     tables.comparisons.len()
//! );
//!
//! let writer = ReportWriter::new(
//!     "report",
//!     OutputConfig::default(),
//!     naming,
//!     "proteinGroups_perseus.txt",
//! );
//! writer.write(&tables, &pipeline.config().analysis)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`export`]: parsed export, column conventions, layout and identifier recovery
//! - [`metadata`]: sample → group mapping from the annotation rows
//! - [`tables`]: wide-to-long reshaping and table assembly
//! - [`reconcile`]: cross-block mismatch detection and reporting
//! - [`analysis`]: regulation calls, coefficients of variation, correlation
//! - [`pipeline`]: the end-to-end facade
//! - [`output`]: TSV, Parquet and JSON writers

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod error;
pub mod export;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod reconcile;
pub mod tables;

pub use error::{PipelineError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{
        classify, coefficient_of_variation, regulation_counts, sample_correlation,
        AnalysisConfig, CorrelationMatrix, Regulation, RegulationCounts, VariationTable,
    };
    pub use crate::error::{PipelineError, Result};
    pub use crate::export::{
        normalize_group, strip_run_qualifiers, BlockKind, ColumnConventions, Comparison,
        ExportLayout, RawExport, RunNaming,
    };
    pub use crate::metadata::{build_metadata, SampleMetadata};
    pub use crate::output::{OutputConfig, OutputFormat, ReportWriter, RunSummary, TableWriterError};
    pub use crate::pipeline::{Pipeline, PipelineConfig, ReconciliationConfig, ReportTables};
    pub use crate::reconcile::{
        find_mismatches, Mismatches, ReconciliationReport, UnmatchedSamplePolicy,
    };
    pub use crate::tables::{
        assemble_comparisons, assemble_group_level, assemble_sample_level, reshape_long,
        ComparisonTable, GroupLevelTable, SampleLevelTable, WideBlock,
    };
}
