//! Error taxonomy for the reconciliation pipeline.
//!
//! Every variant is fatal: a run that hits one of these produces no tables.
//! Recoverable identifier mismatches are reported through
//! [`crate::reconcile::Mismatches`] instead.

use crate::export::BlockKind;

/// Errors that can occur while turning a Perseus export into report tables
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// I/O error reading the export
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// TSV parsing error
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// The export does not have the expected naming or header structure
    #[error("Malformed export: {0}")]
    MalformedInput(String),

    /// Two columns of one block collapse to the same identifier
    #[error("Ambiguous {block} identifier '{key}': columns '{first}' and '{second}' both map to it")]
    AmbiguousKey {
        /// Measurement block the collision happened in
        block: BlockKind,
        /// Identifier both columns reduce to
        key: String,
        /// First raw column name
        first: String,
        /// Second raw column name
        second: String,
    },

    /// Two raw sample labels resolve to one sample with different groups
    #[error("Sample '{sample}' is assigned to both group '{first}' and group '{second}'")]
    ConflictingGroup {
        /// Sample identifier
        sample: String,
        /// Group seen first
        first: String,
        /// Conflicting group
        second: String,
    },

    /// A numeric cell holds text that is neither a number nor a missing marker
    #[error("Invalid numeric value '{value}' in column '{column}' (data row {row})")]
    InvalidValue {
        /// 1-based data row number
        row: usize,
        /// Column name
        column: String,
        /// Offending cell content
        value: String,
    },

    /// Abundance samples with no metadata entry, under the `reject` policy
    #[error("Samples without metadata: {}", .0.join(", "))]
    UnmatchedSamples(Vec<String>),
}

/// Result alias used throughout the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;
