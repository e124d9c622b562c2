//! # QC Summaries
//!
//! Small derived tables the report plots are drawn from: volcano-plot
//! regulation calls, per-group coefficients of variation and the
//! sample-by-sample correlation matrix behind the heatmap.
//!
//! Clustering and PCA are left to the plotting layer.

mod correlation;
mod regulation;
mod variation;

use serde::{Deserialize, Serialize};

pub use correlation::{sample_correlation, CorrelationMatrix};
pub use regulation::{classify, regulation_counts, Regulation, RegulationCounts};
pub use variation::{coefficient_of_variation, VariationRow, VariationTable};

/// Volcano-plot significance thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Absolute log2 fold-change a protein must exceed
    pub fold_change_threshold: f64,
    /// p-value a protein must fall below
    pub p_value_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fold_change_threshold: 1.0,
            p_value_threshold: 0.05,
        }
    }
}
