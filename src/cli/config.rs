//! TOML configuration file support.
//!
//! Every section is optional; command-line flags override the file:
//!
//! ```toml
//! # perseus-report.toml
//! [naming]
//! researcher = "jdoe"
//! work_order = "23_001"
//!
//! [columns]
//! accession = "Majority protein IDs"
//! ignored_columns = ["Score"]
//!
//! [reconciliation]
//! unmatched_samples = "drop"
//!
//! [analysis]
//! fold_change_threshold = 0.585
//!
//! [output]
//! format = "parquet"
//! compression_level = 9
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use perseus_report::analysis::AnalysisConfig;
use perseus_report::export::ColumnConventions;
use perseus_report::output::OutputConfig;
use perseus_report::pipeline::{PipelineConfig, ReconciliationConfig};

/// Root configuration structure for perseus-report.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Run naming tokens.
    #[serde(default)]
    pub naming: NamingConfig,

    /// Column naming conventions.
    #[serde(default)]
    pub columns: ColumnConventions,

    /// Cross-block reconciliation settings.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,

    /// Volcano-plot thresholds.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Run naming tokens; either may be given on the command line instead.
#[derive(Debug, Default, Deserialize)]
pub struct NamingConfig {
    /// Researcher token.
    pub researcher: Option<String>,

    /// Work-order token.
    pub work_order: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Library pipeline settings from this file.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            columns: self.columns.clone(),
            reconciliation: self.reconciliation,
            analysis: self.analysis,
        }
    }
}
