//! # Report Output
//!
//! Writes the tables of a pipeline run into an output directory:
//!
//! ```text
//! out/
//! ├── sample_level.{tsv,parquet}
//! ├── group_level.{tsv,parquet}
//! ├── comparisons.{tsv,parquet}
//! ├── variation.{tsv,parquet}
//! ├── correlation.tsv
//! └── summary.json
//! ```
//!
//! Parquet files are ZSTD-compressed and carry the run naming and source
//! path as key-value metadata in the footer.

pub mod columns;
mod batches;
mod schema;
mod summary;
mod tsv;

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use batches::{
    comparison_batch, group_level_batch, sample_level_batch, variation_batch, write_batch,
};
pub use schema::{comparison_schema, group_level_schema, sample_level_schema, variation_schema};
pub use summary::RunSummary;
pub use tsv::{
    write_comparisons, write_correlation, write_group_level, write_sample_level, write_variation,
};

use crate::analysis::{coefficient_of_variation, sample_correlation, AnalysisConfig};
use crate::export::RunNaming;
use crate::pipeline::ReportTables;
use columns::{
    FORMAT_VERSION, KEY_FORMAT_VERSION, KEY_RESEARCHER, KEY_SOURCE_FILE, KEY_TABLE,
    KEY_WORK_ORDER,
};

/// Errors that can occur while writing report tables
#[derive(Debug, thiserror::Error)]
pub enum TableWriterError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// CSV error
    #[error("TSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// File formats for the long tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated text
    Tsv,
    /// Apache Parquet
    Parquet,
    /// Both
    #[default]
    All,
}

impl OutputFormat {
    fn writes_tsv(self) -> bool {
        matches!(self, OutputFormat::Tsv | OutputFormat::All)
    }

    fn writes_parquet(self) -> bool {
        matches!(self, OutputFormat::Parquet | OutputFormat::All)
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Table file format
    pub format: OutputFormat,
    /// ZSTD level for Parquet files
    pub compression_level: i32,
    /// Maximum rows per Parquet row group
    pub row_group_size: usize,
    /// Whether to write Parquet column statistics
    pub write_statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::All,
            compression_level: 3,
            row_group_size: 64 * 1024,
            write_statistics: true,
        }
    }
}

/// One file written by [`ReportWriter`]
#[derive(Debug, Clone)]
pub struct WrittenFile {
    /// File path
    pub path: PathBuf,
    /// Data rows written, excluding headers
    pub rows: usize,
}

/// Files produced by one [`ReportWriter::write`]
#[derive(Debug, Clone, Default)]
pub struct OutputStats {
    /// Files in write order
    pub files: Vec<WrittenFile>,
}

impl fmt::Display for OutputStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wrote {} files:", self.files.len())?;
        for file in &self.files {
            writeln!(f, "  {} ({} rows)", file.path.display(), file.rows)?;
        }
        Ok(())
    }
}

/// Writes every table of a run to one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    config: OutputConfig,
    naming: RunNaming,
    source: String,
}

impl ReportWriter {
    /// Create a writer for `dir`; the directory is created on write
    pub fn new<P: AsRef<Path>>(
        dir: P,
        config: OutputConfig,
        naming: RunNaming,
        source: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            config,
            naming,
            source: source.into(),
        }
    }

    fn footer(&self, table: &str) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
        metadata.insert(KEY_RESEARCHER.to_string(), self.naming.researcher.clone());
        metadata.insert(KEY_WORK_ORDER.to_string(), self.naming.work_order.clone());
        metadata.insert(KEY_SOURCE_FILE.to_string(), self.source.clone());
        metadata.insert(KEY_TABLE.to_string(), table.to_string());
        metadata
    }

    fn write_parquet(
        &self,
        table: &str,
        batch: &RecordBatch,
        stats: &mut OutputStats,
    ) -> Result<(), TableWriterError> {
        let path = self.dir.join(format!("{table}.parquet"));
        let file = File::create(&path)?;
        let properties = self.config.to_writer_properties(&self.footer(table));
        let rows = write_batch(file, batch, properties)?;
        debug!("Wrote {} ({} rows)", path.display(), rows);
        stats.files.push(WrittenFile { path, rows });
        Ok(())
    }

    fn write_tsv<F>(
        &self,
        name: &str,
        stats: &mut OutputStats,
        write: F,
    ) -> Result<(), TableWriterError>
    where
        F: FnOnce(BufWriter<File>) -> Result<usize, TableWriterError>,
    {
        let path = self.dir.join(format!("{name}.tsv"));
        let rows = write(BufWriter::new(File::create(&path)?))?;
        debug!("Wrote {} ({} rows)", path.display(), rows);
        stats.files.push(WrittenFile { path, rows });
        Ok(())
    }

    /// Write the tables, derived QC tables and `summary.json`
    pub fn write(
        &self,
        tables: &ReportTables,
        analysis: &AnalysisConfig,
    ) -> Result<OutputStats, TableWriterError> {
        fs::create_dir_all(&self.dir)?;
        info!("Writing report tables to {}", self.dir.display());

        let variation = coefficient_of_variation(&tables.samples);
        let correlation = sample_correlation(&tables.samples);
        let mut stats = OutputStats::default();

        if self.config.format.writes_tsv() {
            self.write_tsv("sample_level", &mut stats, |w| {
                write_sample_level(w, &tables.samples)
            })?;
            self.write_tsv("group_level", &mut stats, |w| write_group_level(w, &tables.groups))?;
            self.write_tsv("comparisons", &mut stats, |w| {
                write_comparisons(w, &tables.comparisons, analysis)
            })?;
            self.write_tsv("variation", &mut stats, |w| write_variation(w, &variation))?;
        }

        if self.config.format.writes_parquet() {
            let samples = sample_level_batch(&tables.samples)?;
            self.write_parquet("sample_level", &samples, &mut stats)?;
            self.write_parquet("group_level", &group_level_batch(&tables.groups)?, &mut stats)?;
            self.write_parquet(
                "comparisons",
                &comparison_batch(&tables.comparisons, analysis)?,
                &mut stats,
            )?;
            self.write_parquet("variation", &variation_batch(&variation)?, &mut stats)?;
        }

        self.write_tsv("correlation", &mut stats, |w| write_correlation(w, &correlation))?;

        let summary = RunSummary::new(tables, &self.naming, self.source.clone(), analysis);
        let path = self.dir.join("summary.json");
        fs::write(&path, summary.to_json()?)?;
        stats.files.push(WrittenFile { path, rows: 0 });

        info!("Wrote {} files", stats.files.len());
        Ok(stats)
    }
}
