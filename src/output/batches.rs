use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

use super::schema::{comparison_schema, group_level_schema, sample_level_schema, variation_schema};
use super::{OutputConfig, TableWriterError};
use crate::analysis::{classify, AnalysisConfig, VariationTable};
use crate::tables::{ComparisonTable, GroupLevelTable, SampleLevelTable};

impl OutputConfig {
    /// Parquet writer properties carrying `metadata` in the file footer
    pub fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let compression = Compression::ZSTD(
            ZstdLevel::try_new(self.compression_level).unwrap_or_default(),
        );

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        // sorted for a stable footer
        let mut kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();
        kv_metadata.sort_by(|a, b| a.key.cmp(&b.key));

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Write one batch as a complete Parquet file, returning the rows written
pub fn write_batch<W: Write + Send>(
    writer: W,
    batch: &RecordBatch,
    properties: WriterProperties,
) -> Result<usize, TableWriterError> {
    let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(properties))?;
    arrow_writer.write(batch)?;
    let file_metadata = arrow_writer.close()?;
    Ok(file_metadata.num_rows as usize)
}

struct AnnotationColumns {
    protein_index: UInt64Builder,
    accession: StringBuilder,
    gene: StringBuilder,
    protein_name: StringBuilder,
}

impl AnnotationColumns {
    fn with_capacity(rows: usize) -> Self {
        Self {
            protein_index: UInt64Builder::with_capacity(rows),
            accession: StringBuilder::with_capacity(rows, rows * 8),
            gene: StringBuilder::with_capacity(rows, rows * 8),
            protein_name: StringBuilder::with_capacity(rows, rows * 16),
        }
    }

    fn append(
        &mut self,
        protein_index: usize,
        accession: &str,
        gene: Option<&str>,
        protein_name: Option<&str>,
    ) {
        self.protein_index.append_value(protein_index as u64);
        self.accession.append_value(accession);
        self.gene.append_option(gene);
        self.protein_name.append_option(protein_name);
    }

    fn finish(mut self) -> Vec<ArrayRef> {
        vec![
            Arc::new(self.protein_index.finish()),
            Arc::new(self.accession.finish()),
            Arc::new(self.gene.finish()),
            Arc::new(self.protein_name.finish()),
        ]
    }
}

/// Sample-level table as an Arrow batch
pub fn sample_level_batch(table: &SampleLevelTable) -> Result<RecordBatch, ArrowError> {
    let rows = table.len();
    let mut annotation = AnnotationColumns::with_capacity(rows);
    let mut sample = StringBuilder::with_capacity(rows, rows * 8);
    let mut group = StringBuilder::with_capacity(rows, rows * 8);
    let mut abundance = Float64Builder::with_capacity(rows);
    let mut log2_abundance = Float64Builder::with_capacity(rows);
    let mut peptide_count = UInt32Builder::with_capacity(rows);

    for row in table.rows() {
        annotation.append(
            row.protein_index,
            &row.accession,
            row.gene.as_deref(),
            row.protein_name.as_deref(),
        );
        sample.append_value(&row.sample);
        group.append_option(row.group.as_deref());
        abundance.append_option(row.abundance);
        log2_abundance.append_option(row.log2_abundance);
        peptide_count.append_option(row.peptide_count);
    }

    let mut arrays = annotation.finish();
    arrays.push(Arc::new(sample.finish()));
    arrays.push(Arc::new(group.finish()));
    arrays.push(Arc::new(abundance.finish()));
    arrays.push(Arc::new(log2_abundance.finish()));
    arrays.push(Arc::new(peptide_count.finish()));
    RecordBatch::try_new(sample_level_schema(), arrays)
}

/// Group-level table as an Arrow batch
pub fn group_level_batch(table: &GroupLevelTable) -> Result<RecordBatch, ArrowError> {
    let rows = table.len();
    let mut annotation = AnnotationColumns::with_capacity(rows);
    let mut group = StringBuilder::with_capacity(rows, rows * 8);
    let mut median = Float64Builder::with_capacity(rows);

    for row in table.rows() {
        annotation.append(
            row.protein_index,
            &row.accession,
            row.gene.as_deref(),
            row.protein_name.as_deref(),
        );
        group.append_value(&row.group);
        median.append_option(row.median_abundance);
    }

    let mut arrays = annotation.finish();
    arrays.push(Arc::new(group.finish()));
    arrays.push(Arc::new(median.finish()));
    RecordBatch::try_new(group_level_schema(), arrays)
}

/// Comparison table with regulation calls as an Arrow batch
pub fn comparison_batch(
    table: &ComparisonTable,
    analysis: &AnalysisConfig,
) -> Result<RecordBatch, ArrowError> {
    let rows = table.len();
    let mut annotation = AnnotationColumns::with_capacity(rows);
    let mut comparison = StringBuilder::with_capacity(rows, rows * 16);
    let mut fold_change = Float64Builder::with_capacity(rows);
    let mut p_value = Float64Builder::with_capacity(rows);
    let mut regulation = StringBuilder::with_capacity(rows, rows * 8);

    for row in table.rows() {
        annotation.append(
            row.protein_index,
            &row.accession,
            row.gene.as_deref(),
            row.protein_name.as_deref(),
        );
        comparison.append_value(row.comparison.to_string());
        fold_change.append_option(row.log2_fold_change);
        p_value.append_option(row.p_value);
        regulation.append_value(classify(row, analysis).to_string());
    }

    let mut arrays = annotation.finish();
    arrays.push(Arc::new(comparison.finish()));
    arrays.push(Arc::new(fold_change.finish()));
    arrays.push(Arc::new(p_value.finish()));
    arrays.push(Arc::new(regulation.finish()));
    RecordBatch::try_new(comparison_schema(), arrays)
}

/// Variation table as an Arrow batch
pub fn variation_batch(table: &VariationTable) -> Result<RecordBatch, ArrowError> {
    let rows = table.len();
    let mut protein_index = UInt64Builder::with_capacity(rows);
    let mut accession = StringBuilder::with_capacity(rows, rows * 8);
    let mut group = StringBuilder::with_capacity(rows, rows * 8);
    let mut n = UInt64Builder::with_capacity(rows);
    let mut cv = Float64Builder::with_capacity(rows);

    for row in &table.rows {
        protein_index.append_value(row.protein_index as u64);
        accession.append_value(&row.accession);
        group.append_value(&row.group);
        n.append_value(row.n as u64);
        cv.append_option(row.cv_percent);
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(protein_index.finish()),
        Arc::new(accession.finish()),
        Arc::new(group.finish()),
        Arc::new(n.finish()),
        Arc::new(cv.finish()),
    ];
    RecordBatch::try_new(variation_schema(), arrays)
}
