use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::columns::{self, FORMAT_VERSION, KEY_FORMAT_VERSION};

fn annotation_fields(builder: &mut SchemaBuilder) {
    builder.push(Field::new(columns::PROTEIN_INDEX, DataType::UInt64, false));
    builder.push(Field::new(columns::ACCESSION, DataType::Utf8, false));
    builder.push(Field::new(columns::GENE, DataType::Utf8, true));
    builder.push(Field::new(columns::PROTEIN_NAME, DataType::Utf8, true));
}

fn finish(builder: SchemaBuilder) -> Arc<Schema> {
    let mut metadata = HashMap::new();
    metadata.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
    Arc::new(builder.finish().with_metadata(metadata))
}

/// Arrow schema of the sample-level table
pub fn sample_level_schema() -> Arc<Schema> {
    let mut builder = SchemaBuilder::new();
    annotation_fields(&mut builder);
    builder.push(Field::new(columns::SAMPLE, DataType::Utf8, false));
    // null when the sample has no metadata
    builder.push(Field::new(columns::GROUP, DataType::Utf8, true));
    builder.push(Field::new(columns::ABUNDANCE, DataType::Float64, true));
    builder.push(Field::new(columns::LOG2_ABUNDANCE, DataType::Float64, true));
    builder.push(Field::new(columns::PEPTIDE_COUNT, DataType::UInt32, true));
    finish(builder)
}

/// Arrow schema of the group-level table
pub fn group_level_schema() -> Arc<Schema> {
    let mut builder = SchemaBuilder::new();
    annotation_fields(&mut builder);
    builder.push(Field::new(columns::GROUP, DataType::Utf8, false));
    builder.push(Field::new(columns::MEDIAN_ABUNDANCE, DataType::Float64, true));
    finish(builder)
}

/// Arrow schema of the comparison table, with the regulation call appended
pub fn comparison_schema() -> Arc<Schema> {
    let mut builder = SchemaBuilder::new();
    annotation_fields(&mut builder);
    builder.push(Field::new(columns::COMPARISON, DataType::Utf8, false));
    builder.push(Field::new(columns::LOG2_FOLD_CHANGE, DataType::Float64, true));
    builder.push(Field::new(columns::P_VALUE, DataType::Float64, true));
    builder.push(Field::new(columns::REGULATION, DataType::Utf8, false));
    finish(builder)
}

/// Arrow schema of the per-group variation table
pub fn variation_schema() -> Arc<Schema> {
    let mut builder = SchemaBuilder::new();
    builder.push(Field::new(columns::PROTEIN_INDEX, DataType::UInt64, false));
    builder.push(Field::new(columns::ACCESSION, DataType::Utf8, false));
    builder.push(Field::new(columns::GROUP, DataType::Utf8, false));
    builder.push(Field::new(columns::N, DataType::UInt64, false));
    builder.push(Field::new(columns::CV_PERCENT, DataType::Float64, true));
    finish(builder)
}
