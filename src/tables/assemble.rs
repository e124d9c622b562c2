use std::collections::HashMap;

use log::debug;

use super::reshape::{outer_join, reshape_long, WideBlock};
use super::{
    ComparisonRow, ComparisonTable, GroupLevelTable, GroupRow, ProteinAnnotation, SampleLevelTable,
    SampleRow,
};
use crate::error::{PipelineError, Result};
use crate::export::{BlockKind, Comparison, ExportLayout, RawExport};
use crate::metadata::SampleMetadata;
use crate::output::columns;

/// Identifying columns of every protein row, in export order
pub fn protein_annotations(raw: &RawExport, layout: &ExportLayout) -> Result<Vec<ProteinAnnotation>> {
    let optional = |row: usize, column: Option<usize>| {
        column
            .map(|c| raw.cell(row, c))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    (0..raw.protein_count())
        .map(|row| {
            let accession = raw.cell(row, layout.accession_column());
            if accession.is_empty() {
                return Err(PipelineError::MalformedInput(format!(
                    "data row {} has no protein accession",
                    row + 1
                )));
            }
            Ok(ProteinAnnotation {
                accession: accession.to_string(),
                gene: optional(row, layout.gene_column()),
                protein_name: optional(row, layout.protein_name_column()),
            })
        })
        .collect()
}

/// Join abundance and peptide counts per (protein, sample) and attach groups.
///
/// The two blocks are full-outer-joined, so a sample present in only one of
/// them still yields rows. Samples missing from `metadata` keep `group = None`.
pub fn assemble_sample_level(
    raw: &RawExport,
    layout: &ExportLayout,
    metadata: &SampleMetadata,
) -> Result<SampleLevelTable> {
    let proteins = protein_annotations(raw, layout)?;
    let abundance = reshape_long(
        &WideBlock::from_export(raw, layout, BlockKind::Abundance)?,
        columns::ABUNDANCE,
    );
    let peptides = reshape_long(
        &WideBlock::from_export(raw, layout, BlockKind::PeptideCount)?,
        columns::PEPTIDE_COUNT,
    );

    let rows = outer_join(&abundance, &peptides)
        .into_iter()
        .map(|joined| {
            let peptide_count = joined
                .right
                .map(|count| {
                    peptide_count(count, &peptides.value_name, joined.protein_index, joined.key)
                })
                .transpose()?;
            Ok(SampleRow::new(
                joined.protein_index,
                &proteins[joined.protein_index],
                joined.key,
                metadata.group_of(joined.key),
                joined.left,
                peptide_count,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Sample-level table: {} rows from {} abundance and {} peptide-count values",
        rows.len(),
        abundance.len(),
        peptides.len()
    );
    Ok(SampleLevelTable::new(rows))
}

/// Reshape the exported group medians. Does not consult sample metadata.
pub fn assemble_group_level(raw: &RawExport, layout: &ExportLayout) -> Result<GroupLevelTable> {
    let proteins = protein_annotations(raw, layout)?;
    let medians = reshape_long(
        &WideBlock::from_export(raw, layout, BlockKind::GroupMedian)?,
        columns::MEDIAN_ABUNDANCE,
    );

    let rows: Vec<GroupRow> = medians
        .rows
        .into_iter()
        .map(|row| {
            let protein = &proteins[row.protein_index];
            GroupRow {
                protein_index: row.protein_index,
                accession: protein.accession.clone(),
                gene: protein.gene.clone(),
                protein_name: protein.protein_name.clone(),
                group: row.key,
                median_abundance: row.value,
            }
        })
        .collect();

    debug!("Group-level table: {} rows", rows.len());
    Ok(GroupLevelTable::new(rows))
}

/// Pair differences with p-values per (protein, comparison).
///
/// A comparison present in only one block yields rows with the other
/// statistic missing.
pub fn assemble_comparisons(raw: &RawExport, layout: &ExportLayout) -> Result<ComparisonTable> {
    let proteins = protein_annotations(raw, layout)?;
    let differences = reshape_long(
        &WideBlock::from_export(raw, layout, BlockKind::Difference)?,
        columns::LOG2_FOLD_CHANGE,
    );
    let p_values = reshape_long(
        &WideBlock::from_export(raw, layout, BlockKind::PValue)?,
        columns::P_VALUE,
    );

    let parsed: HashMap<String, Comparison> = [BlockKind::Difference, BlockKind::PValue]
        .into_iter()
        .flat_map(|block| layout.comparisons(block))
        .map(|comparison| (comparison.to_string(), comparison.clone()))
        .collect();

    let rows = outer_join(&differences, &p_values)
        .into_iter()
        .map(|joined| {
            let comparison = parsed.get(joined.key).cloned().ok_or_else(|| {
                PipelineError::MalformedInput(format!(
                    "comparison '{}' is missing from the export layout",
                    joined.key
                ))
            })?;
            let protein = &proteins[joined.protein_index];
            Ok(ComparisonRow {
                protein_index: joined.protein_index,
                accession: protein.accession.clone(),
                gene: protein.gene.clone(),
                protein_name: protein.protein_name.clone(),
                comparison,
                log2_fold_change: joined.left,
                p_value: joined.right,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Comparison table: {} rows", rows.len());
    Ok(ComparisonTable::new(rows))
}

fn peptide_count(
    value: f64,
    value_name: &str,
    protein_index: usize,
    sample: &str,
) -> Result<u32> {
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(PipelineError::InvalidValue {
            row: protein_index + 1,
            column: format!("{value_name} ({sample})"),
            value: value.to_string(),
        });
    }
    Ok(value as u32)
}
