use std::collections::HashMap;

use serde::Serialize;

use crate::tables::SampleLevelTable;

/// Coefficient of variation of one protein within one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationRow {
    /// Row position of the protein in the export
    pub protein_index: usize,
    /// Protein accession
    pub accession: String,
    /// Group identifier
    pub group: String,
    /// Number of non-missing abundances used
    pub n: usize,
    /// Sample standard deviation over mean, in percent
    pub cv_percent: Option<f64>,
}

/// Per (protein, group) coefficients of variation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariationTable {
    /// Rows, protein order then group order of first appearance
    pub rows: Vec<VariationRow>,
}

impl VariationTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CV of linear abundances per (protein, group).
///
/// Needs at least two abundances and a positive mean; otherwise the CV is
/// `None`. Rows without a group are skipped.
pub fn coefficient_of_variation(table: &SampleLevelTable) -> VariationTable {
    let mut order: Vec<(usize, &str, &str)> = Vec::new();
    let mut values: HashMap<(usize, &str), Vec<f64>> = HashMap::new();

    for row in table.rows() {
        let Some(group) = row.group.as_deref() else {
            continue;
        };
        let entry = values.entry((row.protein_index, group)).or_insert_with(|| {
            order.push((row.protein_index, row.accession.as_str(), group));
            Vec::new()
        });
        if let Some(abundance) = row.abundance {
            entry.push(abundance);
        }
    }

    let rows = order
        .into_iter()
        .map(|(protein_index, accession, group)| {
            let observed = values
                .get(&(protein_index, group))
                .map(Vec::as_slice)
                .unwrap_or_default();
            VariationRow {
                protein_index,
                accession: accession.to_string(),
                group: group.to_string(),
                n: observed.len(),
                cv_percent: cv_percent(observed),
            }
        })
        .collect();

    VariationTable { rows }
}

fn cv_percent(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt() / mean * 100.0)
}
