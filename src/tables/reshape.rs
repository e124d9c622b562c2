use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::Result;
use crate::export::{BlockKind, ExportLayout, RawExport};

/// Wide numeric block: one row per protein, one column per key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideBlock {
    keys: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl WideBlock {
    /// Create an empty block with the given column keys
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            rows: Vec::new(),
        }
    }

    /// Append one protein row, padded or truncated to the key count
    pub fn push_row(&mut self, mut values: Vec<Option<f64>>) {
        values.resize(self.keys.len(), None);
        self.rows.push(values);
    }

    /// Read one measurement block of the export
    pub fn from_export(raw: &RawExport, layout: &ExportLayout, block: BlockKind) -> Result<Self> {
        let columns: Vec<_> = layout.block(block).collect();
        let keys = columns
            .iter()
            .filter_map(|c| c.key.clone())
            .collect::<Vec<_>>();

        let mut wide = Self::new(keys);
        for row in 0..raw.protein_count() {
            let values = columns
                .iter()
                .map(|c| raw.numeric(row, c.index))
                .collect::<Result<Vec<_>>>()?;
            wide.push_row(values);
        }
        Ok(wide)
    }

    /// Column keys
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of protein rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One (protein, key) value of a long table
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    /// Row position of the protein
    pub protein_index: usize,
    /// Sample, group or comparison identifier
    pub key: String,
    /// Cell value
    pub value: Option<f64>,
}

/// Long-format result of [`reshape_long`]
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    /// Name of the value column, used to label values in logs and errors
    pub value_name: String,
    /// Rows, protein-major then key order
    pub rows: Vec<LongRow>,
}

impl LongTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pivot every key column of `block` into `(protein, key, value)` rows.
///
/// Identifying columns travel as `protein_index`. Null values are kept, so
/// the result always has `rows × keys` entries.
pub fn reshape_long(block: &WideBlock, value_name: &str) -> LongTable {
    let mut rows = Vec::with_capacity(block.rows.len() * block.keys.len());
    for (protein_index, values) in block.rows.iter().enumerate() {
        for (key, value) in block.keys.iter().zip(values) {
            rows.push(LongRow {
                protein_index,
                key: key.clone(),
                value: *value,
            });
        }
    }
    LongTable {
        value_name: value_name.to_string(),
        rows,
    }
}

/// One row of a full outer join between two long tables
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JoinedRow<'a> {
    pub protein_index: usize,
    pub key: &'a str,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// Full outer join on `(protein_index, key)`.
///
/// Both inputs must be protein-major, as produced by [`reshape_long`]. Per
/// protein, left keys come first in their order, then keys only on the right.
pub(crate) fn outer_join<'a>(left: &'a LongTable, right: &'a LongTable) -> Vec<JoinedRow<'a>> {
    let right_values: HashMap<(usize, &str), Option<f64>> = right
        .rows
        .iter()
        .map(|r| ((r.protein_index, r.key.as_str()), r.value))
        .collect();
    let left_keys: HashSet<(usize, &str)> = left
        .rows
        .iter()
        .map(|r| (r.protein_index, r.key.as_str()))
        .collect();

    debug!("Joining {} with {}", left.value_name, right.value_name);
    let mut joined = Vec::with_capacity(left.rows.len().max(right.rows.len()));
    let (mut l, mut r) = (0, 0);
    loop {
        let protein = match (left.rows.get(l), right.rows.get(r)) {
            (Some(a), Some(b)) => a.protein_index.min(b.protein_index),
            (Some(a), None) => a.protein_index,
            (None, Some(b)) => b.protein_index,
            (None, None) => break,
        };

        while let Some(row) = left.rows.get(l).filter(|row| row.protein_index == protein) {
            joined.push(JoinedRow {
                protein_index: protein,
                key: &row.key,
                left: row.value,
                right: right_values
                    .get(&(protein, row.key.as_str()))
                    .copied()
                    .flatten(),
            });
            l += 1;
        }
        while let Some(row) = right.rows.get(r).filter(|row| row.protein_index == protein) {
            if !left_keys.contains(&(protein, row.key.as_str())) {
                joined.push(JoinedRow {
                    protein_index: protein,
                    key: &row.key,
                    left: None,
                    right: row.value,
                });
            }
            r += 1;
        }
    }
    joined
}
