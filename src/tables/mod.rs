//! # Long-Format Report Tables
//!
//! The three analysis-ready tables derived from one export:
//!
//! | Table | Grain | Values |
//! |-------|-------|--------|
//! | [`SampleLevelTable`] | protein × sample | abundance, log2 abundance, peptide count, group |
//! | [`GroupLevelTable`] | protein × group | exported median abundance |
//! | [`ComparisonTable`] | protein × comparison | log2 fold-change, p-value |
//!
//! Rows follow export order: protein row first, then source column order.
//! Protein identity is the body row position (`protein_index`), since the
//! export has no other row key.

mod assemble;
mod reshape;


use serde::Serialize;

pub use assemble::{
    assemble_comparisons, assemble_group_level, assemble_sample_level, protein_annotations,
};
pub use reshape::{reshape_long, LongRow, LongTable, WideBlock};

use crate::export::Comparison;

/// Identifying columns shared by every row of a protein
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProteinAnnotation {
    /// Protein accession
    pub accession: String,
    /// Gene symbol
    pub gene: Option<String>,
    /// Protein display name
    pub protein_name: Option<String>,
}

/// One (protein, sample) measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    /// Row position of the protein in the export
    pub protein_index: usize,
    /// Protein accession
    pub accession: String,
    /// Gene symbol
    pub gene: Option<String>,
    /// Protein display name
    pub protein_name: Option<String>,
    /// Sample identifier
    pub sample: String,
    /// Group of the sample; `None` when the sample has no metadata
    pub group: Option<String>,
    /// Linear abundance
    pub abundance: Option<f64>,
    /// `log2(abundance)`; `None` when abundance is missing or not positive
    pub log2_abundance: Option<f64>,
    /// Number of peptides quantified for the protein in this sample
    pub peptide_count: Option<u32>,
}

impl SampleRow {
    /// Build a row, deriving the log2 abundance
    pub fn new(
        protein_index: usize,
        protein: &ProteinAnnotation,
        sample: &str,
        group: Option<&str>,
        abundance: Option<f64>,
        peptide_count: Option<u32>,
    ) -> Self {
        Self {
            protein_index,
            accession: protein.accession.clone(),
            gene: protein.gene.clone(),
            protein_name: protein.protein_name.clone(),
            sample: sample.to_string(),
            group: group.map(str::to_string),
            abundance,
            log2_abundance: log2_abundance(abundance),
            peptide_count,
        }
    }
}

/// `log2` of a positive abundance
pub fn log2_abundance(abundance: Option<f64>) -> Option<f64> {
    abundance.filter(|a| *a > 0.0).map(f64::log2)
}

/// One (protein, group) median abundance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    /// Row position of the protein in the export
    pub protein_index: usize,
    /// Protein accession
    pub accession: String,
    /// Gene symbol
    pub gene: Option<String>,
    /// Protein display name
    pub protein_name: Option<String>,
    /// Group identifier
    pub group: String,
    /// Median abundance as exported
    pub median_abundance: Option<f64>,
}

/// One (protein, comparison) test result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Row position of the protein in the export
    pub protein_index: usize,
    /// Protein accession
    pub accession: String,
    /// Gene symbol
    pub gene: Option<String>,
    /// Protein display name
    pub protein_name: Option<String>,
    /// Ordered group pair
    pub comparison: Comparison,
    /// Exported t-test difference (log2 fold-change)
    pub log2_fold_change: Option<f64>,
    /// Exported t-test p-value
    pub p_value: Option<f64>,
}

/// Sample-level long table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleLevelTable {
    rows: Vec<SampleRow>,
}

impl SampleLevelTable {
    /// Wrap assembled rows
    pub fn new(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }

    /// Rows in export order
    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct samples in order of first appearance
    pub fn samples(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|r| r.sample.as_str()))
    }

    /// Distinct groups in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        distinct(self.rows.iter().filter_map(|r| r.group.as_deref()))
    }

    /// Distinct samples whose rows carry no group
    pub fn unmatched_samples(&self) -> Vec<&str> {
        distinct(
            self.rows
                .iter()
                .filter(|r| r.group.is_none())
                .map(|r| r.sample.as_str()),
        )
    }

    /// Remove every row of `samples`, returning the table and the number removed
    pub fn without_samples(self, samples: &[String]) -> (Self, usize) {
        let before = self.rows.len();
        let rows: Vec<SampleRow> = self
            .rows
            .into_iter()
            .filter(|r| !samples.contains(&r.sample))
            .collect();
        let removed = before - rows.len();
        (Self { rows }, removed)
    }
}

/// Group-level long table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupLevelTable {
    rows: Vec<GroupRow>,
}

impl GroupLevelTable {
    /// Wrap assembled rows
    pub fn new(rows: Vec<GroupRow>) -> Self {
        Self { rows }
    }

    /// Rows in export order
    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct groups in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|r| r.group.as_str()))
    }
}

/// Comparison long table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Wrap assembled rows
    pub fn new(rows: Vec<ComparisonRow>) -> Self {
        Self { rows }
    }

    /// Rows in export order
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct comparisons in order of first appearance
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut seen: Vec<&Comparison> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&&row.comparison) {
                seen.push(&row.comparison);
            }
        }
        seen
    }
}

fn distinct<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
