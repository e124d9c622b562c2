use serde::{Deserialize, Serialize};

/// Column naming conventions of a Perseus export.
///
/// Defaults match a MaxQuant/Perseus LFQ export with per-sample peptide
/// counts and two-sample t-test columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConventions {
    /// Protein accession column (required)
    pub accession: String,

    /// Gene symbol column
    pub gene: String,

    /// Protein display name column
    pub protein_name: String,

    /// Prefix marking per-sample peptide-count columns
    pub peptide_prefix: String,

    /// Prefix marking t-test p-value columns
    pub p_value_prefix: String,

    /// Prefix marking t-test difference (log2 fold-change) columns
    pub difference_prefix: String,

    /// Separator between the two groups of a comparison identifier
    pub comparison_delimiter: String,

    /// Extra columns to leave out of every measurement block
    pub ignored_columns: Vec<String>,
}

impl Default for ColumnConventions {
    fn default() -> Self {
        Self {
            accession: "Protein IDs".to_string(),
            gene: "Gene names".to_string(),
            protein_name: "Protein names".to_string(),
            peptide_prefix: "number_peptides_".to_string(),
            p_value_prefix: "p value ".to_string(),
            difference_prefix: "difference ".to_string(),
            comparison_delimiter: "/".to_string(),
            ignored_columns: Vec::new(),
        }
    }
}
