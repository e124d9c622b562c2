//! Column names shared by the TSV and Parquet outputs

/// Row position of the protein in the export
pub const PROTEIN_INDEX: &str = "protein_index";
/// Protein accession
pub const ACCESSION: &str = "accession";
/// Gene symbol
pub const GENE: &str = "gene";
/// Protein display name
pub const PROTEIN_NAME: &str = "protein_name";
/// Sample identifier
pub const SAMPLE: &str = "sample";
/// Group identifier
pub const GROUP: &str = "group";
/// Linear abundance
pub const ABUNDANCE: &str = "abundance";
/// log2 of a positive abundance
pub const LOG2_ABUNDANCE: &str = "log2_abundance";
/// Peptides quantified per (protein, sample)
pub const PEPTIDE_COUNT: &str = "peptide_count";
/// Exported group median abundance
pub const MEDIAN_ABUNDANCE: &str = "median_abundance";
/// Comparison identifier, `numerator/denominator`
pub const COMPARISON: &str = "comparison";
/// t-test difference
pub const LOG2_FOLD_CHANGE: &str = "log2_fold_change";
/// t-test p-value
pub const P_VALUE: &str = "p_value";
/// Volcano-plot call
pub const REGULATION: &str = "regulation";
/// Non-missing abundances behind a CV
pub const N: &str = "n";
/// Coefficient of variation in percent
pub const CV_PERCENT: &str = "cv_percent";

// Parquet footer keys

/// Output format version
pub const KEY_FORMAT_VERSION: &str = "perseus_report:format_version";
/// Researcher token of the run
pub const KEY_RESEARCHER: &str = "perseus_report:researcher";
/// Work-order token of the run
pub const KEY_WORK_ORDER: &str = "perseus_report:work_order";
/// Path of the source export
pub const KEY_SOURCE_FILE: &str = "perseus_report:source_file";
/// Table name (`sample_level`, `group_level`, ...)
pub const KEY_TABLE: &str = "perseus_report:table";

/// Current output format version
pub const FORMAT_VERSION: &str = "1.0";
