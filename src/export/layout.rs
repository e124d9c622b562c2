use std::fmt;

use log::debug;
use serde::Serialize;

use super::naming::{ensure_unique, normalize_group, strip_run_qualifiers, Comparison, RunNaming};
use super::ColumnConventions;
use crate::error::{PipelineError, Result};

/// Measurement block a column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Per-sample linear abundance (MaxLFQ)
    Abundance,
    /// Per-sample peptide count
    PeptideCount,
    /// Per-group median abundance
    GroupMedian,
    /// Per-comparison t-test p-value
    PValue,
    /// Per-comparison t-test difference (log2 fold-change)
    Difference,
}

impl BlockKind {
    /// All measurement blocks in export order
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Abundance,
        BlockKind::PeptideCount,
        BlockKind::GroupMedian,
        BlockKind::PValue,
        BlockKind::Difference,
    ];

    /// Whether run tokens must be present on every column of this block
    pub fn qualifier_policy(&self) -> super::QualifierPolicy {
        match self {
            BlockKind::Abundance | BlockKind::PeptideCount => super::QualifierPolicy::Required,
            BlockKind::GroupMedian | BlockKind::PValue | BlockKind::Difference => {
                super::QualifierPolicy::IfPresent
            }
        }
    }

    /// Whether columns of this block are keyed by comparison
    pub fn is_comparison(&self) -> bool {
        matches!(self, BlockKind::PValue | BlockKind::Difference)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Abundance => "abundance",
            BlockKind::PeptideCount => "peptide count",
            BlockKind::GroupMedian => "group median",
            BlockKind::PValue => "p-value",
            BlockKind::Difference => "difference",
        };
        f.write_str(name)
    }
}

/// Protein annotation field carried by an annotation column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationField {
    /// Protein accession
    Accession,
    /// Gene symbol
    Gene,
    /// Protein display name
    ProteinName,
}

/// What a single export column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "field")]
pub enum ColumnKind {
    /// Protein annotation
    Annotation(AnnotationField),
    /// Measurement column keyed by sample, group or comparison
    Measurement(BlockKind),
    /// Column excluded from every block
    Ignored,
}

/// Structured description of one export column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Position in the export header
    pub index: usize,
    /// Raw column name
    pub name: String,
    /// Column kind
    pub kind: ColumnKind,
    /// Bare sample, group or canonical comparison identifier
    pub key: Option<String>,
    /// Parsed comparison for p-value and difference columns
    #[serde(skip)]
    pub comparison: Option<Comparison>,
}

/// Header descriptor of a Perseus export, built once at ingestion.
///
/// Every column is classified, every measurement column gets its bare
/// identifier, and identifier collisions are rejected here so the assembly
/// steps can join on keys without re-deriving them.
#[derive(Debug, Clone, Serialize)]
pub struct ExportLayout {
    columns: Vec<ColumnDescriptor>,
    accession: usize,
    gene: Option<usize>,
    protein_name: Option<usize>,
}

impl ExportLayout {
    /// Classify every header column and recover its identifier.
    pub fn describe<S: AsRef<str>>(
        header: &[S],
        conventions: &ColumnConventions,
        naming: &RunNaming,
    ) -> Result<Self> {
        naming.validate()?;

        let mut columns: Vec<ColumnDescriptor> = header
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let name = name.as_ref().trim();
                ColumnDescriptor {
                    index,
                    name: name.to_string(),
                    kind: classify(name, conventions, naming),
                    key: None,
                    comparison: None,
                }
            })
            .collect();

        let find = |field: AnnotationField| {
            columns
                .iter()
                .find(|c| c.kind == ColumnKind::Annotation(field))
                .map(|c| c.index)
        };
        let accession = find(AnnotationField::Accession).ok_or_else(|| {
            PipelineError::MalformedInput(format!(
                "missing protein accession column '{}'",
                conventions.accession
            ))
        })?;
        let gene = find(AnnotationField::Gene);
        let protein_name = find(AnnotationField::ProteinName);

        for block in BlockKind::ALL {
            let positions: Vec<usize> = columns
                .iter()
                .filter(|c| c.kind == ColumnKind::Measurement(block))
                .map(|c| c.index)
                .collect();
            let names: Vec<&str> = positions.iter().map(|&i| columns[i].name.as_str()).collect();

            let keys = match block {
                BlockKind::Abundance => strip_run_qualifiers(block, &names, naming, None)?,
                BlockKind::PeptideCount => strip_run_qualifiers(
                    block,
                    &names,
                    naming,
                    Some(conventions.peptide_prefix.as_str()),
                )?,
                BlockKind::PValue => strip_run_qualifiers(
                    block,
                    &names,
                    naming,
                    Some(conventions.p_value_prefix.as_str()),
                )?,
                BlockKind::Difference => strip_run_qualifiers(
                    block,
                    &names,
                    naming,
                    Some(conventions.difference_prefix.as_str()),
                )?,
                BlockKind::GroupMedian => strip_run_qualifiers(block, &names, naming, None)?
                    .iter()
                    .map(|key| normalize_group(key))
                    .collect(),
            };

            let comparisons = if block.is_comparison() {
                keys.iter()
                    .map(|key| Comparison::parse(key, &conventions.comparison_delimiter).map(Some))
                    .collect::<Result<Vec<_>>>()?
            } else {
                vec![None; keys.len()]
            };
            let keys: Vec<String> = keys
                .into_iter()
                .zip(&comparisons)
                .map(|(key, comparison)| match comparison {
                    Some(comparison) => comparison.to_string(),
                    None => key,
                })
                .collect();

            // Normalization can merge keys that were distinct before it
            ensure_unique(
                block,
                keys.iter().map(String::as_str).zip(names.iter().copied()),
            )?;
            debug!("{} block: {} columns", block, keys.len());

            for ((position, key), comparison) in positions.into_iter().zip(keys).zip(comparisons) {
                columns[position].key = Some(key);
                columns[position].comparison = comparison;
            }
        }

        if !columns
            .iter()
            .any(|c| c.kind == ColumnKind::Measurement(BlockKind::Abundance))
        {
            return Err(PipelineError::MalformedInput(format!(
                "no abundance columns named '{}'",
                naming.qualify("<sample>")
            )));
        }

        Ok(Self {
            columns,
            accession,
            gene,
            protein_name,
        })
    }

    /// All column descriptors in header order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Columns of one measurement block in header order
    pub fn block(&self, block: BlockKind) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns
            .iter()
            .filter(move |c| c.kind == ColumnKind::Measurement(block))
    }

    /// Identifiers of one measurement block in header order
    pub fn keys(&self, block: BlockKind) -> Vec<&str> {
        self.block(block).filter_map(|c| c.key.as_deref()).collect()
    }

    /// Comparisons of a p-value or difference block in header order
    pub fn comparisons(&self, block: BlockKind) -> Vec<&Comparison> {
        self.block(block)
            .filter_map(|c| c.comparison.as_ref())
            .collect()
    }

    /// Number of columns in a measurement block
    pub fn block_len(&self, block: BlockKind) -> usize {
        self.block(block).count()
    }

    /// Position of the accession column
    pub fn accession_column(&self) -> usize {
        self.accession
    }

    /// Position of the gene column, if present
    pub fn gene_column(&self) -> Option<usize> {
        self.gene
    }

    /// Position of the protein name column, if present
    pub fn protein_name_column(&self) -> Option<usize> {
        self.protein_name
    }
}

fn classify(name: &str, conventions: &ColumnConventions, naming: &RunNaming) -> ColumnKind {
    if name.is_empty() || conventions.ignored_columns.iter().any(|c| c == name) {
        ColumnKind::Ignored
    } else if name == conventions.accession {
        ColumnKind::Annotation(AnnotationField::Accession)
    } else if name == conventions.gene {
        ColumnKind::Annotation(AnnotationField::Gene)
    } else if name == conventions.protein_name {
        ColumnKind::Annotation(AnnotationField::ProteinName)
    } else if name.starts_with(conventions.peptide_prefix.as_str()) {
        ColumnKind::Measurement(BlockKind::PeptideCount)
    } else if name.starts_with(conventions.p_value_prefix.as_str()) {
        ColumnKind::Measurement(BlockKind::PValue)
    } else if name.starts_with(conventions.difference_prefix.as_str()) {
        ColumnKind::Measurement(BlockKind::Difference)
    } else if name.starts_with(naming.researcher_token().as_str()) {
        // run-qualifier validation happens when the block is stripped
        ColumnKind::Measurement(BlockKind::Abundance)
    } else {
        ColumnKind::Measurement(BlockKind::GroupMedian)
    }
}
