use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::AnalysisConfig;
use crate::tables::{ComparisonRow, ComparisonTable};

/// Volcano-plot call for one (protein, comparison)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Regulation {
    /// Significant and above the fold-change threshold
    Up,
    /// Significant and below the negative fold-change threshold
    Down,
    /// Anything else, including missing statistics
    Unchanged,
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Regulation::Up => "up",
            Regulation::Down => "down",
            Regulation::Unchanged => "unchanged",
        })
    }
}

/// Call a comparison row up, down or unchanged
pub fn classify(row: &ComparisonRow, config: &AnalysisConfig) -> Regulation {
    match (row.log2_fold_change, row.p_value) {
        (Some(fc), Some(p)) if p < config.p_value_threshold => {
            if fc > config.fold_change_threshold {
                Regulation::Up
            } else if fc < -config.fold_change_threshold {
                Regulation::Down
            } else {
                Regulation::Unchanged
            }
        }
        _ => Regulation::Unchanged,
    }
}

/// Regulation tally for one comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegulationCounts {
    /// Up-regulated proteins
    pub up: usize,
    /// Down-regulated proteins
    pub down: usize,
    /// Unchanged proteins
    pub unchanged: usize,
}

impl RegulationCounts {
    fn add(&mut self, regulation: Regulation) {
        match regulation {
            Regulation::Up => self.up += 1,
            Regulation::Down => self.down += 1,
            Regulation::Unchanged => self.unchanged += 1,
        }
    }
}

/// Tally regulation calls per comparison, keyed by comparison identifier
pub fn regulation_counts(
    table: &ComparisonTable,
    config: &AnalysisConfig,
) -> BTreeMap<String, RegulationCounts> {
    let mut counts: BTreeMap<String, RegulationCounts> = BTreeMap::new();
    for row in table.rows() {
        counts
            .entry(row.comparison.to_string())
            .or_default()
            .add(classify(row, config));
    }
    counts
}
