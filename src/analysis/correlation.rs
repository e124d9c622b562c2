use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::tables::SampleLevelTable;

/// Symmetric sample × sample Pearson correlation of log2 abundances
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Samples, in table order
    pub samples: Vec<String>,
    /// `values[i][j]` correlates `samples[i]` with `samples[j]`
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two samples by name
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.samples.iter().position(|s| s == a)?;
        let j = self.samples.iter().position(|s| s == b)?;
        self.values[i][j]
    }
}

/// Pearson correlation over proteins measured in both samples.
///
/// A pair with fewer than two shared proteins, or with zero variance on either
/// side, gets `None`.
pub fn sample_correlation(table: &SampleLevelTable) -> CorrelationMatrix {
    let samples: Vec<String> = table.samples().into_iter().map(str::to_string).collect();
    let position: HashMap<&str, usize> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| (s.as_str(), i))
        .collect();

    let mut by_protein: BTreeMap<usize, Vec<Option<f64>>> = BTreeMap::new();
    for row in table.rows() {
        let column = position[row.sample.as_str()];
        by_protein
            .entry(row.protein_index)
            .or_insert_with(|| vec![None; samples.len()])[column] = row.log2_abundance;
    }
    let profiles: Vec<&Vec<Option<f64>>> = by_protein.values().collect();

    let n = samples.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let pairs: Vec<(f64, f64)> = profiles
                .iter()
                .filter_map(|p| p[i].zip(p[j]))
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { samples, values }
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ProteinAnnotation, SampleRow};

    fn table(profiles: &[(&str, [Option<f64>; 3])]) -> SampleLevelTable {
        let mut rows = Vec::new();
        for protein_index in 0..3 {
            let protein = ProteinAnnotation {
                accession: format!("P{protein_index}"),
                gene: None,
                protein_name: None,
            };
            for (sample, values) in profiles {
                rows.push(SampleRow::new(
                    protein_index,
                    &protein,
                    sample,
                    Some("G"),
                    values[protein_index],
                    None,
                ));
            }
        }
        SampleLevelTable::new(rows)
    }

    #[test]
    fn test_sample_correlation() {
        let table = table(&[
            ("s1", [Some(2.0), Some(4.0), Some(8.0)]),
            ("s2", [Some(4.0), Some(8.0), Some(16.0)]),
            ("s3", [Some(8.0), Some(4.0), Some(2.0)]),
        ]);
        let matrix = sample_correlation(&table);

        assert_eq!(matrix.samples, vec!["s1", "s2", "s3"]);
        assert!((matrix.get("s1", "s2").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("s1", "s3").unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(matrix.get("s1", "s1"), Some(1.0));
        assert_eq!(matrix.get("s2", "s1"), matrix.get("s1", "s2"));
        assert_eq!(matrix.get("s1", "missing"), None);
    }

    #[test]
    fn test_correlation_needs_shared_proteins() {
        let table = table(&[
            ("s1", [Some(2.0), None, Some(0.0)]),
            ("s2", [Some(4.0), Some(8.0), Some(16.0)]),
            ("s3", [Some(4.0), Some(4.0), Some(4.0)]),
        ]);
        let matrix = sample_correlation(&table);

        // one pair left after dropping the missing and the non-positive abundance
        assert_eq!(matrix.get("s1", "s2"), None);
        // zero variance
        assert_eq!(matrix.get("s2", "s3"), None);
    }
}
