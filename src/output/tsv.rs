use std::io::Write;

use csv::WriterBuilder;

use super::columns;
use super::TableWriterError;
use crate::analysis::{classify, AnalysisConfig, CorrelationMatrix, VariationTable};
use crate::tables::{ComparisonTable, GroupLevelTable, SampleLevelTable};

// Missing values are written as empty cells.
fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_records<W, I>(writer: W, header: &[&str], records: I) -> Result<usize, TableWriterError>
where
    W: Write,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    wtr.write_record(header)?;
    let mut written = 0;
    for record in records {
        wtr.write_record(&record)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// Write the sample-level table, returning the rows written
pub fn write_sample_level<W: Write>(
    writer: W,
    table: &SampleLevelTable,
) -> Result<usize, TableWriterError> {
    let header = [
        columns::PROTEIN_INDEX,
        columns::ACCESSION,
        columns::GENE,
        columns::PROTEIN_NAME,
        columns::SAMPLE,
        columns::GROUP,
        columns::ABUNDANCE,
        columns::LOG2_ABUNDANCE,
        columns::PEPTIDE_COUNT,
    ];
    let records = table.rows().iter().map(|row| {
        vec![
            row.protein_index.to_string(),
            row.accession.clone(),
            opt(row.gene.as_deref()),
            opt(row.protein_name.as_deref()),
            row.sample.clone(),
            opt(row.group.as_deref()),
            opt(row.abundance),
            opt(row.log2_abundance),
            opt(row.peptide_count),
        ]
    });
    write_records(writer, &header, records)
}

/// Write the group-level table, returning the rows written
pub fn write_group_level<W: Write>(
    writer: W,
    table: &GroupLevelTable,
) -> Result<usize, TableWriterError> {
    let header = [
        columns::PROTEIN_INDEX,
        columns::ACCESSION,
        columns::GENE,
        columns::PROTEIN_NAME,
        columns::GROUP,
        columns::MEDIAN_ABUNDANCE,
    ];
    let records = table.rows().iter().map(|row| {
        vec![
            row.protein_index.to_string(),
            row.accession.clone(),
            opt(row.gene.as_deref()),
            opt(row.protein_name.as_deref()),
            row.group.clone(),
            opt(row.median_abundance),
        ]
    });
    write_records(writer, &header, records)
}

/// Write the comparison table with regulation calls, returning the rows written
pub fn write_comparisons<W: Write>(
    writer: W,
    table: &ComparisonTable,
    analysis: &AnalysisConfig,
) -> Result<usize, TableWriterError> {
    let header = [
        columns::PROTEIN_INDEX,
        columns::ACCESSION,
        columns::GENE,
        columns::PROTEIN_NAME,
        columns::COMPARISON,
        columns::LOG2_FOLD_CHANGE,
        columns::P_VALUE,
        columns::REGULATION,
    ];
    let records = table.rows().iter().map(|row| {
        vec![
            row.protein_index.to_string(),
            row.accession.clone(),
            opt(row.gene.as_deref()),
            opt(row.protein_name.as_deref()),
            row.comparison.to_string(),
            opt(row.log2_fold_change),
            opt(row.p_value),
            classify(row, analysis).to_string(),
        ]
    });
    write_records(writer, &header, records)
}

/// Write the variation table, returning the rows written
pub fn write_variation<W: Write>(
    writer: W,
    table: &VariationTable,
) -> Result<usize, TableWriterError> {
    let header = [
        columns::PROTEIN_INDEX,
        columns::ACCESSION,
        columns::GROUP,
        columns::N,
        columns::CV_PERCENT,
    ];
    let records = table.rows.iter().map(|row| {
        vec![
            row.protein_index.to_string(),
            row.accession.clone(),
            row.group.clone(),
            row.n.to_string(),
            opt(row.cv_percent),
        ]
    });
    write_records(writer, &header, records)
}

/// Write the correlation matrix as a square table, returning the rows written
pub fn write_correlation<W: Write>(
    writer: W,
    matrix: &CorrelationMatrix,
) -> Result<usize, TableWriterError> {
    let mut header: Vec<&str> = vec![columns::SAMPLE];
    header.extend(matrix.samples.iter().map(String::as_str));

    let records = matrix.samples.iter().zip(&matrix.values).map(|(sample, row)| {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(sample.clone());
        record.extend(row.iter().map(|r| opt(*r)));
        record
    });
    write_records(writer, &header, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Regulation;
    use crate::export::Comparison;
    use crate::tables::{ComparisonRow, ProteinAnnotation, SampleRow};

    fn protein() -> ProteinAnnotation {
        ProteinAnnotation {
            accession: "P12345".to_string(),
            gene: Some("ALB".to_string()),
            protein_name: None,
        }
    }

    #[test]
    fn test_sample_level_missing_values_are_empty() {
        let table = SampleLevelTable::new(vec![
            SampleRow::new(0, &protein(), "S1", Some("Ctrl"), Some(8.0), Some(3)),
            SampleRow::new(0, &protein(), "S9", None, None, None),
        ]);
        let mut buf = Vec::new();
        let written = write_sample_level(&mut buf, &table).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "protein_index\taccession\tgene\tprotein_name\tsample\tgroup\tabundance\tlog2_abundance\tpeptide_count"
        );
        assert_eq!(lines[1], "0\tP12345\tALB\t\tS1\tCtrl\t8\t3\t3");
        assert_eq!(lines[2], "0\tP12345\tALB\t\tS9\t\t\t\t");
    }

    #[test]
    fn test_comparisons_carry_regulation() {
        let row = ComparisonRow {
            protein_index: 0,
            accession: "P12345".to_string(),
            gene: None,
            protein_name: None,
            comparison: Comparison::new("Treat", "Ctrl"),
            log2_fold_change: Some(1.5),
            p_value: Some(0.01),
        };
        let config = AnalysisConfig::default();
        assert_eq!(classify(&row, &config), Regulation::Up);

        let mut buf = Vec::new();
        write_comparisons(&mut buf, &ComparisonTable::new(vec![row]), &config).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with("Treat/Ctrl\t1.5\t0.01\tup"));
    }

    #[test]
    fn test_correlation_is_square() {
        let matrix = CorrelationMatrix {
            samples: vec!["S1".to_string(), "S2".to_string()],
            values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
        };
        let mut buf = Vec::new();
        assert_eq!(write_correlation(&mut buf, &matrix).unwrap(), 2);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "sample\tS1\tS2\nS1\t1\t\nS2\t\t1\n");
    }
}
