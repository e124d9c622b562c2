//! Small two-group export shared by the unit tests.

use super::{ColumnConventions, ExportLayout, RawExport, RunNaming};

pub(crate) const RESEARCHER: &str = "jdoe";
pub(crate) const WORK_ORDER: &str = "23_001";

pub(crate) const HEADER: [&str; 15] = [
    "Protein IDs",
    "Gene names",
    "Protein names",
    "jdoe_s1_23_001",
    "jdoe_s2_23_001",
    "jdoe_s3_23_001",
    "jdoe_s4_23_001",
    "number_peptides_jdoe_s1_23_001",
    "number_peptides_jdoe_s2_23_001",
    "number_peptides_jdoe_s3_23_001",
    "number_peptides_jdoe_s4_23_001",
    "Ctrl",
    "Treat",
    "p value Treat/Ctrl",
    "difference Treat/Ctrl",
];

const SAMPLE_ROW: [&str; 15] = [
    "#!{Sample}", "", "", "jdoe_s1_R1", "jdoe_s2_R1", "jdoe_s3_R1", "jdoe_s4_R1",
    "", "", "", "", "", "", "", "",
];

const GROUP_ROW: [&str; 15] = [
    "#!{C:Group}", "", "", "Ctrl", "Ctrl", "Treat", "Treat",
    "", "", "", "", "", "", "", "",
];

const PROTEIN_ROWS: [[&str; 15]; 2] = [
    [
        "P12345", "ALB", "Serum albumin", "10", "100", "8", "NaN",
        "3", "4", "2", "0", "55", "8", "0.01", "1.5",
    ],
    [
        "Q99999", "", "", "0", "20", "40", "80",
        "1", "2", "3", "4", "10", "60", "0.2", "-0.3",
    ],
];

pub(crate) fn line(cells: &[&str]) -> String {
    cells.join("\t")
}

/// The export as tab-separated text
pub(crate) fn export_text() -> String {
    let mut lines = vec![line(&HEADER), line(&SAMPLE_ROW), line(&GROUP_ROW)];
    lines.extend(PROTEIN_ROWS.iter().map(|row| line(row)));
    lines.join("\n")
}

pub(crate) fn naming() -> RunNaming {
    RunNaming::new(RESEARCHER, WORK_ORDER)
}

pub(crate) fn export() -> RawExport {
    RawExport::from_reader(export_text().as_bytes()).unwrap()
}

pub(crate) fn layout(raw: &RawExport) -> ExportLayout {
    ExportLayout::describe(raw.header(), &ColumnConventions::default(), &naming()).unwrap()
}

/// Export built from explicit header and annotation cells, no protein rows
pub(crate) fn export_with(header: &[&str], samples: &[&str], groups: &[&str]) -> RawExport {
    export_with_rows(header, samples, groups, &[])
}

/// Export built from explicit header, annotation and protein cells
pub(crate) fn export_with_rows(
    header: &[&str],
    samples: &[&str],
    groups: &[&str],
    rows: &[&[&str]],
) -> RawExport {
    let mut lines = vec![
        line(header),
        format!("#!{{Sample}}{}", line(samples)),
        format!("#!{{Group}}{}", line(groups)),
    ];
    lines.extend(rows.iter().map(|row| line(row)));
    RawExport::from_reader(lines.join("\n").as_bytes()).unwrap()
}
