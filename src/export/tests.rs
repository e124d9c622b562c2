use super::fixtures::{self, export, export_with, line, naming, HEADER};
use super::*;

#[test]
fn test_export_parsing() {
    let raw = export();

    assert_eq!(raw.column_count(), HEADER.len());
    assert_eq!(raw.protein_count(), 2);
    assert_eq!(raw.annotation_rows().len(), 2);
    assert_eq!(raw.header()[3], "jdoe_s1_23_001");
    assert_eq!(raw.cell(0, 0), "P12345");
    assert_eq!(raw.cell(1, 1), "");
}

#[test]
fn test_annotation_tags_case_insensitive() {
    let raw = export();

    let samples = raw.annotation_row("SAMPLE").unwrap();
    assert_eq!(samples.tag, "Sample");
    assert_eq!(samples.cells[3], "jdoe_s1_R1");
    assert_eq!(samples.cells[0], "");

    // `C:` categorical prefix is ignored
    let groups = raw.annotation_row(GROUP_TAG).unwrap();
    assert_eq!(groups.tag, "C:Group");
    assert_eq!(groups.normalized_tag(), "group");
    assert_eq!(groups.cells[5], "Treat");

    assert!(raw.annotation_row("Type").is_none());
}

#[test]
fn test_missing_markers() {
    let raw = export();
    assert_eq!(raw.numeric(0, 3).unwrap(), Some(10.0));
    assert_eq!(raw.numeric(0, 6).unwrap(), None); // NaN

    for marker in ["", "NaN", "nan", "NA", "#N/A", " NA "] {
        assert_eq!(parse_numeric(marker), Some(None), "marker {marker:?}");
    }
    assert_eq!(parse_numeric("-0.3"), Some(Some(-0.3)));
    assert_eq!(parse_numeric("1e3"), Some(Some(1000.0)));
    assert_eq!(parse_numeric("high"), None);
}

#[test]
fn test_infinite_values_are_missing() {
    for marker in ["inf", "-inf", "Infinity", "-Infinity", "1e400"] {
        assert_eq!(parse_numeric(marker), Some(None), "marker {marker:?}");
    }
}

#[test]
fn test_invalid_numeric_reports_position() {
    let raw = RawExport::from_parts(
        vec!["Protein IDs".to_string(), "jdoe_s1_23_001".to_string()],
        Vec::new(),
        vec![
            vec!["P1".to_string(), "1.0".to_string()],
            vec!["P2".to_string(), "n/a?".to_string()],
        ],
    );

    match raw.numeric(1, 1) {
        Err(PipelineError::InvalidValue { row, column, value }) => {
            assert_eq!(row, 2);
            assert_eq!(column, "jdoe_s1_23_001");
            assert_eq!(value, "n/a?");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn test_short_rows_padded_and_blank_rows_skipped() {
    let text = [
        line(&["Protein IDs", "Gene names", "jdoe_s1_23_001"]),
        line(&["P1"]),
        String::new(),
        line(&["", "", ""]),
        line(&["P2", "GENE2", "5", "extra"]),
    ]
    .join("\n");
    let raw = RawExport::from_reader(text.as_bytes()).unwrap();

    assert_eq!(raw.protein_count(), 2);
    assert_eq!(raw.cell(0, 2), "");
    assert_eq!(raw.numeric(0, 2).unwrap(), None);
    assert_eq!(raw.cell(1, 1), "GENE2");
    assert_eq!(raw.cell(1, 3), "");
}

#[test]
fn test_quotes_are_literal() {
    let text = [
        line(&["Protein IDs", "Protein names"]),
        line(&["P1", "Protein \"X\" homolog"]),
    ]
    .join("\n");
    let raw = RawExport::from_reader(text.as_bytes()).unwrap();
    assert_eq!(raw.cell(0, 1), "Protein \"X\" homolog");
}

#[test]
fn test_empty_header_rejected() {
    let result = RawExport::from_reader("\t\t\nP1\t1\t2".as_bytes());
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}

#[test]
fn test_strip_run_qualifiers_abundance() {
    let keys = strip_run_qualifiers(
        BlockKind::Abundance,
        &["jdoe_s1_23_001", "jdoe_s2_23_001"],
        &naming(),
        None,
    )
    .unwrap();
    assert_eq!(keys, vec!["s1", "s2"]);
}

#[test]
fn test_strip_keeps_inner_underscores() {
    let keys = strip_run_qualifiers(
        BlockKind::Abundance,
        &["jdoe_liver_2_23_001"],
        &naming(),
        None,
    )
    .unwrap();
    assert_eq!(keys, vec!["liver_2"]);
}

#[test]
fn test_strip_required_qualifier_missing() {
    let result = strip_run_qualifiers(
        BlockKind::PeptideCount,
        &["number_peptides_s1_23_001"],
        &naming(),
        Some("number_peptides_"),
    );
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));

    let result = strip_run_qualifiers(
        BlockKind::PeptideCount,
        &["jdoe_s1_23_001"],
        &naming(),
        Some("number_peptides_"),
    );
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}

#[test]
fn test_strip_optional_qualifiers() {
    let keys = strip_run_qualifiers(
        BlockKind::PValue,
        &["p value Treat/Ctrl", "p value jdoe_KO/WT_23_001"],
        &naming(),
        Some("p value "),
    )
    .unwrap();
    assert_eq!(keys, vec!["Treat/Ctrl", "KO/WT"]);
}

#[test]
fn test_strip_nothing_left() {
    let result = strip_run_qualifiers(BlockKind::GroupMedian, &["jdoe__23_001"], &naming(), None);
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}

#[test]
fn test_strip_collision() {
    let result = strip_run_qualifiers(
        BlockKind::GroupMedian,
        &["Ctrl", "jdoe_Ctrl_23_001"],
        &naming(),
        None,
    );
    match result {
        Err(PipelineError::AmbiguousKey {
            block,
            key,
            first,
            second,
        }) => {
            assert_eq!(block, BlockKind::GroupMedian);
            assert_eq!(key, "Ctrl");
            assert_eq!(first, "Ctrl");
            assert_eq!(second, "jdoe_Ctrl_23_001");
        }
        other => panic!("expected AmbiguousKey, got {other:?}"),
    }
}

#[test]
fn test_run_naming_tokens() {
    let naming = naming();
    assert_eq!(naming.researcher_token(), "jdoe_");
    assert_eq!(naming.work_order_token(), "_23_001");
    assert_eq!(naming.qualify("s1"), "jdoe_s1_23_001");
}

#[test]
fn test_normalize_group() {
    assert_eq!(normalize_group(" Group-A "), "Group_A");
    assert_eq!(normalize_group("WT"), "WT");
}

#[test]
fn test_comparison_parse() {
    let comparison = Comparison::parse("KO-1_vs_WT", "_vs_").unwrap();
    assert_eq!(comparison.numerator, "KO_1");
    assert_eq!(comparison.denominator, "WT");
    assert_eq!(comparison.to_string(), "KO_1/WT");
    assert_eq!(serde_json::to_string(&comparison).unwrap(), "\"KO_1/WT\"");

    assert!(Comparison::parse("KO", "/").is_err());
    assert!(Comparison::parse("KO/", "/").is_err());
    assert!(Comparison::parse("A/B/C", "/").is_err());
}

#[test]
fn test_layout_classification() {
    let raw = export();
    let layout = fixtures::layout(&raw);

    assert_eq!(layout.accession_column(), 0);
    assert_eq!(layout.gene_column(), Some(1));
    assert_eq!(layout.protein_name_column(), Some(2));

    assert_eq!(layout.keys(BlockKind::Abundance), vec!["s1", "s2", "s3", "s4"]);
    assert_eq!(layout.keys(BlockKind::PeptideCount), vec!["s1", "s2", "s3", "s4"]);
    assert_eq!(layout.keys(BlockKind::GroupMedian), vec!["Ctrl", "Treat"]);
    assert_eq!(layout.keys(BlockKind::PValue), vec!["Treat/Ctrl"]);
    assert_eq!(layout.keys(BlockKind::Difference), vec!["Treat/Ctrl"]);

    let comparisons = layout.comparisons(BlockKind::PValue);
    assert_eq!(comparisons.len(), 1);
    assert_eq!(comparisons[0].numerator, "Treat");
    assert_eq!(comparisons[0].denominator, "Ctrl");

    let kinds: Vec<ColumnKind> = layout.columns().iter().map(|c| c.kind).collect();
    assert_eq!(kinds[0], ColumnKind::Annotation(AnnotationField::Accession));
    assert_eq!(kinds[7], ColumnKind::Measurement(BlockKind::PeptideCount));
    assert_eq!(kinds[11], ColumnKind::Measurement(BlockKind::GroupMedian));
    assert_eq!(kinds[14], ColumnKind::Measurement(BlockKind::Difference));
}

#[test]
fn test_layout_ignored_columns() {
    let header = ["Protein IDs", "Score", "jdoe_s1_23_001", "Ctrl", ""];
    let mut conventions = ColumnConventions::default();

    let layout = ExportLayout::describe(&header, &conventions, &naming()).unwrap();
    assert_eq!(layout.keys(BlockKind::GroupMedian), vec!["Score", "Ctrl"]);
    assert_eq!(layout.columns()[4].kind, ColumnKind::Ignored);

    conventions.ignored_columns.push("Score".to_string());
    let layout = ExportLayout::describe(&header, &conventions, &naming()).unwrap();
    assert_eq!(layout.keys(BlockKind::GroupMedian), vec!["Ctrl"]);
    assert_eq!(layout.columns()[1].kind, ColumnKind::Ignored);
    assert_eq!(layout.columns()[1].key, None);
}

#[test]
fn test_layout_group_normalization_collision() {
    let header = ["Protein IDs", "jdoe_s1_23_001", "Group-A", "Group_A"];
    let result = ExportLayout::describe(&header, &ColumnConventions::default(), &naming());
    assert!(matches!(
        result,
        Err(PipelineError::AmbiguousKey {
            block: BlockKind::GroupMedian,
            ..
        })
    ));
}

#[test]
fn test_layout_comparison_normalization_collision() {
    let header = [
        "Protein IDs",
        "jdoe_s1_23_001",
        "p value KO-1/WT",
        "p value KO_1/WT",
    ];
    let result = ExportLayout::describe(&header, &ColumnConventions::default(), &naming());
    assert!(matches!(
        result,
        Err(PipelineError::AmbiguousKey {
            block: BlockKind::PValue,
            ..
        })
    ));
}

#[test]
fn test_layout_custom_comparison_delimiter() {
    let header = ["Protein IDs", "jdoe_s1_23_001", "difference KO_vs_WT"];
    let conventions = ColumnConventions {
        comparison_delimiter: "_vs_".to_string(),
        ..ColumnConventions::default()
    };
    let layout = ExportLayout::describe(&header, &conventions, &naming()).unwrap();
    assert_eq!(layout.keys(BlockKind::Difference), vec!["KO/WT"]);
}

#[test]
fn test_layout_malformed_comparison() {
    let header = ["Protein IDs", "jdoe_s1_23_001", "p value KOvsWT"];
    let result = ExportLayout::describe(&header, &ColumnConventions::default(), &naming());
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}

#[test]
fn test_layout_requires_accession_and_abundance() {
    let conventions = ColumnConventions::default();

    let result = ExportLayout::describe(&["Gene names", "jdoe_s1_23_001"], &conventions, &naming());
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));

    let result = ExportLayout::describe(&["Protein IDs", "Ctrl"], &conventions, &naming());
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}

#[test]
fn test_layout_rejects_empty_naming() {
    let result = ExportLayout::describe(
        &HEADER,
        &ColumnConventions::default(),
        &RunNaming::new("", "23_001"),
    );
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}

#[test]
fn test_layout_wrong_work_order_is_malformed() {
    // A researcher-prefixed column with a bad work order must not fall
    // through to the group medians, for either sample block
    let conventions = ColumnConventions::default();
    for header in [
        ["Protein IDs", "jdoe_s1_23_001", "jdoe_s2_23_01", "number_peptides_jdoe_s1_23_001"],
        ["Protein IDs", "jdoe_s1_23_001", "jdoe_s2_23_001", "number_peptides_jdoe_s2_23_01"],
        ["Protein IDs", "jdoe_s1_23_001", "jdoe_s1_24_777", "number_peptides_jdoe_s1_23_001"],
    ] {
        match ExportLayout::describe(&header, &conventions, &naming()) {
            Err(PipelineError::MalformedInput(msg)) => {
                assert!(msg.contains("missing the work order suffix '_23_001'"), "{msg}");
            }
            other => panic!("{header:?}: expected MalformedInput, got {other:?}"),
        }
    }
}

#[test]
fn test_layout_researcher_only_column_is_malformed() {
    let result = ExportLayout::describe(
        &["Protein IDs", "jdoe_s1_23_001", "jdoe__23_001"],
        &ColumnConventions::default(),
        &naming(),
    );
    assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
}
