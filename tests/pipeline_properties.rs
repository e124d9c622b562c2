//! Property-based tests for identifier recovery and sample-level assembly

use perseus_report::prelude::*;
use proptest::prelude::*;

fn abundance_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("NaN".to_string()),
        Just("0".to_string()),
        (-1.0e3f64..1.0e9).prop_map(|v| v.to_string()),
    ]
}

/// Export text with `samples` abundance columns, groups alternating A/B
fn export_text(naming: &RunNaming, samples: usize, cells: &[Vec<String>]) -> String {
    let names: Vec<String> = (0..samples).map(|i| naming.qualify(&format!("s{i}"))).collect();
    let labels: Vec<String> = (0..samples)
        .map(|i| format!("{}_s{i}_R1", naming.researcher))
        .collect();
    let groups: Vec<&str> = (0..samples).map(|i| if i % 2 == 0 { "A" } else { "B" }).collect();

    let mut lines = vec![
        format!("Protein IDs\t{}", names.join("\t")),
        format!("#!{{Sample}}\t{}", labels.join("\t")),
        format!("#!{{Group}}\t{}", groups.join("\t")),
    ];
    for (i, row) in cells.iter().enumerate() {
        lines.push(format!("P{i}\t{}", row.join("\t")));
    }
    lines.join("\n")
}

proptest! {
    /// Qualifying a sample and stripping it again yields the sample
    #[test]
    fn test_strip_inverts_qualify(
        researcher in "[a-z]{1,8}",
        work_order in "[0-9]{2}_[0-9]{3}",
        sample in "[A-Za-z0-9][A-Za-z0-9_]{0,11}",
    ) {
        let naming = RunNaming::new(researcher, work_order);
        let column = naming.qualify(&sample);

        let keys = strip_run_qualifiers(BlockKind::Abundance, &[column.as_str()], &naming, None).unwrap();
        prop_assert_eq!(&keys[0], &sample);

        let peptide_column = format!("number_peptides_{column}");
        let keys = strip_run_qualifiers(
            BlockKind::PeptideCount,
            &[peptide_column.as_str()],
            &naming,
            Some("number_peptides_"),
        ).unwrap();
        prop_assert_eq!(&keys[0], &sample);
    }

    /// Group normalization is idempotent and leaves no '-'
    #[test]
    fn test_normalize_group_idempotent(label in "[ A-Za-z0-9_-]{0,16}") {
        let once = normalize_group(&label);
        prop_assert!(!once.contains('-'));
        prop_assert_eq!(normalize_group(&once), once.clone());
    }

    /// Every protein × sample pair appears exactly once, in order
    #[test]
    fn test_sample_level_is_complete(
        (samples, cells) in (1usize..6).prop_flat_map(|samples| {
            (
                Just(samples),
                prop::collection::vec(prop::collection::vec(abundance_cell(), samples), 1..8),
            )
        })
    ) {
        let naming = RunNaming::new("jdoe", "23_001");
        let raw = RawExport::from_reader(export_text(&naming, samples, &cells).as_bytes()).unwrap();
        let tables = Pipeline::new(naming, PipelineConfig::default()).run(&raw).unwrap();

        prop_assert_eq!(tables.samples.len(), cells.len() * samples);
        prop_assert!(tables.samples.unmatched_samples().is_empty());
        for (i, row) in tables.samples.rows().iter().enumerate() {
            prop_assert_eq!(row.protein_index, i / samples);
            prop_assert_eq!(&row.sample, &format!("s{}", i % samples));
            let expected_group = if (i % samples) % 2 == 0 { "A" } else { "B" };
            prop_assert_eq!(row.group.as_deref(), Some(expected_group));
        }
    }

    /// log2 abundance is present exactly when the abundance is positive
    #[test]
    fn test_log2_null_iff_not_positive(
        cells in prop::collection::vec(prop::collection::vec(abundance_cell(), 3), 1..10)
    ) {
        let naming = RunNaming::new("jdoe", "23_001");
        let raw = RawExport::from_reader(export_text(&naming, 3, &cells).as_bytes()).unwrap();
        let tables = Pipeline::new(naming, PipelineConfig::default()).run(&raw).unwrap();

        for row in tables.samples.rows() {
            match (row.abundance, row.log2_abundance) {
                (Some(a), Some(log2)) => {
                    prop_assert!(a > 0.0);
                    prop_assert!((log2.exp2() - a).abs() <= a * 1e-9);
                }
                (Some(a), None) => prop_assert!(a <= 0.0),
                (None, log2) => prop_assert!(log2.is_none()),
            }
        }
    }
}
