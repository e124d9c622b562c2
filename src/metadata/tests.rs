use super::*;
use crate::export::fixtures::{export, export_with};

#[test]
fn test_build_metadata() {
    let metadata = build_metadata(&export()).unwrap();

    assert_eq!(metadata.len(), 4);
    assert_eq!(metadata.samples().collect::<Vec<_>>(), vec!["s1", "s2", "s3", "s4"]);
    assert_eq!(metadata.groups(), vec!["Ctrl", "Treat"]);
    assert_eq!(metadata.group_of("s1"), Some("Ctrl"));
    assert_eq!(metadata.group_of("s4"), Some("Treat"));
    assert_eq!(metadata.group_of("s9"), None);
    assert!(metadata.has_group("Treat"));
    assert!(!metadata.has_group("KO"));
    assert_eq!(metadata.entries()[0].raw_label, "jdoe_s1_R1");
}

#[test]
fn test_build_metadata_idempotent() {
    let raw = export();
    let first = build_metadata(&raw).unwrap();
    let second = build_metadata(&raw).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_blank_sample_labels_skipped() {
    let raw = export_with(
        &["Protein IDs", "jdoe_s1_23_001", "jdoe_s2_23_001"],
        &["", "jdoe_s1_R1", ""],
        &["", "Ctrl", "Treat"],
    );
    let metadata = build_metadata(&raw).unwrap();
    assert_eq!(metadata.len(), 1);
    assert!(metadata.contains("s1"));
    assert!(!metadata.contains("s2"));
}

#[test]
fn test_group_labels_normalized() {
    let raw = export_with(
        &["Protein IDs", "jdoe_s1_23_001", "jdoe_s2_23_001"],
        &["", "jdoe_s1_R1", "jdoe_s2_R1"],
        &["", "Group-A", " Group-B "],
    );
    let metadata = build_metadata(&raw).unwrap();
    assert_eq!(metadata.groups(), vec!["Group_A", "Group_B"]);
}

#[test]
fn test_duplicate_labels_deduplicated() {
    let raw = export_with(
        &["Protein IDs", "jdoe_s1_23_001", "number_peptides_jdoe_s1_23_001"],
        &["", "jdoe_s1_R1", "jdoe_s1_R1"],
        &["", "Ctrl", "Ctrl"],
    );
    let metadata = build_metadata(&raw).unwrap();
    assert_eq!(metadata.len(), 1);
}

#[test]
fn test_conflicting_groups_rejected() {
    let raw = export_with(
        &["Protein IDs", "jdoe_s1_23_001", "jdoe_s1_23_001b"],
        &["", "jdoe_s1_R1", "jdoe_s1_R2"],
        &["", "Ctrl", "Treat"],
    );
    match build_metadata(&raw) {
        Err(PipelineError::ConflictingGroup {
            sample,
            first,
            second,
        }) => {
            assert_eq!(sample, "s1");
            assert_eq!(first, "Ctrl");
            assert_eq!(second, "Treat");
        }
        other => panic!("expected ConflictingGroup, got {other:?}"),
    }
}

#[test]
fn test_missing_annotation_rows() {
    let text = "Protein IDs\tjdoe_s1_23_001\n#!{Sample}\tjdoe_s1_R1\nP1\t1";
    let raw = RawExport::from_reader(text.as_bytes()).unwrap();
    assert!(matches!(
        build_metadata(&raw),
        Err(PipelineError::MalformedInput(_))
    ));

    let text = "Protein IDs\tjdoe_s1_23_001\n#!{Group}\tCtrl\nP1\t1";
    let raw = RawExport::from_reader(text.as_bytes()).unwrap();
    assert!(matches!(
        build_metadata(&raw),
        Err(PipelineError::MalformedInput(_))
    ));
}

#[test]
fn test_labelled_sample_without_group() {
    let raw = export_with(
        &["Protein IDs", "jdoe_s1_23_001"],
        &["", "jdoe_s1_R1"],
        &["", ""],
    );
    assert!(matches!(
        build_metadata(&raw),
        Err(PipelineError::MalformedInput(_))
    ));
}

#[test]
fn test_label_without_sample_segment() {
    assert!(sample_from_label("s1").is_err());
    assert!(sample_from_label("jdoe__R1").is_err());
    assert_eq!(sample_from_label("jdoe_s1").unwrap(), "s1");
    assert_eq!(sample_from_label("jdoe_s1_R1_extra").unwrap(), "s1");
}

#[test]
fn test_from_labels() {
    let metadata =
        SampleMetadata::from_labels([("jdoe_a_R1", "WT"), ("jdoe_b_R1", "KO")]).unwrap();
    assert_eq!(metadata.groups(), vec!["WT", "KO"]);
    assert_eq!(metadata.group_of("b"), Some("KO"));
}
