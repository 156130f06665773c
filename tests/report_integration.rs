//! Integration tests for report assembly over symbol snapshots.
//!
//! These tests load `testdata/snapshot.yaml` through the snapshot provider
//! and check the rendered report against the expected markup.

use std::path::PathBuf;

use apiskel::model::{BaseTypeRef, ClassSymbol, MemberKind, TypeArgSymbol};
use apiskel::provider::{SnapshotProvider, SymbolProvider};
use apiskel::report::{build_report, build_sections, Markup, ReportError};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load_project(name: &str) -> Vec<ClassSymbol> {
    let provider = SnapshotProvider::from_file(testdata_path().join("snapshot.yaml"))
        .expect("should load snapshot");
    provider.list_classes(name).expect("project should exist")
}

fn my_class() -> ClassSymbol {
    ClassSymbol::new("MyClass").with_base(BaseTypeRef::generic(vec![
        TypeArgSymbol::new("Business", true)
            .with_member("Get", MemberKind::Method)
            .with_member("Set", MemberKind::Method),
        TypeArgSymbol::new("Dto", false)
            .with_member("Id", MemberKind::Property)
            .with_member("Name", MemberKind::Property),
    ]))
}

#[test]
fn test_snapshot_report_matches_expected() {
    let classes = load_project("Shop.Api");
    let report = build_report(&classes, &Markup::html()).expect("report should build");

    let expected = std::fs::read_to_string(testdata_path().join("expected/shop_api.html"))
        .expect("should read expected report");
    assert_eq!(report, expected);
}

#[test]
fn test_report_is_deterministic() {
    let classes = load_project("Shop.Api");
    let first = build_report(&classes, &Markup::html()).unwrap();
    let second = build_report(&classes, &Markup::html()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_input_has_no_sections() {
    assert!(build_sections(&[]).unwrap().is_empty());
    assert_eq!(build_report(&[], &Markup::html()).unwrap(), "");
}

#[test]
fn test_class_without_base_has_single_empty_table() {
    let report = build_report(&[ClassSymbol::new("Lonely")], &Markup::html()).unwrap();

    assert_eq!(report.matches("<table>").count(), 1);
    assert_eq!(report.matches("</table>").count(), 1);
    assert!(!report.contains("API with"));
    assert!(!report.contains("used as data structure"));
}

#[test]
fn test_business_and_dto_rows_in_order() {
    let report = build_report(&[my_class()], &Markup::html()).unwrap();

    let positions: Vec<usize> = [
        "\"MyClass\" API with \"Business\" interface",
        "<tr><td>Get: </td><td></td></tr>",
        "<tr><td>Set: </td><td></td></tr>",
        "\"Dto\" used as data structure",
        "<tr><td>Id: </td><td></td></tr>",
        "<tr><td>Name: </td><td></td></tr>",
    ]
    .iter()
    .map(|needle| {
        report
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?} in report", needle))
    })
    .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted, "rows out of order");
}

#[test]
fn test_memberless_argument_never_appears() {
    let classes = load_project("Shop.Api");
    let report = build_report(&classes, &Markup::html()).unwrap();

    assert!(!report.contains("<tr><td>int"));
    // Business's property and Dto's method are filtered by kind
    assert!(!report.contains("Count: "));
    assert!(!report.contains("Validate: "));
}

#[test]
fn test_reordering_input_reorders_output() {
    let markup = Markup::html();
    let a = my_class();
    let b = ClassSymbol::new("Other").with_property("IClock");

    let forward = build_report(&[a.clone(), b.clone()], &markup).unwrap();
    let backward = build_report(&[b.clone(), a.clone()], &markup).unwrap();

    let a_text = build_report(&[a], &markup).unwrap();
    let b_text = build_report(&[b], &markup).unwrap();
    assert_eq!(forward, format!("{}{}", a_text, b_text));
    assert_eq!(backward, format!("{}{}", b_text, a_text));
}

#[test]
fn test_positional_mapping_ignores_abstractness() {
    // Shop.Admin declares the DTO first and the contract second
    let classes = load_project("Shop.Admin");
    let report = build_report(&classes, &Markup::html()).unwrap();

    assert!(report.contains("\"UsersController\" API with \"UserDto\" interface"));
    assert!(report.contains("\"IUserBusiness\" used as data structure"));
    // Extraction still follows abstractness
    assert!(report.contains("<tr><td>Invite: </td><td></td></tr>"));
    assert!(report.contains("<tr><td>Email: </td><td></td></tr>"));
}

#[test]
fn test_duplicates_are_kept() {
    let report = build_report(&[my_class(), my_class()], &Markup::html()).unwrap();
    assert_eq!(report.matches("\"MyClass\" API with").count(), 2);
}

#[test]
fn test_missing_type_arguments_fails_fast() {
    let classes = vec![
        my_class(),
        ClassSymbol::new("Wrapper").with_base(BaseTypeRef::generic(vec![TypeArgSymbol::new(
            "Item", false,
        )])),
    ];

    match build_report(&classes, &Markup::html()) {
        Err(ReportError::MissingTypeArguments { class, found }) => {
            assert_eq!(class, "Wrapper");
            assert_eq!(found, 1);
        }
        other => panic!("expected MissingTypeArguments, got {:?}", other),
    }
}
