//! Accessor naming tests over derived class specifications

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::path::PathBuf;

use xsdclass::builder::{class_name, file_token, plural_literal};
use xsdclass::{AccessorKind, SpecGenerator};

fn compound_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/compound.xsd")
}

#[test]
fn test_compounddef_accessors() {
    let dir = tempfile::tempdir().unwrap();
    let document = SpecGenerator::new(dir.path().join("spec.json"))
        .generate(&[compound_fixture()])
        .unwrap();
    let spec = document
        .schema("compound")
        .and_then(|s| s.named_type("compounddefType"))
        .unwrap();

    let names: Vec<_> = spec.accessors().into_iter().map(|a| a.name).collect();
    assert_eq!(
        names,
        vec![
            "get_id",
            "get_kind",
            "get_final",
            "get_briefdescription",
            "get_compoundname",
            "get_title",
            "get_sectiondefs",
            "get_sectiondef_public_funcs",
            "get_sectiondef_public_attribs",
            "get_sectiondef_friends",
        ]
    );
}

#[test]
fn test_filtered_accessors_carry_predicates() {
    let dir = tempfile::tempdir().unwrap();
    let document = SpecGenerator::new(dir.path().join("spec.json"))
        .generate(&[compound_fixture()])
        .unwrap();
    let spec = document
        .schema("compound")
        .and_then(|s| s.named_type("DoxygenType"))
        .unwrap();

    let filtered: Vec<_> = spec
        .accessors()
        .into_iter()
        .filter(|a| a.kind == AccessorKind::FilteredCollection)
        .map(|a| (a.name, a.xpath.unwrap_or_default()))
        .collect();
    assert_eq!(filtered[0].0, "get_compounddef_classes");
    assert_eq!(filtered[0].1, "compounddef[@kind=\"class\"]");
    assert_eq!(filtered.len(), 4);
}

proptest! {
    #[test]
    fn prop_class_name_only_changes_first_character(name in "[a-z][a-zA-Z0-9]{0,12}") {
        let class = class_name(&name);
        prop_assert_eq!(&class[1..], &name[1..]);
        prop_assert!(class.chars().next().unwrap().is_ascii_uppercase());
    }

    #[test]
    fn prop_file_token_is_lowercase(name in "[a-zA-Z][a-zA-Z0-9]{0,12}") {
        let token = file_token(&name);
        prop_assert!(!token.chars().any(|c| c.is_ascii_uppercase()));
        prop_assert!(!token.starts_with('_'));
    }

    #[test]
    fn prop_invalid_literals_are_rejected(literal in "[A-Z ][a-zA-Z ]{0,8}") {
        prop_assert!(plural_literal(&literal).is_err());
    }
}
