//! Schema facade and resolution cache integration tests

use pretty_assertions::assert_eq;
use std::path::PathBuf;

use xsdclass::{ComponentKind, ElementKey, Error, ResolutionCache, Schema, TypeBinding};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn test_include_brings_in_simple_types() {
    let mut cache = ResolutionCache::new();
    let mut schema = Schema::from_file(fixture("compound.xsd"), &mut cache).unwrap();

    assert!(schema.xsd().simple_type("DoxMemberKind").is_some());
    let memberdef = schema.get_type("memberdefType").unwrap();
    assert_eq!(
        memberdef.attribute("kind").unwrap().enum_values(),
        ["define", "function", "variable", "typedef"]
    );
}

#[test]
fn test_compile_registers_everything() {
    let mut cache = ResolutionCache::new();
    {
        let mut schema = Schema::from_file(fixture("compound.xsd"), &mut cache).unwrap();
        schema.compile();
        assert!(schema.is_compiled());
    }

    assert!(cache.contains_group("docCmdGroup"));
    assert!(cache.contains_type("docSimpleSectType"));
    assert!(cache.contains_element(&ElementKey::new("doxygen", Some("DoxygenType"))));
    assert!(cache.contains_element(&ElementKey::new("para", Some("docParaType"))));
}

#[test]
fn test_recursive_groups_terminate() {
    let mut cache = ResolutionCache::new();
    let mut schema = Schema::from_file(fixture("compound.xsd"), &mut cache).unwrap();

    let group = schema.get_group("docCmdGroup").unwrap();
    let groups: Vec<_> = group.groups().iter().cloned().collect();
    assert_eq!(groups, vec!["docTitleCmdGroup".to_string()]);

    assert!(schema.cache().contains_group("docTitleCmdGroup"));
    assert!(schema.cache().contains_type("docMarkupType"));
}

#[test]
fn test_lookup_errors_leave_cache_untouched() {
    let mut cache = ResolutionCache::new();
    let mut schema = Schema::from_file(fixture("compound.xsd"), &mut cache).unwrap();

    match schema.get_type("noSuchType") {
        Err(Error::Lookup { kind, name }) => {
            assert_eq!(kind, ComponentKind::Type);
            assert_eq!(name, "noSuchType");
        }
        other => panic!("expected lookup error, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        schema.get_group("noSuchGroup"),
        Err(Error::Lookup { .. })
    ));
    assert!(matches!(
        schema.get_element("noSuchElement"),
        Err(Error::Lookup { .. })
    ));
    assert!(schema.cache().is_empty());
}

#[test]
fn test_element_bindings() {
    let mut cache = ResolutionCache::new();
    let mut schema = Schema::from_file(fixture("compound.xsd"), &mut cache).unwrap();

    let doxygen = schema.get_element("doxygen").unwrap();
    assert!(matches!(doxygen.binding(), TypeBinding::Named(name) if name == "DoxygenType"));

    let members = schema.get_element("listofallmembers").unwrap();
    assert!(matches!(members.binding(), TypeBinding::Owned(_)));
    assert_eq!(members.key().to_string(), "listofallmembers (anonymous type)");
    assert!(members.attribute("refid").is_some());
}

#[test]
fn test_definitions() {
    let mut cache = ResolutionCache::new();
    let mut schema = Schema::from_file(fixture("compound.xsd"), &mut cache).unwrap();

    let definition = schema.type_definition("sectiondefType").unwrap();
    assert!(definition.contains("sectiondefType"));
    assert!(definition.contains("memberdef"));

    let children = schema.group_element_definitions("docCmdGroup").unwrap();
    let names: Vec<_> = children.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["itemizedlist", "simplesect", "anchor"]);
    assert!(children["simplesect"].contains("docSimpleSectType"));

    let children = schema.type_element_definitions("memberdefType").unwrap();
    assert!(children.contains_key("detaileddescription"));

    assert!(schema.element_definition("doxygen").unwrap().contains("DoxygenType"));
    assert!(schema.group_definition("docTitleCmdGroup").unwrap().contains("hruler"));
}

#[test]
fn test_same_name_elements_in_different_namespaces() {
    let mut cache = ResolutionCache::new();
    {
        let mut schema = Schema::from_file(fixture("imports/index.xsd"), &mut cache).unwrap();
        schema.compile();
    }

    let local = ElementKey::new("item", Some("indexItemType"));
    let imported = ElementKey::new("item", Some("refItemType"));
    assert!(cache.contains_element(&local));
    assert!(cache.contains_element(&imported));
    assert_ne!(
        cache.element(&local).unwrap().type_name(),
        cache.element(&imported).unwrap().type_name()
    );
}
