//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

use xsdclass::SpecDocument;

fn xsdclass_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xsdclass"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn compound() -> String {
    fixtures_dir().join("compound.xsd").to_string_lossy().into_owned()
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_cli_generate_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("spec.json");

    let result = Command::new(xsdclass_bin())
        .args(["generate", &compound(), "--output"])
        .arg(&output)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(result.status.success(), "generate should succeed");
    assert!(stdout.contains("compound: 2 groups"), "should summarize groups");

    let document = SpecDocument::load(&output).unwrap();
    assert!(document.schema("compound").is_some());
}

#[test]
fn test_cli_generate_fails_on_wildcards() {
    let dir = tempfile::tempdir().unwrap();
    let broken = fixtures_dir().join("broken.xsd");

    let result = Command::new(xsdclass_bin())
        .arg("generate")
        .arg(&broken)
        .arg("--output")
        .arg(dir.path().join("spec.json"))
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(!result.status.success(), "generate should fail");
    assert!(stderr.contains("build contract violation"));
}

// ============================================================================
// Inspect Command Tests
// ============================================================================

#[test]
fn test_cli_inspect_summary() {
    let result = Command::new(xsdclass_bin())
        .args(["inspect", &compound()])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(result.status.success(), "inspect should succeed");
    assert!(stdout.contains("=== Groups ==="));
    assert!(stdout.contains("docCmdGroup extends docTitleCmdGroup"));
    assert!(stdout.contains("doxygen extends DoxygenType"));
}

#[test]
fn test_cli_inspect_group_json() {
    let result = Command::new(xsdclass_bin())
        .args(["inspect", &compound(), "--group", "docCmdGroup", "--json"])
        .output()
        .expect("Failed to execute command");

    assert!(result.status.success(), "inspect should succeed");
    let json: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(json["category"], "group");
    assert_eq!(json["extends"][0], "docTitleCmdGroup");
    assert_eq!(json["elements"]["simple"]["anchor"], "string");
}

#[test]
fn test_cli_inspect_accessors() {
    let result = Command::new(xsdclass_bin())
        .args(["inspect", &compound(), "--type", "sectiondefType", "--accessors"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(result.status.success(), "inspect should succeed");
    assert!(stdout.contains("get_memberdefs() -> memberdef"));
    assert!(stdout.contains("get_memberdef_functions() -> memberdef[@kind=\"function\"]"));
}

#[test]
fn test_cli_inspect_unknown_element() {
    let result = Command::new(xsdclass_bin())
        .args(["inspect", &compound(), "--element", "missing"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(!result.status.success());
    assert!(stderr.contains("unable to find element with name 'missing'"));
}
