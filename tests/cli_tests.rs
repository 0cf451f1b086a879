//! CLI integration tests
//!
//! These tests run the built binary against schemas in a temporary sandbox.

#![cfg(feature = "cli")]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::{tempdir, TempDir};

const NOTE_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="note">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="to" type="xs:string"/>
        <xs:element name="body" type="xs:string" minOccurs="0"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
  <xs:simpleType name="code"/>
</xs:schema>"#;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xsd-retrieval"))
}

fn sandbox_with_note() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("note.xsd"), NOTE_XSD).unwrap();
    dir
}

fn run_in(sandbox: &Path, args: &[&str]) -> Output {
    bin()
        .arg("--sandbox")
        .arg(sandbox)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_cli_validate_text() {
    let sandbox = sandbox_with_note();
    let output = run_in(sandbox.path(), &["validate", "note.xsd"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("XSD Validation Result:"));
    assert!(out.contains("Valid XSD: true"));
    assert!(out.contains("Has XML Declaration: true"));
    assert!(out.contains("  - xmlns:xs=\"http://www.w3.org/2001/XMLSchema\""));
    assert!(out.contains("Elements Defined: 3"));
}

#[test]
fn test_cli_validate_json() {
    let sandbox = sandbox_with_note();
    let output = run_in(sandbox.path(), &["validate", "note.xsd", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["isValid"], true);
    assert_eq!(json["elementNames"][2], "body");
}

#[test]
fn test_cli_validate_not_a_schema_exits_nonzero() {
    let sandbox = tempdir().unwrap();
    fs::write(sandbox.path().join("plain.xml"), "<root/>").unwrap();

    let output = run_in(sandbox.path(), &["validate", "plain.xml"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Valid XSD: false"));
}

#[test]
fn test_cli_validate_malformed_reports_error() {
    let sandbox = tempdir().unwrap();
    fs::write(sandbox.path().join("bad.xsd"), "<xs:schema><open>").unwrap();

    let output = run_in(sandbox.path(), &["validate", "bad.xsd"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to validate XSD"));
}

#[test]
fn test_cli_validate_stdin() {
    let mut child = bin()
        .args(["validate", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(NOTE_XSD.as_bytes())
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Valid XSD: true"));
}

// ============================================================================
// Elements Command Tests
// ============================================================================

#[test]
fn test_cli_elements_text() {
    let sandbox = sandbox_with_note();
    let output = run_in(sandbox.path(), &["elements", "note.xsd"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Elements (3):"));
    assert!(out.contains("  - note (type: undefined, min: 1, max: 1)"));
    assert!(out.contains("  - body (type: xs:string, min: 0, max: 1)"));
    assert!(out.contains("Complex Types (0):"));
    assert!(out.contains("Simple Types (1):"));
    assert!(out.contains("  - code"));
}

#[test]
fn test_cli_elements_missing_schema() {
    let sandbox = tempdir().unwrap();
    fs::write(sandbox.path().join("plain.xml"), "<root/>").unwrap();

    let output = run_in(sandbox.path(), &["elements", "plain.xml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no <xs:schema> element"));
}

// ============================================================================
// Retrieve Command Tests
// ============================================================================

#[test]
fn test_cli_retrieve_and_save() {
    let sandbox = sandbox_with_note();
    let output = run_in(
        sandbox.path(),
        &["retrieve", "note.xsd", "--save", "out/copy.xsd", "--create-dirs"],
    );

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Successfully retrieved XSD from: note.xsd"));
    assert!(out.contains("Saved to:"));
    assert_eq!(
        fs::read_to_string(sandbox.path().join("out").join("copy.xsd")).unwrap(),
        NOTE_XSD
    );
}

#[test]
fn test_cli_retrieve_traversal_rejected() {
    let sandbox = sandbox_with_note();
    let output = run_in(sandbox.path(), &["retrieve", "../note.xsd"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("directory traversal"));
}

#[test]
fn test_cli_remote_needs_opt_in() {
    let output = bin()
        .args(["retrieve", "https://example.com/schema.xsd"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("remote resources are not allowed"));
}

// ============================================================================
// Check-path Command Tests
// ============================================================================

#[test]
fn test_cli_check_path_modes() {
    let sandbox = sandbox_with_note();

    let output = run_in(sandbox.path(), &["check-path", "note.xsd", "--mode", "read"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim_end().ends_with("note.xsd"));

    let output = run_in(sandbox.path(), &["check-path", "missing.xsd", "--mode", "read"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));

    let output = run_in(sandbox.path(), &["check-path", "missing.xsd", "--mode", "write"]);
    assert!(output.status.success());
}

#[test]
fn test_cli_unknown_limits_preset() {
    let sandbox = sandbox_with_note();
    let output = run_in(sandbox.path(), &["--limits", "lenient", "validate", "note.xsd"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown limits preset"));
}
