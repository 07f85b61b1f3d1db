//! Batch files loaded from disk and applied to documents.

use std::fs;
use tempfile::TempDir;
use tree_splice::config::{ConfigError, ValidationIssue};
use tree_splice::{load_from_path, resolve_edits, Document, ResolveError};

const SOURCE: &str = "local a = 1\nlocal b = 2\nreturn a + b";

fn write_batch(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("batch.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_resolve_and_apply() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        r#"
[meta]
language = "lua"
description = "bump both constants"

[[edits]]
id = "b"
replacement = "7"
expected = "2"
span = { type = "columns", row = 1, start = 10, end = 11 }

[[edits]]
id = "a"
replacement = "15"
expected = "1"
span = { type = "bytes", start = 10, end = 11 }
"#,
    );

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.meta.language.as_deref(), Some("lua"));
    assert_eq!(config.edits.len(), 2);

    let language = config.meta.language.clone().unwrap();
    let mut doc = Document::parse(&language, SOURCE).unwrap();
    let edits = resolve_edits(&config, SOURCE).unwrap();
    let result = doc.apply_edits(edits).unwrap();

    assert_eq!(doc.source(), "local a = 15\nlocal b = 7\nreturn a + b");
    assert_eq!(result.applied_edits[1].after.byte_range(), 23..24);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = load_from_path(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_empty_batch_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "[meta]\nlanguage = \"lua\"\n");

    match load_from_path(&path).unwrap_err() {
        ConfigError::Validation { path: Some(p), source } => {
            assert_eq!(p, path);
            assert!(source
                .issues
                .iter()
                .any(|issue| matches!(issue, ValidationIssue::EmptyEditList)));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(&dir, "[[edits]]\nreplacement = \n");

    assert!(matches!(
        load_from_path(&path).unwrap_err(),
        ConfigError::Toml { .. }
    ));
}

#[test]
fn test_stale_expectation_stops_before_editing() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        r#"
[[edits]]
id = "stale"
replacement = "3"
expected = "9"
span = { type = "bytes", start = 22, end = 23 }
"#,
    );

    let config = load_from_path(&path).unwrap();
    let err = resolve_edits(&config, SOURCE).unwrap_err();

    assert!(matches!(
        err,
        ResolveError::BeforeTextMismatch { ref edit, .. } if edit == "'stale'"
    ));
}

#[test]
fn test_overlapping_spans_are_rejected_by_the_document() {
    let dir = TempDir::new().unwrap();
    let path = write_batch(
        &dir,
        r#"
[[edits]]
replacement = "x"
span = { type = "bytes", start = 6, end = 9 }

[[edits]]
replacement = "y"
span = { type = "columns", row = 0, start = 8, end = 11 }
"#,
    );

    let config = load_from_path(&path).unwrap();
    let edits = resolve_edits(&config, SOURCE).unwrap();
    let mut doc = Document::parse("lua", SOURCE).unwrap();

    assert!(doc.apply_edits(edits).is_err());
    assert_eq!(doc.source(), SOURCE);
}
