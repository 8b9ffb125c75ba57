//! Integration tests for TOML rule sets.

use std::fs;
use tempfile::TempDir;
use tokens_table_patcher::config::ValidationIssue;
use tokens_table_patcher::{load_from_path, load_from_str, ConfigError, PatchStatus, Patcher};

const LABELS_TOML: &str = r#"
[meta]
name = "channels-table-a11y"
description = "Labels for the channels table"
target = "web/default/src/components/ChannelsTable.js"

[[rules]]
id = "test-button"
description = "label the test button"
old = """
                  <Button
                    size='small'
                    onClick={() => testChannel(channel.id)}
                  >"""
new = """
                  <Button
                    size='small'
                    onClick={() => testChannel(channel.id)}
                    aria-label={t('channel.test', 'Test')}
                  >"""

[[rules]]
id = "delete-fallback"
old = "t('common:delete')"
new = "t('common:delete', 'Delete')"
"#;

#[test]
fn test_load_rule_set_basic() {
    let rules = load_from_str(LABELS_TOML).unwrap();

    assert_eq!(rules.name(), "channels-table-a11y");
    assert_eq!(rules.len(), 2);
    assert_eq!(
        rules.target(),
        Some(std::path::Path::new(
            "web/default/src/components/ChannelsTable.js"
        ))
    );

    let first = rules.get("test-button").unwrap();
    assert_eq!(first.description(), "label the test button");
    // TOML trims the newline right after the opening delimiter
    assert!(first.old_text().starts_with("                  <Button\n"));
    assert!(first.old_text().ends_with(">"));

    let second = rules.get("delete-fallback").unwrap();
    assert_eq!(second.description(), "");
}

#[test]
fn test_apply_custom_rule_set() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("ChannelsTable.js");
    fs::write(
        &file,
        "                  <Button\n                    size='small'\n                    onClick={() => testChannel(channel.id)}\n                  >\n{t('common:delete')} {t('common:delete')}\n",
    )
    .unwrap();

    let patcher = Patcher::new(load_from_str(LABELS_TOML).unwrap());
    let report = patcher.run(&file).unwrap();

    assert_eq!(report.status(), PatchStatus::Complete);
    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("aria-label={t('channel.test', 'Test')}"));
    assert_eq!(content.matches("t('common:delete', 'Delete')").count(), 2);
    assert!(!content.contains("t('common:delete')"));
}

#[test]
fn test_load_from_path_reports_path_on_validation_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
[meta]
name = "bad"

[[rules]]
id = "grow"
old = "Copy"
new = "Copy Copy"

[[rules]]
id = "grow"
old = "x"
new = "y"
"#,
    )
    .unwrap();

    let err = load_from_path(&path).unwrap_err();
    match &err {
        ConfigError::Validation {
            path: Some(p),
            source,
        } => {
            assert_eq!(p, &path);
            assert_eq!(source.issues.len(), 2);
            assert!(source
                .issues
                .iter()
                .any(|issue| matches!(issue, ValidationIssue::DuplicateId { .. })));
            assert!(source
                .issues
                .iter()
                .any(|issue| matches!(issue, ValidationIssue::InvalidCombo { .. })));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn test_load_rejects_empty_rule_list() {
    let err = load_from_str("[meta]\nname = \"empty\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation { path: None, .. }));
    assert!(err.to_string().contains("rule set contains no rules"));
}

#[test]
fn test_load_rejects_malformed_toml() {
    let err = load_from_str("[[rules]\nid = ").unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
}

#[test]
fn test_load_rejects_missing_literal() {
    let err = load_from_str(
        r#"
[meta]
name = "incomplete"

[[rules]]
id = "no-new"
old = "x"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
}

#[test]
fn test_load_from_missing_path() {
    let dir = TempDir::new().unwrap();
    let err = load_from_path(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
