//! The patcher: one read, the rules in order, one write.

use crate::artifact::{Artifact, PatchError};
use crate::report::PatchReport;
use crate::rule::{RuleOutcome, RuleSet};
use crate::tokens_table;
use std::path::Path;

/// Result of running the rules over a buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    pub content: String,
    pub report: PatchReport,
}

#[derive(Debug, Clone)]
pub struct Patcher {
    rules: RuleSet,
}

impl Patcher {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Patcher for the built-in tokens table rules.
    pub fn tokens_table() -> Self {
        Self::new(tokens_table::rules())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Apply every rule to `content` in order. Pure; touches no files.
    ///
    /// Each rule sees the output of the previous one. A rule whose old
    /// literal is absent leaves the buffer unchanged and is reported as
    /// skipped; it never aborts the run.
    pub fn patch_str(&self, content: &str) -> PatchOutcome {
        let mut buffer = content.to_string();
        let mut report = PatchReport::new(self.rules.name(), content);

        for rule in &self.rules {
            let outcome = rule.apply(&mut buffer);
            match &outcome {
                RuleOutcome::Applied { occurrences } => {
                    log::debug!("{}: replaced {occurrences} occurrence(s)", rule.id());
                }
                RuleOutcome::AlreadyApplied => {
                    log::debug!("{}: already applied", rule.id());
                }
                RuleOutcome::Skipped { drift } => match drift {
                    Some(hint) => log::warn!("{}: no match, nearest {hint}", rule.id()),
                    None => log::warn!("{}: no match", rule.id()),
                },
            }
            report.record(rule.id(), outcome);
        }

        report.finish(&buffer);
        PatchOutcome {
            content: buffer,
            report,
        }
    }

    /// Read-only run against a file.
    pub fn check(&self, path: impl AsRef<Path>) -> Result<PatchOutcome, PatchError> {
        let artifact = Artifact::load(path)?;
        Ok(self.patch_str(artifact.content()))
    }

    /// Patch the file at `path` in place and report what each rule did.
    ///
    /// The buffer is always written back, even when no rule matched.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<PatchReport, PatchError> {
        let artifact = Artifact::load(path)?;
        let outcome = self.patch_str(artifact.content());
        artifact.persist(&outcome.content)?;
        Ok(outcome.report)
    }
}

impl Default for Patcher {
    fn default() -> Self {
        Self::tokens_table()
    }
}

/// Patch `path` with the built-in tokens table rules.
pub fn run(path: impl AsRef<Path>) -> Result<PatchReport, PatchError> {
    Patcher::tokens_table().run(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PatchStatus;
    use crate::rule::Rule;
    use crate::tokens_table::*;
    use std::fs;

    fn chained() -> Patcher {
        Patcher::new(RuleSet::new(
            "chain",
            vec![
                Rule::new("first", "", "alpha", "beta"),
                Rule::new("second", "", "beta", "gamma"),
            ],
        ))
    }

    #[test]
    fn test_rules_see_previous_output() {
        let outcome = chained().patch_str("alpha");
        assert_eq!(outcome.content, "gamma");
        assert!(outcome.report.rules.iter().all(|r| r.outcome.is_applied()));
    }

    #[test]
    fn test_each_builtin_rule_replaces_only_its_span() {
        let patcher = Patcher::tokens_table();
        let pairs = [
            (VISIBILITY_TOGGLE_OLD, VISIBILITY_TOGGLE_NEW),
            (COPY_KEY_OLD, COPY_KEY_NEW),
            (ENABLE_DISABLE_OLD, ENABLE_DISABLE_NEW),
            (EDIT_LINK_OLD, EDIT_LINK_NEW),
            (DELETE_CONFIRM_OLD, DELETE_CONFIRM_NEW),
        ];
        for (old, new) in pairs {
            let input = format!("<Table.Cell>\n{old}\n</Table.Cell>\n");
            let outcome = patcher.patch_str(&input);
            assert_eq!(outcome.content, format!("<Table.Cell>\n{new}\n</Table.Cell>\n"));
            assert_eq!(outcome.report.applied(), 1);
            assert_eq!(outcome.report.skipped(), 4);
        }
    }

    #[test]
    fn test_no_match_leaves_buffer_unchanged() {
        let input = "export default function TokensTable() { return null; }\n";
        let outcome = Patcher::tokens_table().patch_str(input);
        assert_eq!(outcome.content, input);
        assert_eq!(outcome.report.status(), PatchStatus::Unapplied);
        assert!(!outcome.report.changed());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let patcher = Patcher::tokens_table();
        let input = [COPY_KEY_OLD, EDIT_LINK_OLD, DELETE_CONFIRM_OLD].join("\n");
        let first = patcher.patch_str(&input);
        let second = patcher.patch_str(&first.content);
        assert_eq!(second.content, first.content);
        assert_eq!(second.report.applied(), 0);
        assert_eq!(second.report.already_applied(), 3);
    }

    #[test]
    fn test_run_writes_even_when_nothing_matched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("TokensTable.js");
        fs::write(&file_path, "const a = 1;\n").unwrap();

        let report = run(&file_path).unwrap();
        assert_eq!(report.status(), PatchStatus::Unapplied);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "const a = 1;\n");
    }

    #[test]
    fn test_run_missing_file_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = run(temp_dir.path().join("TokensTable.js"));
        assert!(matches!(result, Err(PatchError::Read { .. })));
    }

    #[test]
    fn test_check_does_not_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("TokensTable.js");
        fs::write(&file_path, COPY_KEY_OLD).unwrap();

        let outcome = Patcher::tokens_table().check(&file_path).unwrap();
        assert_eq!(outcome.content, COPY_KEY_NEW);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), COPY_KEY_OLD);
    }
}
