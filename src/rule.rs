//! Literal substitution rules.
//!
//! A [`Rule`] is an exact `(old, new)` pair. Matching is plain substring
//! search: case-sensitive, whitespace-sensitive, never a pattern.

use crate::config::schema::{ValidationError, ValidationIssue};
use crate::drift::{nearest_line, DriftHint};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single literal substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: String,
    description: String,
    old: String,
    new: String,
}

/// What happened to one rule during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[must_use = "RuleOutcome should be checked for skipped rules"]
pub enum RuleOutcome {
    /// The old literal was found and every occurrence was replaced
    Applied { occurrences: usize },
    /// The old literal is absent but the new literal is present
    AlreadyApplied,
    /// Neither literal is present; the buffer was left unchanged
    Skipped { drift: Option<DriftHint> },
}

impl RuleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RuleOutcome::Skipped { .. })
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOutcome::Applied { occurrences: 1 } => write!(f, "applied"),
            RuleOutcome::Applied { occurrences } => {
                write!(f, "applied ({occurrences} occurrences)")
            }
            RuleOutcome::AlreadyApplied => write!(f, "already applied"),
            RuleOutcome::Skipped { drift: None } => write!(f, "skipped (no match)"),
            RuleOutcome::Skipped { drift: Some(hint) } => {
                write!(f, "skipped (no match, nearest: {hint})")
            }
        }
    }
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn old_text(&self) -> &str {
        &self.old
    }

    pub fn new_text(&self) -> &str {
        &self.new
    }

    /// True when the old literal is gone and the new literal is present.
    pub fn is_applied_in(&self, content: &str) -> bool {
        !content.contains(self.old.as_str()) && content.contains(self.new.as_str())
    }

    /// Replace every occurrence of the old literal in `buffer`.
    ///
    /// The buffer is only reallocated when at least one occurrence exists.
    pub fn apply(&self, buffer: &mut String) -> RuleOutcome {
        let occurrences = buffer.matches(self.old.as_str()).count();
        if occurrences > 0 {
            *buffer = buffer.replace(self.old.as_str(), &self.new);
            return RuleOutcome::Applied { occurrences };
        }

        if buffer.contains(self.new.as_str()) {
            RuleOutcome::AlreadyApplied
        } else {
            RuleOutcome::Skipped {
                drift: nearest_line(buffer, &self.old),
            }
        }
    }
}

/// An ordered list of rules plus the file they are meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    name: String,
    target: Option<PathBuf>,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            target: None,
            rules,
        }
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default artifact path, relative to the workspace root.
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Check the invariants every rule set must hold before it touches a file.
    ///
    /// A rule whose `new` literal contains its `old` literal would match again
    /// on every run, so it is rejected along with empty and duplicate entries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.rules.is_empty() {
            issues.push(ValidationIssue::EmptyRuleList);
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: None,
                    field: "id",
                });
            } else if !seen.insert(rule.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    rule_id: rule.id.clone(),
                });
            }

            if rule.old.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: Some(rule.id.clone()),
                    field: "old",
                });
                continue;
            }

            if rule.old == rule.new {
                issues.push(ValidationIssue::InvalidCombo {
                    rule_id: Some(rule.id.clone()),
                    message: "old and new literals are identical".to_string(),
                });
            } else if rule.new.contains(rule.old.as_str()) {
                issues.push(ValidationIssue::InvalidCombo {
                    rule_id: Some(rule.id.clone()),
                    message: "new literal contains the old literal and would re-apply on every run"
                        .to_string(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> Rule {
        Rule::new("greet", "", "hello", "HELLO there")
    }

    #[test]
    fn test_apply_replaces_every_occurrence() {
        let mut buffer = String::from("hello, hello world");
        let outcome = rule().apply(&mut buffer);
        assert_eq!(outcome, RuleOutcome::Applied { occurrences: 2 });
        assert_eq!(buffer, "HELLO there, HELLO there world");
    }

    #[test]
    fn test_apply_is_case_sensitive() {
        let mut buffer = String::from("Hello world");
        let outcome = rule().apply(&mut buffer);
        assert!(outcome.is_skipped());
        assert_eq!(buffer, "Hello world");
    }

    #[test]
    fn test_apply_is_whitespace_sensitive() {
        let rule = Rule::new("ws", "", "a  b", "a b");
        let mut buffer = String::from("a b");
        assert!(matches!(
            rule.apply(&mut buffer),
            RuleOutcome::AlreadyApplied
        ));
        let mut buffer = String::from("a\tb");
        assert!(rule.apply(&mut buffer).is_skipped());
    }

    #[test]
    fn test_apply_detects_already_applied() {
        let mut buffer = String::from("say HELLO there");
        let outcome = rule().apply(&mut buffer);
        assert_eq!(outcome, RuleOutcome::AlreadyApplied);
        assert_eq!(buffer, "say HELLO there");
        assert!(rule().is_applied_in(&buffer));
    }

    #[test]
    fn test_apply_treats_literal_as_plain_text() {
        let rule = Rule::new("regex", "", "a.c", "x");
        let mut buffer = String::from("abc a.c");
        let outcome = rule.apply(&mut buffer);
        assert_eq!(outcome, RuleOutcome::Applied { occurrences: 1 });
        assert_eq!(buffer, "abc x");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(RuleOutcome::Applied { occurrences: 1 }.to_string(), "applied");
        assert_eq!(
            RuleOutcome::Applied { occurrences: 3 }.to_string(),
            "applied (3 occurrences)"
        );
        assert_eq!(
            RuleOutcome::Skipped { drift: None }.to_string(),
            "skipped (no match)"
        );
    }

    #[test]
    fn test_validate_rejects_duplicates_and_reapplying_rules() {
        let set = RuleSet::new(
            "bad",
            vec![
                Rule::new("a", "", "x", "y"),
                Rule::new("a", "", "p", "q"),
                Rule::new("b", "", "foo", "foobar"),
                Rule::new("c", "", "same", "same"),
                Rule::new("d", "", "", "z"),
            ],
        );
        let err = set.validate().unwrap_err();
        assert_eq!(err.issues.len(), 4);
        assert!(err
            .issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::DuplicateId { rule_id } if rule_id == "a")));
    }

    #[test]
    fn test_validate_rejects_empty_set() {
        let err = RuleSet::new("empty", Vec::new()).validate().unwrap_err();
        assert!(matches!(err.issues[0], ValidationIssue::EmptyRuleList));
    }

    #[test]
    fn test_get_by_id() {
        let set = RuleSet::new("one", vec![rule()]);
        assert_eq!(set.get("greet").map(Rule::old_text), Some("hello"));
        assert!(set.get("missing").is_none());
    }
}
