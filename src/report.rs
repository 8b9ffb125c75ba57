//! Per-rule results of a patch run.

use crate::rule::RuleOutcome;
use serde::Serialize;
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Outcome of one rule, tagged with its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReport {
    pub id: String,
    pub outcome: RuleOutcome,
}

/// Overall classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    /// Every rule matched and at least one was applied in this run
    Complete,
    /// Every rule had already been applied; nothing changed
    AlreadyPatched,
    /// Some rules matched, others were skipped
    Partial,
    /// No rule matched and none had been applied before
    Unapplied,
}

impl fmt::Display for PatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PatchStatus::Complete => "complete",
            PatchStatus::AlreadyPatched => "already patched",
            PatchStatus::Partial => "partial",
            PatchStatus::Unapplied => "unapplied",
        };
        f.write_str(label)
    }
}

/// Report for a whole run, in rule order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[must_use = "PatchReport should be checked for skipped rules"]
pub struct PatchReport {
    pub rule_set: String,
    pub rules: Vec<RuleReport>,
    /// xxh3 of the buffer before the first rule
    pub before: u64,
    /// xxh3 of the buffer after the last rule
    pub after: u64,
}

impl PatchReport {
    pub(crate) fn new(rule_set: impl Into<String>, original: &str) -> Self {
        let hash = xxh3_64(original.as_bytes());
        Self {
            rule_set: rule_set.into(),
            rules: Vec::new(),
            before: hash,
            after: hash,
        }
    }

    pub(crate) fn record(&mut self, id: impl Into<String>, outcome: RuleOutcome) {
        self.rules.push(RuleReport {
            id: id.into(),
            outcome,
        });
    }

    pub(crate) fn finish(&mut self, patched: &str) {
        self.after = xxh3_64(patched.as_bytes());
    }

    pub fn applied(&self) -> usize {
        self.count(|outcome| outcome.is_applied())
    }

    pub fn already_applied(&self) -> usize {
        self.count(|outcome| matches!(outcome, RuleOutcome::AlreadyApplied))
    }

    pub fn skipped(&self) -> usize {
        self.count(RuleOutcome::is_skipped)
    }

    fn count(&self, pred: impl Fn(&RuleOutcome) -> bool) -> usize {
        self.rules.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn skipped_rules(&self) -> impl Iterator<Item = &RuleReport> {
        self.rules.iter().filter(|r| r.outcome.is_skipped())
    }

    /// Whether the buffer differs from what was read.
    pub fn changed(&self) -> bool {
        self.before != self.after
    }

    pub fn status(&self) -> PatchStatus {
        let skipped = self.skipped();
        let applied = self.applied();
        if skipped == 0 && applied == 0 {
            PatchStatus::AlreadyPatched
        } else if skipped == 0 {
            PatchStatus::Complete
        } else if skipped == self.rules.len() {
            PatchStatus::Unapplied
        } else {
            PatchStatus::Partial
        }
    }

    pub fn outcome(&self, id: &str) -> Option<&RuleOutcome> {
        self.rules.iter().find(|r| r.id == id).map(|r| &r.outcome)
    }
}

impl fmt::Display for PatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({} applied, {} already applied, {} skipped)",
            self.rule_set,
            self.status(),
            self.applied(),
            self.already_applied(),
            self.skipped()
        )
    }
}
