use crate::rule::{Rule, RuleSet};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl RuleSetConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        if self.meta.name.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                rule_id: None,
                field: "meta.name",
            });
        }
        if let Some(target) = &self.meta.target {
            if target.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    rule_id: None,
                    field: "meta.target",
                });
            }
        }

        if let Err(err) = self.to_rule_set().validate() {
            issues.extend(err.issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Build the rule set in file order.
    pub fn to_rule_set(&self) -> RuleSet {
        let rules = self
            .rules
            .iter()
            .map(|def| {
                Rule::new(
                    def.id.clone(),
                    def.description.clone().unwrap_or_default(),
                    def.old.clone(),
                    def.new.clone(),
                )
            })
            .collect();
        let set = RuleSet::new(self.meta.name.clone(), rules);
        match &self.meta.target {
            Some(target) => set.with_target(target),
            None => set,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Artifact path relative to the workspace root
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuleDefinition {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyRuleList,
    MissingField {
        rule_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        rule_id: String,
    },
    InvalidCombo {
        rule_id: Option<String>,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyRuleList => write!(f, "rule set contains no rules"),
            ValidationIssue::MissingField { rule_id, field } => match rule_id {
                Some(id) => write!(f, "rule '{id}' missing required field '{field}'"),
                None => write!(f, "missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { rule_id } => {
                write!(f, "rule id '{rule_id}' is used more than once")
            }
            ValidationIssue::InvalidCombo { rule_id, message } => match rule_id {
                Some(id) => write!(f, "rule '{id}' has invalid configuration: {message}"),
                None => write!(f, "invalid rule configuration: {message}"),
            },
        }
    }
}
