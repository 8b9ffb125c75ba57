use crate::config::schema::{RuleSetConfig, ValidationError};
use crate::rule::RuleSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a TOML rule set into a [`RuleSet`].
///
/// `path` is `None` when the rules came from a string.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("rules{} are not valid TOML: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },

    #[error("rules{} failed validation: {source}", origin(.path))]
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" in {}", path.display()))
        .unwrap_or_default()
}

fn parse(input: &str, path: Option<&Path>) -> Result<RuleSet, ConfigError> {
    let config: RuleSetConfig =
        toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
            path: path.map(Path::to_path_buf),
            source,
        })?;
    config.validate().map_err(|source| ConfigError::Validation {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    Ok(config.to_rule_set())
}

/// Parse and validate a rule set from TOML text.
pub fn load_from_str(input: &str) -> Result<RuleSet, ConfigError> {
    parse(input, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, Some(path))
}
