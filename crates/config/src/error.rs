//! Configuration errors

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a config could not be read, written or used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid config file: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Settings parsed but cannot be used to run the catalog
    #[error("Invalid settings in {origin}: {}", join_problems(.problems))]
    Invalid {
        origin: String,
        problems: Vec<FieldError>,
    },

    #[error("Invalid value '{value}' in {variable}: {reason}")]
    InvalidOverride {
        variable: String,
        value: String,
        reason: String,
    },

    #[error("Could not determine the home directory")]
    NoHomeDirectory,
}

impl ConfigError {
    /// Problems found by validation, empty for every other kind of error
    pub fn problems(&self) -> &[FieldError] {
        match self {
            Self::Invalid { problems, .. } => problems,
            _ => &[],
        }
    }
}

fn join_problems(problems: &[FieldError]) -> String {
    problems
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One unusable setting, addressed as `section.key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Records the offending value alongside the message
    pub fn with_value(mut self, value: impl fmt::Display) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)?;
        if let Some(ref value) = self.value {
            write!(f, " (got '{}')", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {}
