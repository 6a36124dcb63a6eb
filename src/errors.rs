//! Error types for smellmap analysis operations.
//!
//! Per-file problems are recoverable: the pipeline turns them into soft
//! warnings and keeps going. Configuration problems are programmer errors and
//! surface immediately from [`crate::config::AnalyzerConfig::validate`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Source could not be turned into a usable syntax tree.
    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A metric produced a value outside its domain.
    #[error("Metric '{metric}' could not be computed: {message}")]
    Metric { metric: String, message: String },

    /// The run was cancelled before the file was analyzed.
    #[error("Analysis cancelled")]
    Cancelled,
}

impl AnalysisError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn metric(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Metric {
            metric: metric.into(),
            message: message.into(),
        }
    }

    /// Whether this error only affects the file it was raised for.
    pub fn is_per_file(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid threshold '{field}': {message}")]
    InvalidThreshold { field: String, message: String },

    #[error("{} invalid thresholds: {}", .0.len(), join_errors(.0))]
    Multiple(Vec<ConfigError>),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_path() {
        let err = AnalysisError::parse("src/Foo.java", "unexpected token");
        assert_eq!(
            err.to_string(),
            "Parse error in src/Foo.java: unexpected token"
        );
        assert!(err.is_per_file());
    }

    #[test]
    fn test_cancelled_is_not_per_file() {
        assert!(!AnalysisError::Cancelled.is_per_file());
    }

    #[test]
    fn test_invalid_threshold_display() {
        let err = ConfigError::invalid("smells.long_method_lines", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid threshold 'smells.long_method_lines': must be greater than 0"
        );
    }
}
