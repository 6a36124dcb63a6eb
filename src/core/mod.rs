pub mod ast;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One Java file as handed over by the ingestion layer.
///
/// The unit is immutable once constructed; analysis components borrow it and
/// never hold it across files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub content: String,
    pub size_bytes: usize,
    pub class_name: Option<String>,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            size_bytes: content.len(),
            content,
            class_name: None,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Class name if known, otherwise the file stem (`Foo.java` -> `Foo`).
    pub fn display_name(&self) -> String {
        self.class_name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string()
        })
    }
}

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_str = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{display_str}")
    }
}

/// A precise position reported by the syntax-tree strategy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub description: String,
}

/// Non-blocking notice attached to a per-file result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftWarning {
    pub source: WarningSource,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSource {
    Extraction,
    Metrics,
    StructuralSmells,
}

impl SoftWarning {
    pub fn new(source: WarningSource, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}
