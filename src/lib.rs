// Export modules for library usage
pub mod advisor;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod smells;
pub mod verifier;

// Re-export commonly used types
pub use crate::core::{Severity, SoftWarning, SourceLocation, SourceUnit, WarningSource};

pub use crate::config::{AnalyzerConfig, GodClassPreset, SmellThresholds};

pub use crate::errors::{AnalysisError, ConfigError};

pub use crate::extraction::{extract, ExtractionStrategy, StructuralFacts};

pub use crate::metrics::{calculate, ClassMetrics, MetricRecord, MetricStatus};

pub use crate::smells::{Smell, SmellClassifier, SmellKind, SmellMap, SmellReport};

pub use crate::graph::{CircularDependency, DependencyGraph};

pub use crate::advisor::{
    pattern_safety, recommend_patterns, PatternRecommendation, RefactoringPattern, SafetyVerdict,
};

pub use crate::verifier::{verify_refactoring, FindingKind, VerificationFinding, VerificationReport};

pub use crate::pipeline::{Analyzer, FileAnalysis, ProjectAnalysis, ProjectReport};
