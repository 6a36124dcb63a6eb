//! Per-file and project-wide analysis.
//!
//! Each file goes through extraction, metrics and smell classification
//! independently, so files are processed in parallel. The dependency graph
//! is built afterwards from the collected facts.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::advisor::{recommend_patterns, PatternRecommendation};
use crate::config::AnalyzerConfig;
use crate::core::{SoftWarning, SourceUnit, WarningSource};
use crate::errors::{AnalysisError, ConfigError, Result};
use crate::extraction::{extract, ExtractionStrategy, StructuralFacts};
use crate::graph::{build_from_facts, CircularDependency, DependencyGraph};
use crate::metrics::{compute_values, metrics_from_values, ClassMetrics};
use crate::smells::{SmellClassifier, SmellMap};

/// Everything computed for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub class_name: String,
    pub strategy: ExtractionStrategy,
    pub metrics: ClassMetrics,
    pub smells: SmellMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SoftWarning>,
    #[serde(skip)]
    pub facts: StructuralFacts,
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    classifier: SmellClassifier,
    cancelled: Arc<AtomicBool>,
}

impl Analyzer {
    /// Validates `config` before any file is analyzed.
    pub fn new(config: AnalyzerConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            classifier: SmellClassifier::new(config)?,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.classifier.config()
    }

    /// Flag that stops new files from being started once set.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Analyze one file. Never fails; problems become soft warnings.
    pub fn analyze_file(&self, unit: &SourceUnit) -> FileAnalysis {
        let extraction = extract(unit, self.config().structural_strategy);
        let mut warnings: Vec<SoftWarning> = extraction.warning.into_iter().collect();

        let values = compute_values(&unit.content, &extraction.facts);
        let metrics = match metrics_from_values(&values) {
            Ok(metrics) => metrics,
            Err(err) => {
                log::warn!("{}: {err}; using default metrics", unit.path.display());
                warnings.push(SoftWarning::new(WarningSource::Metrics, err.to_string()));
                ClassMetrics::default()
            }
        };

        let report = self.classifier.classify(
            unit,
            &extraction.facts,
            &values,
            extraction.ast.as_ref(),
        );
        warnings.extend(report.warnings);

        FileAnalysis {
            path: unit.path.clone(),
            class_name: unit.display_name(),
            strategy: extraction.facts.strategy,
            metrics,
            smells: report.smells,
            warnings,
            facts: extraction.facts,
        }
    }

    /// Analyze one file unless the run has been cancelled.
    pub fn try_analyze_file(&self, unit: &SourceUnit) -> Result<FileAnalysis> {
        if self.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        Ok(self.analyze_file(unit))
    }

    /// Analyze a project and build its dependency graph.
    ///
    /// After cancellation no further files are started; files already
    /// analyzed are kept and the graph covers only them.
    pub fn analyze_project(&self, units: &[SourceUnit]) -> ProjectAnalysis {
        let outcomes: Vec<Result<FileAnalysis>> = units
            .par_iter()
            .map(|unit| self.try_analyze_file(unit))
            .collect();

        let mut completed = Vec::with_capacity(units.len());
        let mut skipped = Vec::new();
        for (unit, outcome) in units.iter().zip(outcomes) {
            match outcome {
                Ok(analysis) => completed.push((unit, analysis)),
                Err(_) => skipped.push(unit.path.clone()),
            }
        }

        let pairs: Vec<(&SourceUnit, &StructuralFacts)> = completed
            .iter()
            .map(|(unit, analysis)| (*unit, &analysis.facts))
            .collect();
        let graph = build_from_facts(&pairs);
        let files: Vec<FileAnalysis> = completed.into_iter().map(|(_, analysis)| analysis).collect();

        log::info!(
            "Analyzed {} files ({} skipped), {} dependency edges",
            files.len(),
            skipped.len(),
            graph.edge_count()
        );

        ProjectAnalysis {
            files,
            graph,
            skipped,
        }
    }
}

/// Results for a whole project.
#[derive(Debug, Clone)]
pub struct ProjectAnalysis {
    /// In input order.
    pub files: Vec<FileAnalysis>,
    pub graph: DependencyGraph,
    /// Files not started because the run was cancelled.
    pub skipped: Vec<PathBuf>,
}

impl ProjectAnalysis {
    pub fn file(&self, path: &Path) -> Option<&FileAnalysis> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn recommendations_for(&self, path: &Path) -> Vec<PatternRecommendation> {
        self.file(path)
            .map(|file| recommend_patterns(path, &file.smells, &self.graph))
            .unwrap_or_default()
    }

    pub fn report(&self) -> ProjectReport {
        let mut files: Vec<FileReport> = self
            .files
            .iter()
            .map(|file| FileReport {
                analysis: file.clone(),
                dependencies: self.graph.dependencies_of(&file.path).into_iter().collect(),
                dependents: self.graph.dependents_of(&file.path).into_iter().collect(),
                recommendations: recommend_patterns(&file.path, &file.smells, &self.graph),
            })
            .collect();
        files.sort_by(|a, b| a.analysis.path.cmp(&b.analysis.path));

        let mut skipped = self.skipped.clone();
        skipped.sort();

        ProjectReport {
            files,
            edges: self.graph.edges(),
            circular_dependencies: self.graph.circular_dependencies(),
            skipped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub analysis: FileAnalysis,
    pub dependencies: Vec<PathBuf>,
    pub dependents: Vec<PathBuf>,
    pub recommendations: Vec<PatternRecommendation>,
}

/// Sorted, serializable view of a [`ProjectAnalysis`].
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub files: Vec<FileReport>,
    pub edges: Vec<(PathBuf, PathBuf)>,
    pub circular_dependencies: Vec<CircularDependency>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<PathBuf>,
}

impl ProjectReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
