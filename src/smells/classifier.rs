use crate::config::AnalyzerConfig;
use crate::core::ast::JavaAst;
use crate::core::{SoftWarning, SourceUnit, WarningSource};
use crate::errors::ConfigError;
use crate::extraction::{parse_clean, StructuralFacts};
use crate::metrics::MetricValues;

use super::duplication::detect_duplicate_code;
use super::structural::{detect_structural_smells, StructuralFinding};
use super::threshold::{detect_threshold_smells, ClassProfile};
use super::{Smell, SmellMap, SmellReport};

/// Runs both strategies for one unit and merges the results.
#[derive(Debug, Clone, Default)]
pub struct SmellClassifier {
    config: AnalyzerConfig,
}

impl SmellClassifier {
    /// Fails when any threshold in `config` is invalid.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Classify one unit.
    ///
    /// `ast` is the clean tree from extraction, if there was one. Without it
    /// the structural strategy parses the unit itself; a failure there is
    /// recorded as a warning and the threshold results stand alone.
    pub fn classify(
        &self,
        unit: &SourceUnit,
        facts: &StructuralFacts,
        values: &MetricValues,
        ast: Option<&JavaAst>,
    ) -> SmellReport {
        let profile = ClassProfile::from_facts(values, facts);
        let mut smells = detect_threshold_smells(&profile, &self.config);

        if let Some(duplicate) =
            detect_duplicate_code(&unit.content, self.config.smells.duplicate_min_lines)
        {
            smells.insert(duplicate.kind, duplicate);
        }

        let mut warnings = Vec::new();
        if self.config.structural_strategy {
            let structural = match ast {
                Some(ast) => detect_structural_smells(ast, &self.config.smells),
                None => parse_clean(unit)
                    .and_then(|ast| detect_structural_smells(&ast, &self.config.smells)),
            };
            match structural {
                Ok(findings) => merge_findings(&mut smells, findings),
                Err(err) => {
                    log::warn!("Structural smell detection skipped: {err}");
                    warnings.push(SoftWarning::new(
                        WarningSource::StructuralSmells,
                        format!("{err}; positional smells skipped"),
                    ));
                }
            }
        }

        SmellReport { smells, warnings }
    }
}

/// Fold positional findings into the smell map.
///
/// A finding for a smell already present adds its location and can raise
/// the severity; otherwise it starts a new entry.
pub fn merge_findings(smells: &mut SmellMap, findings: Vec<StructuralFinding>) {
    for finding in findings {
        let smell = smells.entry(finding.kind).or_insert_with(|| {
            Smell::new(
                finding.kind,
                finding.severity,
                finding.location.description.clone(),
            )
        });
        smell.severity = smell.severity.max(finding.severity);
        if !smell.locations.contains(&finding.location) {
            smell.locations.push(finding.location);
        }
    }
    for smell in smells.values_mut() {
        smell.locations.sort();
    }
}
