//! Structural strategy: smells that need exact positions.
//!
//! Walks a syntax tree per class and method. A tree with syntax errors is
//! rejected outright so that approximate positions never reach the output.

use crate::config::SmellThresholds;
use crate::core::ast::JavaAst;
use crate::core::{Severity, SourceLocation};
use crate::errors::AnalysisError;
use crate::extraction::tree::extract_facts;
use crate::extraction::{MethodFacts, StructuralFacts, TypeDeclaration, TypeKind};

use super::SmellKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralFinding {
    pub kind: SmellKind,
    pub severity: Severity,
    pub location: SourceLocation,
}

impl StructuralFinding {
    fn new(kind: SmellKind, severity: Severity, line: usize, description: String) -> Self {
        Self {
            kind,
            severity,
            location: SourceLocation { line, description },
        }
    }
}

/// Findings sorted by line.
pub fn detect_structural_smells(
    ast: &JavaAst,
    thresholds: &SmellThresholds,
) -> Result<Vec<StructuralFinding>, AnalysisError> {
    if ast.has_errors() {
        return Err(AnalysisError::parse(
            &ast.path,
            "syntax errors prevent positional smell detection",
        ));
    }

    let facts = extract_facts(ast);
    let mut findings = Vec::new();

    for decl in facts.types.iter().filter(|t| t.kind == TypeKind::Class) {
        let methods: Vec<&MethodFacts> = facts
            .methods()
            .filter(|m| m.owner.as_deref() == Some(decl.name.as_str()))
            .collect();
        findings.extend(detect_god_class(decl, &methods, &ast.source, thresholds));
        findings.extend(detect_data_class(decl, &methods, thresholds));
    }

    for method in facts.methods() {
        findings.extend(detect_long_method(method, thresholds));
        findings.extend(detect_feature_envy(method, thresholds));
    }

    findings.extend(detect_switches(&facts, thresholds));

    findings.sort_by(|a, b| {
        (a.location.line, a.kind).cmp(&(b.location.line, b.kind))
    });
    Ok(findings)
}

fn class_loc(decl: &TypeDeclaration, source: &str) -> usize {
    source
        .lines()
        .skip(decl.start_line.saturating_sub(1))
        .take(decl.end_line + 1 - decl.start_line.max(1))
        .filter(|line| !line.trim().is_empty())
        .count()
}

fn detect_god_class(
    decl: &TypeDeclaration,
    methods: &[&MethodFacts],
    source: &str,
    t: &SmellThresholds,
) -> Option<StructuralFinding> {
    let loc = class_loc(decl, source);
    (loc > t.god_class_loc && methods.len() > t.god_class_methods).then(|| {
        StructuralFinding::new(
            SmellKind::GodClass,
            Severity::High,
            decl.start_line,
            format!(
                "Class '{}' has {loc} lines and {} methods (thresholds: {}, {})",
                decl.name,
                methods.len(),
                t.god_class_loc,
                t.god_class_methods
            ),
        )
    })
}

fn detect_data_class(
    decl: &TypeDeclaration,
    methods: &[&MethodFacts],
    t: &SmellThresholds,
) -> Option<StructuralFinding> {
    if methods.is_empty() {
        return None;
    }
    let accessors = methods.iter().filter(|m| m.is_accessor()).count();
    let ratio = accessors as f64 / methods.len() as f64;
    (ratio > t.data_class_accessor_ratio).then(|| {
        StructuralFinding::new(
            SmellKind::DataClass,
            Severity::Medium,
            decl.start_line,
            format!(
                "Class '{}' is mostly accessors ({accessors} of {} methods)",
                decl.name,
                methods.len()
            ),
        )
    })
}

fn detect_long_method(method: &MethodFacts, t: &SmellThresholds) -> Option<StructuralFinding> {
    let length = method.body_lines();
    (length > t.long_method_lines).then(|| {
        StructuralFinding::new(
            SmellKind::LongMethod,
            if length > t.long_method_lines * 2 {
                Severity::High
            } else {
                Severity::Medium
            },
            method.start_line,
            format!(
                "Method '{}' has {length} lines (threshold: {})",
                method.name, t.long_method_lines
            ),
        )
    })
}

fn detect_feature_envy(method: &MethodFacts, t: &SmellThresholds) -> Option<StructuralFinding> {
    let external = method.external_accesses;
    (external > t.feature_envy_accesses && external > method.own_accesses).then(|| {
        StructuralFinding::new(
            SmellKind::FeatureEnvy,
            Severity::Medium,
            method.start_line,
            format!(
                "Method '{}' makes {external} external accesses and {} to its own class",
                method.name, method.own_accesses
            ),
        )
    })
}

/// Switch sites, reported only once the unit has more switches than allowed.
fn detect_switches<'a>(
    facts: &'a StructuralFacts,
    t: &SmellThresholds,
) -> impl Iterator<Item = StructuralFinding> + 'a {
    let over_limit = facts.switches.len() > t.switch_statements;
    facts.switches.iter().filter(move |_| over_limit).map(|site| {
        StructuralFinding::new(
            SmellKind::SwitchStatements,
            Severity::Low,
            site.line,
            format!("switch with {} cases", site.case_count),
        )
    })
}
