//! Refactor-Safety Verifier
//!
//! Compares a class before and after a rewrite: method signatures,
//! interface contracts, and a unified text diff for review. Problems are
//! reported as findings; nothing here returns an error.

pub mod signatures;

use serde::Serialize;
use similar::TextDiff;
use std::path::Path;

use crate::core::Severity;
use crate::extraction::parser::parse_source;

pub use signatures::{ClassContract, MethodSignature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    ParsingError,
    RemovedMethod,
    SignatureChanged,
    MissingInterfaceMethod,
    ParametersChanged,
    AddedMethod,
}

impl FindingKind {
    pub fn severity(self) -> Severity {
        match self {
            FindingKind::ParsingError
            | FindingKind::RemovedMethod
            | FindingKind::SignatureChanged
            | FindingKind::MissingInterfaceMethod => Severity::High,
            FindingKind::ParametersChanged => Severity::Medium,
            FindingKind::AddedMethod => Severity::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationFinding {
    pub kind: FindingKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub message: String,
}

impl VerificationFinding {
    fn new(kind: FindingKind, method: Option<&str>, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            method: method.map(str::to_string),
            message,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub findings: Vec<VerificationFinding>,
    /// Unified diff of the two texts; empty when they are identical.
    pub diff: String,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether the rewrite should be held back: any high-severity finding.
    pub fn blocks_apply(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::High)
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &VerificationFinding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

/// Verify that `after` preserves the callable surface of `before`.
pub fn verify_refactoring(before: &str, after: &str) -> VerificationReport {
    let diff = unified_diff(before, after);

    let mut findings = Vec::new();
    let mut contracts = Vec::with_capacity(2);
    for (label, text) in [("before", before), ("after", after)] {
        match parse_source(text, Path::new(label)) {
            Ok(ast) if !ast.has_errors() => contracts.push(ClassContract::from_ast(&ast)),
            Ok(_) => findings.push(VerificationFinding::new(
                FindingKind::ParsingError,
                None,
                format!("The {label} version contains syntax errors"),
            )),
            Err(err) => findings.push(VerificationFinding::new(
                FindingKind::ParsingError,
                None,
                format!("The {label} version could not be parsed: {err:#}"),
            )),
        }
    }

    if let [old, new] = contracts.as_slice() {
        findings.extend(compare_contracts(old, new));
    } else {
        log::debug!("Skipping signature comparison after parse failure");
    }

    findings.sort_by(|a, b| (a.kind, &a.method).cmp(&(b.kind, &b.method)));
    VerificationReport { findings, diff }
}

/// Signature and interface findings between two parsed versions.
pub fn compare_contracts(old: &ClassContract, new: &ClassContract) -> Vec<VerificationFinding> {
    let mut findings = Vec::new();

    for (name, before) in &old.methods {
        let Some(after) = new.methods.get(name) else {
            findings.extend(before.iter().map(|signature| {
                VerificationFinding::new(
                    FindingKind::RemovedMethod,
                    Some(name),
                    format!("Method '{}' was removed", signature.render()),
                )
            }));
            continue;
        };
        findings.extend(compare_overloads(name, before, after));
    }

    for (name, after) in new.methods.iter().filter(|(n, _)| !old.methods.contains_key(*n)) {
        findings.extend(after.iter().map(|signature| {
            VerificationFinding::new(
                FindingKind::AddedMethod,
                Some(name),
                format!("Method '{}' was added", signature.render()),
            )
        }));
    }

    for name in old
        .interface_methods
        .iter()
        .filter(|n| !new.methods.contains_key(*n))
    {
        findings.push(VerificationFinding::new(
            FindingKind::MissingInterfaceMethod,
            Some(name),
            format!("Interface method '{name}' is no longer implemented"),
        ));
    }

    findings
}

/// Compare the overloads of one method name.
///
/// Overloads are matched by parameter types first, so reordering them is
/// not a change. Whatever is left unmatched is paired in declaration order
/// and reported as a signature change; any remainder was removed or added.
fn compare_overloads(
    name: &str,
    before: &[MethodSignature],
    after: &[MethodSignature],
) -> Vec<VerificationFinding> {
    let mut findings = Vec::new();
    let mut unmatched_after: Vec<&MethodSignature> = after.iter().collect();
    let mut unmatched_before = Vec::new();

    for old in before {
        let position = unmatched_after
            .iter()
            .position(|new| new.parameter_types() == old.parameter_types());
        match position {
            Some(index) => {
                let new = unmatched_after.remove(index);
                findings.extend(compare_signature(name, old, new));
            }
            None => unmatched_before.push(old),
        }
    }

    let paired = unmatched_before.len().min(unmatched_after.len());
    for (old, new) in unmatched_before.iter().zip(&unmatched_after) {
        findings.push(signature_changed(name, old, new));
    }
    for old in &unmatched_before[paired..] {
        findings.push(VerificationFinding::new(
            FindingKind::RemovedMethod,
            Some(name),
            format!("Method '{}' was removed", old.render()),
        ));
    }
    for new in &unmatched_after[paired..] {
        findings.push(VerificationFinding::new(
            FindingKind::AddedMethod,
            Some(name),
            format!("Method '{}' was added", new.render()),
        ));
    }

    findings
}

fn compare_signature(
    name: &str,
    before: &MethodSignature,
    after: &MethodSignature,
) -> Option<VerificationFinding> {
    if before.return_type != after.return_type {
        Some(signature_changed(name, before, after))
    } else if before.parameter_names() != after.parameter_names() {
        Some(VerificationFinding::new(
            FindingKind::ParametersChanged,
            Some(name),
            format!(
                "Parameters of '{name}' renamed from ({}) to ({})",
                before.parameter_names().join(", "),
                after.parameter_names().join(", ")
            ),
        ))
    } else {
        None
    }
}

fn signature_changed(
    name: &str,
    before: &MethodSignature,
    after: &MethodSignature,
) -> VerificationFinding {
    VerificationFinding::new(
        FindingKind::SignatureChanged,
        Some(name),
        format!(
            "Signature changed from '{}' to '{}'",
            before.render(),
            after.render()
        ),
    )
}

/// Line-based unified diff; empty for identical inputs.
pub fn unified_diff(before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header("before", "after")
        .to_string()
}
