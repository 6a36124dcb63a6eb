//! Pattern-Safety Advisor
//!
//! Rates how far a refactoring pattern's effects can ripple, from the
//! target file's position in the dependency graph alone. Code content is
//! never inspected here.

pub mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::graph::DependencyGraph;
use crate::smells::{SmellKind, SmellMap};

pub use catalog::patterns_for;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RefactoringPattern {
    ExtractMethod,
    ExtractClass,
    InlineMethod,
    InlineClass,
    RemoveDuplicateCode,
    DecomposeConditional,
    ReplaceTempWithQuery,
    MoveMethod,
    MoveField,
    RenameMethod,
    PullUpMethod,
    PushDownMethod,
    ReplaceConditionalWithPolymorphism,
    IntroduceParameterObject,
    PreserveWholeObject,
    RemoveMiddleMan,
    EncapsulateField,
    CollapseHierarchy,
    ReplaceInheritanceWithDelegation,
    HideDelegate,
    /// Any pattern outside the known catalog.
    Other(String),
}

const KNOWN_PATTERNS: [RefactoringPattern; 20] = [
    RefactoringPattern::ExtractMethod,
    RefactoringPattern::ExtractClass,
    RefactoringPattern::InlineMethod,
    RefactoringPattern::InlineClass,
    RefactoringPattern::RemoveDuplicateCode,
    RefactoringPattern::DecomposeConditional,
    RefactoringPattern::ReplaceTempWithQuery,
    RefactoringPattern::MoveMethod,
    RefactoringPattern::MoveField,
    RefactoringPattern::RenameMethod,
    RefactoringPattern::PullUpMethod,
    RefactoringPattern::PushDownMethod,
    RefactoringPattern::ReplaceConditionalWithPolymorphism,
    RefactoringPattern::IntroduceParameterObject,
    RefactoringPattern::PreserveWholeObject,
    RefactoringPattern::RemoveMiddleMan,
    RefactoringPattern::EncapsulateField,
    RefactoringPattern::CollapseHierarchy,
    RefactoringPattern::ReplaceInheritanceWithDelegation,
    RefactoringPattern::HideDelegate,
];

impl RefactoringPattern {
    pub fn name(&self) -> &str {
        match self {
            Self::ExtractMethod => "Extract Method",
            Self::ExtractClass => "Extract Class",
            Self::InlineMethod => "Inline Method",
            Self::InlineClass => "Inline Class",
            Self::RemoveDuplicateCode => "Remove Duplicate Code",
            Self::DecomposeConditional => "Decompose Conditional",
            Self::ReplaceTempWithQuery => "Replace Temp with Query",
            Self::MoveMethod => "Move Method",
            Self::MoveField => "Move Field",
            Self::RenameMethod => "Rename Method",
            Self::PullUpMethod => "Pull Up Method",
            Self::PushDownMethod => "Push Down Method",
            Self::ReplaceConditionalWithPolymorphism => "Replace Conditional with Polymorphism",
            Self::IntroduceParameterObject => "Introduce Parameter Object",
            Self::PreserveWholeObject => "Preserve Whole Object",
            Self::RemoveMiddleMan => "Remove Middle Man",
            Self::EncapsulateField => "Encapsulate Field",
            Self::CollapseHierarchy => "Collapse Hierarchy",
            Self::ReplaceInheritanceWithDelegation => "Replace Inheritance with Delegation",
            Self::HideDelegate => "Hide Delegate",
            Self::Other(name) => name,
        }
    }

    /// Look up a pattern by display name; unknown names become [`Self::Other`].
    pub fn from_name(name: &str) -> Self {
        KNOWN_PATTERNS
            .iter()
            .find(|pattern| pattern.name().eq_ignore_ascii_case(name.trim()))
            .cloned()
            .unwrap_or_else(|| Self::Other(name.trim().to_string()))
    }

    pub fn safety_class(&self) -> SafetyClass {
        match self {
            Self::ExtractMethod
            | Self::ExtractClass
            | Self::InlineMethod
            | Self::RemoveDuplicateCode
            | Self::DecomposeConditional
            | Self::ReplaceTempWithQuery => SafetyClass::AlwaysSafe,
            Self::MoveMethod
            | Self::RenameMethod
            | Self::PullUpMethod
            | Self::PushDownMethod
            | Self::ReplaceConditionalWithPolymorphism
            | Self::IntroduceParameterObject => SafetyClass::RiskyIfDependents,
            Self::RemoveMiddleMan | Self::EncapsulateField => SafetyClass::UnsafeIfDependents,
            _ => SafetyClass::Unlisted,
        }
    }
}

impl fmt::Display for RefactoringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for RefactoringPattern {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<RefactoringPattern> for String {
    fn from(pattern: RefactoringPattern) -> Self {
        pattern.name().to_string()
    }
}

/// Which bucket of the safety table a pattern falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyClass {
    AlwaysSafe,
    RiskyIfDependents,
    UnsafeIfDependents,
    Unlisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyVerdict {
    Safe,
    Risky,
    Unsafe,
}

impl fmt::Display for SafetyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SafetyVerdict::Safe => "safe",
            SafetyVerdict::Risky => "risky",
            SafetyVerdict::Unsafe => "unsafe",
        })
    }
}

/// Rate a pattern for a file with the given graph neighborhood.
///
/// Unlisted patterns are risky when the file has any neighbor at all.
pub fn pattern_safety(
    pattern: &RefactoringPattern,
    dependencies: &BTreeSet<PathBuf>,
    dependents: &BTreeSet<PathBuf>,
) -> SafetyVerdict {
    let has_dependents = !dependents.is_empty();
    match pattern.safety_class() {
        SafetyClass::AlwaysSafe => SafetyVerdict::Safe,
        SafetyClass::RiskyIfDependents if has_dependents => SafetyVerdict::Risky,
        SafetyClass::UnsafeIfDependents if has_dependents => SafetyVerdict::Unsafe,
        SafetyClass::Unlisted if has_dependents || !dependencies.is_empty() => {
            SafetyVerdict::Risky
        }
        _ => SafetyVerdict::Safe,
    }
}

/// [`pattern_safety`] with the neighborhood looked up in `graph`.
pub fn pattern_safety_in(
    pattern: &RefactoringPattern,
    path: &Path,
    graph: &DependencyGraph,
) -> SafetyVerdict {
    pattern_safety(
        pattern,
        &graph.dependencies_of(path),
        &graph.dependents_of(path),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRecommendation {
    pub pattern: RefactoringPattern,
    pub verdict: SafetyVerdict,
    /// Smells this pattern addresses.
    pub smells: Vec<SmellKind>,
    pub dependents: usize,
    pub dependencies: usize,
}

/// Candidate patterns for a file's smells, each rated once.
///
/// Ordered safest first, then by pattern name.
pub fn recommend_patterns(
    path: &Path,
    smells: &SmellMap,
    graph: &DependencyGraph,
) -> Vec<PatternRecommendation> {
    let dependencies = graph.dependencies_of(path);
    let dependents = graph.dependents_of(path);

    let mut addressed: BTreeMap<RefactoringPattern, Vec<SmellKind>> = BTreeMap::new();
    for kind in smells.keys() {
        for pattern in patterns_for(*kind) {
            addressed.entry(pattern).or_default().push(*kind);
        }
    }

    let mut recommendations: Vec<PatternRecommendation> = addressed
        .into_iter()
        .map(|(pattern, smells)| PatternRecommendation {
            verdict: pattern_safety(&pattern, &dependencies, &dependents),
            pattern,
            smells,
            dependents: dependents.len(),
            dependencies: dependencies.len(),
        })
        .collect();

    recommendations.sort_by(|a, b| {
        a.verdict
            .cmp(&b.verdict)
            .then_with(|| a.pattern.name().cmp(b.pattern.name()))
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use crate::smells::Smell;

    fn files(names: &[&str]) -> BTreeSet<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_always_safe_ignores_neighbors() {
        let verdict = pattern_safety(
            &RefactoringPattern::ExtractMethod,
            &files(&["B.java"]),
            &files(&["C.java"]),
        );
        assert_eq!(verdict, SafetyVerdict::Safe);
    }

    #[test]
    fn test_encapsulate_field_depends_on_dependents() {
        let pattern = RefactoringPattern::EncapsulateField;
        assert_eq!(
            pattern_safety(&pattern, &files(&[]), &files(&["C.java"])),
            SafetyVerdict::Unsafe
        );
        assert_eq!(
            pattern_safety(&pattern, &files(&["B.java"]), &files(&[])),
            SafetyVerdict::Safe
        );
    }

    #[test]
    fn test_risky_if_dependents() {
        let pattern = RefactoringPattern::MoveMethod;
        assert_eq!(
            pattern_safety(&pattern, &files(&[]), &files(&["C.java"])),
            SafetyVerdict::Risky
        );
        assert_eq!(
            pattern_safety(&pattern, &files(&["B.java"]), &files(&[])),
            SafetyVerdict::Safe
        );
    }

    #[test]
    fn test_unlisted_pattern() {
        let pattern = RefactoringPattern::from_name("Introduce Null Object");
        assert_eq!(
            pattern,
            RefactoringPattern::Other("Introduce Null Object".to_string())
        );
        assert_eq!(
            pattern_safety(&pattern, &files(&[]), &files(&[])),
            SafetyVerdict::Safe
        );
        assert_eq!(
            pattern_safety(&pattern, &files(&["B.java"]), &files(&[])),
            SafetyVerdict::Risky
        );
        // known but outside every bucket
        assert_eq!(
            pattern_safety(&RefactoringPattern::HideDelegate, &files(&[]), &files(&["C.java"])),
            SafetyVerdict::Risky
        );
    }

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!(
            RefactoringPattern::from_name("replace temp with query"),
            RefactoringPattern::ReplaceTempWithQuery
        );
        let json = serde_json::to_string(&RefactoringPattern::PullUpMethod).unwrap();
        assert_eq!(json, "\"Pull Up Method\"");
        let back: RefactoringPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RefactoringPattern::PullUpMethod);
    }

    #[test]
    fn test_recommendations_are_deduplicated_and_sorted() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(Path::new("Caller.java"), Path::new("Target.java"));

        let mut smells = SmellMap::new();
        for kind in [SmellKind::GodClass, SmellKind::FeatureEnvy] {
            smells.insert(kind, Smell::new(kind, Severity::Medium, "fixture"));
        }

        let recommendations = recommend_patterns(Path::new("Target.java"), &smells, &graph);
        let summary: Vec<_> = recommendations
            .iter()
            .map(|r| (r.pattern.name().to_string(), r.verdict))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Extract Class".to_string(), SafetyVerdict::Safe),
                ("Extract Method".to_string(), SafetyVerdict::Safe),
                ("Move Method".to_string(), SafetyVerdict::Risky),
            ]
        );
        let extract_method = &recommendations[1];
        assert_eq!(
            extract_method.smells,
            vec![SmellKind::GodClass, SmellKind::FeatureEnvy]
        );
        assert_eq!(extract_method.dependents, 1);
    }
}
