//! Smell Classifier
//!
//! Two strategies feed one smell map per unit:
//! - [`threshold`] evaluates boolean rules over metric values and raw counts,
//! - [`structural`] walks the syntax tree and reports exact lines.
//!
//! [`classifier::SmellClassifier`] runs both and merges their results.

pub mod classifier;
pub mod duplication;
pub mod structural;
pub mod threshold;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::{Severity, SoftWarning, SourceLocation};

pub use classifier::SmellClassifier;
pub use threshold::ClassProfile;

/// The closed set of detected smells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SmellKind {
    #[serde(rename = "God Class")]
    GodClass,
    #[serde(rename = "Data Class")]
    DataClass,
    #[serde(rename = "Lazy Class")]
    LazyClass,
    #[serde(rename = "Feature Envy")]
    FeatureEnvy,
    #[serde(rename = "Refused Bequest")]
    RefusedBequest,
    #[serde(rename = "Long Method")]
    LongMethod,
    #[serde(rename = "Complex Class")]
    ComplexClass,
    #[serde(rename = "Long Parameter List")]
    LongParameterList,
    #[serde(rename = "Duplicate Code")]
    DuplicateCode,
    #[serde(rename = "Switch Statements")]
    SwitchStatements,
    #[serde(rename = "Too Many Fields")]
    TooManyFields,
    #[serde(rename = "Message Chains")]
    MessageChains,
    #[serde(rename = "Middle Man")]
    MiddleMan,
    #[serde(rename = "Inappropriate Intimacy")]
    InappropriateIntimacy,
}

impl SmellKind {
    pub const ALL: [SmellKind; 14] = [
        SmellKind::GodClass,
        SmellKind::DataClass,
        SmellKind::LazyClass,
        SmellKind::FeatureEnvy,
        SmellKind::RefusedBequest,
        SmellKind::LongMethod,
        SmellKind::ComplexClass,
        SmellKind::LongParameterList,
        SmellKind::DuplicateCode,
        SmellKind::SwitchStatements,
        SmellKind::TooManyFields,
        SmellKind::MessageChains,
        SmellKind::MiddleMan,
        SmellKind::InappropriateIntimacy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SmellKind::GodClass => "God Class",
            SmellKind::DataClass => "Data Class",
            SmellKind::LazyClass => "Lazy Class",
            SmellKind::FeatureEnvy => "Feature Envy",
            SmellKind::RefusedBequest => "Refused Bequest",
            SmellKind::LongMethod => "Long Method",
            SmellKind::ComplexClass => "Complex Class",
            SmellKind::LongParameterList => "Long Parameter List",
            SmellKind::DuplicateCode => "Duplicate Code",
            SmellKind::SwitchStatements => "Switch Statements",
            SmellKind::TooManyFields => "Too Many Fields",
            SmellKind::MessageChains => "Message Chains",
            SmellKind::MiddleMan => "Middle Man",
            SmellKind::InappropriateIntimacy => "Inappropriate Intimacy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for SmellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A detected smell with its reasoning and evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smell {
    pub kind: SmellKind,
    pub severity: Severity,
    pub reason: String,
    /// Contributing metric name to formatted comparison, e.g. `"cc" -> "WMC = 24 > 20"`.
    pub evidence: BTreeMap<String, String>,
    /// Exact positions, filled by the structural strategy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,
}

impl Smell {
    pub fn new(kind: SmellKind, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            reason: reason.into(),
            evidence: BTreeMap::new(),
            locations: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, metric: &str, evidence: impl Into<String>) -> Self {
        self.evidence.insert(metric.to_string(), evidence.into());
        self
    }
}

/// Smells keyed by kind; a kind appears at most once per unit.
pub type SmellMap = BTreeMap<SmellKind, Smell>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmellReport {
    pub smells: SmellMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SoftWarning>,
}

impl SmellReport {
    pub fn contains(&self, kind: SmellKind) -> bool {
        self.smells.contains_key(&kind)
    }

    pub fn get(&self, kind: SmellKind) -> Option<&Smell> {
        self.smells.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = SmellKind> + '_ {
        self.smells.keys().copied()
    }
}

/// `LABEL = value > threshold`, printing whole numbers without decimals.
pub fn format_comparison(label: &str, value: f64, op: &str, threshold: f64) -> String {
    format!(
        "{label} = {} {op} {}",
        format_number(value),
        format_number(threshold)
    )
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
