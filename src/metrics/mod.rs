//! Metrics Calculator
//!
//! Produces a fixed record of class-level software metrics for one source
//! unit. Every metric is always present; a failed computation yields the
//! all-zero record instead of missing entries.

pub mod calculator;
pub mod lcom;
pub mod loc_counter;

use serde::Serialize;

pub use calculator::{calculate, compute_values, metrics_from_values, try_calculate};
pub use lcom::calculate_lcom;
pub use loc_counter::{count_lines, LocCount};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    #[default]
    Low,
    Medium,
    High,
}

/// Cut points for one metric: above `medium` is medium, above `high` is high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusBands {
    pub medium: f64,
    pub high: f64,
    /// The metric is desirable when large.
    pub higher_is_better: bool,
}

impl StatusBands {
    const fn new(medium: f64, high: f64) -> Self {
        Self {
            medium,
            high,
            higher_is_better: false,
        }
    }

    pub fn status(&self, value: f64) -> MetricStatus {
        if value > self.high {
            MetricStatus::High
        } else if value > self.medium {
            MetricStatus::Medium
        } else {
            MetricStatus::Low
        }
    }
}

pub const LCOM_BANDS: StatusBands = StatusBands::new(0.4, 0.7);
pub const CBO_BANDS: StatusBands = StatusBands::new(3.0, 5.0);
pub const DIT_BANDS: StatusBands = StatusBands::new(2.0, 3.0);
pub const CC_BANDS: StatusBands = StatusBands::new(7.0, 10.0);
pub const LOC_BANDS: StatusBands = StatusBands::new(300.0, 500.0);
pub const LOC_PER_METHOD_BANDS: StatusBands = StatusBands::new(15.0, 20.0);
pub const MAX_METHOD_LENGTH_BANDS: StatusBands = StatusBands::new(30.0, 50.0);
pub const NUM_METHODS_BANDS: StatusBands = StatusBands::new(10.0, 15.0);
pub const NUM_FIELDS_BANDS: StatusBands = StatusBands::new(7.0, 10.0);
pub const NUM_PUBLIC_METHODS_BANDS: StatusBands = StatusBands::new(5.0, 8.0);
pub const NUM_PUBLIC_FIELDS_BANDS: StatusBands = StatusBands::new(3.0, 5.0);
/// Comment density is the one inverted metric: a `High` status means the
/// unit is well commented, and `Low` is the status worth flagging.
pub const COMMENT_DENSITY_BANDS: StatusBands = StatusBands {
    medium: 20.0,
    high: 30.0,
    higher_is_better: true,
};

pub const RFC_BANDS: StatusBands = StatusBands::new(20.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRecord {
    pub value: f64,
    /// Value above which the status becomes at least medium.
    pub threshold: f64,
    pub high_threshold: f64,
    pub status: MetricStatus,
    /// Display hint for report renderers.
    pub icon: &'static str,
}

impl MetricRecord {
    pub fn new(value: f64, bands: StatusBands) -> Self {
        let status = bands.status(value);
        Self {
            value,
            threshold: bands.medium,
            high_threshold: bands.high,
            status,
            icon: icon_for(status, bands.higher_is_better),
        }
    }
}

fn icon_for(status: MetricStatus, higher_is_better: bool) -> &'static str {
    match (status, higher_is_better) {
        (MetricStatus::Low, false) | (MetricStatus::High, true) => "✅",
        (MetricStatus::Medium, _) => "⚠️",
        (MetricStatus::High, false) | (MetricStatus::Low, true) => "❌",
    }
}

/// Raw metric values before status bands are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValues {
    pub lcom: f64,
    pub cbo: f64,
    pub dit: f64,
    pub cc: f64,
    pub rfc: f64,
    pub loc: f64,
    pub loc_per_method: f64,
    pub max_method_length: f64,
    pub num_methods: f64,
    pub num_fields: f64,
    pub num_public_methods: f64,
    pub num_public_fields: f64,
    pub comment_density: f64,
}

impl MetricValues {
    pub fn entries(&self) -> [(&'static str, f64); 13] {
        [
            ("lcom", self.lcom),
            ("cbo", self.cbo),
            ("dit", self.dit),
            ("cc", self.cc),
            ("rfc", self.rfc),
            ("loc", self.loc),
            ("loc_per_method", self.loc_per_method),
            ("max_method_length", self.max_method_length),
            ("num_methods", self.num_methods),
            ("num_fields", self.num_fields),
            ("num_public_methods", self.num_public_methods),
            ("num_public_fields", self.num_public_fields),
            ("comment_density", self.comment_density),
        ]
    }
}

/// Class-level metrics, one field per metric name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub lcom: MetricRecord,
    pub cbo: MetricRecord,
    pub dit: MetricRecord,
    pub cc: MetricRecord,
    pub rfc: MetricRecord,
    pub loc: MetricRecord,
    pub loc_per_method: MetricRecord,
    pub max_method_length: MetricRecord,
    pub num_methods: MetricRecord,
    pub num_fields: MetricRecord,
    pub num_public_methods: MetricRecord,
    pub num_public_fields: MetricRecord,
    pub comment_density: MetricRecord,
}

impl ClassMetrics {
    pub const METRIC_NAMES: [&'static str; 13] = [
        "lcom",
        "cbo",
        "dit",
        "cc",
        "rfc",
        "loc",
        "loc_per_method",
        "max_method_length",
        "num_methods",
        "num_fields",
        "num_public_methods",
        "num_public_fields",
        "comment_density",
    ];

    pub fn from_values(values: &MetricValues) -> Self {
        Self {
            lcom: MetricRecord::new(values.lcom, LCOM_BANDS),
            cbo: MetricRecord::new(values.cbo, CBO_BANDS),
            dit: MetricRecord::new(values.dit, DIT_BANDS),
            cc: MetricRecord::new(values.cc, CC_BANDS),
            rfc: MetricRecord::new(values.rfc, RFC_BANDS),
            loc: MetricRecord::new(values.loc, LOC_BANDS),
            loc_per_method: MetricRecord::new(values.loc_per_method, LOC_PER_METHOD_BANDS),
            max_method_length: MetricRecord::new(
                values.max_method_length,
                MAX_METHOD_LENGTH_BANDS,
            ),
            num_methods: MetricRecord::new(values.num_methods, NUM_METHODS_BANDS),
            num_fields: MetricRecord::new(values.num_fields, NUM_FIELDS_BANDS),
            num_public_methods: MetricRecord::new(
                values.num_public_methods,
                NUM_PUBLIC_METHODS_BANDS,
            ),
            num_public_fields: MetricRecord::new(
                values.num_public_fields,
                NUM_PUBLIC_FIELDS_BANDS,
            ),
            comment_density: MetricRecord::new(values.comment_density, COMMENT_DENSITY_BANDS),
        }
    }

    /// Records in [`Self::METRIC_NAMES`] order.
    pub fn entries(&self) -> [(&'static str, &MetricRecord); 13] {
        [
            ("lcom", &self.lcom),
            ("cbo", &self.cbo),
            ("dit", &self.dit),
            ("cc", &self.cc),
            ("rfc", &self.rfc),
            ("loc", &self.loc),
            ("loc_per_method", &self.loc_per_method),
            ("max_method_length", &self.max_method_length),
            ("num_methods", &self.num_methods),
            ("num_fields", &self.num_fields),
            ("num_public_methods", &self.num_public_methods),
            ("num_public_fields", &self.num_public_fields),
            ("comment_density", &self.comment_density),
        ]
    }

    pub fn get(&self, name: &str) -> Option<&MetricRecord> {
        self.entries()
            .into_iter()
            .find(|(metric, _)| *metric == name)
            .map(|(_, record)| record)
    }
}

impl Default for ClassMetrics {
    /// All-zero record used when computation fails.
    fn default() -> Self {
        Self::from_values(&MetricValues::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bands_are_strict() {
        assert_eq!(LOC_BANDS.status(300.0), MetricStatus::Low);
        assert_eq!(LOC_BANDS.status(301.0), MetricStatus::Medium);
        assert_eq!(LOC_BANDS.status(500.0), MetricStatus::Medium);
        assert_eq!(LOC_BANDS.status(501.0), MetricStatus::High);
        assert_eq!(LCOM_BANDS.status(0.71), MetricStatus::High);
    }

    #[test]
    fn test_comment_density_icon_is_inverted() {
        let dense = MetricRecord::new(40.0, COMMENT_DENSITY_BANDS);
        assert_eq!(dense.status, MetricStatus::High);
        assert_eq!(dense.icon, "✅");

        let sparse = MetricRecord::new(2.0, COMMENT_DENSITY_BANDS);
        assert_eq!(sparse.status, MetricStatus::Low);
        assert_eq!(sparse.icon, "❌");

        let coupled = MetricRecord::new(7.0, CBO_BANDS);
        assert_eq!(coupled.icon, "❌");
    }

    #[test]
    fn test_default_record_is_zero_and_low() {
        let metrics = ClassMetrics::default();
        for (name, record) in metrics.entries() {
            assert_eq!(record.value, 0.0, "{name}");
            assert_eq!(record.status, MetricStatus::Low, "{name}");
        }
    }

    #[test]
    fn test_entries_match_metric_names() {
        let metrics = ClassMetrics::default();
        let names: Vec<_> = metrics.entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ClassMetrics::METRIC_NAMES.to_vec());
        assert!(metrics.get("rfc").is_some());
        assert!(metrics.get("wmc").is_none());
    }

    #[test]
    fn test_json_keys_are_metric_names() {
        let json = serde_json::to_value(ClassMetrics::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 13);
        for name in ClassMetrics::METRIC_NAMES {
            assert!(object.contains_key(name), "{name}");
        }
        assert_eq!(json["loc"]["status"], "low");
    }
}
