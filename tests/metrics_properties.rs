//! Property-based tests for class metrics
//!
//! Invariants checked over generated classes:
//! - The metric key set is fixed
//! - LCOM stays in [0, 1] and comment density in [0, 100]
//! - Computation is deterministic
//! - Adding one branch raises cyclomatic complexity by exactly one

use proptest::prelude::*;
use smellmap::extraction::extract;
use smellmap::metrics::{calculate, ClassMetrics, MetricRecord, LOC_BANDS};
use smellmap::SourceUnit;
use std::collections::BTreeSet;

/// Render a class with `fields` int fields, one method per entry of
/// `branches` (each with that many `if` statements) and `comments` comment lines.
fn render_class(fields: usize, branches: &[usize], comments: usize) -> String {
    let mut out = String::from("public class Sample {\n");
    for i in 0..comments {
        out.push_str(&format!("    // note {i}\n"));
    }
    for f in 0..fields {
        out.push_str(&format!("    private int f{f};\n"));
    }
    for (m, count) in branches.iter().enumerate() {
        out.push_str(&format!("    public int m{m}(int x) {{\n"));
        for b in 0..*count {
            let field = if fields == 0 { "x".to_string() } else { format!("f{}", b % fields) };
            out.push_str(&format!("        if (x > {b}) {{\n            x = x + {field};\n        }}\n"));
        }
        out.push_str("        return x;\n    }\n");
    }
    out.push_str("}\n");
    out
}

fn metrics_of(source: &str) -> ClassMetrics {
    let unit = SourceUnit::new("Sample.java", source);
    let extraction = extract(&unit, true);
    calculate(&unit.content, &extraction.facts)
}

fn class_shape() -> impl Strategy<Value = (usize, Vec<usize>, usize)> {
    (0usize..6, prop::collection::vec(0usize..4, 0..6), 0usize..5)
}

proptest! {
    #[test]
    fn prop_metric_keys_are_fixed((fields, branches, comments) in class_shape()) {
        let metrics = metrics_of(&render_class(fields, &branches, comments));
        let json = serde_json::to_value(metrics).unwrap();
        let keys: BTreeSet<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = ClassMetrics::METRIC_NAMES.into_iter().collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_bounded_metrics_stay_in_range((fields, branches, comments) in class_shape()) {
        let metrics = metrics_of(&render_class(fields, &branches, comments));
        prop_assert!((0.0..=1.0).contains(&metrics.lcom.value));
        prop_assert!((0.0..=100.0).contains(&metrics.comment_density.value));
        for (_, record) in metrics.entries() {
            prop_assert!(record.value.is_finite());
            prop_assert!(record.value >= 0.0);
        }
    }

    #[test]
    fn prop_metrics_are_deterministic((fields, branches, comments) in class_shape()) {
        let source = render_class(fields, &branches, comments);
        prop_assert_eq!(metrics_of(&source), metrics_of(&source));
    }

    #[test]
    fn prop_extra_branch_adds_one_to_cc(
        (fields, branches, comments) in class_shape(),
        target in 0usize..6,
    ) {
        prop_assume!(!branches.is_empty());
        let target = target % branches.len();
        let mut more = branches.clone();
        more[target] += 1;

        let before = metrics_of(&render_class(fields, &branches, comments));
        let after = metrics_of(&render_class(fields, &more, comments));
        prop_assert_eq!(after.cc.value, before.cc.value + 1.0);
        prop_assert_eq!(after.num_methods.value, before.num_methods.value);
    }

    #[test]
    fn prop_loc_status_never_drops(smaller in 0.0f64..1000.0, extra in 0.0f64..1000.0) {
        let low = MetricRecord::new(smaller, LOC_BANDS);
        let high = MetricRecord::new(smaller + extra, LOC_BANDS);
        prop_assert!(high.status >= low.status);
    }

    #[test]
    fn prop_garbage_input_keeps_key_set(text in "[ -~\\n]{0,200}") {
        let metrics = metrics_of(&text);
        prop_assert_eq!(metrics.entries().len(), ClassMetrics::METRIC_NAMES.len());
        prop_assert!((0.0..=1.0).contains(&metrics.lcom.value));
        prop_assert!((0.0..=100.0).contains(&metrics.comment_density.value));
    }
}

#[test]
fn test_empty_class_has_zero_lcom() {
    let metrics = metrics_of("public class Sample {\n}\n");
    assert_eq!(metrics.lcom.value, 0.0);
    assert_eq!(metrics.num_methods.value, 0.0);
    assert_eq!(metrics.cc.value, 1.0);
}
