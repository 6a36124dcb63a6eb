use crate::errors::{AnalysisError, Result};
use crate::extraction::text::mask_comments_and_literals;
use crate::extraction::{count_decision_points, StructuralFacts, Visibility};

use super::lcom::calculate_lcom;
use super::{ClassMetrics, MetricValues};

/// Raw metric values for one unit.
///
/// `content` is the unit's full text; `cc` counts decision tokens across
/// all of it, while the remaining metrics come from `facts`.
pub fn compute_values(content: &str, facts: &StructuralFacts) -> MetricValues {
    let masked = mask_comments_and_literals(content);
    let cc = 1 + count_decision_points(&masked);

    let cbo = facts
        .imported_type_names()
        .into_iter()
        .chain(facts.instantiated_types.iter().cloned())
        .chain(facts.call_qualifiers.iter().cloned())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    let method_lengths: Vec<usize> = facts.methods().map(|m| m.body_lines()).collect();
    let num_methods = method_lengths.len();
    let loc_per_method = if num_methods == 0 {
        0.0
    } else {
        method_lengths.iter().sum::<usize>() as f64 / num_methods as f64
    };

    let comment_density = if facts.lines.physical_lines == 0 {
        0.0
    } else {
        100.0 * facts.lines.comment_lines as f64 / facts.lines.physical_lines as f64
    };

    MetricValues {
        lcom: calculate_lcom(facts),
        cbo: cbo as f64,
        dit: facts.extends_count as f64,
        cc: cc as f64,
        rfc: (num_methods + cbo) as f64,
        loc: facts.lines.non_empty_lines() as f64,
        loc_per_method,
        max_method_length: method_lengths.iter().copied().max().unwrap_or(0) as f64,
        num_methods: num_methods as f64,
        num_fields: facts.fields.len() as f64,
        num_public_methods: facts
            .methods()
            .filter(|m| m.visibility == Visibility::Public)
            .count() as f64,
        num_public_fields: facts
            .fields
            .iter()
            .filter(|f| f.visibility == Visibility::Public)
            .count() as f64,
        comment_density,
    }
}

/// Compute metrics, failing if any value falls outside its domain.
pub fn try_calculate(content: &str, facts: &StructuralFacts) -> Result<ClassMetrics> {
    metrics_from_values(&compute_values(content, facts))
}

/// Check already computed values against their domains and apply status bands.
pub fn metrics_from_values(values: &MetricValues) -> Result<ClassMetrics> {
    if let Some((name, value)) = values
        .entries()
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
    {
        return Err(AnalysisError::metric(name, format!("invalid value {value}")));
    }
    if !(0.0..=1.0).contains(&values.lcom) {
        return Err(AnalysisError::metric("lcom", "must lie in [0, 1]"));
    }
    if !(0.0..=100.0).contains(&values.comment_density) {
        return Err(AnalysisError::metric("comment_density", "must lie in [0, 100]"));
    }

    Ok(ClassMetrics::from_values(values))
}

/// Compute metrics, falling back to the all-zero record on failure.
pub fn calculate(content: &str, facts: &StructuralFacts) -> ClassMetrics {
    try_calculate(content, facts).unwrap_or_else(|err| {
        log::warn!("{err}; using default metrics");
        ClassMetrics::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::text::extract_facts;
    use crate::metrics::MetricStatus;
    use indoc::indoc;

    const INVENTORY: &str = indoc! {r#"
        import java.util.Map;
        import java.util.HashMap;

        // Tracks stock levels.
        public class Inventory extends Store {
            private Map<String, Integer> stock = new HashMap<>();
            public int capacity;

            public int count(String sku) {
                if (stock.containsKey(sku) && capacity > 0) {
                    return stock.get(sku);
                }
                return 0;
            }

            public void add(String sku) {
                stock.put(sku, count(sku) + 1);
            }
        }
    "#};

    fn metrics_for(source: &str) -> (MetricValues, ClassMetrics) {
        let facts = extract_facts(source);
        (compute_values(source, &facts), calculate(source, &facts))
    }

    #[test]
    fn test_counts() {
        let (values, metrics) = metrics_for(INVENTORY);
        assert_eq!(values.num_methods, 2.0);
        assert_eq!(values.num_public_methods, 2.0);
        assert_eq!(values.num_fields, 2.0);
        assert_eq!(values.num_public_fields, 1.0);
        assert_eq!(values.dit, 1.0);
        assert_eq!(values.loc, 16.0);
        assert_eq!(values.max_method_length, 6.0);
        assert_eq!(values.loc_per_method, 4.5);
        assert_eq!(metrics.num_methods.status, MetricStatus::Low);
    }

    #[test]
    fn test_complexity_counts_whole_unit() {
        let (values, _) = metrics_for(INVENTORY);
        // 1 + if + && + return + return
        assert_eq!(values.cc, 5.0);
    }

    #[test]
    fn test_coupling_unions_imports_instantiations_and_qualifiers() {
        let (values, _) = metrics_for(INVENTORY);
        // Map, HashMap, stock
        assert_eq!(values.cbo, 3.0);
        assert_eq!(values.rfc, 5.0);
    }

    #[test]
    fn test_cohesion_over_shared_identifiers() {
        let (values, _) = metrics_for(INVENTORY);
        // both methods touch `stock` and `sku`
        assert_eq!(values.lcom, 0.0);
    }

    #[test]
    fn test_comment_density() {
        let (values, metrics) = metrics_for(INVENTORY);
        assert!((values.comment_density - 100.0 / 19.0).abs() < 1e-9);
        assert_eq!(metrics.comment_density.status, MetricStatus::Low);
    }

    #[test]
    fn test_out_of_domain_values_are_rejected() {
        let (values, _) = metrics_for(INVENTORY);
        let bad = MetricValues { lcom: 1.5, ..values };
        let err = metrics_from_values(&bad).unwrap_err();
        assert!(err.to_string().contains("lcom"));

        let metrics = metrics_from_values(&values).unwrap();
        assert_eq!(metrics, calculate(INVENTORY, &extract_facts(INVENTORY)));
    }

    #[test]
    fn test_empty_input_yields_zero_record() {
        let (values, metrics) = metrics_for("");
        assert_eq!(values.cc, 1.0);
        assert_eq!(values.comment_density, 0.0);
        assert_eq!(metrics.lcom.value, 0.0);
        assert_eq!(metrics.cc.status, MetricStatus::Low);
    }
}
