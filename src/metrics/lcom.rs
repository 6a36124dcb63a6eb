//! Lack of cohesion between methods.

use std::collections::BTreeSet;

use crate::extraction::StructuralFacts;

/// Fraction of method pairs whose referenced identifiers do not overlap.
///
/// Every identifier in a body counts, locals and parameters included.
/// Returns 0 for fewer than two methods.
pub fn calculate_lcom(facts: &StructuralFacts) -> f64 {
    let usage: Vec<BTreeSet<&str>> = facts
        .methods()
        .map(|method| method.identifiers.iter().map(String::as_str).collect())
        .collect();

    lcom_of(&usage)
}

pub(crate) fn lcom_of<T: Ord>(usage: &[BTreeSet<T>]) -> f64 {
    let n = usage.len();
    if n < 2 {
        return 0.0;
    }

    let total_pairs = n * (n - 1) / 2;
    let disjoint_pairs = usage
        .iter()
        .enumerate()
        .flat_map(|(i, a)| usage[i + 1..].iter().map(move |b| (a, b)))
        .filter(|(a, b)| a.is_disjoint(b))
        .count();

    disjoint_pairs as f64 / total_pairs as f64
}
