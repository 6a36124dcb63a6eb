use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::DependencyGraph;
use crate::core::SourceUnit;
use crate::extraction::{extract, StructuralFacts};

/// Build the graph for a project, extracting facts for every unit.
pub fn build(units: &[SourceUnit], use_tree: bool) -> DependencyGraph {
    let facts: Vec<StructuralFacts> = units
        .par_iter()
        .map(|unit| extract(unit, use_tree).facts)
        .collect();

    let inputs: Vec<(&SourceUnit, &StructuralFacts)> = units.iter().zip(&facts).collect();
    build_from_facts(&inputs)
}

/// Build the graph from already extracted facts.
///
/// Runs in two passes: every declared class is mapped to its file before
/// any reference is resolved, since a reference may point at a file that
/// comes later in the input. When two files declare the same class, the
/// first one in input order owns it. References that resolve to no
/// project file are library classes and produce no edge.
pub fn build_from_facts(inputs: &[(&SourceUnit, &StructuralFacts)]) -> DependencyGraph {
    let declared: Vec<(&Path, BTreeSet<String>)> = inputs
        .par_iter()
        .map(|(unit, facts)| {
            let mut names = facts.declared_type_names();
            names.extend(unit.class_name.iter().cloned());
            (unit.path(), names)
        })
        .collect();

    let mut class_to_file: HashMap<&str, &Path> = HashMap::new();
    for (path, names) in &declared {
        for name in names {
            match class_to_file.get(name.as_str()) {
                Some(owner) if *owner != *path => log::debug!(
                    "Class {name} declared in both {} and {}; keeping the first",
                    owner.display(),
                    path.display()
                ),
                Some(_) => {}
                None => {
                    class_to_file.insert(name.as_str(), *path);
                }
            }
        }
    }

    let edges: Vec<(&Path, Vec<&Path>)> = inputs
        .par_iter()
        .map(|(unit, facts)| {
            let targets: BTreeSet<&Path> = facts
                .referenced_type_names()
                .iter()
                .filter_map(|name| class_to_file.get(name.as_str()).copied())
                .collect();
            (unit.path(), targets.into_iter().collect())
        })
        .collect();

    let mut graph = DependencyGraph::new();
    for (unit, _) in inputs {
        graph.add_file(unit.path());
    }
    for (from, targets) in edges {
        for to in targets {
            graph.add_dependency(from, to);
        }
    }

    log::debug!(
        "Built dependency graph: {} files, {} edges",
        graph.file_count(),
        graph.edge_count()
    );
    graph
}
