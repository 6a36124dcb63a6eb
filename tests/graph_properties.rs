//! Property-based tests for the dependency graph
//!
//! - Every edge shows up in both directions of the neighborhood queries
//! - Self-references never become edges
//! - The syntax-tree and text strategies agree on the edge set

use proptest::prelude::*;
use smellmap::graph::build;
use smellmap::SourceUnit;
use std::path::PathBuf;

/// One file per node; `edges[i][j]` makes `Node{i}` instantiate `Node{j}`.
fn render_project(edges: &[Vec<bool>]) -> Vec<SourceUnit> {
    edges
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut body = String::new();
            for (j, linked) in row.iter().enumerate() {
                if *linked {
                    body.push_str(&format!("    private Object f{j} = new Node{j}();\n"));
                }
            }
            SourceUnit::new(
                format!("Node{i}.java"),
                format!("public class Node{i} {{\n{body}}}\n"),
            )
        })
        .collect()
}

fn adjacency() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (2usize..6).prop_flat_map(|n| prop::collection::vec(prop::collection::vec(any::<bool>(), n), n))
}

proptest! {
    #[test]
    fn prop_dependents_invert_dependencies(edges in adjacency()) {
        let units = render_project(&edges);
        let graph = build(&units, true);

        for unit in &units {
            for dependency in graph.dependencies_of(&unit.path) {
                prop_assert!(graph.dependents_of(&dependency).contains(&unit.path));
            }
            for dependent in graph.dependents_of(&unit.path) {
                prop_assert!(graph.dependencies_of(&dependent).contains(&unit.path));
            }
        }
    }

    #[test]
    fn prop_edges_match_references(edges in adjacency()) {
        let graph = build(&render_project(&edges), true);

        let mut expected = Vec::new();
        for (i, row) in edges.iter().enumerate() {
            for (j, linked) in row.iter().enumerate() {
                if *linked && i != j {
                    expected.push((
                        PathBuf::from(format!("Node{i}.java")),
                        PathBuf::from(format!("Node{j}.java")),
                    ));
                }
            }
        }
        expected.sort();
        prop_assert_eq!(graph.edges(), expected);
    }

    #[test]
    fn prop_strategies_agree(edges in adjacency()) {
        let units = render_project(&edges);
        prop_assert_eq!(build(&units, true).edges(), build(&units, false).edges());
    }
}

#[test]
fn test_two_file_cycle_is_reported() {
    let units = render_project(&[vec![false, true], vec![true, false]]);
    let cycles = build(&units, true).circular_dependencies();
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0].cycle,
        vec![PathBuf::from("Node0.java"), PathBuf::from("Node1.java")]
    );
}
