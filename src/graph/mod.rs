//! Dependency Graph Builder
//!
//! Nodes are file paths; an edge `A -> B` means A's source references a
//! class declared in B. The graph is built once per file set and is
//! read-only afterwards, so it can be shared freely between readers.

pub mod builder;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

pub use builder::{build, build_from_facts};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<PathBuf, ()>,
    node_map: HashMap<PathBuf, NodeIndex>,
}

/// A set of files that depend on each other in a loop.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CircularDependency {
    pub cycle: Vec<PathBuf>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&node) = self.node_map.get(path) {
            return node;
        }
        let node = self.graph.add_node(path.to_path_buf());
        self.node_map.insert(path.to_path_buf(), node);
        node
    }

    /// Add `from -> to`; self-edges and repeats are ignored.
    pub fn add_dependency(&mut self, from: &Path, to: &Path) {
        if from == to {
            return;
        }
        let from = self.add_file(from);
        let to = self.add_file(to);
        self.graph.update_edge(from, to, ());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node_map.contains_key(path)
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Files that `path` depends on.
    pub fn dependencies_of(&self, path: &Path) -> BTreeSet<PathBuf> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Files that depend on `path`.
    pub fn dependents_of(&self, path: &Path) -> BTreeSet<PathBuf> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &Path, direction: Direction) -> BTreeSet<PathBuf> {
        self.node_map
            .get(path)
            .map(|&node| {
                self.graph
                    .neighbors_directed(node, direction)
                    .map(|n| self.graph[n].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn nodes(&self) -> Vec<PathBuf> {
        let mut nodes: Vec<PathBuf> = self.graph.node_weights().cloned().collect();
        nodes.sort();
        nodes
    }

    pub fn edges(&self) -> Vec<(PathBuf, PathBuf)> {
        let mut edges: Vec<(PathBuf, PathBuf)> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(from, to)| (self.graph[from].clone(), self.graph[to].clone()))
            .collect();
        edges.sort();
        edges
    }

    /// Strongly connected groups of more than one file, each sorted.
    pub fn circular_dependencies(&self) -> Vec<CircularDependency> {
        let mut cycles: Vec<CircularDependency> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut cycle: Vec<PathBuf> =
                    component.into_iter().map(|n| self.graph[n].clone()).collect();
                cycle.sort();
                CircularDependency { cycle }
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> PathBuf {
        PathBuf::from(name)
    }

    #[test]
    fn test_queries_are_inverse() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(&p("A.java"), &p("B.java"));
        graph.add_dependency(&p("A.java"), &p("C.java"));
        graph.add_dependency(&p("C.java"), &p("B.java"));

        assert_eq!(
            graph.dependencies_of(&p("A.java")),
            [p("B.java"), p("C.java")].into_iter().collect()
        );
        assert_eq!(
            graph.dependents_of(&p("B.java")),
            [p("A.java"), p("C.java")].into_iter().collect()
        );
        assert!(graph.dependents_of(&p("A.java")).is_empty());
        assert!(graph.dependencies_of(&p("Missing.java")).is_empty());
    }

    #[test]
    fn test_self_and_repeated_edges_are_dropped() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(&p("A.java"), &p("A.java"));
        graph.add_dependency(&p("A.java"), &p("B.java"));
        graph.add_dependency(&p("A.java"), &p("B.java"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges(), vec![(p("A.java"), p("B.java"))]);
    }

    #[test]
    fn test_nodes_are_sorted() {
        let mut graph = DependencyGraph::new();
        graph.add_file(&p("Z.java"));
        graph.add_file(&p("A.java"));
        assert_eq!(graph.nodes(), vec![p("A.java"), p("Z.java")]);
    }

    #[test]
    fn test_cycles() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(&p("B.java"), &p("A.java"));
        graph.add_dependency(&p("A.java"), &p("B.java"));
        graph.add_dependency(&p("A.java"), &p("C.java"));

        let cycles = graph.circular_dependencies();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].cycle, vec![p("A.java"), p("B.java")]);
    }
}
