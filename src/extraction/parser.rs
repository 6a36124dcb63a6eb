//! Tree-sitter parser integration for Java.

use crate::core::ast::JavaAst;
use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parse Java source into a tree-sitter AST.
///
/// Only fails when the parser cannot be set up or gives up; syntax errors
/// are recovered into the tree and reported by [`JavaAst::has_errors`].
pub fn parse_source(content: &str, path: &Path) -> Result<JavaAst> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .context("Failed to set Java language")?;

    let tree = parser
        .parse(content, None)
        .context("Failed to parse Java source")?;

    Ok(JavaAst {
        tree,
        source: content.to_string(),
        path: path.to_path_buf(),
    })
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Get the last line number for a tree-sitter node (1-indexed)
pub fn node_end_line(node: &Node) -> usize {
    node.end_position().row + 1
}

/// Keyword and annotation children of a declaration's `modifiers` node.
pub fn modifiers<'a>(node: &Node, source: &'a str) -> Vec<&'a str> {
    let mut cursor = node.walk();
    let Some(modifiers) = node
        .children(&mut cursor)
        .find(|child| child.kind() == "modifiers")
    else {
        return Vec::new();
    };

    let mut inner = modifiers.walk();
    modifiers
        .children(&mut inner)
        .map(|child| match child.kind() {
            "marker_annotation" | "annotation" => child
                .child_by_field_name("name")
                .map_or("", |name| node_text(&name, source)),
            _ => node_text(&child, source),
        })
        .collect()
}
