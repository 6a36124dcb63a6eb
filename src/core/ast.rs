use std::path::PathBuf;
use tree_sitter::Tree;

/// A parsed Java compilation unit together with the text it was parsed from.
///
/// Tree-sitter recovers from syntax errors, so a tree exists for any input;
/// `has_errors` tells callers whether positions inside it can be trusted.
#[derive(Clone, Debug)]
pub struct JavaAst {
    pub tree: Tree,
    pub source: String,
    pub path: PathBuf,
}

impl JavaAst {
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}
