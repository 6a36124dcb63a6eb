//! Structural Extractor.
//!
//! Two strategies produce [`StructuralFacts`] from a [`SourceUnit`]:
//! a tree-sitter walk ([`tree`]) with exact positions, and a regex scan
//! ([`text`]) that tolerates input tree-sitter cannot recover from. The
//! tree is preferred; the scan is used when the tree has errors, and the
//! fallback is reported as a soft warning.

pub mod parser;
pub mod text;
pub mod tree;
pub mod types;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::ast::JavaAst;
use crate::core::{SoftWarning, SourceUnit, WarningSource};
use crate::errors::AnalysisError;

pub use types::{
    ExtractionStrategy, FieldFacts, MethodFacts, Parameter, StructuralFacts, SwitchSite,
    TypeDeclaration, TypeKind, Visibility,
};

static DECISION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:if|else|for|while|do|case|catch|throw|return)\b").unwrap()
});

const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

pub fn is_java_keyword(word: &str) -> bool {
    JAVA_KEYWORDS.contains(&word)
}

/// Decision tokens in already-masked text.
///
/// Keywords `if else for while do case catch throw return` and the
/// operators `&&`, `||`, `?` and `:` each count once. `::` method
/// references are not counted.
pub fn count_decision_points(masked: &str) -> usize {
    let keywords = DECISION_KEYWORD.find_iter(masked).count();

    let bytes = masked.as_bytes();
    let mut operators = 0;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1).copied()) {
            (b'&', Some(b'&')) | (b'|', Some(b'|')) | (b':', Some(b':')) => {
                if bytes[i] != b':' {
                    operators += 1;
                }
                i += 2;
                continue;
            }
            (b'?', _) | (b':', _) => operators += 1,
            _ => {}
        }
        i += 1;
    }

    keywords + operators
}

/// Facts for one unit plus how they were obtained.
#[derive(Debug)]
pub struct Extraction {
    pub facts: StructuralFacts,
    /// Present only when the tree parsed without errors.
    pub ast: Option<JavaAst>,
    pub warning: Option<SoftWarning>,
}

/// Extract structural facts, preferring the syntax tree.
///
/// With `use_tree` off the text scan runs directly and no warning is
/// produced.
pub fn extract(unit: &SourceUnit, use_tree: bool) -> Extraction {
    if !use_tree {
        return Extraction {
            facts: text::extract_facts(&unit.content),
            ast: None,
            warning: None,
        };
    }

    match parse_clean(unit) {
        Ok(ast) => {
            log::debug!("Extracting {} from syntax tree", unit.path.display());
            Extraction {
                facts: tree::extract_facts(&ast),
                ast: Some(ast),
                warning: None,
            }
        }
        Err(err) => {
            log::warn!("{err}; falling back to text extraction");
            Extraction {
                facts: text::extract_facts(&unit.content),
                ast: None,
                warning: Some(SoftWarning::new(
                    WarningSource::Extraction,
                    format!("{err}; using text-pattern extraction with approximate lines"),
                )),
            }
        }
    }
}

/// Parse a unit and reject trees containing syntax errors.
pub fn parse_clean(unit: &SourceUnit) -> Result<JavaAst, AnalysisError> {
    let ast = parser::parse_source(&unit.content, &unit.path)
        .map_err(|e| AnalysisError::parse(&unit.path, format!("{e:#}")))?;
    if ast.has_errors() {
        return Err(AnalysisError::parse(&unit.path, "syntax errors in source"));
    }
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_points() {
        assert_eq!(count_decision_points(""), 0);
        assert_eq!(count_decision_points("if (a && b) { return x; }"), 3);
        assert_eq!(count_decision_points("int v = a ? b : c;"), 2);
        assert_eq!(count_decision_points("list.forEach(System.out::println);"), 0);
        assert_eq!(count_decision_points("} else if (x || y) {"), 3);
        // identifiers containing keywords do not count
        assert_eq!(count_decision_points("format(); iffy(); doWork();"), 0);
    }

    #[test]
    fn test_keywords() {
        assert!(is_java_keyword("synchronized"));
        assert!(is_java_keyword("this"));
        assert!(!is_java_keyword("record"));
        assert!(!is_java_keyword("var"));
        assert!(!is_java_keyword("repository"));
    }

    #[test]
    fn test_clean_source_uses_tree() {
        let unit = SourceUnit::new("A.java", "class A { void run() { } }");
        let extraction = extract(&unit, true);
        assert_eq!(extraction.facts.strategy, ExtractionStrategy::SyntaxTree);
        assert!(extraction.ast.is_some());
        assert!(extraction.warning.is_none());
    }

    #[test]
    fn test_broken_source_falls_back_with_warning() {
        let unit = SourceUnit::new("B.java", "class B { void run() { if ( } ");
        let extraction = extract(&unit, true);
        assert_eq!(extraction.facts.strategy, ExtractionStrategy::TextPattern);
        assert!(extraction.ast.is_none());
        let warning = extraction.warning.unwrap();
        assert_eq!(warning.source, WarningSource::Extraction);
        assert!(warning.message.contains("B.java"));
    }

    #[test]
    fn test_text_only_mode_has_no_warning() {
        let unit = SourceUnit::new("C.java", "class C { }");
        let extraction = extract(&unit, false);
        assert_eq!(extraction.facts.strategy, ExtractionStrategy::TextPattern);
        assert!(extraction.warning.is_none());
    }
}
