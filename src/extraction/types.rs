use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::metrics::loc_counter::LocCount;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    #[default]
    Package,
}

impl Visibility {
    pub fn from_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut visibility = Visibility::Package;
        for modifier in modifiers {
            match modifier {
                "public" => return Visibility::Public,
                "protected" => visibility = Visibility::Protected,
                "private" => visibility = Visibility::Private,
                _ => {}
            }
        }
        visibility
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// tree-sitter walk; line numbers are exact
    SyntaxTree,
    /// regex scan; line numbers are best effort
    TextPattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub start_line: usize,
    pub end_line: usize,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodFacts {
    pub name: String,
    /// Declaring type, when known.
    pub owner: Option<String>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_constructor: bool,
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
    pub start_line: usize,
    pub end_line: usize,
    /// Decision keywords and operators inside the body.
    pub branch_count: usize,
    /// Identifiers referenced in the body, used for cohesion.
    pub identifiers: BTreeSet<String>,
    /// Member accesses and calls qualified by something other than `this`.
    pub external_accesses: usize,
    /// Member accesses through `this` or unqualified fields.
    pub own_accesses: usize,
    pub has_override: bool,
    pub calls_super: bool,
    /// Body is a single call forwarded to a field.
    pub is_delegation: bool,
    pub longest_call_chain: usize,
}

impl MethodFacts {
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn body_lines(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn is_accessor(&self) -> bool {
        is_accessor_name(&self.name, self.param_count())
    }
}

/// `getX()`, `isX()`, `setX(v)`.
pub fn is_accessor_name(name: &str, param_count: usize) -> bool {
    let has_suffix = |prefix: &str| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    };
    ((has_suffix("get") || has_suffix("is")) && param_count == 0)
        || (has_suffix("set") && param_count == 1)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFacts {
    pub name: String,
    pub owner: Option<String>,
    pub type_name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchSite {
    pub line: usize,
    pub case_count: usize,
}

/// Structural facts derived from one source unit.
///
/// Built fresh for each analysis and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFacts {
    pub strategy: ExtractionStrategy,
    pub types: Vec<TypeDeclaration>,
    pub methods: Vec<MethodFacts>,
    pub fields: Vec<FieldFacts>,
    /// Full import targets, e.g. `java.util.List` or `com.acme.*`.
    pub imports: BTreeSet<String>,
    /// Types constructed with `new`.
    pub instantiated_types: BTreeSet<String>,
    /// Identifiers that qualify a call or field access (`repo` in `repo.save()`).
    pub call_qualifiers: BTreeSet<String>,
    /// Superclass and interface names across all declarations.
    pub supertypes: BTreeSet<String>,
    pub extends_count: usize,
    pub switches: Vec<SwitchSite>,
    pub lines: LocCount,
}

impl StructuralFacts {
    pub fn empty(strategy: ExtractionStrategy) -> Self {
        Self {
            strategy,
            types: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            imports: BTreeSet::new(),
            instantiated_types: BTreeSet::new(),
            call_qualifiers: BTreeSet::new(),
            supertypes: BTreeSet::new(),
            extends_count: 0,
            switches: Vec::new(),
            lines: LocCount::default(),
        }
    }

    /// Methods proper; constructors are excluded.
    pub fn methods(&self) -> impl Iterator<Item = &MethodFacts> {
        self.methods.iter().filter(|m| !m.is_constructor)
    }

    pub fn method_count(&self) -> usize {
        self.methods().count()
    }

    pub fn getters_setters(&self) -> usize {
        self.methods().filter(|m| m.is_accessor()).count()
    }

    /// Simple names of imported types; wildcard imports contribute nothing.
    pub fn imported_type_names(&self) -> BTreeSet<String> {
        self.imports
            .iter()
            .filter_map(|import| import.rsplit('.').next())
            .filter(|name| *name != "*" && !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn declared_type_names(&self) -> BTreeSet<String> {
        self.types.iter().map(|t| t.name.clone()).collect()
    }

    /// Type names this unit refers to, for cross-file dependency resolution.
    ///
    /// Call qualifiers only count when they look like type names
    /// (`Registry.lookup()`), not variables (`registry.lookup()`).
    pub fn referenced_type_names(&self) -> BTreeSet<String> {
        let declared = self.declared_type_names();
        self.imported_type_names()
            .into_iter()
            .chain(self.instantiated_types.iter().cloned())
            .chain(self.supertypes.iter().cloned())
            .chain(
                self.call_qualifiers
                    .iter()
                    .filter(|q| looks_like_type_name(q))
                    .cloned(),
            )
            .filter(|name| !declared.contains(name))
            .collect()
    }
}

pub fn looks_like_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.any(|c| c.is_ascii_lowercase())
}

/// Strip generic arguments and array suffixes: `Map<K, V>[]` -> `Map`.
pub fn base_type_name(type_text: &str) -> String {
    let without_generics = type_text.split('<').next().unwrap_or(type_text);
    let trimmed = without_generics.trim().trim_end_matches("[]").trim();
    trimmed.rsplit('.').next().unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_names() {
        assert!(is_accessor_name("getName", 0));
        assert!(is_accessor_name("isActive", 0));
        assert!(is_accessor_name("setName", 1));
        assert!(!is_accessor_name("setName", 2));
        assert!(!is_accessor_name("getaway", 0));
        assert!(!is_accessor_name("settle", 1));
    }

    #[test]
    fn test_visibility_from_modifiers() {
        assert_eq!(
            Visibility::from_modifiers(["static", "public"]),
            Visibility::Public
        );
        assert_eq!(Visibility::from_modifiers(["private"]), Visibility::Private);
        assert_eq!(Visibility::from_modifiers(Vec::<&str>::new()), Visibility::Package);
    }

    #[test]
    fn test_base_type_name() {
        assert_eq!(base_type_name("java.util.Map<String, Integer>"), "Map");
        assert_eq!(base_type_name("Order[]"), "Order");
        assert_eq!(base_type_name("int"), "int");
    }

    #[test]
    fn test_type_name_heuristic() {
        assert!(looks_like_type_name("Registry"));
        assert!(!looks_like_type_name("registry"));
        assert!(!looks_like_type_name("MAX_SIZE"));
    }

    #[test]
    fn test_wildcard_imports_are_ignored() {
        let mut facts = StructuralFacts::empty(ExtractionStrategy::TextPattern);
        facts.imports.insert("java.util.*".to_string());
        facts.imports.insert("com.acme.Order".to_string());
        let names: Vec<_> = facts.imported_type_names().into_iter().collect();
        assert_eq!(names, vec!["Order".to_string()]);
    }
}
