use std::collections::{BTreeMap, BTreeSet};

use crate::core::ast::JavaAst;
use crate::extraction::tree::extract_facts;
use crate::extraction::{Parameter, StructuralFacts, TypeKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl MethodSignature {
    pub fn parameter_types(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.type_name.as_str()).collect()
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn render(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        match &self.return_type {
            Some(ret) => format!("{ret} {}({params})", self.name),
            None => format!("{}({params})", self.name),
        }
    }
}

/// What the verifier compares between two versions of a class.
#[derive(Debug, Clone, Default)]
pub struct ClassContract {
    /// Every overload per method name, in declaration order.
    pub methods: BTreeMap<String, Vec<MethodSignature>>,
    /// Methods that fulfil an interface: `@Override`s in implementing
    /// classes plus methods of same-file interfaces those classes implement.
    pub interface_methods: BTreeSet<String>,
}

impl ClassContract {
    pub fn from_ast(ast: &JavaAst) -> Self {
        Self::from_facts(&extract_facts(ast))
    }

    pub fn from_facts(facts: &StructuralFacts) -> Self {
        let mut methods: BTreeMap<String, Vec<MethodSignature>> = BTreeMap::new();
        for method in &facts.methods {
            methods
                .entry(method.name.clone())
                .or_default()
                .push(MethodSignature {
                    name: method.name.clone(),
                    return_type: method.return_type.clone(),
                    parameters: method.parameters.clone(),
                });
        }

        let implementors: Vec<_> = facts
            .types
            .iter()
            .filter(|t| t.kind != TypeKind::Interface && !t.interfaces.is_empty())
            .collect();
        let implemented: BTreeSet<&str> = implementors
            .iter()
            .flat_map(|t| t.interfaces.iter().map(String::as_str))
            .collect();
        let implementor_names: BTreeSet<&str> =
            implementors.iter().map(|t| t.name.as_str()).collect();

        let interface_methods = facts
            .methods
            .iter()
            .filter(|m| {
                let owner = m.owner.as_deref().unwrap_or_default();
                (m.has_override && implementor_names.contains(owner))
                    || implemented.contains(owner)
            })
            .map(|m| m.name.clone())
            .collect();

        Self {
            methods,
            interface_methods,
        }
    }
}
