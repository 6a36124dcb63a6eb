//! Syntax-tree extraction over a tree-sitter-java parse.
//!
//! Produces the same [`StructuralFacts`] shape as the text scanner, with
//! exact line positions. Callers should only use it on trees without errors.

use std::collections::BTreeSet;
use tree_sitter::Node;

use super::parser::{modifiers, node_end_line, node_line, node_text};
use super::text::mask_comments_and_literals;
use super::types::{
    base_type_name, ExtractionStrategy, FieldFacts, MethodFacts, Parameter, StructuralFacts,
    SwitchSite, TypeDeclaration, TypeKind, Visibility,
};
use super::{count_decision_points, is_java_keyword};
use crate::core::ast::JavaAst;
use crate::metrics::loc_counter::count_lines;

pub fn extract_facts(ast: &JavaAst) -> StructuralFacts {
    let source = ast.source.as_str();
    let mut facts = StructuralFacts::empty(ExtractionStrategy::SyntaxTree);
    facts.lines = count_lines(source);

    let mut walker = FactWalker {
        source,
        masked: mask_comments_and_literals(source),
        facts: &mut facts,
        owners: Vec::new(),
        pending_methods: Vec::new(),
        anonymous_depth: 0,
    };
    walker.visit(ast.tree.root_node());
    walker.finish();

    facts
}

struct FactWalker<'a, 'f, 't> {
    source: &'a str,
    masked: String,
    facts: &'f mut StructuralFacts,
    owners: Vec<String>,
    /// Body nodes are analyzed once all fields are known.
    pending_methods: Vec<(usize, Option<Node<'t>>)>,
    /// Members of anonymous class bodies belong to the enclosing method.
    anonymous_depth: usize,
}

impl<'a, 'f, 't> FactWalker<'a, 'f, 't> {
    fn visit(&mut self, node: Node<'t>) {
        match node.kind() {
            "import_declaration" => self.record_import(node),
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "record_declaration" => {
                self.record_type(node);
                let name = node
                    .child_by_field_name("name")
                    .map(|n| node_text(&n, self.source).to_string());
                if let Some(name) = name {
                    self.owners.push(name);
                    self.visit_children(node);
                    self.owners.pop();
                    return;
                }
            }
            "method_declaration" | "constructor_declaration" if self.anonymous_depth == 0 => {
                self.record_method(node);
            }
            "field_declaration" if self.anonymous_depth == 0 => self.record_field(node),
            "object_creation_expression" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.facts
                        .instantiated_types
                        .insert(base_type_name(node_text(&ty, self.source)));
                }
                let mut cursor = node.walk();
                let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
                for child in children {
                    if child.kind() == "class_body" {
                        self.anonymous_depth += 1;
                        self.visit_children(child);
                        self.anonymous_depth -= 1;
                    } else {
                        self.visit(child);
                    }
                }
                return;
            }
            "method_invocation" | "field_access" => {
                if let Some(object) = node.child_by_field_name("object") {
                    if object.kind() == "identifier" {
                        let qualifier = node_text(&object, self.source);
                        if !is_java_keyword(qualifier) {
                            self.facts.call_qualifiers.insert(qualifier.to_string());
                        }
                    }
                }
            }
            "switch_expression" | "switch_statement" => {
                self.facts.switches.push(SwitchSite {
                    line: node_line(&node),
                    case_count: node
                        .child_by_field_name("body")
                        .map_or(0, |body| count_switch_labels(body)),
                });
            }
            _ => {}
        }

        self.visit_children(node);
    }

    fn visit_children(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn record_import(&mut self, node: Node<'t>) {
        let mut target = String::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "scoped_identifier" | "identifier" => {
                    target = node_text(&child, self.source).to_string()
                }
                "asterisk" => target.push_str(".*"),
                _ => {}
            }
        }
        if !target.is_empty() {
            self.facts.imports.insert(target);
        }
    }

    fn record_type(&mut self, node: Node<'t>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let kind = match node.kind() {
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            _ => TypeKind::Class,
        };

        let mut superclass = None;
        let mut interfaces = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "superclass" => {
                    self.facts.extends_count += 1;
                    superclass = type_names(child, self.source).into_iter().next();
                }
                "extends_interfaces" => {
                    self.facts.extends_count += 1;
                    interfaces.extend(type_names(child, self.source));
                }
                "super_interfaces" => interfaces.extend(type_names(child, self.source)),
                _ => {}
            }
        }

        self.facts.supertypes.extend(superclass.iter().cloned());
        self.facts.supertypes.extend(interfaces.iter().cloned());
        self.facts.types.push(TypeDeclaration {
            name: node_text(&name, self.source).to_string(),
            kind,
            start_line: node_line(&name),
            end_line: node_end_line(&node),
            superclass,
            interfaces,
        });
    }

    fn record_method(&mut self, node: Node<'t>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let mods = modifiers(&node, self.source);
        let body = node.child_by_field_name("body");
        let is_constructor = node.kind() == "constructor_declaration";
        let end_line = body.map_or_else(|| node_end_line(&node), |b| node_end_line(&b));

        let method = MethodFacts {
            name: node_text(&name, self.source).to_string(),
            owner: self.owners.last().cloned(),
            visibility: Visibility::from_modifiers(mods.iter().copied()),
            is_static: mods.contains(&"static"),
            is_constructor,
            return_type: if is_constructor {
                None
            } else {
                node.child_by_field_name("type")
                    .map(|t| node_text(&t, self.source).to_string())
            },
            parameters: node
                .child_by_field_name("parameters")
                .map(|p| parameters(p, self.source))
                .unwrap_or_default(),
            start_line: node_line(&name),
            end_line,
            branch_count: body
                .and_then(|b| self.masked.get(b.start_byte()..b.end_byte()))
                .map_or(0, count_decision_points),
            identifiers: BTreeSet::new(),
            external_accesses: 0,
            own_accesses: 0,
            has_override: mods.contains(&"Override"),
            calls_super: false,
            is_delegation: false,
            longest_call_chain: 0,
        };

        self.pending_methods.push((self.facts.methods.len(), body));
        self.facts.methods.push(method);
    }

    fn record_field(&mut self, node: Node<'t>) {
        let mods = modifiers(&node, self.source);
        let type_name = node
            .child_by_field_name("type")
            .map_or_else(String::new, |t| node_text(&t, self.source).to_string());

        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            self.facts.fields.push(FieldFacts {
                name: node_text(&name, self.source).to_string(),
                owner: self.owners.last().cloned(),
                type_name: type_name.clone(),
                visibility: Visibility::from_modifiers(mods.iter().copied()),
                is_static: mods.contains(&"static"),
                is_final: mods.contains(&"final"),
                line: node_line(&name),
            });
        }
    }

    fn finish(&mut self) {
        let field_names: BTreeSet<String> =
            self.facts.fields.iter().map(|f| f.name.clone()).collect();

        for (idx, body) in std::mem::take(&mut self.pending_methods) {
            let Some(body) = body else { continue };
            let mut usage = BodyUsage::default();
            collect_body_usage(body, self.source, &field_names, &mut usage);

            let method = &mut self.facts.methods[idx];
            method.identifiers = usage.identifiers;
            method.external_accesses = usage.external;
            method.own_accesses = usage.own;
            method.calls_super = usage.calls_super;
            method.longest_call_chain = usage.longest_chain;
            method.is_delegation = is_delegation(body, self.source, &field_names);
        }
    }
}

#[derive(Default)]
struct BodyUsage {
    identifiers: BTreeSet<String>,
    external: usize,
    own: usize,
    calls_super: bool,
    longest_chain: usize,
}

fn collect_body_usage(
    node: Node,
    source: &str,
    field_names: &BTreeSet<String>,
    usage: &mut BodyUsage,
) {
    match node.kind() {
        "identifier" => {
            let text = node_text(&node, source);
            usage.identifiers.insert(text.to_string());
            let is_member_name = node.parent().is_some_and(|parent| {
                matches!(parent.kind(), "method_invocation" | "field_access")
                    && parent
                        .child_by_field_name("object")
                        .map_or(true, |object| object.id() != node.id())
            });
            let is_qualifier = node.parent().is_some_and(|parent| {
                parent
                    .child_by_field_name("object")
                    .is_some_and(|object| object.id() == node.id())
            });
            if field_names.contains(text) && !is_member_name && !is_qualifier {
                usage.own += 1;
            }
        }
        "super" => usage.calls_super = true,
        "method_invocation" | "field_access" => {
            match node.child_by_field_name("object").map(|o| o.kind()) {
                Some("this") => usage.own += 1,
                Some("super") | None => {}
                Some(_) => usage.external += 1,
            }
            if node.kind() == "method_invocation" {
                usage.longest_chain = usage.longest_chain.max(chain_length(node));
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_body_usage(child, source, field_names, usage);
    }
}

/// Number of dotted calls in a chain: `a.b().c().d()` and `a().b().c().d()` are 3.
fn chain_length(node: Node) -> usize {
    let mut length = 0;
    let mut current = node;
    while let Some(object) = current.child_by_field_name("object") {
        length += 1;
        if object.kind() != "method_invocation" {
            break;
        }
        current = object;
    }
    length
}

fn is_delegation(body: Node, source: &str, field_names: &BTreeSet<String>) -> bool {
    let mut cursor = body.walk();
    let statements: Vec<Node> = body
        .named_children(&mut cursor)
        .filter(|n| !matches!(n.kind(), "line_comment" | "block_comment"))
        .collect();
    let [statement] = statements.as_slice() else {
        return false;
    };
    if !matches!(statement.kind(), "expression_statement" | "return_statement") {
        return false;
    }
    let Some(call) = statement.named_child(0) else {
        return false;
    };
    if call.kind() != "method_invocation" {
        return false;
    }
    match call.child_by_field_name("object") {
        Some(object) if object.kind() == "identifier" => {
            field_names.contains(node_text(&object, source))
        }
        Some(object) if object.kind() == "field_access" => object
            .child_by_field_name("field")
            .is_some_and(|f| field_names.contains(node_text(&f, source))),
        _ => false,
    }
}

fn parameters(node: Node, source: &str) -> Vec<Parameter> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter_map(|param| match param.kind() {
            "formal_parameter" => Some(Parameter {
                type_name: param
                    .child_by_field_name("type")
                    .map_or_else(String::new, |t| node_text(&t, source).to_string()),
                name: param
                    .child_by_field_name("name")
                    .map_or_else(String::new, |n| node_text(&n, source).to_string()),
            }),
            "spread_parameter" => {
                let mut inner = param.walk();
                let children: Vec<Node> = param
                    .named_children(&mut inner)
                    .filter(|c| c.kind() != "modifiers")
                    .collect();
                let type_name = children
                    .first()
                    .map(|t| format!("{}...", node_text(t, source)))?;
                let name = children.last().and_then(|decl| {
                    decl.child_by_field_name("name")
                        .map(|n| node_text(&n, source).to_string())
                })?;
                Some(Parameter { type_name, name })
            }
            _ => None,
        })
        .collect()
}

fn type_names(clause: Node, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            names.extend(type_names(child, source));
        } else {
            names.push(base_type_name(node_text(&child, source)));
        }
    }
    names
}

fn count_switch_labels(node: Node) -> usize {
    let mut count = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "switch_label" => count += 1,
            // nested switches report their own labels
            "switch_expression" | "switch_statement" => {}
            _ => count += count_switch_labels(child),
        }
    }
    count
}
