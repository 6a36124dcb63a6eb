//! Text-pattern extraction.
//!
//! Fast path that works on any input, including code that does not parse.
//! Comments and string/char literals are masked with spaces first so that
//! byte offsets and line numbers stay aligned with the original source.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::types::{
    base_type_name, ExtractionStrategy, FieldFacts, MethodFacts, Parameter, StructuralFacts,
    SwitchSite, TypeDeclaration, TypeKind, Visibility,
};
use super::{count_decision_points, is_java_keyword};
use crate::metrics::loc_counter::count_lines;

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*import\s+(?:static\s+)?([A-Za-z_][\w.]*(?:\.\*)?)\s*;").unwrap()
});

static TYPE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(class|interface|enum|record)\s+([A-Za-z_]\w*)([^{;]*)\{").unwrap()
});

static EXTENDS_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:class|interface)\s+[A-Za-z_]\w*[^{;]*?\bextends\b").unwrap()
});

static METHOD_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*((?:(?:public|protected|private|static|final|abstract|synchronized|native|default|strictfp)\s+)*)",
        r"(?:<[^>{};]*>\s+)?",
        r"([A-Za-z_][\w.]*(?:<[^;{}()]*>)?(?:\[\])*\s+)?",
        r"([A-Za-z_]\w*)\s*\(([^()]*)\)\s*(?:throws\s+[\w.,\s]+)?\{",
    ))
    .unwrap()
});

static FIELD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*((?:(?:public|protected|private|static|final|transient|volatile)\s+)*)",
        r"([A-Za-z_][\w.]*(?:<[^;=(){}]*>)?(?:\[\])*)\s+",
        r"([A-Za-z_]\w*[^;{}]*);",
    ))
    .unwrap()
});

static ABSTRACT_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*((?:(?:public|protected|private|static|abstract|default|synchronized|native)\s+)*)",
        r"(?:<[^>{};]*>\s+)?",
        r"([A-Za-z_][\w.]*(?:<[^;{}()]*>)?(?:\[\])*)\s+",
        r"([A-Za-z_]\w*)\s*\(([^()]*)\)\s*(?:throws\s+[\w.,\s]+)?;",
    ))
    .unwrap()
});

static NEW_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bnew\s+([A-Za-z_][\w.]*)").unwrap());

static QUALIFIED_ACCESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\.\s*[A-Za-z_]\w*").unwrap());

static CALL_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\.\s*[A-Za-z_]\w*\s*\([^()]*\)\s*){2,}").unwrap()
});

static CHAIN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s*[A-Za-z_]\w*\s*\(").unwrap());

static SWITCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bswitch\s*\(").unwrap());

static CASE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:case|default)\b").unwrap());

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_]\w*").unwrap());

static DELEGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:return\s+)?(?:this\s*\.\s*)?([A-Za-z_]\w*)\s*\.\s*[A-Za-z_]\w*\s*\([^;]*\)\s*;$")
        .unwrap()
});

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Replace comments and string/char literal contents with spaces.
///
/// Newlines are preserved; quotes stay in place so `"..."` still reads as an
/// expression to later scans.
pub fn mask_comments_and_literals(source: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str,
        Char,
        TextBlock,
    }

    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => {
                if b == b'/' && next == Some(b'/') {
                    state = State::LineComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                if b == b'/' && next == Some(b'*') {
                    state = State::BlockComment;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                if bytes[i..].starts_with(b"\"\"\"") {
                    state = State::TextBlock;
                    out.extend_from_slice(b"\"\"\"");
                    i += 3;
                    continue;
                }
                if b == b'"' {
                    state = State::Str;
                } else if b == b'\'' {
                    state = State::Char;
                }
                out.push(b);
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                    out.push(b'\n');
                } else {
                    out.push(blank(b));
                }
            }
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = State::Code;
                    out.extend_from_slice(b"  ");
                    i += 2;
                    continue;
                }
                out.push(blank(b));
            }
            State::Str | State::Char => {
                let quote = if state == State::Str { b'"' } else { b'\'' };
                if b == b'\\' {
                    out.push(b' ');
                    if let Some(escaped) = next {
                        out.push(blank(escaped));
                    }
                    i += 2;
                    continue;
                }
                if b == quote {
                    state = State::Code;
                    out.push(b);
                } else if b == b'\n' {
                    // unterminated literal; resync at end of line
                    state = State::Code;
                    out.push(b'\n');
                } else {
                    out.push(blank(b));
                }
            }
            State::TextBlock => {
                if bytes[i..].starts_with(b"\"\"\"") {
                    state = State::Code;
                    out.extend_from_slice(b"\"\"\"");
                    i += 3;
                    continue;
                }
                out.push(blank(b));
            }
        }
        i += 1;
    }

    // Multi-byte sequences are either copied whole or blanked byte by byte
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn blank(b: u8) -> u8 {
    if b == b'\n' {
        b'\n'
    } else {
        b' '
    }
}

/// Maps byte offsets to 1-based line numbers.
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

/// Offset of the `}` matching the `{` at `open`, or the end of text when
/// braces are unbalanced.
pub fn matching_brace(text: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    text.len().saturating_sub(1)
}

#[derive(Debug, Clone)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn contains(&self, offset: usize) -> bool {
        offset > self.start && offset < self.end
    }
}

pub fn extract_facts(source: &str) -> StructuralFacts {
    let masked = mask_comments_and_literals(source);
    let index = LineIndex::new(&masked);
    let mut facts = StructuralFacts::empty(ExtractionStrategy::TextPattern);
    facts.lines = count_lines(source);

    facts.imports = IMPORT
        .captures_iter(&masked)
        .map(|caps| caps[1].to_string())
        .collect();

    let type_spans = extract_types(&masked, &index, &mut facts);
    facts.extends_count = EXTENDS_CLAUSE.find_iter(&masked).count();

    let method_spans = extract_methods(&masked, &index, &type_spans, &mut facts);
    extract_fields(&masked, &index, &type_spans, &method_spans, &mut facts);
    annotate_methods(&masked, &method_spans, &mut facts);

    let scan = blank_package_and_imports(&masked);
    facts.instantiated_types = NEW_EXPR
        .captures_iter(&scan)
        .map(|caps| base_type_name(&caps[1]))
        .filter(|name| !PRIMITIVES.contains(&name.as_str()))
        .collect();
    facts.call_qualifiers = qualifiers(&scan);

    facts.switches = SWITCH
        .find_iter(&masked)
        .filter_map(|m| {
            let open = masked[m.end()..].find('{')? + m.end();
            let close = matching_brace(&masked, open);
            Some(SwitchSite {
                line: index.line_of(m.start()),
                case_count: CASE_LABEL.find_iter(&masked[open..=close]).count(),
            })
        })
        .collect();

    facts
}

fn extract_types(
    masked: &str,
    index: &LineIndex,
    facts: &mut StructuralFacts,
) -> Vec<(String, Span)> {
    let mut spans = Vec::new();

    for caps in TYPE_DECL.captures_iter(masked) {
        let (Some(whole), Some(keyword), Some(name)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        // `Foo.class` literals and `.class` accesses are not declarations
        if masked[..keyword.start()].trim_end().ends_with('.') {
            continue;
        }
        let header = caps.get(3).map_or("", |m| m.as_str());
        let kind = match keyword.as_str() {
            "interface" => TypeKind::Interface,
            "enum" => TypeKind::Enum,
            "record" => TypeKind::Record,
            _ => TypeKind::Class,
        };
        let (superclass, interfaces) = parse_type_header(header, kind);
        facts.supertypes.extend(superclass.iter().cloned());
        facts.supertypes.extend(interfaces.iter().cloned());

        let open = whole.end() - 1;
        let close = matching_brace(masked, open);
        facts.types.push(TypeDeclaration {
            name: name.as_str().to_string(),
            kind,
            start_line: index.line_of(keyword.start()),
            end_line: index.line_of(close),
            superclass,
            interfaces,
        });
        spans.push((name.as_str().to_string(), Span { start: open, end: close }));
    }

    spans
}

fn parse_type_header(header: &str, kind: TypeKind) -> (Option<String>, Vec<String>) {
    let header = strip_type_parameters(header);
    let extends = clause(&header, "extends");
    let implements = clause(&header, "implements");

    match kind {
        // interfaces extend other interfaces
        TypeKind::Interface => (None, split_types(&extends)),
        _ => (
            split_types(&extends).into_iter().next(),
            split_types(&implements),
        ),
    }
}

/// Drop a leading `<...>` type parameter list, keeping the rest of the header.
fn strip_type_parameters(header: &str) -> String {
    let trimmed = header.trim_start();
    if !trimmed.starts_with('<') {
        return header.to_string();
    }
    let mut depth = 0usize;
    for (i, c) in trimmed.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return trimmed[i + 1..].to_string();
                }
            }
            _ => {}
        }
    }
    String::new()
}

fn clause(header: &str, keyword: &str) -> String {
    let words = ["extends", "implements", "permits"];
    let Some(start) = find_word(header, keyword) else {
        return String::new();
    };
    let rest = &header[start + keyword.len()..];
    let end = words
        .iter()
        .filter(|w| **w != keyword)
        .filter_map(|w| find_word(rest, w))
        .min()
        .unwrap_or(rest.len());
    rest[..end].to_string()
}

fn find_word(text: &str, word: &str) -> Option<usize> {
    text.match_indices(word).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + word.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric() || c == '_')
            && !after.is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}

fn split_types(list: &str) -> Vec<String> {
    let mut types = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                types.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    types.push(current);
    types
        .iter()
        .map(|t| base_type_name(t))
        .filter(|t| !t.is_empty())
        .collect()
}

fn innermost_type<'a>(spans: &'a [(String, Span)], offset: usize) -> Option<&'a (String, Span)> {
    spans
        .iter()
        .filter(|(_, span)| span.contains(offset))
        .min_by_key(|(_, span)| span.end - span.start)
}

fn extract_methods(
    masked: &str,
    index: &LineIndex,
    type_spans: &[(String, Span)],
    facts: &mut StructuralFacts,
) -> Vec<Span> {
    let mut found: Vec<(MethodFacts, Span)> = Vec::new();

    for caps in METHOD_HEADER.captures_iter(masked) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(3)) else {
            continue;
        };
        let name = name.as_str();
        let return_type = caps.get(2).map(|m| m.as_str().trim().to_string());
        if is_java_keyword(name) || return_type.as_deref().is_some_and(is_non_type_keyword) {
            continue;
        }

        let enclosing = innermost_type(type_spans, whole.start());
        let owner = enclosing.map(|(n, _)| n.clone());
        let is_constructor = return_type.is_none();
        // a call followed by a block is not a declaration
        if is_constructor && owner.as_deref() != Some(name) {
            continue;
        }
        // methods of anonymous classes belong to the enclosing method
        if found.iter().any(|(_, s)| {
            s.contains(whole.start()) && !enclosing.is_some_and(|(_, t)| s.contains(t.start))
        }) {
            continue;
        }

        let modifiers = caps.get(1).map_or("", |m| m.as_str());
        let open = whole.end() - 1;
        let close = matching_brace(masked, open);
        let header_start = header_start(whole.start(), whole.as_str());

        let method = MethodFacts {
            name: name.to_string(),
            owner,
            visibility: Visibility::from_modifiers(modifiers.split_whitespace()),
            is_static: modifiers.split_whitespace().any(|m| m == "static"),
            is_constructor,
            return_type,
            parameters: parse_parameters(caps.get(4).map_or("", |m| m.as_str())),
            start_line: index.line_of(header_start),
            end_line: index.line_of(close),
            branch_count: count_decision_points(&masked[open..=close]),
            identifiers: BTreeSet::new(),
            external_accesses: 0,
            own_accesses: 0,
            has_override: preceded_by_override(masked, header_start),
            calls_super: false,
            is_delegation: false,
            longest_call_chain: 0,
        };
        found.push((method, Span { start: open, end: close }));
    }

    // Bodiless declarations: interface and abstract methods
    for caps in ABSTRACT_METHOD.captures_iter(masked) {
        let (Some(whole), Some(return_type), Some(name)) = (caps.get(0), caps.get(2), caps.get(3))
        else {
            continue;
        };
        if is_java_keyword(name.as_str()) || is_non_type_keyword(return_type.as_str()) {
            continue;
        }
        let Some((owner, _)) = innermost_type(type_spans, whole.start()) else {
            continue;
        };
        if found.iter().any(|(_, s)| s.contains(whole.start())) {
            continue;
        }

        let modifiers = caps.get(1).map_or("", |m| m.as_str());
        let header_start = header_start(whole.start(), whole.as_str());
        let semicolon = whole.end() - 1;
        let line = index.line_of(header_start);
        let method = MethodFacts {
            name: name.as_str().to_string(),
            owner: Some(owner.clone()),
            visibility: Visibility::from_modifiers(modifiers.split_whitespace()),
            is_static: modifiers.split_whitespace().any(|m| m == "static"),
            is_constructor: false,
            return_type: Some(return_type.as_str().trim().to_string()),
            parameters: parse_parameters(caps.get(4).map_or("", |m| m.as_str())),
            start_line: line,
            end_line: line,
            branch_count: 0,
            identifiers: BTreeSet::new(),
            external_accesses: 0,
            own_accesses: 0,
            has_override: preceded_by_override(masked, header_start),
            calls_super: false,
            is_delegation: false,
            longest_call_chain: 0,
        };
        found.push((method, Span { start: semicolon, end: semicolon }));
    }

    found.sort_by_key(|(_, span)| span.start);
    let (methods, spans): (Vec<_>, Vec<_>) = found.into_iter().unzip();
    facts.methods = methods;
    spans
}

fn header_start(match_start: usize, matched: &str) -> usize {
    match_start + (matched.len() - matched.trim_start().len())
}

/// Keywords that can never be a return type.
fn is_non_type_keyword(word: &str) -> bool {
    is_java_keyword(word) && !PRIMITIVES.contains(&word)
}

fn parse_parameters(list: &str) -> Vec<Parameter> {
    split_types_keep_text(list)
        .into_iter()
        .filter_map(|param| {
            let words: Vec<&str> = param
                .split_whitespace()
                .filter(|w| *w != "final" && !w.starts_with('@'))
                .collect();
            let (name, type_parts) = words.split_last()?;
            if type_parts.is_empty() {
                return None;
            }
            Some(Parameter {
                type_name: type_parts.join(" "),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Split on top-level commas, leaving generic arguments intact.
fn split_types_keep_text(list: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in list.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    parts.push(current);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

fn preceded_by_override(masked: &str, header_start: usize) -> bool {
    masked[..header_start]
        .lines()
        .rev()
        .take(3)
        .any(|line| line.trim_start().starts_with("@Override"))
}

fn extract_fields(
    masked: &str,
    index: &LineIndex,
    type_spans: &[(String, Span)],
    method_spans: &[Span],
    facts: &mut StructuralFacts,
) {
    for caps in FIELD_DECL.captures_iter(masked) {
        let (Some(whole), Some(type_match), Some(declarators)) =
            (caps.get(0), caps.get(2), caps.get(3))
        else {
            continue;
        };
        let type_name = type_match.as_str();
        if is_non_type_keyword(type_name) {
            continue;
        }
        let Some((owner, _)) = innermost_type(type_spans, whole.start()) else {
            continue;
        };
        if method_spans.iter().any(|s| s.contains(whole.start())) {
            continue;
        }

        let modifiers: Vec<&str> = caps
            .get(1)
            .map_or("", |m| m.as_str())
            .split_whitespace()
            .collect();
        let line = index.line_of(type_match.start());

        for declarator in split_types_keep_text(declarators.as_str()) {
            let Some(name) = declarator
                .split('=')
                .next()
                .map(|n| n.trim().trim_end_matches("[]").trim())
            else {
                continue;
            };
            if !IDENTIFIER.find(name).is_some_and(|m| m.as_str() == name) {
                continue;
            }
            facts.fields.push(FieldFacts {
                name: name.to_string(),
                owner: Some(owner.clone()),
                type_name: type_name.to_string(),
                visibility: Visibility::from_modifiers(modifiers.iter().copied()),
                is_static: modifiers.contains(&"static"),
                is_final: modifiers.contains(&"final"),
                line,
            });
        }
    }
}

/// Fill in body-derived facts once fields are known.
fn annotate_methods(masked: &str, method_spans: &[Span], facts: &mut StructuralFacts) {
    let field_names: BTreeSet<String> = facts.fields.iter().map(|f| f.name.clone()).collect();

    for (method, span) in facts.methods.iter_mut().zip(method_spans) {
        let body = &masked[span.start..=span.end.min(masked.len().saturating_sub(1))];
        let inner = body
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}')
            .trim();

        method.identifiers = IDENTIFIER
            .find_iter(body)
            .map(|m| m.as_str())
            .filter(|id| !is_java_keyword(id))
            .map(str::to_string)
            .collect();

        let mut external = 0;
        let mut own = 0;
        for caps in QUALIFIED_ACCESS.captures_iter(body) {
            let Some(whole) = caps.get(0) else { continue };
            if body[..whole.start()].trim_end().ends_with('.') {
                continue;
            }
            match &caps[1] {
                "this" => own += 1,
                "super" => {}
                _ => external += 1,
            }
        }
        own += IDENTIFIER
            .find_iter(body)
            .filter(|m| field_names.contains(m.as_str()))
            .filter(|m| {
                let before = body[..m.start()].trim_end();
                !before.ends_with('.')
                    && !body[m.end()..].trim_start().starts_with('.')
            })
            .count();
        method.external_accesses = external;
        method.own_accesses = own;

        method.calls_super = body.contains("super.") || body.contains("super(");
        method.is_delegation = inner.matches(';').count() == 1
            && DELEGATION
                .captures(inner)
                .is_some_and(|caps| field_names.contains(&caps[1]));
        method.longest_call_chain = CALL_CHAIN
            .find_iter(body)
            .map(|m| CHAIN_LINK.find_iter(m.as_str()).count())
            .max()
            .unwrap_or(0);
    }
}

fn blank_package_and_imports(masked: &str) -> String {
    masked
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("import ") || trimmed.starts_with("package ") {
                " ".repeat(line.len())
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn qualifiers(scan: &str) -> BTreeSet<String> {
    QUALIFIED_ACCESS
        .captures_iter(scan)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if scan[..whole.start()].trim_end().ends_with('.') {
                return None;
            }
            let qualifier = caps.get(1)?.as_str();
            (!is_java_keyword(qualifier)).then(|| qualifier.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const ORDER_SERVICE: &str = indoc! {r#"
        package com.acme.orders;

        import java.util.List;
        import com.acme.billing.Invoice;

        /** Service. */
        public class OrderService extends BaseService implements Auditable, Closeable {
            private final OrderRepository repository;
            public int retries = 3;
            private static final String NAME = "orders"; // trailing

            public OrderService(OrderRepository repository) {
                this.repository = repository;
            }

            @Override
            public Invoice bill(Order order, int copies) {
                if (order == null && copies > 0) {
                    throw new IllegalStateException("no order");
                }
                return new Invoice(order.total());
            }

            public void save(Order order) {
                repository.save(order);
            }

            private List<String> names() {
                return order().customer().address().lines();
            }
        }
    "#};

    #[test]
    fn test_mask_preserves_offsets() {
        let source = "int a = 1; // if (x)\nString s = \"if while\";\n/* for */ int b;";
        let masked = mask_comments_and_literals(source);
        assert_eq!(masked.len(), source.len());
        assert_eq!(masked.lines().count(), source.lines().count());
        assert!(!masked.contains("if"));
        assert!(!masked.contains("for"));
        assert!(masked.contains("int b;"));
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nb\nc");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(4), 3);
    }

    #[test]
    fn test_extracts_imports_and_types() {
        let facts = extract_facts(ORDER_SERVICE);
        assert!(facts.imports.contains("java.util.List"));
        assert!(facts.imports.contains("com.acme.billing.Invoice"));

        assert_eq!(facts.types.len(), 1);
        let decl = &facts.types[0];
        assert_eq!(decl.name, "OrderService");
        assert_eq!(decl.superclass.as_deref(), Some("BaseService"));
        assert_eq!(decl.interfaces, vec!["Auditable", "Closeable"]);
        assert_eq!(facts.extends_count, 1);
    }

    #[test]
    fn test_extracts_methods_and_constructor() {
        let facts = extract_facts(ORDER_SERVICE);
        let names: Vec<_> = facts.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["OrderService", "bill", "save", "names"]);
        assert!(facts.methods[0].is_constructor);
        assert_eq!(facts.method_count(), 3);

        let bill = &facts.methods[1];
        assert_eq!(bill.visibility, Visibility::Public);
        assert_eq!(bill.param_count(), 2);
        assert!(bill.has_override);
        assert_eq!(bill.owner.as_deref(), Some("OrderService"));

        let save = &facts.methods[2];
        assert!(save.is_delegation);

        let names_method = &facts.methods[3];
        assert_eq!(names_method.visibility, Visibility::Private);
        assert_eq!(names_method.longest_call_chain, 3);
    }

    #[test]
    fn test_extracts_fields() {
        let facts = extract_facts(ORDER_SERVICE);
        let fields: Vec<_> = facts.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["repository", "retries", "NAME"]);
        assert_eq!(facts.fields[1].visibility, Visibility::Public);
        assert!(facts.fields[2].is_static && facts.fields[2].is_final);
    }

    #[test]
    fn test_instantiations_and_qualifiers() {
        let facts = extract_facts(ORDER_SERVICE);
        assert!(facts.instantiated_types.contains("Invoice"));
        assert!(facts.instantiated_types.contains("IllegalStateException"));
        assert!(facts.call_qualifiers.contains("repository"));
        assert!(facts.call_qualifiers.contains("order"));
        assert!(!facts.call_qualifiers.contains("this"));
        assert!(!facts.call_qualifiers.contains("java"));
    }

    #[test]
    fn test_switch_cases_counted() {
        let source = indoc! {r#"
            class Router {
                int route(int code) {
                    switch (code) {
                        case 1: return 10;
                        case 2: return 20;
                        default: return 0;
                    }
                }
            }
        "#};
        let facts = extract_facts(source);
        assert_eq!(facts.switches.len(), 1);
        assert_eq!(facts.switches[0].line, 3);
        assert_eq!(facts.switches[0].case_count, 3);
    }

    #[test]
    fn test_garbage_input_yields_empty_facts() {
        let facts = extract_facts("}}}{{ not java at all ((");
        assert!(facts.types.is_empty());
        assert!(facts.methods.is_empty());
        assert_eq!(facts.lines.physical_lines, 1);
    }
}
