//! Kotlin AST parser using tree-sitter: extracts class/object/function
//! declarations and the qualified call under a cursor.

use grpcnav::CallSite;

use super::types::*;

// ─── Main entry point ───────────────────────────────────────────────

pub(crate) fn parse_kotlin_definitions(
    parser: &mut tree_sitter::Parser,
    source: &str,
    file_id: u32,
) -> Vec<DefinitionEntry> {
    let tree = match parser.parse(source, None) {
        Some(t) => t,
        None => {
            tracing::warn!(file_id, "tree-sitter Kotlin parse returned None");
            return Vec::new();
        }
    };

    let source_bytes = source.as_bytes();
    let root = tree.root_node();
    let package = find_package(root, source_bytes);

    let mut defs = Vec::new();
    walk_kotlin_node(root, source_bytes, file_id, package.as_deref(), None, &mut defs);
    defs
}

fn find_package(root: tree_sitter::Node, source: &[u8]) -> Option<String> {
    let header = find_child_by_kind(root, "package_header")?;
    let name = find_child_by_kind(header, "identifier")?;
    let text: String = node_text(name, source).split_whitespace().collect();
    (!text.is_empty()).then_some(text)
}

fn walk_kotlin_node(
    node: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    package: Option<&str>,
    parent: Option<&str>,
    defs: &mut Vec<DefinitionEntry>,
) {
    match node.kind() {
        "class_declaration" | "object_declaration" => {
            if let Some(def) = extract_type_def(node, source, file_id, package, parent) {
                let qualified = def.qualified_name.clone();
                defs.push(def);
                let body = find_child_by_kind(node, "class_body")
                    .or_else(|| find_child_by_kind(node, "enum_class_body"));
                if let Some(body) = body {
                    walk_class_body(body, source, file_id, package, &qualified, defs);
                }
                return;
            }
        }
        // top-level functions belong to no type; local classes inside them are not indexed
        "function_declaration" => return,
        _ => {}
    }

    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            walk_kotlin_node(child, source, file_id, package, parent, defs);
        }
    }
}

/// Members of a class/object body. Function bodies and companion objects are
/// not entered.
fn walk_class_body(
    body: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    package: Option<&str>,
    owner: &str,
    defs: &mut Vec<DefinitionEntry>,
) {
    for i in 0..body.named_child_count() {
        let Some(child) = body.named_child(i) else { continue };
        match child.kind() {
            "function_declaration" => {
                if let Some(def) = extract_function_def(child, source, file_id, package, owner) {
                    defs.push(def);
                }
            }
            "class_declaration" | "object_declaration" => {
                walk_kotlin_node(child, source, file_id, package, Some(owner), defs);
            }
            _ => {}
        }
    }
}

// ─── Definition extraction helpers ──────────────────────────────────

fn node_text<'a>(node: tree_sitter::Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn find_child_by_kind<'a>(node: tree_sitter::Node<'a>, kind: &str) -> Option<tree_sitter::Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

fn has_child_kind(node: tree_sitter::Node, kind: &str) -> bool {
    find_child_by_kind(node, kind).is_some()
}

/// 1-based character column of a byte offset.
fn char_column(source: &[u8], byte: usize) -> u32 {
    let line_start = source[..byte].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    String::from_utf8_lossy(&source[line_start..byte]).chars().count() as u32 + 1
}

/// Supertypes after the `:`, without constructor arguments or `by` delegates.
fn extract_delegation_specifiers(node: tree_sitter::Node, source: &[u8]) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "delegation_specifier" => {
                let text = node_text(child, source);
                let text = text.split('(').next().unwrap_or(text);
                let text = text.split(" by ").next().unwrap_or(text);
                let base: String = text.split_whitespace().collect();
                if !base.is_empty() {
                    bases.push(base);
                }
            }
            "delegation_specifiers" => bases.extend(extract_delegation_specifiers(child, source)),
            _ => {}
        }
    }
    bases
}

/// Declaration header up to the body, whitespace-collapsed.
fn build_signature(node: tree_sitter::Node, source: &[u8]) -> String {
    let end = {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .find(|c| matches!(c.kind(), "class_body" | "enum_class_body" | "function_body"))
            .map(|b| b.start_byte())
            .unwrap_or_else(|| node.end_byte())
    };
    let header = String::from_utf8_lossy(&source[node.start_byte()..end]);
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_type_def(
    node: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    package: Option<&str>,
    parent: Option<&str>,
) -> Option<DefinitionEntry> {
    let name_node = find_child_by_kind(node, "type_identifier")?;
    let name = node_text(name_node, source).to_string();
    let kind = if node.kind() == "object_declaration" {
        DefinitionKind::Object
    } else if has_child_kind(node, "interface") {
        DefinitionKind::Interface
    } else if has_child_kind(node, "enum") || has_child_kind(node, "enum_class_body") {
        DefinitionKind::Enum
    } else {
        DefinitionKind::Class
    };
    let qualified_name = match (parent, package) {
        (Some(p), _) => format!("{}.{}", p, name),
        (None, Some(pkg)) => format!("{}.{}", pkg, name),
        (None, None) => name.clone(),
    };

    Some(DefinitionEntry {
        file_id,
        name,
        kind,
        line: name_node.start_position().row as u32 + 1,
        column: char_column(source, name_node.start_byte()),
        package: package.map(|p| p.to_string()),
        parent: parent.map(|p| p.to_string()),
        qualified_name,
        signature: Some(build_signature(node, source)),
        base_types: extract_delegation_specifiers(node, source),
    })
}

fn extract_function_def(
    node: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    package: Option<&str>,
    owner: &str,
) -> Option<DefinitionEntry> {
    let name_node = find_child_by_kind(node, "simple_identifier")?;
    let name = node_text(name_node, source).to_string();

    Some(DefinitionEntry {
        file_id,
        qualified_name: format!("{}.{}", owner, name),
        name,
        kind: DefinitionKind::Method,
        line: name_node.start_position().row as u32 + 1,
        column: char_column(source, name_node.start_byte()),
        package: package.map(|p| p.to_string()),
        parent: Some(owner.to_string()),
        signature: Some(build_signature(node, source)),
        base_types: Vec::new(),
    })
}

// ─── Call site extraction ───────────────────────────────────────────

/// The qualified call (`receiver.method(...)`) enclosing a 1-based cursor.
pub(crate) fn extract_call_site(
    parser: &mut tree_sitter::Parser,
    source: &str,
    line: u32,
    column: u32,
) -> Option<CallSite> {
    if line == 0 || column == 0 {
        return None;
    }
    let line_text = source.lines().nth(line as usize - 1)?;
    let byte_col = line_text.char_indices()
        .nth(column as usize - 1)
        .map(|(b, _)| b)
        .unwrap_or(line_text.len());
    let point = tree_sitter::Point { row: line as usize - 1, column: byte_col };

    let tree = parser.parse(source, None)?;
    let source_bytes = source.as_bytes();
    let mut node = tree.root_node().descendant_for_point_range(point, point)?;

    loop {
        if node.kind() == "call_expression" {
            if let Some((receiver, method)) = qualified_callee(node, source_bytes) {
                tracing::debug!(receiver = %receiver, method = %method, line, column, "Found qualified call at cursor");
                return Some(CallSite::new(receiver, method));
            }
        }
        node = node.parent()?;
    }
}

/// `receiver.method` of a `call_expression` whose callee is a navigation.
fn qualified_callee(call: tree_sitter::Node, source: &[u8]) -> Option<(String, String)> {
    let callee = call.named_child(0)?;
    if callee.kind() != "navigation_expression" {
        return None;
    }
    let receiver = callee.named_child(0)?;
    let suffix = find_child_by_kind(callee, "navigation_suffix")?;
    let method = find_child_by_kind(suffix, "simple_identifier")?;
    Some((receiver_name(receiver, source), node_text(method, source).to_string()))
}

/// Reduce a receiver expression to the identifier naming the client handle.
fn receiver_name(node: tree_sitter::Node, source: &[u8]) -> String {
    match node.kind() {
        "simple_identifier" => node_text(node, source).to_string(),
        "navigation_expression" => find_child_by_kind(node, "navigation_suffix")
            .and_then(|s| find_child_by_kind(s, "simple_identifier"))
            .map(|f| node_text(f, source).to_string())
            .unwrap_or_else(|| node_text(node, source).to_string()),
        "call_expression" => match node.named_child(0) {
            Some(callee) if callee.kind() == "navigation_expression" => match callee.named_child(0) {
                Some(inner) => receiver_name(inner, source),
                None => node_text(node, source).to_string(),
            },
            _ => node_text(node, source).to_string(),
        },
        _ => node_text(node, source).to_string(),
    }
}

#[cfg(test)]
#[path = "definitions_tests_kotlin.rs"]
mod tests;
