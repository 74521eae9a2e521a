//! Java AST parser using tree-sitter: extracts type/method declarations and
//! the qualified call under a cursor.

use grpcnav::CallSite;

use super::types::*;

// ─── Main entry point ───────────────────────────────────────────────

pub(crate) fn parse_java_definitions(
    parser: &mut tree_sitter::Parser,
    source: &str,
    file_id: u32,
) -> Vec<DefinitionEntry> {
    let tree = match parser.parse(source, None) {
        Some(t) => t,
        None => {
            tracing::warn!(file_id, "tree-sitter Java parse returned None");
            return Vec::new();
        }
    };

    let source_bytes = source.as_bytes();
    let root = tree.root_node();
    let package = find_package(root, source_bytes);

    let mut defs = Vec::new();
    walk_java_node(root, source_bytes, file_id, package.as_deref(), None, &mut defs);
    defs
}

fn find_package(root: tree_sitter::Node, source: &[u8]) -> Option<String> {
    let pkg = find_child_by_kind(root, "package_declaration")?;
    let mut cursor = pkg.walk();
    let name = pkg.named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))?;
    Some(node_text(name, source).to_string())
}

fn walk_java_node(
    node: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    package: Option<&str>,
    parent: Option<&str>,
    defs: &mut Vec<DefinitionEntry>,
) {
    let type_kind = match node.kind() {
        "class_declaration" => Some(DefinitionKind::Class),
        "interface_declaration" => Some(DefinitionKind::Interface),
        "enum_declaration" => Some(DefinitionKind::Enum),
        "record_declaration" => Some(DefinitionKind::Record),
        "annotation_type_declaration" => Some(DefinitionKind::Annotation),
        _ => None,
    };

    if let Some(kind) = type_kind {
        if let Some(def) = extract_type_def(node, source, file_id, kind, package, parent) {
            let qualified = def.qualified_name.clone();
            defs.push(def);
            if let Some(body) = node.child_by_field_name("body") {
                walk_type_body(body, source, file_id, package, &qualified, defs);
            }
            return;
        }
    }

    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            walk_java_node(child, source, file_id, package, parent, defs);
        }
    }
}

/// Members of a class/interface/enum/record body. Method bodies are not entered.
fn walk_type_body(
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
            "method_declaration" => {
                if let Some(def) = extract_member_def(child, source, file_id, DefinitionKind::Method, package, owner) {
                    defs.push(def);
                }
            }
            "constructor_declaration" => {
                if let Some(def) = extract_member_def(child, source, file_id, DefinitionKind::Constructor, package, owner) {
                    defs.push(def);
                }
            }
            // enum constants come first, regular members live in enum_body_declarations
            "enum_body_declarations" => {
                walk_type_body(child, source, file_id, package, owner, defs);
            }
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "record_declaration" | "annotation_type_declaration" => {
                walk_java_node(child, source, file_id, package, Some(owner), defs);
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

/// 1-based character column of a byte offset.
fn char_column(source: &[u8], byte: usize) -> u32 {
    let line_start = source[..byte].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
    String::from_utf8_lossy(&source[line_start..byte]).chars().count() as u32 + 1
}

/// Types listed after `extends` / `implements`.
fn extract_base_types(node: tree_sitter::Node, source: &[u8]) -> Vec<String> {
    let mut bases = Vec::new();
    let mut push_types = |holder: tree_sitter::Node| {
        let list = find_child_by_kind(holder, "type_list").unwrap_or(holder);
        let mut cursor = list.walk();
        for t in list.named_children(&mut cursor) {
            bases.push(node_text(t, source).to_string());
        }
    };

    if let Some(sc) = node.child_by_field_name("superclass") {
        push_types(sc);
    }
    if let Some(ext) = find_child_by_kind(node, "extends_interfaces") {
        push_types(ext);
    }
    if let Some(ifaces) = node.child_by_field_name("interfaces") {
        push_types(ifaces);
    }
    bases
}

/// Declaration header up to the body, whitespace-collapsed.
fn build_signature(node: tree_sitter::Node, source: &[u8]) -> String {
    let end = node.child_by_field_name("body")
        .map(|b| b.start_byte())
        .unwrap_or_else(|| node.end_byte());
    let header = String::from_utf8_lossy(&source[node.start_byte()..end]);
    let header = header.trim().trim_end_matches(';');
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_type_def(
    node: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    kind: DefinitionKind,
    package: Option<&str>,
    parent: Option<&str>,
) -> Option<DefinitionEntry> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(name_node, source).to_string();
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
        base_types: extract_base_types(node, source),
    })
}

fn extract_member_def(
    node: tree_sitter::Node,
    source: &[u8],
    file_id: u32,
    kind: DefinitionKind,
    package: Option<&str>,
    owner: &str,
) -> Option<DefinitionEntry> {
    let name_node = node.child_by_field_name("name")?;
    let name = node_text(name_node, source).to_string();

    Some(DefinitionEntry {
        file_id,
        qualified_name: format!("{}.{}", owner, name),
        name,
        kind,
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
///
/// Returns `None` when the cursor is outside the file or not inside any
/// qualified method invocation.
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
        if node.kind() == "method_invocation" {
            if let Some(object) = node.child_by_field_name("object") {
                let method = node.child_by_field_name("name")
                    .map(|n| node_text(n, source_bytes))
                    .unwrap_or("");
                let receiver = receiver_name(object, source_bytes);
                tracing::debug!(receiver = %receiver, method, line, column, "Found qualified call at cursor");
                return Some(CallSite::new(receiver, method));
            }
        }
        node = node.parent()?;
    }
}

/// Reduce a receiver expression to the identifier naming the client handle.
fn receiver_name(node: tree_sitter::Node, source: &[u8]) -> String {
    match node.kind() {
        "identifier" => node_text(node, source).to_string(),
        "field_access" => node.child_by_field_name("field")
            .map(|f| node_text(f, source).to_string())
            .unwrap_or_else(|| node_text(node, source).to_string()),
        "method_invocation" => match node.child_by_field_name("object") {
            Some(inner) => receiver_name(inner, source),
            None => node_text(node, source).to_string(),
        },
        _ => node_text(node, source).to_string(),
    }
}

#[cfg(test)]
#[path = "definitions_tests_java.rs"]
mod tests;
