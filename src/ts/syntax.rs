//! Grammar-agnostic helpers over tree-sitter nodes.
//!
//! These are purely syntactic: names come from node fields and leaf text,
//! never from semantic resolution.

use tree_sitter::Node;

/// Pre-order traversal. The visitor returns `false` to skip a node's children.
pub fn walk<'t>(node: Node<'t>, visit: &mut dyn FnMut(Node<'t>) -> bool) {
    if !visit(node) {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, visit);
    }
}

/// Leaf nodes whose kind is one of `kinds`, in document order.
pub fn leaves_of_kind<'t>(root: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    walk(root, &mut |node| {
        if node.child_count() == 0 && kinds.contains(&node.kind()) {
            out.push(node);
        }
        true
    });
    out
}

/// Text of a node within `source`.
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Name of a function or class node.
///
/// Uses the node's own `name` field, or for anonymous values (function
/// expressions, arrows, closures, class expressions) the binding they are
/// assigned to.
pub fn declared_name(node: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, source).to_string());
    }

    let parent = node.parent()?;
    let field = match parent.kind() {
        "variable_declarator" => "name",
        "assignment_expression" | "assignment" => "left",
        "pair" => "key",
        "field_definition" => "property",
        "public_field_definition" => "name",
        "let_declaration" => "pattern",
        _ => return None,
    };
    let target = parent.child_by_field_name(field)?;
    if target.id() == node.id() {
        return None;
    }
    Some(node_text(target, source).to_string())
}

/// Name of a class member (method, field, class-level assignment).
pub fn member_name(node: Node<'_>, source: &str) -> Option<String> {
    for field in ["name", "property", "key"] {
        if let Some(child) = node.child_by_field_name(field) {
            return Some(node_text(child, source).to_string());
        }
    }

    // Python class attributes: `expression_statement > assignment`
    let first = node.named_child(0)?;
    if first.kind() == "assignment" {
        let left = first.child_by_field_name("left")?;
        return Some(node_text(left, source).to_string());
    }
    None
}

/// Identifier nodes bound by a declaration pattern.
///
/// Descends into destructuring patterns but not into default values, type
/// annotations or member accesses, so `x = y` binds only `x` and
/// `{ a, b: c }` binds `a` and `c`.
pub fn pattern_identifiers(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    collect_pattern(node, &mut out);
    out
}

fn collect_pattern<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            out.push(node);
            return;
        }
        "attribute" | "subscript" | "member_expression" | "subscript_expression"
        | "field_expression" | "type_annotation" => return,
        _ => {}
    }

    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return;
    }
    loop {
        let child = cursor.node();
        let skip = match cursor.field_name() {
            Some("right" | "type" | "default" | "body" | "return_type" | "key") => true,
            Some("value") => node.kind() != "pair_pattern",
            _ => false,
        };
        if child.is_named() && !skip {
            collect_pattern(child, out);
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
}
