//! Facet extraction from a structural tree.
//!
//! Async and static detection is lexical: a node is async when its text
//! contains `async`, static when its text starts with `static` or carries a
//! `@staticmethod` decorator.

use crate::analysis::model::{
    ClassInfo, FunctionInfo, ImportInfo, ImportedNameInfo, MethodInfo, PropertyInfo,
};
use crate::sg::lang::{profile, LangProfile};
use crate::ts::imports::import_statements;
use crate::ts::syntax::{declared_name, member_name, node_text, walk};
use crate::ts::StructuralTree;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionFilter {
    pub include_anonymous: bool,
    pub async_only: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassFilter {
    pub include_methods: bool,
    pub include_properties: bool,
}

impl Default for ClassFilter {
    fn default() -> Self {
        Self {
            include_methods: true,
            include_properties: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImportFilter {
    pub include_type_imports: bool,
}

impl Default for ImportFilter {
    fn default() -> Self {
        Self {
            include_type_imports: true,
        }
    }
}

fn is_async(text: &str) -> bool {
    text.contains("async")
}

fn is_static(text: &str) -> bool {
    text.trim_start().starts_with("static") || text.contains("@staticmethod")
}

pub fn functions(tree: &StructuralTree, filter: FunctionFilter) -> Vec<FunctionInfo> {
    let profile = profile(tree.lang());
    let source = tree.source();
    let mut out = Vec::new();

    walk(tree.root(), &mut |node| {
        // keyword tokens share kind names with the nodes they introduce
        if !node.is_named() || !profile.is_function(node.kind()) {
            return true;
        }
        let text = node_text(node, source);
        let name = declared_name(node, source);
        let parameters = node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"))
            .map(|p| node_text(p, source).to_string())
            .unwrap_or_default();

        let info = FunctionInfo {
            name,
            kind: node.kind().to_string(),
            is_async: is_async(text),
            parameters,
            line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            column: node.start_position().column,
        };

        let keep = (filter.include_anonymous || info.name.is_some())
            && (!filter.async_only || info.is_async);
        if keep {
            out.push(info);
        }
        true
    });

    out
}

pub fn classes(tree: &StructuralTree, filter: ClassFilter) -> Vec<ClassInfo> {
    let profile = profile(tree.lang());
    let source = tree.source();
    let root = tree.root();
    let mut out = Vec::new();

    walk(root, &mut |node| {
        if !node.is_named() || !profile.is_class(node.kind()) {
            return true;
        }
        let name = declared_name(node, source).unwrap_or_else(|| "<anonymous>".to_string());

        let mut members = class_members(node);
        if node.kind() == "struct_item" || node.kind() == "enum_item" {
            members.extend(impl_members(root, &name, source));
        }

        let methods = filter
            .include_methods
            .then(|| methods_of(profile, &members, source));
        let properties = filter
            .include_properties
            .then(|| properties_of(profile, &members, source));

        out.push(ClassInfo {
            name,
            kind: node.kind().to_string(),
            line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            methods,
            properties,
        });
        true
    });

    out
}

/// Direct members of a class body, with decorators unwrapped.
fn class_members(class: Node<'_>) -> Vec<Node<'_>> {
    let Some(body) = class.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut cursor = body.walk();
    body.named_children(&mut cursor).collect()
}

/// Functions from `impl <name>` and `impl Trait for <name>` blocks.
fn impl_members<'t>(root: Node<'t>, name: &str, source: &str) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    walk(root, &mut |node| {
        if node.kind() != "impl_item" {
            return true;
        }
        let target = node.child_by_field_name("type").map(|t| impl_target_name(t, source));
        if target == Some(name) {
            out.extend(class_members(node));
        }
        false
    });
    out
}

/// Bare type name of an `impl` target: `Point` for `Point<T>` or `geo::Point`.
fn impl_target_name<'s>(target: Node<'_>, source: &'s str) -> &'s str {
    let base = match target.kind() {
        "generic_type" => target.child_by_field_name("type").unwrap_or(target),
        _ => target,
    };
    match base.kind() {
        "scoped_type_identifier" => base
            .child_by_field_name("name")
            .map_or_else(|| node_text(base, source), |n| node_text(n, source)),
        _ => node_text(base, source),
    }
}

fn unwrap_decorated(node: Node<'_>) -> Node<'_> {
    if node.kind() == "decorated_definition" {
        if let Some(inner) = node.child_by_field_name("definition") {
            return inner;
        }
    }
    node
}

fn methods_of(profile: &LangProfile, members: &[Node<'_>], source: &str) -> Vec<MethodInfo> {
    members
        .iter()
        .filter_map(|&member| {
            let inner = unwrap_decorated(member);
            if !profile.is_method(inner.kind()) {
                return None;
            }
            let text = node_text(member, source);
            Some(MethodInfo {
                name: member_name(inner, source)?,
                is_static: is_static(text),
                is_async: is_async(text),
                line: member.start_position().row + 1,
            })
        })
        .collect()
}

fn properties_of(profile: &LangProfile, members: &[Node<'_>], source: &str) -> Vec<PropertyInfo> {
    members
        .iter()
        .filter_map(|&member| {
            if !profile.is_property(member.kind()) {
                return None;
            }
            Some(PropertyInfo {
                name: member_name(member, source)?,
                is_static: is_static(node_text(member, source)),
                line: member.start_position().row + 1,
            })
        })
        .collect()
}

pub fn imports(tree: &StructuralTree, filter: ImportFilter) -> Vec<ImportInfo> {
    import_statements(tree)
        .into_iter()
        .filter(|stmt| filter.include_type_imports || !stmt.is_type_only())
        .map(|stmt| ImportInfo {
            source: stmt.module.clone(),
            names: stmt
                .names()
                .into_iter()
                .map(|n| ImportedNameInfo {
                    name: n.name,
                    alias: n.alias,
                })
                .collect(),
            is_type_only: stmt.is_type_only(),
            line: stmt.line,
            text: stmt.text.clone(),
        })
        .collect()
}
