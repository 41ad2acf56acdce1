//! Import statement extraction shared by the imports facet and the
//! unused-import rewrite.
//!
//! Each statement is modelled as a list of removable elements. An element is
//! either a leaf binding (`foo`, `foo as bar`, `* as ns`) or a container of
//! further elements (`{ a, b }`, `a::{b, c}`), so partial removal can keep
//! the separators of whatever survives.

use crate::sg::lang::{profile, USAGE_KINDS};
use crate::ts::syntax::{node_text, walk};
use crate::ts::StructuralTree;
use std::collections::HashSet;
use std::ops::Range;
use tree_sitter::Node;

/// One name brought into scope by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportedName {
    /// The name the binding is referenced by in the importing module.
    pub fn local(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.name.split('.').next().unwrap_or(&self.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportElement {
    pub range: Range<usize>,
    /// Names bound by a leaf element; empty for containers and for
    /// unremovable leaves such as `self` or wildcards.
    pub names: Vec<ImportedName>,
    pub children: Vec<ImportElement>,
}

impl ImportElement {
    fn leaf(node: Node<'_>, names: Vec<ImportedName>) -> Self {
        Self {
            range: node.byte_range(),
            names,
            children: Vec::new(),
        }
    }

    fn container(node: Node<'_>, children: Vec<ImportElement>) -> Self {
        Self {
            range: node.byte_range(),
            names: Vec::new(),
            children,
        }
    }

    fn is_unused(&self, used: &HashSet<String>) -> bool {
        if self.children.is_empty() {
            !self.names.is_empty() && self.names.iter().all(|n| !used.contains(n.local()))
        } else {
            self.children.iter().all(|c| c.is_unused(used))
        }
    }

    fn collect_names(&self, out: &mut Vec<ImportedName>) {
        out.extend(self.names.iter().cloned());
        for child in &self.children {
            child.collect_names(out);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportStatement {
    pub kind: String,
    pub range: Range<usize>,
    /// 1-based
    pub line: usize,
    pub module: String,
    pub text: String,
    pub elements: Vec<ImportElement>,
}

impl ImportStatement {
    /// Every name the statement binds, in source order.
    pub fn names(&self) -> Vec<ImportedName> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.collect_names(&mut out);
        }
        out
    }

    /// `import type { ... }` (TypeScript), detected lexically.
    pub fn is_type_only(&self) -> bool {
        self.text.trim_start().starts_with("import type")
    }

    /// Byte ranges to delete so that only used bindings remain.
    ///
    /// Statements binding nothing (side-effect imports) are never touched.
    /// When every binding is unused the whole statement goes, together with
    /// its trailing line break.
    pub fn removal_ranges(&self, source: &str, used: &HashSet<String>) -> Vec<Range<usize>> {
        if self.names().is_empty() {
            return Vec::new();
        }
        if self.elements.iter().all(|e| e.is_unused(used)) {
            return vec![with_trailing_newline(source, self.range.clone())];
        }
        let mut out = Vec::new();
        collect_removals(&self.elements, used, &mut out);
        out
    }
}

/// Remove runs of unused elements from a separator-delimited list.
///
/// A run followed by a survivor is cut up to the survivor's start; a run at
/// the end of the list is cut from the end of the preceding survivor. The
/// caller guarantees at least one element in `elements` survives.
fn collect_removals(elements: &[ImportElement], used: &HashSet<String>, out: &mut Vec<Range<usize>>) {
    let unused: Vec<bool> = elements.iter().map(|e| e.is_unused(used)).collect();
    let n = elements.len();
    let mut i = 0;

    while i < n {
        if !unused[i] {
            if !elements[i].children.is_empty() {
                collect_removals(&elements[i].children, used, out);
            }
            i += 1;
            continue;
        }

        let mut j = i;
        while j + 1 < n && unused[j + 1] {
            j += 1;
        }

        if j + 1 < n {
            out.push(elements[i].range.start..elements[j + 1].range.start);
        } else if i > 0 {
            out.push(elements[i - 1].range.end..elements[j].range.end);
        }
        i = j + 1;
    }
}

fn with_trailing_newline(source: &str, range: Range<usize>) -> Range<usize> {
    let rest = &source[range.end..];
    if rest.starts_with("\r\n") {
        range.start..range.end + 2
    } else if rest.starts_with('\n') {
        range.start..range.end + 1
    } else {
        range
    }
}

/// Every import statement in the document, in source order.
pub fn import_statements(tree: &StructuralTree) -> Vec<ImportStatement> {
    let profile = profile(tree.lang());
    let source = tree.source();
    let mut out = Vec::new();

    walk(tree.root(), &mut |node| {
        if !node.is_named() || !profile.is_import(node.kind()) {
            return true;
        }
        out.push(ImportStatement {
            kind: node.kind().to_string(),
            range: node.byte_range(),
            line: node.start_position().row + 1,
            module: module_of(node, source),
            text: node_text(node, source).to_string(),
            elements: elements_of(node, source),
        });
        false
    });

    out
}

/// Names referenced outside import statements.
pub fn used_names(tree: &StructuralTree) -> HashSet<String> {
    let profile = profile(tree.lang());
    let source = tree.source();
    let mut used = HashSet::new();

    walk(tree.root(), &mut |node| {
        if profile.is_import(node.kind()) {
            return false;
        }
        if node.child_count() == 0 && USAGE_KINDS.contains(&node.kind()) {
            used.insert(node_text(node, source).to_string());
        }
        true
    });

    used
}

fn module_of(node: Node<'_>, source: &str) -> String {
    let text = |n: Node<'_>| node_text(n, source).to_string();
    match node.kind() {
        "import_statement" if node.child_by_field_name("source").is_some() => node
            .child_by_field_name("source")
            .map(|s| text(s).trim_matches(|c| c == '"' || c == '\'' || c == '`').to_string())
            .unwrap_or_default(),
        "import_from_statement" => node
            .child_by_field_name("module_name")
            .map(text)
            .unwrap_or_default(),
        "import_statement" => node
            .child_by_field_name("name")
            .map(|n| match n.child_by_field_name("name") {
                Some(inner) => text(inner),
                None => text(n),
            })
            .unwrap_or_default(),
        "use_declaration" => match node.child_by_field_name("argument") {
            Some(arg) => match arg.child_by_field_name("path") {
                Some(path) => text(path),
                None => text(arg),
            },
            None => String::new(),
        },
        _ => text(node),
    }
}

fn elements_of(node: Node<'_>, source: &str) -> Vec<ImportElement> {
    match node.kind() {
        // JavaScript / TypeScript: `import a, { b as c } from 'x'`
        "import_statement" if node.child_by_field_name("source").is_some() => {
            let mut cursor = node.walk();
            let clause = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "import_clause");
            match clause {
                Some(clause) => {
                    let mut cursor = clause.walk();
                    clause
                        .named_children(&mut cursor)
                        .filter_map(|c| js_element(c, source))
                        .collect()
                }
                None => Vec::new(),
            }
        }
        // Python: `import a.b, c as d` / `from x import a, b as c`
        "import_statement" | "import_from_statement" => {
            let mut cursor = node.walk();
            node.children_by_field_name("name", &mut cursor)
                .map(|c| python_element(c, source))
                .collect()
        }
        // Rust: `use a::b;` / `use a::{b, c as d};`
        "use_declaration" => node
            .child_by_field_name("argument")
            .map(|arg| vec![rust_element(arg, source)])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn js_element(node: Node<'_>, source: &str) -> Option<ImportElement> {
    let text = |n: Node<'_>| node_text(n, source).to_string();
    match node.kind() {
        "identifier" => Some(ImportElement::leaf(
            node,
            vec![ImportedName {
                name: "default".to_string(),
                alias: Some(text(node)),
            }],
        )),
        "namespace_import" => {
            let mut cursor = node.walk();
            let local = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier")?;
            Some(ImportElement::leaf(
                node,
                vec![ImportedName {
                    name: "*".to_string(),
                    alias: Some(text(local)),
                }],
            ))
        }
        "named_imports" => {
            let mut cursor = node.walk();
            let children = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "import_specifier")
                .filter_map(|specifier| {
                    let name = specifier.child_by_field_name("name")?;
                    Some(ImportElement::leaf(
                        specifier,
                        vec![ImportedName {
                            name: text(name),
                            alias: specifier.child_by_field_name("alias").map(text),
                        }],
                    ))
                })
                .collect();
            Some(ImportElement::container(node, children))
        }
        _ => None,
    }
}

fn python_element(node: Node<'_>, source: &str) -> ImportElement {
    let text = |n: Node<'_>| node_text(n, source).to_string();
    let name = match node.kind() {
        "aliased_import" => ImportedName {
            name: node.child_by_field_name("name").map(text).unwrap_or_default(),
            alias: node.child_by_field_name("alias").map(text),
        },
        _ => ImportedName {
            name: text(node),
            alias: None,
        },
    };
    ImportElement::leaf(node, vec![name])
}

fn rust_element(node: Node<'_>, source: &str) -> ImportElement {
    let text = |n: Node<'_>| node_text(n, source).to_string();
    match node.kind() {
        "identifier" => ImportElement::leaf(
            node,
            vec![ImportedName {
                name: text(node),
                alias: None,
            }],
        ),
        "scoped_identifier" => {
            let name = node
                .child_by_field_name("name")
                .map(text)
                .unwrap_or_else(|| text(node));
            ImportElement::leaf(node, vec![ImportedName { name, alias: None }])
        }
        "use_as_clause" => ImportElement::leaf(
            node,
            vec![ImportedName {
                name: node.child_by_field_name("path").map(text).unwrap_or_default(),
                alias: node.child_by_field_name("alias").map(text),
            }],
        ),
        "scoped_use_list" => match node.child_by_field_name("list") {
            Some(list) => ImportElement {
                range: node.byte_range(),
                names: Vec::new(),
                children: rust_list(list, source),
            },
            None => ImportElement::leaf(node, Vec::new()),
        },
        "use_list" => ImportElement::container(node, rust_list(node, source)),
        // `self`, `*` and anything unrecognised stay put
        _ => ImportElement::leaf(node, Vec::new()),
    }
}

fn rust_list(list: Node<'_>, source: &str) -> Vec<ImportElement> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .map(|c| rust_element(c, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{apply_edits, Edit};
    use ast_grep_language::SupportLang;

    fn prune(source: &str, lang: SupportLang) -> String {
        let tree = StructuralTree::parse(source, lang).unwrap();
        let used = used_names(&tree);
        let edits = import_statements(&tree)
            .iter()
            .flat_map(|stmt| stmt.removal_ranges(source, &used))
            .map(|r| Edit::delete(source, r.start, r.end))
            .collect();
        apply_edits(source, edits).unwrap()
    }

    #[test]
    fn javascript_statements_and_names() {
        let source = "import React, { useState as state } from 'react';\nimport './side.css';\n";
        let tree = StructuralTree::parse(source, SupportLang::JavaScript).unwrap();
        let imports = import_statements(&tree);

        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].module, "react");
        let locals: Vec<_> = imports[0].names().iter().map(|n| n.local().to_string()).collect();
        assert_eq!(locals, vec!["React", "state"]);
        assert!(imports[1].names().is_empty());
    }

    #[test]
    fn javascript_unused_specifiers_are_pruned() {
        let source = "import { a, b, c } from 'x';\nimport d from 'y';\nimport 'z';\nuse(b);\n";
        let result = prune(source, SupportLang::JavaScript);
        assert_eq!(result, "import { b } from 'x';\nimport 'z';\nuse(b);\n");
    }

    #[test]
    fn javascript_trailing_run_keeps_leading_survivor() {
        let source = "import { a, b, c } from 'x';\na();\n";
        let result = prune(source, SupportLang::JavaScript);
        assert_eq!(result, "import { a } from 'x';\na();\n");
    }

    #[test]
    fn javascript_default_survives_empty_named_list() {
        let source = "import React, { useState } from 'react';\nReact.render();\n";
        let result = prune(source, SupportLang::JavaScript);
        assert_eq!(result, "import React from 'react';\nReact.render();\n");
    }

    #[test]
    fn python_imports() {
        let source = "import os, sys\nfrom typing import List, Dict\nprint(sys.argv, Dict)\n";
        let result = prune(source, SupportLang::Python);
        assert_eq!(result, "import sys\nfrom typing import Dict\nprint(sys.argv, Dict)\n");
    }

    #[test]
    fn rust_use_declarations() {
        let source = "use std::fmt;\nuse std::collections::{HashMap, HashSet};\nfn f(m: HashMap<u8, u8>) {}\n";
        let result = prune(source, SupportLang::Rust);
        assert_eq!(
            result,
            "use std::collections::{HashMap};\nfn f(m: HashMap<u8, u8>) {}\n"
        );

        let tree = StructuralTree::parse(source, SupportLang::Rust).unwrap();
        let imports = import_statements(&tree);
        assert_eq!(imports[1].module, "std::collections");
    }

    #[test]
    fn type_only_imports_are_detected_lexically() {
        let source = "import type { Props } from './types';\nimport { x } from 'y';\n";
        let tree = StructuralTree::parse(source, SupportLang::TypeScript).unwrap();
        let imports = import_statements(&tree);

        assert!(imports[0].is_type_only());
        assert!(!imports[1].is_type_only());
    }
}
