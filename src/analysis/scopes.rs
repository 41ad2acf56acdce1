//! Syntactic scope tree.
//!
//! Scopes come from the grammar's scope node kinds and declarations from its
//! declarator kinds. No name resolution is attempted: a declaration belongs
//! to the innermost scope node that syntactically contains it.

use crate::analysis::model::{Declaration, ScopeInfo, ScopeReport};
use crate::sg::lang::{profile, LangProfile};
use crate::ts::imports::import_statements;
use crate::ts::syntax::{node_text, pattern_identifiers};
use crate::ts::StructuralTree;
use std::collections::HashMap;
use tree_sitter::Node;

pub fn analyze(tree: &StructuralTree, include_builtins: bool) -> ScopeReport {
    let profile = profile(tree.lang());
    let imports: HashMap<usize, Vec<(String, usize)>> = import_statements(tree)
        .into_iter()
        .map(|stmt| {
            let names = stmt
                .names()
                .iter()
                .map(|n| (n.local().to_string(), stmt.line))
                .collect();
            (stmt.range.start, names)
        })
        .collect();

    let mut builder = ScopeBuilder {
        profile,
        source: tree.source(),
        imports,
        scopes: Vec::new(),
    };
    builder.visit(tree.root(), None);

    let mut scopes = builder.scopes;
    if include_builtins {
        scopes.push(ScopeInfo {
            id: scopes.len(),
            parent: None,
            kind: "builtins".to_string(),
            start_line: 0,
            end_line: 0,
            declarations: profile
                .builtins
                .iter()
                .map(|name| Declaration {
                    name: name.to_string(),
                    kind: "builtin".to_string(),
                    line: 0,
                })
                .collect(),
        });
    }

    ScopeReport {
        language: tree.language_name(),
        scopes,
    }
}

struct ScopeBuilder<'a> {
    profile: &'static LangProfile,
    source: &'a str,
    imports: HashMap<usize, Vec<(String, usize)>>,
    scopes: Vec<ScopeInfo>,
}

impl ScopeBuilder<'_> {
    fn visit(&mut self, node: Node<'_>, enclosing: Option<usize>) {
        let kind = node.kind();
        let own = if self.profile.is_scope(kind) || enclosing.is_none() {
            Some(self.open(node, enclosing))
        } else {
            enclosing
        };

        if let Some(decl) = self.profile.declarator(kind) {
            // parameters live in the scope they introduce, names in the outer one
            let target = if decl.label == "parameter" {
                own
            } else {
                enclosing.or(own)
            };
            let names = self.declared(node, decl.field);
            if let Some(scope) = target {
                for (name, line) in names {
                    self.declare(scope, name, decl.label, line);
                }
            }
        }

        if self.profile.is_import(kind) {
            if let (Some(scope), Some(names)) = (own, self.imports.remove(&node.start_byte())) {
                for (name, line) in names {
                    self.declare(scope, name, "import", line);
                }
            }
            return;
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, own);
        }
    }

    fn open(&mut self, node: Node<'_>, parent: Option<usize>) -> usize {
        let id = self.scopes.len();
        self.scopes.push(ScopeInfo {
            id,
            parent,
            kind: node.kind().to_string(),
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
            declarations: Vec::new(),
        });
        id
    }

    fn declare(&mut self, scope: usize, name: String, kind: &str, line: usize) {
        self.scopes[scope].declarations.push(Declaration {
            name,
            kind: kind.to_string(),
            line,
        });
    }

    fn declared(&self, node: Node<'_>, field: Option<&str>) -> Vec<(String, usize)> {
        let target = match field {
            Some(field) => match node.child_by_field_name(field) {
                Some(child) => child,
                None => return Vec::new(),
            },
            None => node,
        };

        let nodes = if target.child_count() == 0 {
            vec![target]
        } else {
            pattern_identifiers(target)
        };
        nodes
            .into_iter()
            .map(|n| {
                (
                    node_text(n, self.source).to_string(),
                    n.start_position().row + 1,
                )
            })
            .collect()
    }
}
