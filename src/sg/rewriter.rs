use crate::edit::{apply_edits, Edit};
use crate::sg::errors::AstGrepError;
use crate::sg::lang::IDENTIFIER_KINDS;
use crate::sg::matcher::PatternMatch;
use crate::ts::imports::{import_statements, used_names};
use crate::ts::syntax::{leaves_of_kind, node_text};
use crate::ts::StructuralTree;
use ast_grep_language::SupportLang;
use std::collections::HashMap;

/// Chainable rewrites over one source text.
///
/// Each step resolves its spans against a fresh parse of the previous step's
/// output, compiles them into [`Edit`]s and splices them in one pass. A step
/// that fails leaves nothing half-applied: the builder is consumed and the
/// error returned.
///
/// ```
/// use ast_session::sg::Rewriter;
/// use ast_grep_language::SupportLang;
///
/// let out = Rewriter::new("let a = 1; use(a);", SupportLang::JavaScript)?
///     .rename("a", "b")?
///     .finish();
/// assert_eq!(out, "let b = 1; use(b);");
/// # Ok::<(), ast_session::sg::AstGrepError>(())
/// ```
pub struct Rewriter {
    tree: StructuralTree,
}

impl Rewriter {
    pub fn new(source: &str, lang: SupportLang) -> Result<Self, AstGrepError> {
        Ok(Self {
            tree: StructuralTree::parse(source, lang)?,
        })
    }

    /// Start from an already parsed tree.
    pub fn from_tree(tree: &StructuralTree) -> Result<Self, AstGrepError> {
        Self::new(tree.source(), tree.lang())
    }

    /// Current text.
    pub fn source(&self) -> &str {
        self.tree.source()
    }

    pub fn lang(&self) -> SupportLang {
        self.tree.lang()
    }

    /// Rename every identifier-like leaf spelled `old` to `new`.
    ///
    /// Purely syntactic: shadowing is not considered, and strings and
    /// comments are never touched.
    pub fn rename(self, old: &str, new: &str) -> Result<Self, AstGrepError> {
        let source = self.source();
        let edits: Vec<Edit> = leaves_of_kind(self.tree.root(), IDENTIFIER_KINDS)
            .into_iter()
            .filter(|node| node_text(*node, source) == old)
            .map(|node| Edit::new(node.start_byte(), node.end_byte(), new, old))
            .collect();

        if edits.is_empty() {
            return Err(AstGrepError::IdentifierNotFound {
                name: old.to_string(),
            });
        }
        self.apply(edits)
    }

    /// Drop import bindings that nothing outside the imports refers to.
    ///
    /// Finding nothing to remove is not an error.
    pub fn remove_unused_imports(self) -> Result<Self, AstGrepError> {
        let source = self.source();
        let used = used_names(&self.tree);
        let edits: Vec<Edit> = import_statements(&self.tree)
            .iter()
            .flat_map(|stmt| stmt.removal_ranges(source, &used))
            .map(|range| Edit::delete(source, range.start, range.end))
            .collect();

        if edits.is_empty() {
            return Ok(self);
        }
        self.apply(edits)
    }

    /// Replace every match of `pattern` inside nodes of kind `node_type`.
    ///
    /// `node_type` of `*` or empty scopes the search to the whole document.
    /// `$NAME` and `$$$NAME` in `replacement` are substituted with the
    /// match's captures.
    pub fn replace_in(
        self,
        node_type: &str,
        pattern: &str,
        replacement: &str,
    ) -> Result<Self, AstGrepError> {
        let matcher = self.tree.matcher();
        let matches = matcher.find_all(pattern)?;

        let scoped: Vec<PatternMatch> = if node_type.is_empty() || node_type == "*" {
            matches
        } else {
            let scopes = matcher.find_by_kind(node_type);
            matches
                .into_iter()
                .filter(|m| scopes.iter().any(|s| m.within(s.byte_start, s.byte_end)))
                .collect()
        };

        let outermost = collapse_nested(scoped);
        if outermost.is_empty() {
            return Err(AstGrepError::NoMatch {
                pattern: pattern.to_string(),
            });
        }

        let edits = outermost
            .iter()
            .map(|m| {
                Edit::new(
                    m.byte_start,
                    m.byte_end,
                    expand_template(replacement, &m.captures),
                    &m.text,
                )
            })
            .collect();
        self.apply(edits)
    }

    /// Insert `text` on its own line above every match of `pattern`.
    pub fn insert_before(self, pattern: &str, text: &str) -> Result<Self, AstGrepError> {
        self.insert(pattern, text, Placement::Before)
    }

    /// Insert `text` on its own line below every match of `pattern`.
    pub fn insert_after(self, pattern: &str, text: &str) -> Result<Self, AstGrepError> {
        self.insert(pattern, text, Placement::After)
    }

    pub fn finish(self) -> String {
        self.tree.source().to_string()
    }

    fn insert(self, pattern: &str, text: &str, placement: Placement) -> Result<Self, AstGrepError> {
        let matches = collapse_nested(self.tree.find_all(pattern)?);
        if matches.is_empty() {
            return Err(AstGrepError::NoMatch {
                pattern: pattern.to_string(),
            });
        }

        let source = self.source();
        let edits = matches
            .iter()
            .map(|m| {
                let line_start = source[..m.byte_start].rfind('\n').map_or(0, |i| i + 1);
                let indent = leading_whitespace(&source[line_start..]);
                let block = indent_block(text, indent);
                match placement {
                    Placement::Before => Edit::insert(line_start, format!("{block}\n")),
                    Placement::After => {
                        let line_end = source[m.byte_end..]
                            .find('\n')
                            .map_or(source.len(), |i| m.byte_end + i);
                        Edit::insert(line_end, format!("\n{block}"))
                    }
                }
            })
            .collect();
        self.apply(edits)
    }

    fn apply(self, edits: Vec<Edit>) -> Result<Self, AstGrepError> {
        let lang = self.lang();
        let text = apply_edits(self.source(), edits)?;
        Self::new(&text, lang)
    }
}

#[derive(Clone, Copy)]
enum Placement {
    Before,
    After,
}

/// Keep only matches not contained in an earlier kept match.
fn collapse_nested(mut matches: Vec<PatternMatch>) -> Vec<PatternMatch> {
    matches.sort_by(|a, b| {
        a.byte_start
            .cmp(&b.byte_start)
            .then(b.byte_end.cmp(&a.byte_end))
    });

    let mut kept: Vec<PatternMatch> = Vec::new();
    for m in matches {
        match kept.last() {
            Some(last) if m.byte_start < last.byte_end => {}
            _ => kept.push(m),
        }
    }
    kept
}

/// Substitute `$NAME` / `$$$NAME` placeholders with captured text.
///
/// Placeholders without a capture are left as written.
pub fn expand_template(template: &str, captures: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos..];
        let sigil = if after.starts_with("$$$") { 3 } else { 1 };
        let name_len = after[sigil..]
            .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(after.len() - sigil);
        let name = &after[sigil..sigil + name_len];

        match captures.get(name) {
            Some(value) if !name.is_empty() => out.push_str(value),
            _ => out.push_str(&after[..sigil + name_len]),
        }
        rest = &after[sigil + name_len..];
    }
    out.push_str(rest);
    out
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

fn indent_block(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
