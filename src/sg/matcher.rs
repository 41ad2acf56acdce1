use crate::cache;
use crate::sg::errors::AstGrepError;
use ast_grep_core::meta_var::MetaVariable;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, NodeMatch};
use ast_grep_language::SupportLang;
use std::collections::HashMap;

/// A match from an ast-grep pattern with captured metavariables.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    /// Node kind of the matched node
    pub kind: String,
    /// Byte range of the entire match
    pub byte_start: usize,
    pub byte_end: usize,
    /// The matched text
    pub text: String,
    /// Captured metavariables: name -> text
    pub captures: HashMap<String, String>,
}

impl PatternMatch {
    /// Whether this match lies inside `[start, end)`.
    pub fn within(&self, start: usize, end: usize) -> bool {
        self.byte_start >= start && self.byte_end <= end
    }
}

/// Pattern matcher using ast-grep's metavariable syntax.
///
/// # Metavariable Syntax
///
/// - `$NAME` - Matches a single node and captures it
/// - `$$$NAME` - Matches zero or more nodes (variadic)
/// - `$_` - Matches any single node (anonymous)
///
/// # Example Patterns
///
/// ```text
/// function $NAME($$$PARAMS) { $$$BODY }   // JavaScript function declaration
/// console.log($$$ARGS)                    // console.log calls
/// def $NAME($$$PARAMS): $$$BODY           // Python function
/// $EXPR.clone()                           // Rust .clone() calls
/// ```
pub struct PatternMatcher {
    source: String,
    lang: SupportLang,
    sg: AstGrep<StrDoc<SupportLang>>,
}

impl PatternMatcher {
    /// Create a new pattern matcher for the given source code.
    pub fn new(source: &str, lang: SupportLang) -> Self {
        let sg = AstGrep::new(source, lang);
        Self {
            source: source.to_string(),
            lang,
            sg,
        }
    }

    /// Find all matches for a pattern, in document order.
    pub fn find_all(&self, pattern: &str) -> Result<Vec<PatternMatch>, AstGrepError> {
        let pat = cache::get_or_compile_pattern(pattern, self.lang)?;
        let root = self.sg.root();

        let results = root
            .find_all(&pat)
            .map(|m| self.node_match_to_pattern_match(m))
            .collect();

        Ok(results)
    }

    /// Find the first match for a pattern, if any.
    pub fn find_first(&self, pattern: &str) -> Result<Option<PatternMatch>, AstGrepError> {
        let pat = cache::get_or_compile_pattern(pattern, self.lang)?;
        Ok(self
            .sg
            .root()
            .find(&pat)
            .map(|m| self.node_match_to_pattern_match(m)))
    }

    /// Find all nodes of a specific kind, in document order.
    ///
    /// Kind-based lookup complements patterns for constructs that are not
    /// valid standalone code (class bodies, argument lists, ...).
    pub fn find_by_kind(&self, kind: &str) -> Vec<PatternMatch> {
        let root = self.sg.root();
        let mut results = Vec::new();

        for node in root.dfs() {
            if node.kind() != kind {
                continue;
            }
            let range = node.range();
            results.push(PatternMatch {
                kind: kind.to_string(),
                byte_start: range.start,
                byte_end: range.end,
                text: self.source[range.start..range.end].to_string(),
                captures: HashMap::new(),
            });
        }

        results
    }

    /// Get the source code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the language the source was parsed as.
    pub fn lang(&self) -> SupportLang {
        self.lang
    }

    fn node_match_to_pattern_match(&self, m: NodeMatch<StrDoc<SupportLang>>) -> PatternMatch {
        let node = m.get_node();
        let range = node.range();
        let kind = node.kind().to_string();
        let text = self.source[range.start..range.end].to_string();

        let env = m.get_env();
        let mut captures: HashMap<String, String> = env.clone().into();

        // Variadic captures keep their separators: take the source span from
        // the first captured node to the last.
        for var in env.get_matched_variables() {
            if let MetaVariable::MultiCapture(name) = var {
                let nodes = env.get_multiple_matches(&name);
                let text = match (nodes.first(), nodes.last()) {
                    (Some(first), Some(last)) => {
                        self.source[first.range().start..last.range().end].to_string()
                    }
                    _ => String::new(),
                };
                captures.insert(name, text);
            }
        }

        PatternMatch {
            kind,
            byte_start: range.start,
            byte_end: range.end,
            text,
            captures,
        }
    }
}
