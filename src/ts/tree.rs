use crate::pool;
use crate::sg::errors::AstGrepError;
use crate::sg::lang::lang_name;
use crate::sg::matcher::{PatternMatch, PatternMatcher};
use crate::ts::errors::TreeSitterError;
use crate::ts::parser::{self, ErrorNode};
use ast_grep_language::SupportLang;
use serde::Serialize;
use std::collections::HashMap;
use tree_sitter::{Node, Point, Tree};

/// A parsed document: the raw tree-sitter tree plus an ast-grep root for
/// pattern queries, both built from the same source text.
pub struct StructuralTree {
    lang: SupportLang,
    tree: Tree,
    matcher: PatternMatcher,
}

impl StructuralTree {
    /// Parse `source` with the grammar for `lang`.
    pub fn parse(source: &str, lang: SupportLang) -> Result<Self, TreeSitterError> {
        let tree = pool::with_parser(lang, |parser| parser.parse(source))??;
        Ok(Self {
            lang,
            tree,
            matcher: PatternMatcher::new(source, lang),
        })
    }

    pub fn source(&self) -> &str {
        self.matcher.source()
    }

    pub fn lang(&self) -> SupportLang {
        self.lang
    }

    pub fn language_name(&self) -> String {
        lang_name(self.lang)
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn root_kind(&self) -> &'static str {
        self.tree.root_node().kind()
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        parser::error_nodes(&self.tree)
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    /// Text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        &self.source()[node.byte_range()]
    }

    /// First node matching `pattern`.
    pub fn find(&self, pattern: &str) -> Result<Option<PatternMatch>, AstGrepError> {
        self.matcher.find_first(pattern)
    }

    /// Every node matching `pattern`, in document order.
    pub fn find_all(&self, pattern: &str) -> Result<Vec<PatternMatch>, AstGrepError> {
        self.matcher.find_all(pattern)
    }

    /// Smallest named node spanning the position.
    ///
    /// `line` is 1-based, `column` is a 0-based byte column (tree-sitter
    /// convention). Positions past the last line yield `None`.
    pub fn node_at(&self, line: usize, column: usize) -> Result<Option<Node<'_>>, TreeSitterError> {
        if line == 0 {
            return Err(TreeSitterError::InvalidPosition { line, column });
        }
        let row = line - 1;
        if row > self.tree.root_node().end_position().row {
            return Ok(None);
        }
        let point = Point { row, column };
        Ok(self
            .tree
            .root_node()
            .named_descendant_for_point_range(point, point))
    }

    /// Smallest node covering a byte range, used to locate pattern matches.
    pub fn node_for_range(&self, byte_start: usize, byte_end: usize) -> Option<Node<'_>> {
        self.tree
            .root_node()
            .named_descendant_for_byte_range(byte_start, byte_end)
    }

    /// Serializable view of `node` with its text truncated to `max_chars`.
    pub fn node_info(&self, node: Node<'_>, max_chars: usize) -> NodeInfo {
        let start = node.start_position();
        let end = node.end_position();
        let mut cursor = node.walk();
        let children = node
            .named_children(&mut cursor)
            .map(|child| child.kind().to_string())
            .collect();

        NodeInfo {
            kind: node.kind().to_string(),
            text: truncate_text(self.text(node), max_chars),
            line: start.row + 1,
            column: start.column,
            end_line: end.row + 1,
            end_column: end.column,
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            has_error: node.has_error(),
            children,
            captures: HashMap::new(),
        }
    }

    /// Serializable view of a pattern match, positioned via the tree.
    pub fn match_info(&self, m: &PatternMatch, max_chars: usize) -> NodeInfo {
        let mut info = match self.node_for_range(m.byte_start, m.byte_end) {
            Some(node) => self.node_info(node, max_chars),
            None => self.node_info(self.root(), max_chars),
        };
        info.kind = m.kind.clone();
        info.text = truncate_text(&m.text, max_chars);
        info.byte_start = m.byte_start;
        info.byte_end = m.byte_end;
        info.captures = m.captures.clone();
        info
    }
}

/// Serializable description of one structural node.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    /// 1-based line
    pub line: usize,
    /// 0-based byte column
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub byte_start: usize,
    pub byte_end: usize,
    pub has_error: bool,
    /// Kinds of the named children
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub captures: HashMap<String, String>,
}

/// Truncate to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "function hello() {\n  console.log('world');\n}\n";

    #[test]
    fn parse_reports_root_and_errors() {
        let tree = StructuralTree::parse(SOURCE, SupportLang::JavaScript).unwrap();
        assert_eq!(tree.root_kind(), "program");
        assert!(!tree.has_errors());
        assert_eq!(tree.language_name(), "javascript");

        let broken = StructuralTree::parse("function (", SupportLang::JavaScript).unwrap();
        assert!(broken.has_errors());
        assert!(!broken.error_nodes().is_empty());
    }

    #[test]
    fn node_at_finds_identifier() {
        let tree = StructuralTree::parse(SOURCE, SupportLang::JavaScript).unwrap();
        let node = tree.node_at(1, 10).unwrap().unwrap();

        assert_eq!(node.kind(), "identifier");
        assert_eq!(tree.text(node), "hello");
    }

    #[test]
    fn node_at_rejects_line_zero_and_skips_past_end() {
        let tree = StructuralTree::parse(SOURCE, SupportLang::JavaScript).unwrap();
        assert!(matches!(
            tree.node_at(0, 0),
            Err(TreeSitterError::InvalidPosition { .. })
        ));
        assert!(tree.node_at(40, 0).unwrap().is_none());
    }

    #[test]
    fn match_info_carries_position_and_captures() {
        let tree = StructuralTree::parse(SOURCE, SupportLang::JavaScript).unwrap();
        let m = tree.find("console.log($MSG)").unwrap().unwrap();
        let info = tree.match_info(&m, 200);

        assert_eq!(info.kind, "call_expression");
        assert_eq!(info.line, 2);
        assert_eq!(info.column, 2);
        assert_eq!(info.captures.get("MSG").map(String::as_str), Some("'world'"));
    }

    #[test]
    fn truncate_text_respects_char_boundaries() {
        assert_eq!(truncate_text("héllo", 2), "hé...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
