use crate::sg::lang::lang_name;
use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper bound to one ast-grep language at a time.
pub struct SourceParser {
    parser: Parser,
    lang: SupportLang,
}

impl SourceParser {
    /// Create a parser for the given language.
    pub fn new(lang: SupportLang) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        // Grammar comes from ast-grep-language so both layers agree on node kinds
        let ts_lang = lang.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet {
                language: lang_name(lang),
            })?;

        Ok(Self { parser, lang })
    }

    /// The language this parser is currently configured for.
    pub fn lang(&self) -> SupportLang {
        self.lang
    }

    /// Switch the grammar. No-op when already configured for `lang`.
    pub fn set_lang(&mut self, lang: SupportLang) -> Result<(), TreeSitterError> {
        if self.lang == lang {
            return Ok(());
        }
        self.parser
            .set_language(&lang.get_ts_language())
            .map_err(|_| TreeSitterError::LanguageSet {
                language: lang_name(lang),
            })?;
        self.lang = lang;
        Ok(())
    }

    /// Parse source code into a tree-sitter Tree.
    ///
    /// Malformed code still yields a tree (with ERROR nodes); only a parser
    /// that gives up entirely produces `ParseFailed`.
    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| TreeSitterError::ParseFailed {
                language: lang_name(self.lang),
            })
    }
}

/// Information about an ERROR node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub end_point: tree_sitter::Point,
}

/// Collect every ERROR or MISSING node of a tree in document order.
pub fn error_nodes(tree: &Tree) -> Vec<ErrorNode> {
    let mut errors = Vec::new();
    collect_error_nodes(tree.root_node(), &mut errors);
    errors
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            end_point: node.end_position(),
        });
    }

    // Subtrees without errors can be skipped entirely
    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
