//! Thread-local parser pooling.
//!
//! Keeps one reusable tree-sitter parser per thread. The parser is created on
//! first use and re-targeted when a different language is requested, so
//! repeated re-parses during rewrite chains do not pay for parser setup.

use crate::ts::{SourceParser, TreeSitterError};
use ast_grep_language::SupportLang;
use std::cell::RefCell;

thread_local! {
    static PARSER: RefCell<Option<SourceParser>> = const { RefCell::new(None) };
}

/// Execute function with the pooled parser configured for `lang`.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use ast_grep_language::SupportLang;
/// use ast_session::pool::with_parser;
///
/// let tree = with_parser(SupportLang::JavaScript, |parser| {
///     parser.parse("const x = 1;")
/// })??;
/// assert_eq!(tree.root_node().kind(), "program");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(lang: SupportLang, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(SourceParser::new(lang)?);
        }
        let parser = slot.as_mut().expect("parser was just initialized above");
        parser.set_lang(lang)?;
        Ok(f(parser))
    })
}
