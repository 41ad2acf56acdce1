//! ast-grep integration: language tables, pattern matching and the
//! chainable rewriter built on top of them.
//!
//! Patterns use ast-grep's metavariable syntax (`$NAME`, `$$$BODY`, `$_`)
//! for structural search and replacement.

pub mod errors;
pub mod lang;
pub mod matcher;
pub mod rewriter;

pub use errors::AstGrepError;
pub use lang::{parse_language_hint, SupportLang};
pub use matcher::{PatternMatch, PatternMatcher};
pub use rewriter::Rewriter;
