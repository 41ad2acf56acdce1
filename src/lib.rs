//! ast-session: a single-document structural code session.
//!
//! A client loads one document, queries its structure and rewrites it
//! through a sequence of calls, typically over the stdio JSON-RPC server in
//! [`server::rpc`].
//!
//! # Architecture
//!
//! Parsing uses the tree-sitter grammars bundled with `ast-grep-language`;
//! pattern queries use `ast-grep-core`. Every rewrite compiles down to a
//! single primitive, [`Edit`], a verified byte-span replacement applied to
//! the in-memory text. Intelligence lives in span acquisition, not in
//! application.
//!
//! The [`Session`] owns all mutable state. Rewrites go through a two-phase
//! pipeline: derive a candidate, then either return it (preview) or install
//! it as the new document (commit).
//!
//! # Example
//!
//! ```
//! use ast_session::{ServerConfig, Session};
//!
//! let mut session = Session::new(&ServerConfig::default());
//! session.load("function hello() { return 1; }", Some(false), Some("javascript"))?;
//!
//! let report = ast_session::transform::rename_identifier(&mut session, "hello", "greet", Some(true))?;
//! assert!(report.result.contains("greet"));
//! assert!(session.require()?.source().contains("hello"));
//! # Ok::<(), ast_session::SessionError>(())
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod edit;
pub mod error;
pub mod pool;
pub mod server;
pub mod session;
pub mod sg;
pub mod transform;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, ServerConfig};
pub use edit::{apply_edits, Edit, EditError, EditVerification};
pub use error::SessionError;
pub use server::{Dispatcher, ToolResponse};
pub use session::{AnalysisSnapshot, Document, DocumentSummary, Session, TransformRecord};
pub use sg::{AstGrepError, PatternMatch, PatternMatcher, Rewriter, SupportLang};
pub use transform::{TransformOp, TransformReport};
pub use ts::{NodeInfo, StructuralTree, TreeSitterError};
