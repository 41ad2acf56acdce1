//! Tree-sitter integration: parsing any bundled grammar into a
//! [`StructuralTree`] and syntactic helpers over its nodes.

pub mod errors;
pub mod imports;
pub mod parser;
pub mod syntax;
pub mod tree;

pub use errors::TreeSitterError;
pub use parser::{ErrorNode, SourceParser};
pub use tree::{truncate_text, NodeInfo, StructuralTree};
