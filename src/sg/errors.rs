use crate::edit::EditError;
use crate::ts::TreeSitterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AstGrepError {
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("pattern `{pattern}` matched 0 locations")]
    NoMatch { pattern: String },

    #[error("identifier `{name}` does not occur in the document")]
    IdentifierNotFound { name: String },

    #[error("failed to splice edits: {0}")]
    Edit(#[from] EditError),

    #[error("failed to re-parse intermediate text: {0}")]
    Parse(#[from] TreeSitterError),
}
