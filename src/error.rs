use crate::edit::EditError;
use crate::sg::AstGrepError;
use crate::ts::TreeSitterError;
use thiserror::Error;

/// Every failure a session operation can report to a caller.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no document loaded; call parse_code first")]
    NoDocumentLoaded,

    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse document: {message}")]
    ParseFailure { message: String },

    #[error("unknown operation `{name}` at index {index}{}", suggestion_suffix(.suggestion))]
    UnknownOperation {
        index: usize,
        name: String,
        suggestion: Option<String>,
    },

    #[error("pattern `{pattern}`: {message}")]
    PatternError { pattern: String, message: String },

    #[error("provider failure: {message}")]
    ProviderFailure { message: String },

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("unknown tool `{name}`{}", suggestion_suffix(.suggestion))]
    UnknownTool {
        name: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean `{s}`?)"),
        None => String::new(),
    }
}

impl SessionError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::NoDocumentLoaded => "NoDocumentLoaded",
            SessionError::NotFound { .. } => "NotFound",
            SessionError::ParseFailure { .. } => "ParseFailure",
            SessionError::UnknownOperation { .. } => "UnknownOperation",
            SessionError::PatternError { .. } => "PatternError",
            SessionError::ProviderFailure { .. } => "ProviderFailure",
            SessionError::InvalidArguments { .. } => "InvalidArguments",
            SessionError::UnknownTool { .. } => "UnknownTool",
        }
    }

    pub fn invalid_arguments(tool: &str, message: impl Into<String>) -> Self {
        SessionError::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

impl From<AstGrepError> for SessionError {
    fn from(err: AstGrepError) -> Self {
        match err {
            AstGrepError::InvalidPattern { pattern, message } => {
                SessionError::PatternError { pattern, message }
            }
            AstGrepError::NoMatch { pattern } => SessionError::PatternError {
                pattern,
                message: "no matches in the current document".to_string(),
            },
            AstGrepError::IdentifierNotFound { name } => SessionError::PatternError {
                pattern: name,
                message: "identifier does not occur in the current document".to_string(),
            },
            AstGrepError::Edit(e) => e.into(),
            AstGrepError::Parse(e) => e.into(),
        }
    }
}

impl From<TreeSitterError> for SessionError {
    fn from(err: TreeSitterError) -> Self {
        match err {
            TreeSitterError::ParseFailed { .. } => SessionError::ParseFailure {
                message: err.to_string(),
            },
            other => SessionError::ProviderFailure {
                message: other.to_string(),
            },
        }
    }
}

impl From<EditError> for SessionError {
    fn from(err: EditError) -> Self {
        SessionError::ProviderFailure {
            message: err.to_string(),
        }
    }
}

/// Closest candidate to `name` by Jaro-Winkler similarity, if any is close.
pub fn suggest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|c| (strsim::jaro_winkler(name, c), c))
        .filter(|(score, _)| *score >= 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c.to_string())
}
