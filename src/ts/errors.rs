use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set {language} grammar for parser")]
    LanguageSet { language: String },

    #[error("{language} parser rejected the source text")]
    ParseFailed { language: String },

    #[error("invalid position {line}:{column} (lines are 1-based)")]
    InvalidPosition { line: usize, column: usize },
}
