use crate::sg::lang::parse_language_hint;
use serde::Deserialize;
use std::fmt;

/// Server settings, read from a TOML file.
///
/// Every section and key is optional; missing values take the defaults
/// below.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub transform: TransformSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    /// Language used when neither a hint nor a file extension decides.
    pub default_language: String,
    /// Inputs at least this long are never treated as file paths.
    pub path_detection_max_len: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_language: "javascript".to_string(),
            path_detection_max_len: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    pub find_all_limit: usize,
    pub node_text_max_chars: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            find_all_limit: 100,
            node_text_max_chars: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TransformSettings {
    pub preview_by_default: bool,
    pub history_preview_chars: usize,
    /// Maximum retained transform records; 0 keeps everything.
    pub history_limit: usize,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            preview_by_default: false,
            history_preview_chars: 200,
            history_limit: 0,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if parse_language_hint(&self.session.default_language).is_none() {
            issues.push(ValidationIssue::UnknownLanguage {
                language: self.session.default_language.clone(),
            });
        }
        if self.session.path_detection_max_len == 0 {
            issues.push(ValidationIssue::MustBePositive {
                field: "session.path_detection_max_len",
            });
        }
        if self.query.find_all_limit == 0 {
            issues.push(ValidationIssue::MustBePositive {
                field: "query.find_all_limit",
            });
        }
        if self.query.node_text_max_chars == 0 {
            issues.push(ValidationIssue::MustBePositive {
                field: "query.node_text_max_chars",
            });
        }
        if self.transform.history_preview_chars == 0 {
            issues.push(ValidationIssue::MustBePositive {
                field: "transform.history_preview_chars",
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    UnknownLanguage { language: String },
    MustBePositive { field: &'static str },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownLanguage { language } => {
                write!(f, "session.default_language '{language}' is not a supported language")
            }
            ValidationIssue::MustBePositive { field } => {
                write!(f, "'{field}' must be greater than zero")
            }
        }
    }
}
