use crate::config::schema::{ServerConfig, ValidationError};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "AST_SESSION_CONFIG";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Io { .. } => self,
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(
                    f,
                    "failed to read server config from {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse server config TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse server config TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid server config ({}): {}", path.display(), source),
                None => write!(f, "invalid server config: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<ServerConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

/// Resolve the active configuration.
///
/// Priority order:
/// 1. Explicit path (the `--config` flag)
/// 2. `AST_SESSION_CONFIG` environment variable
/// 3. Built-in defaults
pub fn resolve(explicit: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }
    match env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => load_from_path(PathBuf::from(path)),
        _ => Ok(ServerConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_input_yields_defaults() {
        let config = load_from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.session.default_language, "javascript");
        assert_eq!(config.query.find_all_limit, 100);
        assert!(!config.transform.preview_by_default);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = load_from_str(
            r#"
[transform]
preview_by_default = true
history_limit = 5
"#,
        )
        .unwrap();

        assert!(config.transform.preview_by_default);
        assert_eq!(config.transform.history_limit, 5);
        assert_eq!(config.transform.history_preview_chars, 200);
        assert_eq!(config.session.path_detection_max_len, 200);
    }

    #[test]
    fn validation_collects_every_issue() {
        let err = load_from_str(
            r#"
[session]
default_language = "klingon"

[query]
find_all_limit = 0
"#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation { source, .. } => assert_eq!(source.issues.len(), 2),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_from_str("[query]\nlimit = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn path_errors_carry_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[session]\npath_detection_max_len = 0").unwrap();

        let err = load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));

        let err = load_from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn explicit_path_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query]\nfind_all_limit = 7").unwrap();

        let config = resolve(Some(file.path())).unwrap();
        assert_eq!(config.query.find_all_limit, 7);
    }
}
