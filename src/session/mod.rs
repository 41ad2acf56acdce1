//! The single-document session store.
//!
//! [`Session`] exclusively owns the active [`Document`], the
//! [`AnalysisSnapshot`] and the transform log. Everything else reads and
//! writes them through the methods here.

pub mod document;
pub mod history;
pub mod snapshot;

pub use document::{looks_like_path, Document, DocumentSummary};
pub use history::{log_for_limit, RingLog, TransformLog, TransformRecord, UnboundedLog};
pub use snapshot::AnalysisSnapshot;

use crate::analysis::model::{ClassInfo, FunctionInfo, ImportInfo};
use crate::config::{ServerConfig, SessionSettings, TransformSettings};
use crate::error::SessionError;
use crate::sg::lang::{self, SupportLang};
use crate::ts::{truncate_text, StructuralTree};
use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct Session {
    document: Option<Document>,
    snapshot: AnalysisSnapshot,
    log: Box<dyn TransformLog>,
    settings: SessionSettings,
    transform: TransformSettings,
}

impl Session {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            document: None,
            snapshot: AnalysisSnapshot::default(),
            log: log_for_limit(config.transform.history_limit),
            settings: config.session.clone(),
            transform: config.transform.clone(),
        }
    }

    /// Load `source` as the active document, replacing any previous one.
    ///
    /// `source` is read from disk when `is_file_path` says so or, when it is
    /// unspecified, when [`looks_like_path`] does. On failure the previous
    /// document is left in place.
    pub fn load(
        &mut self,
        source: &str,
        is_file_path: Option<bool>,
        language: Option<&str>,
    ) -> Result<DocumentSummary, SessionError> {
        let from_file = is_file_path
            .unwrap_or_else(|| looks_like_path(source, self.settings.path_detection_max_len));

        let (text, origin) = if from_file {
            let path = PathBuf::from(source);
            let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SessionError::NotFound {
                    path: source.to_string(),
                },
                _ => SessionError::ProviderFailure {
                    message: format!("failed to read {}: {e}", path.display()),
                },
            })?;
            (text, Some(path))
        } else {
            (source.to_string(), None)
        };

        let lang = self.resolve_language(language, origin.as_ref())?;
        let tree = StructuralTree::parse(&text, lang)?;
        let document = Document::new(tree, origin);
        let summary = document.summary();

        self.document = Some(document);
        self.snapshot = AnalysisSnapshot::default();

        info!(
            language = %summary.language,
            origin = summary.origin.as_deref().unwrap_or("<inline>"),
            bytes = summary.bytes,
            has_errors = summary.has_errors,
            "document loaded"
        );
        Ok(summary)
    }

    fn resolve_language(
        &self,
        hint: Option<&str>,
        origin: Option<&PathBuf>,
    ) -> Result<SupportLang, SessionError> {
        if let Some(hint) = hint.filter(|h| !h.trim().is_empty()) {
            return lang::parse_language_hint(hint).ok_or_else(|| SessionError::ProviderFailure {
                message: format!("unsupported language `{hint}`"),
            });
        }
        if let Some(lang) = origin.and_then(|p| lang::from_path(p)) {
            return Ok(lang);
        }
        lang::parse_language_hint(&self.settings.default_language).ok_or_else(|| {
            SessionError::ProviderFailure {
                message: format!(
                    "unsupported default language `{}`",
                    self.settings.default_language
                ),
            }
        })
    }

    pub fn current(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The active document, or `NoDocumentLoaded`.
    pub fn require(&self) -> Result<&Document, SessionError> {
        self.document.as_ref().ok_or(SessionError::NoDocumentLoaded)
    }

    /// Replace the document text, re-deriving its tree first.
    ///
    /// Origin and language are preserved and the analysis snapshot is kept.
    /// A parse failure leaves the document untouched.
    pub fn replace(&mut self, new_text: &str) -> Result<DocumentSummary, SessionError> {
        let document = self
            .document
            .as_mut()
            .ok_or(SessionError::NoDocumentLoaded)?;
        let tree = StructuralTree::parse(new_text, document.tree().lang())?;
        document.replace_tree(tree);
        debug!(bytes = new_text.len(), "document replaced");
        Ok(document.summary())
    }

    pub fn snapshot(&self) -> &AnalysisSnapshot {
        &self.snapshot
    }

    pub fn store_functions(&mut self, functions: Vec<FunctionInfo>) {
        self.snapshot.set_functions(functions);
    }

    pub fn store_classes(&mut self, classes: Vec<ClassInfo>) {
        self.snapshot.set_classes(classes);
    }

    pub fn store_imports(&mut self, imports: Vec<ImportInfo>) {
        self.snapshot.set_imports(imports);
    }

    /// Append one audit record; `candidate` is truncated for storage.
    pub fn append_record(
        &mut self,
        operation: &str,
        parameters: Value,
        candidate: &str,
        committed: bool,
    ) {
        self.log.append(TransformRecord {
            operation: operation.to_string(),
            parameters,
            result_preview: truncate_text(candidate, self.transform.history_preview_chars),
            committed,
            timestamp: Utc::now(),
        });
    }

    pub fn history(&self) -> Vec<TransformRecord> {
        self.log.records()
    }

    pub fn history_len(&self) -> usize {
        self.log.len()
    }

    /// Whether rewrites preview when the caller does not say.
    pub fn preview_by_default(&self) -> bool {
        self.transform.preview_by_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn session() -> Session {
        Session::new(&ServerConfig::default())
    }

    #[test]
    fn inline_load_uses_default_language() {
        let mut session = session();
        let summary = session
            .load("function hello() { return 1; }", None, None)
            .unwrap();

        assert_eq!(summary.language, "javascript");
        assert_eq!(summary.root_type, "program");
        assert_eq!(summary.origin, None);
        assert!(session.current().is_some());
    }

    #[test]
    fn file_load_infers_language_from_extension() {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        writeln!(file, "def f():\n    pass").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut session = session();
        let summary = session.load(&path, None, None).unwrap();

        assert_eq!(summary.language, "python");
        assert_eq!(summary.root_type, "module");
        assert_eq!(summary.origin.as_deref(), Some(path.as_str()));
    }

    #[test]
    fn missing_file_keeps_previous_document() {
        let mut session = session();
        session.load("const a = 1;", None, None).unwrap();

        let err = session.load("/no/such/file.js", None, None).unwrap_err();
        assert_eq!(err.kind(), "NotFound");
        assert_eq!(session.require().unwrap().source(), "const a = 1;");
    }

    #[test]
    fn explicit_flag_overrides_heuristic() {
        let mut session = session();
        let summary = session.load("foo()", Some(false), None).unwrap();
        assert_eq!(summary.bytes, 5);
    }

    #[test]
    fn unknown_language_hint_is_a_provider_failure() {
        let mut session = session();
        let err = session.load("x = 1;", None, Some("klingon")).unwrap_err();
        assert_eq!(err.kind(), "ProviderFailure");
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn require_without_document() {
        let session = session();
        assert!(matches!(
            session.require(),
            Err(SessionError::NoDocumentLoaded)
        ));
    }

    #[test]
    fn load_clears_snapshot_but_replace_keeps_it() {
        let mut session = session();
        session.load("const a = 1;", None, None).unwrap();
        session.store_imports(vec![ImportInfo {
            source: "x".to_string(),
            names: Vec::new(),
            is_type_only: false,
            line: 1,
            text: "import 'x';".to_string(),
        }]);

        session.replace("const b = 2;").unwrap();
        assert_eq!(session.snapshot().imports.len(), 1);
        assert_eq!(session.require().unwrap().source(), "const b = 2;");

        session.load("const c = 3;", None, None).unwrap();
        assert!(session.snapshot().is_empty());
        assert!(session.snapshot().captured_at.is_none());
    }

    #[test]
    fn records_are_truncated() {
        let config = ServerConfig {
            transform: TransformSettings {
                history_preview_chars: 4,
                ..TransformSettings::default()
            },
            ..ServerConfig::default()
        };
        let mut session = Session::new(&config);
        session.append_record("rename", json!({}), "abcdefgh", false);

        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].result_preview, "abcd...");
    }
}
