use crate::ts::StructuralTree;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The active parsed document.
pub struct Document {
    tree: StructuralTree,
    origin: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Document {
    pub(crate) fn new(tree: StructuralTree, origin: Option<PathBuf>) -> Self {
        Self {
            tree,
            origin,
            loaded_at: Utc::now(),
        }
    }

    pub fn tree(&self) -> &StructuralTree {
        &self.tree
    }

    pub fn source(&self) -> &str {
        self.tree.source()
    }

    pub fn language(&self) -> String {
        self.tree.language_name()
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Swap in a re-derived tree, keeping origin and language.
    pub(crate) fn replace_tree(&mut self, tree: StructuralTree) {
        self.tree = tree;
        self.loaded_at = Utc::now();
    }

    pub fn summary(&self) -> DocumentSummary {
        let source = self.source();
        DocumentSummary {
            language: self.language(),
            origin: self.origin.as_ref().map(|p| p.display().to_string()),
            lines: source.lines().count(),
            characters: source.chars().count(),
            bytes: source.len(),
            has_errors: self.tree.has_errors(),
            error_count: self.tree.error_nodes().len(),
            root_type: self.tree.root_kind().to_string(),
            loaded_at: self.loaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub language: String,
    pub origin: Option<String>,
    pub lines: usize,
    pub characters: usize,
    pub bytes: usize,
    pub has_errors: bool,
    pub error_count: usize,
    pub root_type: String,
    pub loaded_at: DateTime<Utc>,
}

/// Whether `input` should be read as a file path rather than as source.
///
/// Crude on purpose: a single line, no `;`, shorter than `max_len`.
pub fn looks_like_path(input: &str, max_len: usize) -> bool {
    !input.contains('\n') && !input.contains(';') && input.chars().count() < max_len
}
