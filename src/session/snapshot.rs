use crate::analysis::model::{ClassInfo, FunctionInfo, ImportInfo};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Latest results of each analysis facet.
///
/// Each facet is written independently by its own query and stamps
/// `captured_at`; facets can therefore reflect different points in the
/// document's history.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    pub captured_at: Option<DateTime<Utc>>,
}

impl AnalysisSnapshot {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.imports.is_empty()
    }

    pub(crate) fn set_functions(&mut self, functions: Vec<FunctionInfo>) {
        self.functions = functions;
        self.captured_at = Some(Utc::now());
    }

    pub(crate) fn set_classes(&mut self, classes: Vec<ClassInfo>) {
        self.classes = classes;
        self.captured_at = Some(Utc::now());
    }

    pub(crate) fn set_imports(&mut self, imports: Vec<ImportInfo>) {
        self.imports = imports;
        self.captured_at = Some(Utc::now());
    }
}
