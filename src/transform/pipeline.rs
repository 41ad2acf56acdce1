//! Two-phase rewrite protocol shared by every mutating operation.
//!
//! Derive builds the candidate text from the current document without
//! touching session state. Finalize either hands the candidate back
//! (preview) or installs it as the new document (commit). Both append one
//! audit record.

use crate::error::SessionError;
use crate::session::{Document, DocumentSummary, Session};
use crate::sg::Rewriter;
use crate::transform::operation::TransformOp;
use serde::Serialize;
use serde_json::Value;
use similar::TextDiff;
use std::fmt;
use tracing::{debug, info, warn};

/// Lifecycle of one rewrite invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Deriving,
    PreviewReady,
    CommitReady,
    PreviewReturned,
    Committed,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Deriving => "deriving",
            PipelineState::PreviewReady => "preview-ready",
            PipelineState::CommitReady => "commit-ready",
            PipelineState::PreviewReturned => "preview-returned",
            PipelineState::Committed => "committed",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A rewrite invocation as received from a caller.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// Operation name recorded in the history
    pub operation: String,
    /// Caller-supplied parameters, recorded verbatim
    pub parameters: Value,
    pub steps: Vec<TransformOp>,
    pub preview: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub preview: bool,
    pub committed: bool,
    pub steps: usize,
    pub changed: bool,
    /// Candidate text
    pub result: String,
    /// Unified diff from the current document to the candidate
    pub diff: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentSummary>,
}

/// Apply `steps` in order to the document's text.
pub fn derive(document: &Document, steps: &[TransformOp]) -> Result<String, SessionError> {
    let mut rewriter = Rewriter::from_tree(document.tree())?;
    for (index, step) in steps.iter().enumerate() {
        debug!(index, step = step.name(), "applying step");
        rewriter = step.apply(rewriter)?;
    }
    Ok(rewriter.finish())
}

/// Unified diff between two texts.
pub fn unified_diff(current: &str, candidate: &str) -> String {
    TextDiff::from_lines(current, candidate)
        .unified_diff()
        .context_radius(3)
        .header("current", "candidate")
        .to_string()
}

/// Derive, then finalize according to `request.preview`.
///
/// On any error the session is left exactly as it was.
pub fn run(session: &mut Session, request: TransformRequest) -> Result<TransformReport, SessionError> {
    let mut state = PipelineState::Idle;
    let operation = request.operation.as_str();

    let document = session.require()?;
    transition(&mut state, PipelineState::Deriving, operation);

    let candidate = match derive(document, &request.steps) {
        Ok(text) => text,
        Err(e) => {
            transition(&mut state, PipelineState::Failed, operation);
            warn!(operation, kind = e.kind(), error = %e, "derivation failed");
            return Err(e);
        }
    };
    let current = document.source();
    let diff = unified_diff(current, &candidate);
    let changed = current != candidate;

    if request.preview {
        transition(&mut state, PipelineState::PreviewReady, operation);
        session.append_record(operation, request.parameters, &candidate, false);
        transition(&mut state, PipelineState::PreviewReturned, operation);
        info!(operation, changed, "preview returned");

        return Ok(TransformReport {
            preview: true,
            committed: false,
            steps: request.steps.len(),
            changed,
            result: candidate,
            diff,
            document: None,
        });
    }

    transition(&mut state, PipelineState::CommitReady, operation);
    let summary = match session.replace(&candidate) {
        Ok(summary) => summary,
        Err(e) => {
            transition(&mut state, PipelineState::Failed, operation);
            warn!(operation, kind = e.kind(), error = %e, "commit failed");
            return Err(e);
        }
    };
    session.append_record(operation, request.parameters, &candidate, true);
    transition(&mut state, PipelineState::Committed, operation);
    info!(operation, changed, bytes = summary.bytes, "rewrite committed");

    Ok(TransformReport {
        preview: false,
        committed: true,
        steps: request.steps.len(),
        changed,
        result: candidate,
        diff,
        document: Some(summary),
    })
}

fn transition(state: &mut PipelineState, next: PipelineState, operation: &str) {
    debug!(operation, from = %state, to = %next, "pipeline transition");
    *state = next;
}
