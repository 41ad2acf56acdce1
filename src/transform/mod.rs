//! Rewrite entry points. All of them funnel into [`pipeline::run`].

pub mod operation;
pub mod pipeline;

pub use operation::{canonical_tag, parse_operations, TransformOp, SUPPORTED_OPERATIONS};
pub use pipeline::{PipelineState, TransformReport, TransformRequest};

use crate::error::SessionError;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Where `insert_code` places its text relative to each match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    After,
}

fn resolve_preview(session: &Session, preview: Option<bool>) -> bool {
    preview.unwrap_or_else(|| session.preview_by_default())
}

pub fn rename_identifier(
    session: &mut Session,
    old_name: &str,
    new_name: &str,
    preview: Option<bool>,
) -> Result<TransformReport, SessionError> {
    let parameters = json!({ "oldName": old_name, "newName": new_name });
    let steps = parse_operations(&[json!({
        "type": "rename",
        "oldName": old_name,
        "newName": new_name,
    })])
    .map_err(|e| retarget(e, "rename_identifier"))?;

    let preview = resolve_preview(session, preview);
    pipeline::run(
        session,
        TransformRequest {
            operation: "rename_identifier".to_string(),
            parameters,
            steps,
            preview,
        },
    )
}

pub fn remove_unused_imports(
    session: &mut Session,
    preview: Option<bool>,
) -> Result<TransformReport, SessionError> {
    let preview = resolve_preview(session, preview);
    pipeline::run(
        session,
        TransformRequest {
            operation: "remove_unused_imports".to_string(),
            parameters: json!({}),
            steps: vec![TransformOp::RemoveUnusedImports],
            preview,
        },
    )
}

pub fn insert_code(
    session: &mut Session,
    pattern: &str,
    code: &str,
    position: InsertPosition,
    preview: Option<bool>,
) -> Result<TransformReport, SessionError> {
    let step = match position {
        InsertPosition::Before => TransformOp::InsertBefore {
            pattern: pattern.to_string(),
            code: code.to_string(),
        },
        InsertPosition::After => TransformOp::InsertAfter {
            pattern: pattern.to_string(),
            code: code.to_string(),
        },
    };
    let preview = resolve_preview(session, preview);
    pipeline::run(
        session,
        TransformRequest {
            operation: "insert_code".to_string(),
            parameters: json!({ "pattern": pattern, "code": code, "position": position }),
            steps: vec![step],
            preview,
        },
    )
}

/// Run a caller-supplied batch (`transform_code`).
pub fn apply_operations(
    session: &mut Session,
    operations: &[Value],
    preview: Option<bool>,
) -> Result<TransformReport, SessionError> {
    session.require()?;
    let steps = parse_operations(operations)?;
    let preview = resolve_preview(session, preview);
    pipeline::run(
        session,
        TransformRequest {
            operation: "transform_code".to_string(),
            parameters: json!({ "operations": operations }),
            steps,
            preview,
        },
    )
}

fn retarget(err: SessionError, tool: &str) -> SessionError {
    match err {
        SessionError::InvalidArguments { message, .. } => SessionError::InvalidArguments {
            tool: tool.to_string(),
            message,
        },
        other => other,
    }
}
