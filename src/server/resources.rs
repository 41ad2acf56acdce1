use crate::session::Session;
use crate::transform::SUPPORTED_OPERATIONS;
use serde_json::{json, Value};

pub const DOCUMENT_URI: &str = "session://document";
pub const ANALYSIS_URI: &str = "session://analysis";
pub const HISTORY_URI: &str = "session://history";

/// `resources/list` payload.
pub fn resource_definitions() -> Value {
    json!([
        {
            "uri": DOCUMENT_URI,
            "name": "Current document",
            "description": "Summary of the active document, or null",
            "mimeType": "application/json"
        },
        {
            "uri": ANALYSIS_URI,
            "name": "Analysis snapshot",
            "description": "Latest functions, classes and imports results",
            "mimeType": "application/json"
        },
        {
            "uri": HISTORY_URI,
            "name": "Transform history",
            "description": "Rewrite records and the supported batch operation types",
            "mimeType": "application/json"
        }
    ])
}

/// Contents of a resource, or `None` for an unknown URI.
pub fn read(session: &Session, uri: &str) -> Option<Value> {
    let value = match uri {
        DOCUMENT_URI => match session.current() {
            Some(document) => json!(document.summary()),
            None => Value::Null,
        },
        ANALYSIS_URI => json!(session.snapshot()),
        HISTORY_URI => json!({
            "records": session.history(),
            "supportedOperations": SUPPORTED_OPERATIONS,
        }),
        _ => return None,
    };
    Some(value)
}
