use crate::error::SessionError;
use serde::Serialize;
use serde_json::{json, Value};

/// Uniform result envelope for every tool call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolResponse {
    pub summary: String,
    pub data: Value,
    pub is_error: bool,
}

impl ToolResponse {
    pub fn ok(summary: impl Into<String>, data: Value) -> Self {
        Self {
            summary: summary.into(),
            data,
            is_error: false,
        }
    }

    pub fn error(err: &SessionError) -> Self {
        Self {
            summary: err.to_string(),
            data: json!({
                "error": {
                    "kind": err.kind(),
                    "message": err.to_string(),
                }
            }),
            is_error: true,
        }
    }

    /// Kind of the carried error, if any.
    pub fn error_kind(&self) -> Option<&str> {
        self.data.get("error")?.get("kind")?.as_str()
    }

    /// MCP `tools/call` result: the envelope as a single text block.
    pub fn to_mcp_result(&self) -> Value {
        let text = serde_json::to_string_pretty(self).unwrap_or_else(|_| self.summary.clone());
        json!({
            "content": [{ "type": "text", "text": text }],
            "isError": self.is_error,
        })
    }
}

impl From<Result<ToolResponse, SessionError>> for ToolResponse {
    fn from(result: Result<ToolResponse, SessionError>) -> Self {
        match result {
            Ok(response) => response,
            Err(err) => ToolResponse::error(&err),
        }
    }
}
