//! Newline-delimited JSON-RPC 2.0 over stdio, MCP dialect.

use crate::server::resources::resource_definitions;
use crate::server::{tool_definitions, Dispatcher};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

pub const PROTOCOL_VERSION: &str = "2025-06-18";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

const INSTRUCTIONS: &str = "Structural code session. Start with parse_code to load a document, \
query it with find_pattern / get_functions / get_classes / get_imports, and rewrite it with \
rename_identifier, remove_unused_imports, insert_code or transform_code. Rewrites accept \
preview=true to see the result without changing the document.";

/// Serve requests from `reader` until EOF, writing one response per line.
pub fn serve<R: BufRead, W: Write>(dispatcher: &Dispatcher, reader: R, mut writer: W) -> io::Result<()> {
    info!("stdio server ready");

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(message) => handle_message(dispatcher, &message),
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Some(error_response(Value::Null, PARSE_ERROR, "Parse error"))
            }
        };

        if let Some(response) = response {
            writeln!(writer, "{response}")?;
            writer.flush()?;
        }
    }

    info!("input closed, shutting down");
    Ok(())
}

/// Handle one decoded message. Notifications produce no response.
pub fn handle_message(dispatcher: &Dispatcher, message: &Value) -> Option<Value> {
    let method = message.get("method").and_then(Value::as_str).unwrap_or("");
    let id = message.get("id").cloned();

    if method.starts_with("notifications/") || id.is_none() {
        debug!(method, "notification ignored");
        return None;
    }
    let id = id.unwrap_or(Value::Null);
    let params = message.get("params").cloned().unwrap_or(Value::Null);
    debug!(method, "request");

    let result = match method {
        "initialize" => json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {}, "resources": {} },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "instructions": INSTRUCTIONS,
        }),
        "ping" => json!({}),
        "tools/list" => json!({ "tools": tool_definitions() }),
        "tools/call" => {
            let name = params.get("name").and_then(Value::as_str).unwrap_or("");
            let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
            dispatcher.call(name, &arguments).to_mcp_result()
        }
        "resources/list" => json!({ "resources": resource_definitions() }),
        "resources/read" => {
            let uri = params.get("uri").and_then(Value::as_str).unwrap_or("");
            match dispatcher.read_resource(uri) {
                Some(value) => json!({
                    "contents": [{
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": value.to_string(),
                    }]
                }),
                None => {
                    return Some(error_response(
                        id,
                        INVALID_PARAMS,
                        &format!("Unknown resource: {uri}"),
                    ))
                }
            }
        }
        _ => return Some(error_response(id, METHOD_NOT_FOUND, "Method not found")),
    };

    Some(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn run(input: &str) -> Vec<Value> {
        let dispatcher = Dispatcher::new(ServerConfig::default());
        let mut out = Vec::new();
        serve(&dispatcher, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn initialize_and_notifications() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        ));

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(responses[1]["id"], json!(2));
    }

    #[test]
    fn parse_errors_and_unknown_methods() {
        let responses = run("not json\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"nope\"}\n");

        assert_eq!(responses[0]["error"]["code"], json!(PARSE_ERROR));
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(responses[1]["id"], json!(7));
    }

    #[test]
    fn tool_call_round_trip() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"parse_code","arguments":{"source":"function hello() {}\n"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_functions","arguments":{}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"resources/read","params":{"uri":"session://analysis"}}"#,
            "\n",
        ));

        assert_eq!(responses[0]["result"]["isError"], json!(false));
        let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
        let envelope: Value = serde_json::from_str(text).unwrap();
        assert_eq!(envelope["data"]["functions"][0]["name"], json!("hello"));

        let contents = responses[2]["result"]["contents"][0]["text"].as_str().unwrap();
        let snapshot: Value = serde_json::from_str(contents).unwrap();
        assert_eq!(snapshot["functions"][0]["name"], json!("hello"));
    }

    #[test]
    fn tools_and_resources_are_listed() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"resources/read","params":{"uri":"session://x"}}"#,
            "\n",
        ));

        assert_eq!(responses[0]["result"]["tools"].as_array().unwrap().len(), 12);
        assert_eq!(responses[1]["result"]["resources"].as_array().unwrap().len(), 3);
        assert_eq!(responses[2]["error"]["code"], json!(INVALID_PARAMS));
    }
}
