use ast_session::server::rpc;
use ast_session::{Dispatcher, ServerConfig};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn request(id: u64, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": tool, "arguments": arguments },
    })
    .to_string()
}

/// Feed `lines` through the stdio transport and decode each tool envelope.
fn serve(lines: &[String]) -> Vec<Value> {
    let dispatcher = Dispatcher::new(ServerConfig::default());
    let input = lines.join("\n") + "\n";
    let mut output = Vec::new();
    rpc::serve(&dispatcher, input.as_bytes(), &mut output).unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| {
            let response: Value = serde_json::from_str(line).unwrap();
            let text = response["result"]["content"][0]["text"].as_str().unwrap();
            serde_json::from_str(text).unwrap()
        })
        .collect()
}

#[test]
fn load_query_preview_commit_over_stdio() {
    let envelopes = serve(&[
        request(1, "parse_code", json!({ "source": "function hello() { return 1; }\n" })),
        request(2, "rename_identifier", json!({ "oldName": "hello", "newName": "greet", "preview": true })),
        request(3, "find_pattern", json!({ "pattern": "function greet() { $$$BODY }" })),
        request(4, "rename_identifier", json!({ "oldName": "hello", "newName": "greet" })),
        request(5, "find_pattern", json!({ "pattern": "function greet() { $$$BODY }" })),
    ]);

    assert_eq!(envelopes[0]["data"]["language"], json!("javascript"));
    assert_eq!(envelopes[1]["data"]["preview"], json!(true));
    assert!(envelopes[1]["data"]["diff"].as_str().unwrap().contains("+function greet()"));
    assert_eq!(envelopes[2]["data"]["match"], Value::Null);
    assert_eq!(envelopes[3]["data"]["committed"], json!(true));
    assert_eq!(envelopes[4]["data"]["match"]["captures"]["BODY"], json!("return 1;"));
}

#[test]
fn errors_keep_the_transport_alive() {
    let envelopes = serve(&[
        request(1, "get_functions", json!({})),
        request(2, "transform_code", json!({ "operations": [{ "type": "renam" }] })),
        request(3, "parse_code", json!({ "source": "x = 1\n", "language": "python" })),
        request(4, "transform_code", json!({ "operations": [{ "type": "renam" }] })),
    ]);

    assert_eq!(envelopes[0]["is_error"], json!(true));
    assert_eq!(envelopes[0]["data"]["error"]["kind"], json!("NoDocumentLoaded"));
    assert_eq!(envelopes[1]["data"]["error"]["kind"], json!("NoDocumentLoaded"));
    assert_eq!(envelopes[2]["is_error"], json!(false));
    assert_eq!(envelopes[3]["data"]["error"]["kind"], json!("UnknownOperation"));
    assert!(envelopes[3]["summary"].as_str().unwrap().contains("rename"));
}

#[test]
fn file_documents_and_resources() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shapes.py");
    fs::write(
        &path,
        "import os\n\nclass Shape:\n    def area(self):\n        return 0\n",
    )
    .unwrap();

    let dispatcher = Dispatcher::new(ServerConfig::default());
    let loaded = dispatcher.call("parse_code", &json!({ "source": path.to_str().unwrap() }));
    assert!(!loaded.is_error, "{}", loaded.summary);
    assert_eq!(loaded.data["language"], json!("python"));

    let classes = dispatcher.call("get_classes", &json!({}));
    assert_eq!(classes.data["classes"][0]["name"], json!("Shape"));
    assert_eq!(classes.data["classes"][0]["methods"][0]["name"], json!("area"));

    let removed = dispatcher.call("remove_unused_imports", &json!({}));
    assert_eq!(removed.data["committed"], json!(true));
    assert!(removed.data["result"].as_str().unwrap().starts_with("\nclass Shape:"));

    let analysis = dispatcher.read_resource("session://analysis").unwrap();
    assert_eq!(analysis["classes"][0]["name"], json!("Shape"));

    let history = dispatcher.read_resource("session://history").unwrap();
    assert_eq!(history["records"][0]["operation"], json!("remove_unused_imports"));

    let document = dispatcher.read_resource("session://document").unwrap();
    assert_eq!(document["lines"], json!(4));
    assert!(fs::read_to_string(&path).unwrap().starts_with("import os"));
}
