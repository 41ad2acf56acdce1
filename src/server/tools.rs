//! Tool names, argument shapes and their JSON schemas.

use crate::error::{suggest, SessionError};
use crate::transform::InsertPosition;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    ParseCode,
    FindPattern,
    FindAllPattern,
    GetFunctions,
    GetClasses,
    GetImports,
    RenameIdentifier,
    RemoveUnusedImports,
    TransformCode,
    InsertCode,
    GetNodeAtPosition,
    AnalyzeScopes,
}

impl Tool {
    pub const ALL: &'static [Tool] = &[
        Tool::ParseCode,
        Tool::FindPattern,
        Tool::FindAllPattern,
        Tool::GetFunctions,
        Tool::GetClasses,
        Tool::GetImports,
        Tool::RenameIdentifier,
        Tool::RemoveUnusedImports,
        Tool::TransformCode,
        Tool::InsertCode,
        Tool::GetNodeAtPosition,
        Tool::AnalyzeScopes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::ParseCode => "parse_code",
            Tool::FindPattern => "find_pattern",
            Tool::FindAllPattern => "find_all_pattern",
            Tool::GetFunctions => "get_functions",
            Tool::GetClasses => "get_classes",
            Tool::GetImports => "get_imports",
            Tool::RenameIdentifier => "rename_identifier",
            Tool::RemoveUnusedImports => "remove_unused_imports",
            Tool::TransformCode => "transform_code",
            Tool::InsertCode => "insert_code",
            Tool::GetNodeAtPosition => "get_node_at_position",
            Tool::AnalyzeScopes => "analyze_scopes",
        }
    }

    /// Look up a tool by name, suggesting the closest one on a miss.
    pub fn from_name(name: &str) -> Result<Tool, SessionError> {
        Tool::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| SessionError::UnknownTool {
                name: name.to_string(),
                suggestion: suggest(name, Tool::ALL.iter().map(|t| t.name())),
            })
    }
}

/// Decode tool arguments; a missing or `null` argument object counts as `{}`.
pub fn parse_args<T: DeserializeOwned>(tool: Tool, args: &Value) -> Result<T, SessionError> {
    let args = if args.is_null() { json!({}) } else { args.clone() };
    serde_json::from_value(args)
        .map_err(|e| SessionError::invalid_arguments(tool.name(), e.to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseCodeArgs {
    pub source: String,
    pub is_file_path: Option<bool>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindPatternArgs {
    pub pattern: String,
}

#[derive(Debug, Deserialize)]
pub struct FindAllPatternArgs {
    pub pattern: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFunctionsArgs {
    pub include_anonymous: Option<bool>,
    pub async_only: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetClassesArgs {
    pub include_properties: Option<bool>,
    pub include_methods: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetImportsArgs {
    pub include_type_imports: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameArgs {
    pub old_name: String,
    pub new_name: String,
    pub preview: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewArgs {
    pub preview: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TransformCodeArgs {
    pub operations: Vec<Value>,
    pub preview: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct InsertCodeArgs {
    pub pattern: String,
    pub code: String,
    pub position: InsertPosition,
    pub preview: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct NodeAtArgs {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeScopesArgs {
    pub include_builtins: Option<bool>,
}

/// `tools/list` payload.
pub fn tool_definitions() -> Value {
    let preview = json!({
        "type": "boolean",
        "description": "Return the rewritten text without changing the document. Default comes from server config (false)."
    });

    json!([
        {
            "name": "parse_code",
            "description": "Load source code (inline text or a file path) as the active document. Replaces any previous document and clears cached analysis.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "source": { "type": "string", "description": "Source text or path to a file" },
                    "isFilePath": { "type": "boolean", "description": "Force path (true) or inline (false) interpretation. Default: guessed from the input" },
                    "language": { "type": "string", "description": "Language name, e.g. javascript, typescript, tsx, python, rust. Default: from extension, else javascript" }
                },
                "required": ["source"]
            }
        },
        {
            "name": "find_pattern",
            "description": "Find the first node matching an ast-grep pattern ($NAME, $$$ARGS, $_).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pattern": { "type": "string", "description": "ast-grep pattern, e.g. console.log($MSG)" }
                },
                "required": ["pattern"]
            }
        },
        {
            "name": "find_all_pattern",
            "description": "Find every node matching an ast-grep pattern, in document order.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pattern": { "type": "string" },
                    "limit": { "type": "integer", "minimum": 1, "description": "Maximum matches to return. Default: 100" }
                },
                "required": ["pattern"]
            }
        },
        {
            "name": "get_functions",
            "description": "List functions in the active document.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "includeAnonymous": { "type": "boolean", "description": "Default: false" },
                    "asyncOnly": { "type": "boolean", "description": "Default: false" }
                }
            }
        },
        {
            "name": "get_classes",
            "description": "List classes (structs, enums and traits for Rust) in the active document.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "includeProperties": { "type": "boolean", "description": "Default: false" },
                    "includeMethods": { "type": "boolean", "description": "Default: true" }
                }
            }
        },
        {
            "name": "get_imports",
            "description": "List import statements in the active document.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "includeTypeImports": { "type": "boolean", "description": "Default: true" }
                }
            }
        },
        {
            "name": "rename_identifier",
            "description": "Rename every identifier spelled oldName. Strings and comments are untouched.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "oldName": { "type": "string" },
                    "newName": { "type": "string" },
                    "preview": preview
                },
                "required": ["oldName", "newName"]
            }
        },
        {
            "name": "remove_unused_imports",
            "description": "Remove imported bindings that are never referenced.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "preview": preview
                }
            }
        },
        {
            "name": "transform_code",
            "description": "Apply an ordered batch of rewrites atomically. Step types: rename {oldName,newName}, removeUnusedImports, replace {nodeType?,pattern,replacement}, insertBefore {pattern,code}, insertAfter {pattern,code}.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "operations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["rename", "removeUnusedImports", "replace", "insertBefore", "insertAfter"]
                                }
                            },
                            "required": ["type"]
                        }
                    },
                    "preview": preview
                },
                "required": ["operations"]
            }
        },
        {
            "name": "insert_code",
            "description": "Insert code on its own line before or after every node matching a pattern.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "pattern": { "type": "string" },
                    "code": { "type": "string" },
                    "position": { "type": "string", "enum": ["before", "after"] },
                    "preview": preview
                },
                "required": ["pattern", "code", "position"]
            }
        },
        {
            "name": "get_node_at_position",
            "description": "Describe the smallest named node at a position.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "line": { "type": "integer", "minimum": 1, "description": "1-based line" },
                    "column": { "type": "integer", "minimum": 0, "description": "0-based column" }
                },
                "required": ["line", "column"]
            }
        },
        {
            "name": "analyze_scopes",
            "description": "Syntactic scope tree with the declarations in each scope.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "includeBuiltins": { "type": "boolean", "description": "Default: false" }
                }
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tool_has_a_definition() {
        let defs = tool_definitions();
        let names: Vec<_> = defs
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect();

        for tool in Tool::ALL {
            assert!(names.contains(&tool.name().to_string()), "{}", tool.name());
        }
        assert_eq!(names.len(), Tool::ALL.len());
    }

    #[test]
    fn unknown_tool_suggests() {
        let err = Tool::from_name("get_function").unwrap_err();
        assert_eq!(err.kind(), "UnknownTool");
        assert!(err.to_string().contains("get_functions"));
    }

    #[test]
    fn null_arguments_read_as_empty() {
        let args: GetFunctionsArgs = parse_args(Tool::GetFunctions, &Value::Null).unwrap();
        assert_eq!(args.include_anonymous, None);

        let err = parse_args::<RenameArgs>(Tool::RenameIdentifier, &json!({ "oldName": 3 }))
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArguments");
    }
}
