use crate::error::{suggest, SessionError};
use crate::sg::{AstGrepError, Rewriter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical tags accepted in a `transform_code` batch.
pub const SUPPORTED_OPERATIONS: &[&str] = &[
    "rename",
    "removeUnusedImports",
    "replace",
    "insertBefore",
    "insertAfter",
];

const TAG_ALIASES: &[(&str, &str)] = &[
    ("remove_unused_imports", "removeUnusedImports"),
    ("insert_before", "insertBefore"),
    ("insert_after", "insertAfter"),
];

/// One step of a rewrite batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformOp {
    #[serde(rename = "rename", rename_all = "camelCase")]
    Rename {
        #[serde(alias = "old_name")]
        old_name: String,
        #[serde(alias = "new_name")]
        new_name: String,
    },

    #[serde(rename = "removeUnusedImports", alias = "remove_unused_imports")]
    RemoveUnusedImports,

    #[serde(rename = "replace", rename_all = "camelCase")]
    Replace {
        /// Node kind to search within; `*` or absent means everywhere
        #[serde(default, alias = "node_type")]
        node_type: Option<String>,
        pattern: String,
        replacement: String,
    },

    #[serde(rename = "insertBefore", alias = "insert_before")]
    InsertBefore {
        pattern: String,
        #[serde(alias = "text")]
        code: String,
    },

    #[serde(rename = "insertAfter", alias = "insert_after")]
    InsertAfter {
        pattern: String,
        #[serde(alias = "text")]
        code: String,
    },
}

impl TransformOp {
    /// Canonical tag of this step.
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Rename { .. } => "rename",
            TransformOp::RemoveUnusedImports => "removeUnusedImports",
            TransformOp::Replace { .. } => "replace",
            TransformOp::InsertBefore { .. } => "insertBefore",
            TransformOp::InsertAfter { .. } => "insertAfter",
        }
    }

    /// Run this step on the rewriter.
    pub fn apply(&self, rewriter: Rewriter) -> Result<Rewriter, AstGrepError> {
        match self {
            TransformOp::Rename { old_name, new_name } => rewriter.rename(old_name, new_name),
            TransformOp::RemoveUnusedImports => rewriter.remove_unused_imports(),
            TransformOp::Replace {
                node_type,
                pattern,
                replacement,
            } => rewriter.replace_in(node_type.as_deref().unwrap_or("*"), pattern, replacement),
            TransformOp::InsertBefore { pattern, code } => rewriter.insert_before(pattern, code),
            TransformOp::InsertAfter { pattern, code } => rewriter.insert_after(pattern, code),
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            TransformOp::Rename { old_name, new_name } => {
                if old_name.trim().is_empty() {
                    return Err("oldName must not be empty".to_string());
                }
                if new_name.trim().is_empty() {
                    return Err("newName must not be empty".to_string());
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Canonical form of a tag, accepting snake_case aliases.
pub fn canonical_tag(tag: &str) -> Option<&'static str> {
    SUPPORTED_OPERATIONS
        .iter()
        .copied()
        .find(|t| *t == tag)
        .or_else(|| {
            TAG_ALIASES
                .iter()
                .find(|(alias, _)| *alias == tag)
                .map(|(_, canonical)| *canonical)
        })
}

/// Validate and decode a batch of raw operations.
///
/// Every tag is checked before any step is decoded, so a bad tag anywhere
/// fails the batch with `UnknownOperation` even if an earlier step has
/// malformed fields.
pub fn parse_operations(raw: &[Value]) -> Result<Vec<TransformOp>, SessionError> {
    const TOOL: &str = "transform_code";

    if raw.is_empty() {
        return Err(SessionError::invalid_arguments(
            TOOL,
            "operations must contain at least one step",
        ));
    }

    for (index, value) in raw.iter().enumerate() {
        let tag = value.get("type").and_then(Value::as_str).ok_or_else(|| {
            SessionError::invalid_arguments(
                TOOL,
                format!("operation {index} is missing a string `type`"),
            )
        })?;
        if canonical_tag(tag).is_none() {
            return Err(SessionError::UnknownOperation {
                index,
                name: tag.to_string(),
                suggestion: suggest(tag, SUPPORTED_OPERATIONS.iter().copied()),
            });
        }
    }

    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let op: TransformOp = serde_json::from_value(value.clone()).map_err(|e| {
                SessionError::invalid_arguments(TOOL, format!("operation {index}: {e}"))
            })?;
            op.check().map_err(|message| {
                SessionError::invalid_arguments(TOOL, format!("operation {index}: {message}"))
            })?;
            Ok(op)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_and_snake_case() {
        let ops = parse_operations(&[
            json!({ "type": "rename", "oldName": "a", "newName": "b" }),
            json!({ "type": "remove_unused_imports" }),
            json!({ "type": "replace", "node_type": "call_expression", "pattern": "f($X)", "replacement": "g($X)" }),
            json!({ "type": "insertAfter", "pattern": "f()", "text": "g();" }),
        ])
        .unwrap();

        assert_eq!(
            ops[0],
            TransformOp::Rename {
                old_name: "a".to_string(),
                new_name: "b".to_string()
            }
        );
        assert_eq!(ops[1], TransformOp::RemoveUnusedImports);
        assert_eq!(ops[2].name(), "replace");
        assert_eq!(
            ops[3],
            TransformOp::InsertAfter {
                pattern: "f()".to_string(),
                code: "g();".to_string()
            }
        );
    }

    #[test]
    fn unknown_tag_wins_over_bad_fields() {
        let err = parse_operations(&[json!({ "type": "rename" }), json!({ "type": "bogus" })])
            .unwrap_err();

        match err {
            SessionError::UnknownOperation { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "bogus");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_suggests_closest() {
        let err = parse_operations(&[json!({ "type": "insertBefor", "pattern": "x", "code": "y" })])
            .unwrap_err();
        assert!(err.to_string().contains("insertBefore"));
    }

    #[test]
    fn missing_fields_are_invalid_arguments() {
        let err = parse_operations(&[json!({ "type": "replace", "pattern": "f()" })]).unwrap_err();
        assert_eq!(err.kind(), "InvalidArguments");

        let err = parse_operations(&[json!({ "type": "rename", "oldName": "", "newName": "b" })])
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArguments");
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(parse_operations(&[]).unwrap_err().kind(), "InvalidArguments");
    }

    #[test]
    fn canonical_tags() {
        assert_eq!(canonical_tag("insert_before"), Some("insertBefore"));
        assert_eq!(canonical_tag("rename"), Some("rename"));
        assert_eq!(canonical_tag("Rename"), None);
    }
}
