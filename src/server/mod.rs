//! Request dispatch: tool names to session operations, shaped into
//! [`ToolResponse`] envelopes.

pub mod resources;
pub mod response;
pub mod rpc;
pub mod tools;

pub use response::ToolResponse;
pub use tools::{tool_definitions, Tool};

use crate::analysis::{self, ClassFilter, FunctionFilter, ImportFilter};
use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::session::Session;
use crate::transform::{self, TransformReport};
use crate::ts::NodeInfo;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tools::*;
use tracing::{debug, warn};

/// Owns the session and serializes access to it.
///
/// The lock is held for the whole of each call, so a rewrite's derive and
/// commit never interleave with another request.
pub struct Dispatcher {
    session: Mutex<Session>,
    config: ServerConfig,
}

impl Dispatcher {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            session: Mutex::new(Session::new(&config)),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run a tool by name. Failures come back as error envelopes.
    pub fn call(&self, name: &str, args: &Value) -> ToolResponse {
        let mut session = self.session.lock();
        let result = Tool::from_name(name).and_then(|tool| self.handle(&mut session, tool, args));

        match &result {
            Ok(response) => debug!(tool = name, summary = %response.summary, "tool call succeeded"),
            Err(e) => warn!(tool = name, kind = e.kind(), error = %e, "tool call failed"),
        }
        result.into()
    }

    /// Contents of a read-only resource.
    pub fn read_resource(&self, uri: &str) -> Option<Value> {
        resources::read(&self.session.lock(), uri)
    }

    /// Run `f` with the session locked. Intended for embedding and tests.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.session.lock())
    }

    fn handle(
        &self,
        session: &mut Session,
        tool: Tool,
        args: &Value,
    ) -> Result<ToolResponse, SessionError> {
        let max_chars = self.config.query.node_text_max_chars;

        match tool {
            Tool::ParseCode => {
                let args: ParseCodeArgs = parse_args(tool, args)?;
                let summary =
                    session.load(&args.source, args.is_file_path, args.language.as_deref())?;
                let mut text = format!(
                    "Loaded {} document: {} lines, root {}",
                    summary.language, summary.lines, summary.root_type
                );
                if summary.has_errors {
                    text.push_str(&format!(" ({} syntax errors)", summary.error_count));
                }
                Ok(ToolResponse::ok(text, json!(summary)))
            }

            Tool::FindPattern => {
                let args: FindPatternArgs = parse_args(tool, args)?;
                let tree = session.require()?.tree();
                let found = tree.find(&args.pattern)?;
                let summary = match &found {
                    Some(m) => format!("Found {} at byte {}", m.kind, m.byte_start),
                    None => format!("No match for `{}`", args.pattern),
                };
                let node: Option<NodeInfo> = found.map(|m| tree.match_info(&m, max_chars));
                Ok(ToolResponse::ok(summary, json!({ "match": node })))
            }

            Tool::FindAllPattern => {
                let args: FindAllPatternArgs = parse_args(tool, args)?;
                if args.limit == Some(0) {
                    return Err(SessionError::invalid_arguments(
                        tool.name(),
                        "limit must be at least 1",
                    ));
                }
                let limit = args.limit.unwrap_or(self.config.query.find_all_limit);
                let tree = session.require()?.tree();
                let found = tree.find_all(&args.pattern)?;
                let total = found.len();
                let matches: Vec<NodeInfo> = found
                    .iter()
                    .take(limit)
                    .map(|m| tree.match_info(m, max_chars))
                    .collect();
                let truncated = total > matches.len();
                Ok(ToolResponse::ok(
                    format!("{total} matches for `{}`", args.pattern),
                    json!({ "matches": matches, "total": total, "truncated": truncated }),
                ))
            }

            Tool::GetFunctions => {
                let args: GetFunctionsArgs = parse_args(tool, args)?;
                let filter = FunctionFilter {
                    include_anonymous: args.include_anonymous.unwrap_or(false),
                    async_only: args.async_only.unwrap_or(false),
                };
                let functions = analysis::get_functions(session, filter)?;
                Ok(ToolResponse::ok(
                    format!("{} functions", functions.len()),
                    json!({ "functions": functions }),
                ))
            }

            Tool::GetClasses => {
                let args: GetClassesArgs = parse_args(tool, args)?;
                let filter = ClassFilter {
                    include_methods: args.include_methods.unwrap_or(true),
                    include_properties: args.include_properties.unwrap_or(false),
                };
                let classes = analysis::get_classes(session, filter)?;
                Ok(ToolResponse::ok(
                    format!("{} classes", classes.len()),
                    json!({ "classes": classes }),
                ))
            }

            Tool::GetImports => {
                let args: GetImportsArgs = parse_args(tool, args)?;
                let filter = ImportFilter {
                    include_type_imports: args.include_type_imports.unwrap_or(true),
                };
                let imports = analysis::get_imports(session, filter)?;
                Ok(ToolResponse::ok(
                    format!("{} imports", imports.len()),
                    json!({ "imports": imports }),
                ))
            }

            Tool::RenameIdentifier => {
                let args: RenameArgs = parse_args(tool, args)?;
                let report =
                    transform::rename_identifier(session, &args.old_name, &args.new_name, args.preview)?;
                Ok(rewrite_response(
                    &format!("rename {} -> {}", args.old_name, args.new_name),
                    report,
                ))
            }

            Tool::RemoveUnusedImports => {
                let args: PreviewArgs = parse_args(tool, args)?;
                let report = transform::remove_unused_imports(session, args.preview)?;
                Ok(rewrite_response("remove unused imports", report))
            }

            Tool::TransformCode => {
                let args: TransformCodeArgs = parse_args(tool, args)?;
                let report = transform::apply_operations(session, &args.operations, args.preview)?;
                let label = format!("{} operations", report.steps);
                Ok(rewrite_response(&label, report))
            }

            Tool::InsertCode => {
                let args: InsertCodeArgs = parse_args(tool, args)?;
                let report = transform::insert_code(
                    session,
                    &args.pattern,
                    &args.code,
                    args.position,
                    args.preview,
                )?;
                Ok(rewrite_response("insert code", report))
            }

            Tool::GetNodeAtPosition => {
                let args: NodeAtArgs = parse_args(tool, args)?;
                let tree = session.require()?.tree();
                let node = tree.node_at(args.line, args.column)?;
                let parent = node.and_then(|n| n.parent()).map(|p| p.kind().to_string());
                let summary = match node {
                    Some(n) => format!("{} at {}:{}", n.kind(), args.line, args.column),
                    None => format!("No node at {}:{}", args.line, args.column),
                };
                let info = node.map(|n| tree.node_info(n, max_chars));
                Ok(ToolResponse::ok(summary, json!({ "node": info, "parent": parent })))
            }

            Tool::AnalyzeScopes => {
                let args: AnalyzeScopesArgs = parse_args(tool, args)?;
                let report = analysis::analyze_scopes(session, args.include_builtins.unwrap_or(false))?;
                Ok(ToolResponse::ok(
                    format!("{} scopes", report.scopes.len()),
                    json!(report),
                ))
            }
        }
    }
}

fn rewrite_response(label: &str, report: TransformReport) -> ToolResponse {
    let mode = if report.committed { "Committed" } else { "Preview" };
    let change = if report.changed { "" } else { " (no changes)" };
    ToolResponse::ok(format!("{mode}: {label}{change}"), json!(report))
}
