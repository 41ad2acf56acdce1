//! Analysis cache: per-facet queries over the active document.
//!
//! Each facet query recomputes from the current tree and overwrites its own
//! field of the session's [`AnalysisSnapshot`](crate::session::AnalysisSnapshot).
//! Scope analysis is computed on demand and never cached.

pub mod facets;
pub mod model;
pub mod scopes;

pub use facets::{ClassFilter, FunctionFilter, ImportFilter};
pub use model::{
    ClassInfo, Declaration, FunctionInfo, ImportInfo, ImportedNameInfo, MethodInfo, PropertyInfo,
    ScopeInfo, ScopeReport,
};

use crate::error::SessionError;
use crate::session::Session;
use tracing::debug;

pub fn get_functions(
    session: &mut Session,
    filter: FunctionFilter,
) -> Result<Vec<FunctionInfo>, SessionError> {
    let found = facets::functions(session.require()?.tree(), filter);
    debug!(count = found.len(), "functions extracted");
    session.store_functions(found.clone());
    Ok(found)
}

pub fn get_classes(
    session: &mut Session,
    filter: ClassFilter,
) -> Result<Vec<ClassInfo>, SessionError> {
    let found = facets::classes(session.require()?.tree(), filter);
    debug!(count = found.len(), "classes extracted");
    session.store_classes(found.clone());
    Ok(found)
}

pub fn get_imports(
    session: &mut Session,
    filter: ImportFilter,
) -> Result<Vec<ImportInfo>, SessionError> {
    let found = facets::imports(session.require()?.tree(), filter);
    debug!(count = found.len(), "imports extracted");
    session.store_imports(found.clone());
    Ok(found)
}

pub fn analyze_scopes(
    session: &Session,
    include_builtins: bool,
) -> Result<ScopeReport, SessionError> {
    Ok(scopes::analyze(session.require()?.tree(), include_builtins))
}
