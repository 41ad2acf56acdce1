use ast_session::analysis::{self, ClassFilter, FunctionFilter, ImportFilter};
use ast_session::sg::lang::IDENTIFIER_KINDS;
use ast_session::transform::{self, InsertPosition};
use ast_session::ts::syntax::{leaves_of_kind, node_text};
use ast_session::{ServerConfig, Session, SessionError, StructuralTree, SupportLang};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const HELLO: &str = "function hello() { console.log('world'); }";

fn session() -> Session {
    Session::new(&ServerConfig::default())
}

#[test]
fn preview_rename_keeps_cached_functions() {
    let mut session = session();
    session.load(HELLO, None, None).unwrap();

    let functions = analysis::get_functions(&mut session, FunctionFilter::default()).unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name.as_deref(), Some("hello"));
    assert!(!functions[0].is_async);

    let report = transform::rename_identifier(&mut session, "hello", "greet", Some(true)).unwrap();
    assert!(report.result.contains("function greet()"));
    assert!(report.result.contains("'world'"));

    let functions = analysis::get_functions(&mut session, FunctionFilter::default()).unwrap();
    assert_eq!(functions[0].name.as_deref(), Some("hello"));
}

#[test]
fn missing_file_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.js");

    let mut session = session();
    let err = session
        .load(missing.to_str().unwrap(), None, None)
        .unwrap_err();

    assert!(matches!(err, SessionError::NotFound { .. }));
    assert!(session.current().is_none());
}

#[test]
fn bogus_operation_fails_whole_batch() {
    let mut session = session();
    session.load(HELLO, None, None).unwrap();

    let ops = vec![
        json!({ "type": "rename", "oldName": "hello", "newName": "greet" }),
        json!({ "type": "bogus" }),
    ];
    let err = transform::apply_operations(&mut session, &ops, Some(false)).unwrap_err();

    assert!(matches!(err, SessionError::UnknownOperation { index: 1, .. }));
    assert_eq!(session.require().unwrap().source(), HELLO);
    assert!(session.history().is_empty());
}

#[test]
fn committed_rename_removes_every_identifier_occurrence() {
    let source = "const a = 1;\nfunction f(x) { return a + x; }\nconst o = { a };\nf(a);\n";
    let mut session = session();
    session.load(source, None, None).unwrap();
    analysis::get_functions(&mut session, FunctionFilter::default()).unwrap();

    transform::rename_identifier(&mut session, "a", "b", Some(false)).unwrap();
    let committed = session.require().unwrap().source().to_string();

    let mut reloaded = Session::new(&ServerConfig::default());
    reloaded.load(&committed, Some(false), None).unwrap();
    let tree = StructuralTree::parse(&committed, SupportLang::JavaScript).unwrap();
    let remaining = leaves_of_kind(tree.root(), IDENTIFIER_KINDS)
        .into_iter()
        .filter(|n| node_text(*n, tree.source()) == "a")
        .count();

    assert_eq!(remaining, 0);
    assert!(!reloaded.require().unwrap().summary().has_errors);
}

#[test]
fn failed_step_commits_nothing() {
    let source = "import { unused } from 'x';\nrun();\n";
    let mut session = session();
    session.load(source, None, None).unwrap();

    let ops = vec![
        json!({ "type": "removeUnusedImports" }),
        json!({ "type": "replace", "pattern": "missing($X)", "replacement": "y($X)" }),
    ];
    let err = transform::apply_operations(&mut session, &ops, Some(false)).unwrap_err();

    assert_eq!(err.kind(), "PatternError");
    assert!(err.to_string().contains("missing($X)"));
    assert_eq!(session.require().unwrap().source(), source);
}

#[test]
fn load_resets_facets_until_queried() {
    let mut session = session();
    session
        .load("import a from 'a';\nfunction f() {}\n", None, None)
        .unwrap();
    analysis::get_functions(&mut session, FunctionFilter::default()).unwrap();
    analysis::get_imports(&mut session, ImportFilter::default()).unwrap();
    assert!(!session.snapshot().is_empty());

    session.load("def g():\n    pass\n", None, Some("python")).unwrap();
    let snapshot = session.snapshot();
    assert!(snapshot.functions.is_empty());
    assert!(snapshot.classes.is_empty());
    assert!(snapshot.imports.is_empty());
}

#[test]
fn commits_never_write_back_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.ts");
    let original = "import { x } from './x';\nexport const y = 1;\n";
    fs::write(&path, original).unwrap();

    let mut session = session();
    let summary = session.load(path.to_str().unwrap(), None, None).unwrap();
    assert_eq!(summary.language, "typescript");

    let report = transform::remove_unused_imports(&mut session, Some(false)).unwrap();
    assert!(report.committed);
    assert_eq!(session.require().unwrap().source(), "export const y = 1;\n");
    assert_eq!(
        session.require().unwrap().origin(),
        Some(path.as_path())
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn insert_after_every_match_in_python() {
    let source = "def f():\n    step()\n    step()\n";
    let mut session = session();
    session.load(source, Some(false), Some("python")).unwrap();

    let report = transform::insert_code(
        &mut session,
        "step()",
        "log()",
        InsertPosition::After,
        Some(true),
    )
    .unwrap();

    assert_eq!(
        report.result,
        "def f():\n    step()\n    log()\n    step()\n    log()\n"
    );
}

#[test]
fn history_records_preview_and_commit() {
    let mut session = session();
    session.load("let n = 0;\n", None, None).unwrap();

    transform::rename_identifier(&mut session, "n", "m", Some(true)).unwrap();
    transform::rename_identifier(&mut session, "n", "k", Some(false)).unwrap();

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].operation, "rename_identifier");
    assert!(!history[0].committed);
    assert!(history[1].committed);
    assert_eq!(history[1].parameters["newName"], json!("k"));
    assert_eq!(history[1].result_preview, "let k = 0;\n");
}

#[test]
fn facets_count_declarations_not_keywords() {
    let mut session = session();
    session
        .load("class A { m() {} }\nfunction hello() {}\n", None, None)
        .unwrap();

    let classes = analysis::get_classes(&mut session, ClassFilter::default()).unwrap();
    let functions = analysis::get_functions(
        &mut session,
        FunctionFilter {
            include_anonymous: true,
            async_only: false,
        },
    )
    .unwrap();

    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].kind, "class_declaration");
    let names: Vec<_> = functions.iter().map(|f| f.name.as_deref()).collect();
    assert_eq!(names, vec![Some("m"), Some("hello")]);
    assert_eq!(session.snapshot().classes.len(), 1);
    assert_eq!(session.snapshot().functions.len(), 2);

    session
        .load("square = lambda x: x * x\n", Some(false), Some("python"))
        .unwrap();
    let functions = analysis::get_functions(
        &mut session,
        FunctionFilter {
            include_anonymous: true,
            async_only: false,
        },
    )
    .unwrap();
    let classes = analysis::get_classes(&mut session, ClassFilter::default()).unwrap();

    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].name.as_deref(), Some("square"));
    assert!(classes.is_empty());
    assert_eq!(session.snapshot().functions.len(), 1);
    assert!(session.snapshot().classes.is_empty());
}
