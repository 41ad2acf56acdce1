use ast_session::transform;
use ast_session::{ServerConfig, Session};
use proptest::prelude::*;

fn source_for(name: &str) -> String {
    format!("function {name}(x) {{ return x; }}\nconst out = {name}(1);\n")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn preview_never_changes_the_document(name in "v_[a-z]{1,8}", target in "w_[a-z]{1,8}") {
        let source = source_for(&name);
        let mut session = Session::new(&ServerConfig::default());
        session.load(&source, Some(false), Some("javascript")).unwrap();

        let report = transform::rename_identifier(&mut session, &name, &target, Some(true)).unwrap();

        prop_assert!(report.preview);
        prop_assert!(!report.committed);
        prop_assert_eq!(report.result, source_for(&target));
        prop_assert_eq!(session.require().unwrap().source(), source.as_str());
    }

    #[test]
    fn history_grows_by_one_per_invocation(
        steps in prop::collection::vec(("v_[a-z]{1,8}", any::<bool>()), 1..6),
    ) {
        let mut current = "seed".to_string();
        let mut session = Session::new(&ServerConfig::default());
        session.load(&source_for(&current), Some(false), None).unwrap();

        for (i, (next, preview)) in steps.iter().enumerate() {
            transform::rename_identifier(&mut session, &current, next, Some(*preview)).unwrap();
            prop_assert_eq!(session.history_len(), i + 1);
            prop_assert_eq!(session.history()[i].committed, !preview);
            if !preview {
                current = next.clone();
            }
            let expected = source_for(&current);
            prop_assert_eq!(session.require().unwrap().source(), expected.as_str());
        }
    }
}
