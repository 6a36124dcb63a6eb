//! Properties of the refactor-safety verifier.

use indoc::formatdoc;
use proptest::prelude::*;
use smellmap::verifier::{verify_refactoring, FindingKind};

/// No Java keyword, contextual or reserved, starts with `q`.
fn identifier() -> impl Strategy<Value = String> {
    "q[a-z0-9]{0,8}"
}

fn class_with(method: &str, param: &str) -> String {
    formatdoc! {"
        public class Subject {{
            public int {method}(int {param}) {{
                return {param} + 1;
            }}

            public void reset() {{
            }}
        }}
    "}
}

proptest! {
    #[test]
    fn prop_unchanged_class_is_clean(method in identifier(), param in identifier()) {
        let source = class_with(&method, &param);
        let report = verify_refactoring(&source, &source);
        prop_assert!(report.is_clean());
        prop_assert!(report.diff.is_empty());
    }

    #[test]
    fn prop_parameter_rename_only_reports_parameters(
        method in identifier(),
        before in identifier(),
        after in identifier(),
    ) {
        prop_assume!(before != after);
        let report = verify_refactoring(&class_with(&method, &before), &class_with(&method, &after));
        let kinds: Vec<FindingKind> = report.findings.iter().map(|f| f.kind).collect();
        prop_assert_eq!(kinds, vec![FindingKind::ParametersChanged]);
        prop_assert!(!report.blocks_apply());
    }

    #[test]
    fn prop_method_rename_blocks_apply(
        before in identifier(),
        after in identifier(),
        param in identifier(),
    ) {
        prop_assume!(before != after);
        let report = verify_refactoring(&class_with(&before, &param), &class_with(&after, &param));
        prop_assert!(report.blocks_apply());
        prop_assert_eq!(report.of_kind(FindingKind::RemovedMethod).count(), 1);
        prop_assert_eq!(report.of_kind(FindingKind::AddedMethod).count(), 1);
    }
}
