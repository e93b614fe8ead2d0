// crates/commit-gate-providers/tests/proptest_references.rs
// ============================================================================
// Module: Reference Rules Property-Based Tests
// Description: Property tests for commit message reference extraction.
// Purpose: Detect panics and keyword matching breaks across generated messages.
// ============================================================================

//! Property-based tests for reference rule invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use commit_gate_providers::ReferenceRules;
use proptest::prelude::*;

fn mandatory(keywords: Vec<String>) -> ReferenceRules {
    ReferenceRules {
        mandatory_reference: true,
        allow_empty_message: false,
        keywords,
    }
}

proptest! {
    #[test]
    fn arbitrary_messages_never_panic(message in any::<String>()) {
        let rules = mandatory(vec!["story".to_string()]);
        let _ = rules.references(&message);
        let _ = rules.check(&message);
        let _ = ReferenceRules::default().references(&message);
        prop_assert!(ReferenceRules::default().check(&message).is_ok());
    }

    #[test]
    fn embedded_reference_is_found_case_insensitively(
        prefix in "[a-z ]{0,10}",
        keyword in "[a-z][a-z0-9]{0,6}",
        value in "[0-9]{1,5}",
        suffix in "[a-z ]{0,10}",
    ) {
        let message = format!("{prefix} {keyword} #{value} {suffix}");
        let rules = mandatory(vec![keyword.to_uppercase()]);
        prop_assert_eq!(rules.references(&message), vec![keyword.as_str()]);
        prop_assert!(rules.check(&message).is_ok());
    }

    #[test]
    fn messages_without_hash_never_reference(message in "[^#]{1,64}") {
        let rules = mandatory(Vec::new());
        prop_assert!(rules.references(&message).is_empty());
        prop_assert!(rules.check(&message).is_err());
    }
}
