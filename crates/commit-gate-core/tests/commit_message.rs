// crates/commit-gate-core/tests/commit_message.rs
// ============================================================================
// Module: Commit Message Check Tests
// Description: Validator delegation through the commit gate.
// ============================================================================
//! ## Overview
//! Validates that the gate hands the cached message to the validator and
//! surfaces its message verbatim.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::atomic::Ordering;

use commit_gate_core::CommitMessageValidator;
use commit_gate_core::DiagnosticLevel;
use commit_gate_core::GateError;
use commit_gate_core::ReferenceError;
use commit_gate_core::Repository;

use crate::common::FakeIntrospector;
use crate::common::FakeTagStore;
use crate::common::RequiresSubstring;
use crate::common::open_gate;

/// Validator accepting every message.
struct AcceptAll;

impl CommitMessageValidator for AcceptAll {
    fn validate(&self, _repository: &Repository, _message: &str) -> Result<(), ReferenceError> {
        Ok(())
    }
}

#[test]
fn valid_message_passes() {
    let (gate, _) =
        open_gate(FakeIntrospector::with_lines(&["A   trunk/a"]), FakeTagStore::default()).unwrap();
    gate.assert_commit_message_is_valid(&RequiresSubstring("#1")).unwrap();
    gate.assert_commit_message_is_valid(&AcceptAll).unwrap();
}

#[test]
fn validator_message_is_surfaced_verbatim() {
    let mut introspector = FakeIntrospector::with_lines(&["A   trunk/a"]);
    introspector.message = "fix typo".to_string();
    let (gate, sink) = open_gate(introspector, FakeTagStore::default()).unwrap();

    let err = gate.assert_commit_message_is_valid(&RequiresSubstring("#")).unwrap_err();

    assert!(matches!(&err, GateError::InvalidReference(_)));
    assert_eq!(err.to_string(), "message must reference #");
    let events = sink.events();
    let rejected = events.iter().find(|event| event.event == "message_rejected").unwrap();
    assert_eq!(rejected.level, DiagnosticLevel::Warn);
}

#[test]
fn message_is_read_once() {
    let introspector = FakeIntrospector::with_lines(&[]);
    let probe = introspector.probe.clone();
    let (gate, _) = open_gate(introspector, FakeTagStore::default()).unwrap();
    for _ in 0..3 {
        gate.assert_commit_message_is_valid(&AcceptAll).unwrap();
    }
    assert_eq!(probe.message_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn validator_can_be_a_trait_object() {
    let validator: Box<dyn CommitMessageValidator> = Box::new(RequiresSubstring("missing"));
    let (gate, _) = open_gate(FakeIntrospector::with_lines(&[]), FakeTagStore::default()).unwrap();
    assert!(gate.assert_commit_message_is_valid(validator.as_ref()).is_err());
}
