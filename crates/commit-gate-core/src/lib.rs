// crates/commit-gate-core/src/lib.rs
// ============================================================================
// Module: Commit Gate Core Library
// Description: Public API surface for the SVN commit gate core.
// Purpose: Expose core types, collaborator interfaces, and gate runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The commit gate core decides, inside an SVN `pre-commit` hook, whether an
//! in-flight transaction may be committed. It validates the commit message,
//! enforces immutable tag policies and rejects content matching known hash
//! collision payloads. All external systems (repository lookup, `svnlook`,
//! configuration stores, reference rules) are reached through the traits in
//! [`interfaces`] so every check can run against fakes.
//!
//! Security posture: transaction contents are untrusted and every check fails
//! closed on missing or unreadable data.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CommitMessageValidator;
pub use interfaces::DiagnosticSink;
pub use interfaces::ImmutableTagStore;
pub use interfaces::IntrospectionError;
pub use interfaces::ReferenceError;
pub use interfaces::RepositoryError;
pub use interfaces::RepositoryResolver;
pub use interfaces::TagStoreError;
pub use interfaces::TransactionIntrospector;
pub use runtime::CollisionDetector;
pub use runtime::CommitGate;
pub use runtime::DiagnosticEvent;
pub use runtime::DiagnosticLevel;
pub use runtime::FileDiagnosticSink;
pub use runtime::GateError;
pub use runtime::HookInvocation;
pub use runtime::LevelFilterSink;
pub use runtime::MemoryDiagnosticSink;
pub use runtime::NoopDiagnosticSink;
pub use runtime::PatternError;
pub use runtime::StderrDiagnosticSink;
pub use runtime::TagDecision;
pub use runtime::TagPolicy;
pub use runtime::TransactionContext;
