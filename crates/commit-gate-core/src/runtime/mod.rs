// crates/commit-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Commit Gate Runtime
// Description: Pattern engine, collision detector, context loader, and gate.
// Purpose: Execute pre-commit checks against injected collaborators.
// Dependencies: crate::{core, interfaces}, regex
// ============================================================================

//! ## Overview
//! Runtime modules are layered leaves-first: path patterns feed the tag
//! policy, the collision detector streams content digests, the context loader
//! gathers transaction metadata, and the gate orchestrates the checks.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod collision;
pub mod context;
pub mod diagnostics;
pub mod gate;
pub mod pattern;
pub mod tags;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use collision::CollisionDetector;
pub use context::HookInvocation;
pub use context::TransactionContext;
pub use diagnostics::DiagnosticEvent;
pub use diagnostics::DiagnosticEventParams;
pub use diagnostics::DiagnosticLevel;
pub use diagnostics::FileDiagnosticSink;
pub use diagnostics::LevelFilterSink;
pub use diagnostics::MemoryDiagnosticSink;
pub use diagnostics::NoopDiagnosticSink;
pub use diagnostics::StderrDiagnosticSink;
pub use gate::CommitGate;
pub use gate::GateError;
pub use pattern::GlobPattern;
pub use pattern::ImmutablePattern;
pub use pattern::PatternError;
pub use pattern::WhitelistPattern;
pub use pattern::glob_to_regex;
pub use tags::TagDecision;
pub use tags::TagPolicy;
