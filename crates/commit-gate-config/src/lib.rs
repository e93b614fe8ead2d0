// crates/commit-gate-config/src/lib.rs
// ============================================================================
// Module: Commit Gate Config Library
// Description: Canonical config model, validation, and collaborator assembly.
// Purpose: Single source of truth for svn-commit-gate.toml semantics.
// Dependencies: commit-gate-core, commit-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! `commit-gate-config` defines the configuration model of the SVN commit
//! gate. It loads `svn-commit-gate.toml` with strict, fail-closed validation
//! and turns the validated model into the collaborators the gate runs with.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assembly;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
