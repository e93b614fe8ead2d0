// crates/commit-gate-providers/src/lib.rs
// ============================================================================
// Module: Commit Gate Providers
// Description: Concrete collaborators for the commit gate core.
// Purpose: Back the gate interfaces with svnlook, static config, and reference rules.
// Dependencies: commit-gate-core, regex, serde
// ============================================================================

//! ## Overview
//! This crate ships the production implementations of the commit gate
//! collaborator traits:
//!
//! - [`Svnlook`] inspects in-flight transactions by running `svnlook`.
//! - [`StaticRepositoryRegistry`] resolves repositories and serves their
//!   immutable tag configuration from loaded settings.
//! - [`ReferenceValidator`] enforces per-repository commit message rules.
//!
//! Invariants:
//! - Process output is size bounded and must be UTF-8.
//! - Content streams release their `svnlook` process when dropped.
//!
//! Security posture: transaction contents and process output are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod references;
pub mod registry;
pub mod svnlook;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use references::ReferenceRules;
pub use references::ReferenceValidator;
pub use registry::RepositoryEntry;
pub use registry::StaticRepositoryRegistry;
pub use svnlook::Svnlook;
pub use svnlook::SvnlookConfig;
pub use svnlook::SvnlookContent;
