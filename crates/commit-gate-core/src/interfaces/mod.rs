// crates/commit-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Commit Gate Interfaces
// Description: Collaborator contracts for repository lookup, introspection, and policy.
// Purpose: Define the seams between the gate runtime and external systems.
// Dependencies: crate::core, crate::runtime::diagnostics, thiserror
// ============================================================================

//! ## Overview
//! The gate never talks to Subversion, configuration stores, or reference
//! engines directly. Each external system is reached through one narrow trait
//! so the checks can be exercised with in-memory fakes. Implementations must
//! fail closed: missing data is an error, never an empty answer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::core::ImmutableTagConfiguration;
use crate::core::Repository;
use crate::core::TransactionId;
use crate::runtime::diagnostics::DiagnosticEvent;

// ============================================================================
// SECTION: Repository Resolver
// ============================================================================

/// Repository lookup errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No repository is registered for the path.
    #[error("repository not found: {0}")]
    NotFound(String),
    /// The registry could not be queried.
    #[error("repository lookup failed: {0}")]
    Backend(String),
}

/// Resolves repositories from the filesystem path handed to the hook.
pub trait RepositoryResolver {
    /// Returns the repository stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the path is unknown.
    fn resolve_by_path(&self, path: &Path) -> Result<Repository, RepositoryError>;
}

// ============================================================================
// SECTION: Transaction Introspector
// ============================================================================

/// Transaction introspection errors.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// The introspection tool could not be started.
    #[error("failed to run introspection tool: {0}")]
    Spawn(String),
    /// The introspection tool reported a failure.
    #[error("introspection tool failed: {0}")]
    Failed(String),
    /// The tool output exceeded configured limits or was not valid text.
    #[error("invalid introspection output: {0}")]
    InvalidOutput(String),
}

/// Read-only view of an in-flight transaction (the `svnlook` role).
pub trait TransactionIntrospector {
    /// Returns the raw changed-path lines (`"<status>   <path>"`).
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError`] when the listing cannot be produced.
    fn changed_path_lines(
        &self,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Result<Vec<String>, IntrospectionError>;

    /// Returns the commit message of the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError`] when the message cannot be read.
    fn commit_message(
        &self,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Result<String, IntrospectionError>;

    /// Returns the author of the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError`] when the author cannot be read.
    fn author(
        &self,
        repository: &Repository,
        transaction: &TransactionId,
    ) -> Result<String, IntrospectionError>;

    /// Opens the content of `path` as it will exist after the commit.
    ///
    /// The returned stream is owned by the caller and released on drop.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError`] when the content is unavailable.
    fn file_content<'a>(
        &'a self,
        repository: &Repository,
        transaction: &TransactionId,
        path: &str,
    ) -> Result<Box<dyn Read + 'a>, IntrospectionError>;
}

// ============================================================================
// SECTION: Immutable Tag Store
// ============================================================================

/// Immutable tag configuration lookup errors.
#[derive(Debug, Error)]
pub enum TagStoreError {
    /// The configuration store could not be queried.
    #[error("immutable tag store error: {0}")]
    Backend(String),
}

/// Provides the immutable tag configuration of a repository.
pub trait ImmutableTagStore {
    /// Returns the repository's configuration (empty blocks when unset).
    ///
    /// # Errors
    ///
    /// Returns [`TagStoreError`] when the configuration cannot be loaded.
    fn immutable_tags(
        &self,
        repository: &Repository,
    ) -> Result<ImmutableTagConfiguration, TagStoreError>;
}

// ============================================================================
// SECTION: Commit Message Validator
// ============================================================================

/// Commit message validation errors.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The message does not satisfy the repository's reference rules.
    #[error("{0}")]
    InvalidReference(String),
}

/// Validates commit messages against reference-syntax rules.
pub trait CommitMessageValidator {
    /// Accepts or rejects the commit message.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::InvalidReference`] when the message is rejected.
    fn validate(&self, repository: &Repository, message: &str) -> Result<(), ReferenceError>;
}

// ============================================================================
// SECTION: Diagnostic Sink
// ============================================================================

/// Destination for structured gate diagnostics.
///
/// Recording is best-effort: sinks swallow their own failures and never
/// influence a gate decision.
pub trait DiagnosticSink: Send + Sync {
    /// Records a diagnostic event.
    fn record(&self, event: &DiagnosticEvent);
}
