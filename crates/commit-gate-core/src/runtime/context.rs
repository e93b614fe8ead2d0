// crates/commit-gate-core/src/runtime/context.rs
// ============================================================================
// Module: Commit Gate Transaction Context
// Description: Repository resolution and one-shot transaction enrichment.
// Purpose: Gather everything the checks need before any of them runs.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The context binds the hook's repository path and transaction identifier to
//! a resolved [`Repository`] and an eagerly built [`CommitInfo`]. Each piece
//! of metadata costs one introspector call and is cached for the lifetime of
//! the gate; checks never re-run the listing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use crate::core::ChangedPath;
use crate::core::CommitInfo;
use crate::core::Repository;
use crate::core::TransactionId;
use crate::interfaces::IntrospectionError;
use crate::interfaces::RepositoryError;
use crate::interfaces::RepositoryResolver;
use crate::interfaces::TransactionIntrospector;
use crate::runtime::gate::GateError;

// ============================================================================
// SECTION: Hook Invocation
// ============================================================================

/// Arguments SVN passes to the `pre-commit` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInvocation {
    /// Filesystem path of the repository.
    pub repository_path: PathBuf,
    /// In-flight transaction identifier.
    pub transaction: TransactionId,
}

impl HookInvocation {
    /// Creates a hook invocation.
    #[must_use]
    pub fn new(repository_path: impl Into<PathBuf>, transaction: impl Into<String>) -> Self {
        Self {
            repository_path: repository_path.into(),
            transaction: TransactionId::new(transaction),
        }
    }
}

// ============================================================================
// SECTION: Transaction Context
// ============================================================================

/// Resolved repository plus cached transaction metadata.
///
/// # Invariants
/// - `commit_info` is complete once the context exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
    /// Repository targeted by the transaction.
    repository: Repository,
    /// Transaction under check.
    transaction: TransactionId,
    /// Metadata gathered from the introspector.
    commit_info: CommitInfo,
}

impl TransactionContext {
    /// Resolves the repository and enriches the transaction metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::RepositoryNotFound`] for unknown paths and
    /// [`GateError::Introspection`] when metadata cannot be gathered.
    pub fn load<R, I>(
        invocation: &HookInvocation,
        resolver: &R,
        introspector: &I,
    ) -> Result<Self, GateError>
    where
        R: RepositoryResolver + ?Sized,
        I: TransactionIntrospector + ?Sized,
    {
        let repository =
            resolver.resolve_by_path(&invocation.repository_path).map_err(|err| match err {
                RepositoryError::NotFound(path) => GateError::RepositoryNotFound(path),
                RepositoryError::Backend(message) => GateError::RepositoryLookup(message),
            })?;
        let transaction = invocation.transaction.clone();
        let commit_info = enrich(&repository, &transaction, introspector)?;
        Ok(Self {
            repository,
            transaction,
            commit_info,
        })
    }

    /// Returns the resolved repository.
    #[must_use]
    pub const fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Returns the transaction identifier.
    #[must_use]
    pub const fn transaction(&self) -> &TransactionId {
        &self.transaction
    }

    /// Returns the cached commit metadata.
    #[must_use]
    pub const fn commit_info(&self) -> &CommitInfo {
        &self.commit_info
    }
}

/// Builds commit info with one introspector call per field.
fn enrich<I: TransactionIntrospector + ?Sized>(
    repository: &Repository,
    transaction: &TransactionId,
    introspector: &I,
) -> Result<CommitInfo, GateError> {
    let author = introspector.author(repository, transaction).map_err(introspection)?;
    let message = introspector.commit_message(repository, transaction).map_err(introspection)?;
    let lines = introspector.changed_path_lines(repository, transaction).map_err(introspection)?;
    let changed_paths = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| ChangedPath::parse(line))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| GateError::Introspection(err.to_string()))?;
    Ok(CommitInfo::new(author, message, changed_paths))
}

/// Maps an introspector failure into the gate taxonomy.
fn introspection(err: IntrospectionError) -> GateError {
    GateError::Introspection(err.to_string())
}
