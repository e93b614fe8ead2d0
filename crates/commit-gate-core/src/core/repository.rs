// crates/commit-gate-core/src/core/repository.rs
// ============================================================================
// Module: Commit Gate Repository
// Description: Repository descriptor resolved from the hook's filesystem path.
// Purpose: Identify the version-controlled store a transaction belongs to.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Repository`] is owned by the resolver and handed to every collaborator
//! call so providers can address the right store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::RepositoryId;

// ============================================================================
// SECTION: Repository
// ============================================================================

/// Version-controlled project store targeted by a commit.
///
/// # Invariants
/// - Immutable for the duration of a commit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Registry identifier.
    pub id: RepositoryId,
    /// Human-readable repository name.
    pub name: String,
    /// Filesystem path of the repository on the SVN server.
    pub path: PathBuf,
}

impl Repository {
    /// Creates a repository descriptor.
    #[must_use]
    pub fn new(id: RepositoryId, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
        }
    }

    /// Returns the repository filesystem path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
