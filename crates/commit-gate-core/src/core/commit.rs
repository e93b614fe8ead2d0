// crates/commit-gate-core/src/core/commit.rs
// ============================================================================
// Module: Commit Gate Commit Info
// Description: Read-only view over an in-flight transaction.
// Purpose: Hold the author, message, and changed paths gathered once per hook run.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`CommitInfo`] is filled by the transaction loader from one call each for
//! author, message and changed-path listing. Checks only read it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::changes::ChangeStatus;
use crate::core::changes::ChangedPath;

// ============================================================================
// SECTION: Commit Info
// ============================================================================

/// Accumulated metadata of a transaction.
///
/// # Invariants
/// - Built once by the transaction loader and never mutated afterwards.
/// - `changed_paths` keeps the order reported by the introspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Transaction author as reported by the server.
    author: String,
    /// Commit log message.
    message: String,
    /// Changed paths in listing order.
    changed_paths: Vec<ChangedPath>,
}

impl CommitInfo {
    /// Creates commit info from already gathered parts.
    #[must_use]
    pub const fn new(author: String, message: String, changed_paths: Vec<ChangedPath>) -> Self {
        Self {
            author,
            message,
            changed_paths,
        }
    }

    /// Returns the transaction author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the commit message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns every changed path.
    #[must_use]
    pub fn changed_paths(&self) -> &[ChangedPath] {
        &self.changed_paths
    }

    /// Iterates over changed paths whose content exists after the commit.
    pub fn content_paths(&self) -> impl Iterator<Item = &ChangedPath> {
        self.changed_paths
            .iter()
            .filter(|entry| entry.status != ChangeStatus::Deleted && !entry.is_directory())
    }
}
