// crates/commit-gate-providers/src/registry.rs
// ============================================================================
// Module: Static Repository Registry
// Description: Repository lookup and immutable tag store backed by configuration.
// Purpose: Resolve hook repository paths without an external database.
// Dependencies: commit-gate-core
// ============================================================================

//! ## Overview
//! The registry holds every repository the gate serves together with its
//! immutable tag configuration. Hook paths are compared component-wise, so
//! trailing or doubled separators do not affect resolution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use commit_gate_core::ImmutableTagConfiguration;
use commit_gate_core::ImmutableTagStore;
use commit_gate_core::Repository;
use commit_gate_core::RepositoryError;
use commit_gate_core::RepositoryId;
use commit_gate_core::RepositoryResolver;
use commit_gate_core::TagStoreError;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// Repository plus the policy data the registry serves for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    /// Registered repository.
    pub repository: Repository,
    /// Immutable tag configuration of the repository.
    pub immutable_tags: ImmutableTagConfiguration,
}

impl RepositoryEntry {
    /// Creates a registry entry.
    #[must_use]
    pub const fn new(repository: Repository, immutable_tags: ImmutableTagConfiguration) -> Self {
        Self {
            repository,
            immutable_tags,
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// In-memory registry of repositories.
///
/// # Invariants
/// - Entries keep configuration order; lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct StaticRepositoryRegistry {
    /// Registered entries.
    entries: Vec<RepositoryEntry>,
}

impl StaticRepositoryRegistry {
    /// Creates a registry from entries.
    #[must_use]
    pub const fn new(entries: Vec<RepositoryEntry>) -> Self {
        Self {
            entries,
        }
    }

    /// Returns the number of registered repositories.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no repository is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry with the given identifier.
    #[must_use]
    pub fn get(&self, id: RepositoryId) -> Option<&RepositoryEntry> {
        self.entries.iter().find(|entry| entry.repository.id == id)
    }

    /// Returns the entry registered under `path`.
    #[must_use]
    pub fn find_by_path(&self, path: &Path) -> Option<&RepositoryEntry> {
        self.entries.iter().find(|entry| entry.repository.path().components().eq(path.components()))
    }
}

impl RepositoryResolver for StaticRepositoryRegistry {
    fn resolve_by_path(&self, path: &Path) -> Result<Repository, RepositoryError> {
        self.find_by_path(path)
            .map(|entry| entry.repository.clone())
            .ok_or_else(|| RepositoryError::NotFound(path.display().to_string()))
    }
}

impl ImmutableTagStore for StaticRepositoryRegistry {
    fn immutable_tags(
        &self,
        repository: &Repository,
    ) -> Result<ImmutableTagConfiguration, TagStoreError> {
        self.get(repository.id).map(|entry| entry.immutable_tags.clone()).ok_or_else(|| {
            TagStoreError::Backend(format!("repository {} is not registered", repository.id))
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests unwrap registry fixtures.")]

    use std::path::PathBuf;

    use super::*;

    fn registry() -> StaticRepositoryRegistry {
        StaticRepositoryRegistry::new(vec![
            RepositoryEntry::new(
                Repository::new(RepositoryId::from_raw(1).unwrap(), "alpha", "/srv/svn/alpha"),
                ImmutableTagConfiguration::new("tags", ""),
            ),
            RepositoryEntry::new(
                Repository::new(RepositoryId::from_raw(2).unwrap(), "beta", "/srv/svn/beta"),
                ImmutableTagConfiguration::default(),
            ),
        ])
    }

    #[test]
    fn resolves_with_trailing_separator() {
        let repository = registry().resolve_by_path(Path::new("/srv/svn/beta/")).unwrap();
        assert_eq!(repository.name, "beta");
        let repository = registry().resolve_by_path(Path::new("/srv//svn/alpha")).unwrap();
        assert_eq!(repository.name, "alpha");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let err = registry().resolve_by_path(&PathBuf::from("/srv/svn/alpha/sub")).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(path) if path == "/srv/svn/alpha/sub"));
    }

    #[test]
    fn serves_tag_configuration_by_id() {
        let registry = registry();
        let alpha = registry.resolve_by_path(Path::new("/srv/svn/alpha")).unwrap();
        assert_eq!(registry.immutable_tags(&alpha).unwrap().paths, "tags");
        let stranger =
            Repository::new(RepositoryId::from_raw(9).unwrap(), "stranger", "/srv/svn/x");
        assert!(registry.immutable_tags(&stranger).is_err());
    }
}
