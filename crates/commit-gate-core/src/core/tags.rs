// crates/commit-gate-core/src/core/tags.rs
// ============================================================================
// Module: Commit Gate Immutable Tags
// Description: Per-repository immutable tag configuration.
// Purpose: Carry the protected tag globs and their whitelist as stored text blocks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Immutable tag configuration is stored as two newline-separated text
//! blocks. `paths` lists glob patterns of protected tag directories and
//! `whitelist` lists globs below which single-level additions stay allowed.
//! Blank lines carry no meaning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Immutable tag configuration of one repository.
///
/// # Invariants
/// - A `paths` block without non-blank lines disables enforcement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImmutableTagConfiguration {
    /// Newline-separated glob patterns of protected tag directories.
    #[serde(default)]
    pub paths: String,
    /// Newline-separated glob patterns of allowed additions.
    #[serde(default)]
    pub whitelist: String,
}

impl ImmutableTagConfiguration {
    /// Creates a configuration from its two text blocks.
    #[must_use]
    pub fn new(paths: impl Into<String>, whitelist: impl Into<String>) -> Self {
        Self {
            paths: paths.into(),
            whitelist: whitelist.into(),
        }
    }

    /// Returns the non-blank protected path lines.
    pub fn path_lines(&self) -> impl Iterator<Item = &str> {
        non_blank_lines(&self.paths)
    }

    /// Returns the non-blank whitelist lines.
    pub fn whitelist_lines(&self) -> impl Iterator<Item = &str> {
        non_blank_lines(&self.whitelist)
    }

    /// Returns true when at least one protected path is configured.
    #[must_use]
    pub fn is_enforced(&self) -> bool {
        self.path_lines().next().is_some()
    }
}

/// Splits a text block into trimmed, non-blank lines.
fn non_blank_lines(block: &str) -> impl Iterator<Item = &str> {
    block.lines().map(str::trim).filter(|line| !line.is_empty())
}
