// crates/commit-gate-core/src/runtime/tags.rs
// ============================================================================
// Module: Commit Gate Immutable Tag Policy
// Description: Per-path immutable tag decisions with whitelist overrides.
// Purpose: Deny modification of release tags while allowing sanctioned additions.
// Dependencies: crate::core, crate::runtime::pattern
// ============================================================================

//! ## Overview
//! A [`TagPolicy`] is compiled once from a repository's immutable tag
//! configuration and then evaluates every changed path independently:
//!
//! - updates, property changes, replacements and deletions of a protected tag
//!   or anything below it are candidate violations;
//! - additions two or more segments below a protected tag are candidate
//!   violations (creating the tag itself and its direct children is not);
//! - a candidate addition exactly one segment below a whitelisted path is
//!   forgiven.
//!
//! A whitelisted directory does not extend permission to entries added below
//! it in the same transaction; each entry is judged on its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ChangeStatus;
use crate::core::ChangedPath;
use crate::core::ImmutableTagConfiguration;
use crate::runtime::pattern::ImmutablePattern;
use crate::runtime::pattern::PatternError;
use crate::runtime::pattern::WhitelistPattern;

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Outcome of evaluating one changed path against a tag policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    /// No protected tag is affected.
    Unprotected,
    /// A protected tag is affected but the whitelist allows the addition.
    Whitelisted {
        /// Protected glob that matched.
        immutable: String,
        /// Whitelist glob that allowed the addition.
        whitelist: String,
    },
    /// The change violates the policy.
    Denied {
        /// Protected glob that matched.
        immutable: String,
    },
}

impl TagDecision {
    /// Returns true unless the change is denied.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        !matches!(self, Self::Denied { .. })
    }
}

// ============================================================================
// SECTION: Tag Policy
// ============================================================================

/// Compiled immutable tag policy of one repository.
///
/// # Invariants
/// - Holds at least one protected pattern.
#[derive(Debug, Clone)]
pub struct TagPolicy {
    /// Protected tag patterns in configuration order.
    immutable: Vec<ImmutablePattern>,
    /// Whitelist patterns in configuration order.
    whitelist: Vec<WhitelistPattern>,
}

impl TagPolicy {
    /// Compiles a configuration; returns `None` when it enforces nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when a configured glob cannot be compiled.
    pub fn compile(config: &ImmutableTagConfiguration) -> Result<Option<Self>, PatternError> {
        let immutable =
            config.path_lines().map(ImmutablePattern::compile).collect::<Result<Vec<_>, _>>()?;
        if immutable.is_empty() {
            return Ok(None);
        }
        let whitelist =
            config.whitelist_lines().map(WhitelistPattern::compile).collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Self {
            immutable,
            whitelist,
        }))
    }

    /// Returns the number of protected patterns.
    #[must_use]
    pub const fn protected_count(&self) -> usize {
        self.immutable.len()
    }

    /// Evaluates one changed path.
    #[must_use]
    pub fn evaluate(&self, change: &ChangedPath) -> TagDecision {
        let Some(immutable) =
            self.immutable.iter().find(|pattern| is_candidate(pattern, change))
        else {
            return TagDecision::Unprotected;
        };
        if change.status == ChangeStatus::Added
            && let Some(whitelist) =
                self.whitelist.iter().find(|pattern| pattern.allows_child(&change.path))
        {
            return TagDecision::Whitelisted {
                immutable: immutable.source().to_string(),
                whitelist: whitelist.source().to_string(),
            };
        }
        TagDecision::Denied {
            immutable: immutable.source().to_string(),
        }
    }

    /// Returns the first denied change and its decision.
    #[must_use]
    pub fn first_violation<'a>(
        &self,
        changes: &'a [ChangedPath],
    ) -> Option<(&'a ChangedPath, TagDecision)> {
        changes.iter().map(|change| (change, self.evaluate(change))).find(|(_, d)| !d.is_allowed())
    }
}

/// Returns true when a change is a candidate violation of a protected pattern.
fn is_candidate(pattern: &ImmutablePattern, change: &ChangedPath) -> bool {
    if change.status.is_modification() {
        pattern.covers(&change.path)
    } else {
        pattern.covers_nested(&change.path)
    }
}
