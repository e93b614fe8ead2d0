// crates/commit-gate-core/src/core/changes.rs
// ============================================================================
// Module: Commit Gate Changed Paths
// Description: Parsing of `svnlook changed` listing lines.
// Purpose: Turn raw status lines into typed changed-path records.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! `svnlook changed` prints one line per changed path: a status column, one
//! or more spaces, then the repository-relative path. The first status
//! character is the item action (`A`, `D`, `U`, `R` or `_` when only
//! properties changed); an optional second character flags a property change.
//! Directory entries end with `/`.
//!
//! Lines that do not follow this layout are rejected so that callers fail
//! closed instead of silently skipping entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Change Status
// ============================================================================

/// Action recorded for a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// Path added to the repository (`A`).
    Added,
    /// Path removed from the repository (`D`).
    Deleted,
    /// File contents modified (`U`).
    Updated,
    /// Only properties modified (`_U`).
    PropertiesUpdated,
    /// Path replaced in place (`R`).
    Replaced,
}

impl ChangeStatus {
    /// Returns the status column token as printed by `svnlook changed`.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Added => "A",
            Self::Deleted => "D",
            Self::Updated => "U",
            Self::PropertiesUpdated => "_U",
            Self::Replaced => "R",
        }
    }

    /// Returns true when the change alters an existing path.
    #[must_use]
    pub const fn is_modification(self) -> bool {
        matches!(self, Self::Deleted | Self::Updated | Self::PropertiesUpdated | Self::Replaced)
    }

    /// Parses a status column token.
    fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let action = chars.next()?;
        let property = chars.next();
        if chars.next().is_some() {
            return None;
        }
        if property.is_some_and(|flag| flag != 'U') {
            return None;
        }
        match (action, property) {
            ('A', _) => Some(Self::Added),
            ('D', None) => Some(Self::Deleted),
            ('U', _) => Some(Self::Updated),
            ('R', _) => Some(Self::Replaced),
            ('_', Some('U')) => Some(Self::PropertiesUpdated),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Changed Path
// ============================================================================

/// One entry of a transaction's changed-path listing.
///
/// # Invariants
/// - `path` is non-empty and repository-relative (no leading `/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedPath {
    /// Change action.
    pub status: ChangeStatus,
    /// Repository-relative path; directories keep their trailing `/`.
    pub path: String,
}

impl ChangedPath {
    /// Creates a changed-path entry.
    #[must_use]
    pub fn new(status: ChangeStatus, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }

    /// Parses a single `svnlook changed` line.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeParseError`] when the line has no status column, an
    /// unknown status token, or no path.
    pub fn parse(line: &str) -> Result<Self, ChangeParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some((token, rest)) = line.split_once(char::is_whitespace) else {
            return Err(ChangeParseError::MissingPath(line.to_string()));
        };
        let status = ChangeStatus::from_token(token)
            .ok_or_else(|| ChangeParseError::UnknownStatus(token.to_string()))?;
        let path = rest.trim_start();
        if path.is_empty() {
            return Err(ChangeParseError::MissingPath(line.to_string()));
        }
        Ok(Self::new(status, path))
    }

    /// Returns true when the entry names a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.path.ends_with('/')
    }
}

impl FromStr for ChangedPath {
    type Err = ChangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChangedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<4}{}", self.status.token(), self.path)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing changed-path lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeParseError {
    /// Status column is not one `svnlook` produces.
    #[error("unknown change status: {0}")]
    UnknownStatus(String),
    /// Line carries no path after the status column.
    #[error("changed path line has no path: {0}")]
    MissingPath(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
