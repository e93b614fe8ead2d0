// crates/commit-gate-core/src/runtime/pattern.rs
// ============================================================================
// Module: Commit Gate Path Patterns
// Description: Glob-to-regex compilation for immutable tag and whitelist paths.
// Purpose: Build reusable path matchers once per check instead of per path.
// Dependencies: regex, thiserror
// ============================================================================

//! ## Overview
//! Tag patterns are simple globs over repository-relative paths. Translation
//! trims surrounding whitespace and `/`, escapes every regex metacharacter and
//! turns each `*` into "one or more non-slash characters". The same
//! translation feeds three matchers:
//!
//! - [`GlobPattern`]: the pattern itself, matched against a whole path.
//! - [`ImmutablePattern`]: the protected tag, its subtree, and additions two
//!   or more levels below it.
//! - [`WhitelistPattern`]: additions exactly one level below the pattern.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Regex fragment substituted for each glob `*`.
const SEGMENT_WILDCARD: &str = "[^/]+";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when compiling path patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Pattern names no path once trimmed.
    #[error("path pattern is empty: '{0}'")]
    Empty(String),
    /// Generated expression was rejected by the regex engine.
    #[error("path pattern '{pattern}' cannot be compiled: {reason}")]
    Regex {
        /// Offending glob.
        pattern: String,
        /// Regex engine message.
        reason: String,
    },
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates a glob into an unanchored regex body.
///
/// # Errors
///
/// Returns [`PatternError::Empty`] when nothing remains after trimming.
pub fn glob_to_regex(glob: &str) -> Result<String, PatternError> {
    let trimmed = glob.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(PatternError::Empty(glob.to_string()));
    }
    Ok(regex::escape(trimmed).replace(r"\*", SEGMENT_WILDCARD))
}

/// Compiles an anchored expression built from a glob body.
fn compile(glob: &str, expression: &str) -> Result<Regex, PatternError> {
    Regex::new(expression).map_err(|err| PatternError::Regex {
        pattern: glob.to_string(),
        reason: err.to_string(),
    })
}

// ============================================================================
// SECTION: Glob Pattern
// ============================================================================

/// Compiled glob matching whole paths.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    /// Glob as configured, trimmed of whitespace.
    source: String,
    /// Unanchored regex body.
    body: String,
    /// Anchored whole-path matcher.
    exact: Regex,
}

impl GlobPattern {
    /// Compiles a glob.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the glob is empty or cannot be compiled.
    pub fn compile(glob: &str) -> Result<Self, PatternError> {
        let body = glob_to_regex(glob)?;
        let exact = compile(glob, &format!("^{body}$"))?;
        Ok(Self {
            source: glob.trim().to_string(),
            body,
            exact,
        })
    }

    /// Returns the configured glob.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the unanchored regex body.
    #[must_use]
    pub fn regex_body(&self) -> &str {
        &self.body
    }

    /// Returns true when the whole path matches the glob.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.exact.is_match(path.trim_matches('/'))
    }
}

// ============================================================================
// SECTION: Immutable Pattern
// ============================================================================

/// Compiled protected tag pattern.
#[derive(Debug, Clone)]
pub struct ImmutablePattern {
    /// Underlying glob.
    glob: GlobPattern,
    /// Matches the tag root and any path below it.
    subtree: Regex,
    /// Matches paths two or more segments below the tag root.
    nested: Regex,
}

impl ImmutablePattern {
    /// Compiles a protected tag glob.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the glob is empty or cannot be compiled.
    pub fn compile(glob: &str) -> Result<Self, PatternError> {
        let glob = GlobPattern::compile(glob)?;
        let body = glob.regex_body();
        let subtree = compile(glob.source(), &format!("^{body}(?:/|$)"))?;
        let nested = compile(
            glob.source(),
            &format!("^{body}/{SEGMENT_WILDCARD}/{SEGMENT_WILDCARD}"),
        )?;
        Ok(Self {
            glob,
            subtree,
            nested,
        })
    }

    /// Returns the configured glob.
    #[must_use]
    pub fn source(&self) -> &str {
        self.glob.source()
    }

    /// Returns true when `path` is the tag root or lies inside it.
    #[must_use]
    pub fn covers(&self, path: &str) -> bool {
        self.subtree.is_match(path)
    }

    /// Returns true when `path` is at least two segments below the tag root.
    #[must_use]
    pub fn covers_nested(&self, path: &str) -> bool {
        self.nested.is_match(path)
    }
}

// ============================================================================
// SECTION: Whitelist Pattern
// ============================================================================

/// Compiled whitelist pattern.
#[derive(Debug, Clone)]
pub struct WhitelistPattern {
    /// Underlying glob.
    glob: GlobPattern,
    /// Matches exactly one segment below the pattern, optional trailing slash.
    child: Regex,
}

impl WhitelistPattern {
    /// Compiles a whitelist glob.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the glob is empty or cannot be compiled.
    pub fn compile(glob: &str) -> Result<Self, PatternError> {
        let glob = GlobPattern::compile(glob)?;
        let child = compile(
            glob.source(),
            &format!("^{}/{SEGMENT_WILDCARD}/?$", glob.regex_body()),
        )?;
        Ok(Self {
            glob,
            child,
        })
    }

    /// Returns the configured glob.
    #[must_use]
    pub fn source(&self) -> &str {
        self.glob.source()
    }

    /// Returns true when `path` is a direct child of the whitelisted path.
    #[must_use]
    pub fn allows_child(&self, path: &str) -> bool {
        self.child.is_match(path)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
