// crates/commit-gate-providers/src/references.rs
// ============================================================================
// Module: Reference Commit Message Validator
// Description: Per-repository commit message rules based on artifact references.
// Purpose: Require commit messages to cite tracker artifacts where configured.
// Dependencies: commit-gate-core, regex, serde
// ============================================================================

//! ## Overview
//! A reference has the form `<keyword> #[<project>:]<value>`, for example
//! `story #42` or `art #webapp:1207`. Each repository carries
//! [`ReferenceRules`]; repositories without rules accept any message.
//! Keywords compare case-insensitively; an empty keyword list accepts any
//! word as a keyword.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::LazyLock;

use commit_gate_core::CommitMessageValidator;
use commit_gate_core::ReferenceError;
use commit_gate_core::Repository;
use commit_gate_core::RepositoryId;
use regex::Regex;
use serde::Deserialize;

// ============================================================================
// SECTION: Reference Syntax
// ============================================================================

/// Matches `<keyword> #[<project>:]<value>`; group 1 holds the keyword.
static REFERENCE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w])([A-Za-z][\w-]*) #(?:[\w-]+:)?[\w][\w./=-]*").ok()
});

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Commit message rules of one repository.
///
/// # Invariants
/// - Keywords are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceRules {
    /// Require at least one artifact reference.
    pub mandatory_reference: bool,
    /// Accept messages that are blank once trimmed.
    pub allow_empty_message: bool,
    /// Accepted reference keywords; empty accepts any keyword.
    pub keywords: Vec<String>,
}

impl Default for ReferenceRules {
    fn default() -> Self {
        Self {
            mandatory_reference: false,
            allow_empty_message: true,
            keywords: Vec::new(),
        }
    }
}

impl ReferenceRules {
    /// Returns the references found in `message`, as keywords.
    #[must_use]
    pub fn references<'m>(&self, message: &'m str) -> Vec<&'m str> {
        let Some(pattern) = REFERENCE_PATTERN.as_ref() else {
            return Vec::new();
        };
        pattern
            .captures_iter(message)
            .filter_map(|captures| captures.get(1))
            .map(|keyword| keyword.as_str())
            .filter(|keyword| self.accepts_keyword(keyword))
            .collect()
    }

    /// Checks a message against the rules.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError::InvalidReference`] describing the violation.
    pub fn check(&self, message: &str) -> Result<(), ReferenceError> {
        if message.trim().is_empty() && !self.allow_empty_message {
            return Err(ReferenceError::InvalidReference(
                "Commit message must not be empty".to_string(),
            ));
        }
        if self.mandatory_reference && self.references(message).is_empty() {
            return Err(ReferenceError::InvalidReference(self.missing_reference_message()));
        }
        Ok(())
    }

    /// Returns true when `keyword` is accepted.
    fn accepts_keyword(&self, keyword: &str) -> bool {
        self.keywords.is_empty()
            || self.keywords.iter().any(|known| known.eq_ignore_ascii_case(keyword))
    }

    /// Builds the rejection message for a missing reference.
    fn missing_reference_message(&self) -> String {
        let example = self.keywords.first().map_or("story", String::as_str);
        format!("Commit message must contain a reference to an artifact (e.g. {example} #123)")
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Commit message validator keyed by repository.
#[derive(Debug, Clone, Default)]
pub struct ReferenceValidator {
    /// Rules per repository.
    rules: BTreeMap<RepositoryId, ReferenceRules>,
}

impl ReferenceValidator {
    /// Creates a validator with no rules.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Sets the rules for a repository.
    #[must_use]
    pub fn with_rules(mut self, repository: RepositoryId, rules: ReferenceRules) -> Self {
        self.rules.insert(repository, rules);
        self
    }

    /// Returns the rules for a repository, if configured.
    #[must_use]
    pub fn rules(&self, repository: RepositoryId) -> Option<&ReferenceRules> {
        self.rules.get(&repository)
    }
}

impl CommitMessageValidator for ReferenceValidator {
    fn validate(&self, repository: &Repository, message: &str) -> Result<(), ReferenceError> {
        self.rules.get(&repository.id).map_or(Ok(()), |rules| rules.check(message))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
