// crates/commit-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Commit Gate Orchestrator
// Description: Pre-commit checks over a loaded transaction context.
// Purpose: Expose independent, fail-closed commit checks to the hook entry point.
// Dependencies: crate::{core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`CommitGate`] owns the loaded transaction context and the collaborators
//! each check needs. Its three checks are independent: the hook entry point
//! chooses which to run and in which order, and every check either returns
//! `Ok(())` or exactly one [`GateError`]. Nothing is retried and nothing is
//! recovered locally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::HashAlgorithm;
use crate::interfaces::CommitMessageValidator;
use crate::interfaces::DiagnosticSink;
use crate::interfaces::ImmutableTagStore;
use crate::interfaces::ReferenceError;
use crate::interfaces::RepositoryResolver;
use crate::interfaces::TransactionIntrospector;
use crate::runtime::collision::CollisionDetector;
use crate::runtime::context::HookInvocation;
use crate::runtime::context::TransactionContext;
use crate::runtime::diagnostics::DiagnosticEvent;
use crate::runtime::diagnostics::DiagnosticEventParams;
use crate::runtime::diagnostics::DiagnosticLevel;
use crate::runtime::tags::TagDecision;
use crate::runtime::tags::TagPolicy;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that abort a commit.
#[derive(Debug, Error)]
pub enum GateError {
    /// The hook's repository path is not registered.
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),
    /// The repository registry could not be queried.
    #[error("repository lookup failed: {0}")]
    RepositoryLookup(String),
    /// Transaction metadata could not be gathered.
    #[error("cannot inspect transaction: {0}")]
    Introspection(String),
    /// The commit message fails reference validation.
    #[error("{0}")]
    InvalidReference(String),
    /// The commit modifies a protected tag.
    #[error("Commit to tag is not allowed")]
    CommitToTagDenied,
    /// The immutable tag configuration could not be loaded or compiled.
    #[error("invalid immutable tag configuration: {0}")]
    TagConfiguration(String),
    /// A changed file's content could not be read.
    #[error("can't get the content of the file {path}: {reason}")]
    ContentUnavailable {
        /// Repository-relative path.
        path: String,
        /// Underlying failure.
        reason: String,
    },
    /// A changed file matches a known collision signature.
    #[error("Known {label} collision rejected on file {path}", label = .algorithm.label())]
    KnownCollision {
        /// Repository-relative path.
        path: String,
        /// Algorithm of the matched signature.
        algorithm: HashAlgorithm,
        /// Label of the matched signature.
        signature: String,
    },
}

impl GateError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RepositoryNotFound(_) => "repository_not_found",
            Self::RepositoryLookup(_) => "repository_lookup",
            Self::Introspection(_) => "introspection",
            Self::InvalidReference(_) => "invalid_reference",
            Self::CommitToTagDenied => "commit_to_tag_denied",
            Self::TagConfiguration(_) => "tag_configuration",
            Self::ContentUnavailable {
                ..
            } => "content_unavailable",
            Self::KnownCollision {
                ..
            } => "known_collision",
        }
    }
}

// ============================================================================
// SECTION: Commit Gate
// ============================================================================

/// Pre-commit gate bound to one transaction.
pub struct CommitGate<I, T> {
    /// Loaded repository and transaction metadata.
    context: TransactionContext,
    /// Transaction introspector used for content reads.
    introspector: I,
    /// Immutable tag configuration store.
    tag_store: T,
    /// Known collision detector.
    detector: CollisionDetector,
    /// Diagnostic destination.
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<I, T> CommitGate<I, T>
where
    I: TransactionIntrospector,
    T: ImmutableTagStore,
{
    /// Resolves the repository and loads the transaction context.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when the repository is unknown or the transaction
    /// cannot be inspected.
    pub fn open<R: RepositoryResolver + ?Sized>(
        invocation: &HookInvocation,
        resolver: &R,
        introspector: I,
        tag_store: T,
        detector: CollisionDetector,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, GateError> {
        let context = TransactionContext::load(invocation, resolver, &introspector)?;
        let gate = Self {
            context,
            introspector,
            tag_store,
            detector,
            diagnostics,
        };
        gate.emit(
            DiagnosticLevel::Debug,
            "context_loaded",
            None,
            format!(
                "transaction by {} with {} changed paths",
                gate.context.commit_info().author(),
                gate.context.commit_info().changed_paths().len()
            ),
        );
        Ok(gate)
    }

    /// Returns the loaded transaction context.
    #[must_use]
    pub const fn context(&self) -> &TransactionContext {
        &self.context
    }

    /// Validates the commit message with the supplied validator.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidReference`] with the validator's message.
    pub fn assert_commit_message_is_valid<V: CommitMessageValidator + ?Sized>(
        &self,
        validator: &V,
    ) -> Result<(), GateError> {
        let message = self.context.commit_info().message();
        validator.validate(self.context.repository(), message).map_err(|err| {
            let ReferenceError::InvalidReference(reason) = err;
            self.emit(DiagnosticLevel::Warn, "message_rejected", None, reason.clone());
            GateError::InvalidReference(reason)
        })
    }

    /// Denies commits that modify a protected tag.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::CommitToTagDenied`] on the first violation and
    /// [`GateError::TagConfiguration`] when the policy cannot be built.
    pub fn assert_commit_to_tag_is_allowed(&self) -> Result<(), GateError> {
        let config = self
            .tag_store
            .immutable_tags(self.context.repository())
            .map_err(|err| GateError::TagConfiguration(err.to_string()))?;
        let policy =
            TagPolicy::compile(&config).map_err(|err| GateError::TagConfiguration(err.to_string()));
        let Some(policy) = policy? else {
            return Ok(());
        };

        self.emit(
            DiagnosticLevel::Debug,
            "tag_check_started",
            None,
            format!("checking {} protected tag patterns", policy.protected_count()),
        );
        for change in self.context.commit_info().changed_paths() {
            match policy.evaluate(change) {
                TagDecision::Unprotected => {}
                TagDecision::Whitelisted {
                    immutable,
                    whitelist,
                } => {
                    self.emit(
                        DiagnosticLevel::Debug,
                        "tag_path_whitelisted",
                        Some(&change.path),
                        format!("{change} is inside {immutable} but allowed by {whitelist}"),
                    );
                }
                TagDecision::Denied {
                    immutable,
                } => {
                    self.emit(
                        DiagnosticLevel::Warn,
                        "tag_path_denied",
                        Some(&change.path),
                        format!("{change} is denied by {immutable}"),
                    );
                    return Err(GateError::CommitToTagDenied);
                }
            }
        }
        self.emit(
            DiagnosticLevel::Debug,
            "tag_commit_allowed",
            None,
            "commit is allowed".to_string(),
        );
        Ok(())
    }

    /// Rejects transactions carrying content that matches a collision signature.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::ContentUnavailable`] when a file cannot be read and
    /// [`GateError::KnownCollision`] on the first match.
    pub fn assert_commit_does_not_contain_known_collision(&self) -> Result<(), GateError> {
        let repository = self.context.repository();
        let transaction = self.context.transaction();
        for change in self.context.commit_info().content_paths() {
            self.emit(
                DiagnosticLevel::Debug,
                "collision_scan_file",
                Some(&change.path),
                format!("scanning {}", change.path),
            );
            let outcome = {
                let mut stream = self
                    .introspector
                    .file_content(repository, transaction, &change.path)
                    .map_err(|err| GateError::ContentUnavailable {
                        path: change.path.clone(),
                        reason: err.to_string(),
                    })?;
                self.detector.scan(&mut stream)
            };
            match outcome {
                Ok(None) => {}
                Ok(Some(signature)) => {
                    self.emit(
                        DiagnosticLevel::Warn,
                        "collision_detected",
                        Some(&change.path),
                        format!("content matches {} ({})", signature.label, signature.digest),
                    );
                    return Err(GateError::KnownCollision {
                        path: change.path.clone(),
                        algorithm: signature.digest.algorithm,
                        signature: signature.label.clone(),
                    });
                }
                Err(err) => {
                    return Err(GateError::ContentUnavailable {
                        path: change.path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Records a diagnostic event scoped to this transaction.
    fn emit(
        &self,
        level: DiagnosticLevel,
        event: &'static str,
        path: Option<&str>,
        message: String,
    ) {
        self.diagnostics.record(&DiagnosticEvent::new(DiagnosticEventParams {
            event,
            level,
            repository_id: Some(self.context.repository().id),
            transaction: Some(self.context.transaction().clone()),
            path: path.map(str::to_string),
            message,
        }));
    }
}
