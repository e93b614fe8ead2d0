// crates/commit-gate-config/src/assembly.rs
// ============================================================================
// Module: Commit Gate Collaborator Assembly
// Description: Builds gate collaborators from validated configuration.
// Purpose: Keep the hook entry point free of wiring details.
// Dependencies: commit-gate-core, commit-gate-providers
// ============================================================================

//! ## Overview
//! Each builder maps one configuration section to the collaborator the gate
//! consumes. Builders re-check the values they convert, so they also fail
//! closed on a [`GateConfig`] that was constructed without validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use commit_gate_core::CollisionDetector;
use commit_gate_core::CollisionSignature;
use commit_gate_core::DiagnosticSink;
use commit_gate_core::FileDiagnosticSink;
use commit_gate_core::LevelFilterSink;
use commit_gate_core::NoopDiagnosticSink;
use commit_gate_core::Repository;
use commit_gate_core::RepositoryId;
use commit_gate_core::SignatureSet;
use commit_gate_core::StderrDiagnosticSink;
use commit_gate_providers::ReferenceValidator;
use commit_gate_providers::RepositoryEntry;
use commit_gate_providers::StaticRepositoryRegistry;
use commit_gate_providers::Svnlook;

use crate::config::ConfigError;
use crate::config::GateConfig;
use crate::config::LogSinkKind;
use crate::config::RepositoryConfig;

// ============================================================================
// SECTION: Builders
// ============================================================================

impl GateConfig {
    /// Builds the repository registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a repository id is zero.
    pub fn registry(&self) -> Result<StaticRepositoryRegistry, ConfigError> {
        let entries = self
            .repositories
            .iter()
            .map(|config| {
                Ok(RepositoryEntry::new(repository(config)?, config.immutable_tags.clone()))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(StaticRepositoryRegistry::new(entries))
    }

    /// Builds the commit message validator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a repository id is zero.
    pub fn reference_validator(&self) -> Result<ReferenceValidator, ConfigError> {
        self.repositories.iter().try_fold(ReferenceValidator::new(), |validator, config| {
            Ok(validator.with_rules(repository_id(config)?, config.references.clone()))
        })
    }

    /// Builds the collision signature set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a signature is malformed.
    pub fn signature_set(&self) -> Result<SignatureSet, ConfigError> {
        let mut set = if self.collision.builtin_signatures {
            SignatureSet::builtin()
        } else {
            SignatureSet::new()
        };
        for signature in &self.collision.signatures {
            set.insert(CollisionSignature::new(signature.label.trim(), signature.digest()?));
        }
        Ok(set)
    }

    /// Builds the collision detector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a signature is malformed.
    pub fn collision_detector(&self) -> Result<CollisionDetector, ConfigError> {
        Ok(CollisionDetector::new(self.signature_set()?))
    }

    /// Builds the `svnlook` introspector.
    #[must_use]
    pub fn svnlook(&self) -> Svnlook {
        Svnlook::new(self.svnlook.clone())
    }

    /// Builds the diagnostic sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the log file cannot be opened.
    pub fn diagnostic_sink(&self) -> Result<Arc<dyn DiagnosticSink>, ConfigError> {
        let level = self.logging.level;
        let sink: Arc<dyn DiagnosticSink> = match self.logging.sink {
            LogSinkKind::None => Arc::new(NoopDiagnosticSink),
            LogSinkKind::Stderr => Arc::new(LevelFilterSink::new(level, StderrDiagnosticSink)),
            LogSinkKind::File => {
                let path = self.logging.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("logging.path is required for file sink".to_string())
                })?;
                let file = FileDiagnosticSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("{path}: {err}")))?;
                Arc::new(LevelFilterSink::new(level, file))
            }
        };
        Ok(sink)
    }

    /// Builds the diagnostic sink for a hook run.
    ///
    /// A log destination that cannot be opened degrades to
    /// [`NoopDiagnosticSink`]; logging never decides a commit.
    #[must_use]
    pub fn best_effort_diagnostic_sink(&self) -> Arc<dyn DiagnosticSink> {
        self.diagnostic_sink().unwrap_or_else(|_| Arc::new(NoopDiagnosticSink))
    }
}

/// Converts a configured id.
fn repository_id(config: &RepositoryConfig) -> Result<RepositoryId, ConfigError> {
    RepositoryId::from_raw(config.id)
        .ok_or_else(|| ConfigError::Invalid("repositories.id must be non-zero".to_string()))
}

/// Converts a configured repository.
fn repository(config: &RepositoryConfig) -> Result<Repository, ConfigError> {
    Ok(Repository::new(repository_id(config)?, config.name.trim(), config.path.trim()))
}
