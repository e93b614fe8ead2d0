// crates/commit-gate-config/src/config.rs
// ============================================================================
// Module: Commit Gate Configuration
// Description: Configuration loading and validation for the commit gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: commit-gate-core, commit-gate-providers, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a hook that cannot load its
//! policy rejects the commit instead of skipping the checks.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use commit_gate_core::DiagnosticLevel;
use commit_gate_core::HashAlgorithm;
use commit_gate_core::HashDigest;
use commit_gate_core::ImmutableTagConfiguration;
use commit_gate_core::TagPolicy;
use commit_gate_providers::ReferenceRules;
use commit_gate_providers::SvnlookConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "svn-commit-gate.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "SVN_COMMIT_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured repositories.
pub(crate) const MAX_REPOSITORIES: usize = 4096;
/// Maximum repository name length.
pub(crate) const MAX_REPOSITORY_NAME_LENGTH: usize = 255;
/// Maximum non-blank lines in a tag pattern block.
pub(crate) const MAX_PATTERN_LINES: usize = 256;
/// Maximum length of one tag pattern line.
pub(crate) const MAX_PATTERN_LENGTH: usize = 1024;
/// Maximum number of configured collision signatures.
pub(crate) const MAX_SIGNATURES: usize = 256;
/// Maximum signature label length.
pub(crate) const MAX_SIGNATURE_LABEL_LENGTH: usize = 128;
/// Maximum number of reference keywords per repository.
pub(crate) const MAX_REFERENCE_KEYWORDS: usize = 64;
/// Maximum length of a reference keyword.
pub(crate) const MAX_REFERENCE_KEYWORD_LENGTH: usize = 64;
/// Upper bound for `svnlook.max_listing_bytes`.
pub(crate) const MAX_LISTING_BYTES_LIMIT: usize = 64 * 1024 * 1024;
/// Upper bound for `svnlook.max_message_bytes`.
pub(crate) const MAX_MESSAGE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration of the commit gate.
///
/// # Invariants
/// - A value returned by [`GateConfig::load`] has passed [`GateConfig::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// `svnlook` binary and output limits.
    #[serde(default)]
    pub svnlook: SvnlookConfig,
    /// Collision signature configuration.
    #[serde(default)]
    pub collision: CollisionConfig,
    /// Diagnostic logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Repositories served by the gate.
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,
}

impl GateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_svnlook(&self.svnlook)?;
        self.collision.validate()?;
        self.logging.validate()?;
        if self.repositories.len() > MAX_REPOSITORIES {
            return Err(ConfigError::Invalid("too many repositories".to_string()));
        }
        let mut ids = BTreeSet::new();
        let mut paths = BTreeSet::new();
        for repository in &self.repositories {
            repository.validate()?;
            if !ids.insert(repository.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate repository id: {}",
                    repository.id
                )));
            }
            if !paths.insert(normalized_path(&repository.path)) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate repository path: {}",
                    repository.path
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Svnlook
// ============================================================================

/// Validates the `svnlook` section.
fn validate_svnlook(config: &SvnlookConfig) -> Result<(), ConfigError> {
    validate_path_string("svnlook.binary", &config.binary.to_string_lossy())?;
    if config.max_listing_bytes == 0 || config.max_listing_bytes > MAX_LISTING_BYTES_LIMIT {
        return Err(ConfigError::Invalid(format!(
            "svnlook.max_listing_bytes must be between 1 and {MAX_LISTING_BYTES_LIMIT}"
        )));
    }
    if config.max_message_bytes == 0 || config.max_message_bytes > MAX_MESSAGE_BYTES_LIMIT {
        return Err(ConfigError::Invalid(format!(
            "svnlook.max_message_bytes must be between 1 and {MAX_MESSAGE_BYTES_LIMIT}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Collision
// ============================================================================

/// Collision signature configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionConfig {
    /// Include the builtin signatures.
    #[serde(default = "default_builtin_signatures")]
    pub builtin_signatures: bool,
    /// Additional signatures.
    #[serde(default)]
    pub signatures: Vec<SignatureConfig>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            builtin_signatures: default_builtin_signatures(),
            signatures: Vec::new(),
        }
    }
}

impl CollisionConfig {
    /// Validates collision configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.signatures.len() > MAX_SIGNATURES {
            return Err(ConfigError::Invalid("too many collision signatures".to_string()));
        }
        for signature in &self.signatures {
            signature.digest()?;
        }
        Ok(())
    }
}

/// Default for `collision.builtin_signatures`.
const fn default_builtin_signatures() -> bool {
    true
}

/// One configured collision signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureConfig {
    /// Human-readable signature label.
    pub label: String,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Hex-encoded digest.
    pub digest: String,
}

impl SignatureConfig {
    /// Returns the validated digest.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the label or digest is malformed.
    pub fn digest(&self) -> Result<HashDigest, ConfigError> {
        let label = self.label.trim();
        if label.is_empty() || label.len() > MAX_SIGNATURE_LABEL_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "collision.signatures.label must be 1..={MAX_SIGNATURE_LABEL_LENGTH} characters"
            )));
        }
        HashDigest::from_hex(self.algorithm, self.digest.trim()).map_err(|err| {
            ConfigError::Invalid(format!("collision signature '{label}': {err}"))
        })
    }
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Diagnostic sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// Discard diagnostics.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: LogSinkKind,
    /// Log file path (required for `file`).
    #[serde(default)]
    pub path: Option<String>,
    /// Minimum level recorded.
    #[serde(default)]
    pub level: DiagnosticLevel,
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("logging.path", path)?;
        }
        if self.sink == LogSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid("logging.path is required for file sink".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Repositories
// ============================================================================

/// One repository served by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Non-zero repository identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Absolute filesystem path the hook receives.
    pub path: String,
    /// Immutable tag configuration.
    #[serde(default)]
    pub immutable_tags: ImmutableTagConfiguration,
    /// Commit message reference rules.
    #[serde(default)]
    pub references: ReferenceRules,
}

impl RepositoryConfig {
    /// Validates one repository entry.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.id == 0 {
            return Err(ConfigError::Invalid("repositories.id must be non-zero".to_string()));
        }
        let name = self.name.trim();
        if name.is_empty() || name.len() > MAX_REPOSITORY_NAME_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "repository {}: name must be 1..={MAX_REPOSITORY_NAME_LENGTH} characters",
                self.id
            )));
        }
        validate_path_string("repositories.path", &self.path)?;
        if !Path::new(self.path.trim()).is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "repository {}: path must be absolute",
                self.id
            )));
        }
        self.validate_tags()?;
        self.validate_references()
    }

    /// Validates pattern blocks and compiles them once.
    fn validate_tags(&self) -> Result<(), ConfigError> {
        let tags = &self.immutable_tags;
        for (field, lines) in [
            ("immutable_tags.paths", tags.path_lines().collect::<Vec<_>>()),
            ("immutable_tags.whitelist", tags.whitelist_lines().collect::<Vec<_>>()),
        ] {
            if lines.len() > MAX_PATTERN_LINES {
                return Err(ConfigError::Invalid(format!(
                    "repository {}: {field} exceeds {MAX_PATTERN_LINES} lines",
                    self.id
                )));
            }
            if lines.iter().any(|line| line.len() > MAX_PATTERN_LENGTH) {
                return Err(ConfigError::Invalid(format!(
                    "repository {}: {field} line exceeds {MAX_PATTERN_LENGTH} characters",
                    self.id
                )));
            }
        }
        TagPolicy::compile(tags)
            .map(|_| ())
            .map_err(|err| ConfigError::Invalid(format!("repository {}: {err}", self.id)))
    }

    /// Validates reference keywords.
    fn validate_references(&self) -> Result<(), ConfigError> {
        let keywords = &self.references.keywords;
        if keywords.len() > MAX_REFERENCE_KEYWORDS {
            return Err(ConfigError::Invalid(format!(
                "repository {}: too many reference keywords",
                self.id
            )));
        }
        for keyword in keywords {
            let valid = !keyword.is_empty()
                && keyword.len() <= MAX_REFERENCE_KEYWORD_LENGTH
                && keyword.starts_with(|c: char| c.is_ascii_alphabetic())
                && keyword.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "repository {}: invalid reference keyword '{keyword}'",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Returns a path rebuilt from its normal components, for duplicate detection.
pub(crate) fn normalized_path(value: &str) -> PathBuf {
    Path::new(value.trim())
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
