// crates/cameo-config/src/config.rs
// ============================================================================
// Module: CAMEO Configuration
// Description: Configuration loading and validation for the code composer.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: cameo-core, cameo-logic, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! It names the table sources to load, the composer switches, and the audit
//! sink. Relative table and audit paths resolve against the directory of the
//! config file. Invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use cameo_core::AuditSink;
use cameo_core::ComposerOptions;
use cameo_core::FileAuditSink;
use cameo_core::NoopAuditSink;
use cameo_core::Scheme;
use cameo_core::StderrAuditSink;
use cameo_core::TableLimits;
use cameo_core::TableSet;
use cameo_core::TiePolicy;
use cameo_logic::ValidationLimits;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::loader::DEFAULT_MAX_TABLE_BYTES;
use crate::loader::LoadError;
use crate::loader::TableLoader;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cameo.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CAMEO_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of table sources.
pub(crate) const MAX_TABLE_SOURCES: usize = 256;
/// Upper bound for `tables.max_table_bytes`.
pub(crate) const MAX_TABLE_BYTES_CEILING: usize = 64 * 1024 * 1024;
/// Upper bound for `tables.max_rules`.
pub(crate) const MAX_RULES_CEILING: usize = 1_048_576;
/// Upper bound for `tables.max_references`.
pub(crate) const MAX_REFERENCES_CEILING: usize = 4_194_304;
/// Upper bound for `tables.max_condition_depth`.
pub(crate) const MAX_CONDITION_DEPTH_CEILING: usize = 256;
/// Upper bound for `tables.max_condition_predicates`.
pub(crate) const MAX_CONDITION_PREDICATES_CEILING: usize = 4_096;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Top-level composer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameoConfig {
    /// Composer behavior switches.
    #[serde(default)]
    pub composer: ComposerConfig,
    /// Table sources and load limits.
    #[serde(default)]
    pub tables: TablesConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Directory relative paths resolve against.
    #[serde(skip)]
    pub source_dir: Option<PathBuf>,
}

/// `[composer]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Handling of equally specific rules.
    #[serde(default)]
    pub tie_policy: TiePolicy,
    /// Whether prefix-mode reference entries are consulted.
    #[serde(default = "default_prefix_matching")]
    pub prefix_matching: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            tie_policy: TiePolicy::default(),
            prefix_matching: default_prefix_matching(),
        }
    }
}

/// Reference-row file bound to a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRowsSource {
    /// Scheme the rows belong to.
    pub scheme: Scheme,
    /// Path to the tab-separated file.
    pub path: String,
}

/// `[tables]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesConfig {
    /// TOML table files, merged in order.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Tab-separated reference listings, merged after the table files.
    #[serde(default)]
    pub reference_rows: Vec<ReferenceRowsSource>,
    /// Seed conventional profiles for schemes without a declared one.
    #[serde(default = "default_true")]
    pub default_profiles: bool,
    /// Maximum size of one table source.
    #[serde(default = "default_max_table_bytes")]
    pub max_table_bytes: usize,
    /// Maximum rules per edition.
    #[serde(default = "default_max_rules")]
    pub max_rules: usize,
    /// Maximum reference entries per edition.
    #[serde(default = "default_max_references")]
    pub max_references: usize,
    /// Maximum condition nesting depth.
    #[serde(default = "default_max_condition_depth")]
    pub max_condition_depth: usize,
    /// Maximum predicate leaves per condition.
    #[serde(default = "default_max_condition_predicates")]
    pub max_condition_predicates: usize,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            reference_rows: Vec::new(),
            default_profiles: true,
            max_table_bytes: default_max_table_bytes(),
            max_rules: default_max_rules(),
            max_references: default_max_references(),
            max_condition_depth: default_max_condition_depth(),
            max_condition_predicates: default_max_condition_predicates(),
        }
    }
}

impl TablesConfig {
    /// Validates table sources and limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a source or limit is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sources = self.paths.len() + self.reference_rows.len();
        if sources == 0 {
            return Err(ConfigError::Invalid(
                "tables.paths or tables.reference_rows must name at least one source".to_string(),
            ));
        }
        if sources > MAX_TABLE_SOURCES {
            return Err(ConfigError::Invalid(format!(
                "tables sources exceed {MAX_TABLE_SOURCES} entries"
            )));
        }
        for path in &self.paths {
            validate_path_string("tables.paths", path)?;
        }
        for source in &self.reference_rows {
            validate_path_string("tables.reference_rows.path", &source.path)?;
        }
        check_range("tables.max_table_bytes", self.max_table_bytes, MAX_TABLE_BYTES_CEILING)?;
        check_range("tables.max_rules", self.max_rules, MAX_RULES_CEILING)?;
        check_range("tables.max_references", self.max_references, MAX_REFERENCES_CEILING)?;
        check_range(
            "tables.max_condition_depth",
            self.max_condition_depth,
            MAX_CONDITION_DEPTH_CEILING,
        )?;
        check_range(
            "tables.max_condition_predicates",
            self.max_condition_predicates,
            MAX_CONDITION_PREDICATES_CEILING,
        )?;
        Ok(())
    }

    /// Returns the builder limits described by this section.
    #[must_use]
    pub fn limits(&self) -> TableLimits {
        TableLimits {
            max_rules: self.max_rules,
            max_references: self.max_references,
            condition: ValidationLimits {
                max_depth: self.max_condition_depth,
                max_predicates: self.max_condition_predicates,
                ..ValidationLimits::default()
            },
        }
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Discard events.
    None,
}

/// `[audit]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates sink selection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the path does not fit the sink.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path only applies to the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl CameoConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source_dir = resolved.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tables.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the composer options.
    #[must_use]
    pub const fn composer_options(&self) -> ComposerOptions {
        ComposerOptions {
            tie_policy: self.composer.tie_policy,
            prefix_matching: self.composer.prefix_matching,
        }
    }

    /// Returns a table loader carrying the configured limits.
    #[must_use]
    pub fn table_loader(&self) -> TableLoader {
        TableLoader::new()
            .with_limits(self.tables.limits())
            .with_max_bytes(self.tables.max_table_bytes)
            .with_default_profiles(self.tables.default_profiles)
    }

    /// Loads and validates every configured table source as one edition.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when a source cannot be read or validated.
    pub fn load_tables(&self) -> Result<TableSet, LoadError> {
        let documents: Vec<PathBuf> =
            self.tables.paths.iter().map(|path| self.resolve(path)).collect();
        let rows: Vec<(Scheme, PathBuf)> = self
            .tables
            .reference_rows
            .iter()
            .map(|source| (source.scheme, self.resolve(&source.path)))
            .collect();
        self.table_loader().load_sources(&documents, &rows)
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        match (self.audit.sink, &self.audit.path) {
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(&self.resolve(path))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }

    /// Resolves a configured path against the config file directory.
    fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        match &self.source_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading config or opening a configured file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Validation error.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path using CLI and environment overrides.
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

/// Validates the resolved path against length limits.
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

/// Checks that a limit lies within `1..=ceiling`.
fn check_range(field: &str, value: usize, ceiling: usize) -> Result<(), ConfigError> {
    if value == 0 || value > ceiling {
        return Err(ConfigError::Invalid(format!("{field} must be between 1 and {ceiling}")));
    }
    Ok(())
}

/// Default for `composer.prefix_matching`.
const fn default_prefix_matching() -> bool {
    true
}

/// Serde default helper.
const fn default_true() -> bool {
    true
}

/// Default for `tables.max_table_bytes`.
const fn default_max_table_bytes() -> usize {
    DEFAULT_MAX_TABLE_BYTES
}

/// Default for `tables.max_rules`.
fn default_max_rules() -> usize {
    TableLimits::default().max_rules
}

/// Default for `tables.max_references`.
fn default_max_references() -> usize {
    TableLimits::default().max_references
}

/// Default for `tables.max_condition_depth`.
fn default_max_condition_depth() -> usize {
    ValidationLimits::default().max_depth
}

/// Default for `tables.max_condition_predicates`.
fn default_max_condition_predicates() -> usize {
    ValidationLimits::default().max_predicates
}
