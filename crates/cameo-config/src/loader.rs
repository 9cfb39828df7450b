// crates/cameo-config/src/loader.rs
// ============================================================================
// Module: Table Loader
// Description: TOML table files and reference rows into validated editions.
// Purpose: Turn authored table sources into a single fail-closed `TableSet`.
// Dependencies: cameo-core, cameo-logic, serde, toml
// ============================================================================

//! ## Overview
//! Table files declare profiles, rule tables, rules, and reference entries:
//!
//! ```toml
//! [[rule_table]]
//! scheme = "religion"
//! prefix = "CHR"
//! allow_blank = true
//!
//! [[rule]]
//! scheme = "religion"
//! prefix = "CHR"
//! tier = "named"
//! segment = "PRO"
//! when = 'all(parent("Protestant"), self_identifies)'
//! ```
//!
//! Every source is read with a byte limit, parsed, and merged into one
//! [`TableSetBuilder`] in the order given; nothing is published unless the
//! whole set validates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cameo_core::CodingDate;
use cameo_core::DateRestriction;
use cameo_core::EntityPredicateResolver;
use cameo_core::MatchMode;
use cameo_core::ReferenceDraft;
use cameo_core::RuleDraft;
use cameo_core::RuleTableDraft;
use cameo_core::RuleTier;
use cameo_core::Scheme;
use cameo_core::SchemeProfile;
use cameo_core::Segment;
use cameo_core::TableError;
use cameo_core::TableLimits;
use cameo_core::TableSet;
use cameo_core::TableSetBuilder;
use cameo_logic::ConditionValidator;
use cameo_logic::parse_condition_with;
use serde::Deserialize;
use thiserror::Error;

use crate::rows::parse_reference_rows;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum size of a single table source in bytes.
pub const DEFAULT_MAX_TABLE_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while reading or validating table sources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source could not be read.
    #[error("table io error for {path}: {message}")]
    Io {
        /// Source path.
        path: String,
        /// Underlying error text.
        message: String,
    },
    /// Source exceeded the byte limit.
    #[error("table source {origin} exceeds {max} bytes")]
    TooLarge {
        /// Source name.
        origin: String,
        /// Maximum accepted size.
        max: usize,
    },
    /// Source was not valid TOML for the table format.
    #[error("table parse error in {origin}: {message}")]
    Parse {
        /// Source name.
        origin: String,
        /// Parser message.
        message: String,
    },
    /// A rule condition failed to parse or validate.
    #[error("invalid condition for {prefix:?}+{segment} in {origin}: {message}")]
    Condition {
        /// Source name.
        origin: String,
        /// Table prefix of the rule.
        prefix: String,
        /// Segment the rule would append.
        segment: String,
        /// DSL error text.
        message: String,
    },
    /// A date pair did not form a valid interval.
    #[error("invalid dates in {origin}: {message}")]
    Dates {
        /// Source name.
        origin: String,
        /// Interval error text.
        message: String,
    },
    /// A reference row was malformed.
    #[error("invalid reference row {origin}:{line}: {message}")]
    Row {
        /// Source name.
        origin: String,
        /// One-based line number.
        line: usize,
        /// Failure description.
        message: String,
    },
    /// The merged declarations failed validation.
    #[error(transparent)]
    Table(#[from] TableError),
}

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// One table file.
#[derive(Debug, Default, Deserialize)]
struct TableDocument {
    /// Scheme profiles.
    #[serde(default)]
    scheme: Vec<SchemeProfile>,
    /// Rule table declarations.
    #[serde(default)]
    rule_table: Vec<RuleTableRecord>,
    /// Rules in priority order.
    #[serde(default)]
    rule: Vec<RuleRecord>,
    /// Curated reference entries.
    #[serde(default)]
    reference: Vec<ReferenceRecord>,
}

/// `[[rule_table]]`
#[derive(Debug, Deserialize)]
struct RuleTableRecord {
    /// Owning scheme.
    scheme: Scheme,
    /// Prefix the table extends; empty for the root.
    #[serde(default)]
    prefix: String,
    /// Whether the code may stop here.
    #[serde(default)]
    allow_blank: bool,
}

/// `[[rule]]`
#[derive(Debug, Deserialize)]
struct RuleRecord {
    /// Owning scheme.
    scheme: Scheme,
    /// Table prefix; empty for the root.
    #[serde(default)]
    prefix: String,
    /// Priority tier.
    tier: RuleTier,
    /// Segment appended on a win.
    segment: Segment,
    /// Condition DSL.
    when: String,
    /// Explicit specificity.
    #[serde(default)]
    specificity: Option<u32>,
    /// First date the rule applies.
    #[serde(default)]
    from: Option<CodingDate>,
    /// First date the rule no longer applies.
    #[serde(default)]
    until: Option<CodingDate>,
    /// Editorial note.
    #[serde(default)]
    note: Option<String>,
}

/// `[[reference]]`
#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    /// Owning scheme.
    scheme: Scheme,
    /// Entity name.
    name: String,
    /// Curated code.
    code: String,
    /// Countries the entry is recorded for.
    #[serde(default)]
    countries: Vec<String>,
    /// First date the code applies.
    #[serde(default)]
    from: Option<CodingDate>,
    /// First date the code no longer applies.
    #[serde(default)]
    until: Option<CodingDate>,
    /// Exact or prefix name matching.
    #[serde(default, rename = "match")]
    match_mode: MatchMode,
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Reads table sources into a validated [`TableSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLoader {
    /// Limits handed to the builder.
    limits: TableLimits,
    /// Maximum bytes per source.
    max_bytes: usize,
    /// Seed conventional profiles for schemes without a declared one.
    default_profiles: bool,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            limits: TableLimits::default(),
            max_bytes: DEFAULT_MAX_TABLE_BYTES,
            default_profiles: true,
        }
    }
}

impl TableLoader {
    /// Creates a loader with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets builder limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: TableLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the per-source byte limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Enables or disables conventional profile seeding.
    #[must_use]
    pub const fn with_default_profiles(mut self, enabled: bool) -> Self {
        self.default_profiles = enabled;
        self
    }

    /// Loads a single table document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the document fails to parse or validate.
    pub fn load_str(&self, content: &str) -> Result<TableSet, LoadError> {
        let mut builder = TableSetBuilder::with_limits(self.limits);
        self.add_document(&mut builder, content, "<inline>")?;
        self.finish(builder)
    }

    /// Loads a single table file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file cannot be read or fails validation.
    pub fn load_path(&self, path: &Path) -> Result<TableSet, LoadError> {
        self.load_sources(&[path.to_path_buf()], &[])
    }

    /// Loads table files followed by reference-row files into one edition.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] for the first source that fails, or when the
    /// merged declarations fail validation.
    pub fn load_sources(
        &self,
        documents: &[PathBuf],
        rows: &[(Scheme, PathBuf)],
    ) -> Result<TableSet, LoadError> {
        let mut builder = TableSetBuilder::with_limits(self.limits);
        for path in documents {
            let content = self.read_source(path)?;
            self.add_document(&mut builder, &content, &path.display().to_string())?;
        }
        for (scheme, path) in rows {
            let content = self.read_source(path)?;
            for draft in parse_reference_rows(&content, *scheme, &path.display().to_string())? {
                builder.reference(draft);
            }
        }
        self.finish(builder)
    }

    /// Reads a source file within the byte limit.
    fn read_source(&self, path: &Path) -> Result<String, LoadError> {
        let origin = path.display().to_string();
        let io_error = |err: std::io::Error| LoadError::Io {
            path: origin.clone(),
            message: err.to_string(),
        };
        let size = fs::metadata(path).map_err(io_error)?.len();
        if !usize::try_from(size).is_ok_and(|size| size <= self.max_bytes) {
            return Err(LoadError::TooLarge {
                origin,
                max: self.max_bytes,
            });
        }
        let bytes = fs::read(path).map_err(io_error)?;
        String::from_utf8(bytes).map_err(|_| LoadError::Parse {
            origin: origin.clone(),
            message: "table source must be utf-8".to_string(),
        })
    }

    /// Parses one document and queues its declarations.
    fn add_document(
        &self,
        builder: &mut TableSetBuilder,
        content: &str,
        origin: &str,
    ) -> Result<(), LoadError> {
        if content.len() > self.max_bytes {
            return Err(LoadError::TooLarge {
                origin: origin.to_string(),
                max: self.max_bytes,
            });
        }
        let document: TableDocument = toml::from_str(content).map_err(|err| LoadError::Parse {
            origin: origin.to_string(),
            message: err.to_string(),
        })?;

        for profile in document.scheme {
            builder.profile(profile);
        }
        for table in document.rule_table {
            builder.rule_table(RuleTableDraft {
                scheme: table.scheme,
                prefix: table.prefix,
                allow_blank: table.allow_blank,
            });
        }
        let validator = ConditionValidator::new(self.limits.condition);
        for record in document.rule {
            let condition = parse_condition_with(&record.when, &EntityPredicateResolver, &validator)
                .map_err(|err| LoadError::Condition {
                    origin: origin.to_string(),
                    prefix: record.prefix.clone(),
                    segment: record.segment.to_string(),
                    message: err.to_string(),
                })?;
            builder.rule(RuleDraft {
                scheme: record.scheme,
                restriction: restriction(record.from, record.until, origin)?,
                prefix: record.prefix,
                tier: record.tier,
                segment: record.segment,
                condition,
                specificity: record.specificity,
                source: record.when,
                note: record.note,
            });
        }
        for record in document.reference {
            builder.reference(ReferenceDraft {
                scheme: record.scheme,
                restriction: restriction(record.from, record.until, origin)?,
                name: record.name,
                code: record.code,
                countries: record.countries,
                match_mode: record.match_mode,
            });
        }
        Ok(())
    }

    /// Seeds default profiles and validates the merged declarations.
    fn finish(&self, mut builder: TableSetBuilder) -> Result<TableSet, LoadError> {
        if self.default_profiles {
            for scheme in builder.schemes_in_use() {
                if !builder.has_profile(scheme) {
                    builder.profile(SchemeProfile::default_for(scheme));
                }
            }
        }
        Ok(builder.build()?)
    }
}

/// Builds an optional restriction from authored bounds.
fn restriction(
    from: Option<CodingDate>,
    until: Option<CodingDate>,
    origin: &str,
) -> Result<Option<DateRestriction>, LoadError> {
    if from.is_none() && until.is_none() {
        return Ok(None);
    }
    DateRestriction::new(from, until).map(Some).map_err(|err| LoadError::Dates {
        origin: origin.to_string(),
        message: err.to_string(),
    })
}
