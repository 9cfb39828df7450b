// crates/cameo-core/src/runtime/composer.rs
// ============================================================================
// Module: Code Composer
// Description: Reference lookup and tiered rule evaluation into a code.
// Purpose: Compose one code per entity, deterministically, from immutable tables.
// Dependencies: crate::{core, interfaces}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`CodeComposer::compose`] turns an [`EntityDescriptor`] into a
//! [`ComposedCode`]:
//!
//! 1. resolve the scheme from the descriptor kind;
//! 2. return a curated reference code when the name has one;
//! 3. otherwise walk rule tables from the root, choosing one segment per
//!    table by tier, then specificity, until no subdivision table remains,
//!    a blank is allowed, or the scheme's segment limit is reached;
//! 4. assemble the segments and check the result against the scheme profile.
//!
//! Composition never mutates the tables and never reads the clock, so the
//! same tables, descriptor, and date always give the same result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::code::Code;
use crate::core::code::CodeError;
use crate::core::code::Segment;
use crate::core::date::CodingDate;
use crate::core::date::DateRestriction;
use crate::core::descriptor::EntityDescriptor;
use crate::core::identifiers::EntryId;
use crate::core::identifiers::RuleId;
use crate::core::reference::DateConflict;
use crate::core::reference::MatchMode;
use crate::core::rule::Rule;
use crate::core::rule::RuleTier;
use crate::core::scheme::EntityKind;
use crate::core::scheme::Scheme;
use crate::interfaces::CodeTables;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Handling of equally specific matching rules that disagree on the segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePolicy {
    /// Report [`ComposeError::AmbiguousRule`].
    #[default]
    Surface,
    /// Pick the rule declared first.
    FirstDeclared,
}

/// Composer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerOptions {
    /// Tie handling within a tier.
    pub tie_policy: TiePolicy,
    /// Whether prefix-mode reference entries are consulted.
    pub prefix_matching: bool,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            tie_policy: TiePolicy::Surface,
            prefix_matching: true,
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Where a composed code came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    /// Curated reference entry.
    Reference {
        /// Entry that supplied the code.
        entry: EntryId,
        /// How the name matched.
        mode: MatchMode,
    },
    /// Rule evaluation, one rule per segment.
    Derived {
        /// Winning rules, left to right.
        rules: Vec<RuleId>,
    },
}

impl Provenance {
    /// Returns the stable provenance label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reference {
                ..
            } => "reference",
            Self::Derived {
                ..
            } => "derived",
        }
    }
}

/// Output of a successful composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedCode {
    /// Composed code.
    pub code: Code,
    /// Scheme of the code.
    pub scheme: Scheme,
    /// Dates over which the code holds, when restricted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<DateRestriction>,
    /// Source of the code.
    pub provenance: Provenance,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Composition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// No rule in any tier matched and no blank is allowed.
    #[error("no matching rule for {scheme} prefix {prefix:?}")]
    NoMatchingRule {
        /// Scheme being composed.
        scheme: Scheme,
        /// Prefix built so far.
        prefix: String,
    },
    /// Equally specific rules disagree on the segment.
    #[error("ambiguous {tier} rules for {scheme} prefix {prefix:?}: {candidates:?}")]
    AmbiguousRule {
        /// Scheme being composed.
        scheme: Scheme,
        /// Prefix built so far.
        prefix: String,
        /// Tier where the tie occurred.
        tier: RuleTier,
        /// Tied rules in declaration order.
        candidates: Vec<RuleId>,
    },
    /// Assembled code does not fit the scheme's segment-count range.
    #[error("code {code:?} has length {length}; {scheme} allows {allowed:?}")]
    InvalidCodeLength {
        /// Scheme being composed.
        scheme: Scheme,
        /// Assembled code text.
        code: String,
        /// Length in characters.
        length: usize,
        /// Admitted lengths.
        allowed: Vec<usize>,
    },
    /// Tables define no profile for the kind's scheme.
    #[error("no {scheme} scheme loaded for entity kind {kind}")]
    UnknownScheme {
        /// Descriptor kind.
        kind: EntityKind,
        /// Scheme the kind maps to.
        scheme: Scheme,
    },
    /// The query date cannot be reconciled with the applicable restrictions.
    #[error("date restriction conflict for {name:?} ({}) as of {}", .reason.as_str(), display_date(.as_of))]
    DateRestrictionConflict {
        /// Descriptor name.
        name: String,
        /// Conflict reason.
        reason: DateConflict,
        /// Query date.
        as_of: Option<CodingDate>,
    },
}

/// Renders an optional date for error messages.
fn display_date(date: &Option<CodingDate>) -> String {
    date.map_or_else(|| "undated".to_string(), |date| date.to_string())
}

impl ComposeError {
    /// Returns the stable error label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NoMatchingRule {
                ..
            } => "no_matching_rule",
            Self::AmbiguousRule {
                ..
            } => "ambiguous_rule",
            Self::InvalidCodeLength {
                ..
            } => "invalid_code_length",
            Self::UnknownScheme {
                ..
            } => "unknown_scheme",
            Self::DateRestrictionConflict {
                ..
            } => "date_restriction_conflict",
        }
    }
}

// ============================================================================
// SECTION: Composer
// ============================================================================

/// Composes codes from a set of code tables.
#[derive(Debug, Clone)]
pub struct CodeComposer<T> {
    /// Tables consulted for every call.
    tables: T,
    /// Behavior switches.
    options: ComposerOptions,
}

impl<T: CodeTables> CodeComposer<T> {
    /// Creates a composer with default options.
    #[must_use]
    pub fn new(tables: T) -> Self {
        Self::with_options(tables, ComposerOptions::default())
    }

    /// Creates a composer with explicit options.
    #[must_use]
    pub const fn with_options(tables: T, options: ComposerOptions) -> Self {
        Self {
            tables,
            options,
        }
    }

    /// Returns the tables.
    pub const fn tables(&self) -> &T {
        &self.tables
    }

    /// Returns the options.
    pub const fn options(&self) -> ComposerOptions {
        self.options
    }

    /// Composes the code for a descriptor as of an optional date.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] when the scheme is not loaded, the date
    /// conflicts with a restriction, no rule matches, rules tie, or the
    /// assembled code is malformed.
    pub fn compose(
        &self,
        descriptor: &EntityDescriptor,
        as_of: Option<CodingDate>,
    ) -> Result<ComposedCode, ComposeError> {
        let scheme = descriptor.scheme();
        let profile = self.tables.profile(scheme).ok_or(ComposeError::UnknownScheme {
            kind: descriptor.kind,
            scheme,
        })?;
        let conflict = |reason| ComposeError::DateRestrictionConflict {
            name: descriptor.name.clone(),
            reason,
            as_of,
        };
        if let (Some(window), Some(date)) = (&descriptor.applicability, as_of)
            && !window.contains(date)
        {
            return Err(conflict(DateConflict::OutsideApplicability));
        }

        if let Some(found) =
            self.tables.find_by_name(scheme, &descriptor.name, self.options.prefix_matching)
        {
            let entry = found.resolve(as_of).map_err(conflict)?;
            return Ok(ComposedCode {
                code: entry.code.clone(),
                scheme,
                restriction: entry.restriction,
                provenance: Provenance::Reference {
                    entry: entry.id,
                    mode: found.mode,
                },
            });
        }

        let mut segments: Vec<Segment> = Vec::new();
        let mut rules = Vec::new();
        let mut prefix = String::new();
        let mut restriction: Option<DateRestriction> = None;
        while segments.len() < usize::from(profile.max_segments) {
            let Some(table) = self.tables.rule_table(scheme, &prefix) else {
                break;
            };
            match self.select(scheme, &prefix, descriptor, as_of)? {
                Some(rule) => {
                    prefix.push_str(&rule.segment.canonical());
                    segments.push(rule.segment.clone());
                    rules.push(rule.id);
                    if let Some(window) = rule.restriction {
                        restriction = match restriction {
                            Some(current) => current.intersect(&window),
                            None => Some(window),
                        };
                    }
                }
                None if table.allow_blank && !segments.is_empty() => break,
                None => {
                    return Err(ComposeError::NoMatchingRule {
                        scheme,
                        prefix,
                    });
                }
            }
        }
        if segments.is_empty() {
            return Err(ComposeError::NoMatchingRule {
                scheme,
                prefix,
            });
        }

        let code = Code::assemble(&segments, profile).map_err(|err| match err {
            CodeError::Length {
                code,
                length,
                allowed,
            } => ComposeError::InvalidCodeLength {
                scheme,
                code,
                length,
                allowed,
            },
            _ => ComposeError::InvalidCodeLength {
                scheme,
                length: prefix.len(),
                allowed: profile.allowed_lengths(),
                code: prefix.clone(),
            },
        })?;
        Ok(ComposedCode {
            code,
            scheme,
            restriction,
            provenance: Provenance::Derived {
                rules,
            },
        })
    }

    /// Chooses the winning rule of the table extending `prefix`.
    ///
    /// Returns `Ok(None)` when no rule in any tier matches.
    fn select(
        &self,
        scheme: Scheme,
        prefix: &str,
        descriptor: &EntityDescriptor,
        as_of: Option<CodingDate>,
    ) -> Result<Option<&Rule>, ComposeError> {
        for tier in RuleTier::ORDER {
            let matching: Vec<&Rule> = self
                .tables
                .rules_for_tier(scheme, prefix, tier)
                .iter()
                .filter(|rule| rule.is_active(as_of) && rule.condition.matches(descriptor))
                .collect();
            let Some(top) = matching.iter().map(|rule| rule.specificity).max() else {
                continue;
            };
            let leaders: Vec<&Rule> =
                matching.into_iter().filter(|rule| rule.specificity == top).collect();
            let Some(first) = leaders.first().copied() else {
                continue;
            };
            let unanimous = leaders.iter().all(|rule| rule.segment == first.segment);
            if unanimous || self.options.tie_policy == TiePolicy::FirstDeclared {
                return Ok(Some(first));
            }
            return Err(ComposeError::AmbiguousRule {
                scheme,
                prefix: prefix.to_string(),
                tier,
                candidates: leaders.iter().map(|rule| rule.id).collect(),
            });
        }
        Ok(None)
    }
}
