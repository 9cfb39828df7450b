// crates/cameo-core/src/core/reference.rs
// ============================================================================
// Module: Reference Entries
// Description: Pre-assigned name-to-code overrides and their date resolution.
// Purpose: Let curated codes take precedence over derived ones.
// Dependencies: crate::core::{code, date, identifiers, scheme}, serde
// ============================================================================

//! ## Overview
//! A [`ReferenceEntry`] pins a code to a name. Several entries may share a
//! name when the code changed over time; their restrictions never overlap.
//! Lookup returns the whole group as a [`ReferenceMatch`], and
//! [`ReferenceMatch::resolve`] picks the entry valid on the query date.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::code::Code;
use crate::core::date::CodingDate;
use crate::core::date::DateRestriction;
use crate::core::identifiers::EntryId;
use crate::core::scheme::Scheme;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// How an entry's name is matched against descriptor names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Normalized names must be equal.
    #[default]
    Exact,
    /// The descriptor name must start with the entry name.
    Prefix,
}

/// Curated code for a named entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    /// Stable identifier assigned at load.
    pub id: EntryId,
    /// Scheme of the code.
    pub scheme: Scheme,
    /// Name as authored.
    pub name: String,
    /// Normalized lookup key.
    pub key: String,
    /// Assigned code.
    pub code: Code,
    /// Countries the entry is recorded for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
    /// Dates over which the code applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<DateRestriction>,
    /// Name matching mode.
    pub match_mode: MatchMode,
}

impl ReferenceEntry {
    /// Returns true when the entry applies on `date`.
    #[must_use]
    pub fn admits(&self, date: CodingDate) -> bool {
        self.restriction.is_none_or(|restriction| restriction.contains(date))
    }
}

// ============================================================================
// SECTION: Matches
// ============================================================================

/// Why a reference group has no entry for the query date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateConflict {
    /// The date falls between the group's restrictions.
    Gap,
    /// No date was given but every entry is restricted.
    Undated,
    /// The date falls outside the descriptor's own applicability.
    OutsideApplicability,
    /// More than one entry admits the date.
    Overlap,
}

impl DateConflict {
    /// Returns the stable reason label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gap => "gap",
            Self::Undated => "undated",
            Self::OutsideApplicability => "outside_applicability",
            Self::Overlap => "overlap",
        }
    }
}

/// Entries sharing the name a lookup matched.
#[derive(Debug, Clone)]
pub struct ReferenceMatch<'a> {
    /// Normalized key that matched.
    pub key: &'a str,
    /// How the key matched.
    pub mode: MatchMode,
    /// Entries in load order.
    pub entries: Vec<&'a ReferenceEntry>,
}

impl<'a> ReferenceMatch<'a> {
    /// Picks the entry valid for the query date.
    ///
    /// # Errors
    ///
    /// Returns [`DateConflict::Gap`] when no entry admits the date,
    /// [`DateConflict::Undated`] for an undated query on a dated-only group,
    /// and [`DateConflict::Overlap`] when more than one entry qualifies.
    pub fn resolve(&self, as_of: Option<CodingDate>) -> Result<&'a ReferenceEntry, DateConflict> {
        let mut candidates = self.entries.iter().copied().filter(|entry| match as_of {
            Some(date) => entry.admits(date),
            None => entry.restriction.is_none_or(|restriction| restriction.is_unbounded()),
        });
        let first = candidates.next().ok_or(match as_of {
            Some(_) => DateConflict::Gap,
            None => DateConflict::Undated,
        })?;
        if candidates.next().is_some() {
            return Err(DateConflict::Overlap);
        }
        Ok(first)
    }
}
