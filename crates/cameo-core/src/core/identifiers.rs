// crates/cameo-core/src/core/identifiers.rs
// ============================================================================
// Module: CAMEO Identifiers
// Description: Stable arena identifiers for loaded rules and reference entries.
// Purpose: Address table records by load-time ID instead of mutable position.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Rules and reference entries receive non-zero integer identifiers in file
//! order when a table set is built. Identifiers never change for a record
//! across editions, which is what lets an edition check confirm that a new
//! table set only appended records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU32;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identifier of a loaded coding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(NonZeroU32);

impl RuleId {
    /// Creates a rule identifier from a known non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU32) -> Self {
        Self(id)
    }

    /// Creates a rule identifier, returning `None` when the raw value is zero.
    #[must_use]
    pub fn from_raw(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// Identifier of a loaded reference entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(NonZeroU32);

impl EntryId {
    /// Creates an entry identifier from a known non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU32) -> Self {
        Self(id)
    }

    /// Creates an entry identifier, returning `None` when the raw value is zero.
    #[must_use]
    pub fn from_raw(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry#{}", self.0)
    }
}
