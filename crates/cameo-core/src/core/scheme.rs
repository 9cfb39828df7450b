// crates/cameo-core/src/core/scheme.rs
// ============================================================================
// Module: CAMEO Schemes
// Description: Coding schemes, entity kinds, and per-scheme code profiles.
// Purpose: Describe the shape every code of a scheme must have.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Three coding schemes share one composition engine: actor codes (states and
//! organizations), religion codes, and ethnic codes. Each scheme has a
//! [`SchemeProfile`] fixing the segment-count range, the letter case, and
//! whether a trailing numeric segment may appear. Profiles are loaded with the
//! tables; [`SchemeProfile::default_for`] supplies the conventional shapes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Character width of every code segment.
pub const SEGMENT_WIDTH: usize = 3;

/// Numeric values reserved for generic-tier qualifiers.
pub const GENERIC_BAND: NumericBand = NumericBand {
    start: 1,
    end: 99,
};

/// Numeric band for non-generic segments when a category declares none.
pub const DEFAULT_CATEGORY_BAND: NumericBand = NumericBand {
    start: 100,
    end: 999,
};

// ============================================================================
// SECTION: Schemes and Kinds
// ============================================================================

/// Coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Actor codes for states and organizations.
    Actor,
    /// Religion codes.
    Religion,
    /// Ethnic group codes.
    Ethnic,
}

impl Scheme {
    /// All schemes in declaration order.
    pub const ALL: [Self; 3] = [Self::Actor, Self::Religion, Self::Ethnic];

    /// Returns the stable scheme label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Religion => "religion",
            Self::Ethnic => "ethnic",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "actor" => Ok(Self::Actor),
            "religion" => Ok(Self::Religion),
            "ethnic" => Ok(Self::Ethnic),
            other => Err(format!("unknown scheme: {other}")),
        }
    }
}

/// Kind of entity being coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Sovereign state.
    State,
    /// Organization, party, or armed group.
    Organization,
    /// Ethnic group.
    EthnicGroup,
    /// Religious group or movement.
    ReligiousGroup,
}

impl EntityKind {
    /// Returns the scheme that codes this kind of entity.
    #[must_use]
    pub const fn scheme(self) -> Scheme {
        match self {
            Self::State | Self::Organization => Scheme::Actor,
            Self::EthnicGroup => Scheme::Ethnic,
            Self::ReligiousGroup => Scheme::Religion,
        }
    }

    /// Returns the stable kind label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Organization => "organization",
            Self::EthnicGroup => "ethnic_group",
            Self::ReligiousGroup => "religious_group",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "state" => Ok(Self::State),
            "organization" | "organisation" => Ok(Self::Organization),
            "ethnic_group" | "ethnic" => Ok(Self::EthnicGroup),
            "religious_group" | "religion" => Ok(Self::ReligiousGroup),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

// ============================================================================
// SECTION: Profiles
// ============================================================================

/// Letter case applied to every code of a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterCase {
    /// `CHRPRO`
    Upper,
    /// `kur`
    Lower,
}

impl LetterCase {
    /// Applies the case to ASCII text.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Upper => text.to_ascii_uppercase(),
            Self::Lower => text.to_ascii_lowercase(),
        }
    }

    /// Returns true when every letter in `text` already has this case.
    #[must_use]
    pub fn admits(self, text: &str) -> bool {
        match self {
            Self::Upper => !text.bytes().any(|byte| byte.is_ascii_lowercase()),
            Self::Lower => !text.bytes().any(|byte| byte.is_ascii_uppercase()),
        }
    }
}

/// Inclusive range of numeric segment values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericBand {
    /// First admitted value.
    pub start: u16,
    /// Last admitted value.
    pub end: u16,
}

impl NumericBand {
    /// Returns true when `value` lies in the band.
    #[must_use]
    pub const fn contains(self, value: u16) -> bool {
        value >= self.start && value <= self.end
    }
}

impl fmt::Display for NumericBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}-{:03}", self.start, self.end)
    }
}

/// Shape of valid codes for one scheme.
///
/// # Invariants
/// - `1 <= min_segments <= max_segments`.
/// - Category bands never overlap [`GENERIC_BAND`] and stay within `100..=999`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeProfile {
    /// Scheme described by the profile.
    pub scheme: Scheme,
    /// Fewest segments a complete code may have.
    pub min_segments: u8,
    /// Most segments a complete code may have.
    pub max_segments: u8,
    /// Letter case of rendered codes.
    pub case: LetterCase,
    /// Whether the final segment slot may hold a numeric value.
    #[serde(default)]
    pub numeric_suffix: bool,
    /// Numeric bands for non-generic segments keyed by the prefix they follow.
    #[serde(default)]
    pub bands: BTreeMap<String, NumericBand>,
}

impl SchemeProfile {
    /// Returns the conventional profile for a scheme.
    #[must_use]
    pub fn default_for(scheme: Scheme) -> Self {
        let (max_segments, case, numeric_suffix) = match scheme {
            Scheme::Actor => (3, LetterCase::Upper, false),
            Scheme::Religion => (3, LetterCase::Upper, true),
            Scheme::Ethnic => (1, LetterCase::Lower, false),
        };
        Self {
            scheme,
            min_segments: 1,
            max_segments,
            case,
            numeric_suffix,
            bands: BTreeMap::new(),
        }
    }

    /// Returns the admitted code lengths in characters.
    #[must_use]
    pub fn allowed_lengths(&self) -> Vec<usize> {
        (self.min_segments..=self.max_segments)
            .map(|count| usize::from(count) * SEGMENT_WIDTH)
            .collect()
    }

    /// Returns true when a code of `segments` segments fits the profile.
    #[must_use]
    pub const fn admits_segment_count(&self, segments: usize) -> bool {
        segments >= self.min_segments as usize && segments <= self.max_segments as usize
    }

    /// Returns the band for non-generic numeric segments following `prefix`.
    #[must_use]
    pub fn band_for(&self, prefix: &str) -> NumericBand {
        self.bands.get(prefix).copied().unwrap_or(DEFAULT_CATEGORY_BAND)
    }

    /// Returns true when a numeric segment may occupy slot `index` (zero-based).
    #[must_use]
    pub const fn admits_numeric_at(&self, index: usize) -> bool {
        self.numeric_suffix && index + 1 == self.max_segments as usize
    }

    /// Validates the profile's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_segments == 0 {
            return Err("min_segments must be at least 1".to_string());
        }
        if self.min_segments > self.max_segments {
            return Err(format!(
                "min_segments {} exceeds max_segments {}",
                self.min_segments, self.max_segments
            ));
        }
        if !self.bands.is_empty() && !self.numeric_suffix {
            return Err("numeric bands declared without numeric_suffix".to_string());
        }
        for (prefix, band) in &self.bands {
            let canonical = prefix.len() % SEGMENT_WIDTH == 0
                && prefix.bytes().all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit());
            if !canonical {
                return Err(format!("band key {prefix:?} must be an uppercase code prefix"));
            }
            if band.start > band.end {
                return Err(format!("band {band} for {prefix} is empty"));
            }
            if band.start <= GENERIC_BAND.end || band.end > DEFAULT_CATEGORY_BAND.end {
                return Err(format!(
                    "band {band} for {prefix} must lie within {DEFAULT_CATEGORY_BAND}"
                ));
            }
        }
        Ok(())
    }
}
