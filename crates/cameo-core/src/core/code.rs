// crates/cameo-core/src/core/code.rs
// ============================================================================
// Module: CAMEO Codes and Segments
// Description: Three-character segments and the validated code newtype.
// Purpose: Keep every code the engine emits well-formed for its scheme.
// Dependencies: crate::core::scheme, serde, thiserror
// ============================================================================

//! ## Overview
//! Codes are concatenations of three-character segments. A segment is either
//! an alphanumeric label (`CHR`, `PRO`) or a number rendered zero-padded
//! (`7` becomes `007`). [`Code`] values only come from
//! [`Code::assemble`] or [`Code::parse`], both of which check the owning
//! scheme's [`SchemeProfile`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

use crate::core::scheme::SEGMENT_WIDTH;
use crate::core::scheme::SchemeProfile;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a segment or code is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Segment is not exactly three ASCII alphanumeric characters.
    #[error("invalid segment label: {0:?}")]
    InvalidLabel(String),
    /// Numeric segment outside `1..=999`.
    #[error("numeric segment out of range: {0}")]
    NumericRange(u32),
    /// Code length is not an admitted multiple of the segment width.
    #[error("code {code:?} has length {length}; allowed lengths {allowed:?}")]
    Length {
        /// Offending code text.
        code: String,
        /// Length in characters.
        length: usize,
        /// Admitted lengths.
        allowed: Vec<usize>,
    },
    /// Code contains a character outside ASCII alphanumerics.
    #[error("code {0:?} contains non-alphanumeric characters")]
    Charset(String),
    /// Code letters do not have the scheme's case.
    #[error("code {0:?} does not use the scheme's letter case")]
    Case(String),
    /// Numeric segment in a slot the scheme does not allow.
    #[error("code {code:?} has a numeric segment at position {index}")]
    NumericPlacement {
        /// Offending code text.
        code: String,
        /// Zero-based segment index.
        index: usize,
    },
}

// ============================================================================
// SECTION: Segments
// ============================================================================

/// Three-character alphanumeric label, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentLabel(String);

impl SegmentLabel {
    /// Creates a label from three ASCII alphanumeric characters.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::InvalidLabel`] when the text is not three ASCII
    /// alphanumerics or is entirely numeric.
    pub fn new(text: &str) -> Result<Self, CodeError> {
        let trimmed = text.trim();
        let well_formed = trimmed.len() == SEGMENT_WIDTH
            && trimmed.bytes().all(|byte| byte.is_ascii_alphanumeric())
            && !trimmed.bytes().all(|byte| byte.is_ascii_digit());
        if !well_formed {
            return Err(CodeError::InvalidLabel(text.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the canonical uppercase label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One code segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Alphanumeric label such as `CHR`.
    Label(SegmentLabel),
    /// Numeric value rendered zero-padded to three digits.
    Numeric(u16),
}

impl Segment {
    /// Parses a segment: three digits become numeric, anything else a label.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError`] when the text is neither a label nor `001..=999`.
    pub fn parse(text: &str) -> Result<Self, CodeError> {
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            if trimmed.len() != SEGMENT_WIDTH {
                return Err(CodeError::InvalidLabel(text.to_string()));
            }
            let value: u32 =
                trimmed.parse().map_err(|_| CodeError::InvalidLabel(text.to_string()))?;
            return Self::numeric(value);
        }
        SegmentLabel::new(trimmed).map(Self::Label)
    }

    /// Creates a numeric segment.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::NumericRange`] outside `1..=999`.
    pub fn numeric(value: u32) -> Result<Self, CodeError> {
        match u16::try_from(value) {
            Ok(small) if (1..=999).contains(&small) => Ok(Self::Numeric(small)),
            _ => Err(CodeError::NumericRange(value)),
        }
    }

    /// Returns true for numeric segments.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    /// Returns the canonical (uppercase, zero-padded) text.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Label(label) => label.as_str().to_string(),
            Self::Numeric(value) => format!("{value:03}"),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Segment {
    type Err = CodeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Codes
// ============================================================================

/// Complete code that satisfies its scheme profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Joins segments and renders them in the scheme's case.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError`] when the segment count or numeric placement does
    /// not fit the profile.
    pub fn assemble(segments: &[Segment], profile: &SchemeProfile) -> Result<Self, CodeError> {
        let joined: String = segments.iter().map(Segment::canonical).collect();
        let rendered = profile.case.apply(&joined);
        check_code(&rendered, profile)?;
        Ok(Self(rendered))
    }

    /// Parses and validates code text for a scheme.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError`] when the text violates the profile.
    pub fn parse(text: &str, profile: &SchemeProfile) -> Result<Self, CodeError> {
        check_code(text, profile)?;
        Ok(Self(text.to_string()))
    }

    /// Returns the code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.0.len() / SEGMENT_WIDTH
    }

    /// Iterates the three-character segments left to right.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        (0..self.segment_count()).filter_map(|index| {
            self.0.get(index * SEGMENT_WIDTH..(index + 1) * SEGMENT_WIDTH)
        })
    }

    /// Returns true when this code begins with `prefix` (case-insensitive).
    #[must_use]
    pub fn starts_with_prefix(&self, prefix: &str) -> bool {
        self.0.len() >= prefix.len()
            && self.0.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Checks code text against a scheme profile.
///
/// # Errors
///
/// Returns the first [`CodeError`] found: length, charset, case, then numeric
/// placement.
pub fn check_code(text: &str, profile: &SchemeProfile) -> Result<(), CodeError> {
    let length = text.len();
    if length == 0 || length % SEGMENT_WIDTH != 0 || !profile.admits_segment_count(length / SEGMENT_WIDTH)
    {
        return Err(CodeError::Length {
            code: text.to_string(),
            length,
            allowed: profile.allowed_lengths(),
        });
    }
    if !text.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
        return Err(CodeError::Charset(text.to_string()));
    }
    if !profile.case.admits(text) {
        return Err(CodeError::Case(text.to_string()));
    }
    for (index, chunk) in text.as_bytes().chunks(SEGMENT_WIDTH).enumerate() {
        let any_digit = chunk.iter().any(u8::is_ascii_digit);
        if !any_digit {
            continue;
        }
        let all_digits = chunk.iter().all(u8::is_ascii_digit);
        // Mixed labels like `A1B` are fine; only all-digit slots are numeric.
        if all_digits && !profile.admits_numeric_at(index) {
            return Err(CodeError::NumericPlacement {
                code: text.to_string(),
                index,
            });
        }
        if all_digits && chunk == b"000" {
            return Err(CodeError::NumericRange(0));
        }
    }
    Ok(())
}
