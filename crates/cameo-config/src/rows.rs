// crates/cameo-config/src/rows.rs
// ============================================================================
// Module: Reference Rows
// Description: Tab-separated reference listings.
// Purpose: Load curated name-to-code tables kept in spreadsheet-style files.
// Dependencies: cameo-core
// ============================================================================

//! ## Overview
//! Curated reference listings are kept one entity per line:
//!
//! ```text
//! # Name<TAB>Code<TAB>Countries<TAB>Dates
//! Fatah	PALPLO	PSE	<1993-09-01
//! Fatah	PSEGOVFTA	PSE	>1993-09-01
//! United Nations*	IGOUNO
//! ```
//!
//! Countries are separated by commas or spaces (`-` for none). The date
//! column takes `<DATE` (valid before), `>DATE` (valid from), or
//! `FROM..UNTIL` with either side optional. A trailing `*` on the name makes
//! the entry a prefix match. Blank lines and `#` comments are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use cameo_core::CodingDate;
use cameo_core::DateRestriction;
use cameo_core::MatchMode;
use cameo_core::ReferenceDraft;
use cameo_core::Scheme;

use crate::loader::LoadError;

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses tab-separated reference rows for one scheme.
///
/// `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`LoadError::Row`] naming the first malformed line.
pub fn parse_reference_rows(
    text: &str,
    scheme: Scheme,
    origin: &str,
) -> Result<Vec<ReferenceDraft>, LoadError> {
    let mut drafts = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row_error = |message: String| LoadError::Row {
            origin: origin.to_string(),
            line: index + 1,
            message,
        };
        let mut fields = line.split('\t').map(str::trim);
        let raw_name = fields.next().unwrap_or_default();
        let code = fields.next().unwrap_or_default();
        let countries = fields.next().unwrap_or_default();
        let dates = fields.next().unwrap_or_default();
        if fields.next().is_some_and(|extra| !extra.is_empty()) {
            return Err(row_error("expected at most four tab-separated fields".to_string()));
        }
        if code.is_empty() {
            return Err(row_error("missing code column".to_string()));
        }
        let (name, match_mode) = match raw_name.strip_suffix('*') {
            Some(stem) => (stem.trim(), MatchMode::Prefix),
            None => (raw_name, MatchMode::Exact),
        };
        if name.is_empty() {
            return Err(row_error("missing name column".to_string()));
        }
        drafts.push(ReferenceDraft {
            scheme,
            name: name.to_string(),
            code: code.to_string(),
            countries: parse_countries(countries),
            restriction: parse_dates(dates).map_err(row_error)?,
            match_mode,
        });
    }
    Ok(drafts)
}

/// Splits the countries column.
fn parse_countries(field: &str) -> Vec<String> {
    if field == "-" {
        return Vec::new();
    }
    field
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|country| !country.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the dates column.
fn parse_dates(field: &str) -> Result<Option<DateRestriction>, String> {
    let field = field.trim();
    if field.is_empty() || field == "-" {
        return Ok(None);
    }
    let parse = |text: &str| CodingDate::parse(text).map_err(|err| err.to_string());
    let optional = |text: &str| {
        let text = text.trim();
        if text.is_empty() { Ok(None) } else { parse(text).map(Some) }
    };
    let restriction = if let Some(until) = field.strip_prefix('<') {
        DateRestriction::ending(parse(until)?)
    } else if let Some(from) = field.strip_prefix('>') {
        DateRestriction::starting(parse(from)?)
    } else if let Some((from, until)) = field.split_once("..") {
        DateRestriction::new(optional(from)?, optional(until)?).map_err(|err| err.to_string())?
    } else {
        return Err(format!("unrecognized date column {field:?}"));
    };
    Ok(Some(restriction))
}
