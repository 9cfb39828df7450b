// crates/cameo-core/src/runtime/validate.rs
// ============================================================================
// Module: Code Validation
// Description: Well-formedness checks for code text.
// Purpose: Let callers check externally supplied codes against a scheme.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Shape checks for code text that did not come from the composer: length,
//! charset, case, and numeric placement under a scheme profile.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::code::check_code;
use crate::core::scheme::Scheme;
use crate::core::scheme::SchemeProfile;
use crate::interfaces::CodeTables;

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Returns true when `code` is well formed under the scheme's conventional profile.
///
/// The code length must be a multiple of three within the scheme's segment
/// range, every character ASCII alphanumeric in the scheme's case, and an
/// all-digit segment may only occupy the trailing slot where allowed.
#[must_use]
pub fn validate(code: &str, scheme: Scheme) -> bool {
    check_code(code, &SchemeProfile::default_for(scheme)).is_ok()
}

/// Returns true when `code` is well formed under the profile loaded in `tables`.
///
/// Falls back to the conventional profile when the tables define none.
#[must_use]
pub fn validate_with<T: CodeTables + ?Sized>(tables: &T, code: &str, scheme: Scheme) -> bool {
    match tables.profile(scheme) {
        Some(profile) => check_code(code, profile).is_ok(),
        None => validate(code, scheme),
    }
}
