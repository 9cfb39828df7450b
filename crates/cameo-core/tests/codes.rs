// crates/cameo-core/tests/codes.rs
// ============================================================================
// Test Module: Codes, Segments, and Dates
// Coverage: Code validation, segment parsing, name normalization, intervals.
// ============================================================================
//! ## Overview
//! Integration tests for the value types the composer is built on.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use cameo_core::CodeError;
use cameo_core::CodingDate;
use cameo_core::DateRestriction;
use cameo_core::Scheme;
use cameo_core::Segment;
use cameo_core::normalize_name;
use cameo_core::validate;
use cameo_core::validate_with;
use support::TestResult;
use support::date;
use support::ensure;
use support::fixture_tables;

// ============================================================================
// SECTION: Code Validation
// ============================================================================

#[test]
fn validate_accepts_well_formed_codes() -> TestResult {
    let cases = [
        ("CHR", Scheme::Religion),
        ("CHROFF", Scheme::Religion),
        ("CHRPRO101", Scheme::Religion),
        ("PSEGOVFTA", Scheme::Actor),
        ("IGOUNO", Scheme::Actor),
        ("kur", Scheme::Ethnic),
    ];
    for (code, scheme) in cases {
        ensure(validate(code, scheme), format!("{code} should be valid for {scheme}"))?;
    }
    Ok(())
}

#[test]
fn validate_rejects_malformed_codes() -> TestResult {
    let cases = [
        ("", Scheme::Actor),
        ("CH", Scheme::Religion),
        ("CHRO", Scheme::Religion),
        ("CHRPROOFFNEW", Scheme::Religion),
        ("chroff", Scheme::Religion),
        ("KUR", Scheme::Ethnic),
        ("kurarb", Scheme::Ethnic),
        ("PSE001", Scheme::Actor),
        ("001CHR", Scheme::Religion),
        ("CHRPRO000", Scheme::Religion),
        ("CHR-PR", Scheme::Religion),
    ];
    for (code, scheme) in cases {
        ensure(!validate(code, scheme), format!("{code:?} should be invalid for {scheme}"))?;
    }
    Ok(())
}

#[test]
fn validate_with_uses_loaded_profiles() -> TestResult {
    let tables = fixture_tables();
    ensure(validate_with(&tables, "CHRPRO101", Scheme::Religion), "loaded profile admits")?;
    ensure(!validate_with(&tables, "kur", Scheme::Actor), "actor codes are uppercase")
}

// ============================================================================
// SECTION: Segments and Names
// ============================================================================

#[test]
fn segments_parse_labels_and_numbers() -> TestResult {
    ensure(Segment::parse("chr")?.canonical() == "CHR", "labels are uppercased")?;
    ensure(Segment::parse("007")? == Segment::Numeric(7), "numbers are parsed")?;
    ensure(Segment::numeric(7)?.canonical() == "007", "numbers are zero-padded")?;
    ensure(Segment::parse("A1B")?.canonical() == "A1B", "mixed labels stay labels")?;
    ensure(matches!(Segment::parse("CH"), Err(CodeError::InvalidLabel(_))), "short label")?;
    ensure(matches!(Segment::parse("7"), Err(CodeError::InvalidLabel(_))), "unpadded number")?;
    ensure(matches!(Segment::parse("000"), Err(CodeError::NumericRange(0))), "zero")?;
    ensure(matches!(Segment::numeric(1000), Err(CodeError::NumericRange(1000))), "too large")
}

#[test]
fn names_normalize_case_spacing_and_underscores() -> TestResult {
    ensure(
        normalize_name("  Palestine_Liberation   Organization ") == "palestine liberation organization",
        "collapsed and lowercased",
    )?;
    ensure(normalize_name("\tKURD\n") == "kurd", "trimmed")?;
    ensure(normalize_name("___").is_empty(), "only separators")
}

// ============================================================================
// SECTION: Dates
// ============================================================================

#[test]
fn dates_parse_full_and_month_forms() -> TestResult {
    ensure(date("1993-09") == date("1993-09-01"), "month form means the first")?;
    ensure(date("1993-09-13").to_string() == "1993-09-13", "display round trip")?;
    for bad in ["1993", "93-09-01", "1993-13-01", "1993-02-30", "1993-09-01-02", "soon"] {
        ensure(CodingDate::parse(bad).is_err(), format!("{bad} should be rejected"))?;
    }
    Ok(())
}

#[test]
fn restrictions_are_half_open() -> TestResult {
    let range = DateRestriction::new(Some(date("1990-01-01")), Some(date("1993-09-01")))?;
    ensure(range.contains(date("1990-01-01")), "start is inclusive")?;
    ensure(range.contains(date("1993-08-31")), "inside")?;
    ensure(!range.contains(date("1993-09-01")), "end is exclusive")?;
    ensure(!range.contains(date("1989-12-31")), "before")?;
    ensure(DateRestriction::new(Some(date("1993-09-01")), Some(date("1993-09-01"))).is_err(), "empty")
}

#[test]
fn restriction_overlap_and_intersection() -> TestResult {
    let split = date("1993-09-01");
    let before = DateRestriction::ending(split);
    let after = DateRestriction::starting(split);
    ensure(!before.overlaps(&after), "adjacent ranges are disjoint")?;
    ensure(before.overlaps(&DateRestriction::UNBOUNDED), "unbounded overlaps everything")?;
    ensure(before.intersect(&after).is_none(), "disjoint intersection is empty")?;

    let window = DateRestriction::new(Some(date("1990-01-01")), Some(date("2000-01-01")))?;
    let common = window.intersect(&after).unwrap();
    ensure(common.from() == Some(split), "later start wins")?;
    ensure(common.until() == Some(date("2000-01-01")), "earlier end wins")
}
