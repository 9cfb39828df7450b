// crates/cameo-config/tests/rows.rs
// ============================================================================
// Test Module: Reference Rows
// Coverage: Column parsing, date forms, prefix names, malformed lines.
// ============================================================================
//! ## Overview
//! Integration tests for tab-separated reference listings.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use cameo_config::LoadError;
use cameo_config::parse_reference_rows;
use cameo_core::MatchMode;
use cameo_core::Scheme;
use support::SAMPLE_ROWS;
use support::TestResult;
use support::date;
use support::ensure;

#[test]
fn sample_rows_parse_in_order() -> TestResult {
    let drafts = parse_reference_rows(SAMPLE_ROWS, Scheme::Actor, "actors.tsv")?;
    ensure(drafts.len() == 3, format!("expected 3 rows, got {}", drafts.len()))?;

    let before = &drafts[0];
    ensure(before.name == "Fatah" && before.code == "PALPLO", "first row is PALPLO")?;
    ensure(before.countries == vec!["PSE".to_string()], "countries column parsed")?;
    let restriction = before.restriction.ok_or("PALPLO should be dated")?;
    ensure(restriction.until() == Some(date("1993-09-01")), "'<' sets the until bound")?;
    ensure(restriction.from().is_none(), "'<' leaves from open")?;

    let after = drafts[1].restriction.ok_or("PSEGOVFTA should be dated")?;
    ensure(after.from() == Some(date("1993-09-01")), "'>' sets the from bound")?;

    let united = &drafts[2];
    ensure(united.name == "United Nations", "star is stripped from the name")?;
    ensure(united.match_mode == MatchMode::Prefix, "star marks a prefix entry")?;
    ensure(united.countries.is_empty(), "'-' means no countries")?;
    ensure(united.restriction.is_none(), "missing dates column means unrestricted")?;
    Ok(())
}

#[test]
fn range_and_open_ended_dates_parse() -> TestResult {
    let text = "Alpha\tAAA\t\t1990-01..2000-06-15\nBeta\tBBB\tUSA, GBR\t2001-01-01..\n";
    let drafts = parse_reference_rows(text, Scheme::Actor, "inline")?;
    let alpha = drafts[0].restriction.ok_or("range should be dated")?;
    ensure(alpha.from() == Some(date("1990-01-01")), "partial date means the first of the month")?;
    ensure(alpha.until() == Some(date("2000-06-15")), "range until parsed")?;
    let beta = drafts[1].restriction.ok_or("open range should be dated")?;
    ensure(beta.until().is_none(), "empty side of the range stays open")?;
    ensure(drafts[1].countries == vec!["USA".to_string(), "GBR".to_string()], "mixed separators")?;
    Ok(())
}

#[test]
fn comments_and_blank_lines_are_skipped() -> TestResult {
    let text = "\n# header\n   \nKurds\tkur\n";
    let drafts = parse_reference_rows(text, Scheme::Ethnic, "inline")?;
    ensure(drafts.len() == 1, "only the data row remains")?;
    ensure(drafts[0].scheme == Scheme::Ethnic, "scheme is taken from the caller")?;
    Ok(())
}

#[test]
fn malformed_rows_report_their_line() -> TestResult {
    let cases = [
        ("Alpha\n", "missing code column"),
        ("\tAAA\n", "missing name column"),
        ("Alpha\tAAA\t\tsoon\n", "unrecognized date column"),
        ("Alpha\tAAA\t\t2000-01-01..1990-01-01\n", "empty"),
        ("Alpha\tAAA\t\t\textra\n", "at most four"),
    ];
    for (text, needle) in cases {
        let input = format!("# comment\n{text}");
        match parse_reference_rows(&input, Scheme::Actor, "rows.tsv") {
            Err(LoadError::Row {
                line,
                message,
                ..
            }) => {
                ensure(line == 2, format!("expected line 2 for {text:?}, got {line}"))?;
                ensure(
                    message.contains(needle),
                    format!("expected {needle:?} in {message:?}"),
                )?;
            }
            other => return Err(format!("expected row error for {text:?}, got {other:?}").into()),
        }
    }
    Ok(())
}
