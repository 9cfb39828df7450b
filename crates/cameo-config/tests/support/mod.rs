// crates/cameo-config/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and table sources for config tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, plus sample
//! table sources written into temporary directories.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use cameo_core::CodingDate;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across config integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

/// Parses a coding date.
pub fn date(text: &str) -> CodingDate {
    CodingDate::parse(text).expect("valid test date")
}

/// Writes a file under `dir` and returns its path.
pub fn write(dir: &Path, name: &str, content: &str) -> TestResult<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

// ========================================================================
// Sample Sources
// ========================================================================

/// Table file covering all three schemes.
pub const SAMPLE_TABLES: &str = r#"
[[rule_table]]
scheme = "religion"

[[rule_table]]
scheme = "religion"
prefix = "CHR"
allow_blank = true

[[rule_table]]
scheme = "religion"
prefix = "CHRPRO"
allow_blank = true

[[rule]]
scheme = "religion"
tier = "named"
segment = "CHR"
when = 'any(parent("Christianity"), parent("Protestant"), parent("Catholic"))'

[[rule]]
scheme = "religion"
prefix = "CHR"
tier = "named"
segment = "PRO"
when = 'parent("Protestant") && self_identifies'

[[rule]]
scheme = "religion"
prefix = "CHR"
tier = "offshoot"
segment = "OFF"
when = 'any(parent("Protestant"), parent("Catholic")) && !self_identifies'

[[rule]]
scheme = "religion"
prefix = "CHR"
tier = "new_movement"
segment = "NEW"
when = '!self_identifies'

[[rule]]
scheme = "religion"
prefix = "CHRPRO"
tier = "named"
segment = "101"
when = 'attribute("movement", "evangelical")'
note = "evangelical bodies"

[[rule_table]]
scheme = "ethnic"

[[rule]]
scheme = "ethnic"
tier = "named"
segment = "KUR"
when = 'name_contains("kurd")'

[[rule_table]]
scheme = "actor"

[[rule_table]]
scheme = "actor"
prefix = "PSE"
allow_blank = true

[[rule]]
scheme = "actor"
tier = "named"
segment = "PSE"
when = 'country("PSE")'

[[rule]]
scheme = "actor"
prefix = "PSE"
tier = "named"
segment = "GOV"
when = 'attribute("role", "government")'

[[reference]]
scheme = "religion"
name = "Church of Jesus Christ of Latter-day Saints"
code = "CHRLDS"
"#;

/// Actor reference rows.
pub const SAMPLE_ROWS: &str = "\
# Name\tCode\tCountries\tDates
Fatah\tPALPLO\tPSE\t<1993-09-01
Fatah\tPSEGOVFTA\tPSE\t>1993-09-01
United Nations*\tIGOUNO\t-
";
