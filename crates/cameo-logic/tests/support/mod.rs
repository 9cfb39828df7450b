// crates/cameo-logic/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and mock predicates for condition tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions.

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

use cameo_logic::PredicateEval;
use cameo_logic::TriState;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across condition integration tests.
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

// ========================================================================
// Mock Predicates
// ========================================================================

/// Subject with known-true, known-false, and unknown flag bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    /// Bits known to be set.
    pub set: u8,
    /// Bits whose state is unknown.
    pub unknown: u8,
}

/// Predicate testing a single flag bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Bit(pub u8);

impl PredicateEval for Bit {
    type Subject<'a> = Flags;

    fn eval(&self, subject: &Flags) -> TriState {
        let mask = 1u8 << self.0;
        if subject.unknown & mask != 0 {
            TriState::Unknown
        } else {
            (subject.set & mask != 0).into()
        }
    }
}

/// Builds a subject with the given set bits and no unknowns.
pub const fn flags(set: u8) -> Flags {
    Flags {
        set,
        unknown: 0,
    }
}
