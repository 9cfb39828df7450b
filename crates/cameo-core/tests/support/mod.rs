// crates/cameo-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Result helpers and a representative table fixture.
// ============================================================================
//! ## Overview
//! Shared helpers for composer, table, and registry tests. The fixture
//! covers all three schemes: dated actor references, religion rule tables
//! with subdivisions and numeric qualifiers, and ethnic rules.

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
use std::sync::Mutex;

use cameo_core::AuditSink;
use cameo_core::CodingDate;
use cameo_core::ComposeAuditEvent;
use cameo_core::DateRestriction;
use cameo_core::EntityPredicateResolver;
use cameo_core::MatchMode;
use cameo_core::ReferenceDraft;
use cameo_core::RuleDraft;
use cameo_core::RuleTableDraft;
use cameo_core::RuleTier;
use cameo_core::Scheme;
use cameo_core::SchemeProfile;
use cameo_core::Segment;
use cameo_core::TableSet;
use cameo_core::TableSetBuilder;
use cameo_core::TablesPublishedEvent;
use cameo_logic::parse_condition;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
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
// Draft Builders
// ========================================================================

/// Parses a date literal.
pub fn date(text: &str) -> CodingDate {
    CodingDate::parse(text).unwrap()
}

/// Declares a rule table.
pub fn table(scheme: Scheme, prefix: &str, allow_blank: bool) -> RuleTableDraft {
    RuleTableDraft {
        scheme,
        prefix: prefix.to_string(),
        allow_blank,
    }
}

/// Declares a rule with a DSL condition.
pub fn rule(scheme: Scheme, prefix: &str, tier: RuleTier, segment: &str, when: &str) -> RuleDraft {
    RuleDraft {
        scheme,
        prefix: prefix.to_string(),
        tier,
        segment: Segment::parse(segment).unwrap(),
        condition: parse_condition(when, &EntityPredicateResolver).unwrap(),
        specificity: None,
        restriction: None,
        source: when.to_string(),
        note: None,
    }
}

/// Declares an exact-match reference entry.
pub fn reference(
    scheme: Scheme,
    name: &str,
    code: &str,
    restriction: Option<DateRestriction>,
) -> ReferenceDraft {
    ReferenceDraft {
        scheme,
        name: name.to_string(),
        code: code.to_string(),
        countries: Vec::new(),
        restriction,
        match_mode: MatchMode::Exact,
    }
}

// ========================================================================
// Fixture Tables
// ========================================================================

/// Builder preloaded with the fixture declarations.
pub fn fixture_builder() -> TableSetBuilder {
    let mut builder = TableSetBuilder::new();
    for scheme in Scheme::ALL {
        builder.profile(SchemeProfile::default_for(scheme));
    }

    // Actor: curated references plus a country-driven root.
    let fatah_split = date("1993-09-01");
    builder
        .reference(reference(
            Scheme::Actor,
            "Fatah",
            "PALPLO",
            Some(DateRestriction::ending(fatah_split)),
        ))
        .reference(reference(
            Scheme::Actor,
            "Fatah",
            "PSEGOVFTA",
            Some(DateRestriction::starting(fatah_split)),
        ))
        .reference(ReferenceDraft {
            match_mode: MatchMode::Prefix,
            ..reference(Scheme::Actor, "United Nations", "IGOUNO", None)
        })
        .rule_table(table(Scheme::Actor, "", false))
        .rule_table(table(Scheme::Actor, "PSE", true))
        .rule(rule(Scheme::Actor, "", RuleTier::Named, "PSE", r#"country("PSE")"#))
        .rule(rule(Scheme::Actor, "", RuleTier::Named, "USA", r#"country("USA")"#))
        .rule(rule(
            Scheme::Actor,
            "PSE",
            RuleTier::Named,
            "GOV",
            r#"attribute("role", "government")"#,
        ))
        .rule(rule(Scheme::Actor, "PSE", RuleTier::Family, "REB", r#"attribute("role", "rebel")"#));

    // Religion: root traditions, Christian subdivisions, numeric qualifiers.
    builder
        .reference(reference(
            Scheme::Religion,
            "Church of Jesus Christ of Latter-day Saints",
            "CHRLDS",
            None,
        ))
        .rule_table(table(Scheme::Religion, "", false))
        .rule_table(table(Scheme::Religion, "CHR", true))
        .rule_table(table(Scheme::Religion, "CHRPRO", true))
        .rule(rule(
            Scheme::Religion,
            "",
            RuleTier::Named,
            "CHR",
            r#"any(parent("Christianity"), parent("Protestant"), parent("Catholic"), parent("Orthodox"))"#,
        ))
        .rule(rule(
            Scheme::Religion,
            "",
            RuleTier::Named,
            "MOS",
            r#"any(parent("Islam"), parent("Sunni"), parent("Shia"))"#,
        ))
        .rule(rule(Scheme::Religion, "", RuleTier::Named, "JEW", r#"parent("Judaism")"#))
        .rule(rule(
            Scheme::Religion,
            "",
            RuleTier::Generic(cameo_core::GenericModifier::NewMovement),
            "NRM",
            r#"attribute("origin", "modern")"#,
        ))
        .rule(rule(
            Scheme::Religion,
            "CHR",
            RuleTier::Named,
            "PRO",
            r#"parent("Protestant") && self_identifies"#,
        ))
        .rule(rule(
            Scheme::Religion,
            "CHR",
            RuleTier::Named,
            "CTH",
            r#"parent("Catholic") && self_identifies"#,
        ))
        .rule(rule(
            Scheme::Religion,
            "CHR",
            RuleTier::Generic(cameo_core::GenericModifier::Offshoot),
            "OFF",
            r#"any(parent("Protestant"), parent("Catholic"), parent("Orthodox")) && !self_identifies"#,
        ))
        .rule(rule(
            Scheme::Religion,
            "CHR",
            RuleTier::Generic(cameo_core::GenericModifier::NewMovement),
            "NEW",
            "!self_identifies",
        ))
        .rule(rule(
            Scheme::Religion,
            "CHRPRO",
            RuleTier::Named,
            "101",
            r#"attribute("movement", "evangelical")"#,
        ))
        .rule(rule(
            Scheme::Religion,
            "CHRPRO",
            RuleTier::Generic(cameo_core::GenericModifier::NewMovement),
            "005",
            r#"attribute("movement", "charismatic")"#,
        ));

    // Ethnic: lowercase single-segment codes.
    builder
        .rule_table(table(Scheme::Ethnic, "", false))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", r#"name_contains("kurd")"#))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "ARB", r#"name_contains("arab")"#));

    builder
}

/// Fully built fixture tables.
pub fn fixture_tables() -> TableSet {
    fixture_builder().build().unwrap()
}

// ========================================================================
// Audit Capture
// ========================================================================

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemorySink {
    /// Recorded composition events.
    pub composes: Mutex<Vec<ComposeAuditEvent>>,
    /// Recorded publish events.
    pub publishes: Mutex<Vec<TablesPublishedEvent>>,
}

impl AuditSink for MemorySink {
    fn record_compose(&self, event: &ComposeAuditEvent) {
        self.composes.lock().unwrap().push(event.clone());
    }

    fn record_publish(&self, event: &TablesPublishedEvent) {
        self.publishes.lock().unwrap().push(event.clone());
    }
}
