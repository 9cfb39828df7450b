// crates/cameo-core/tests/tables.rs
// ============================================================================
// Test Module: Table Set Validation
// Coverage: Fail-closed load checks, lookups, editions, and digests.
// ============================================================================
//! ## Overview
//! Integration tests for `TableSetBuilder::build` and table-set editions.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::time::Duration;
use std::time::Instant;

use cameo_core::CodeTables;
use cameo_core::DateRestriction;
use cameo_core::EditionError;
use cameo_core::EntityPredicate;
use cameo_core::GenericModifier;
use cameo_core::MatchMode;
use cameo_core::ReferenceDraft;
use cameo_core::RuleTier;
use cameo_core::Scheme;
use cameo_core::SchemeProfile;
use cameo_core::TableError;
use cameo_core::TableLimits;
use cameo_core::TableSetBuilder;
use cameo_logic::Condition;
use cameo_logic::ValidationLimits;
use support::TestResult;
use support::date;
use support::ensure;
use support::fixture_builder;
use support::fixture_tables;
use support::reference;
use support::rule;
use support::table;

/// Builder with every default profile and the root tables declared.
fn base_builder() -> TableSetBuilder {
    let mut builder = TableSetBuilder::new();
    for scheme in Scheme::ALL {
        builder.profile(SchemeProfile::default_for(scheme));
        builder.rule_table(table(scheme, "", false));
    }
    builder
}

// ============================================================================
// SECTION: Load Validation
// ============================================================================

#[test]
fn fixture_builds_with_dense_identifiers() -> TestResult {
    let tables = fixture_tables();
    let stats = tables.stats();
    ensure(stats.profiles == 3, format!("profiles: {}", stats.profiles))?;
    ensure(stats.references == 4, format!("references: {}", stats.references))?;
    let ids: Vec<u32> = tables.references().iter().map(|entry| entry.id.get()).collect();
    ensure(ids == vec![1, 2, 3, 4], format!("entry ids: {ids:?}"))
}

#[test]
fn overlapping_restrictions_are_rejected() -> TestResult {
    let mut builder = base_builder();
    builder
        .reference(reference(
            Scheme::Actor,
            "Fatah",
            "PALPLO",
            Some(DateRestriction::ending(date("1994-01-01"))),
        ))
        .reference(reference(
            Scheme::Actor,
            "fatah",
            "PSEGOVFTA",
            Some(DateRestriction::starting(date("1993-09-01"))),
        ));
    let err = builder.build().unwrap_err();
    ensure(
        matches!(err, TableError::OverlappingRestriction { .. }),
        format!("unexpected error: {err}"),
    )
}

#[test]
fn adjacent_restrictions_do_not_overlap() -> TestResult {
    let split = date("1993-09-01");
    let mut builder = base_builder();
    builder
        .reference(reference(Scheme::Actor, "Fatah", "PALPLO", Some(DateRestriction::ending(split))))
        .reference(reference(
            Scheme::Actor,
            "Fatah",
            "PSEGOVFTA",
            Some(DateRestriction::starting(split)),
        ));
    ensure(builder.build().is_ok(), "half-open intervals sharing a boundary are disjoint")
}

#[test]
fn unrestricted_duplicate_names_are_rejected() -> TestResult {
    let mut builder = base_builder();
    builder
        .reference(reference(Scheme::Actor, "Hamas", "PSEREB", None))
        .reference(reference(Scheme::Actor, "HAMAS", "PSEREBHMS", None));
    let err = builder.build().unwrap_err();
    ensure(
        matches!(err, TableError::OverlappingRestriction { .. }),
        format!("unexpected error: {err}"),
    )
}

#[test]
fn mixed_match_modes_are_rejected() -> TestResult {
    let mut builder = base_builder();
    builder
        .reference(reference(
            Scheme::Actor,
            "Hamas",
            "PSEREB",
            Some(DateRestriction::ending(date("2000-01-01"))),
        ))
        .reference(ReferenceDraft {
            match_mode: MatchMode::Prefix,
            ..reference(
                Scheme::Actor,
                "Hamas",
                "PSEREBHMS",
                Some(DateRestriction::starting(date("2000-01-01"))),
            )
        });
    let err = builder.build().unwrap_err();
    ensure(matches!(err, TableError::MixedMatchModes { .. }), format!("unexpected error: {err}"))
}

#[test]
fn reference_codes_must_fit_the_scheme() -> TestResult {
    for code in ["palplo", "PALPL", "PAL-LO", "PALPLOFTAXYZ", "PAL001"] {
        let mut builder = base_builder();
        builder.reference(reference(Scheme::Actor, "Example", code, None));
        let err = builder.build().unwrap_err();
        ensure(
            matches!(err, TableError::InvalidReference { .. }),
            format!("{code}: unexpected error: {err}"),
        )?;
    }
    Ok(())
}

#[test]
fn numeric_segments_respect_placement_and_bands() -> TestResult {
    let cases = [
        // Actor codes have no numeric slot.
        (Scheme::Actor, "", RuleTier::Named, "101"),
        // Religion numerics only fill the third slot.
        (Scheme::Religion, "", RuleTier::Named, "101"),
        // 001-099 is reserved for generic qualifiers.
        (Scheme::Religion, "CHRPRO", RuleTier::Named, "050"),
        // Generic qualifiers may not use the category band.
        (Scheme::Religion, "CHRPRO", RuleTier::Generic(GenericModifier::Offshoot), "150"),
    ];
    for (scheme, prefix, tier, segment) in cases {
        let mut builder = base_builder();
        if !prefix.is_empty() {
            builder.rule_table(table(scheme, prefix, true));
        }
        builder.rule(rule(scheme, prefix, tier, segment, "self_identifies"));
        let err = builder.build().unwrap_err();
        ensure(
            matches!(err, TableError::InvalidSegment { .. }),
            format!("{scheme}:{prefix}:{segment}: unexpected error: {err}"),
        )?;
    }
    Ok(())
}

#[test]
fn declared_bands_narrow_category_numbers() -> TestResult {
    let mut profile = SchemeProfile::default_for(Scheme::Religion);
    profile.bands.insert("CHRPRO".to_string(), cameo_core::NumericBand {
        start: 100,
        end: 199,
    });
    let mut builder = TableSetBuilder::new();
    builder
        .profile(profile)
        .rule_table(table(Scheme::Religion, "CHRPRO", true))
        .rule(rule(Scheme::Religion, "CHRPRO", RuleTier::Named, "250", "self_identifies"));
    let err = builder.build().unwrap_err();
    ensure(matches!(err, TableError::InvalidSegment { .. }), format!("unexpected error: {err}"))
}

#[test]
fn band_keys_must_name_declared_tables() -> TestResult {
    let band = cameo_core::NumericBand {
        start: 200,
        end: 299,
    };
    for key in ["chrpro", "CHRP", "CHRMOS"] {
        let mut profile = SchemeProfile::default_for(Scheme::Religion);
        profile.bands.insert(key.to_string(), band);
        let mut builder = TableSetBuilder::new();
        builder
            .profile(profile)
            .rule_table(table(Scheme::Religion, "CHRPRO", true))
            .rule(rule(Scheme::Religion, "CHRPRO", RuleTier::Named, "150", "self_identifies"));
        match builder.build() {
            Err(TableError::InvalidProfile {
                reason,
                ..
            }) => ensure(reason.contains(key), format!("reason should name {key}: {reason}"))?,
            other => return Err(format!("band key {key}: unexpected result {other:?}").into()),
        }
    }
    Ok(())
}

#[test]
fn structural_table_errors() -> TestResult {
    let mut blank_root = TableSetBuilder::new();
    blank_root
        .profile(SchemeProfile::default_for(Scheme::Actor))
        .rule_table(table(Scheme::Actor, "", true));
    ensure(
        matches!(blank_root.build(), Err(TableError::BlankRoot(Scheme::Actor))),
        "blank root rejected",
    )?;

    let mut duplicate = base_builder();
    duplicate.rule_table(table(Scheme::Actor, "", false));
    ensure(
        matches!(duplicate.build(), Err(TableError::DuplicateRuleTable { .. })),
        "duplicate table rejected",
    )?;

    let mut undeclared = base_builder();
    undeclared.rule(rule(Scheme::Religion, "CHR", RuleTier::Named, "PRO", "self_identifies"));
    ensure(
        matches!(undeclared.build(), Err(TableError::UnknownRuleTable { .. })),
        "undeclared table rejected",
    )?;

    let mut too_long = base_builder();
    too_long.rule_table(table(Scheme::Ethnic, "KUR", true));
    ensure(
        matches!(too_long.build(), Err(TableError::InvalidPrefix { .. })),
        "ethnic codes have no second slot",
    )?;

    let mut no_profile = TableSetBuilder::new();
    no_profile.rule_table(table(Scheme::Actor, "", false));
    ensure(
        matches!(no_profile.build(), Err(TableError::MissingProfile(Scheme::Actor))),
        "missing profile rejected",
    )
}

#[test]
fn condition_limits_are_enforced() -> TestResult {
    let mut builder = TableSetBuilder::with_limits(TableLimits {
        condition: ValidationLimits {
            max_depth: 2,
            ..ValidationLimits::default()
        },
        ..TableLimits::default()
    });
    builder
        .profile(SchemeProfile::default_for(Scheme::Ethnic))
        .rule_table(table(Scheme::Ethnic, "", false))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", r#"all(any(name_is("kurd")))"#));
    let err = builder.build().unwrap_err();
    ensure(matches!(err, TableError::InvalidCondition { .. }), format!("unexpected error: {err}"))?;

    let mut builder = base_builder();
    let mut draft = rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", "self_identifies");
    draft.condition = Condition::at_least(3, vec![Condition::predicate(EntityPredicate::SelfIdentifies)]);
    builder.rule(draft);
    let err = builder.build().unwrap_err();
    ensure(matches!(err, TableError::InvalidCondition { .. }), format!("unexpected error: {err}"))
}

#[test]
fn rule_count_limit_is_enforced() -> TestResult {
    let mut builder = TableSetBuilder::with_limits(TableLimits {
        max_rules: 1,
        ..TableLimits::default()
    });
    builder
        .profile(SchemeProfile::default_for(Scheme::Ethnic))
        .rule_table(table(Scheme::Ethnic, "", false))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", r#"name_is("kurd")"#))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "ARB", r#"name_is("arab")"#));
    ensure(
        matches!(builder.build(), Err(TableError::TooManyRules { max: 1 })),
        "rule limit enforced",
    )
}

#[test]
fn explicit_specificity_overrides_computed_score() -> TestResult {
    let mut builder = base_builder();
    let mut draft = rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", r#"name_is("kurd")"#);
    draft.specificity = Some(9);
    builder.rule(draft);
    let tables = builder.build()?;
    let rules = tables.rules_for_tier(Scheme::Ethnic, "", RuleTier::Named);
    ensure(rules.first().map(|rule| rule.specificity) == Some(9), "override kept")
}

#[test]
fn tiers_keep_declaration_order() -> TestResult {
    let tables = fixture_tables();
    let named: Vec<String> = tables
        .rules_for_tier(Scheme::Religion, "", RuleTier::Named)
        .iter()
        .map(|rule| rule.segment.canonical())
        .collect();
    ensure(named == vec!["CHR", "MOS", "JEW"], format!("named order: {named:?}"))?;
    ensure(
        tables.rule_table(Scheme::Religion, "chr").is_some(),
        "prefix lookup is case-insensitive",
    )
}

// ============================================================================
// SECTION: Editions
// ============================================================================

#[test]
fn digest_is_stable_across_identical_loads() -> TestResult {
    let first = fixture_tables();
    let second = fixture_tables();
    ensure(first.canonical_hash() == second.canonical_hash(), "identical loads share a digest")
}

#[test]
fn appended_edition_passes_the_edition_check() -> TestResult {
    let previous = fixture_tables();
    let mut builder = fixture_builder();
    builder.rule(rule(Scheme::Ethnic, "", RuleTier::Named, "TUR", r#"name_contains("turk")"#));
    builder.reference(reference(Scheme::Actor, "Hamas", "PSEREB", None));
    let next = builder.build()?;
    ensure(next.canonical_hash() != previous.canonical_hash(), "digest changes")?;
    next.verify_append_only(&previous)?;
    Ok(())
}

#[test]
fn edition_check_scales_with_large_reference_lists() -> TestResult {
    const ENTRIES: usize = 40_000;
    let edition = || {
        let mut builder = base_builder();
        for index in 0..ENTRIES {
            builder.reference(reference(Scheme::Actor, &format!("Group {index}"), "PSE", None));
        }
        builder.build()
    };
    let previous = edition()?;
    let mut grown = base_builder();
    for index in 0..=ENTRIES {
        grown.reference(reference(Scheme::Actor, &format!("Group {index}"), "PSE", None));
    }
    let next = grown.build()?;

    let started = Instant::now();
    next.verify_append_only(&previous)?;
    edition()?.verify_append_only(&previous)?;
    let elapsed = started.elapsed();
    ensure(
        elapsed < Duration::from_secs(2),
        format!("edition check over {ENTRIES} entries took {elapsed:?}"),
    )
}

#[test]
fn rewritten_or_dropped_records_fail_the_edition_check() -> TestResult {
    let previous = fixture_tables();

    let mut rewritten = TableSetBuilder::new();
    for scheme in Scheme::ALL {
        rewritten.profile(SchemeProfile::default_for(scheme));
    }
    rewritten.reference(reference(Scheme::Actor, "Fatah", "PALFTA", None));
    let err = rewritten.build()?.verify_append_only(&previous).unwrap_err();
    ensure(
        matches!(err, EditionError::EntryChanged(_) | EditionError::RuleTableChanged { .. }),
        format!("unexpected error: {err}"),
    )?;

    let mut reduced = TableSetBuilder::new();
    for scheme in Scheme::ALL {
        reduced.profile(SchemeProfile::default_for(scheme));
    }
    let err = reduced.build()?.verify_append_only(&previous).unwrap_err();
    ensure(
        matches!(err, EditionError::RuleTableChanged { .. }),
        format!("unexpected error: {err}"),
    )
}

#[test]
fn reordered_rules_fail_the_edition_check() -> TestResult {
    let mut first = base_builder();
    first
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", r#"name_is("kurd")"#))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "ARB", r#"name_is("arab")"#));
    let mut second = base_builder();
    second
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "ARB", r#"name_is("arab")"#))
        .rule(rule(Scheme::Ethnic, "", RuleTier::Named, "KUR", r#"name_is("kurd")"#));
    let err = second.build()?.verify_append_only(&first.build()?).unwrap_err();
    ensure(matches!(err, EditionError::RuleChanged(_)), format!("unexpected error: {err}"))
}
