// crates/cameo-logic/src/tests.rs
// ============================================================================
// Module: Condition Logic Unit Tests
// Description: Unit tests for specificity scoring and structure helpers.
// Purpose: Pin the scoring rules rule tables rely on for tie-breaking.
// Dependencies: cameo-logic
// ============================================================================

//! ## Overview
//! Unit tests for the crate-internal scoring helpers; evaluation and DSL
//! behavior are covered by the integration tests under `tests/`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use crate::Condition;

/// Shorthand for a predicate leaf over labels.
fn leaf(label: &'static str) -> Condition<&'static str> {
    Condition::predicate(label)
}

#[test]
fn predicate_scores_one() {
    assert_eq!(leaf("a").specificity(), 1);
}

#[test]
fn all_sums_members() {
    let condition = Condition::all(vec![leaf("a"), leaf("b"), leaf("c")]);
    assert_eq!(condition.specificity(), 3);
}

#[test]
fn any_takes_weakest_branch() {
    let condition = Condition::any(vec![Condition::all(vec![leaf("a"), leaf("b")]), leaf("c")]);
    assert_eq!(condition.specificity(), 1);
}

#[test]
fn not_scores_inner() {
    let condition = Condition::negate(Condition::all(vec![leaf("a"), leaf("b")]));
    assert_eq!(condition.specificity(), 2);
}

#[test]
fn at_least_sums_weakest_members() {
    let condition = Condition::at_least(
        2,
        vec![Condition::all(vec![leaf("a"), leaf("b"), leaf("c")]), leaf("d"), leaf("e")],
    );
    assert_eq!(condition.specificity(), 2);
}

#[test]
fn empty_nodes_score_zero() {
    assert_eq!(Condition::<&str>::always().specificity(), 0);
    assert_eq!(Condition::<&str>::any(Vec::new()).specificity(), 0);
}

#[test]
fn depth_and_count_follow_structure() {
    let condition = Condition::all(vec![leaf("a"), Condition::negate(leaf("b"))]);
    assert_eq!(condition.depth(), 3);
    assert_eq!(condition.predicate_count(), 2);

    let mut seen = Vec::new();
    condition.for_each_predicate(&mut |label| seen.push(*label));
    assert_eq!(seen, vec!["a", "b"]);
}
