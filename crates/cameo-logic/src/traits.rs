// crates/cameo-logic/src/traits.rs
// ============================================================================
// Module: Predicate Traits
// Description: Evaluation contract between the condition algebra and domains.
// Purpose: Keep the algebra generic while domains supply leaf semantics.
// Dependencies: crate::tristate
// ============================================================================

//! ## Overview
//! Conditions are generic over their leaves. A domain implements
//! [`PredicateEval`] for its predicate type and names the subject it inspects;
//! the algebra handles composition and never looks inside a subject.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::tristate::TriState;

// ============================================================================
// SECTION: Predicate Trait
// ============================================================================

/// Leaf evaluation for a domain predicate
///
/// Implementations must be pure: the same predicate and subject always yield
/// the same value. Return [`TriState::Unknown`] when the subject lacks the data
/// the predicate inspects.
pub trait PredicateEval {
    /// Domain subject the predicate inspects
    type Subject<'a>;

    /// Evaluates the predicate against a subject
    fn eval(&self, subject: &Self::Subject<'_>) -> TriState;
}

/// Adapter for boolean closures used as predicates in tests and small domains
///
/// # Invariants
/// - Wraps a pure function; evaluation never yields `Unknown`.
#[derive(Debug, Clone, Copy)]
pub struct FnPredicate<S, F>
where
    F: Fn(&S) -> bool,
{
    /// Boolean test applied to the subject.
    test: F,
    /// Marker for the subject type.
    _subject: std::marker::PhantomData<fn(&S)>,
}

impl<S, F> FnPredicate<S, F>
where
    F: Fn(&S) -> bool,
{
    /// Wraps a boolean test as a predicate
    pub const fn new(test: F) -> Self {
        Self {
            test,
            _subject: std::marker::PhantomData,
        }
    }
}

impl<S, F> PredicateEval for FnPredicate<S, F>
where
    F: Fn(&S) -> bool,
{
    type Subject<'a> = S;

    fn eval(&self, subject: &Self::Subject<'_>) -> TriState {
        (self.test)(subject).into()
    }
}
