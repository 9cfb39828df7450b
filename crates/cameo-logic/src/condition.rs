// crates/cameo-logic/src/condition.rs
// ============================================================================
// Module: Condition Core Types
// Description: Boolean algebra over typed predicates with specificity scoring.
// Purpose: Define `Condition` and its evaluation, scoring, and traversal helpers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! A [`Condition`] is the guard on a coding rule. Leaves are domain predicates;
//! interior nodes are `all`, `any`, `not`, and `at_least`. Evaluation is
//! tri-state and short-circuits as soon as the outcome is fixed.
//!
//! Specificity measures how much a condition pins down its subject. It is the
//! number of predicates that must hold for the condition to pass:
//! - a predicate scores 1;
//! - `all` scores the sum of its members;
//! - `any` scores its weakest member (a descriptor only needs that one);
//! - `not` scores its inner condition;
//! - `at_least(n, ...)` scores the `n` weakest members combined.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::traits::PredicateEval;
use crate::tristate::ConditionTrace;
use crate::tristate::GroupCounts;
use crate::tristate::KleeneLogic;
use crate::tristate::NoopTrace;
use crate::tristate::TriLogic;
use crate::tristate::TriState;

// ============================================================================
// SECTION: Condition Definition
// ============================================================================

/// Condition tree with domain-specific leaves
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition<P> {
    /// Every member must hold. Empty `all` is trivially true.
    All(SmallVec<[Box<Self>; 4]>),

    /// At least one member must hold. Empty `any` is never true.
    Any(SmallVec<[Box<Self>; 4]>),

    /// Inverts the inner condition.
    Not(Box<Self>),

    /// At least `min` members must hold.
    AtLeast {
        /// Minimum number of members that must hold
        min: u8,
        /// Members to choose from
        members: SmallVec<[Box<Self>; 8]>,
    },

    /// Domain predicate leaf.
    Predicate(P),
}

// ============================================================================
// SECTION: Constructors
// ============================================================================

impl<P> Condition<P> {
    /// Builds an `all` node
    #[must_use]
    pub fn all(members: Vec<Self>) -> Self {
        Self::All(members.into_iter().map(Box::new).collect())
    }

    /// Builds an `any` node
    #[must_use]
    pub fn any(members: Vec<Self>) -> Self {
        Self::Any(members.into_iter().map(Box::new).collect())
    }

    /// Builds a `not` node
    #[must_use]
    pub fn negate(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Builds an `at_least` node
    #[must_use]
    pub fn at_least(min: u8, members: Vec<Self>) -> Self {
        Self::AtLeast {
            min,
            members: members.into_iter().map(Box::new).collect(),
        }
    }

    /// Builds a predicate leaf
    #[must_use]
    pub const fn predicate(predicate: P) -> Self {
        Self::Predicate(predicate)
    }

    /// Condition that always holds
    #[must_use]
    pub fn always() -> Self {
        Self::All(SmallVec::new())
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl<P: PredicateEval> Condition<P> {
    /// Evaluates the condition with strong Kleene logic
    pub fn eval(&self, subject: &P::Subject<'_>) -> TriState {
        self.eval_with(subject, &KleeneLogic, &mut NoopTrace)
    }

    /// Returns true only when the condition definitely holds
    pub fn matches(&self, subject: &P::Subject<'_>) -> bool {
        self.eval(subject).is_true()
    }

    /// Evaluates the condition with an explicit logic table and trace hook
    pub fn eval_with<L, T>(&self, subject: &P::Subject<'_>, logic: &L, trace: &mut T) -> TriState
    where
        L: TriLogic,
        T: ConditionTrace<P>,
    {
        match self {
            Self::Predicate(predicate) => {
                let result = predicate.eval(subject);
                trace.on_predicate_evaluated(predicate, result);
                result
            }
            Self::Not(inner) => logic.not(inner.eval_with(subject, logic, trace)),
            Self::All(members) => {
                let mut result = TriState::True;
                for member in members {
                    result = logic.and(result, member.eval_with(subject, logic, trace));
                    if result.is_false() {
                        return TriState::False;
                    }
                }
                result
            }
            Self::Any(members) => {
                let mut result = TriState::False;
                for member in members {
                    result = logic.or(result, member.eval_with(subject, logic, trace));
                    if result.is_true() {
                        return TriState::True;
                    }
                }
                result
            }
            Self::AtLeast {
                min,
                members,
            } => {
                let required = usize::from(*min);
                let mut counts = GroupCounts {
                    satisfied: 0,
                    unknown: 0,
                    total: members.len(),
                };
                let mut remaining = members.len();
                for member in members {
                    remaining = remaining.saturating_sub(1);
                    match member.eval_with(subject, logic, trace) {
                        TriState::True => counts.satisfied += 1,
                        TriState::Unknown => counts.unknown += 1,
                        TriState::False => {}
                    }
                    if counts.satisfied >= required {
                        return TriState::True;
                    }
                    // Cannot reach `min` even if every open member holds.
                    if counts.satisfied + counts.unknown + remaining < required {
                        return TriState::False;
                    }
                }
                logic.at_least(*min, counts)
            }
        }
    }
}

// ============================================================================
// SECTION: Structure Helpers
// ============================================================================

impl<P> Condition<P> {
    /// Returns the specificity score of this condition
    #[must_use]
    pub fn specificity(&self) -> u32 {
        match self {
            Self::Predicate(_) => 1,
            Self::Not(inner) => inner.specificity(),
            Self::All(members) => {
                members.iter().fold(0u32, |acc, member| acc.saturating_add(member.specificity()))
            }
            Self::Any(members) => {
                members.iter().map(|member| member.specificity()).min().unwrap_or(0)
            }
            Self::AtLeast {
                min,
                members,
            } => {
                let mut scores: Vec<u32> = members.iter().map(|member| member.specificity()).collect();
                scores.sort_unstable();
                scores
                    .into_iter()
                    .take(usize::from(*min))
                    .fold(0u32, u32::saturating_add)
            }
        }
    }

    /// Returns the nesting depth (a single predicate has depth 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Predicate(_) => 1,
            Self::Not(inner) => 1 + inner.depth(),
            Self::All(members) | Self::Any(members) => {
                1 + members.iter().map(|member| member.depth()).max().unwrap_or(0)
            }
            Self::AtLeast {
                members, ..
            } => 1 + members.iter().map(|member| member.depth()).max().unwrap_or(0),
        }
    }

    /// Returns the number of predicate leaves
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        let mut count = 0;
        self.for_each_predicate(&mut |_| count += 1);
        count
    }

    /// Visits every predicate leaf in declaration order
    pub fn for_each_predicate<F>(&self, visit: &mut F)
    where
        F: FnMut(&P),
    {
        match self {
            Self::Predicate(predicate) => visit(predicate),
            Self::Not(inner) => inner.for_each_predicate(visit),
            Self::All(members) | Self::Any(members) => {
                for member in members {
                    member.for_each_predicate(visit);
                }
            }
            Self::AtLeast {
                members, ..
            } => {
                for member in members {
                    member.for_each_predicate(visit);
                }
            }
        }
    }
}
