// crates/cameo-logic/src/lib.rs
// ============================================================================
// Module: Condition Logic Root
// Description: Public API surface for the rule-condition algebra.
// Purpose: Wire together condition, evaluation, validation, and DSL modules.
// Dependencies: crate::{condition, dsl, traits, tristate, validate}
// ============================================================================

//! ## Overview
//! `cameo-logic` is the domain-agnostic half of the coding engine: a small
//! Boolean algebra over typed predicates with tri-state evaluation,
//! specificity scoring, structural validation, and an author-facing DSL.
//! The coding domain plugs in its predicates through [`PredicateEval`] and
//! [`PredicateResolver`].

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod condition;
pub mod dsl;
pub mod traits;
pub mod tristate;
pub mod validate;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use condition::Condition;
pub use dsl::DslError;
pub use dsl::PredicateResolver;
pub use dsl::parse_condition;
pub use dsl::parse_condition_with;
pub use traits::FnPredicate;
pub use traits::PredicateEval;
pub use tristate::ConditionTrace;
pub use tristate::GroupCounts;
pub use tristate::KleeneLogic;
pub use tristate::NoopTrace;
pub use tristate::TriLogic;
pub use tristate::TriState;
pub use validate::ConditionValidator;
pub use validate::ValidationError;
pub use validate::ValidationLimits;
