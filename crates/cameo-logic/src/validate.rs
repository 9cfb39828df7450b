// crates/cameo-logic/src/validate.rs
// ============================================================================
// Module: Condition Validation
// Description: Structural limits for condition trees loaded from tables.
// Purpose: Reject malformed or oversized conditions before they are published.
// Dependencies: std::fmt
// ============================================================================

//! ## Overview
//! Conditions arrive from hand-maintained table files and are untrusted until
//! validated. The validator bounds depth and predicate count and rejects
//! `at_least` groups that can never (or always trivially) pass. Domain meaning
//! of individual predicates is checked by the domain, not here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::condition::Condition;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Structural validation failures
///
/// # Invariants
/// - None. Variants capture structured validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Condition tree is nested deeper than allowed
    TooDeep {
        /// Maximum supported depth
        max_depth: usize,
        /// Depth encountered
        actual_depth: usize,
    },
    /// Condition tree has more predicates than allowed
    TooManyPredicates {
        /// Maximum supported predicate count
        max_predicates: usize,
        /// Count encountered
        actual: usize,
    },
    /// `at_least` asks for more members than it has
    InvalidGroup {
        /// Minimum required members
        min: u8,
        /// Members provided
        total: usize,
    },
    /// Structure is well-formed but not allowed by configuration
    InvalidStructure(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooDeep {
                max_depth,
                actual_depth,
            } => write!(f, "condition too deep: {actual_depth} levels (max {max_depth})"),
            Self::TooManyPredicates {
                max_predicates,
                actual,
            } => write!(f, "condition has {actual} predicates (max {max_predicates})"),
            Self::InvalidGroup {
                min,
                total,
            } => write!(f, "at_least({min}) has only {total} members"),
            Self::InvalidStructure(msg) => write!(f, "invalid condition structure: {msg}"),
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// SECTION: Validation Limits
// ============================================================================

/// Limits applied by [`ConditionValidator`]
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum nesting depth
    pub max_depth: usize,
    /// Maximum predicate leaves per condition
    pub max_predicates: usize,
    /// Whether empty `all`/`any` nodes are accepted
    pub allow_empty_logical: bool,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_predicates: 256,
            allow_empty_logical: true,
        }
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Structural validator for condition trees
///
/// # Invariants
/// - Uses the stored [`ValidationLimits`] for all decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionValidator {
    /// Limits applied during validation.
    limits: ValidationLimits,
}

impl ConditionValidator {
    /// Creates a validator with explicit limits
    #[must_use]
    pub const fn new(limits: ValidationLimits) -> Self {
        Self {
            limits,
        }
    }

    /// Returns the limits in effect
    #[must_use]
    pub const fn limits(&self) -> ValidationLimits {
        self.limits
    }

    /// Validates a condition tree
    ///
    /// # Errors
    /// Returns [`ValidationError`] when the condition violates structural limits.
    pub fn validate<P>(&self, condition: &Condition<P>) -> Result<(), ValidationError> {
        self.validate_depth(condition, 1)?;
        let count = condition.predicate_count();
        if count > self.limits.max_predicates {
            return Err(ValidationError::TooManyPredicates {
                max_predicates: self.limits.max_predicates,
                actual: count,
            });
        }
        self.validate_structure(condition)
    }

    /// Checks depth without recursing past the limit.
    fn validate_depth<P>(&self, condition: &Condition<P>, depth: usize) -> Result<(), ValidationError> {
        if depth > self.limits.max_depth {
            return Err(ValidationError::TooDeep {
                max_depth: self.limits.max_depth,
                actual_depth: depth,
            });
        }
        match condition {
            Condition::All(members) | Condition::Any(members) => {
                for member in members {
                    self.validate_depth(member, depth + 1)?;
                }
            }
            Condition::AtLeast {
                members, ..
            } => {
                for member in members {
                    self.validate_depth(member, depth + 1)?;
                }
            }
            Condition::Not(inner) => self.validate_depth(inner, depth + 1)?,
            Condition::Predicate(_) => {}
        }
        Ok(())
    }

    /// Checks group arity and empty logical nodes.
    fn validate_structure<P>(&self, condition: &Condition<P>) -> Result<(), ValidationError> {
        match condition {
            Condition::All(members) | Condition::Any(members) => {
                if !self.limits.allow_empty_logical && members.is_empty() {
                    return Err(ValidationError::InvalidStructure(
                        "empty all/any is not allowed".to_string(),
                    ));
                }
                for member in members {
                    self.validate_structure(member)?;
                }
            }
            Condition::AtLeast {
                min,
                members,
            } => {
                if usize::from(*min) > members.len() {
                    return Err(ValidationError::InvalidGroup {
                        min: *min,
                        total: members.len(),
                    });
                }
                if *min == 0 {
                    return Err(ValidationError::InvalidStructure(
                        "at_least(0) always holds; use all() instead".to_string(),
                    ));
                }
                for member in members {
                    self.validate_structure(member)?;
                }
            }
            Condition::Not(inner) => self.validate_structure(inner)?,
            Condition::Predicate(_) => {}
        }
        Ok(())
    }
}
