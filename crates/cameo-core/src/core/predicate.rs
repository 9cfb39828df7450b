// crates/cameo-core/src/core/predicate.rs
// ============================================================================
// Module: Entity Predicates
// Description: Rule-condition leaves over entity descriptors.
// Purpose: Give the condition algebra its coding-domain vocabulary.
// Dependencies: cameo-logic, crate::core::{descriptor, scheme}, serde
// ============================================================================

//! ## Overview
//! [`EntityPredicate`] is the leaf type of every rule condition. Each variant
//! inspects one fact of an [`EntityDescriptor`]; facts the descriptor does not
//! carry evaluate to [`TriState::Unknown`] so that a rule never fires on
//! missing data. Text comparisons use [`normalize_name`] on both sides.
//!
//! The DSL vocabulary resolved by [`EntityPredicateResolver`]:
//!
//! | Call                        | Holds when                                   |
//! |-----------------------------|----------------------------------------------|
//! | `name_is("x")`              | the normalized name equals `x`               |
//! | `name_contains("x")`        | the normalized name contains `x`             |
//! | `name_starts_with("x")`     | the normalized name starts with `x`          |
//! | `parent("x")`               | `x` is among the known parents               |
//! | `kind("state")`             | the entity kind matches                      |
//! | `self_identifies`           | the entity self-identifies (unknown if unset)|
//! | `attribute("k", "v")`       | attribute `k` equals `v` (unknown if unset)  |
//! | `has_attribute("k")`        | attribute `k` is present                     |
//! | `country("x")`              | attribute `country` equals `x`               |

// ============================================================================
// SECTION: Imports
// ============================================================================

use cameo_logic::PredicateEval;
use cameo_logic::PredicateResolver;
use cameo_logic::TriState;
use serde::Deserialize;
use serde::Serialize;

use crate::core::descriptor::EntityDescriptor;
use crate::core::descriptor::normalize_name;
use crate::core::scheme::EntityKind;

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Attribute key consulted by [`EntityPredicate::Country`].
pub const COUNTRY_ATTRIBUTE: &str = "country";

/// Leaf test over an entity descriptor.
///
/// # Invariants
/// - Text operands are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EntityPredicate {
    /// Normalized name equality.
    NameIs {
        /// Expected name.
        value: String,
    },
    /// Normalized name substring.
    NameContains {
        /// Expected fragment.
        value: String,
    },
    /// Normalized name prefix.
    NameStartsWith {
        /// Expected prefix.
        value: String,
    },
    /// Parent affiliation membership.
    Parent {
        /// Expected parent.
        value: String,
    },
    /// Entity kind equality.
    Kind {
        /// Expected kind.
        kind: EntityKind,
    },
    /// Self-identification flag.
    SelfIdentifies,
    /// Attribute equality.
    Attribute {
        /// Attribute key.
        key: String,
        /// Expected value.
        value: String,
    },
    /// Attribute presence.
    HasAttribute {
        /// Attribute key.
        key: String,
    },
    /// Country attribute equality.
    Country {
        /// Expected country.
        value: String,
    },
}

impl EntityPredicate {
    /// Name equality predicate.
    #[must_use]
    pub fn name_is(value: &str) -> Self {
        Self::NameIs {
            value: normalize_name(value),
        }
    }

    /// Name substring predicate.
    #[must_use]
    pub fn name_contains(value: &str) -> Self {
        Self::NameContains {
            value: normalize_name(value),
        }
    }

    /// Name prefix predicate.
    #[must_use]
    pub fn name_starts_with(value: &str) -> Self {
        Self::NameStartsWith {
            value: normalize_name(value),
        }
    }

    /// Parent membership predicate.
    #[must_use]
    pub fn parent(value: &str) -> Self {
        Self::Parent {
            value: normalize_name(value),
        }
    }

    /// Attribute equality predicate.
    #[must_use]
    pub fn attribute(key: &str, value: &str) -> Self {
        Self::Attribute {
            key: key.trim().to_ascii_lowercase(),
            value: normalize_name(value),
        }
    }

    /// Country predicate.
    #[must_use]
    pub fn country(value: &str) -> Self {
        Self::Country {
            value: normalize_name(value),
        }
    }
}

/// Compares an optional attribute with an expected normalized value.
fn compare_attribute(actual: Option<&str>, expected: &str) -> TriState {
    actual.map_or(TriState::Unknown, |actual| (normalize_name(actual) == expected).into())
}

impl PredicateEval for EntityPredicate {
    type Subject<'a> = EntityDescriptor;

    fn eval(&self, subject: &Self::Subject<'_>) -> TriState {
        match self {
            Self::NameIs {
                value,
            } => (subject.normalized_name() == *value).into(),
            Self::NameContains {
                value,
            } => subject.normalized_name().contains(value.as_str()).into(),
            Self::NameStartsWith {
                value,
            } => subject.normalized_name().starts_with(value.as_str()).into(),
            // The parent list is the complete set of known affiliations.
            Self::Parent {
                value,
            } => subject.parents.iter().any(|parent| normalize_name(parent) == *value).into(),
            Self::Kind {
                kind,
            } => (subject.kind == *kind).into(),
            Self::SelfIdentifies => subject.self_identifies.into(),
            Self::Attribute {
                key,
                value,
            } => compare_attribute(subject.attribute(key), value),
            Self::HasAttribute {
                key,
            } => subject.attribute(key).is_some().into(),
            Self::Country {
                value,
            } => compare_attribute(subject.attribute(COUNTRY_ATTRIBUTE), value),
        }
    }
}

// ============================================================================
// SECTION: DSL Resolution
// ============================================================================

/// Resolves DSL predicate calls into [`EntityPredicate`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityPredicateResolver;

impl PredicateResolver<EntityPredicate> for EntityPredicateResolver {
    fn resolve(&self, name: &str, args: &[String]) -> Option<EntityPredicate> {
        match (name, args) {
            ("name_is", [value]) => Some(EntityPredicate::name_is(value)),
            ("name_contains", [value]) => Some(EntityPredicate::name_contains(value)),
            ("name_starts_with", [value]) => Some(EntityPredicate::name_starts_with(value)),
            ("parent", [value]) => Some(EntityPredicate::parent(value)),
            ("kind", [value]) => value.parse().ok().map(|kind| EntityPredicate::Kind {
                kind,
            }),
            ("self_identifies", []) => Some(EntityPredicate::SelfIdentifies),
            ("attribute", [key, value]) => Some(EntityPredicate::attribute(key, value)),
            ("has_attribute", [key]) => Some(EntityPredicate::HasAttribute {
                key: key.trim().to_ascii_lowercase(),
            }),
            ("country", [value]) => Some(EntityPredicate::country(value)),
            _ => None,
        }
    }
}
