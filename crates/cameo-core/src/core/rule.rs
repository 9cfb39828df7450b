// crates/cameo-core/src/core/rule.rs
// ============================================================================
// Module: Coding Rules
// Description: Conditioned segment rules grouped by tier into rule tables.
// Purpose: Model the tiered rule tables the composer walks segment by segment.
// Dependencies: cameo-logic, crate::core::{code, date, identifiers, predicate}
// ============================================================================

//! ## Overview
//! A [`Rule`] says "when this condition holds, the next segment is this".
//! Rules live in a [`RuleTable`] keyed by the code prefix they extend; the
//! root table of a scheme has the empty prefix. Within a table, rules are
//! partitioned by [`RuleTier`] and each partition keeps declaration order.
//! Tier order is fixed: named groups, then families, then the generic
//! modifiers ranked offshoot, controversial, new movement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use cameo_logic::Condition;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::core::code::Segment;
use crate::core::date::CodingDate;
use crate::core::date::DateRestriction;
use crate::core::identifiers::RuleId;
use crate::core::predicate::EntityPredicate;
use crate::core::scheme::Scheme;

// ============================================================================
// SECTION: Tiers
// ============================================================================

/// Cross-cutting qualifier applied by generic-tier rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenericModifier {
    /// Offshoot of an established tradition.
    Offshoot,
    /// Contested membership in its tradition.
    Controversial,
    /// New movement.
    NewMovement,
}

/// Priority tier of a rule. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleTier {
    /// Explicitly enumerated major group.
    Named,
    /// Family or regional grouping.
    Family,
    /// Generic modifier.
    Generic(GenericModifier),
}

impl RuleTier {
    /// Tiers in evaluation order.
    pub const ORDER: [Self; 5] = [
        Self::Named,
        Self::Family,
        Self::Generic(GenericModifier::Offshoot),
        Self::Generic(GenericModifier::Controversial),
        Self::Generic(GenericModifier::NewMovement),
    ];

    /// Returns true for generic-modifier tiers.
    #[must_use]
    pub const fn is_generic(self) -> bool {
        matches!(self, Self::Generic(_))
    }

    /// Returns the stable tier label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Named => "named",
            Self::Family => "family",
            Self::Generic(GenericModifier::Offshoot) => "offshoot",
            Self::Generic(GenericModifier::Controversial) => "controversial",
            Self::Generic(GenericModifier::NewMovement) => "new_movement",
        }
    }
}

impl fmt::Display for RuleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|tier| tier.as_str() == value.trim())
            .ok_or_else(|| format!("unknown rule tier: {value}"))
    }
}

impl Serialize for RuleTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// One conditioned segment assignment.
///
/// # Invariants
/// - `specificity` is the condition's computed score unless the author
///   overrode it.
/// - Numeric segments respect the scheme's bands (checked at load).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Stable identifier assigned at load.
    pub id: RuleId,
    /// Priority tier.
    pub tier: RuleTier,
    /// Segment appended when the rule wins.
    pub segment: Segment,
    /// Guard evaluated against the descriptor.
    pub condition: Condition<EntityPredicate>,
    /// Tie-break weight within the tier.
    pub specificity: u32,
    /// Dates over which the rule applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<DateRestriction>,
    /// Condition text as authored.
    pub source: String,
    /// Free-text editorial note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Rule {
    /// Returns true when the rule's own dates admit the query date.
    ///
    /// Undated queries only see rules without a restriction.
    #[must_use]
    pub fn is_active(&self, as_of: Option<CodingDate>) -> bool {
        match (&self.restriction, as_of) {
            (None, _) => true,
            (Some(restriction), Some(date)) => restriction.contains(date),
            (Some(_), None) => false,
        }
    }
}

// ============================================================================
// SECTION: Rule Tables
// ============================================================================

/// Rules extending one code prefix within a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTable {
    /// Owning scheme.
    pub scheme: Scheme,
    /// Canonical (uppercase) prefix this table extends; empty for the root.
    pub prefix: String,
    /// Whether the code may stop here when no rule matches.
    pub allow_blank: bool,
    /// Rules per tier in declaration order.
    tiers: BTreeMap<RuleTier, Vec<Rule>>,
}

impl RuleTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(scheme: Scheme, prefix: impl Into<String>, allow_blank: bool) -> Self {
        Self {
            scheme,
            prefix: prefix.into(),
            allow_blank,
            tiers: BTreeMap::new(),
        }
    }

    /// Returns true for the scheme's root table.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Appends a rule to its tier.
    pub(crate) fn push(&mut self, rule: Rule) {
        self.tiers.entry(rule.tier).or_default().push(rule);
    }

    /// Returns the rules of one tier in declaration order.
    #[must_use]
    pub fn rules_for_tier(&self, tier: RuleTier) -> &[Rule] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates all rules, tier by tier.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.tiers.values().flatten()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Returns true when the table holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
