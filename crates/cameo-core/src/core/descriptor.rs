// crates/cameo-core/src/core/descriptor.rs
// ============================================================================
// Module: Entity Descriptors
// Description: Input description of an entity to be coded.
// Purpose: Carry the facts rule conditions inspect.
// Dependencies: crate::core::{date, scheme}, serde
// ============================================================================

//! ## Overview
//! An [`EntityDescriptor`] is what a coder knows about an entity: its kind,
//! the name as found in text, known parent affiliations, whether it
//! self-identifies with its parent tradition, free-form attributes, and the
//! date range in which the description applies. Absent facts stay absent so
//! predicates can report them as unknown rather than false.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::date::DateRestriction;
use crate::core::scheme::EntityKind;
use crate::core::scheme::Scheme;

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Facts about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity kind; selects the coding scheme.
    pub kind: EntityKind,
    /// Name as it appears in source text.
    pub name: String,
    /// Known parent affiliations such as `Protestant` or `Fatah`.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Whether the entity identifies with its parent tradition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_identifies: Option<bool>,
    /// Free-form attributes such as `country` or `region`.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Dates over which this description is meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicability: Option<DateRestriction>,
}

impl EntityDescriptor {
    /// Creates a descriptor with only a kind and a name.
    #[must_use]
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            parents: Vec::new(),
            self_identifies: None,
            attributes: BTreeMap::new(),
            applicability: None,
        }
    }

    /// Adds a parent affiliation.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    /// Records whether the entity self-identifies with its parents.
    #[must_use]
    pub const fn with_self_identification(mut self, identifies: bool) -> Self {
        self.self_identifies = Some(identifies);
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sets the applicability range.
    #[must_use]
    pub const fn with_applicability(mut self, range: DateRestriction) -> Self {
        self.applicability = Some(range);
        self
    }

    /// Returns the scheme for this descriptor's kind.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.kind.scheme()
    }

    /// Returns the name in lookup form.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Returns an attribute looked up by case-insensitive key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str).or_else(|| {
            self.attributes
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
                .map(|(_, value)| value.as_str())
        })
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a name for lookup and comparison.
///
/// Lowercases, treats `_` as a space, trims, and collapses internal runs of
/// whitespace to a single space, so `"  Palestine_Liberation   Org "` and
/// `"palestine liberation org"` compare equal.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|ch: char| ch.is_whitespace() || ch == '_').filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}
