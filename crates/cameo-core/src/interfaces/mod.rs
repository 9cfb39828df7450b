// crates/cameo-core/src/interfaces/mod.rs
// ============================================================================
// Module: CAMEO Interfaces
// Description: Read-only lookup contract between the composer and its tables.
// Purpose: Let the composer run over any table source without knowing its storage.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The composer only needs four lookups: a scheme's profile, a reference
//! lookup by name, a rule table by prefix, and the rules of one tier.
//! [`TableSet`](crate::core::TableSet) implements [`CodeTables`]; shared
//! handles (`Arc`, references) forward to their target. Implementations must
//! be immutable for the duration of a call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::reference::ReferenceMatch;
use crate::core::rule::Rule;
use crate::core::rule::RuleTable;
use crate::core::rule::RuleTier;
use crate::core::scheme::Scheme;
use crate::core::scheme::SchemeProfile;

// ============================================================================
// SECTION: Code Tables
// ============================================================================

/// Read-only view of loaded coding tables.
pub trait CodeTables {
    /// Returns the profile of a scheme, if the tables define one.
    fn profile(&self, scheme: Scheme) -> Option<&SchemeProfile>;

    /// Finds the reference group for a name.
    ///
    /// Exact matches on the normalized name win; with `allow_prefix`, the
    /// longest prefix-mode entry whose key starts the name on a word boundary
    /// is used otherwise.
    fn find_by_name(
        &self,
        scheme: Scheme,
        name: &str,
        allow_prefix: bool,
    ) -> Option<ReferenceMatch<'_>>;

    /// Returns the rule table extending `prefix`.
    fn rule_table(&self, scheme: Scheme, prefix: &str) -> Option<&RuleTable>;

    /// Returns the rules of one tier of the table extending `prefix`.
    fn rules_for_tier(&self, scheme: Scheme, prefix: &str, tier: RuleTier) -> &[Rule] {
        self.rule_table(scheme, prefix).map(|table| table.rules_for_tier(tier)).unwrap_or_default()
    }
}

impl<T: CodeTables + ?Sized> CodeTables for &T {
    fn profile(&self, scheme: Scheme) -> Option<&SchemeProfile> {
        (**self).profile(scheme)
    }

    fn find_by_name(
        &self,
        scheme: Scheme,
        name: &str,
        allow_prefix: bool,
    ) -> Option<ReferenceMatch<'_>> {
        (**self).find_by_name(scheme, name, allow_prefix)
    }

    fn rule_table(&self, scheme: Scheme, prefix: &str) -> Option<&RuleTable> {
        (**self).rule_table(scheme, prefix)
    }
}

impl<T: CodeTables + ?Sized> CodeTables for Arc<T> {
    fn profile(&self, scheme: Scheme) -> Option<&SchemeProfile> {
        (**self).profile(scheme)
    }

    fn find_by_name(
        &self,
        scheme: Scheme,
        name: &str,
        allow_prefix: bool,
    ) -> Option<ReferenceMatch<'_>> {
        (**self).find_by_name(scheme, name, allow_prefix)
    }

    fn rule_table(&self, scheme: Scheme, prefix: &str) -> Option<&RuleTable> {
        (**self).rule_table(scheme, prefix)
    }
}
