// crates/cameo-core/src/core/mod.rs
// ============================================================================
// Module: CAMEO Core Types
// Description: Schemes, codes, descriptors, rules, references, and table sets.
// Purpose: Provide the validated data model the composer runs over.
// Dependencies: cameo-logic, serde, thiserror, time
// ============================================================================

//! ## Overview
//! Core types describe what a code looks like ([`SchemeProfile`], [`Code`]),
//! what is known about an entity ([`EntityDescriptor`]), and the curated
//! knowledge used to code it ([`Rule`], [`ReferenceEntry`], [`TableSet`]).
//! Everything here is immutable once built.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod code;
pub mod date;
pub mod descriptor;
pub mod hashing;
pub mod identifiers;
pub mod predicate;
pub mod reference;
pub mod rule;
pub mod scheme;
pub mod tables;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use code::Code;
pub use code::CodeError;
pub use code::Segment;
pub use code::SegmentLabel;
pub use code::check_code;
pub use date::CodingDate;
pub use date::DateError;
pub use date::DateRestriction;
pub use descriptor::EntityDescriptor;
pub use descriptor::normalize_name;
pub use hashing::EditionDigest;
pub use hashing::HashError;
pub use identifiers::EntryId;
pub use identifiers::RuleId;
pub use predicate::EntityPredicate;
pub use predicate::EntityPredicateResolver;
pub use reference::DateConflict;
pub use reference::MatchMode;
pub use reference::ReferenceEntry;
pub use reference::ReferenceMatch;
pub use rule::GenericModifier;
pub use rule::Rule;
pub use rule::RuleTable;
pub use rule::RuleTier;
pub use scheme::DEFAULT_CATEGORY_BAND;
pub use scheme::EntityKind;
pub use scheme::GENERIC_BAND;
pub use scheme::LetterCase;
pub use scheme::NumericBand;
pub use scheme::SEGMENT_WIDTH;
pub use scheme::Scheme;
pub use scheme::SchemeProfile;
pub use tables::EditionError;
pub use tables::ReferenceDraft;
pub use tables::RuleDraft;
pub use tables::RuleTableDraft;
pub use tables::TableError;
pub use tables::TableLimits;
pub use tables::TableSet;
pub use tables::TableSetBuilder;
pub use tables::TableStats;
