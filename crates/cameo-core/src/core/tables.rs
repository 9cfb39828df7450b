// crates/cameo-core/src/core/tables.rs
// ============================================================================
// Module: Table Sets
// Description: Validated, immutable bundle of profiles, rule tables, and references.
// Purpose: Build table editions fail-closed and serve read-only lookups.
// Dependencies: cameo-logic, crate::core::*, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`TableSet`] is one edition of the coding tables. It is produced only by
//! [`TableSetBuilder::build`], which assigns identifiers in declaration order
//! and rejects anything malformed: bad profiles, unknown prefixes, numeric
//! segments outside their band, oversized conditions, invalid reference codes,
//! and overlapping date restrictions for one name. Once built, a table set is
//! never mutated; a new edition is a new table set, and
//! [`TableSet::verify_append_only`] confirms it only added records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use cameo_logic::Condition;
use cameo_logic::ConditionValidator;
use cameo_logic::ValidationLimits;
use serde::Serialize;
use thiserror::Error;

use crate::core::code::Code;
use crate::core::code::Segment;
use crate::core::date::DateRestriction;
use crate::core::descriptor::normalize_name;
use crate::core::hashing::EditionDigest;
use crate::core::hashing::hash_canonical_json;
use crate::core::identifiers::EntryId;
use crate::core::identifiers::RuleId;
use crate::core::predicate::EntityPredicate;
use crate::core::reference::MatchMode;
use crate::core::reference::ReferenceEntry;
use crate::core::reference::ReferenceMatch;
use crate::core::rule::Rule;
use crate::core::rule::RuleTable;
use crate::core::rule::RuleTier;
use crate::core::scheme::GENERIC_BAND;
use crate::core::scheme::SEGMENT_WIDTH;
use crate::core::scheme::Scheme;
use crate::core::scheme::SchemeProfile;
use crate::interfaces::CodeTables;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Load-time validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two profiles declared for one scheme.
    #[error("duplicate profile for scheme {0}")]
    DuplicateProfile(Scheme),
    /// Profile is internally inconsistent.
    #[error("invalid profile for scheme {scheme}: {reason}")]
    InvalidProfile {
        /// Scheme of the profile.
        scheme: Scheme,
        /// Description of the problem.
        reason: String,
    },
    /// Records reference a scheme without a profile.
    #[error("scheme {0} has no profile")]
    MissingProfile(Scheme),
    /// Two rule tables share a prefix.
    #[error("duplicate rule table {scheme}:{prefix:?}")]
    DuplicateRuleTable {
        /// Owning scheme.
        scheme: Scheme,
        /// Duplicated prefix.
        prefix: String,
    },
    /// Rule table prefix is malformed or too long for the scheme.
    #[error("invalid prefix {scheme}:{prefix:?}: {reason}")]
    InvalidPrefix {
        /// Owning scheme.
        scheme: Scheme,
        /// Offending prefix.
        prefix: String,
        /// Description of the problem.
        reason: String,
    },
    /// Root table allows a blank segment.
    #[error("root rule table of scheme {0} may not allow a blank segment")]
    BlankRoot(Scheme),
    /// Rule names a rule table that was not declared.
    #[error("rule references undeclared rule table {scheme}:{prefix:?}")]
    UnknownRuleTable {
        /// Owning scheme.
        scheme: Scheme,
        /// Missing prefix.
        prefix: String,
    },
    /// Rule segment violates placement or band rules.
    #[error("invalid segment {segment} in {scheme}:{prefix:?}: {reason}")]
    InvalidSegment {
        /// Owning scheme.
        scheme: Scheme,
        /// Table prefix.
        prefix: String,
        /// Offending segment.
        segment: String,
        /// Description of the problem.
        reason: String,
    },
    /// Rule condition exceeds structural limits.
    #[error("invalid condition for segment {segment} in {scheme}:{prefix:?}: {reason}")]
    InvalidCondition {
        /// Owning scheme.
        scheme: Scheme,
        /// Table prefix.
        prefix: String,
        /// Segment of the rule.
        segment: String,
        /// Description of the problem.
        reason: String,
    },
    /// Reference entry is malformed.
    #[error("invalid reference entry {name:?}: {reason}")]
    InvalidReference {
        /// Entry name as authored.
        name: String,
        /// Description of the problem.
        reason: String,
    },
    /// Entries sharing a name have overlapping restrictions.
    #[error("overlapping date restrictions for {scheme} reference {name:?}")]
    OverlappingRestriction {
        /// Owning scheme.
        scheme: Scheme,
        /// Normalized name.
        name: String,
    },
    /// Entries sharing a name disagree on match mode.
    #[error("mixed match modes for {scheme} reference {name:?}")]
    MixedMatchModes {
        /// Owning scheme.
        scheme: Scheme,
        /// Normalized name.
        name: String,
    },
    /// Rule count limit exceeded.
    #[error("too many rules (max {max})")]
    TooManyRules {
        /// Configured maximum.
        max: usize,
    },
    /// Reference count limit exceeded.
    #[error("too many reference entries (max {max})")]
    TooManyReferences {
        /// Configured maximum.
        max: usize,
    },
    /// Edition digest could not be computed.
    #[error("failed to hash table edition: {0}")]
    Hash(String),
}

/// Differences that make a new edition more than an append.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditionError {
    /// A scheme profile was removed or changed.
    #[error("profile for scheme {0} was removed or changed")]
    ProfileChanged(Scheme),
    /// A rule table was removed or its blank policy changed.
    #[error("rule table {scheme}:{prefix:?} was removed or changed")]
    RuleTableChanged {
        /// Owning scheme.
        scheme: Scheme,
        /// Table prefix.
        prefix: String,
    },
    /// A rule disappeared.
    #[error("{0} was removed")]
    RuleRemoved(RuleId),
    /// A rule kept its identifier but changed content or position.
    #[error("{0} was changed")]
    RuleChanged(RuleId),
    /// A reference entry disappeared.
    #[error("{0} was removed")]
    EntryRemoved(EntryId),
    /// A reference entry kept its identifier but changed content.
    #[error("{0} was changed")]
    EntryChanged(EntryId),
}

// ============================================================================
// SECTION: Drafts
// ============================================================================

/// Structural limits applied while building a table set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimits {
    /// Maximum number of rules across all tables.
    pub max_rules: usize,
    /// Maximum number of reference entries.
    pub max_references: usize,
    /// Limits for each rule condition.
    pub condition: ValidationLimits,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_rules: 65_536,
            max_references: 262_144,
            condition: ValidationLimits::default(),
        }
    }
}

/// Rule table declaration awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTableDraft {
    /// Owning scheme.
    pub scheme: Scheme,
    /// Prefix the table extends; empty for the root.
    pub prefix: String,
    /// Whether the code may stop at this table.
    pub allow_blank: bool,
}

/// Rule awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDraft {
    /// Owning scheme.
    pub scheme: Scheme,
    /// Prefix of the table the rule belongs to.
    pub prefix: String,
    /// Priority tier.
    pub tier: RuleTier,
    /// Segment appended when the rule wins.
    pub segment: Segment,
    /// Guard condition.
    pub condition: Condition<EntityPredicate>,
    /// Author-declared specificity; computed when absent.
    pub specificity: Option<u32>,
    /// Dates over which the rule applies.
    pub restriction: Option<DateRestriction>,
    /// Condition text as authored.
    pub source: String,
    /// Editorial note.
    pub note: Option<String>,
}

/// Reference entry awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDraft {
    /// Owning scheme.
    pub scheme: Scheme,
    /// Name as authored.
    pub name: String,
    /// Code text.
    pub code: String,
    /// Countries the entry is recorded for.
    pub countries: Vec<String>,
    /// Dates over which the code applies.
    pub restriction: Option<DateRestriction>,
    /// Name matching mode.
    pub match_mode: MatchMode,
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Accumulates declarations and validates them into a [`TableSet`].
#[derive(Debug, Clone, Default)]
pub struct TableSetBuilder {
    /// Limits enforced by `build`.
    limits: TableLimits,
    /// Declared profiles.
    profiles: Vec<SchemeProfile>,
    /// Declared rule tables.
    tables: Vec<RuleTableDraft>,
    /// Declared rules in file order.
    rules: Vec<RuleDraft>,
    /// Declared reference entries in file order.
    references: Vec<ReferenceDraft>,
}

impl TableSetBuilder {
    /// Creates a builder with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with explicit limits.
    #[must_use]
    pub fn with_limits(limits: TableLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Declares a scheme profile.
    pub fn profile(&mut self, profile: SchemeProfile) -> &mut Self {
        self.profiles.push(profile);
        self
    }

    /// Declares a rule table.
    pub fn rule_table(&mut self, draft: RuleTableDraft) -> &mut Self {
        self.tables.push(draft);
        self
    }

    /// Declares a rule.
    pub fn rule(&mut self, draft: RuleDraft) -> &mut Self {
        self.rules.push(draft);
        self
    }

    /// Declares a reference entry.
    pub fn reference(&mut self, draft: ReferenceDraft) -> &mut Self {
        self.references.push(draft);
        self
    }

    /// Returns true when a profile is declared for the scheme.
    #[must_use]
    pub fn has_profile(&self, scheme: Scheme) -> bool {
        self.profiles.iter().any(|profile| profile.scheme == scheme)
    }

    /// Returns every scheme a table, rule, or reference refers to.
    #[must_use]
    pub fn schemes_in_use(&self) -> BTreeSet<Scheme> {
        self.tables
            .iter()
            .map(|table| table.scheme)
            .chain(self.rules.iter().map(|rule| rule.scheme))
            .chain(self.references.iter().map(|entry| entry.scheme))
            .collect()
    }

    /// Validates every declaration and produces an immutable table set.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] found.
    pub fn build(self) -> Result<TableSet, TableError> {
        if self.rules.len() > self.limits.max_rules {
            return Err(TableError::TooManyRules {
                max: self.limits.max_rules,
            });
        }
        if self.references.len() > self.limits.max_references {
            return Err(TableError::TooManyReferences {
                max: self.limits.max_references,
            });
        }

        let mut profiles = BTreeMap::new();
        for profile in self.profiles {
            profile.validate().map_err(|reason| TableError::InvalidProfile {
                scheme: profile.scheme,
                reason,
            })?;
            let scheme = profile.scheme;
            if profiles.insert(scheme, profile).is_some() {
                return Err(TableError::DuplicateProfile(scheme));
            }
        }

        let mut rule_tables = BTreeMap::new();
        for draft in self.tables {
            let profile =
                profiles.get(&draft.scheme).ok_or(TableError::MissingProfile(draft.scheme))?;
            let prefix = canonical_prefix(draft.scheme, &draft.prefix, profile)?;
            if prefix.is_empty() && draft.allow_blank {
                return Err(TableError::BlankRoot(draft.scheme));
            }
            let key = (draft.scheme, prefix.clone());
            if rule_tables.contains_key(&key) {
                return Err(TableError::DuplicateRuleTable {
                    scheme: draft.scheme,
                    prefix,
                });
            }
            rule_tables.insert(key, RuleTable::new(draft.scheme, prefix, draft.allow_blank));
        }
        for profile in profiles.values() {
            for prefix in profile.bands.keys() {
                if !rule_tables.contains_key(&(profile.scheme, prefix.clone())) {
                    return Err(TableError::InvalidProfile {
                        scheme: profile.scheme,
                        reason: format!("band key {prefix:?} names no declared rule table"),
                    });
                }
            }
        }

        let validator = ConditionValidator::new(self.limits.condition);
        for (index, draft) in self.rules.into_iter().enumerate() {
            let id = RuleId::from_raw(sequence_id(index)).ok_or(TableError::TooManyRules {
                max: self.limits.max_rules,
            })?;
            let profile =
                profiles.get(&draft.scheme).ok_or(TableError::MissingProfile(draft.scheme))?;
            let prefix = canonical_prefix(draft.scheme, &draft.prefix, profile)?;
            check_rule_segment(&draft, &prefix, profile)?;
            validator.validate(&draft.condition).map_err(|err| TableError::InvalidCondition {
                scheme: draft.scheme,
                prefix: prefix.clone(),
                segment: draft.segment.canonical(),
                reason: err.to_string(),
            })?;
            let table = rule_tables.get_mut(&(draft.scheme, prefix.clone())).ok_or(
                TableError::UnknownRuleTable {
                    scheme: draft.scheme,
                    prefix,
                },
            )?;
            let specificity = draft.specificity.unwrap_or_else(|| draft.condition.specificity());
            table.push(Rule {
                id,
                tier: draft.tier,
                segment: draft.segment,
                condition: draft.condition,
                specificity,
                restriction: draft.restriction,
                source: draft.source,
                note: draft.note,
            });
        }

        let mut references = Vec::with_capacity(self.references.len());
        for (index, draft) in self.references.into_iter().enumerate() {
            let id = EntryId::from_raw(sequence_id(index)).ok_or(TableError::TooManyReferences {
                max: self.limits.max_references,
            })?;
            references.push(build_entry(id, draft, &profiles)?);
        }

        let exact_index = index_references(&references)?;
        let prefix_index = index_prefix_keys(&references);
        let digest = edition_digest(&profiles, &rule_tables, &references)?;
        Ok(TableSet {
            profiles,
            rule_tables,
            references,
            exact_index,
            prefix_index,
            digest,
        })
    }
}

/// Converts a zero-based position into a one-based identifier value (zero on overflow).
fn sequence_id(index: usize) -> u32 {
    index.checked_add(1).and_then(|value| u32::try_from(value).ok()).unwrap_or(0)
}

/// Uppercases and checks a rule-table prefix.
fn canonical_prefix(
    scheme: Scheme,
    prefix: &str,
    profile: &SchemeProfile,
) -> Result<String, TableError> {
    let canonical = prefix.trim().to_ascii_uppercase();
    let invalid = |reason: String| TableError::InvalidPrefix {
        scheme,
        prefix: prefix.to_string(),
        reason,
    };
    if canonical.len() % SEGMENT_WIDTH != 0 {
        return Err(invalid(format!("length is not a multiple of {SEGMENT_WIDTH}")));
    }
    let segments = canonical.len() / SEGMENT_WIDTH;
    if segments >= usize::from(profile.max_segments) {
        return Err(invalid(format!(
            "no segment slot left after {segments} of {}",
            profile.max_segments
        )));
    }
    for chunk in canonical.as_bytes().chunks(SEGMENT_WIDTH) {
        let text = String::from_utf8_lossy(chunk);
        let segment = Segment::parse(&text).map_err(|err| invalid(err.to_string()))?;
        if segment.is_numeric() {
            return Err(invalid("numeric segments may only end a code".to_string()));
        }
    }
    Ok(canonical)
}

/// Checks numeric placement and bands for a rule segment.
fn check_rule_segment(
    draft: &RuleDraft,
    prefix: &str,
    profile: &SchemeProfile,
) -> Result<(), TableError> {
    let Segment::Numeric(value) = draft.segment else {
        return Ok(());
    };
    let invalid = |reason: String| TableError::InvalidSegment {
        scheme: draft.scheme,
        prefix: prefix.to_string(),
        segment: draft.segment.canonical(),
        reason,
    };
    let slot = prefix.len() / SEGMENT_WIDTH;
    if !profile.admits_numeric_at(slot) {
        return Err(invalid(format!("scheme {} has no numeric slot at position {slot}", draft.scheme)));
    }
    let band = if draft.tier.is_generic() { GENERIC_BAND } else { profile.band_for(prefix) };
    if !band.contains(value) {
        return Err(invalid(format!("{} rules must use band {band}", draft.tier)));
    }
    Ok(())
}

/// Validates one reference draft into an entry.
fn build_entry(
    id: EntryId,
    draft: ReferenceDraft,
    profiles: &BTreeMap<Scheme, SchemeProfile>,
) -> Result<ReferenceEntry, TableError> {
    let profile = profiles.get(&draft.scheme).ok_or(TableError::MissingProfile(draft.scheme))?;
    let key = normalize_name(&draft.name);
    if key.is_empty() {
        return Err(TableError::InvalidReference {
            name: draft.name,
            reason: "name is empty".to_string(),
        });
    }
    let code = match Code::parse(draft.code.trim(), profile) {
        Ok(code) => code,
        Err(err) => {
            return Err(TableError::InvalidReference {
                name: draft.name,
                reason: err.to_string(),
            });
        }
    };
    let countries = draft
        .countries
        .iter()
        .map(|country| country.trim().to_ascii_uppercase())
        .filter(|country| !country.is_empty())
        .collect();
    Ok(ReferenceEntry {
        id,
        scheme: draft.scheme,
        name: draft.name,
        key,
        code,
        countries,
        restriction: draft.restriction,
        match_mode: draft.match_mode,
    })
}

/// Groups entries by normalized name and rejects overlapping groups.
fn index_references(
    references: &[ReferenceEntry],
) -> Result<BTreeMap<(Scheme, String), Vec<usize>>, TableError> {
    let mut index: BTreeMap<(Scheme, String), Vec<usize>> = BTreeMap::new();
    for (position, entry) in references.iter().enumerate() {
        let group = index.entry((entry.scheme, entry.key.clone())).or_default();
        for &other in group.iter() {
            let Some(existing) = references.get(other) else {
                continue;
            };
            if existing.match_mode != entry.match_mode {
                return Err(TableError::MixedMatchModes {
                    scheme: entry.scheme,
                    name: entry.key.clone(),
                });
            }
            let left = existing.restriction.unwrap_or(DateRestriction::UNBOUNDED);
            let right = entry.restriction.unwrap_or(DateRestriction::UNBOUNDED);
            if left.overlaps(&right) {
                return Err(TableError::OverlappingRestriction {
                    scheme: entry.scheme,
                    name: entry.key.clone(),
                });
            }
        }
        group.push(position);
    }
    Ok(index)
}

/// Lists prefix-mode keys per scheme, longest first.
fn index_prefix_keys(references: &[ReferenceEntry]) -> BTreeMap<Scheme, Vec<String>> {
    let mut keys: BTreeMap<Scheme, BTreeSet<String>> = BTreeMap::new();
    for entry in references.iter().filter(|entry| entry.match_mode == MatchMode::Prefix) {
        keys.entry(entry.scheme).or_default().insert(entry.key.clone());
    }
    keys.into_iter()
        .map(|(scheme, set)| {
            let mut ordered: Vec<String> = set.into_iter().collect();
            ordered.sort_by(|left, right| right.len().cmp(&left.len()).then_with(|| left.cmp(right)));
            (scheme, ordered)
        })
        .collect()
}

// ============================================================================
// SECTION: Edition Digest
// ============================================================================

/// Canonical serialization of an edition.
#[derive(Serialize)]
struct EditionView<'a> {
    /// Profiles in scheme order.
    profiles: Vec<&'a SchemeProfile>,
    /// Rule tables in (scheme, prefix) order.
    rule_tables: Vec<RuleTableView<'a>>,
    /// Reference entries in identifier order.
    references: &'a [ReferenceEntry],
}

/// Canonical serialization of one rule table.
#[derive(Serialize)]
struct RuleTableView<'a> {
    /// Owning scheme.
    scheme: Scheme,
    /// Table prefix.
    prefix: &'a str,
    /// Blank policy.
    allow_blank: bool,
    /// Rules in identifier order.
    rules: Vec<&'a Rule>,
}

/// Hashes the canonical view of an edition.
fn edition_digest(
    profiles: &BTreeMap<Scheme, SchemeProfile>,
    rule_tables: &BTreeMap<(Scheme, String), RuleTable>,
    references: &[ReferenceEntry],
) -> Result<EditionDigest, TableError> {
    let view = EditionView {
        profiles: profiles.values().collect(),
        rule_tables: rule_tables
            .values()
            .map(|table| {
                let mut rules: Vec<&Rule> = table.rules().collect();
                rules.sort_by_key(|rule| rule.id);
                RuleTableView {
                    scheme: table.scheme,
                    prefix: &table.prefix,
                    allow_blank: table.allow_blank,
                    rules,
                }
            })
            .collect(),
        references,
    };
    hash_canonical_json(&view).map_err(|err| TableError::Hash(err.to_string()))
}

// ============================================================================
// SECTION: Table Set
// ============================================================================

/// Immutable, validated table edition.
///
/// # Invariants
/// - Rule and entry identifiers are dense and follow declaration order.
/// - No two entries sharing a name have overlapping restrictions.
#[derive(Debug, Clone)]
pub struct TableSet {
    /// Profiles by scheme.
    profiles: BTreeMap<Scheme, SchemeProfile>,
    /// Rule tables by (scheme, prefix).
    rule_tables: BTreeMap<(Scheme, String), RuleTable>,
    /// Reference entries; position is `id - 1`.
    references: Vec<ReferenceEntry>,
    /// Entry positions by (scheme, normalized name).
    exact_index: BTreeMap<(Scheme, String), Vec<usize>>,
    /// Prefix-mode keys per scheme, longest first.
    prefix_index: BTreeMap<Scheme, Vec<String>>,
    /// Canonical digest of the edition.
    digest: EditionDigest,
}

/// Record counts of a table set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Scheme profiles.
    pub profiles: usize,
    /// Rule tables.
    pub rule_tables: usize,
    /// Rules across all tables.
    pub rules: usize,
    /// Reference entries.
    pub references: usize,
}

impl TableSet {
    /// Returns the canonical digest of this edition.
    #[must_use]
    pub const fn canonical_hash(&self) -> &EditionDigest {
        &self.digest
    }

    /// Returns record counts.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            profiles: self.profiles.len(),
            rule_tables: self.rule_tables.len(),
            rules: self.rule_tables.values().map(RuleTable::len).sum(),
            references: self.references.len(),
        }
    }

    /// Returns reference entries in identifier order.
    #[must_use]
    pub fn references(&self) -> &[ReferenceEntry] {
        &self.references
    }

    /// Iterates rule tables in (scheme, prefix) order.
    pub fn rule_tables(&self) -> impl Iterator<Item = &RuleTable> {
        self.rule_tables.values()
    }

    /// Returns every rule keyed by identifier with its table.
    fn rules_by_id(&self) -> BTreeMap<RuleId, (&RuleTable, &Rule)> {
        self.rule_tables
            .values()
            .flat_map(|table| table.rules().map(move |rule| (rule.id, (table, rule))))
            .collect()
    }

    /// Confirms this edition only appends to `previous`.
    ///
    /// Every profile, rule table, rule, and reference entry of `previous` must
    /// survive unchanged under the same identifier.
    ///
    /// # Errors
    ///
    /// Returns the first [`EditionError`] found.
    pub fn verify_append_only(&self, previous: &Self) -> Result<(), EditionError> {
        for (scheme, profile) in &previous.profiles {
            if self.profiles.get(scheme) != Some(profile) {
                return Err(EditionError::ProfileChanged(*scheme));
            }
        }
        for (key, table) in &previous.rule_tables {
            let kept = self
                .rule_tables
                .get(key)
                .is_some_and(|current| current.allow_blank == table.allow_blank);
            if !kept {
                return Err(EditionError::RuleTableChanged {
                    scheme: key.0,
                    prefix: key.1.clone(),
                });
            }
        }
        let current_rules = self.rules_by_id();
        for (id, (table, rule)) in previous.rules_by_id() {
            let Some((current_table, current_rule)) = current_rules.get(&id) else {
                return Err(EditionError::RuleRemoved(id));
            };
            let same_home =
                current_table.scheme == table.scheme && current_table.prefix == table.prefix;
            if !same_home || *current_rule != rule {
                return Err(EditionError::RuleChanged(id));
            }
        }
        for entry in &previous.references {
            let current = usize::try_from(entry.id.get())
                .ok()
                .and_then(|id| id.checked_sub(1))
                .and_then(|position| self.references.get(position))
                .filter(|current| current.id == entry.id);
            match current {
                None => return Err(EditionError::EntryRemoved(entry.id)),
                Some(current) if current != entry => {
                    return Err(EditionError::EntryChanged(entry.id));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl CodeTables for TableSet {
    fn profile(&self, scheme: Scheme) -> Option<&SchemeProfile> {
        self.profiles.get(&scheme)
    }

    fn find_by_name(
        &self,
        scheme: Scheme,
        name: &str,
        allow_prefix: bool,
    ) -> Option<ReferenceMatch<'_>> {
        let key = normalize_name(name);
        let collect = |group_key: &(Scheme, String), mode: MatchMode| {
            self.exact_index.get_key_value(group_key).map(|((_, stored), positions)| {
                ReferenceMatch {
                    key: stored.as_str(),
                    mode,
                    entries: positions
                        .iter()
                        .filter_map(|position| self.references.get(*position))
                        .collect(),
                }
            })
        };
        if let Some(found) = collect(&(scheme, key.clone()), MatchMode::Exact) {
            return Some(found);
        }
        if !allow_prefix {
            return None;
        }
        let prefix = self.prefix_index.get(&scheme)?.iter().find(|candidate| {
            key.strip_prefix(candidate.as_str()).is_some_and(|rest| rest.starts_with(' '))
        })?;
        collect(&(scheme, prefix.clone()), MatchMode::Prefix)
    }

    fn rule_table(&self, scheme: Scheme, prefix: &str) -> Option<&RuleTable> {
        self.rule_tables.get(&(scheme, prefix.to_ascii_uppercase()))
    }
}
