#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Registry of the game's stable identifiers.
//!
//! The registry is built once from the raw `stableid.json` table shipped with
//! the game and is immutable afterwards. It maps raw numeric identifiers to
//! semantic names such as `MARINE` and back, and can be published as a
//! versioned TOML artifact that regenerates byte for byte.

mod publish;

use std::collections::{BTreeMap, HashMap};

use sc2_state_core::{AbilityId, BuffId, EffectId, IdCategory, UnitTypeId, UpgradeId};
use serde::Deserialize;
use thiserror::Error;

pub use publish::PUBLISHED_VERSION;

/// Ability that is always present regardless of the raw table contents.
const PINNED_ABILITY: (&str, u32) = ("SMART", 1);

/// Errors raised while building or reading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The source table lacks one of the five identifier categories.
    #[error("raw table is missing the `{0}` category")]
    MissingCategory(IdCategory),
    /// The raw table is not valid JSON of the expected shape.
    #[error("raw table is not valid json")]
    Json(#[from] serde_json::Error),
    /// The published artifact is not valid TOML of the expected shape.
    #[error("published registry is not valid toml")]
    Toml(#[from] toml::de::Error),
    /// The published artifact was written by an incompatible generator.
    #[error("published registry has version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version found in the artifact.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
}

/// One entry of the raw table. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    /// Raw numeric identifier.
    pub id: u32,
    /// Display name; empty names are skipped.
    #[serde(default)]
    pub name: String,
    /// Variant index; only index zero survives.
    #[serde(default)]
    pub index: u32,
}

impl RawEntry {
    /// Creates a base-variant entry.
    #[must_use]
    pub fn new(name: &str, id: u32) -> Self {
        Self {
            id,
            name: name.to_owned(),
            index: 0,
        }
    }

    /// Sets the variant index.
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }
}

/// Raw identifier table keyed by section name (`Units`, `Abilities`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawTable {
    /// Entries of every section in source order.
    pub sections: BTreeMap<String, Vec<RawEntry>>,
}

impl RawTable {
    /// Appends `entries` to the section of `category`.
    #[must_use]
    pub fn with_section(mut self, category: IdCategory, entries: Vec<RawEntry>) -> Self {
        self.sections
            .entry(category.table_key().to_owned())
            .or_default()
            .extend(entries);
        self
    }
}

/// Derives the semantic key for a raw display name.
///
/// Returns `None` for empty names. Names starting with a digit are prefixed
/// with `_`, everything is uppercased and spaces become `_`.
#[must_use]
pub fn semantic_name(raw: &str) -> Option<String> {
    let first = raw.chars().next()?;
    let mut name = String::with_capacity(raw.len() + 1);
    if first.is_ascii_digit() {
        name.push('_');
    }
    name.push_str(&raw.to_uppercase().replace(' ', "_"));
    Some(name)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct CategoryTable {
    by_id: Vec<(u32, String)>,
    by_name: HashMap<String, u32>,
}

impl CategoryTable {
    /// A repeated name takes the later id but keeps the position of its first
    /// appearance. Names sharing an id stay in that order.
    fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut by_name: HashMap<String, u32> = HashMap::new();
        for (name, id) in entries {
            if by_name.insert(name.clone(), id).is_none() {
                order.push(name);
            }
        }
        let mut by_id: Vec<(u32, String)> = order
            .into_iter()
            .filter_map(|name| by_name.get(&name).map(|id| (*id, name)))
            .collect();
        by_id.sort_by_key(|(id, _)| *id);
        Self { by_id, by_name }
    }

    fn lookup(&self, id: u32) -> Option<&str> {
        let first = self.by_id.partition_point(|(value, _)| *value < id);
        self.by_id
            .get(first)
            .filter(|(value, _)| *value == id)
            .map(|(_, name)| name.as_str())
    }
}

/// Immutable bidirectional map between raw identifiers and semantic names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdRegistry {
    tables: BTreeMap<IdCategory, CategoryTable>,
}

impl IdRegistry {
    /// Builds the registry from a raw table.
    ///
    /// Later entries with the same semantic key replace the id of earlier
    /// ones, and the `SMART` ability is pinned to id 1 afterwards.
    pub fn from_table(table: &RawTable) -> Result<Self, RegistryError> {
        let mut tables = BTreeMap::new();
        for category in IdCategory::ALL {
            let entries = table
                .sections
                .get(category.table_key())
                .ok_or(RegistryError::MissingCategory(category))?;

            let mut kept = Vec::with_capacity(entries.len() + 1);
            let mut dropped_variants = 0_usize;
            for entry in entries {
                let Some(name) = semantic_name(&entry.name) else {
                    continue;
                };
                if entry.index > 0 {
                    dropped_variants += 1;
                    continue;
                }
                kept.push((name, entry.id));
            }
            if category == IdCategory::Ability {
                let (name, id) = PINNED_ABILITY;
                kept.push((name.to_owned(), id));
            }

            let table = CategoryTable::from_entries(kept);
            log::debug!(
                "{category}: {} names kept, {dropped_variants} variants dropped",
                table.by_name.len()
            );
            let _previous = tables.insert(category, table);
        }

        Ok(Self { tables })
    }

    /// Parses the raw `stableid.json` text and builds the registry from it.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let table: RawTable = serde_json::from_str(json)?;
        Self::from_table(&table)
    }

    pub(crate) fn from_names(names: BTreeMap<IdCategory, Vec<(String, u32)>>) -> Self {
        let tables = names
            .into_iter()
            .map(|(category, entries)| (category, CategoryTable::from_entries(entries)))
            .collect();
        Self { tables }
    }

    fn table(&self, category: IdCategory) -> Option<&CategoryTable> {
        self.tables.get(&category)
    }

    /// Semantic name of `raw` within `category`.
    ///
    /// When several names share one id the first to appear in the source
    /// table is returned.
    #[must_use]
    pub fn lookup(&self, category: IdCategory, raw: u32) -> Option<&str> {
        self.table(category)?.lookup(raw)
    }

    /// Raw id registered for `name` within `category`.
    #[must_use]
    pub fn resolve(&self, category: IdCategory, name: &str) -> Option<u32> {
        self.table(category)?.by_name.get(name).copied()
    }

    /// Whether `raw` is a known id within `category`.
    #[must_use]
    pub fn contains(&self, category: IdCategory, raw: u32) -> bool {
        self.lookup(category, raw).is_some()
    }

    /// Entries of `category` ordered by id; names sharing an id keep source order.
    pub fn entries(&self, category: IdCategory) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.table(category)
            .into_iter()
            .flat_map(|table| table.by_id.iter())
            .map(|(id, name)| (*id, name.as_str()))
    }

    /// Number of names registered in `category`.
    #[must_use]
    pub fn len(&self, category: IdCategory) -> usize {
        self.table(category).map_or(0, |table| table.by_id.len())
    }

    /// Unit type registered under `name`.
    #[must_use]
    pub fn unit_type(&self, name: &str) -> Option<UnitTypeId> {
        self.resolve(IdCategory::UnitType, name).map(UnitTypeId::new)
    }

    /// Ability registered under `name`.
    #[must_use]
    pub fn ability(&self, name: &str) -> Option<AbilityId> {
        self.resolve(IdCategory::Ability, name).map(AbilityId::new)
    }

    /// Upgrade registered under `name`.
    #[must_use]
    pub fn upgrade(&self, name: &str) -> Option<UpgradeId> {
        self.resolve(IdCategory::Upgrade, name).map(UpgradeId::new)
    }

    /// Buff registered under `name`.
    #[must_use]
    pub fn buff(&self, name: &str) -> Option<BuffId> {
        self.resolve(IdCategory::Buff, name).map(BuffId::new)
    }

    /// Effect registered under `name`.
    #[must_use]
    pub fn effect(&self, name: &str) -> Option<EffectId> {
        self.resolve(IdCategory::Effect, name).map(EffectId::new)
    }

    /// Semantic name of a unit type.
    #[must_use]
    pub fn unit_type_name(&self, id: UnitTypeId) -> Option<&str> {
        self.lookup(IdCategory::UnitType, id.get())
    }

    /// Unit types whose semantic name satisfies `predicate`, in id order.
    pub fn unit_types_where<F>(&self, mut predicate: F) -> Vec<UnitTypeId>
    where
        F: FnMut(&str) -> bool,
    {
        let mut ids: Vec<UnitTypeId> = self
            .entries(IdCategory::UnitType)
            .filter(|(_, name)| predicate(name))
            .map(|(id, _)| UnitTypeId::new(id))
            .collect();
        ids.dedup();
        ids
    }
}
