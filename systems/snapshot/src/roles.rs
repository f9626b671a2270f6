//! Unit roles resolved from registry names once per decoder.

use std::collections::HashSet;

use sc2_state_core::{UnitCatalog, UnitTypeId};
use sc2_state_registry::IdRegistry;

const TOWNHALLS: [&str; 9] = [
    "COMMANDCENTER",
    "COMMANDCENTERFLYING",
    "ORBITALCOMMAND",
    "ORBITALCOMMANDFLYING",
    "PLANETARYFORTRESS",
    "HATCHERY",
    "LAIR",
    "HIVE",
    "NEXUS",
];

const WORKERS: [&str; 5] = ["SCV", "PROBE", "DRONE", "DRONEBURROWED", "MULE"];

const OTHER: [&str; 6] = [
    "LARVA",
    "EGG",
    "BANELINGCOCOON",
    "RAVAGERCOCOON",
    "OVERLORDCOCOON",
    "TRANSPORTOVERLORDCOCOON",
];

const WATCHTOWERS: [&str; 1] = ["XELNAGATOWER"];

/// Partition an own unit falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OwnRole {
    Townhall,
    Worker,
    Other,
    Structure,
    Army,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RoleTable {
    townhalls: HashSet<UnitTypeId>,
    workers: HashSet<UnitTypeId>,
    other: HashSet<UnitTypeId>,
    watchtowers: HashSet<UnitTypeId>,
}

fn resolve(registry: &IdRegistry, names: &[&str]) -> HashSet<UnitTypeId> {
    names
        .iter()
        .filter_map(|name| {
            let id = registry.unit_type(name);
            if id.is_none() {
                log::debug!("registry has no unit type named {name}");
            }
            id
        })
        .collect()
}

impl RoleTable {
    pub(crate) fn new(registry: &IdRegistry) -> Self {
        Self {
            townhalls: resolve(registry, &TOWNHALLS),
            workers: resolve(registry, &WORKERS),
            other: resolve(registry, &OTHER),
            watchtowers: resolve(registry, &WATCHTOWERS),
        }
    }

    pub(crate) fn own_role(&self, id: UnitTypeId, catalog: &UnitCatalog) -> OwnRole {
        if self.townhalls.contains(&id) {
            OwnRole::Townhall
        } else if self.workers.contains(&id) {
            OwnRole::Worker
        } else if self.other.contains(&id) {
            OwnRole::Other
        } else if catalog.is_structure(id) {
            OwnRole::Structure
        } else {
            OwnRole::Army
        }
    }

    pub(crate) fn is_watchtower(&self, id: UnitTypeId) -> bool {
        self.watchtowers.contains(&id)
    }
}
