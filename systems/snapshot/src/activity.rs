//! Harvesting and combat state matched against registry names.

use std::{collections::HashSet, hash::Hash};

use sc2_state_core::{AbilityId, Activity, BuffId, UnitOrder};
use sc2_state_registry::IdRegistry;

const GATHER: [&str; 5] = [
    "HARVEST_GATHER",
    "HARVEST_GATHER_SCV",
    "HARVEST_GATHER_MULE",
    "HARVEST_GATHER_DRONE",
    "HARVEST_GATHER_PROBE",
];

const RETURN: [&str; 5] = [
    "HARVEST_RETURN",
    "HARVEST_RETURN_SCV",
    "HARVEST_RETURN_MULE",
    "HARVEST_RETURN_DRONE",
    "HARVEST_RETURN_PROBE",
];

const MOVE: [&str; 2] = ["MOVE", "MOVE_MOVE"];

const ATTACK: [&str; 5] = [
    "ATTACK",
    "ATTACK_ATTACK",
    "ATTACK_ATTACKTOWARDS",
    "ATTACK_ATTACKBARRAGE",
    "SCAN_MOVE",
];

const REPAIR: [&str; 3] = ["EFFECT_REPAIR", "EFFECT_REPAIR_SCV", "EFFECT_REPAIR_MULE"];

const CARRY_MINERALS: [&str; 2] = [
    "CARRYMINERALFIELDMINERALS",
    "CARRYHIGHYIELDMINERALFIELDMINERALS",
];

const CARRY_VESPENE: [&str; 3] = [
    "CARRYHARVESTABLEVESPENEGEYSERGAS",
    "CARRYHARVESTABLEVESPENEGEYSERGASPROTOSS",
    "CARRYHARVESTABLEVESPENEGEYSERGASZERG",
];

#[derive(Clone, Debug, Default)]
pub(crate) struct ActivityTable {
    gathering: HashSet<AbilityId>,
    returning: HashSet<AbilityId>,
    moving: HashSet<AbilityId>,
    attacking: HashSet<AbilityId>,
    repairing: HashSet<AbilityId>,
    minerals: HashSet<BuffId>,
    vespene: HashSet<BuffId>,
}

fn resolve<T, F>(names: &[&str], kind: &str, lookup: F) -> HashSet<T>
where
    T: Eq + Hash,
    F: Fn(&str) -> Option<T>,
{
    names
        .iter()
        .filter_map(|name| {
            let id = lookup(name);
            if id.is_none() {
                log::debug!("registry has no {kind} named {name}");
            }
            id
        })
        .collect()
}

impl ActivityTable {
    pub(crate) fn new(registry: &IdRegistry) -> Self {
        let ability = |names: &[&str]| resolve(names, "ability", |name| registry.ability(name));
        let buff = |names: &[&str]| resolve(names, "buff", |name| registry.buff(name));
        Self {
            gathering: ability(&GATHER),
            returning: ability(&RETURN),
            moving: ability(&MOVE),
            attacking: ability(&ATTACK),
            repairing: ability(&REPAIR),
            minerals: buff(&CARRY_MINERALS),
            vespene: buff(&CARRY_VESPENE),
        }
    }

    /// Classifies the current order and the carried load.
    pub(crate) fn activity(&self, orders: &[UnitOrder], buffs: &[BuffId]) -> Activity {
        let current = orders.first().map(|order| order.ability);
        let doing =
            |set: &HashSet<AbilityId>| current.is_some_and(|ability| set.contains(&ability));
        let carrying = |set: &HashSet<BuffId>| buffs.iter().any(|buff| set.contains(buff));
        Activity {
            gathering: doing(&self.gathering),
            returning: doing(&self.returning),
            moving: doing(&self.moving),
            attacking: doing(&self.attacking),
            repairing: doing(&self.repairing),
            carrying_minerals: carrying(&self.minerals),
            carrying_vespene: carrying(&self.vespene),
        }
    }
}
