//! Decoded view of one step and the queries answered from it.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use once_cell::sync::OnceCell;
use sc2_state_core::{
    Grid, PlayerCommon, Point2, Race, RawScore, Tag, Unit, UnitCatalog, UnitTypeId, UpgradeId,
    GAME_LOOPS_PER_SECOND,
};
use sc2_state_map::{ExpansionLocation, StaticMap};
use sc2_state_units::Units;

use crate::{Alert, ChatMessage, EffectData};

/// Own townhalls closer than this to an expansion point claim it.
const EXPANSION_GAP_THRESHOLD: f64 = 15.0;

/// Visibility grid value of a cell in vision.
const VISIBLE: u8 = 2;

/// Decoded view of a single step.
///
/// Every unit group is a [`Units`] container over records shared with
/// [`StateSnapshot::all_units`]. Own units satisfy
/// `units == townhalls + workers + army + structures + other`.
#[derive(Debug)]
pub struct StateSnapshot {
    /// Game loop the observation was taken at.
    pub game_loop: u32,
    /// Economy and supply counters.
    pub common: PlayerCommon,
    /// Every decoded unit, deduplicated by tag.
    pub all_units: Units,
    /// Units owned by the observer.
    pub units: Units,
    /// Own townhalls, flying ones included.
    pub townhalls: Units,
    /// Own workers.
    pub workers: Units,
    /// Own combat units.
    pub army: Units,
    /// Own structures other than townhalls.
    pub structures: Units,
    /// Own larva, eggs and cocoons.
    pub other: Units,
    /// Opposing non-structures, visible or remembered.
    pub enemy_units: Units,
    /// Opposing structures, visible or remembered.
    pub enemy_structures: Units,
    /// Mineral fields.
    pub mineral_field: Units,
    /// Vespene geysers.
    pub vespene_geyser: Units,
    /// Mineral fields followed by vespene geysers.
    pub resources: Units,
    /// Neutral rocks and debris.
    pub destructables: Units,
    /// Xel'Naga towers.
    pub watchtowers: Units,
    /// Tags of units that died this step.
    pub dead_units: HashSet<Tag>,
    /// Active effects.
    pub effects: Vec<EffectData>,
    /// Alerts raised this step.
    pub alerts: Vec<Alert>,
    /// Chat received this step.
    pub chat: Vec<ChatMessage>,
    /// Score summary, when the game reports one.
    pub score: Option<RawScore>,
    /// Completed upgrades.
    pub upgrades: HashSet<UpgradeId>,
    /// Per-cell visibility: 0 hidden, 1 fogged, 2 visible.
    pub visibility: Option<Grid<u8>>,
    /// Per-cell creep presence.
    pub creep: Option<Grid<u8>>,
    pub(crate) unresolved_ids: usize,
    pub(crate) own_by_type: OnceCell<HashMap<UnitTypeId, Units>>,
}

impl StateSnapshot {
    /// Number of raw ids absent from the registry: unit types, order
    /// abilities, buffs, upgrades and effects, counted per occurrence.
    #[must_use]
    pub fn unresolved_ids(&self) -> usize {
        self.unresolved_ids
    }

    /// Own units of exactly `type_id`.
    ///
    /// The index is built on first use and lives as long as the snapshot.
    #[must_use]
    pub fn own_units_of_type(&self, type_id: UnitTypeId) -> Units {
        self.own_by_type
            .get_or_init(|| {
                let mut index: HashMap<UnitTypeId, Vec<Arc<Unit>>> = HashMap::new();
                for unit in &self.units {
                    index.entry(unit.type_id).or_default().push(Arc::clone(unit));
                }
                index
                    .into_iter()
                    .map(|(id, units)| (id, Units::new(units)))
                    .collect()
            })
            .get(&type_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Expansions that have an own townhall within reach, paired with the
    /// closest such townhall.
    #[must_use]
    pub fn owned_expansions<'m>(
        &self,
        map: &'m StaticMap,
    ) -> Vec<(&'m ExpansionLocation, Arc<Unit>)> {
        map.expansion_locations()
            .iter()
            .filter_map(|location| {
                let target = location.townhall;
                self.townhalls
                    .iter()
                    .filter(|unit| unit.distance_to(target) < EXPANSION_GAP_THRESHOLD)
                    .min_by(|a, b| {
                        a.position
                            .distance_squared(target)
                            .total_cmp(&b.position.distance_squared(target))
                    })
                    .map(|unit| (location, Arc::clone(unit)))
            })
            .collect()
    }

    /// Own units of `type_id` in production: queued orders using its creation
    /// ability plus unfinished units of the type.
    ///
    /// Unfinished Terran structures are skipped since the constructing worker
    /// still carries the build order.
    #[must_use]
    pub fn already_pending(&self, type_id: UnitTypeId, catalog: &UnitCatalog) -> usize {
        let Some(info) = catalog.get(type_id) else {
            return 0;
        };
        let ordered = info.creation_ability.map_or(0, |ability| {
            self.units
                .iter()
                .flat_map(|unit| unit.orders.iter())
                .filter(|order| order.ability == ability)
                .count()
        });
        let unfinished = self
            .units
            .iter()
            .filter(|unit| unit.type_id == type_id && !unit.is_ready())
            .filter(|unit| !(unit.is_structure && info.race == Race::Terran))
            .count();
        ordered + unfinished
    }

    /// Whether the cell containing `point` is in vision.
    #[must_use]
    pub fn is_visible(&self, point: Point2) -> bool {
        self.visibility
            .as_ref()
            .and_then(|grid| grid.at(point))
            .is_some_and(|value| value == VISIBLE)
    }

    /// Whether the cell containing `point` has creep.
    #[must_use]
    pub fn has_creep(&self, point: Point2) -> bool {
        self.creep
            .as_ref()
            .and_then(|grid| grid.at(point))
            .is_some_and(|value| value != 0)
    }

    /// Game time in seconds.
    #[must_use]
    pub fn time_seconds(&self) -> f64 {
        f64::from(self.game_loop) / GAME_LOOPS_PER_SECOND
    }

    /// Game time as `mm:ss`.
    #[must_use]
    pub fn time_formatted(&self) -> String {
        let seconds = self.time_seconds() as u64;
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }

    /// Free supply; negative while supply blocked after losing depots.
    #[must_use]
    pub fn supply_left(&self) -> i64 {
        i64::from(self.common.food_cap) - i64::from(self.common.food_used)
    }

    /// Whether banked resources cover the cost of `type_id`.
    ///
    /// Types missing from the catalog are never affordable.
    #[must_use]
    pub fn can_afford(&self, type_id: UnitTypeId, catalog: &UnitCatalog) -> bool {
        catalog.get(type_id).is_some_and(|info| {
            self.common.minerals >= info.mineral_cost && self.common.vespene >= info.vespene_cost
        })
    }

    /// Whether free supply covers `type_id`.
    #[must_use]
    pub fn can_feed(&self, type_id: UnitTypeId, catalog: &UnitCatalog) -> bool {
        catalog
            .get(type_id)
            .is_some_and(|info| info.food_required <= self.supply_left() as f64)
    }
}
