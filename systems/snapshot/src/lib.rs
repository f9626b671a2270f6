#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-step decoder turning a raw observation into a [`StateSnapshot`].
//!
//! Decoding is pure: the same observation, registry, map and catalog always
//! yield the same snapshot, and nothing from an earlier step is reused.

mod activity;
mod events;
mod roles;
mod snapshot;

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use once_cell::sync::OnceCell;
use sc2_state_core::{
    AbilityId, Alliance, BuffId, CargoInfo, DecodeError, DisplayType, Grid, HarvesterInfo,
    IdCategory, Observation, OrderTarget, RawImage, RawOrderTarget, RawUnit, ResourceContents,
    ResourceKind, Tag, Unit, UnitCatalog, UnitOrder, UnitTypeId, UpgradeId, Vitals,
};
use sc2_state_map::StaticMap;
use sc2_state_registry::IdRegistry;
use sc2_state_units::Units;

pub use events::{Alert, ChatMessage, EffectData};
pub use snapshot::StateSnapshot;

use activity::ActivityTable;
use roles::{OwnRole, RoleTable};

/// Decoder bound to the match-wide registry, map and catalog.
#[derive(Debug)]
pub struct Decoder<'a> {
    registry: &'a IdRegistry,
    map: &'a StaticMap,
    catalog: &'a UnitCatalog,
    roles: RoleTable,
    activities: ActivityTable,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder, resolving the unit role and activity tables once.
    #[must_use]
    pub fn new(registry: &'a IdRegistry, map: &'a StaticMap, catalog: &'a UnitCatalog) -> Self {
        Self {
            registry,
            map,
            catalog,
            roles: RoleTable::new(registry),
            activities: ActivityTable::new(registry),
        }
    }

    /// Decodes one observation.
    pub fn decode(&self, observation: &Observation) -> Result<StateSnapshot, DecodeError> {
        let common = observation
            .player_common
            .ok_or(DecodeError::MissingField("player_common"))?;
        let raw = observation
            .raw_data
            .as_ref()
            .ok_or(DecodeError::MissingField("raw_data"))?;

        let (visibility, creep) = match raw.map_state.as_ref() {
            Some(state) => (
                Some(self.decode_grid(&state.visibility, "visibility")?),
                Some(self.decode_grid(&state.creep, "creep")?),
            ),
            None => (None, None),
        };

        let mut unresolved_ids = 0;
        let records: Vec<Arc<Unit>> = deduplicate(&raw.units)
            .into_iter()
            .map(|raw_unit| {
                let unit = self.decode_unit(raw_unit);
                if !unit.type_known {
                    unresolved_ids += 1;
                    log::warn!(
                        "unit {} has unregistered type id {}",
                        unit.tag,
                        raw_unit.unit_type
                    );
                }
                unresolved_ids += self.count_unresolved(
                    IdCategory::Ability,
                    raw_unit.orders.iter().map(|order| order.ability_id),
                );
                unresolved_ids +=
                    self.count_unresolved(IdCategory::Buff, raw_unit.buff_ids.iter().copied());
                Arc::new(unit)
            })
            .collect();
        unresolved_ids += self.count_unresolved(
            IdCategory::Upgrade,
            raw.player.upgrade_ids.iter().copied(),
        );
        unresolved_ids += self.count_unresolved(
            IdCategory::Effect,
            raw.effects.iter().map(|effect| effect.effect_id),
        );

        let mut groups = Groups::default();
        for unit in &records {
            self.assign(&mut groups, unit);
        }

        let mut resources = groups.mineral_field.clone();
        resources.extend(groups.vespene_geyser.iter().cloned());

        Ok(StateSnapshot {
            game_loop: observation.game_loop,
            common,
            all_units: Units::new(records),
            units: Units::new(groups.units),
            townhalls: Units::new(groups.townhalls),
            workers: Units::new(groups.workers),
            army: Units::new(groups.army),
            structures: Units::new(groups.structures),
            other: Units::new(groups.other),
            enemy_units: Units::new(groups.enemy_units),
            enemy_structures: Units::new(groups.enemy_structures),
            mineral_field: Units::new(groups.mineral_field),
            vespene_geyser: Units::new(groups.vespene_geyser),
            resources: Units::new(resources),
            destructables: Units::new(groups.destructables),
            watchtowers: Units::new(groups.watchtowers),
            dead_units: raw.dead_units.iter().copied().collect(),
            effects: raw.effects.iter().map(EffectData::from).collect(),
            alerts: observation
                .alerts
                .iter()
                .copied()
                .map(Alert::from_code)
                .collect(),
            chat: observation.chat.iter().map(ChatMessage::from).collect(),
            score: observation.score,
            upgrades: raw
                .player
                .upgrade_ids
                .iter()
                .copied()
                .map(UpgradeId::new)
                .collect(),
            visibility,
            creep,
            unresolved_ids,
            own_by_type: OnceCell::new(),
        })
    }

    /// Counts and logs the ids of `category` the registry does not know.
    fn count_unresolved<I>(&self, category: IdCategory, ids: I) -> usize
    where
        I: IntoIterator<Item = u32>,
    {
        ids.into_iter()
            .filter(|id| {
                let known = self.registry.contains(category, *id);
                if !known {
                    log::warn!("unregistered {category} id {id}");
                }
                !known
            })
            .count()
    }

    fn decode_grid(&self, image: &RawImage, name: &'static str) -> Result<Grid<u8>, DecodeError> {
        let grid = Grid::from_raw(image).map_err(|source| DecodeError::grid(name, source))?;
        let size = self.map.map_size();
        if f64::from(grid.width()) != size.width || f64::from(grid.height()) != size.height {
            return Err(DecodeError::DimensionMismatch {
                name,
                width: size.width as u32,
                height: size.height as u32,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        Ok(grid)
    }

    fn decode_unit(&self, raw: &RawUnit) -> Unit {
        let type_id = UnitTypeId::new(raw.unit_type);
        let name = self.registry.unit_type_name(type_id);
        let contents = name.and_then(ResourceKind::from_type_name).map(|kind| {
            let amount = match kind {
                ResourceKind::Mineral => raw.mineral_contents,
                ResourceKind::Vespene => raw.vespene_contents,
            };
            ResourceContents { kind, amount }
        });

        let mut unit = Unit::new(raw.tag, type_id, raw.alliance, raw.pos.to2());
        unit.type_known = self.registry.contains(IdCategory::UnitType, raw.unit_type);
        unit.owner = raw.owner;
        unit.display_type = raw.display_type;
        unit.position3d = raw.pos;
        unit.facing = raw.facing;
        unit.radius = raw.radius;
        unit.build_progress = raw.build_progress;
        unit.health = raw.health;
        unit.health_max = raw.health_max;
        unit.shield = Vitals::from_raw(raw.shield, raw.shield_max);
        unit.energy = Vitals::from_raw(raw.energy, raw.energy_max);
        unit.is_structure = self.catalog.is_structure(type_id);
        unit.is_flying = raw.is_flying;
        unit.is_burrowed = raw.is_burrowed;
        unit.is_hallucination = raw.is_hallucination;
        unit.is_blip = raw.is_blip;
        unit.is_powered = raw.is_powered;
        unit.is_selected = raw.is_selected;
        unit.cloak = raw.cloak;
        unit.orders = raw
            .orders
            .iter()
            .map(|order| UnitOrder {
                ability: AbilityId::new(order.ability_id),
                target: match order.target {
                    Some(RawOrderTarget::Position(point)) => OrderTarget::Position(point),
                    Some(RawOrderTarget::Unit(tag)) => OrderTarget::Unit(tag),
                    None => OrderTarget::None,
                },
                progress: order.progress,
            })
            .collect();
        unit.buffs = raw.buff_ids.iter().copied().map(BuffId::new).collect();
        unit.activity = self.activities.activity(&unit.orders, &unit.buffs);
        unit.cargo = (raw.cargo_space_max > 0).then(|| CargoInfo {
            used: raw.cargo_space_taken,
            max: raw.cargo_space_max,
            passengers: raw.passengers.iter().map(|passenger| passenger.tag).collect(),
        });
        unit.harvesters = match (raw.assigned_harvesters, raw.ideal_harvesters) {
            (Some(assigned), Some(ideal)) => Some(HarvesterInfo { assigned, ideal }),
            _ => None,
        };
        unit.contents = contents;
        unit.weapon_cooldown = raw.weapon_cooldown;
        unit.add_on_tag = raw.add_on_tag.filter(|tag| *tag != 0);
        unit.engaged_target_tag = raw.engaged_target_tag.filter(|tag| *tag != 0);
        unit.detect_range = raw.detect_range;
        unit.radar_range = raw.radar_range;
        unit
    }

    fn assign(&self, groups: &mut Groups, unit: &Arc<Unit>) {
        let shared = Arc::clone(unit);
        match unit.alliance {
            Alliance::Own => {
                groups.units.push(Arc::clone(unit));
                let bucket = match self.roles.own_role(unit.type_id, self.catalog) {
                    OwnRole::Townhall => &mut groups.townhalls,
                    OwnRole::Worker => &mut groups.workers,
                    OwnRole::Other => &mut groups.other,
                    OwnRole::Structure => &mut groups.structures,
                    OwnRole::Army => &mut groups.army,
                };
                bucket.push(shared);
            }
            Alliance::Enemy if unit.is_structure => groups.enemy_structures.push(shared),
            Alliance::Enemy => groups.enemy_units.push(shared),
            Alliance::Neutral if unit.is_mineral_field() => groups.mineral_field.push(shared),
            Alliance::Neutral if unit.is_vespene_geyser() => groups.vespene_geyser.push(shared),
            Alliance::Neutral if self.roles.is_watchtower(unit.type_id) => {
                groups.watchtowers.push(shared)
            }
            Alliance::Neutral => groups.destructables.push(shared),
            Alliance::Ally => {}
        }
    }
}

#[derive(Default)]
struct Groups {
    units: Vec<Arc<Unit>>,
    townhalls: Vec<Arc<Unit>>,
    workers: Vec<Arc<Unit>>,
    army: Vec<Arc<Unit>>,
    structures: Vec<Arc<Unit>>,
    other: Vec<Arc<Unit>>,
    enemy_units: Vec<Arc<Unit>>,
    enemy_structures: Vec<Arc<Unit>>,
    mineral_field: Vec<Arc<Unit>>,
    vespene_geyser: Vec<Arc<Unit>>,
    destructables: Vec<Arc<Unit>>,
    watchtowers: Vec<Arc<Unit>>,
}

/// Keeps one entry per tag at the position of its first appearance; a
/// visible entry replaces a remembered one.
fn deduplicate(units: &[RawUnit]) -> Vec<&RawUnit> {
    let mut kept: Vec<&RawUnit> = Vec::with_capacity(units.len());
    let mut slots: HashMap<Tag, usize> = HashMap::with_capacity(units.len());
    for unit in units {
        match slots.entry(unit.tag) {
            Entry::Vacant(slot) => {
                let _slot = slot.insert(kept.len());
                kept.push(unit);
            }
            Entry::Occupied(slot) => {
                log::warn!("tag {} reported more than once", unit.tag);
                let index = *slot.get();
                if kept[index].display_type == DisplayType::Snapshot
                    && unit.display_type == DisplayType::Visible
                {
                    kept[index] = unit;
                }
            }
        }
    }
    kept
}

/// Decodes one observation without keeping a [`Decoder`] around.
pub fn decode(
    observation: &Observation,
    registry: &IdRegistry,
    map: &StaticMap,
    catalog: &UnitCatalog,
) -> Result<StateSnapshot, DecodeError> {
    Decoder::new(registry, map, catalog).decode(observation)
}
