//! Static per-type data indexed by unit type.

use std::collections::HashMap;

use crate::{AbilityId, Attribute, Race, RawGameData, RawUnitTypeData, UnitTypeId};

/// Static facts about one unit type.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitTypeInfo {
    /// Type identifier.
    pub id: UnitTypeId,
    /// Display name reported by the game data.
    pub name: String,
    /// Attribute flags.
    pub attributes: Vec<Attribute>,
    /// Owning race.
    pub race: Race,
    /// Mineral cost.
    pub mineral_cost: u32,
    /// Vespene cost.
    pub vespene_cost: u32,
    /// Supply required.
    pub food_required: f64,
    /// Supply provided.
    pub food_provided: f64,
    /// Base type this type morphs from.
    pub unit_alias: Option<UnitTypeId>,
    /// Types that satisfy the same tech requirement.
    pub tech_alias: Vec<UnitTypeId>,
    /// Ability that creates the type.
    pub creation_ability: Option<AbilityId>,
    /// Sight radius.
    pub sight_range: f64,
    /// Movement speed.
    pub movement_speed: f64,
    /// Base armor.
    pub armor: f64,
}

impl UnitTypeInfo {
    fn from_raw(raw: &RawUnitTypeData) -> Self {
        Self {
            id: UnitTypeId::new(raw.unit_id),
            name: raw.name.clone(),
            attributes: raw.attributes.clone(),
            race: raw.race,
            mineral_cost: raw.mineral_cost,
            vespene_cost: raw.vespene_cost,
            food_required: raw.food_required,
            food_provided: raw.food_provided,
            unit_alias: (raw.unit_alias != 0).then(|| UnitTypeId::new(raw.unit_alias)),
            tech_alias: raw.tech_alias.iter().copied().map(UnitTypeId::new).collect(),
            creation_ability: raw.ability_id.map(AbilityId::new),
            sight_range: raw.sight_range,
            movement_speed: raw.movement_speed,
            armor: raw.armor,
        }
    }

    /// Reports whether the type carries `attribute`.
    #[must_use]
    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }
}

/// Lookup table from unit type to its static data.
#[derive(Clone, Debug, Default)]
pub struct UnitCatalog {
    types: HashMap<UnitTypeId, UnitTypeInfo>,
}

impl UnitCatalog {
    /// Indexes the unit section of the game data. Later entries win on duplicates.
    #[must_use]
    pub fn from_raw(data: &RawGameData) -> Self {
        let types = data
            .units
            .iter()
            .map(|raw| (UnitTypeId::new(raw.unit_id), UnitTypeInfo::from_raw(raw)))
            .collect();
        Self { types }
    }

    /// Static data for `id`, if known.
    #[must_use]
    pub fn get(&self, id: UnitTypeId) -> Option<&UnitTypeInfo> {
        self.types.get(&id)
    }

    /// Number of indexed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether `id` is a structure type.
    #[must_use]
    pub fn is_structure(&self, id: UnitTypeId) -> bool {
        self.has_attribute(id, Attribute::Structure)
    }

    /// Whether `id` carries `attribute`; unknown types carry nothing.
    #[must_use]
    pub fn has_attribute(&self, id: UnitTypeId, attribute: Attribute) -> bool {
        self.get(id).is_some_and(|info| info.has_attribute(attribute))
    }

    /// Base type `id` morphs from, if any.
    #[must_use]
    pub fn unit_alias(&self, id: UnitTypeId) -> Option<UnitTypeId> {
        self.get(id).and_then(|info| info.unit_alias)
    }

    /// Types satisfying the same tech requirement as `id`.
    #[must_use]
    pub fn tech_alias(&self, id: UnitTypeId) -> &[UnitTypeId] {
        self.get(id).map_or(&[], |info| info.tech_alias.as_slice())
    }
}
