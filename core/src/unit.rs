//! Decoded unit records shared between the snapshot decoder and the query container.

use serde::{Deserialize, Serialize};

use crate::{AbilityId, Alliance, BuffId, CloakState, DisplayType, Point2, Point3, Tag, UnitTypeId};

/// Kind of harvestable resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Mineral field of any variant.
    Mineral,
    /// Vespene geyser of any variant.
    Vespene,
}

impl ResourceKind {
    /// Classifies a semantic unit type name such as `MINERALFIELD750`.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        if name.contains("MINERALFIELD") {
            Some(Self::Mineral)
        } else if name.contains("GEYSER") {
            Some(Self::Vespene)
        } else {
            None
        }
    }
}

/// Current and maximum value of a bounded stat such as shield or energy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Current value.
    pub current: f64,
    /// Maximum value; always positive.
    pub max: f64,
}

impl Vitals {
    /// Builds vitals when the unit actually has the stat.
    #[must_use]
    pub fn from_raw(current: f64, max: f64) -> Option<Self> {
        (max > 0.0).then_some(Self { current, max })
    }

    /// Current value as a fraction of the maximum.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.current / self.max
    }
}

/// Cargo carried by transports and bunkers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CargoInfo {
    /// Space currently used.
    pub used: u32,
    /// Total capacity.
    pub max: u32,
    /// Tags of loaded passengers.
    pub passengers: Vec<Tag>,
}

impl CargoInfo {
    /// Remaining capacity.
    #[must_use]
    pub fn left(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }
}

/// Worker saturation of a townhall or gas building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvesterInfo {
    /// Workers currently assigned.
    pub assigned: u32,
    /// Workers needed for full saturation.
    pub ideal: u32,
}

impl HarvesterInfo {
    /// Positive when over-saturated, negative when workers are missing.
    #[must_use]
    pub fn surplus(&self) -> i64 {
        i64::from(self.assigned) - i64::from(self.ideal)
    }
}

/// Remaining contents of a resource entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContents {
    /// Mineral or vespene.
    pub kind: ResourceKind,
    /// Amount left; zero for snapshot resources that are not in vision.
    pub amount: u32,
}

/// Target of a decoded order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum OrderTarget {
    /// No target.
    None,
    /// Map position.
    Position(Point2),
    /// Another unit.
    Unit(Tag),
}

/// Decoded order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitOrder {
    /// Ability being executed.
    pub ability: AbilityId,
    /// Order target.
    pub target: OrderTarget,
    /// Completion fraction.
    pub progress: f64,
}

/// What a unit is busy with, judged from its current order and buffs.
///
/// Abilities and buffs are matched by registry name when the step is decoded,
/// so these flags stay false when the registry lacks the names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Current order heads to a resource.
    pub gathering: bool,
    /// Current order brings a load back.
    pub returning: bool,
    /// Current order is a plain move.
    pub moving: bool,
    /// Current order is an attack.
    pub attacking: bool,
    /// Current order is a repair.
    pub repairing: bool,
    /// Holds a mineral load.
    pub carrying_minerals: bool,
    /// Holds a vespene load.
    pub carrying_vespene: bool,
}

/// Immutable record of one entity as seen during a single step.
///
/// Category specific data lives in explicit optional fields that the decoder
/// fills only for the units that carry it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique tag.
    pub tag: Tag,
    /// Type identifier; may be unknown to the registry.
    pub type_id: UnitTypeId,
    /// Whether the registry knows `type_id`.
    pub type_known: bool,
    /// Relationship to the observer.
    pub alliance: Alliance,
    /// Owning player id.
    pub owner: u32,
    /// Whether the unit is in vision, remembered or hidden.
    pub display_type: DisplayType,
    /// Position on the map plane.
    pub position: Point2,
    /// Position including elevation.
    pub position3d: Point3,
    /// Facing in radians.
    pub facing: f64,
    /// Footprint radius.
    pub radius: f64,
    /// Construction completion fraction.
    pub build_progress: f64,
    /// Current health.
    pub health: f64,
    /// Maximum health.
    pub health_max: f64,
    /// Shield, for units that have one.
    pub shield: Option<Vitals>,
    /// Energy, for units that have it.
    pub energy: Option<Vitals>,
    /// Whether the type carries the structure attribute.
    pub is_structure: bool,
    /// Airborne.
    pub is_flying: bool,
    /// Burrowed.
    pub is_burrowed: bool,
    /// Hallucination.
    pub is_hallucination: bool,
    /// Radar blip.
    pub is_blip: bool,
    /// Powered by a pylon.
    pub is_powered: bool,
    /// Selected by the player.
    pub is_selected: bool,
    /// Cloak state.
    pub cloak: CloakState,
    /// Queued orders, current first.
    pub orders: Vec<UnitOrder>,
    /// Harvesting and combat state derived from orders and buffs.
    pub activity: Activity,
    /// Active buffs.
    pub buffs: Vec<BuffId>,
    /// Cargo, for units with capacity.
    pub cargo: Option<CargoInfo>,
    /// Saturation, for townhalls and gas buildings.
    pub harvesters: Option<HarvesterInfo>,
    /// Contents, for resources.
    pub contents: Option<ResourceContents>,
    /// Weapon cooldown, for own units that have a weapon.
    pub weapon_cooldown: Option<f64>,
    /// Attached add-on.
    pub add_on_tag: Option<Tag>,
    /// Engaged target.
    pub engaged_target_tag: Option<Tag>,
    /// Detection radius.
    pub detect_range: f64,
    /// Radar radius.
    pub radar_range: f64,
}

impl Unit {
    /// Creates a visible, fully built record with every optional field empty.
    #[must_use]
    pub fn new(tag: Tag, type_id: UnitTypeId, alliance: Alliance, position: Point2) -> Self {
        Self {
            tag,
            type_id,
            type_known: true,
            alliance,
            owner: 0,
            display_type: DisplayType::Visible,
            position,
            position3d: position.to3(),
            facing: 0.0,
            radius: 0.5,
            build_progress: 1.0,
            health: 0.0,
            health_max: 0.0,
            shield: None,
            energy: None,
            is_structure: false,
            is_flying: false,
            is_burrowed: false,
            is_hallucination: false,
            is_blip: false,
            is_powered: false,
            is_selected: false,
            cloak: CloakState::NotCloaked,
            orders: Vec::new(),
            activity: Activity::default(),
            buffs: Vec::new(),
            cargo: None,
            harvesters: None,
            contents: None,
            weapon_cooldown: None,
            add_on_tag: None,
            engaged_target_tag: None,
            detect_range: 0.0,
            radar_range: 0.0,
        }
    }

    /// Owned by the observer.
    #[must_use]
    pub fn is_mine(&self) -> bool {
        self.alliance == Alliance::Own
    }

    /// Owned by an opponent.
    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.alliance == Alliance::Enemy
    }

    /// In vision this step.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.display_type == DisplayType::Visible
    }

    /// Remembered from an earlier sighting; data is stale.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.display_type == DisplayType::Snapshot
    }

    /// Known to exist but not shown.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.display_type == DisplayType::Hidden
    }

    /// Construction has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.build_progress >= 1.0
    }

    /// No orders are queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.orders.is_empty()
    }

    /// Cloaked, whether or not detected.
    #[must_use]
    pub fn is_cloaked(&self) -> bool {
        matches!(
            self.cloak,
            CloakState::Cloaked | CloakState::CloakedDetected | CloakState::CloakedAllied
        )
    }

    /// Health as a fraction of maximum health, zero for units without health.
    #[must_use]
    pub fn health_percentage(&self) -> f64 {
        if self.health_max > 0.0 {
            self.health / self.health_max
        } else {
            0.0
        }
    }

    /// Mineral field.
    #[must_use]
    pub fn is_mineral_field(&self) -> bool {
        self.contents
            .is_some_and(|contents| contents.kind == ResourceKind::Mineral)
    }

    /// Vespene geyser.
    #[must_use]
    pub fn is_vespene_geyser(&self) -> bool {
        self.contents
            .is_some_and(|contents| contents.kind == ResourceKind::Vespene)
    }

    /// Euclidean distance from the unit's position to `point`.
    #[must_use]
    pub fn distance_to(&self, point: Point2) -> f64 {
        self.position.distance_to(point)
    }

    /// Carries the provided buff.
    #[must_use]
    pub fn has_buff(&self, buff: BuffId) -> bool {
        self.buffs.contains(&buff)
    }

    /// Current order uses the provided ability.
    #[must_use]
    pub fn is_using_ability(&self, ability: AbilityId) -> bool {
        self.orders.first().is_some_and(|order| order.ability == ability)
    }

    /// On the way to a resource.
    #[must_use]
    pub fn is_gathering(&self) -> bool {
        self.activity.gathering
    }

    /// Bringing a load back.
    #[must_use]
    pub fn is_returning(&self) -> bool {
        self.activity.returning
    }

    /// Gathering or returning.
    #[must_use]
    pub fn is_collecting(&self) -> bool {
        self.activity.gathering || self.activity.returning
    }

    /// Holds minerals.
    #[must_use]
    pub fn is_carrying_minerals(&self) -> bool {
        self.activity.carrying_minerals
    }

    /// Holds vespene.
    #[must_use]
    pub fn is_carrying_vespene(&self) -> bool {
        self.activity.carrying_vespene
    }

    /// Holds either resource.
    #[must_use]
    pub fn is_carrying_resource(&self) -> bool {
        self.activity.carrying_minerals || self.activity.carrying_vespene
    }

    /// Moving without attacking.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.activity.moving
    }

    /// Executing an attack order.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.activity.attacking
    }

    /// Repairing.
    #[must_use]
    pub fn is_repairing(&self) -> bool {
        self.activity.repairing
    }
}
