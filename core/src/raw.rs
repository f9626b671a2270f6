//! Payloads delivered by the external transport.
//!
//! These mirror the game's wire messages closely enough to be filled by any
//! transport. Optional sub-messages stay optional here so that the decoder
//! can report a missing one as a failure instead of guessing.

use serde::{Deserialize, Serialize};

use crate::{Point2, Point3, RawImage, Tag};

/// Relationship between the observing player and a unit's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alliance {
    /// Owned by the observing player.
    #[serde(rename = "Self")]
    Own,
    /// Owned by an allied player.
    Ally,
    /// Map-owned entities such as resources and rocks.
    Neutral,
    /// Owned by an opposing player.
    Enemy,
}

/// How the observing player currently perceives a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayType {
    /// In vision this step.
    #[default]
    Visible,
    /// Remembered from an earlier sighting; data is stale.
    Snapshot,
    /// Known to exist but not shown.
    Hidden,
}

/// Cloak state reported for a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloakState {
    /// Cloak state could not be determined.
    #[default]
    Unknown,
    /// Cloaked and not detected.
    Cloaked,
    /// Cloaked but revealed by detection.
    CloakedDetected,
    /// Not cloaked.
    NotCloaked,
    /// Cloaked by an allied effect.
    CloakedAllied,
}

/// Race chosen or assigned to a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    /// Race is not known.
    #[default]
    NoRace,
    /// Terran.
    Terran,
    /// Zerg.
    Zerg,
    /// Protoss.
    Protoss,
    /// Random selection before the game resolves it.
    Random,
}

/// Target of a queued unit order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawOrderTarget {
    /// Order aimed at a map position.
    Position(Point2),
    /// Order aimed at another unit.
    Unit(Tag),
}

/// Order queued on a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    /// Ability being executed.
    pub ability_id: u32,
    /// Optional order target.
    #[serde(default)]
    pub target: Option<RawOrderTarget>,
    /// Completion fraction for channelled or production orders.
    #[serde(default)]
    pub progress: f64,
}

/// Unit loaded inside a transport or bunker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPassenger {
    /// Tag of the passenger.
    pub tag: Tag,
    /// Type of the passenger.
    pub unit_type: u32,
    /// Current health.
    #[serde(default)]
    pub health: f64,
    /// Maximum health.
    #[serde(default)]
    pub health_max: f64,
}

/// Entity observed by the player during a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawUnit {
    /// Unique tag of the entity.
    pub tag: Tag,
    /// Raw unit type identifier.
    pub unit_type: u32,
    /// Relationship to the observing player.
    pub alliance: Alliance,
    /// Whether the data is live or remembered.
    #[serde(default)]
    pub display_type: DisplayType,
    /// Owning player id.
    #[serde(default)]
    pub owner: u32,
    /// Position including terrain elevation.
    pub pos: Point3,
    /// Facing in radians.
    #[serde(default)]
    pub facing: f64,
    /// Footprint radius.
    #[serde(default)]
    pub radius: f64,
    /// Construction completion fraction.
    #[serde(default = "one")]
    pub build_progress: f64,
    /// Cloak state.
    #[serde(default)]
    pub cloak: CloakState,
    /// Current health.
    #[serde(default)]
    pub health: f64,
    /// Maximum health.
    #[serde(default)]
    pub health_max: f64,
    /// Current shield.
    #[serde(default)]
    pub shield: f64,
    /// Maximum shield; zero for units without shields.
    #[serde(default)]
    pub shield_max: f64,
    /// Current energy.
    #[serde(default)]
    pub energy: f64,
    /// Maximum energy; zero for units without energy.
    #[serde(default)]
    pub energy_max: f64,
    /// Remaining minerals for mineral fields.
    #[serde(default)]
    pub mineral_contents: u32,
    /// Remaining vespene for geysers and gas buildings.
    #[serde(default)]
    pub vespene_contents: u32,
    /// Whether the unit is airborne.
    #[serde(default)]
    pub is_flying: bool,
    /// Whether the unit is burrowed.
    #[serde(default)]
    pub is_burrowed: bool,
    /// Whether the unit is a hallucination.
    #[serde(default)]
    pub is_hallucination: bool,
    /// Whether the entity is a radar blip.
    #[serde(default)]
    pub is_blip: bool,
    /// Whether the entity is powered by a pylon.
    #[serde(default)]
    pub is_powered: bool,
    /// Whether the entity is in the player's selection.
    #[serde(default)]
    pub is_selected: bool,
    /// Queued orders, current first.
    #[serde(default)]
    pub orders: Vec<RawOrder>,
    /// Tag of the attached add-on.
    #[serde(default)]
    pub add_on_tag: Option<Tag>,
    /// Loaded passengers.
    #[serde(default)]
    pub passengers: Vec<RawPassenger>,
    /// Cargo space used.
    #[serde(default)]
    pub cargo_space_taken: u32,
    /// Cargo capacity; zero for units that cannot carry cargo.
    #[serde(default)]
    pub cargo_space_max: u32,
    /// Workers currently assigned to a townhall or gas building.
    #[serde(default)]
    pub assigned_harvesters: Option<u32>,
    /// Ideal worker count for a townhall or gas building.
    #[serde(default)]
    pub ideal_harvesters: Option<u32>,
    /// Remaining weapon cooldown in game loops.
    #[serde(default)]
    pub weapon_cooldown: Option<f64>,
    /// Tag of the unit currently engaged.
    #[serde(default)]
    pub engaged_target_tag: Option<Tag>,
    /// Active buffs.
    #[serde(default)]
    pub buff_ids: Vec<u32>,
    /// Detection radius.
    #[serde(default)]
    pub detect_range: f64,
    /// Radar radius.
    #[serde(default)]
    pub radar_range: f64,
}

fn one() -> f64 {
    1.0
}

impl RawUnit {
    /// Creates a visible, fully built unit with every optional field empty.
    #[must_use]
    pub fn new(tag: Tag, unit_type: u32, alliance: Alliance, pos: Point2) -> Self {
        Self {
            tag,
            unit_type,
            alliance,
            display_type: DisplayType::Visible,
            owner: 0,
            pos: pos.to3(),
            facing: 0.0,
            radius: 0.5,
            build_progress: 1.0,
            cloak: CloakState::NotCloaked,
            health: 0.0,
            health_max: 0.0,
            shield: 0.0,
            shield_max: 0.0,
            energy: 0.0,
            energy_max: 0.0,
            mineral_contents: 0,
            vespene_contents: 0,
            is_flying: false,
            is_burrowed: false,
            is_hallucination: false,
            is_blip: false,
            is_powered: false,
            is_selected: false,
            orders: Vec::new(),
            add_on_tag: None,
            passengers: Vec::new(),
            cargo_space_taken: 0,
            cargo_space_max: 0,
            assigned_harvesters: None,
            ideal_harvesters: None,
            weapon_cooldown: None,
            engaged_target_tag: None,
            buff_ids: Vec::new(),
            detect_range: 0.0,
            radar_range: 0.0,
        }
    }
}

/// Effect area active on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEffect {
    /// Raw effect identifier.
    pub effect_id: u32,
    /// Positions covered by the effect.
    #[serde(default)]
    pub pos: Vec<Point2>,
    /// Relationship between the effect owner and the observer.
    #[serde(default)]
    pub alliance: Option<Alliance>,
    /// Owning player id.
    #[serde(default)]
    pub owner: u32,
    /// Radius of each covered position.
    #[serde(default)]
    pub radius: f64,
}

/// Visibility and creep images for the step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMapState {
    /// Per-cell visibility: 0 hidden, 1 fogged, 2 visible.
    pub visibility: RawImage,
    /// Per-cell creep presence.
    pub creep: RawImage,
}

/// Player-scoped raw data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlayer {
    /// Upgrades completed so far.
    #[serde(default)]
    pub upgrade_ids: Vec<u32>,
    /// Camera center.
    #[serde(default)]
    pub camera: Option<Point2>,
}

/// Raw entity section of an observation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    /// Every entity visible or remembered by the player.
    #[serde(default)]
    pub units: Vec<RawUnit>,
    /// Tags of entities that died this step.
    #[serde(default)]
    pub dead_units: Vec<Tag>,
    /// Active effects.
    #[serde(default)]
    pub effects: Vec<RawEffect>,
    /// Visibility and creep images.
    #[serde(default)]
    pub map_state: Option<RawMapState>,
    /// Player-scoped data.
    #[serde(default)]
    pub player: RawPlayer,
}

/// Economy and supply counters for the observing player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommon {
    /// Player id of the observer.
    pub player_id: u32,
    /// Banked minerals.
    pub minerals: u32,
    /// Banked vespene.
    pub vespene: u32,
    /// Supply cap.
    pub food_cap: u32,
    /// Supply used.
    pub food_used: u32,
    /// Supply used by army units.
    pub food_army: u32,
    /// Supply used by workers.
    pub food_workers: u32,
    /// Idle worker count.
    #[serde(default)]
    pub idle_worker_count: u32,
    /// Army unit count.
    #[serde(default)]
    pub army_count: u32,
    /// Warp gate count.
    #[serde(default)]
    pub warp_gate_count: u32,
    /// Larva count.
    #[serde(default)]
    pub larva_count: u32,
}

/// Score summary for the observing player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScore {
    /// Aggregate score.
    #[serde(default)]
    pub score: i64,
    /// Minerals collected so far.
    #[serde(default)]
    pub collected_minerals: f64,
    /// Vespene collected so far.
    #[serde(default)]
    pub collected_vespene: f64,
    /// Minerals collection rate.
    #[serde(default)]
    pub collection_rate_minerals: f64,
    /// Vespene collection rate.
    #[serde(default)]
    pub collection_rate_vespene: f64,
    /// Seconds spent with idle production.
    #[serde(default)]
    pub idle_production_time: f64,
    /// Seconds workers spent idle.
    #[serde(default)]
    pub idle_worker_time: f64,
    /// Value of killed enemy units.
    #[serde(default)]
    pub killed_value_units: f64,
    /// Value of killed enemy structures.
    #[serde(default)]
    pub killed_value_structures: f64,
}

/// Chat line received during the step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChat {
    /// Sender's player id.
    pub player_id: u32,
    /// Message body.
    pub message: String,
}

/// Per-step observation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Game loop counter.
    pub game_loop: u32,
    /// Economy and supply counters.
    #[serde(default)]
    pub player_common: Option<PlayerCommon>,
    /// Entity data.
    #[serde(default)]
    pub raw_data: Option<RawData>,
    /// Score summary.
    #[serde(default)]
    pub score: Option<RawScore>,
    /// Raw alert codes.
    #[serde(default)]
    pub alerts: Vec<u32>,
    /// Chat received this step.
    #[serde(default)]
    pub chat: Vec<RawChat>,
}

/// Player slot in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Player id.
    pub player_id: u32,
    /// Race requested when joining.
    #[serde(default)]
    pub race_requested: Race,
    /// Race actually played, known for the observer only.
    #[serde(default)]
    pub race_actual: Option<Race>,
}

/// Playable area delivered as two opposite corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRect {
    /// Lower corner.
    pub p0: Point2,
    /// Upper corner.
    pub p1: Point2,
}

/// Static map description delivered once at game start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticMapInfo {
    /// Display name of the map.
    pub map_name: String,
    /// Map width in cells.
    pub map_width: u32,
    /// Map height in cells.
    pub map_height: u32,
    /// One-bit pathing image.
    pub pathing_grid: Option<RawImage>,
    /// One-bit placement image.
    pub placement_grid: Option<RawImage>,
    /// Eight-bit terrain height image.
    pub terrain_height: Option<RawImage>,
    /// Playable area bounds.
    pub playable_area: RawRect,
    /// Possible enemy start locations.
    #[serde(default)]
    pub start_locations: Vec<Point2>,
    /// Players taking part in the match.
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
}

/// Unit attributes reported by the game data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Light armour class.
    Light,
    /// Armored armour class.
    Armored,
    /// Biological unit.
    Biological,
    /// Mechanical unit.
    Mechanical,
    /// Robotic unit.
    Robotic,
    /// Psionic unit.
    Psionic,
    /// Massive unit.
    Massive,
    /// Structure.
    Structure,
    /// Hover unit.
    Hover,
    /// Heroic unit.
    Heroic,
    /// Summoned unit.
    Summoned,
}

/// Static data for one unit type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawUnitTypeData {
    /// Raw unit type identifier.
    pub unit_id: u32,
    /// Display name.
    pub name: String,
    /// Whether the type can be built or spawned.
    #[serde(default)]
    pub available: bool,
    /// Attribute flags.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Mineral cost.
    #[serde(default)]
    pub mineral_cost: u32,
    /// Vespene cost.
    #[serde(default)]
    pub vespene_cost: u32,
    /// Supply required.
    #[serde(default)]
    pub food_required: f64,
    /// Supply provided.
    #[serde(default)]
    pub food_provided: f64,
    /// Owning race.
    #[serde(default)]
    pub race: Race,
    /// Types that satisfy the same tech requirement.
    #[serde(default)]
    pub tech_alias: Vec<u32>,
    /// Base type this type is a morph of; zero when none.
    #[serde(default)]
    pub unit_alias: u32,
    /// Ability that creates the type.
    #[serde(default)]
    pub ability_id: Option<u32>,
    /// Sight radius.
    #[serde(default)]
    pub sight_range: f64,
    /// Movement speed.
    #[serde(default)]
    pub movement_speed: f64,
    /// Base armor.
    #[serde(default)]
    pub armor: f64,
}

/// Static game data delivered once at game start.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGameData {
    /// Data for every unit type.
    #[serde(default)]
    pub units: Vec<RawUnitTypeData>,
}
