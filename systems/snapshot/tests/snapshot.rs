use sc2_state_core::{
    Alliance, Attribute, DecodeError, DisplayType, Observation, PlayerCommon, Point2, Race,
    RawChat, RawData, RawEffect, RawGameData, RawImage, RawMapState, RawOrder, RawRect, RawUnit,
    RawUnitTypeData, StaticMapInfo, UnitCatalog, UnitTypeId, UpgradeId,
};
use sc2_state_map::{MapTuning, StaticMap};
use sc2_state_registry::IdRegistry;
use sc2_state_system_snapshot::{decode, Alert, Decoder};

const COMMAND_CENTER: u32 = 18;
const SUPPLY_DEPOT: u32 = 19;
const SCV: u32 = 45;
const MARINE: u32 = 48;
const LARVA: u32 = 151;
const MINERAL_FIELD: u32 = 341;
const VESPENE_GEYSER: u32 = 342;
const DESTRUCTIBLE_ROCK: u32 = 472;
const XELNAGA_TOWER: u32 = 149;
const UNREGISTERED: u32 = 9_999;

const MAP_SIZE: u32 = 64;
const START: Point2 = Point2::new(12.5, 30.5);

fn registry() -> IdRegistry {
    IdRegistry::from_json(
        r#"{
            "Units": [
                {"id": 18, "name": "CommandCenter"},
                {"id": 19, "name": "SupplyDepot"},
                {"id": 45, "name": "SCV"},
                {"id": 48, "name": "Marine"},
                {"id": 149, "name": "XelNagaTower"},
                {"id": 151, "name": "Larva"},
                {"id": 341, "name": "MineralField"},
                {"id": 342, "name": "VespeneGeyser"},
                {"id": 472, "name": "DestructibleRock"}
            ],
            "Abilities": [
                {"id": 295, "name": "Harvest_Gather_SCV"},
                {"id": 319, "name": "Build_SupplyDepot"},
                {"id": 560, "name": "Train_Marine"}
            ],
            "Upgrades": [],
            "Buffs": [{"id": 271, "name": "CarryMineralFieldMinerals"}],
            "Effects": []
        }"#,
    )
    .expect("registry builds")
}

fn type_data(unit_id: u32, structure: bool, minerals: u32, food: f64) -> RawUnitTypeData {
    RawUnitTypeData {
        unit_id,
        name: String::new(),
        available: true,
        attributes: if structure {
            vec![Attribute::Structure, Attribute::Armored]
        } else {
            vec![Attribute::Biological]
        },
        mineral_cost: minerals,
        vespene_cost: 0,
        food_required: food,
        food_provided: 0.0,
        race: Race::Terran,
        tech_alias: Vec::new(),
        unit_alias: 0,
        ability_id: None,
        sight_range: 0.0,
        movement_speed: 0.0,
        armor: 0.0,
    }
}

fn catalog() -> UnitCatalog {
    UnitCatalog::from_raw(&RawGameData {
        units: vec![
            type_data(COMMAND_CENTER, true, 400, 0.0),
            type_data(SUPPLY_DEPOT, true, 100, 0.0),
            type_data(SCV, false, 50, 1.0),
            type_data(MARINE, false, 50, 1.0),
            type_data(LARVA, false, 0, 0.0),
        ],
    })
}

fn image(fill: u8) -> RawImage {
    RawImage {
        width: MAP_SIZE,
        height: MAP_SIZE,
        bits_per_pixel: 8,
        data: vec![fill; (MAP_SIZE * MAP_SIZE) as usize],
    }
}

fn mineral_line() -> Vec<RawUnit> {
    (0..8)
        .map(|index| {
            RawUnit::new(
                1_000 + index,
                MINERAL_FIELD,
                Alliance::Neutral,
                Point2::new(5.5, 27.0 + index as f64),
            )
        })
        .collect()
}

fn static_map() -> StaticMap {
    let info = StaticMapInfo {
        map_name: "Flatland LE".to_owned(),
        map_width: MAP_SIZE,
        map_height: MAP_SIZE,
        pathing_grid: Some(image(1)),
        placement_grid: Some(image(1)),
        terrain_height: Some(image(120)),
        playable_area: RawRect {
            p0: Point2::new(0.0, 0.0),
            p1: Point2::new(f64::from(MAP_SIZE), f64::from(MAP_SIZE)),
        },
        start_locations: vec![START],
        players: Vec::new(),
    };
    StaticMap::build(&info, &mineral_line(), &registry(), &MapTuning::default())
        .expect("map builds")
}

fn own(tag: u64, unit_type: u32, x: f64, y: f64) -> RawUnit {
    RawUnit::new(tag, unit_type, Alliance::Own, Point2::new(x, y))
}

fn common() -> PlayerCommon {
    PlayerCommon {
        player_id: 1,
        minerals: 75,
        vespene: 0,
        food_cap: 15,
        food_used: 13,
        food_army: 0,
        food_workers: 12,
        ..PlayerCommon::default()
    }
}

fn observation(units: Vec<RawUnit>) -> Observation {
    Observation {
        game_loop: 0,
        player_common: Some(common()),
        raw_data: Some(RawData {
            units,
            ..RawData::default()
        }),
        ..Observation::default()
    }
}

fn opening_units() -> Vec<RawUnit> {
    let mut units = vec![own(1, COMMAND_CENTER, START.x, START.y)];
    units.extend((0..12).map(|index| own(10 + index, SCV, 10.0, 25.0 + index as f64)));
    units
}

#[test]
fn opening_snapshot_counts_workers_and_townhalls() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());

    let snapshot =
        decode(&observation(opening_units()), &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.units.len(), 13);
    assert_eq!(snapshot.workers.len(), 12);
    assert_eq!(snapshot.townhalls.len(), 1);
    assert_eq!(
        snapshot.units.len(),
        snapshot.townhalls.len() + snapshot.workers.len()
    );
    assert!(snapshot.army.is_empty());
    assert!(snapshot.structures.is_empty());
    assert_eq!(snapshot.supply_left(), 2);
    assert_eq!(snapshot.unresolved_ids(), 0);
}

#[test]
fn missing_sub_messages_fail_the_decode() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let decoder = Decoder::new(&registry, &map, &catalog);

    let mut without_common = observation(opening_units());
    without_common.player_common = None;
    assert!(matches!(
        decoder.decode(&without_common),
        Err(DecodeError::MissingField("player_common"))
    ));

    let mut without_raw = observation(opening_units());
    without_raw.raw_data = None;
    assert!(matches!(
        decoder.decode(&without_raw),
        Err(DecodeError::MissingField("raw_data"))
    ));
}

#[test]
fn own_units_partition_into_roles() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut units = opening_units();
    units.push(own(30, SUPPLY_DEPOT, 20.0, 20.0));
    units.push(own(31, MARINE, 21.0, 20.0));
    units.push(own(32, MARINE, 22.0, 20.0));
    units.push(own(33, LARVA, 23.0, 20.0));

    let snapshot = decode(&observation(units), &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.structures.len(), 1);
    assert_eq!(snapshot.army.len(), 2);
    assert_eq!(snapshot.other.len(), 1);
    let mut partitioned: Vec<u64> = [
        &snapshot.townhalls,
        &snapshot.workers,
        &snapshot.army,
        &snapshot.structures,
        &snapshot.other,
    ]
    .into_iter()
    .flat_map(|group| group.iter().map(|unit| unit.tag))
    .collect();
    partitioned.sort_unstable();
    let mut all: Vec<u64> = snapshot.units.iter().map(|unit| unit.tag).collect();
    all.sort_unstable();
    assert_eq!(partitioned, all);
    assert!(snapshot.townhalls.iter().all(|unit| unit.is_structure));
}

#[test]
fn unknown_types_are_kept_and_counted() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut units = opening_units();
    units.push(own(40, UNREGISTERED, 30.0, 30.0));

    let snapshot = decode(&observation(units), &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.unresolved_ids(), 1);
    let stranger = snapshot.units.find_by_tag(40).expect("kept");
    assert!(!stranger.type_known);
    assert_eq!(stranger.type_id, UnitTypeId::new(UNREGISTERED));
    assert_eq!(snapshot.army.len(), 1);
}

#[test]
fn visible_data_wins_over_snapshot_data() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut remembered = RawUnit::new(50, MARINE, Alliance::Enemy, Point2::new(40.0, 40.0));
    remembered.display_type = DisplayType::Snapshot;
    let seen = RawUnit::new(50, MARINE, Alliance::Enemy, Point2::new(44.0, 40.0));
    let mut stale = RawUnit::new(51, SUPPLY_DEPOT, Alliance::Enemy, Point2::new(50.0, 50.0));
    stale.display_type = DisplayType::Snapshot;

    let snapshot = decode(
        &observation(vec![remembered, seen.clone(), seen, stale]),
        &registry,
        &map,
        &catalog,
    )
    .expect("decodes");

    assert_eq!(snapshot.all_units.len(), 2);
    assert_eq!(snapshot.enemy_units.len(), 1);
    let marine = snapshot.enemy_units.first().expect("marine");
    assert!(!marine.is_snapshot());
    assert_eq!(marine.position, Point2::new(44.0, 40.0));
    assert_eq!(snapshot.enemy_structures.len(), 1);
    assert!(snapshot.enemy_structures.snapshot().exists());
}

#[test]
fn neutral_units_are_sorted_into_groups() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut units = mineral_line();
    units[0].mineral_contents = 1_800;
    let mut geyser = RawUnit::new(2_000, VESPENE_GEYSER, Alliance::Neutral, Point2::new(9.5, 38.5));
    geyser.vespene_contents = 2_250;
    units.push(geyser);
    units.push(RawUnit::new(2_001, XELNAGA_TOWER, Alliance::Neutral, Point2::new(32.0, 32.0)));
    units.push(RawUnit::new(2_002, DESTRUCTIBLE_ROCK, Alliance::Neutral, Point2::new(40.0, 20.0)));

    let snapshot = decode(&observation(units), &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.mineral_field.len(), 8);
    assert_eq!(snapshot.vespene_geyser.len(), 1);
    assert_eq!(snapshot.resources.len(), 9);
    assert_eq!(snapshot.watchtowers.len(), 1);
    assert_eq!(snapshot.destructables.len(), 1);
    assert!(snapshot.units.is_empty());
    let contents = snapshot
        .mineral_field
        .find_by_tag(1_000)
        .and_then(|unit| unit.contents)
        .expect("mineral contents");
    assert_eq!(contents.amount, 1_800);
    assert_eq!(
        snapshot.vespene_geyser.first().and_then(|unit| unit.contents).map(|c| c.amount),
        Some(2_250)
    );
}

#[test]
fn step_events_are_carried_over() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut observation = observation(opening_units());
    observation.game_loop = 1_680;
    observation.alerts = vec![19, 77];
    observation.chat = vec![RawChat {
        player_id: 2,
        message: "gl hf".to_owned(),
    }];
    if let Some(raw) = observation.raw_data.as_mut() {
        raw.dead_units = vec![7, 8];
        raw.player.upgrade_ids = vec![7];
        raw.effects = vec![RawEffect {
            effect_id: 5,
            pos: vec![Point2::new(3.0, 3.0)],
            alliance: Some(Alliance::Enemy),
            owner: 2,
            radius: 1.5,
        }];
    }

    let snapshot = decode(&observation, &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.alerts, vec![Alert::UnitUnderAttack, Alert::Unknown(77)]);
    assert_eq!(snapshot.chat[0].message, "gl hf");
    assert!(snapshot.dead_units.contains(&7) && snapshot.dead_units.contains(&8));
    assert!(snapshot.upgrades.contains(&UpgradeId::new(7)));
    assert!(snapshot.effects[0].is_enemy());
    assert_eq!(snapshot.time_formatted(), "01:15");
    assert!((snapshot.time_seconds() - 75.0).abs() < 1e-9);
}

#[test]
fn visibility_and_creep_grids_answer_point_queries() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut visibility = image(0);
    visibility.data[(10 * MAP_SIZE + 20) as usize] = 2;
    visibility.data[(10 * MAP_SIZE + 21) as usize] = 1;
    let mut creep = image(0);
    creep.data[(5 * MAP_SIZE + 5) as usize] = 1;
    let mut observation = observation(opening_units());
    if let Some(raw) = observation.raw_data.as_mut() {
        raw.map_state = Some(RawMapState { visibility, creep });
    }

    let snapshot = decode(&observation, &registry, &map, &catalog).expect("decodes");

    assert!(snapshot.is_visible(Point2::new(20.5, 10.5)));
    assert!(!snapshot.is_visible(Point2::new(21.5, 10.5)));
    assert!(!snapshot.is_visible(Point2::new(-3.0, 10.5)));
    assert!(snapshot.has_creep(Point2::new(5.2, 5.9)));
    assert!(!snapshot.has_creep(Point2::new(6.2, 5.9)));
}

#[test]
fn grids_with_the_wrong_size_fail_the_decode() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let small = RawImage {
        width: 8,
        height: 8,
        bits_per_pixel: 8,
        data: vec![0; 64],
    };
    let mut observation = observation(opening_units());
    if let Some(raw) = observation.raw_data.as_mut() {
        raw.map_state = Some(RawMapState {
            visibility: small,
            creep: image(0),
        });
    }

    assert!(matches!(
        decode(&observation, &registry, &map, &catalog),
        Err(DecodeError::DimensionMismatch {
            name: "visibility",
            ..
        })
    ));
}

#[test]
fn townhall_claims_its_expansion() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());

    let snapshot =
        decode(&observation(opening_units()), &registry, &map, &catalog).expect("decodes");
    let owned = snapshot.owned_expansions(&map);

    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].0.townhall, START);
    assert_eq!(owned[0].1.tag, 1);
}

#[test]
fn closest_townhall_claims_a_contested_expansion() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut units = vec![
        own(2, COMMAND_CENTER, START.x + 4.0, START.y),
        own(3, COMMAND_CENTER, START.x + 40.0, START.y),
    ];
    units.extend(opening_units());

    let snapshot = decode(&observation(units), &registry, &map, &catalog).expect("decodes");
    let owned = snapshot.owned_expansions(&map);

    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].1.tag, 1);
}

#[test]
fn affordability_follows_bank_and_supply() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());

    let snapshot =
        decode(&observation(opening_units()), &registry, &map, &catalog).expect("decodes");

    assert!(snapshot.can_afford(UnitTypeId::new(SCV), &catalog));
    assert!(!snapshot.can_afford(UnitTypeId::new(SUPPLY_DEPOT), &catalog));
    assert!(!snapshot.can_afford(UnitTypeId::new(UNREGISTERED), &catalog));
    assert!(snapshot.can_feed(UnitTypeId::new(MARINE), &catalog));
}

#[test]
fn own_units_by_type_are_indexed() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());

    let snapshot =
        decode(&observation(opening_units()), &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.own_units_of_type(UnitTypeId::new(SCV)).len(), 12);
    assert_eq!(snapshot.own_units_of_type(UnitTypeId::new(COMMAND_CENTER)).len(), 1);
    assert!(snapshot.own_units_of_type(UnitTypeId::new(MARINE)).is_empty());
}

fn order(ability_id: u32) -> RawOrder {
    RawOrder {
        ability_id,
        target: None,
        progress: 0.0,
    }
}

#[test]
fn json_observation_decodes_with_defaults() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let json = r#"{
        "game_loop": 22,
        "player_common": {
            "player_id": 1, "minerals": 50, "vespene": 0, "food_cap": 15,
            "food_used": 12, "food_army": 0, "food_workers": 12
        },
        "raw_data": {
            "units": [
                {"tag": 1, "unit_type": 18, "alliance": "Self", "pos": {"x": 12.5, "y": 30.5}},
                {"tag": 2, "unit_type": 48, "alliance": "Enemy", "pos": {"x": 40.0, "y": 40.0, "z": 11.0}}
            ]
        }
    }"#;
    let observation: Observation = serde_json::from_str(json).expect("observation parses");

    let snapshot = decode(&observation, &registry, &map, &catalog).expect("decodes");

    let townhall = snapshot.townhalls.find_by_tag(1).expect("own townhall");
    assert_eq!(townhall.build_progress, 1.0);
    assert!(townhall.is_ready() && townhall.is_visible());
    assert_eq!(snapshot.units.len(), 1);
    let marine = snapshot.enemy_units.first().expect("enemy marine");
    assert_eq!(marine.position3d.z, 11.0);
    assert_eq!(snapshot.common.food_workers, 12);
}

#[test]
fn hidden_units_are_not_visible() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut lurking = RawUnit::new(70, MARINE, Alliance::Enemy, Point2::new(40.0, 40.0));
    lurking.display_type = DisplayType::Hidden;
    let seen = RawUnit::new(71, MARINE, Alliance::Enemy, Point2::new(41.0, 40.0));

    let snapshot = decode(&observation(vec![lurking, seen]), &registry, &map, &catalog)
        .expect("decodes");

    let hidden = snapshot.enemy_units.find_by_tag(70).expect("kept");
    assert!(hidden.is_hidden() && !hidden.is_visible() && !hidden.is_snapshot());
    let visible: Vec<u64> = snapshot.enemy_units.visible().iter().map(|unit| unit.tag).collect();
    assert_eq!(visible, vec![71]);
    assert!(snapshot.enemy_units.snapshot().is_empty());
}

#[test]
fn unregistered_ids_of_every_category_are_counted() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut units = opening_units();
    units[1].orders = vec![order(295), order(7_777)];
    units[1].buff_ids = vec![271, 9_000];
    let mut observation = observation(units);
    if let Some(raw) = observation.raw_data.as_mut() {
        raw.player.upgrade_ids = vec![8_888];
        raw.effects = vec![RawEffect {
            effect_id: 5,
            pos: vec![Point2::new(3.0, 3.0)],
            alliance: None,
            owner: 0,
            radius: 1.0,
        }];
    }

    let snapshot = decode(&observation, &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.unresolved_ids(), 4);
    assert!(snapshot.upgrades.contains(&UpgradeId::new(8_888)));
    assert_eq!(snapshot.effects.len(), 1);
}

#[test]
fn worker_activity_is_derived_from_orders_and_buffs() {
    let (registry, map, catalog) = (registry(), static_map(), catalog());
    let mut units = opening_units();
    units[1].orders = vec![order(295)];
    units[2].buff_ids = vec![271];

    let snapshot = decode(&observation(units), &registry, &map, &catalog).expect("decodes");

    let gathering: Vec<u64> = snapshot.workers.gathering().iter().map(|unit| unit.tag).collect();
    assert_eq!(gathering, vec![10]);
    assert_eq!(snapshot.workers.collecting().len(), 1);
    assert!(snapshot.workers.returning().is_empty());
    let carrier = snapshot.workers.find_by_tag(11).expect("worker");
    assert!(carrier.is_carrying_minerals() && !carrier.is_collecting());
    assert!(!snapshot.townhalls.first().expect("townhall").is_gathering());
}

#[test]
fn pending_counts_orders_and_unfinished_units() {
    let (registry, map) = (registry(), static_map());
    let mut depot = type_data(SUPPLY_DEPOT, true, 100, 0.0);
    depot.ability_id = Some(319);
    let mut marine = type_data(MARINE, false, 50, 1.0);
    marine.ability_id = Some(560);
    let catalog = UnitCatalog::from_raw(&RawGameData {
        units: vec![
            type_data(COMMAND_CENTER, true, 400, 0.0),
            type_data(SCV, false, 50, 1.0),
            depot,
            marine,
        ],
    });
    let mut units = opening_units();
    units[0].orders = vec![order(560), order(560)];
    units[1].orders = vec![order(319)];
    let mut foundation = own(60, SUPPLY_DEPOT, 20.0, 20.0);
    foundation.build_progress = 0.4;
    let mut recruit = own(61, MARINE, 21.0, 20.0);
    recruit.build_progress = 0.3;
    units.extend([foundation, recruit]);

    let snapshot = decode(&observation(units), &registry, &map, &catalog).expect("decodes");

    assert_eq!(snapshot.already_pending(UnitTypeId::new(SUPPLY_DEPOT), &catalog), 1);
    assert_eq!(snapshot.already_pending(UnitTypeId::new(MARINE), &catalog), 3);
    assert_eq!(snapshot.already_pending(UnitTypeId::new(SCV), &catalog), 0);
    assert_eq!(snapshot.already_pending(UnitTypeId::new(UNREGISTERED), &catalog), 0);
}
