//! The `inspect` command: build the static map, decode one step, summarise both.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use sc2_state_core::{Alliance, Observation, RawGameData, RawUnit, StaticMapInfo, UnitCatalog};
use sc2_state_map::{MapTuning, StaticMap};
use sc2_state_registry::IdRegistry;
use sc2_state_system_snapshot::{Decoder, StateSnapshot};

/// Files consumed by the `inspect` command.
#[derive(Debug)]
pub(crate) struct Inputs {
    pub(crate) table: PathBuf,
    pub(crate) game_data: PathBuf,
    pub(crate) map: PathBuf,
    pub(crate) observation: PathBuf,
    pub(crate) tuning: Option<PathBuf>,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = read(path)?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

pub(crate) fn load_registry(path: &Path) -> Result<IdRegistry> {
    IdRegistry::from_json(&read(path)?)
        .with_context(|| format!("failed to build registry from {}", path.display()))
}

fn load_tuning(path: Option<&Path>) -> Result<MapTuning> {
    match path {
        Some(path) => toml::from_str(&read(path)?)
            .with_context(|| format!("failed to parse tuning file {}", path.display())),
        None => Ok(MapTuning::default()),
    }
}

/// Builds the static map from the first observation's neutral units and
/// decodes that observation.
pub(crate) fn run(inputs: &Inputs) -> Result<String> {
    let registry = load_registry(&inputs.table)?;
    let game_data: RawGameData = read_json(&inputs.game_data)?;
    let info: StaticMapInfo = read_json(&inputs.map)?;
    let observation: Observation = read_json(&inputs.observation)?;
    let tuning = load_tuning(inputs.tuning.as_deref())?;

    let catalog = UnitCatalog::from_raw(&game_data);
    let neutral: Vec<RawUnit> = observation
        .raw_data
        .iter()
        .flat_map(|raw| raw.units.iter())
        .filter(|unit| unit.alliance == Alliance::Neutral)
        .cloned()
        .collect();
    let map = StaticMap::build(&info, &neutral, &registry, &tuning)
        .with_context(|| format!("failed to build map {}", info.map_name))?;
    let snapshot = Decoder::new(&registry, &map, &catalog)
        .decode(&observation)
        .context("failed to decode observation")?;
    log::debug!(
        "decoded step {} with {} units",
        snapshot.game_loop,
        snapshot.all_units.len()
    );

    Ok(Summary {
        map: &map,
        snapshot: &snapshot,
    }
    .to_string())
}

struct Summary<'a> {
    map: &'a StaticMap,
    snapshot: &'a StateSnapshot,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (map, snapshot) = (self.map, self.snapshot);
        let size = map.map_size();
        writeln!(f, "map: {} ({}x{})", map.map_name(), size.width, size.height)?;
        writeln!(f, "start locations: {}", map.start_locations().len())?;
        writeln!(f, "expansions: {}", map.expansion_locations().len())?;
        for location in map.expansion_locations() {
            writeln!(
                f,
                "  ({:.1}, {:.1}) resources={}",
                location.townhall.x,
                location.townhall.y,
                location.resources.len()
            )?;
        }
        writeln!(f, "ramps: {}", map.ramps().len())?;
        writeln!(f, "vision blockers: {}", map.vision_blockers().len())?;
        for start in map.start_locations() {
            match map.main_base_ramp(*start).and_then(|ramp| ramp.wall_off()) {
                Some(wall) => writeln!(
                    f,
                    "wall-off for ({:.1}, {:.1}): depot ({:.1}, {:.1}) barracks ({:.1}, {:.1})",
                    start.x,
                    start.y,
                    wall.depot_in_middle.x,
                    wall.depot_in_middle.y,
                    wall.barracks_correct_placement.x,
                    wall.barracks_correct_placement.y
                )?,
                None => writeln!(f, "wall-off for ({:.1}, {:.1}): none", start.x, start.y)?,
            }
        }
        writeln!(f, "time: {}", snapshot.time_formatted())?;
        writeln!(
            f,
            "minerals: {} vespene: {} supply left: {}",
            snapshot.common.minerals,
            snapshot.common.vespene,
            snapshot.supply_left()
        )?;
        writeln!(
            f,
            "units: {} townhalls: {} workers: {} army: {} structures: {} other: {}",
            snapshot.units.len(),
            snapshot.townhalls.len(),
            snapshot.workers.len(),
            snapshot.army.len(),
            snapshot.structures.len(),
            snapshot.other.len()
        )?;
        writeln!(
            f,
            "enemy units: {} enemy structures: {}",
            snapshot.enemy_units.len(),
            snapshot.enemy_structures.len()
        )?;
        writeln!(
            f,
            "mineral fields: {} geysers: {} destructables: {} watchtowers: {}",
            snapshot.mineral_field.len(),
            snapshot.vespene_geyser.len(),
            snapshot.destructables.len(),
            snapshot.watchtowers.len()
        )?;
        writeln!(f, "owned expansions: {}", snapshot.owned_expansions(map).len())?;
        writeln!(f, "unresolved ids: {}", snapshot.unresolved_ids())
    }
}
