#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static map model built once per match.
//!
//! The model owns the pathing, placement and terrain height grids, the ramps
//! found in the playable area and the expansion locations derived from the
//! neutral resources. Nothing in it changes after [`StaticMap::build`].

mod expansion;
mod ramp;
mod tuning;

use sc2_state_core::{
    terrain_height_from_byte, DecodeError, Grid, GridPoint, PlayerInfo, Point2, RawImage,
    RawUnit, Rect, Size, StaticMapInfo,
};
use sc2_state_registry::IdRegistry;

pub use expansion::{ClusteredResource, ExpansionLocation};
pub use ramp::{Ramp, WallOff};
pub use tuning::MapTuning;

/// Immutable terrain model of the current map.
#[derive(Clone, Debug)]
pub struct StaticMap {
    name: String,
    size: Size,
    pathing: Grid<u8>,
    placement: Grid<u8>,
    heights: Grid<u8>,
    playable_area: Rect,
    start_locations: Vec<Point2>,
    players: Vec<PlayerInfo>,
    expansions: Vec<ExpansionLocation>,
    ramps: Vec<Ramp>,
    vision_blockers: Vec<GridPoint>,
}

fn decode_grid(
    image: Option<&RawImage>,
    name: &'static str,
    info: &StaticMapInfo,
) -> Result<Grid<u8>, DecodeError> {
    let image = image.ok_or(DecodeError::MissingField(name))?;
    let grid = Grid::from_raw(image).map_err(|source| DecodeError::grid(name, source))?;
    if grid.width() != info.map_width || grid.height() != info.map_height {
        return Err(DecodeError::DimensionMismatch {
            name,
            width: info.map_width,
            height: info.map_height,
            actual_width: grid.width(),
            actual_height: grid.height(),
        });
    }
    Ok(grid)
}

impl StaticMap {
    /// Builds the map model from the map info and the neutral units seen on
    /// the first step.
    ///
    /// `resources` may contain any neutral units; only those whose registry
    /// name marks them as mineral fields or geysers take part in clustering.
    pub fn build(
        info: &StaticMapInfo,
        resources: &[RawUnit],
        registry: &IdRegistry,
        tuning: &MapTuning,
    ) -> Result<Self, DecodeError> {
        let pathing = decode_grid(info.pathing_grid.as_ref(), "pathing_grid", info)?;
        let placement = decode_grid(info.placement_grid.as_ref(), "placement_grid", info)?;
        let heights = decode_grid(info.terrain_height.as_ref(), "terrain_height", info)?;
        let playable_area = Rect::from_corners(info.playable_area.p0, info.playable_area.p1);

        let scan = ramp::detect_ramps(
            playable_cells(playable_area, info),
            &pathing,
            &placement,
            &heights,
            tuning.min_ramp_size,
        );
        log::debug!(
            "{}: {} ramps, {} vision blockers",
            info.map_name,
            scan.ramps.len(),
            scan.vision_blockers.len()
        );

        let sites = expansion::classify_resources(resources, registry);
        let expansions = expansion::expansion_locations(
            sites,
            &info.start_locations,
            |point| placement.at(point).is_some_and(|value| value != 0),
            tuning,
        );
        log::debug!(
            "{}: {} expansion locations for {} start locations",
            info.map_name,
            expansions.len(),
            info.start_locations.len()
        );

        Ok(Self {
            name: info.map_name.clone(),
            size: Size::new(f64::from(info.map_width), f64::from(info.map_height)),
            pathing,
            placement,
            heights,
            playable_area,
            start_locations: info.start_locations.clone(),
            players: info.players.clone(),
            expansions,
            ramps: scan.ramps,
            vision_blockers: scan.vision_blockers,
        })
    }

    /// Name of the map.
    #[must_use]
    pub fn map_name(&self) -> &str {
        &self.name
    }

    /// Full map dimensions.
    #[must_use]
    pub fn map_size(&self) -> Size {
        self.size
    }

    /// Playable part of the map.
    #[must_use]
    pub fn playable_area(&self) -> Rect {
        self.playable_area
    }

    /// Center of the playable area.
    #[must_use]
    pub fn map_center(&self) -> Point2 {
        self.playable_area.center()
    }

    /// Whether ground units can walk through the cell containing `point`.
    #[must_use]
    pub fn pathable(&self, point: Point2) -> bool {
        self.pathing.at(point).is_some_and(|value| value != 0)
    }

    /// Whether structures can be placed on the cell containing `point`.
    #[must_use]
    pub fn placeable(&self, point: Point2) -> bool {
        self.placement.at(point).is_some_and(|value| value != 0)
    }

    /// Elevation of the cell containing `point`, or `None` off the map.
    #[must_use]
    pub fn terrain_height(&self, point: Point2) -> Option<f64> {
        self.heights.at(point).map(terrain_height_from_byte)
    }

    /// Raw height byte of a cell.
    #[must_use]
    pub fn height_at(&self, cell: GridPoint) -> Option<u8> {
        self.heights.get(cell)
    }

    /// Possible start locations of the opponents.
    #[must_use]
    pub fn start_locations(&self) -> &[Point2] {
        &self.start_locations
    }

    /// Players taking part in the match.
    #[must_use]
    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    /// Expansion locations sorted by townhall position.
    #[must_use]
    pub fn expansion_locations(&self) -> &[ExpansionLocation] {
        &self.expansions
    }

    /// Expansion whose townhall point is `point`.
    #[must_use]
    pub fn expansion_at(&self, point: Point2) -> Option<&ExpansionLocation> {
        self.expansions
            .iter()
            .find(|location| location.townhall.is_same_as(point, 1e-6))
    }

    /// Ramps found in the playable area.
    #[must_use]
    pub fn ramps(&self) -> &[Ramp] {
        &self.ramps
    }

    /// Pathable, unplaceable cells surrounded by level ground.
    #[must_use]
    pub fn vision_blockers(&self) -> &[GridPoint] {
        &self.vision_blockers
    }

    /// Ramp leading out of the base at `start`.
    ///
    /// Prefers the closest ramp with a recognised wall-off shape and falls
    /// back to the closest ramp of the larger main-ramp shapes.
    #[must_use]
    pub fn main_base_ramp(&self, start: Point2) -> Option<&Ramp> {
        closest_ramp(start, self.ramps.iter().filter(|ramp| ramp.is_wallable())).or_else(|| {
            closest_ramp(start, self.ramps.iter().filter(|ramp| ramp.is_fallback_main()))
        })
    }
}

fn closest_ramp<'a>(start: Point2, ramps: impl Iterator<Item = &'a Ramp>) -> Option<&'a Ramp> {
    ramps.min_by(|a, b| {
        start
            .distance_squared(a.top_center())
            .total_cmp(&start.distance_squared(b.top_center()))
    })
}

fn playable_cells(area: Rect, info: &StaticMapInfo) -> impl Iterator<Item = GridPoint> {
    let clamp = |value: f64, limit: u32| (value.max(0.0) as u32).min(limit);
    let x0 = clamp(area.x, info.map_width);
    let y0 = clamp(area.y, info.map_height);
    let x1 = clamp(area.x + area.width, info.map_width);
    let y1 = clamp(area.y + area.height, info.map_height);
    (y0..y1).flat_map(move |y| (x0..x1).map(move |x| GridPoint::new(x, y)))
}
