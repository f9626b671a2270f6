//! Ramp detection and the wall-off solver for small ramps.

use std::collections::BTreeSet;

use sc2_state_core::{Grid, GridPoint, Point2};

/// Upper-point counts of ramps the wall-off solver understands.
const WALLABLE_UPPER_SIZES: [usize; 2] = [2, 5];

/// Upper-point counts accepted as a main ramp when no wallable ramp exists.
const FALLBACK_UPPER_SIZES: [usize; 2] = [4, 9];

const DEPOT_RADIUS_SQUARED: f64 = 2.5;
const BARRACKS_RADIUS_SQUARED: f64 = 5.0;
const CORNER_RADIUS_SQUARED: f64 = 5.0;

/// Building positions that close a small ramp.
#[derive(Clone, Debug, PartialEq)]
pub struct WallOff {
    /// The two upper ramp points the wall is anchored on, as cell centers.
    pub anchors: [Point2; 2],
    /// Supply depots at both ends of the wall.
    pub corner_depots: [Point2; 2],
    /// Supply depot centred between the anchors.
    pub depot_in_middle: Point2,
    /// Barracks centred between the anchors.
    pub barracks_in_middle: Point2,
    /// Barracks position that leaves room for an add-on.
    pub barracks_correct_placement: Point2,
}

impl WallOff {
    /// Solves the wall for a pair of anchors, with `lower` as any point below
    /// the ramp. Returns `None` when the geometry has no solution.
    #[must_use]
    pub fn solve(anchors: [Point2; 2], lower: Point2) -> Option<Self> {
        let [first, second] = anchors;
        let away_from_lower = |radius_squared: f64| {
            lower.furthest(&first.circle_intersection(second, radius_squared.sqrt()))
        };

        let depot_in_middle = away_from_lower(DEPOT_RADIUS_SQUARED)?;
        let barracks_in_middle = away_from_lower(BARRACKS_RADIUS_SQUARED)?;

        let middle = first.towards(second, first.distance_to(second) / 2.0);
        let corners = middle.circle_intersection(depot_in_middle, CORNER_RADIUS_SQUARED.sqrt());
        let corner_depots: [Point2; 2] = corners.try_into().ok()?;

        let rightmost = corner_depots[0].x.max(corner_depots[1].x);
        let barracks_correct_placement = if barracks_in_middle.x + 1.0 > rightmost {
            barracks_in_middle
        } else {
            barracks_in_middle.offset(Point2::new(-2.0, 0.0))
        };

        Some(Self {
            anchors,
            corner_depots,
            depot_in_middle,
            barracks_in_middle,
            barracks_correct_placement,
        })
    }
}

/// Connected group of sloped cells joining two height levels.
#[derive(Clone, Debug, PartialEq)]
pub struct Ramp {
    points: Vec<GridPoint>,
    upper: Vec<GridPoint>,
    lower: Vec<GridPoint>,
    top_center: Point2,
    bottom_center: Point2,
    wall_off: Option<WallOff>,
}

impl Ramp {
    /// Builds a ramp from its cells, reading heights from `heights`.
    ///
    /// Returns `None` for an empty point set.
    #[must_use]
    pub fn new(mut points: Vec<GridPoint>, heights: &Grid<u8>) -> Option<Self> {
        points.sort_unstable();
        points.dedup();

        let height = |point: &GridPoint| heights.get(*point).unwrap_or(0);
        let max = points.iter().map(height).max()?;
        let min = points.iter().map(height).min()?;
        let upper: Vec<GridPoint> = points.iter().copied().filter(|p| height(p) == max).collect();
        let lower: Vec<GridPoint> = points.iter().copied().filter(|p| height(p) == min).collect();
        let top_center = centroid(&upper)?;
        let bottom_center = centroid(&lower)?;

        let wall_off = if WALLABLE_UPPER_SIZES.contains(&upper.len()) {
            let anchors = farthest_pair(&upper)?;
            WallOff::solve(anchors, lower.first()?.to_point())
        } else {
            None
        };

        Some(Self {
            points,
            upper,
            lower,
            top_center,
            bottom_center,
            wall_off,
        })
    }

    /// Every cell of the ramp, sorted.
    #[must_use]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Cells at the ramp's greatest height.
    #[must_use]
    pub fn upper(&self) -> &[GridPoint] {
        &self.upper
    }

    /// Cells at the ramp's lowest height.
    #[must_use]
    pub fn lower(&self) -> &[GridPoint] {
        &self.lower
    }

    /// Centroid of the upper cells.
    #[must_use]
    pub fn top_center(&self) -> Point2 {
        self.top_center
    }

    /// Centroid of the lower cells.
    #[must_use]
    pub fn bottom_center(&self) -> Point2 {
        self.bottom_center
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Wall-off positions, present only for recognised small ramps.
    #[must_use]
    pub fn wall_off(&self) -> Option<&WallOff> {
        self.wall_off.as_ref()
    }

    pub(crate) fn is_wallable(&self) -> bool {
        WALLABLE_UPPER_SIZES.contains(&self.upper.len())
    }

    pub(crate) fn is_fallback_main(&self) -> bool {
        FALLBACK_UPPER_SIZES.contains(&self.upper.len())
    }
}

fn centroid(points: &[GridPoint]) -> Option<Point2> {
    let points: Vec<Point2> = points.iter().map(|p| p.to_point()).collect();
    Point2::center(&points)
}

/// Two points with the greatest mutual distance that still leaves room for a
/// depot between them, offset to cell centers. The first pair in sorted order
/// wins ties.
fn farthest_pair(points: &[GridPoint]) -> Option<[Point2; 2]> {
    let mut best: Option<([GridPoint; 2], u64)> = None;
    for (index, first) in points.iter().enumerate() {
        for second in &points[index + 1..] {
            let dx = u64::from(first.x.abs_diff(second.x));
            let dy = u64::from(first.y.abs_diff(second.y));
            let distance = dx * dx + dy * dy;
            if distance as f64 >= 4.0 * DEPOT_RADIUS_SQUARED {
                continue;
            }
            if best.map_or(true, |(_, longest)| distance > longest) {
                best = Some(([*first, *second], distance));
            }
        }
    }
    best.map(|([first, second], _)| [first.center(), second.center()])
}

/// Output of the ramp scan over the playable area.
#[derive(Debug, Default)]
pub(crate) struct RampScan {
    pub(crate) ramps: Vec<Ramp>,
    pub(crate) vision_blockers: Vec<GridPoint>,
}

/// Scans `cells` for pathable but unplaceable terrain and groups it into ramps.
pub(crate) fn detect_ramps<I>(
    cells: I,
    pathing: &Grid<u8>,
    placement: &Grid<u8>,
    heights: &Grid<u8>,
    min_ramp_size: usize,
) -> RampScan
where
    I: IntoIterator<Item = GridPoint>,
{
    let mut scan = RampScan::default();
    let mut ramp_cells = BTreeSet::new();

    for cell in cells {
        if !pathing.is_set(cell) || placement.is_set(cell) {
            continue;
        }
        let Some(height) = heights.get(cell) else {
            continue;
        };
        let level = cell
            .neighbors8()
            .all(|neighbor| heights.get(neighbor) == Some(height));
        if level {
            scan.vision_blockers.push(cell);
        } else {
            let _inserted = ramp_cells.insert(cell);
        }
    }

    while let Some(seed) = ramp_cells.pop_first() {
        let mut group = vec![seed];
        let mut frontier = vec![seed];
        while let Some(current) = frontier.pop() {
            for neighbor in current.neighbors8() {
                if ramp_cells.remove(&neighbor) {
                    group.push(neighbor);
                    frontier.push(neighbor);
                }
            }
        }
        if group.len() < min_ramp_size {
            continue;
        }
        if let Some(ramp) = Ramp::new(group, heights) {
            scan.ramps.push(ramp);
        }
    }

    scan.vision_blockers.sort_unstable();
    scan
}
