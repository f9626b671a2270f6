//! Resource clustering and townhall placement for expansion locations.

use std::cmp::Ordering;

use sc2_state_core::{Point2, RawUnit, ResourceKind, Tag, UnitTypeId};
use sc2_state_registry::IdRegistry;

use crate::MapTuning;

/// Resource entity that belongs to an expansion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusteredResource {
    /// Tag of the resource entity.
    pub tag: Tag,
    /// Position of the resource.
    pub position: Point2,
    /// Mineral or vespene.
    pub kind: ResourceKind,
}

/// Base location where a townhall can be built next to a resource cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpansionLocation {
    /// Townhall center.
    pub townhall: Point2,
    /// Resources served by the townhall, sorted by position.
    pub resources: Vec<ClusteredResource>,
    /// Centroid of the resources, or the townhall point when there are none.
    pub resource_center: Point2,
}

impl ExpansionLocation {
    fn new(townhall: Point2, resources: Vec<ClusteredResource>) -> Self {
        let mut location = Self {
            townhall,
            resources,
            resource_center: townhall,
        };
        location.refresh_center();
        location
    }

    fn refresh_center(&mut self) {
        self.resources
            .sort_by(|a, b| position_order(a.position, b.position));
        let positions: Vec<Point2> = self.resources.iter().map(|r| r.position).collect();
        self.resource_center = Point2::center(&positions).unwrap_or(self.townhall);
    }

    /// Mineral fields of the expansion.
    pub fn minerals(&self) -> impl Iterator<Item = &ClusteredResource> + '_ {
        self.resources
            .iter()
            .filter(|resource| resource.kind == ResourceKind::Mineral)
    }

    /// Geysers of the expansion.
    pub fn geysers(&self) -> impl Iterator<Item = &ClusteredResource> + '_ {
        self.resources
            .iter()
            .filter(|resource| resource.kind == ResourceKind::Vespene)
    }
}

pub(crate) fn position_order(a: Point2, b: Point2) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Keeps the units whose registry name marks them as a resource.
pub(crate) fn classify_resources(units: &[RawUnit], registry: &IdRegistry) -> Vec<ClusteredResource> {
    units
        .iter()
        .filter_map(|unit| {
            let name = registry.unit_type_name(UnitTypeId::new(unit.unit_type))?;
            let kind = ResourceKind::from_type_name(name)?;
            Some(ClusteredResource {
                tag: unit.tag,
                position: unit.pos.to2(),
                kind,
            })
        })
        .collect()
}

/// Groups resources by single linkage; clusters and their members come out
/// in position order.
pub(crate) fn cluster_resources(
    mut resources: Vec<ClusteredResource>,
    spread: f64,
) -> Vec<Vec<ClusteredResource>> {
    resources.sort_by(|a, b| position_order(a.position, b.position));

    let mut assigned = vec![false; resources.len()];
    let mut clusters = Vec::new();
    for seed in 0..resources.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut frontier = vec![seed];
        let mut members = Vec::new();
        while let Some(current) = frontier.pop() {
            members.push(current);
            for (candidate, taken) in assigned.iter_mut().enumerate() {
                if !*taken
                    && resources[current]
                        .position
                        .is_closer_than(spread, resources[candidate].position)
                {
                    *taken = true;
                    frontier.push(candidate);
                }
            }
        }
        members.sort_unstable();
        clusters.push(members.into_iter().map(|index| resources[index]).collect());
    }
    clusters
}

/// Finds the townhall point of a cluster away from any start location.
///
/// Offsets are visited row by row inside the search radius; the first offset
/// with the smallest summed distance to the cluster's resources wins.
fn search_townhall<F>(cluster: &[ClusteredResource], placeable: &F, tuning: &MapTuning) -> Option<Point2>
where
    F: Fn(Point2) -> bool,
{
    let positions: Vec<Point2> = cluster.iter().map(|r| r.position).collect();
    let origin = Point2::center(&positions)?.floor() + Point2::new(0.5, 0.5);
    let reach = tuning.townhall_search_radius.floor() as i32;
    let radius_squared = tuning.townhall_search_radius * tuning.townhall_search_radius;
    let mineral_limit = tuning.mineral_clearance * tuning.mineral_clearance;
    let geyser_limit = tuning.geyser_clearance * tuning.geyser_clearance;

    let mut best: Option<(Point2, f64)> = None;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let offset = Point2::new(f64::from(dx), f64::from(dy));
            if offset.x * offset.x + offset.y * offset.y > radius_squared {
                continue;
            }
            let candidate = origin + offset;
            if !placeable(candidate) {
                continue;
            }

            let mut total = 0.0;
            let mut clear = true;
            for resource in cluster {
                let distance = candidate.distance_squared(resource.position);
                let limit = match resource.kind {
                    ResourceKind::Mineral => mineral_limit,
                    ResourceKind::Vespene => geyser_limit,
                };
                if distance <= limit {
                    clear = false;
                    break;
                }
                total += distance.sqrt();
            }
            if !clear {
                continue;
            }
            if best.map_or(true, |(_, best_total)| total < best_total) {
                best = Some((candidate, total));
            }
        }
    }
    best.map(|(point, _)| point)
}

/// Computes the sorted expansion locations for a set of resources.
pub(crate) fn expansion_locations<F>(
    resources: Vec<ClusteredResource>,
    start_locations: &[Point2],
    placeable: F,
    tuning: &MapTuning,
) -> Vec<ExpansionLocation>
where
    F: Fn(Point2) -> bool,
{
    let mut locations: Vec<ExpansionLocation> = Vec::new();
    for cluster in cluster_resources(resources, tuning.resource_spread) {
        let positions: Vec<Point2> = cluster.iter().map(|r| r.position).collect();
        let Some(centroid) = Point2::center(&positions) else {
            continue;
        };

        let near_start = centroid
            .closest(start_locations)
            .filter(|start| start.is_closer_than(tuning.start_location_radius, centroid));
        let townhall = match near_start {
            Some(start) => start,
            None => match search_townhall(&cluster, &placeable, tuning) {
                Some(point) => point,
                None => {
                    log::warn!(
                        "no townhall position for the {} resources around ({:.1}, {:.1})",
                        cluster.len(),
                        centroid.x,
                        centroid.y
                    );
                    continue;
                }
            },
        };

        match locations.iter_mut().find(|location| location.townhall == townhall) {
            Some(existing) => {
                existing.resources.extend(cluster);
                existing.refresh_center();
            }
            None => locations.push(ExpansionLocation::new(townhall, cluster)),
        }
    }

    for start in start_locations {
        if !locations.iter().any(|location| location.townhall == *start) {
            locations.push(ExpansionLocation::new(*start, Vec::new()));
        }
    }

    locations.sort_by(|a, b| position_order(a.townhall, b.townhall));
    locations
}
