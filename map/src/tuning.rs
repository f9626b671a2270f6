use serde::{Deserialize, Serialize};

/// Thresholds used by expansion clustering and ramp detection.
///
/// Every field has a default, so a tuning file only needs the values it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapTuning {
    /// Resources closer than this share a cluster.
    pub resource_spread: f64,
    /// Clusters whose centroid lies within this radius of a start location
    /// use the start location as their townhall point.
    pub start_location_radius: f64,
    /// Radius of the offset search around a cluster's centroid.
    pub townhall_search_radius: f64,
    /// Minimum distance between a townhall point and any mineral field.
    pub mineral_clearance: f64,
    /// Minimum distance between a townhall point and any geyser.
    pub geyser_clearance: f64,
    /// Ramp regions with fewer cells are discarded.
    pub min_ramp_size: usize,
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            resource_spread: 8.5,
            start_location_radius: 10.0,
            townhall_search_radius: 8.0,
            mineral_clearance: 6.0,
            geyser_clearance: 7.0,
            min_ramp_size: 8,
        }
    }
}
