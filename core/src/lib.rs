#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the game-state engine.
//!
//! This crate defines the vocabulary that connects the transport, the id
//! registry, the static map model, the per-step decoder and the unit query
//! container. Transport payloads arrive as the raw types in this crate, are
//! decoded into immutable [`Unit`] records and grids, and are then consumed
//! by read-only queries. Nothing here performs IO.

mod catalog;
mod error;
mod geometry;
mod grid;
mod ids;
mod raw;
mod unit;

pub use catalog::{UnitCatalog, UnitTypeInfo};
pub use error::DecodeError;
pub use geometry::{GeometryError, GridPoint, Point2, Point3, Rect, Size, TANGENT_EPSILON};
pub use grid::{Grid, GridError, RawImage};
pub use ids::{AbilityId, BuffId, EffectId, IdCategory, StableId, Tag, UnitTypeId, UpgradeId};
pub use raw::{
    Alliance, Attribute, CloakState, DisplayType, Observation, PlayerCommon, PlayerInfo, Race,
    RawChat, RawData, RawEffect, RawGameData, RawMapState, RawOrder, RawOrderTarget,
    RawPassenger, RawPlayer, RawRect, RawScore, RawUnit, RawUnitTypeData, StaticMapInfo,
};
pub use unit::{
    Activity, CargoInfo, HarvesterInfo, OrderTarget, ResourceContents, ResourceKind, Unit,
    UnitOrder, Vitals,
};

/// Game loops elapsed per second of game time at the "faster" speed.
pub const GAME_LOOPS_PER_SECOND: f64 = 22.4;

/// Maps a raw terrain height byte to world elevation.
#[must_use]
pub fn terrain_height_from_byte(value: u8) -> f64 {
    -16.0 + 32.0 * f64::from(value) / 255.0
}
