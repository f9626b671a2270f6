//! Value-typed geometry used by every other crate in the workspace.
//!
//! All coordinates are `f64` map units. Equality compares components exactly
//! and hashing uses the normalised bit pattern of each component, so two
//! points that compare equal always hash equally.

use std::{
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative tolerance used to decide whether two circles touch in a single point.
pub const TANGENT_EPSILON: f64 = 1e-9;

/// Errors raised by fallible geometric operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A division was attempted with a zero divisor component.
    #[error("division by a zero component")]
    DivisionByZero,
}

fn hash_component<H: Hasher>(value: f64, state: &mut H) {
    // -0.0 == 0.0, so both must hash identically.
    let normalised = if value == 0.0 { 0.0 } else { value };
    normalised.to_bits().hash(state);
}

/// Two-dimensional point or vector expressed in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Eq for Point2 {}

impl Hash for Point2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_component(self.x, state);
        hash_component(self.y, state);
    }
}

impl Point2 {
    /// Creates a point from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Lifts the point into three dimensions with `z = 0`.
    #[must_use]
    pub const fn to3(self) -> Point3 {
        Point3::new(self.x, self.y, 0.0)
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point2) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Reports whether `other` lies strictly closer than `distance`.
    #[must_use]
    pub fn is_closer_than(self, distance: f64, other: Point2) -> bool {
        self.distance_squared(other) < distance * distance
    }

    /// Reports whether `other` lies strictly further than `distance`.
    #[must_use]
    pub fn is_further_than(self, distance: f64, other: Point2) -> bool {
        self.distance_squared(other) > distance * distance
    }

    /// Reports whether both points lie within `tolerance` of each other.
    #[must_use]
    pub fn is_same_as(self, other: Point2, tolerance: f64) -> bool {
        self.distance_squared(other) <= tolerance * tolerance
    }

    /// Point reached by walking `distance` from `self` along the line to `target`.
    ///
    /// Distances longer than the separation overshoot the target and negative
    /// distances walk away from it. A zero-length direction returns `self`.
    #[must_use]
    pub fn towards(self, target: Point2, distance: f64) -> Point2 {
        let separation = self.distance_to(target);
        if separation == 0.0 {
            return self;
        }
        let factor = distance / separation;
        Point2::new(
            self.x + (target.x - self.x) * factor,
            self.y + (target.y - self.y) * factor,
        )
    }

    /// Translates the point by the provided vector.
    #[must_use]
    pub fn offset(self, delta: Point2) -> Point2 {
        self + delta
    }

    /// Per-axis sign of the vector from `self` to `target`.
    #[must_use]
    pub fn direction_vector(self, target: Point2) -> Point2 {
        Point2::new(axis_sign(target.x - self.x), axis_sign(target.y - self.y))
    }

    /// The four orthogonal neighbours one unit away.
    #[must_use]
    pub fn neighbors4(self) -> [Point2; 4] {
        [
            Point2::new(self.x, self.y - 1.0),
            Point2::new(self.x + 1.0, self.y),
            Point2::new(self.x, self.y + 1.0),
            Point2::new(self.x - 1.0, self.y),
        ]
    }

    /// The eight surrounding neighbours one unit away, orthogonals first.
    #[must_use]
    pub fn neighbors8(self) -> [Point2; 8] {
        let [north, east, south, west] = self.neighbors4();
        [
            north,
            east,
            south,
            west,
            Point2::new(self.x + 1.0, self.y - 1.0),
            Point2::new(self.x + 1.0, self.y + 1.0),
            Point2::new(self.x - 1.0, self.y + 1.0),
            Point2::new(self.x - 1.0, self.y - 1.0),
        ]
    }

    /// Intersections of two circles of equal `radius` centred on `self` and `other`.
    ///
    /// Returns a single point when the circles are tangent, two points when
    /// they overlap and none when they are disjoint or coincide.
    #[must_use]
    pub fn circle_intersection(self, other: Point2, radius: f64) -> Vec<Point2> {
        let distance = self.distance_to(other);
        if distance == 0.0 || radius <= 0.0 {
            return Vec::new();
        }

        let diameter = radius * 2.0;
        let tolerance = TANGENT_EPSILON * distance.max(1.0);
        let middle = Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0);

        if (distance - diameter).abs() <= tolerance {
            return vec![middle];
        }
        if distance > diameter {
            return Vec::new();
        }

        let half = distance / 2.0;
        let height = (radius * radius - half * half).sqrt();
        let offset_x = height * (other.y - self.y) / distance;
        let offset_y = height * (self.x - other.x) / distance;
        vec![
            Point2::new(middle.x + offset_x, middle.y + offset_y),
            Point2::new(middle.x - offset_x, middle.y - offset_y),
        ]
    }

    /// Componentwise division that rejects zero divisor components.
    pub fn checked_div(self, divisor: Point2) -> Result<Point2, GeometryError> {
        if divisor.x == 0.0 || divisor.y == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Ok(Point2::new(self.x / divisor.x, self.y / divisor.y))
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Point2 {
        Point2::new(self.x * factor, self.y * factor)
    }

    /// Rounds both components down to whole map units.
    #[must_use]
    pub fn floor(self) -> Point2 {
        Point2::new(self.x.floor(), self.y.floor())
    }

    /// Grid cell containing the point, if both components are non-negative.
    #[must_use]
    pub fn to_grid(self) -> Option<GridPoint> {
        if self.x < 0.0 || self.y < 0.0 || !self.x.is_finite() || !self.y.is_finite() {
            return None;
        }
        Some(GridPoint::new(self.x as u32, self.y as u32))
    }

    /// Closest candidate to `self`; the first of several equidistant candidates wins.
    #[must_use]
    pub fn closest(self, candidates: &[Point2]) -> Option<Point2> {
        pick_by_distance(self, candidates, |candidate, best| candidate < best)
    }

    /// Furthest candidate from `self`; the first of several equidistant candidates wins.
    #[must_use]
    pub fn furthest(self, candidates: &[Point2]) -> Option<Point2> {
        pick_by_distance(self, candidates, |candidate, best| candidate > best)
    }

    /// Distance to the closest candidate, or `None` when there are none.
    #[must_use]
    pub fn distance_to_closest(self, candidates: &[Point2]) -> Option<f64> {
        self.closest(candidates).map(|point| self.distance_to(point))
    }

    /// Distance to the furthest candidate, or `None` when there are none.
    #[must_use]
    pub fn distance_to_furthest(self, candidates: &[Point2]) -> Option<f64> {
        self.furthest(candidates).map(|point| self.distance_to(point))
    }

    /// Candidates sorted by ascending distance to `self`, preserving input order on ties.
    #[must_use]
    pub fn sort_by_distance(self, candidates: &[Point2]) -> Vec<Point2> {
        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a, b| {
            self.distance_squared(*a)
                .total_cmp(&self.distance_squared(*b))
        });
        sorted
    }

    /// Arithmetic mean of the provided points, or `None` when empty.
    #[must_use]
    pub fn center(points: &[Point2]) -> Option<Point2> {
        if points.is_empty() {
            return None;
        }
        let sum = points.iter().fold(Point2::default(), |acc, point| acc + *point);
        Some(sum.scale(1.0 / points.len() as f64))
    }
}

fn axis_sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn pick_by_distance<F>(origin: Point2, candidates: &[Point2], better: F) -> Option<Point2>
where
    F: Fn(f64, f64) -> bool,
{
    let mut best: Option<(Point2, f64)> = None;
    for candidate in candidates {
        let distance = origin.distance_squared(*candidate);
        match best {
            Some((_, best_distance)) if !better(distance, best_distance) => {}
            _ => best = Some((*candidate, distance)),
        }
    }
    best.map(|(point, _)| point)
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul for Point2 {
    type Output = Point2;

    fn mul(self, rhs: Point2) -> Point2 {
        Point2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Neg for Point2 {
    type Output = Point2;

    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2::new(x, y)
    }
}

impl From<Point3> for Point2 {
    fn from(point: Point3) -> Self {
        point.to2()
    }
}

/// Three-dimensional point; `z` is the terrain elevation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
    /// Elevation component.
    #[serde(default)]
    pub z: f64,
}

impl Eq for Point3 {}

impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_component(self.x, state);
        hash_component(self.y, state);
        hash_component(self.z, state);
    }
}

impl Point3 {
    /// Creates a point from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projects the point onto the map plane, dropping `z`.
    #[must_use]
    pub const fn to2(self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns the point unchanged.
    #[must_use]
    pub const fn to3(self) -> Point3 {
        self
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Width and height of a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Creates a size from its extents.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its lower corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Lower horizontal bound.
    pub x: f64,
    /// Lower vertical bound.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its origin and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates the rectangle spanning two opposite corners.
    #[must_use]
    pub fn from_corners(p0: Point2, p1: Point2) -> Self {
        Self::new(
            p0.x.min(p1.x),
            p0.y.min(p1.y),
            (p1.x - p0.x).abs(),
            (p1.y - p0.y).abs(),
        )
    }

    /// Extents of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rectangle translated by `delta`, keeping its extents.
    #[must_use]
    pub fn offset(&self, delta: Point2) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Reports whether `point` lies inside the half-open rectangle.
    #[must_use]
    pub fn contains(&self, point: Point2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// Integer cell coordinate inside a [`crate::Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    /// Zero-based column.
    pub x: u32,
    /// Zero-based row.
    pub y: u32,
}

impl GridPoint {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Lower corner of the cell in map units.
    #[must_use]
    pub fn to_point(self) -> Point2 {
        Point2::new(f64::from(self.x), f64::from(self.y))
    }

    /// Center of the cell in map units.
    #[must_use]
    pub fn center(self) -> Point2 {
        Point2::new(f64::from(self.x) + 0.5, f64::from(self.y) + 0.5)
    }

    /// Surrounding cells that do not underflow the coordinate space.
    pub fn neighbors8(self) -> impl Iterator<Item = GridPoint> {
        const OFFSETS: [(i64, i64); 8] = [
            (0, -1),
            (1, 0),
            (0, 1),
            (-1, 0),
            (1, -1),
            (1, 1),
            (-1, 1),
            (-1, -1),
        ];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let x = u32::try_from(i64::from(self.x) + dx).ok()?;
            let y = u32::try_from(i64::from(self.y) + dy).ok()?;
            Some(GridPoint::new(x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const EPSILON: f64 = 1e-3;

    fn coordinate() -> impl Strategy<Value = f64> {
        (-100_000i32..=100_000).prop_map(f64::from)
    }

    fn point() -> impl Strategy<Value = Point2> {
        (coordinate(), coordinate()).prop_map(|(x, y)| Point2::new(x, y))
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in point(), b in point()) {
            prop_assert_eq!(a.distance_to(b), b.distance_to(a));
            prop_assert_eq!(a.distance_to(a), 0.0);
        }

        #[test]
        fn towards_within_segment_stays_on_segment(a in point(), b in point(), t in 0.0f64..=1.0) {
            let separation = a.distance_to(b);
            prop_assume!(separation > EPSILON);
            let distance = (separation * t).max(EPSILON);
            let step = a.towards(b, distance);
            let travelled = a.distance_to(step) + step.distance_to(b);
            prop_assert!((travelled - separation).abs() <= EPSILON);
        }

        #[test]
        fn towards_past_target_extrapolates(a in point(), b in point(), extra in 1.0f64..1_000.0) {
            let separation = a.distance_to(b);
            prop_assume!(separation > EPSILON);
            let step = a.towards(b, separation + extra);
            let expected = a.distance_to(step);
            prop_assert!((separation + b.distance_to(step) - expected).abs() <= EPSILON);
        }

        #[test]
        fn towards_negative_distance_moves_away(a in point(), b in point(), back in 1.0f64..1_000.0) {
            prop_assume!(a.distance_to(b) > EPSILON);
            let step = a.towards(b, -back);
            let expected = b.distance_to(step);
            prop_assert!((step.distance_to(a) + a.distance_to(b) - expected).abs() <= EPSILON);
        }

        #[test]
        fn circle_intersection_counts_follow_radius(a in point(), b in point()) {
            prop_assume!(a != b);
            let distance = a.distance_to(b);
            prop_assert_eq!(a.circle_intersection(b, distance / 2.0).len(), 1);
            prop_assert_eq!(a.circle_intersection(b, distance * 2.0 / 3.0).len(), 2);
            prop_assert!(a.circle_intersection(b, distance / 3.0).is_empty());
        }

        #[test]
        fn sort_by_distance_orders_a_permutation(
            origin in point(),
            candidates in prop::collection::vec(point(), 0..16),
        ) {
            let sorted = origin.sort_by_distance(&candidates);
            prop_assert_eq!(sorted.len(), candidates.len());
            for pair in sorted.windows(2) {
                prop_assert!(origin.distance_squared(pair[0]) <= origin.distance_squared(pair[1]));
            }
            for candidate in &candidates {
                let expected = candidates.iter().filter(|other| *other == candidate).count();
                let found = sorted.iter().filter(|other| *other == candidate).count();
                prop_assert_eq!(found, expected);
            }
        }

        #[test]
        fn extreme_distances_bound_every_candidate(
            origin in point(),
            candidates in prop::collection::vec(point(), 1..16),
        ) {
            let closest = origin.distance_to_closest(&candidates).unwrap();
            let furthest = origin.distance_to_furthest(&candidates).unwrap();
            for candidate in &candidates {
                let distance = origin.distance_to(*candidate);
                prop_assert!(closest <= distance && distance <= furthest);
            }
        }
    }

    #[test]
    fn conversions_between_dimensions() {
        let flat = Point2::new(3.0, -4.0);
        assert_eq!(flat.to3(), Point3::new(3.0, -4.0, 0.0));
        assert_eq!(Point3::new(3.0, -4.0, 9.5).to2(), flat);
    }

    #[test]
    fn equal_points_hash_equally() {
        let mut set = HashSet::new();
        assert!(set.insert(Point2::new(0.0, 1.0)));
        assert!(!set.insert(Point2::new(-0.0, 1.0)));
    }

    #[test]
    fn componentwise_arithmetic() {
        let a = Point2::new(6.0, -8.0);
        let b = Point2::new(2.0, 4.0);
        assert_eq!(a + b, Point2::new(8.0, -4.0));
        assert_eq!(a - b, Point2::new(4.0, -12.0));
        assert_eq!(a * b, Point2::new(12.0, -32.0));
        assert_eq!(a.checked_div(b), Ok(Point2::new(3.0, -2.0)));
        assert_eq!(
            a.checked_div(Point2::new(0.0, 1.0)),
            Err(GeometryError::DivisionByZero)
        );
    }

    #[test]
    fn coincident_circles_have_no_intersection() {
        let a = Point2::new(1.0, 1.0);
        assert!(a.circle_intersection(a, 2.0).is_empty());
    }

    #[test]
    fn closest_prefers_first_on_ties() {
        let origin = Point2::new(0.0, 0.0);
        let candidates = [Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(3.0, 3.0)];
        assert_eq!(origin.closest(&candidates), Some(candidates[0]));
        assert_eq!(origin.furthest(&candidates), Some(candidates[2]));
        assert_eq!(origin.closest(&[]), None);
    }

    #[test]
    fn sort_by_distance_keeps_input_order_on_ties() {
        let origin = Point2::new(0.0, 0.0);
        let candidates = [
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 0.0),
            Point2::new(-2.0, 0.0),
            Point2::new(0.0, -1.0),
        ];
        assert_eq!(
            origin.sort_by_distance(&candidates),
            vec![candidates[1], candidates[3], candidates[0], candidates[2]]
        );
    }

    #[test]
    fn extreme_distances_of_no_candidates() {
        let origin = Point2::new(3.0, 4.0);
        assert_eq!(origin.distance_to_closest(&[]), None);
        assert_eq!(origin.distance_to_furthest(&[]), None);
        let candidates = [Point2::new(0.0, 0.0), Point2::new(3.0, 5.0)];
        assert_eq!(origin.distance_to_closest(&candidates), Some(1.0));
        assert_eq!(origin.distance_to_furthest(&candidates), Some(5.0));
    }

    #[test]
    fn direction_vector_is_the_sign_per_axis() {
        let origin = Point2::new(2.0, 2.0);
        assert_eq!(origin.direction_vector(Point2::new(7.5, -3.0)), Point2::new(1.0, -1.0));
        assert_eq!(origin.direction_vector(Point2::new(2.0, 9.0)), Point2::new(0.0, 1.0));
        assert_eq!(origin.direction_vector(origin), Point2::new(0.0, 0.0));
    }

    #[test]
    fn neighbors_have_expected_counts() {
        let point = Point2::new(5.0, 5.0);
        assert_eq!(point.neighbors4().len(), 4);
        assert_eq!(point.neighbors8().len(), 8);
        assert_eq!(GridPoint::new(0, 0).neighbors8().count(), 3);
        assert_eq!(GridPoint::new(3, 3).neighbors8().count(), 8);
    }

    #[test]
    fn rect_center_and_offset() {
        let rect = Rect::new(2.0, 4.0, 10.0, 6.0);
        assert_eq!(rect.center(), Point2::new(7.0, 7.0));
        assert_eq!(rect.size(), Size::new(10.0, 6.0));
        assert_eq!(
            rect.offset(Point2::new(1.0, 1.0)),
            Rect::new(3.0, 5.0, 10.0, 6.0)
        );
    }
}
