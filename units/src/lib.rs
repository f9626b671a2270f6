#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only spatial and categorical queries over one step's units.
//!
//! A [`Units`] value wraps shared unit records. Every query returns a new
//! value and leaves its receiver untouched, so a container can be handed to
//! any number of call sites within a step.

mod type_set;

use std::{collections::HashSet, sync::Arc};

use rand::{seq::SliceRandom, Rng};
use sc2_state_core::{Point2, Tag, Unit, UnitCatalog, UnitTypeId};

pub use type_set::TypeSet;

/// Ordered collection of units observed during a single step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Units {
    units: Vec<Arc<Unit>>,
}

impl Units {
    /// Wraps shared unit records, keeping their order.
    #[must_use]
    pub fn new(units: Vec<Arc<Unit>>) -> Self {
        Self { units }
    }

    /// Container without units.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of units.
    #[must_use]
    pub fn amount(&self) -> usize {
        self.units.len()
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the container has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether the container has at least one unit.
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.units.is_empty()
    }

    /// Iterates the units in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Unit>> {
        self.units.iter()
    }

    /// Shared records in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Arc<Unit>] {
        &self.units
    }

    /// First unit.
    #[must_use]
    pub fn first(&self) -> Option<&Unit> {
        self.units.first().map(Arc::as_ref)
    }

    /// First `n` units.
    #[must_use]
    pub fn take(&self, n: usize) -> Units {
        self.units.iter().take(n).cloned().collect()
    }

    /// Unit carrying `tag`.
    #[must_use]
    pub fn find_by_tag(&self, tag: Tag) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.tag == tag)
            .map(Arc::as_ref)
    }

    /// Tags of every unit.
    #[must_use]
    pub fn tags(&self) -> HashSet<Tag> {
        self.units.iter().map(|unit| unit.tag).collect()
    }

    /// Units whose tag is in `tags`.
    #[must_use]
    pub fn tags_in<I>(&self, tags: I) -> Units
    where
        I: IntoIterator<Item = Tag>,
    {
        let tags: HashSet<Tag> = tags.into_iter().collect();
        self.filter(|unit| tags.contains(&unit.tag))
    }

    /// Units whose tag is not in `tags`.
    #[must_use]
    pub fn tags_not_in<I>(&self, tags: I) -> Units
    where
        I: IntoIterator<Item = Tag>,
    {
        let tags: HashSet<Tag> = tags.into_iter().collect();
        self.filter(|unit| !tags.contains(&unit.tag))
    }

    /// Units satisfying `predicate`, in order.
    pub fn filter<F>(&self, mut predicate: F) -> Units
    where
        F: FnMut(&Unit) -> bool,
    {
        self.units
            .iter()
            .filter(|unit| predicate(Arc::as_ref(unit)))
            .cloned()
            .collect()
    }

    /// Builds a container from a selection of shared records.
    #[must_use]
    pub fn subgroup<I>(units: I) -> Units
    where
        I: IntoIterator<Item = Arc<Unit>>,
    {
        units.into_iter().collect()
    }

    /// Mean position of the units.
    #[must_use]
    pub fn center(&self) -> Option<Point2> {
        let positions: Vec<Point2> = self.units.iter().map(|unit| unit.position).collect();
        Point2::center(&positions)
    }

    fn pick_by_distance<F>(&self, point: Point2, better: F) -> Option<&Unit>
    where
        F: Fn(f64, f64) -> bool,
    {
        let mut best: Option<(&Unit, f64)> = None;
        for unit in &self.units {
            let distance = unit.position.distance_squared(point);
            match best {
                Some((_, best_distance)) if !better(distance, best_distance) => {}
                _ => best = Some((Arc::as_ref(unit), distance)),
            }
        }
        best.map(|(unit, _)| unit)
    }

    /// Unit nearest to `point`; the first of several equidistant units wins.
    #[must_use]
    pub fn closest_to(&self, point: Point2) -> Option<&Unit> {
        self.pick_by_distance(point, |candidate, best| candidate < best)
    }

    /// Unit farthest from `point`; the first of several equidistant units wins.
    #[must_use]
    pub fn furthest_to(&self, point: Point2) -> Option<&Unit> {
        self.pick_by_distance(point, |candidate, best| candidate > best)
    }

    /// Distance from `point` to the nearest unit.
    #[must_use]
    pub fn closest_distance_to(&self, point: Point2) -> Option<f64> {
        self.closest_to(point).map(|unit| unit.distance_to(point))
    }

    /// Distance from `point` to the farthest unit.
    #[must_use]
    pub fn furthest_distance_to(&self, point: Point2) -> Option<f64> {
        self.furthest_to(point).map(|unit| unit.distance_to(point))
    }

    /// Units strictly closer than `distance` to `point`.
    #[must_use]
    pub fn closer_than(&self, distance: f64, point: Point2) -> Units {
        self.filter(|unit| unit.distance_to(point) < distance)
    }

    /// Units strictly further than `distance` from `point`.
    #[must_use]
    pub fn further_than(&self, distance: f64, point: Point2) -> Units {
        self.filter(|unit| unit.distance_to(point) > distance)
    }

    /// Units sorted by ascending distance to `point`; ties keep their order.
    #[must_use]
    pub fn sorted_by_distance_to(&self, point: Point2) -> Units {
        let mut sorted = self.units.clone();
        sorted.sort_by(|a, b| {
            a.position
                .distance_squared(point)
                .total_cmp(&b.position.distance_squared(point))
        });
        Units::new(sorted)
    }

    /// Units whose type is in `types`.
    #[must_use]
    pub fn of_type<T: TypeSet>(&self, types: T) -> Units {
        self.filter(|unit| types.contains_type(unit.type_id))
    }

    /// Units whose type is not in `types`.
    #[must_use]
    pub fn exclude_type<T: TypeSet>(&self, types: T) -> Units {
        self.filter(|unit| !types.contains_type(unit.type_id))
    }

    /// Units of `types` or of any morph sharing their base type, such as
    /// flying and landed variants of one building.
    #[must_use]
    pub fn same_unit<T: TypeSet>(&self, types: T, catalog: &UnitCatalog) -> Units {
        let mut accepted: HashSet<UnitTypeId> = types.type_ids().into_iter().collect();
        for id in types.type_ids() {
            if let Some(alias) = catalog.unit_alias(id) {
                let _added = accepted.insert(alias);
            }
        }
        self.filter(|unit| {
            accepted.contains(&unit.type_id)
                || catalog
                    .unit_alias(unit.type_id)
                    .is_some_and(|alias| accepted.contains(&alias))
        })
    }

    /// Units of `types` or of any type satisfying the same tech requirement.
    #[must_use]
    pub fn same_tech<T: TypeSet>(&self, types: T, catalog: &UnitCatalog) -> Units {
        let mut accepted: HashSet<UnitTypeId> = types.type_ids().into_iter().collect();
        for id in types.type_ids() {
            accepted.extend(catalog.tech_alias(id).iter().copied());
        }
        self.filter(|unit| {
            accepted.contains(&unit.type_id)
                || catalog
                    .tech_alias(unit.type_id)
                    .iter()
                    .any(|alias| accepted.contains(alias))
        })
    }

    /// Uniformly sampled subset of `min(n, amount)` units, in container order.
    #[must_use]
    pub fn random_group_of<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Units {
        if n >= self.units.len() {
            return self.clone();
        }
        let mut picked = rand::seq::index::sample(rng, self.units.len(), n).into_vec();
        picked.sort_unstable();
        picked
            .into_iter()
            .map(|index| Arc::clone(&self.units[index]))
            .collect()
    }

    /// One unit chosen uniformly.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Unit> {
        self.units.choose(rng).map(Arc::as_ref)
    }

    /// One unit chosen uniformly, or `default` when the container is empty.
    #[must_use]
    pub fn random_or<'a, R: Rng + ?Sized>(&'a self, default: &'a Unit, rng: &mut R) -> &'a Unit {
        self.random(rng).unwrap_or(default)
    }

    /// Fully constructed units.
    #[must_use]
    pub fn ready(&self) -> Units {
        self.filter(Unit::is_ready)
    }

    /// Units still under construction.
    #[must_use]
    pub fn not_ready(&self) -> Units {
        self.filter(|unit| !unit.is_ready())
    }

    /// Units without orders.
    #[must_use]
    pub fn idle(&self) -> Units {
        self.filter(Unit::is_idle)
    }

    /// Units owned by the observer.
    #[must_use]
    pub fn owned(&self) -> Units {
        self.filter(Unit::is_mine)
    }

    /// Units owned by an opponent.
    #[must_use]
    pub fn enemy(&self) -> Units {
        self.filter(Unit::is_enemy)
    }

    /// Airborne units.
    #[must_use]
    pub fn flying(&self) -> Units {
        self.filter(|unit| unit.is_flying)
    }

    /// Ground units.
    #[must_use]
    pub fn not_flying(&self) -> Units {
        self.filter(|unit| !unit.is_flying)
    }

    /// Structures.
    #[must_use]
    pub fn structure(&self) -> Units {
        self.filter(|unit| unit.is_structure)
    }

    /// Everything but structures.
    #[must_use]
    pub fn not_structure(&self) -> Units {
        self.filter(|unit| !unit.is_structure)
    }

    /// Units in vision this step.
    #[must_use]
    pub fn visible(&self) -> Units {
        self.filter(Unit::is_visible)
    }

    /// Remembered units whose data is stale.
    #[must_use]
    pub fn snapshot(&self) -> Units {
        self.filter(Unit::is_snapshot)
    }

    /// Units selected by the player.
    #[must_use]
    pub fn selected(&self) -> Units {
        self.filter(|unit| unit.is_selected)
    }

    /// Workers on the way to a resource.
    #[must_use]
    pub fn gathering(&self) -> Units {
        self.filter(Unit::is_gathering)
    }

    /// Workers bringing a load back.
    #[must_use]
    pub fn returning(&self) -> Units {
        self.filter(Unit::is_returning)
    }

    /// Workers either gathering or returning.
    #[must_use]
    pub fn collecting(&self) -> Units {
        self.filter(Unit::is_collecting)
    }

    /// Mineral fields.
    #[must_use]
    pub fn mineral_field(&self) -> Units {
        self.filter(Unit::is_mineral_field)
    }

    /// Vespene geysers.
    #[must_use]
    pub fn vespene_geyser(&self) -> Units {
        self.filter(Unit::is_vespene_geyser)
    }

    /// Same units with idle ones moved to the front, keeping relative order.
    #[must_use]
    pub fn prefer_idle(&self) -> Units {
        let mut sorted = self.units.clone();
        sorted.sort_by_key(|unit| !unit.is_idle());
        Units::new(sorted)
    }
}

impl FromIterator<Arc<Unit>> for Units {
    fn from_iter<I: IntoIterator<Item = Arc<Unit>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromIterator<Unit> for Units {
    fn from_iter<I: IntoIterator<Item = Unit>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Arc::new).collect())
    }
}

impl<'a> IntoIterator for &'a Units {
    type Item = &'a Arc<Unit>;
    type IntoIter = std::slice::Iter<'a, Arc<Unit>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl IntoIterator for Units {
    type Item = Arc<Unit>;
    type IntoIter = std::vec::IntoIter<Arc<Unit>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl Extend<Arc<Unit>> for Units {
    fn extend<I: IntoIterator<Item = Arc<Unit>>>(&mut self, iter: I) {
        self.units.extend(iter);
    }
}
