//! Arguments accepted wherever a query filters by unit type.

use std::collections::{BTreeSet, HashSet};

use sc2_state_core::UnitTypeId;

/// One or more unit types accepted by the type filters of [`crate::Units`].
pub trait TypeSet {
    /// Whether `id` is a member of the set.
    fn contains_type(&self, id: UnitTypeId) -> bool;

    /// Members of the set in iteration order.
    fn type_ids(&self) -> Vec<UnitTypeId>;
}

impl TypeSet for UnitTypeId {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        *self == id
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        vec![*self]
    }
}

impl TypeSet for [UnitTypeId] {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        self.contains(&id)
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        self.to_vec()
    }
}

impl<const N: usize> TypeSet for [UnitTypeId; N] {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        self.contains(&id)
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        self.to_vec()
    }
}

impl TypeSet for Vec<UnitTypeId> {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        self.contains(&id)
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        self.clone()
    }
}

impl<S: std::hash::BuildHasher> TypeSet for HashSet<UnitTypeId, S> {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        self.contains(&id)
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        self.iter().copied().collect()
    }
}

impl TypeSet for BTreeSet<UnitTypeId> {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        self.contains(&id)
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        self.iter().copied().collect()
    }
}

impl<T: TypeSet + ?Sized> TypeSet for &T {
    fn contains_type(&self, id: UnitTypeId) -> bool {
        (**self).contains_type(id)
    }

    fn type_ids(&self) -> Vec<UnitTypeId> {
        (**self).type_ids()
    }
}
