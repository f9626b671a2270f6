//! Typed wrappers around the raw numeric identifiers used by the game.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a single in-game entity, unique for the match.
pub type Tag = u64;

/// Domain an identifier belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdCategory {
    /// Unit and structure types.
    UnitType,
    /// Abilities that can be issued as orders.
    Ability,
    /// Researchable upgrades.
    Upgrade,
    /// Buffs applied to units.
    Buff,
    /// Persistent area effects.
    Effect,
}

impl IdCategory {
    /// Every category in canonical order.
    pub const ALL: [IdCategory; 5] = [
        IdCategory::UnitType,
        IdCategory::Ability,
        IdCategory::Upgrade,
        IdCategory::Buff,
        IdCategory::Effect,
    ];

    /// Section name used by the raw `stableid.json` table.
    #[must_use]
    pub const fn table_key(self) -> &'static str {
        match self {
            Self::UnitType => "Units",
            Self::Ability => "Abilities",
            Self::Upgrade => "Upgrades",
            Self::Buff => "Buffs",
            Self::Effect => "Effects",
        }
    }
}

impl fmt::Display for IdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_key())
    }
}

/// Raw identifier tagged with its category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableId {
    /// Category the value belongs to.
    pub category: IdCategory,
    /// Raw numeric value reported by the game.
    pub value: u32,
}

impl StableId {
    /// Creates a new categorised identifier.
    #[must_use]
    pub const fn new(category: IdCategory, value: u32) -> Self {
        Self { category, value }
    }
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident => $category:expr) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Category shared by every value of this identifier type.
            pub const CATEGORY: IdCategory = $category;

            /// Wraps a raw numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Raw numeric value reported by the game.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Untyped form of the identifier.
            #[must_use]
            pub const fn stable(&self) -> StableId {
                StableId::new($category, self.0)
            }
        }

        impl From<$name> for StableId {
            fn from(id: $name) -> StableId {
                id.stable()
            }
        }
    };
}

typed_id!(
    /// Identifier of a unit or structure type.
    UnitTypeId => IdCategory::UnitType
);
typed_id!(
    /// Identifier of an ability.
    AbilityId => IdCategory::Ability
);
typed_id!(
    /// Identifier of an upgrade.
    UpgradeId => IdCategory::Upgrade
);
typed_id!(
    /// Identifier of a buff.
    BuffId => IdCategory::Buff
);
typed_id!(
    /// Identifier of an effect.
    EffectId => IdCategory::Effect
);
