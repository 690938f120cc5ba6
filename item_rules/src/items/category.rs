//! Item categories and slot restrictions.

use serde::{Deserialize, Serialize};

/// Classification of an item. Governs which slots may hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemCategory {
    /// No category. As a slot restriction it means "accepts anything".
    #[default]
    Undefined,
    /// Gems and other valuables. Treasure doubles as currency at the exchange.
    Treasure,
    Weapon,
    Helmet,
    Chestpiece,
    Leggings,
    Boots,
}

/// Equipment slot order: one slot per equipped category.
pub const EQUIPMENT_ORDER: [ItemCategory; 5] = [
    ItemCategory::Weapon,
    ItemCategory::Helmet,
    ItemCategory::Chestpiece,
    ItemCategory::Leggings,
    ItemCategory::Boots,
];

impl ItemCategory {
    /// Check if items of this category are spent as currency.
    pub fn is_currency(&self) -> bool {
        matches!(self, ItemCategory::Treasure)
    }

    /// Check if this category is worn in the equipment loadout.
    pub fn is_equipment(&self) -> bool {
        EQUIPMENT_ORDER.contains(self)
    }

    /// Check if this category is a piece of armour.
    pub fn is_armor(&self) -> bool {
        matches!(
            self,
            ItemCategory::Helmet
                | ItemCategory::Chestpiece
                | ItemCategory::Leggings
                | ItemCategory::Boots
        )
    }

    /// Check if a slot restricted to `self` accepts an item of `category`.
    pub fn accepts(&self, category: ItemCategory) -> bool {
        *self == ItemCategory::Undefined || *self == category
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Undefined => "Undefined",
            ItemCategory::Treasure => "Treasure",
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Helmet => "Helmet",
            ItemCategory::Chestpiece => "Chestpiece",
            ItemCategory::Leggings => "Leggings",
            ItemCategory::Boots => "Boots",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
