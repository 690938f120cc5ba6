//! Item definitions.

mod category;

pub use category::*;

use serde::{Deserialize, Serialize};

/// Identifier of an item definition in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i32);

impl ItemId {
    /// The "no item" sentinel. Empty slots report this id.
    pub const UNDEFINED: ItemId = ItemId(-1);

    /// Check if this is the undefined sentinel.
    pub fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::UNDEFINED
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to an icon asset, issued by an [`AssetLoader`](crate::AssetLoader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct IconRef(pub u64);

impl IconRef {
    /// Handle for "no icon".
    pub const NONE: IconRef = IconRef(0);
}

/// Immutable description of an item, owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub category: ItemCategory,
    pub name: String,
    pub description: String,
    pub stackable: bool,
    pub protection: f32,
    pub speed_modifier: f32,
    pub damage: f32,
    /// Worth in currency units. Also the shop price.
    pub value: f32,
    #[serde(default)]
    pub icon: IconRef,
}

impl ItemDefinition {
    /// Create a definition with the given identity and zeroed stats.
    pub fn new(id: impl Into<ItemId>, category: ItemCategory, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            name: name.into(),
            description: String::new(),
            stackable: false,
            protection: 0.0,
            speed_modifier: 0.0,
            damage: 0.0,
            value: 0.0,
            icon: IconRef::NONE,
        }
    }

    /// The sentinel returned for ids the catalog does not know.
    pub fn undefined() -> Self {
        Self {
            id: ItemId::UNDEFINED,
            category: ItemCategory::Undefined,
            name: "Perfectly Generic Item".to_string(),
            description: "It's so perfect!".to_string(),
            stackable: true,
            protection: 0.0,
            speed_modifier: 0.0,
            damage: 0.0,
            value: 0.0,
            icon: IconRef::NONE,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set whether several units share one slot.
    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    /// Set protection granted while worn.
    pub fn with_protection(mut self, protection: f32) -> Self {
        self.protection = protection;
        self
    }

    /// Set the movement speed modifier applied while equipped.
    pub fn with_speed_modifier(mut self, speed_modifier: f32) -> Self {
        self.speed_modifier = speed_modifier;
        self
    }

    /// Set the melee damage.
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    /// Set the currency value.
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    /// Set the icon handle.
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = icon;
        self
    }

    /// Check if this is the undefined sentinel.
    pub fn is_undefined(&self) -> bool {
        self.id.is_undefined()
    }

    /// Build the hover text shown over an inventory stack.
    ///
    /// Armour lists protection and speed, weapons list damage and speed,
    /// treasure lists its value.
    pub fn tooltip(&self) -> String {
        let mut text = format!("{}\n{}", self.name, self.description);
        match self.category {
            c if c.is_armor() => {
                text.push_str(&format!(
                    "\n\nProtection: {}\nSpeed Modifier: {}",
                    self.protection, self.speed_modifier
                ));
            }
            ItemCategory::Weapon => {
                text.push_str(&format!(
                    "\n\nDamage: {}\nSpeed Modifier: {}",
                    self.damage, self.speed_modifier
                ));
            }
            ItemCategory::Treasure => {
                text.push_str(&format!("\n\nValue: {}", self.value));
            }
            _ => {}
        }
        text
    }

    /// Build the hover text shown over a shop listing. Always ends with the price.
    pub fn shop_tooltip(&self) -> String {
        let mut text = format!("{}\n{}", self.name, self.description);
        if self.category.is_armor() {
            text.push_str(&format!(
                "\n\nProtection: {}\nSpeed Modifier: {}",
                self.protection, self.speed_modifier
            ));
        } else if self.category == ItemCategory::Weapon {
            text.push_str(&format!(
                "\n\nDamage: {}\nSpeed Modifier: {}",
                self.damage, self.speed_modifier
            ));
        }
        text.push_str(&format!("\n\nValue: {}", self.value));
        text
    }
}

impl Default for ItemDefinition {
    fn default() -> Self {
        Self::undefined()
    }
}
