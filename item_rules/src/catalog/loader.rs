//! Catalog construction: the built-in item list and content-file loading.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CatalogError, ItemCatalog};
use crate::items::{IconRef, ItemCategory, ItemDefinition, ItemId};

/// Resolves sprite paths to icon handles. Called once per item at build time.
pub trait AssetLoader {
    fn load_sprite(&mut self, path: &str) -> IconRef;
}

/// Loader that hands out sequential handles and remembers their paths.
///
/// Identical paths share one handle.
#[derive(Debug, Clone, Default)]
pub struct SpriteRegistry {
    handles: HashMap<String, IconRef>,
    paths: Vec<String>,
}

impl SpriteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the path a handle was issued for.
    pub fn path_of(&self, icon: IconRef) -> Option<&str> {
        if icon == IconRef::NONE {
            return None;
        }
        self.paths.get(icon.0 as usize - 1).map(String::as_str)
    }

    /// Get the number of distinct sprites loaded.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl AssetLoader for SpriteRegistry {
    fn load_sprite(&mut self, path: &str) -> IconRef {
        if let Some(icon) = self.handles.get(path) {
            return *icon;
        }
        self.paths.push(path.to_string());
        let icon = IconRef(self.paths.len() as u64);
        self.handles.insert(path.to_string(), icon);
        icon
    }
}

/// One item as written in a content file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: i32,
    pub category: ItemCategory,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub protection: f32,
    #[serde(default)]
    pub speed_modifier: f32,
    #[serde(default)]
    pub damage: f32,
    #[serde(default)]
    pub value: f32,
    #[serde(default)]
    pub sprite: Option<String>,
}

impl ItemEntry {
    /// Resolve the sprite and produce the immutable definition.
    pub fn into_definition(self, assets: &mut impl AssetLoader) -> ItemDefinition {
        let icon = self
            .sprite
            .as_deref()
            .map(|path| assets.load_sprite(path))
            .unwrap_or(IconRef::NONE);

        ItemDefinition {
            id: ItemId(self.id),
            category: self.category,
            name: self.name,
            description: self.description,
            stackable: self.stackable,
            protection: self.protection,
            speed_modifier: self.speed_modifier,
            damage: self.damage,
            value: self.value,
            icon,
        }
    }
}

/// Top-level layout of a catalog content file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogFile {
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

/// (id, category, name, description, stackable, protection, speed, damage, value, sprite)
type StandardRow = (
    i32,
    ItemCategory,
    &'static str,
    &'static str,
    bool,
    f32,
    f32,
    f32,
    f32,
    &'static str,
);

const STANDARD_ITEMS: [StandardRow; 11] = [
    (0, ItemCategory::Treasure, "Diamond", "Oooh, shiny! It's probably worth a lot.", true, 0.0, 0.0, 0.0, 15.0, "Sprites/Gems/Diamond"),
    (1, ItemCategory::Treasure, "Ruby", "A red tear drop of fortune.", true, 0.0, 0.0, 0.0, 5.0, "Sprites/Gems/Ruby"),
    (2, ItemCategory::Treasure, "Emerald", "Its green color makes it worth quite a bit.", true, 0.0, 0.0, 0.0, 5.0, "Sprites/Gems/Emerald"),
    (3, ItemCategory::Treasure, "Sapphire", "Blue, the favorite color of many people.", true, 0.0, 0.0, 0.0, 5.0, "Sprites/Gems/Sapphire"),
    (5, ItemCategory::Weapon, "Dagger", "A short, sweet, light-weight weapon.", false, 0.0, 0.0, 10.0, 10.0, "Sprites/Weapons/icon_dagger1"),
    (6, ItemCategory::Weapon, "Sword", "It's heavy, but sure packs a punch!", false, 0.0, -1.0, 25.0, 25.0, "Sprites/Weapons/icon_sword_short2"),
    (10, ItemCategory::Helmet, "Metal Helmet", "Most important piece of protection is a helmet.", false, 3.0, -0.2, 0.0, 15.0, "Sprites/Armor/icon_plate_head1"),
    (11, ItemCategory::Chestpiece, "Metal Chestpiece", "Offers the most protection, but is also the heaviest.", false, 8.0, -0.8, 0.0, 25.0, "Sprites/Armor/icon_plate_breast"),
    (12, ItemCategory::Leggings, "Metal Leggings", "Legs are crucial to moving around, so protect them!", false, 6.0, -1.0, 0.0, 20.0, "Sprites/Armor/icon_plate_legs"),
    (13, ItemCategory::Boots, "Metal Boots", "If you find yourself dropping your sword quite a lot, consider buying these boots.", false, 3.0, -0.5, 0.0, 15.0, "Sprites/Armor/icon_plate_boots1"),
    (14, ItemCategory::Boots, "Magic Speed Boots", "Hmm, maybe magic does exist after all!", false, 1.0, 4.0, 0.0, 50.0, "Sprites/Armor/icon_LEATHER_boots1"),
];

/// Well-known ids in the built-in catalog.
pub mod standard_ids {
    use crate::items::ItemId;

    pub const DIAMOND: ItemId = ItemId(0);
    pub const RUBY: ItemId = ItemId(1);
    pub const EMERALD: ItemId = ItemId(2);
    pub const SAPPHIRE: ItemId = ItemId(3);
    pub const DAGGER: ItemId = ItemId(5);
    pub const SWORD: ItemId = ItemId(6);
    pub const METAL_HELMET: ItemId = ItemId(10);
    pub const METAL_CHESTPIECE: ItemId = ItemId(11);
    pub const METAL_LEGGINGS: ItemId = ItemId(12);
    pub const METAL_BOOTS: ItemId = ItemId(13);
    pub const MAGIC_SPEED_BOOTS: ItemId = ItemId(14);
}

impl ItemCatalog {
    /// Build the game's built-in catalog, loading each icon once.
    pub fn standard(assets: &mut impl AssetLoader) -> Self {
        let definitions = STANDARD_ITEMS.iter().map(
            |&(id, category, name, description, stackable, protection, speed, damage, value, sprite)| {
                ItemDefinition {
                    id: ItemId(id),
                    category,
                    name: name.to_string(),
                    description: description.to_string(),
                    stackable,
                    protection,
                    speed_modifier: speed,
                    damage,
                    value,
                    icon: assets.load_sprite(sprite),
                }
            },
        );
        let definitions: Vec<_> = definitions.collect();

        // The table has unique, non-sentinel ids, so registration cannot fail.
        Self::from_definitions(definitions).unwrap_or_default()
    }

    /// Build a catalog from an already-parsed content file.
    pub fn from_file(file: CatalogFile, assets: &mut impl AssetLoader) -> Result<Self, CatalogError> {
        Self::from_definitions(
            file.items
                .into_iter()
                .map(|entry| entry.into_definition(assets))
                .collect::<Vec<_>>(),
        )
    }

    /// Parse a TOML content file (`[[items]]` tables).
    pub fn from_toml_str(content: &str, assets: &mut impl AssetLoader) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_file(file, assets)
    }

    /// Parse a JSON content file (`{"items": [...]}`).
    pub fn from_json_str(content: &str, assets: &mut impl AssetLoader) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::from_file(file, assets)
    }

    /// Load a content file, choosing the format by extension (`.json`, else TOML).
    pub fn load(path: &Path, assets: &mut impl AssetLoader) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content, assets),
            _ => Self::from_toml_str(&content, assets),
        }
    }
}
