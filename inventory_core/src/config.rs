//! Session configuration loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! backpack_slots = 20
//! base_speed = 8.0
//! double_click_threshold = 0.8
//!
//! [trade]
//! min_free_slots = 2
//! shop_items = [6, 10, 14]
//! change = { source = "highest_held", pool = "lower_denominations" }
//!
//! [score]
//! treasure_multiplier = 5.0
//! days_bonus = 10000.0
//! max_days_for_bonus = 4
//! death_deduction = 500.0
//!
//! [[chests]]
//! slots = 10
//! area = "North Area"
//! items = [[0, 2], [1, 3]]
//!
//! [[chests]]
//! storage = true
//! ```

use std::path::{Path, PathBuf};

use item_rules::{is_valid_amount, AssetLoader, CatalogError, ItemCatalog, DEFAULT_BASE_SPEED};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chest::ChestConfig;
use crate::error::InventoryError;
use crate::gesture::DEFAULT_DOUBLE_CLICK_THRESHOLD;
use crate::score::ScoreConfig;
use crate::trade::TradeConfig;

pub const DEFAULT_BACKPACK_SLOTS: usize = 20;

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not load item catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// The config refers to items or amounts the catalog rejects.
    #[error("Config content rejected: {0}")]
    Content(#[from] InventoryError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_backpack_slots")]
    pub backpack_slots: usize,
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    #[serde(default = "default_double_click_threshold")]
    pub double_click_threshold: f32,
    /// Item content file; the built-in catalog is used when absent.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub trade: TradeConfig,
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub chests: Vec<ChestConfig>,
}

fn default_backpack_slots() -> usize {
    DEFAULT_BACKPACK_SLOTS
}

fn default_base_speed() -> f32 {
    DEFAULT_BASE_SPEED
}

fn default_double_click_threshold() -> f32 {
    DEFAULT_DOUBLE_CLICK_THRESHOLD
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            backpack_slots: DEFAULT_BACKPACK_SLOTS,
            base_speed: DEFAULT_BASE_SPEED,
            double_click_threshold: DEFAULT_DOUBLE_CLICK_THRESHOLD,
            catalog: None,
            trade: TradeConfig::default(),
            score: ScoreConfig::default(),
            chests: Vec::new(),
        }
    }
}

impl InventoryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: InventoryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), chests = config.chests.len(), "config loaded");
        Ok(config)
    }

    /// Check values serde cannot: sizes, thresholds, chest contents.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backpack_slots == 0 {
            return Err(ConfigError::Invalid("backpack_slots must be at least 1".into()));
        }
        if self.double_click_threshold.is_nan() || self.double_click_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "double_click_threshold must be positive, got {}",
                self.double_click_threshold
            )));
        }

        let weights = [
            ("treasure_multiplier", self.score.treasure_multiplier),
            ("days_bonus", self.score.days_bonus),
            ("death_deduction", self.score.death_deduction),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, value)| value.is_nan() || *value < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "score.{} must not be negative, got {}",
                name, value
            )));
        }

        for (index, chest) in self.chests.iter().enumerate() {
            if chest.slots == 0 {
                return Err(ConfigError::Invalid(format!("chest {} has no slots", index)));
            }
            if chest.items.len() > chest.slots {
                return Err(ConfigError::Invalid(format!(
                    "chest {} lists {} items for {} slots",
                    index,
                    chest.items.len(),
                    chest.slots
                )));
            }
            if let Some(&(item, amount)) = chest.items.iter().find(|(_, amount)| !is_valid_amount(*amount)) {
                return Err(ConfigError::Invalid(format!(
                    "chest {} holds {} of item {}",
                    index, amount, item
                )));
            }
        }

        Ok(())
    }

    /// Check the item ids this config names against `catalog`.
    pub fn validate_against(&self, catalog: &ItemCatalog) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(&item) = self.trade.shop_items.iter().find(|id| !catalog.contains(**id)) {
            return Err(InventoryError::UnknownItem { item }.into());
        }
        self.trade.change.validate(catalog)?;

        let mut stocked = self.chests.iter().flat_map(|chest| chest.items.iter());
        if let Some(&(item, _)) = stocked.find(|(id, _)| !catalog.contains(*id)) {
            return Err(InventoryError::UnknownItem { item }.into());
        }

        Ok(())
    }

    /// The catalog this config names, or the built-in one.
    pub fn load_catalog(&self, assets: &mut impl AssetLoader) -> Result<ItemCatalog, ConfigError> {
        match &self.catalog {
            Some(path) => Ok(ItemCatalog::load(path, assets)?),
            None => Ok(ItemCatalog::standard(assets)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::{ChangePool, ChangeSource};
    use item_rules::{standard_ids::*, ItemId, SpriteRegistry};

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = InventoryConfig::from_toml_str("").unwrap();
        assert_eq!(config, InventoryConfig::default());
        assert_eq!(config.backpack_slots, 20);
        assert_eq!(config.base_speed, 8.0);
        assert_eq!(config.double_click_threshold, 0.8);
        assert_eq!(config.trade.min_free_slots, 2);
    }

    #[test]
    fn test_full_document() {
        let config = InventoryConfig::from_toml_str(
            r#"
            backpack_slots = 12
            double_click_threshold = 0.5

            [trade]
            min_free_slots = 3
            shop_items = [6, 14]
            change = { source = { specific = 0 }, pool = { specific = [1, 2] } }

            [[chests]]
            slots = 4
            items = [[0, 2]]

            [[chests]]
            area = "East Area"
            "#,
        )
        .unwrap();

        assert_eq!(config.backpack_slots, 12);
        assert_eq!(config.trade.shop_items, vec![SWORD, MAGIC_SPEED_BOOTS]);
        assert_eq!(config.trade.change.source, ChangeSource::Specific(DIAMOND));
        assert_eq!(config.trade.change.pool, ChangePool::Specific(vec![RUBY, EMERALD]));
        assert_eq!(config.chests.len(), 2);
        assert_eq!(config.chests[1].slots, 10);
        assert_eq!(config.chests[1].area.as_deref(), Some("East Area"));
    }

    #[test]
    fn test_unit_change_variants() {
        let config = InventoryConfig::from_toml_str(
            r#"
            [trade.change]
            source = "highest_held"
            pool = "lower_denominations"
            "#,
        )
        .unwrap();
        assert_eq!(config.trade.change.source, ChangeSource::HighestHeld);
        assert_eq!(config.trade.change.pool, ChangePool::LowerDenominations);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            InventoryConfig::from_toml_str("backpack_slots = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            InventoryConfig::from_toml_str("double_click_threshold = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            InventoryConfig::from_toml_str("[[chests]]\nslots = 1\nitems = [[0, 1], [1, 1]]"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            InventoryConfig::from_toml_str("[[chests]]\nitems = [[0, 10]]"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_score_section() {
        let config = InventoryConfig::from_toml_str(
            r#"
            [score]
            treasure_multiplier = 10.0
            max_days_for_bonus = 6
            "#,
        )
        .unwrap();
        assert_eq!(config.score.treasure_multiplier, 10.0);
        assert_eq!(config.score.max_days_for_bonus, 6);
        assert_eq!(config.score.days_bonus, 10_000.0);
        assert_eq!(config.score.death_deduction, 500.0);

        assert!(matches!(
            InventoryConfig::from_toml_str("[score]\ndeath_deduction = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_against_rejects_non_currency_change() {
        let catalog = InventoryConfig::default()
            .load_catalog(&mut SpriteRegistry::new())
            .unwrap();

        let config = InventoryConfig::from_toml_str(
            "[trade]\nchange = { source = { specific = 0 }, pool = { specific = [1, 3] } }",
        )
        .unwrap();
        assert!(config.validate_against(&catalog).is_ok());

        let weapon_source = InventoryConfig::from_toml_str("[trade]\nchange = { source = { specific = 6 } }").unwrap();
        assert!(matches!(
            weapon_source.validate_against(&catalog),
            Err(ConfigError::Content(InventoryError::NotCurrency { item: SWORD }))
        ));

        let armour_pool =
            InventoryConfig::from_toml_str("[trade]\nchange = { pool = { specific = [2, 10] } }").unwrap();
        assert!(matches!(
            armour_pool.validate_against(&catalog),
            Err(ConfigError::Content(InventoryError::NotCurrency { item: METAL_HELMET }))
        ));
    }

    #[test]
    fn test_validate_against_rejects_unknown_items() {
        let catalog = InventoryConfig::default()
            .load_catalog(&mut SpriteRegistry::new())
            .unwrap();

        let chest_item = InventoryConfig::from_toml_str("[[chests]]\nitems = [[40, 1]]").unwrap();
        assert!(matches!(
            chest_item.validate_against(&catalog),
            Err(ConfigError::Content(InventoryError::UnknownItem { item: ItemId(40) }))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            InventoryConfig::from_toml_str("backpack_slots = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_built_in_catalog() {
        let catalog = InventoryConfig::default()
            .load_catalog(&mut SpriteRegistry::new())
            .unwrap();
        assert!(catalog.contains(ItemId(14)));
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = InventoryConfig {
            catalog: Some(PathBuf::from("/nonexistent/items.toml")),
            ..InventoryConfig::default()
        };
        assert!(matches!(
            config.load_catalog(&mut SpriteRegistry::new()),
            Err(ConfigError::Catalog(CatalogError::Io(_)))
        ));
    }
}
