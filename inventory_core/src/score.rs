//! End-of-run scoring from the treasure the player kept.

use item_rules::ItemCategory;
use serde::{Deserialize, Serialize};

use crate::container::Container;

/// Point weights for [`ScoreConfig::tally`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Points per unit of treasure value.
    #[serde(default = "default_treasure_multiplier")]
    pub treasure_multiplier: f32,
    /// Awarded when every area is cleared within `max_days_for_bonus`.
    #[serde(default = "default_days_bonus")]
    pub days_bonus: f32,
    #[serde(default = "default_max_days_for_bonus")]
    pub max_days_for_bonus: u32,
    /// Deducted per player death.
    #[serde(default = "default_death_deduction")]
    pub death_deduction: f32,
}

fn default_treasure_multiplier() -> f32 {
    5.0
}

fn default_days_bonus() -> f32 {
    10_000.0
}

fn default_max_days_for_bonus() -> u32 {
    4
}

fn default_death_deduction() -> f32 {
    500.0
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            treasure_multiplier: default_treasure_multiplier(),
            days_bonus: default_days_bonus(),
            max_days_for_bonus: default_max_days_for_bonus(),
            death_deduction: default_death_deduction(),
        }
    }
}

/// A tallied score and the parts that made it up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Points from held treasure, multiplier applied.
    pub treasure: f32,
    pub days_bonus: bool,
    pub deaths: u32,
    /// Never negative.
    pub total: f32,
}

/// Sum of `amount * value` over the treasure stacks in `container`.
pub fn treasure_value(container: &Container) -> f32 {
    let catalog = container.catalog();
    container
        .stacks()
        .filter_map(|stack| {
            let item = catalog.get(stack.item)?;
            (item.category == ItemCategory::Treasure).then_some(stack.amount as f32 * item.value)
        })
        .sum()
}

impl ScoreConfig {
    /// Combine held treasure value, the days bonus and death deductions.
    pub fn tally(&self, treasure_value: f32, days_used: u32, areas_cleared: bool, deaths: u32) -> Score {
        let treasure = treasure_value * self.treasure_multiplier;
        let days_bonus = areas_cleared && days_used <= self.max_days_for_bonus;

        let mut total = treasure;
        if days_bonus {
            total += self.days_bonus;
        }
        total -= deaths as f32 * self.death_deduction;

        Score {
            treasure,
            days_bonus,
            deaths,
            total: total.max(0.0),
        }
    }
}
