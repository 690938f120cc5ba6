//! Game mechanics: stack limits and equipment stat totals.

use serde::{Deserialize, Serialize};

use crate::items::{ItemCategory, ItemDefinition};

/// Largest amount a single stack may hold. Larger quantities must split.
pub const MAX_STACK: u8 = 9;

/// Player walking speed before equipment modifiers.
pub const DEFAULT_BASE_SPEED: f32 = 8.0;

/// Check if `amount` is a legal stack size.
pub fn is_valid_amount(amount: u8) -> bool {
    (1..=MAX_STACK).contains(&amount)
}

/// Combat and movement numbers derived from what the player wears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentStats {
    /// Base speed plus every equipped speed modifier.
    pub speed: f32,
    /// Damage of the equipped weapon, 0 when unarmed.
    pub damage: f32,
    /// Sum of protection over every equipped piece.
    pub protection: f32,
}

impl Default for EquipmentStats {
    fn default() -> Self {
        Self {
            speed: DEFAULT_BASE_SPEED,
            damage: 0.0,
            protection: 0.0,
        }
    }
}

impl EquipmentStats {
    /// Total up a loadout.
    ///
    /// Only the first weapon contributes damage; every item contributes speed
    /// and protection.
    pub fn from_loadout<'a>(
        base_speed: f32,
        items: impl IntoIterator<Item = &'a ItemDefinition>,
    ) -> Self {
        let mut stats = Self {
            speed: base_speed,
            damage: 0.0,
            protection: 0.0,
        };
        let mut armed = false;

        for item in items {
            stats.speed += item.speed_modifier;
            stats.protection += item.protection;
            if !armed && item.category == ItemCategory::Weapon {
                stats.damage = item.damage;
                armed = true;
            }
        }

        stats
    }

    /// Damage left after protection absorbs part of a hit. Never negative.
    pub fn mitigate(&self, incoming: f32) -> f32 {
        (incoming - self.protection).max(0.0)
    }
}
