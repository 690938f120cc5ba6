//! Change-making policy for payments that do not decompose exactly.
//!
//! When the greedy payment leaves a residual, one currency unit still held
//! is broken (removed) and one unit is handed back as change. Which unit is
//! broken and what comes back are both configurable.

use item_rules::{ItemCatalog, ItemId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::{InventoryError, InventoryResult};

/// Which held unit is broken to cover a residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSource {
    /// The most valuable currency unit the buyer still holds.
    #[default]
    HighestHeld,
    /// A specific currency; falls back to `HighestHeld` when none is held
    /// or the id is not a currency.
    Specific(ItemId),
}

/// Candidates for the unit returned as change. One is picked uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePool {
    /// Every catalog currency strictly cheaper than the broken unit.
    #[default]
    LowerDenominations,
    /// Listed currencies; non-currency ids are skipped.
    Specific(Vec<ItemId>),
}

/// Change-making rule. An empty candidate pool returns the broken unit's own kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangePolicy {
    #[serde(default)]
    pub source: ChangeSource,
    #[serde(default)]
    pub pool: ChangePool,
}

impl ChangePolicy {
    /// Reject ids the catalog does not spend as currency.
    pub fn validate(&self, catalog: &ItemCatalog) -> InventoryResult<()> {
        let pool: &[ItemId] = match &self.pool {
            ChangePool::Specific(ids) => ids,
            ChangePool::LowerDenominations => &[],
        };
        let source = match self.source {
            ChangeSource::Specific(id) => Some(id),
            ChangeSource::HighestHeld => None,
        };

        match source
            .iter()
            .chain(pool)
            .find(|id| !catalog.category_of(**id).is_currency())
        {
            Some(&item) => Err(InventoryError::NotCurrency { item }),
            None => Ok(()),
        }
    }

    /// Pick the slot whose unit gets broken, or `None` if no currency is held.
    pub fn select_source(&self, buyer: &Container) -> Option<usize> {
        let catalog = buyer.catalog();

        if let ChangeSource::Specific(id) = self.source {
            if catalog.category_of(id).is_currency() {
                if let Some(index) = buyer.find_index_of(id, 0) {
                    return Some(index);
                }
            }
        }

        let mut best: Option<(usize, f32)> = None;
        for slot in buyer.slots() {
            let Some(stack) = slot.stack() else { continue };
            let Some(item) = catalog.get(stack.item) else { continue };
            if !item.category.is_currency() {
                continue;
            }
            if best.map_or(true, |(_, value)| item.value > value) {
                best = Some((slot.index, item.value));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Choose the unit handed back after breaking one unit of `broken`.
    pub fn select_change<R: Rng + ?Sized>(
        &self,
        catalog: &ItemCatalog,
        broken: ItemId,
        rng: &mut R,
    ) -> ItemId {
        let candidates: Vec<ItemId> = match &self.pool {
            ChangePool::LowerDenominations => {
                let broken_value = catalog.lookup(broken).value;
                catalog
                    .currencies()
                    .into_iter()
                    .filter(|item| item.value < broken_value)
                    .map(|item| item.id)
                    .collect()
            }
            ChangePool::Specific(ids) => ids
                .iter()
                .copied()
                .filter(|id| catalog.category_of(*id).is_currency())
                .collect(),
        };

        if candidates.is_empty() {
            return broken;
        }
        candidates[rng.gen_range(0..candidates.len())]
    }
}
