//! Shop listings - what the exchange offers.

use item_rules::{IconRef, ItemCatalog, ItemDefinition, ItemId};
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};

/// How a listing entry is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBinding {
    pub slot_name: String,
    pub icon: IconRef,
}

/// One item for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopEntry {
    pub item: ItemDefinition,
    pub binding: DisplayBinding,
}

impl ShopEntry {
    /// Price in currency units.
    pub fn price(&self) -> f32 {
        self.item.value
    }

    /// Hover text for the entry.
    pub fn tooltip(&self) -> String {
        self.item.shop_tooltip()
    }
}

/// Ordered, static list of items for sale. Built once per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopListing {
    entries: Vec<ShopEntry>,
}

impl ShopListing {
    /// Build a listing from catalog ids, in the given order.
    pub fn from_ids(catalog: &ItemCatalog, ids: &[ItemId]) -> InventoryResult<Self> {
        let entries = ids
            .iter()
            .enumerate()
            .map(|(position, &id)| {
                let item = catalog
                    .get(id)
                    .cloned()
                    .ok_or(InventoryError::UnknownItem { item: id })?;
                Ok(ShopEntry {
                    binding: DisplayBinding {
                        slot_name: format!("Shop Item Slot {}", position),
                        icon: item.icon,
                    },
                    item,
                })
            })
            .collect::<InventoryResult<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn get(&self, index: usize) -> Option<&ShopEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ShopEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_rules::{standard_ids::*, SpriteRegistry};

    #[test]
    fn test_listing_order_and_bindings() {
        let mut sprites = SpriteRegistry::new();
        let catalog = ItemCatalog::standard(&mut sprites);
        let listing = ShopListing::from_ids(&catalog, &[SWORD, MAGIC_SPEED_BOOTS]).unwrap();

        assert_eq!(listing.len(), 2);
        let boots = listing.get(1).unwrap();
        assert_eq!(boots.item.name, "Magic Speed Boots");
        assert_eq!(boots.price(), 50.0);
        assert_eq!(boots.binding.slot_name, "Shop Item Slot 1");
        assert_eq!(
            sprites.path_of(boots.binding.icon),
            Some("Sprites/Armor/icon_LEATHER_boots1")
        );
        assert!(boots.tooltip().ends_with("Value: 50"));
    }

    #[test]
    fn test_unknown_id_rejected() {
        let catalog = ItemCatalog::standard(&mut SpriteRegistry::new());
        let result = ShopListing::from_ids(&catalog, &[SWORD, ItemId(99)]);
        assert_eq!(result, Err(InventoryError::UnknownItem { item: ItemId(99) }));
    }
}
