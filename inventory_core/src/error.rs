//! Inventory errors.
//!
//! Every failure here is local and recoverable: the operation that raised it
//! left the inventory unchanged and the player may simply try again.

use item_rules::{ItemCategory, ItemId};
use thiserror::Error;

use crate::container::{ContainerId, SlotRef};

/// Errors raised by inventory, transfer, and trade operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// The container holds no stack of this item.
    #[error("No stack of item {item} in this container")]
    NotFound { item: ItemId },

    /// The catalog has no definition for this id.
    #[error("Item {item} is not in the catalog")]
    UnknownItem { item: ItemId },

    /// A slot restriction rejected the item's category.
    #[error("Slot {slot} does not accept {category} items")]
    SlotIncompatible { slot: SlotRef, category: ItemCategory },

    /// The buyer lacks the free slots a trade needs.
    #[error("Trade needs {required} free slots, only {available} available")]
    InsufficientSpace { required: usize, available: usize },

    /// The buyer's currency is worth less than the price.
    #[error("Price {price} exceeds available funds {funds}")]
    InsufficientFunds { price: f32, funds: f32 },

    /// The amount is not a legal stack size, or a merge would overflow one.
    #[error("Stack amount {amount} exceeds the limit of {max}")]
    CapacityExceeded { amount: u32, max: u8 },

    /// Every eligible slot is occupied.
    #[error("No free slot for item {item}")]
    NoFreeSlot { item: ItemId },

    #[error("Slot index {index} out of range (container has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Container {container} does not exist")]
    ContainerMissing { container: ContainerId },

    #[error("Slot {slot} is empty")]
    EmptySlot { slot: SlotRef },

    #[error("No drag gesture in progress")]
    NotDragging,

    #[error("A drag gesture is already in progress")]
    AlreadyDragging,

    /// The dragged stack changed under the gesture before it was dropped.
    #[error("Stack in slot {slot} changed while it was being dragged")]
    DragInvalidated { slot: SlotRef },

    /// Change-making named an item that is not spent as currency.
    #[error("Item {item} is not a currency")]
    NotCurrency { item: ItemId },

    #[error("Shop has no listing at index {index}")]
    UnknownListing { index: usize },

    #[error("No chest at index {index}")]
    UnknownChest { index: usize },
}

impl InventoryError {
    /// Text suitable for the on-screen notification line.
    pub fn user_message(&self) -> String {
        match self {
            InventoryError::InsufficientSpace { required, .. } => format!(
                "Please have at least {} slots free in your backpack before initiating trade.",
                count_word(*required)
            ),
            InventoryError::InsufficientFunds { .. } => "Not enough treasure in backpack!".to_string(),
            InventoryError::NoFreeSlot { .. } => "Your backpack is full!".to_string(),
            other => other.to_string(),
        }
    }
}

fn count_word(n: usize) -> String {
    match n {
        2 => "two".to_string(),
        n => n.to_string(),
    }
}

/// Result alias for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;
