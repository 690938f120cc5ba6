//! Slots and the stacks they hold.

use item_rules::{ItemCategory, ItemId, MAX_STACK};
use serde::{Deserialize, Serialize};

use super::SlotRef;

/// A quantity of identical items occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub item: ItemId,
    /// Always within `1..=MAX_STACK` while the stack exists.
    pub amount: u8,
    /// The slot this stack currently lives in.
    pub owner: SlotRef,
}

impl Stack {
    /// Create a stack bound to `owner`.
    pub fn new(item: ItemId, amount: u8, owner: SlotRef) -> Self {
        Self {
            item,
            amount,
            owner,
        }
    }

    /// Units this stack could still absorb.
    pub fn headroom(&self) -> u8 {
        MAX_STACK.saturating_sub(self.amount)
    }

    /// Amount label text. Single items show no number.
    pub fn label(&self) -> String {
        if self.amount < 2 {
            String::new()
        } else {
            self.amount.to_string()
        }
    }
}

/// One inventory cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Stable position within the owning container.
    pub index: usize,
    /// `Undefined` accepts anything.
    pub allowed_category: ItemCategory,
    pub(crate) stack: Option<Stack>,
}

impl Slot {
    /// Create an empty slot.
    pub fn new(index: usize, allowed_category: ItemCategory) -> Self {
        Self {
            index,
            allowed_category,
            stack: None,
        }
    }

    /// The stack held here, if any.
    pub fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    /// Check if the slot holds nothing.
    pub fn is_empty(&self) -> bool {
        self.stack.is_none()
    }

    /// Id of the held item, `ItemId::UNDEFINED` when empty.
    pub fn item_id(&self) -> ItemId {
        self.stack
            .as_ref()
            .map(|stack| stack.item)
            .unwrap_or(ItemId::UNDEFINED)
    }

    /// Amount held, 0 when empty.
    pub fn amount(&self) -> u8 {
        self.stack.as_ref().map(|stack| stack.amount).unwrap_or(0)
    }

    /// Check if the slot restriction admits `category`.
    pub fn accepts(&self, category: ItemCategory) -> bool {
        self.allowed_category.accepts(category)
    }

    /// Check if the slot carries a category restriction.
    pub fn is_restricted(&self) -> bool {
        self.allowed_category != ItemCategory::Undefined
    }
}
