//! Inventory containers: backpack, equipment loadout, and chest storage.
//!
//! A container is a fixed-size, ordered run of slots. Its slot count is set
//! at construction and never changes; only slot contents do. Each slot's
//! `stack` field is the only record of what the slot holds.

mod slot;
mod view;

pub use slot::*;
pub use view::*;

use std::sync::Arc;

use item_rules::{
    is_valid_amount, EquipmentStats, ItemCatalog, ItemCategory, ItemDefinition, ItemId,
    EQUIPMENT_ORDER, MAX_STACK,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};

/// Unique identifier for containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub Uuid);

impl ContainerId {
    /// Create a new random container ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil container ID (useful for detached stacks in tests).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of one slot in one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub container: ContainerId,
    pub index: usize,
}

impl SlotRef {
    pub fn new(container: ContainerId, index: usize) -> Self {
        Self { container, index }
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.container, self.index)
    }
}

/// What a container is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    Backpack,
    /// Five slots, one per equipped category.
    Equipment,
    Chest,
}

/// A fixed-size ordered collection of slots.
pub struct Container {
    id: ContainerId,
    kind: ContainerKind,
    catalog: Arc<ItemCatalog>,
    slots: Vec<Slot>,
    view: Option<Arc<dyn SlotView>>,
}

impl Container {
    fn with_restrictions(
        kind: ContainerKind,
        catalog: Arc<ItemCatalog>,
        restrictions: impl IntoIterator<Item = ItemCategory>,
    ) -> Self {
        let slots = restrictions
            .into_iter()
            .enumerate()
            .map(|(index, category)| Slot::new(index, category))
            .collect();

        Self {
            id: ContainerId::new(),
            kind,
            catalog,
            slots,
            view: None,
        }
    }

    /// Create a player backpack with `slot_count` unrestricted slots.
    pub fn backpack(catalog: Arc<ItemCatalog>, slot_count: usize) -> Self {
        Self::with_restrictions(
            ContainerKind::Backpack,
            catalog,
            std::iter::repeat(ItemCategory::Undefined).take(slot_count),
        )
    }

    /// Create chest storage with `slot_count` unrestricted slots.
    pub fn chest(catalog: Arc<ItemCatalog>, slot_count: usize) -> Self {
        Self::with_restrictions(
            ContainerKind::Chest,
            catalog,
            std::iter::repeat(ItemCategory::Undefined).take(slot_count),
        )
    }

    /// Create the equipment loadout: Weapon, Helmet, Chestpiece, Leggings, Boots.
    pub fn equipment(catalog: Arc<ItemCatalog>) -> Self {
        Self::with_restrictions(ContainerKind::Equipment, catalog, EQUIPMENT_ORDER)
    }

    /// Attach a view that is told about every slot change.
    pub fn with_view(mut self, view: Arc<dyn SlotView>) -> Self {
        self.view = Some(view);
        self
    }

    /// Replace (or remove) the attached view.
    pub fn set_view(&mut self, view: Option<Arc<dyn SlotView>>) {
        self.view = view;
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// The catalog this container resolves items against.
    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Number of slots. Fixed for the container's lifetime.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the container was built with zero slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Get a slot by index.
    pub fn slot(&self, index: usize) -> InventoryResult<&Slot> {
        self.slots.get(index).ok_or(InventoryError::SlotOutOfRange {
            index,
            len: self.slots.len(),
        })
    }

    /// Address of the slot at `index` in this container.
    pub fn slot_ref(&self, index: usize) -> SlotRef {
        SlotRef::new(self.id, index)
    }

    /// Iterate over every stack held, in slot order.
    pub fn stacks(&self) -> impl Iterator<Item = &Stack> {
        self.slots.iter().filter_map(|slot| slot.stack.as_ref())
    }

    /// Add `amount` units of `id`.
    ///
    /// With `merge_with_existing` and a stackable item already present, the
    /// existing stack grows instead; a merge that would pass `MAX_STACK` is
    /// refused rather than split. Otherwise the first empty slot (in index
    /// order) whose restriction admits the item receives a new stack.
    ///
    /// Returns the index of the slot that changed.
    pub fn add_item(&mut self, id: ItemId, amount: u8, merge_with_existing: bool) -> InventoryResult<usize> {
        if !is_valid_amount(amount) {
            return Err(InventoryError::CapacityExceeded {
                amount: amount as u32,
                max: MAX_STACK,
            });
        }

        let (category, stackable) = match self.catalog.get(id) {
            Some(item) => (item.category, item.stackable),
            None => return Err(InventoryError::UnknownItem { item: id }),
        };

        if merge_with_existing && stackable {
            if let Some(index) = self.find_index_of(id, 0) {
                let current = self.slots[index].amount();
                let combined = current as u32 + amount as u32;
                if combined > MAX_STACK as u32 {
                    return Err(InventoryError::CapacityExceeded {
                        amount: combined,
                        max: MAX_STACK,
                    });
                }
                self.set_amount(index, combined as u8);
                tracing::debug!(item = %id, index, amount = combined, "merged into existing stack");
                return Ok(index);
            }
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.is_empty() && slot.accepts(category))
            .ok_or(InventoryError::NoFreeSlot { item: id })?;

        self.put_stack(index, Stack::new(id, amount, self.slot_ref(index)));
        tracing::debug!(item = %id, index, amount, "placed new stack");
        Ok(index)
    }

    /// Remove `amount` units from the first stack of `id`.
    ///
    /// Returns `true` when the stack ran out and the slot was cleared,
    /// `false` when units remain.
    pub fn remove_item(&mut self, id: ItemId, amount: u8) -> InventoryResult<bool> {
        let index = self
            .find_index_of(id, 0)
            .ok_or(InventoryError::NotFound { item: id })?;
        self.remove_at(index, amount)
    }

    /// Remove `amount` units from the stack in slot `index`.
    pub fn remove_at(&mut self, index: usize, amount: u8) -> InventoryResult<bool> {
        let current = self.slot(index)?.amount();
        if current == 0 {
            return Err(InventoryError::EmptySlot {
                slot: self.slot_ref(index),
            });
        }
        if amount == 0 {
            return Ok(false);
        }

        if amount >= current {
            self.take_stack(index);
            tracing::debug!(index, "stack removed");
            Ok(true)
        } else {
            self.set_amount(index, current - amount);
            tracing::debug!(index, remaining = current - amount, "stack reduced");
            Ok(false)
        }
    }

    /// Find the first slot holding `id`, scanning from `start` and wrapping.
    ///
    /// Each slot is visited exactly once.
    pub fn find_index_of(&self, id: ItemId, start: usize) -> Option<usize> {
        let len = self.slots.len();
        if len == 0 {
            return None;
        }
        let start = start % len;
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| self.slots[index].stack.as_ref().is_some_and(|s| s.item == id))
    }

    /// Count the slots holding nothing.
    pub fn empty_slot_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_empty()).count()
    }

    /// Check if any held item belongs to `category`.
    pub fn contains_category(&self, category: ItemCategory) -> bool {
        self.stacks()
            .any(|stack| self.catalog.category_of(stack.item) == category)
    }

    /// Total units of `id` across every slot.
    pub fn total_amount(&self, id: ItemId) -> u32 {
        self.stacks()
            .filter(|stack| stack.item == id)
            .map(|stack| stack.amount as u32)
            .sum()
    }

    /// Empty a slot unconditionally, returning what it held.
    pub fn clear_slot(&mut self, index: usize) -> InventoryResult<Option<Stack>> {
        self.slot(index)?;
        Ok(self.take_stack(index))
    }

    /// Definitions of every held item, in slot order.
    pub fn definitions(&self) -> Vec<ItemDefinition> {
        self.stacks()
            .map(|stack| self.catalog.lookup(stack.item))
            .collect()
    }

    /// Stat totals of whatever this container holds, read as a loadout.
    pub fn equipment_stats(&self, base_speed: f32) -> EquipmentStats {
        let items = self.definitions();
        EquipmentStats::from_loadout(base_speed, items.iter())
    }

    /// Remove the stack from a slot, notifying the view.
    pub(crate) fn take_stack(&mut self, index: usize) -> Option<Stack> {
        let stack = self.slots.get_mut(index)?.stack.take()?;
        self.emit(SlotEvent::StackCleared {
            slot: self.slot_ref(index),
        });
        Some(stack)
    }

    /// Place a stack into an empty slot, rebinding its owner.
    pub(crate) fn put_stack(&mut self, index: usize, mut stack: Stack) {
        stack.owner = self.slot_ref(index);
        let event = SlotEvent::StackCreated {
            slot: stack.owner,
            item: stack.item,
            amount: stack.amount,
        };
        if let Some(slot) = self.slots.get_mut(index) {
            slot.stack = Some(stack);
            self.emit(event);
        }
    }

    /// Overwrite the amount of an existing stack.
    pub(crate) fn set_amount(&mut self, index: usize, amount: u8) {
        if let Some(stack) = self.slots.get_mut(index).and_then(|slot| slot.stack.as_mut()) {
            stack.amount = amount;
            self.emit(SlotEvent::AmountChanged {
                slot: SlotRef::new(self.id, index),
                amount,
            });
        }
    }

    fn emit(&self, event: SlotEvent) {
        if let Some(view) = &self.view {
            view.notify(event);
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("slots", &self.slots)
            .field("has_view", &self.view.is_some())
            .finish()
    }
}
