//! Drag-Transfer - moving, merging, and swapping stacks between slots.
//!
//! Dropping a dragged stack onto a slot resolves as follows:
//! 1. **Target restriction**: the target must admit the dragged category
//! 2. **Reverse restriction**: a restricted origin must admit whatever the
//!    target holds, since that may be swapped back into it
//! 3. **Move**: an empty target simply receives the stack
//! 4. **Merge**: same stackable item tops the target up to `MAX_STACK`
//! 5. **Swap**: anything else exchanges the two stacks
//!
//! Every check runs before the first write, so an aborted transfer leaves
//! both slots exactly as they were.

mod drag;

pub use drag::*;

use item_rules::{ItemCategory, MAX_STACK};
use serde::{Deserialize, Serialize};

use crate::container::{Stack, SlotRef};
use crate::error::{InventoryError, InventoryResult};
use crate::registry::ContainerRegistry;

/// What a finished transfer did.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// The stack moved into an empty slot.
    Moved,
    /// Units moved onto an existing stack of the same item.
    Merged {
        transferred: u8,
        /// The origin ran dry and was cleared.
        origin_emptied: bool,
    },
    /// The two stacks traded places.
    Swapped,
    /// The stack was dropped on the discard target and destroyed.
    Discarded(Stack),
    /// Nothing to do (dropped onto itself, or onto nothing).
    Unchanged,
    /// A restriction check failed; no slot was touched.
    Aborted(InventoryError),
}

impl TransferOutcome {
    /// Check if any slot changed.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, TransferOutcome::Unchanged | TransferOutcome::Aborted(_))
    }
}

/// Where a drag gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    Slot(SlotRef),
    /// The trash slot: destroys whatever is dropped on it.
    Discard,
    /// Released over nothing; the stack returns home.
    Nothing,
}

/// Resolve a drop of the stack at `origin` onto `target`.
pub fn transfer(
    registry: &mut ContainerRegistry,
    origin: SlotRef,
    target: SlotRef,
) -> InventoryResult<TransferOutcome> {
    let origin_slot = registry.slot(origin)?;
    let dragged = origin_slot
        .stack()
        .cloned()
        .ok_or(InventoryError::EmptySlot { slot: origin })?;
    let origin_allowed = origin_slot.allowed_category;

    let target_slot = registry.slot(target)?;
    let target_allowed = target_slot.allowed_category;
    let occupant = target_slot.stack().cloned();

    if origin == target {
        return Ok(TransferOutcome::Unchanged);
    }

    let catalog = registry.catalog();
    let dragged_item = catalog.lookup(dragged.item);

    if !target_allowed.accepts(dragged_item.category) {
        tracing::warn!(%origin, %target, category = %dragged_item.category, "target slot rejects item");
        return Ok(TransferOutcome::Aborted(InventoryError::SlotIncompatible {
            slot: target,
            category: dragged_item.category,
        }));
    }

    if let Some(occupant) = &occupant {
        let occupant_category = catalog.category_of(occupant.item);
        if origin_allowed != ItemCategory::Undefined && !origin_allowed.accepts(occupant_category) {
            tracing::warn!(%origin, %target, category = %occupant_category, "origin slot rejects swapped item");
            return Ok(TransferOutcome::Aborted(InventoryError::SlotIncompatible {
                slot: origin,
                category: occupant_category,
            }));
        }
    }

    let outcome = match occupant {
        None => {
            move_stack(registry, origin, target)?;
            tracing::debug!(%origin, %target, "stack moved");
            TransferOutcome::Moved
        }
        Some(occupant) if occupant.item == dragged.item && dragged_item.stackable => {
            let combined = occupant.amount as u32 + dragged.amount as u32;
            if combined <= MAX_STACK as u32 {
                registry.container_mut(origin.container)?.take_stack(origin.index);
                registry
                    .container_mut(target.container)?
                    .set_amount(target.index, combined as u8);
                tracing::debug!(%origin, %target, amount = combined, "stacks merged");
                TransferOutcome::Merged {
                    transferred: dragged.amount,
                    origin_emptied: true,
                }
            } else {
                let moved = occupant.headroom();
                if moved > 0 {
                    registry
                        .container_mut(target.container)?
                        .set_amount(target.index, MAX_STACK);
                    registry
                        .container_mut(origin.container)?
                        .set_amount(origin.index, dragged.amount - moved);
                }
                tracing::debug!(%origin, %target, moved, "stacks topped up");
                TransferOutcome::Merged {
                    transferred: moved,
                    origin_emptied: false,
                }
            }
        }
        Some(_) => {
            swap_stacks(registry, origin, target)?;
            tracing::debug!(%origin, %target, "stacks swapped");
            TransferOutcome::Swapped
        }
    };

    Ok(outcome)
}

/// Destroy the stack at `origin`, ignoring any restriction.
pub fn discard(registry: &mut ContainerRegistry, origin: SlotRef) -> InventoryResult<TransferOutcome> {
    let stack = registry
        .container_mut(origin.container)?
        .clear_slot(origin.index)?
        .ok_or(InventoryError::EmptySlot { slot: origin })?;
    tracing::debug!(%origin, item = %stack.item, amount = stack.amount, "stack discarded");
    Ok(TransferOutcome::Discarded(stack))
}

fn move_stack(registry: &mut ContainerRegistry, from: SlotRef, to: SlotRef) -> InventoryResult<()> {
    let stack = registry
        .container_mut(from.container)?
        .take_stack(from.index)
        .ok_or(InventoryError::EmptySlot { slot: from })?;
    registry.container_mut(to.container)?.put_stack(to.index, stack);
    Ok(())
}

fn swap_stacks(registry: &mut ContainerRegistry, a: SlotRef, b: SlotRef) -> InventoryResult<()> {
    let first = registry
        .container_mut(a.container)?
        .take_stack(a.index)
        .ok_or(InventoryError::EmptySlot { slot: a })?;
    let second = registry
        .container_mut(b.container)?
        .take_stack(b.index)
        .ok_or(InventoryError::EmptySlot { slot: b })?;

    registry.container_mut(b.container)?.put_stack(b.index, first);
    registry.container_mut(a.container)?.put_stack(a.index, second);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerId};
    use item_rules::{standard_ids::*, ItemCatalog, ItemId, SpriteRegistry};
    use std::sync::Arc;

    struct Fixture {
        registry: ContainerRegistry,
        backpack: ContainerId,
        equipment: ContainerId,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(ItemCatalog::standard(&mut SpriteRegistry::new()));
        let mut registry = ContainerRegistry::new(catalog.clone());
        let backpack = registry.insert(Container::backpack(catalog.clone(), 6));
        let equipment = registry.insert(Container::equipment(catalog));
        Fixture {
            registry,
            backpack,
            equipment,
        }
    }

    impl Fixture {
        fn add(&mut self, container: ContainerId, item: ItemId, amount: u8) -> SlotRef {
            let c = self.registry.get_mut(container).unwrap();
            let index = c.add_item(item, amount, false).unwrap();
            SlotRef::new(container, index)
        }

        fn bag(&self, index: usize) -> SlotRef {
            SlotRef::new(self.backpack, index)
        }

        fn gear(&self, index: usize) -> SlotRef {
            SlotRef::new(self.equipment, index)
        }

        fn held(&self, slot: SlotRef) -> (ItemId, u8) {
            let slot = self.registry.slot(slot).unwrap();
            (slot.item_id(), slot.amount())
        }
    }

    #[test]
    fn test_move_to_empty_slot() {
        let mut f = fixture();
        let origin = f.add(f.backpack, RUBY, 4);

        let target = f.bag(3);
        let outcome = transfer(&mut f.registry, origin, target).unwrap();

        assert_eq!(outcome, TransferOutcome::Moved);
        assert_eq!(f.held(f.bag(0)), (ItemId::UNDEFINED, 0));
        assert_eq!(f.held(f.bag(3)), (RUBY, 4));
        let stack = f.registry.slot(f.bag(3)).unwrap().stack().unwrap();
        assert_eq!(stack.owner, f.bag(3));
    }

    #[test]
    fn test_move_into_matching_equipment_slot() {
        let mut f = fixture();
        let origin = f.add(f.backpack, METAL_HELMET, 1);

        let target = f.gear(1);
        let outcome = transfer(&mut f.registry, origin, target).unwrap();

        assert_eq!(outcome, TransferOutcome::Moved);
        assert_eq!(f.held(f.gear(1)), (METAL_HELMET, 1));
        let stack = f.registry.slot(f.gear(1)).unwrap().stack().unwrap();
        assert_eq!(stack.owner.container, f.equipment);
    }

    #[test]
    fn test_target_restriction_aborts() {
        let mut f = fixture();
        let origin = f.add(f.backpack, DIAMOND, 2);
        let before = f.registry.container(f.backpack).unwrap().slots().to_vec();

        let target = f.gear(0);
        let outcome = transfer(&mut f.registry, origin, target).unwrap();

        assert!(matches!(
            outcome,
            TransferOutcome::Aborted(InventoryError::SlotIncompatible { .. })
        ));
        assert_eq!(f.registry.container(f.backpack).unwrap().slots(), &before[..]);
        assert!(f.registry.slot(f.gear(0)).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_restriction_aborts() {
        let mut f = fixture();
        let sword = f.add(f.equipment, SWORD, 1);
        let diamond = f.add(f.backpack, DIAMOND, 1);
        // Dragging the sword onto the diamond would put a diamond in the weapon slot.
        let gear_before = f.registry.container(f.equipment).unwrap().slots().to_vec();
        let bag_before = f.registry.container(f.backpack).unwrap().slots().to_vec();

        let outcome = transfer(&mut f.registry, sword, diamond).unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::Aborted(InventoryError::SlotIncompatible {
                slot: sword,
                category: ItemCategory::Treasure,
            })
        );
        assert_eq!(f.registry.container(f.equipment).unwrap().slots(), &gear_before[..]);
        assert_eq!(f.registry.container(f.backpack).unwrap().slots(), &bag_before[..]);
    }

    #[test]
    fn test_equipment_swap_with_compatible_item() {
        let mut f = fixture();
        let worn = f.add(f.equipment, DAGGER, 1);
        let spare = f.add(f.backpack, SWORD, 1);

        let outcome = transfer(&mut f.registry, worn, spare).unwrap();

        assert_eq!(outcome, TransferOutcome::Swapped);
        assert_eq!(f.held(f.gear(0)), (SWORD, 1));
        assert_eq!(f.held(spare), (DAGGER, 1));
    }

    #[test]
    fn test_merge_within_limit() {
        let mut f = fixture();
        let origin = f.add(f.backpack, RUBY, 3);
        let target = f.add(f.backpack, RUBY, 4);

        let outcome = transfer(&mut f.registry, origin, target).unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::Merged {
                transferred: 3,
                origin_emptied: true
            }
        );
        assert_eq!(f.held(origin), (ItemId::UNDEFINED, 0));
        assert_eq!(f.held(target), (RUBY, 7));
    }

    #[test]
    fn test_merge_over_limit_keeps_excess_in_origin() {
        let mut f = fixture();
        let origin = f.add(f.backpack, RUBY, 6);
        let target = f.add(f.backpack, RUBY, 5);

        let outcome = transfer(&mut f.registry, origin, target).unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::Merged {
                transferred: 4,
                origin_emptied: false
            }
        );
        assert_eq!(f.held(target), (RUBY, 9));
        assert_eq!(f.held(origin), (RUBY, 2));
    }

    #[test]
    fn test_merge_onto_full_stack_moves_nothing() {
        let mut f = fixture();
        let origin = f.add(f.backpack, RUBY, 3);
        let target = f.add(f.backpack, RUBY, 9);

        let outcome = transfer(&mut f.registry, origin, target).unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::Merged {
                transferred: 0,
                origin_emptied: false
            }
        );
        assert_eq!(f.held(origin), (RUBY, 3));
        assert_eq!(f.held(target), (RUBY, 9));
    }

    #[test]
    fn test_unstackable_same_item_swaps() {
        let mut f = fixture();
        let a = f.add(f.backpack, SWORD, 1);
        let b = f.add(f.backpack, SWORD, 1);

        assert_eq!(transfer(&mut f.registry, a, b).unwrap(), TransferOutcome::Swapped);
        assert_eq!(f.held(a), (SWORD, 1));
        assert_eq!(f.held(b), (SWORD, 1));
    }

    #[test]
    fn test_swap_different_items() {
        let mut f = fixture();
        let a = f.add(f.backpack, DAGGER, 1);
        let b = f.add(f.backpack, SWORD, 1);

        let outcome = transfer(&mut f.registry, a, b).unwrap();

        assert_eq!(outcome, TransferOutcome::Swapped);
        assert_eq!(f.held(a), (SWORD, 1));
        assert_eq!(f.held(b), (DAGGER, 1));
        let a_stack = f.registry.slot(a).unwrap().stack().unwrap();
        assert_eq!(a_stack.owner, a);
    }

    #[test]
    fn test_drop_onto_itself() {
        let mut f = fixture();
        let a = f.add(f.backpack, RUBY, 2);
        assert_eq!(transfer(&mut f.registry, a, a).unwrap(), TransferOutcome::Unchanged);
        assert_eq!(f.held(a), (RUBY, 2));
    }

    #[test]
    fn test_empty_origin_is_an_error() {
        let mut f = fixture();
        let (origin, target) = (f.bag(0), f.bag(1));
        let result = transfer(&mut f.registry, origin, target);
        assert!(matches!(result, Err(InventoryError::EmptySlot { .. })));
    }

    #[test]
    fn test_discard_ignores_restrictions() {
        let mut f = fixture();
        let boots = f.add(f.equipment, METAL_BOOTS, 1);

        let outcome = discard(&mut f.registry, boots).unwrap();

        assert!(matches!(outcome, TransferOutcome::Discarded(ref s) if s.item == METAL_BOOTS));
        assert!(f.registry.slot(boots).unwrap().is_empty());
    }
}
