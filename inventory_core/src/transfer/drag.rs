//! Drag gesture state machine: Idle -> Dragging -> Idle.

use serde::{Deserialize, Serialize};

use super::{discard, transfer, DropTarget, TransferOutcome};
use crate::container::{SlotRef, Stack};
use crate::error::{InventoryError, InventoryResult};
use crate::registry::ContainerRegistry;

/// Pointer position in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where the drag gesture currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: SlotRef,
        /// The stack as it was when the gesture began.
        picked: Stack,
        position: PointerPosition,
    },
}

/// Tracks one pointer's drag gesture over inventory slots.
///
/// The controller never mutates slots while dragging; the stack stays in its
/// origin slot until the gesture ends, so an abandoned drag needs no undo.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The slot being dragged from, if any.
    pub fn origin(&self) -> Option<SlotRef> {
        match &self.state {
            DragState::Dragging { origin, .. } => Some(*origin),
            DragState::Idle => None,
        }
    }

    /// Start dragging the stack in `origin`. The slot must not be empty.
    pub fn begin_drag(
        &mut self,
        registry: &ContainerRegistry,
        origin: SlotRef,
        position: PointerPosition,
    ) -> InventoryResult<()> {
        if self.is_dragging() {
            return Err(InventoryError::AlreadyDragging);
        }
        let picked = registry
            .slot(origin)?
            .stack()
            .cloned()
            .ok_or(InventoryError::EmptySlot { slot: origin })?;

        self.state = DragState::Dragging {
            origin,
            picked,
            position,
        };
        Ok(())
    }

    /// Follow the pointer.
    pub fn drag_move(&mut self, position: PointerPosition) -> InventoryResult<()> {
        match &mut self.state {
            DragState::Dragging { position: current, .. } => {
                *current = position;
                Ok(())
            }
            DragState::Idle => Err(InventoryError::NotDragging),
        }
    }

    /// Release the stack over `target`. Always returns the controller to idle.
    ///
    /// If the origin slot no longer holds the stack that was picked up, the
    /// drop is aborted and nothing moves.
    pub fn end_drag(
        &mut self,
        registry: &mut ContainerRegistry,
        target: DropTarget,
    ) -> InventoryResult<TransferOutcome> {
        let (origin, picked) = match std::mem::take(&mut self.state) {
            DragState::Dragging { origin, picked, .. } => (origin, picked),
            DragState::Idle => return Err(InventoryError::NotDragging),
        };

        if registry.slot(origin)?.stack() != Some(&picked) {
            tracing::debug!(?origin, item = %picked.item, "dragged stack changed, drop aborted");
            return Ok(TransferOutcome::Aborted(InventoryError::DragInvalidated {
                slot: origin,
            }));
        }

        match target {
            DropTarget::Slot(slot) => transfer(registry, origin, slot),
            DropTarget::Discard => discard(registry, origin),
            DropTarget::Nothing => Ok(TransferOutcome::Unchanged),
        }
    }

    /// Abandon the gesture. The stack never left its slot.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, ContainerId};
    use item_rules::{standard_ids::*, ItemCatalog, SpriteRegistry};
    use std::sync::Arc;

    fn setup() -> (ContainerRegistry, ContainerId) {
        let catalog = Arc::new(ItemCatalog::standard(&mut SpriteRegistry::new()));
        let mut registry = ContainerRegistry::new(catalog.clone());
        let mut backpack = Container::backpack(catalog, 4);
        backpack.add_item(DAGGER, 1, false).unwrap();
        let id = registry.insert(backpack);
        (registry, id)
    }

    #[test]
    fn test_full_gesture() {
        let (mut registry, bag) = setup();
        let mut drag = DragController::new();

        drag.begin_drag(&registry, SlotRef::new(bag, 0), PointerPosition::new(10.0, 10.0))
            .unwrap();
        drag.drag_move(PointerPosition::new(40.0, 12.0)).unwrap();
        assert!(matches!(
            drag.state(),
            DragState::Dragging { position, picked, .. }
                if position.x == 40.0 && picked.item == DAGGER
        ));

        let outcome = drag
            .end_drag(&mut registry, DropTarget::Slot(SlotRef::new(bag, 2)))
            .unwrap();

        assert_eq!(outcome, TransferOutcome::Moved);
        assert!(!drag.is_dragging());
        assert_eq!(registry.slot(SlotRef::new(bag, 2)).unwrap().item_id(), DAGGER);
    }

    #[test]
    fn test_cannot_drag_empty_slot() {
        let (registry, bag) = setup();
        let mut drag = DragController::new();
        let result = drag.begin_drag(&registry, SlotRef::new(bag, 3), PointerPosition::default());

        assert!(matches!(result, Err(InventoryError::EmptySlot { .. })));
        assert_eq!(drag.state(), &DragState::Idle);
    }

    #[test]
    fn test_double_begin_rejected() {
        let (registry, bag) = setup();
        let mut drag = DragController::new();
        let origin = SlotRef::new(bag, 0);

        drag.begin_drag(&registry, origin, PointerPosition::default()).unwrap();
        assert_eq!(
            drag.begin_drag(&registry, origin, PointerPosition::default()),
            Err(InventoryError::AlreadyDragging)
        );
    }

    #[test]
    fn test_release_over_nothing() {
        let (mut registry, bag) = setup();
        let mut drag = DragController::new();
        drag.begin_drag(&registry, SlotRef::new(bag, 0), PointerPosition::default())
            .unwrap();

        let outcome = drag.end_drag(&mut registry, DropTarget::Nothing).unwrap();

        assert_eq!(outcome, TransferOutcome::Unchanged);
        assert_eq!(registry.slot(SlotRef::new(bag, 0)).unwrap().item_id(), DAGGER);
    }

    #[test]
    fn test_discard_target() {
        let (mut registry, bag) = setup();
        let mut drag = DragController::new();
        drag.begin_drag(&registry, SlotRef::new(bag, 0), PointerPosition::default())
            .unwrap();

        let outcome = drag.end_drag(&mut registry, DropTarget::Discard).unwrap();

        assert!(matches!(outcome, TransferOutcome::Discarded(_)));
        assert_eq!(registry.container(bag).unwrap().empty_slot_count(), 4);
    }

    #[test]
    fn test_idle_operations_fail() {
        let (mut registry, _) = setup();
        let mut drag = DragController::new();

        assert_eq!(
            drag.drag_move(PointerPosition::default()),
            Err(InventoryError::NotDragging)
        );
        assert_eq!(
            drag.end_drag(&mut registry, DropTarget::Nothing),
            Err(InventoryError::NotDragging)
        );
    }

    #[test]
    fn test_drop_aborts_when_origin_changed_mid_drag() {
        let (mut registry, bag) = setup();
        let origin = SlotRef::new(bag, 0);
        let mut drag = DragController::new();
        drag.begin_drag(&registry, origin, PointerPosition::default())
            .unwrap();

        // The dagger is spent elsewhere and a sword lands in its place.
        let container = registry.container_mut(bag).unwrap();
        container.clear_slot(0).unwrap();
        container.add_item(SWORD, 1, false).unwrap();

        let outcome = drag
            .end_drag(&mut registry, DropTarget::Slot(SlotRef::new(bag, 3)))
            .unwrap();

        assert_eq!(
            outcome,
            TransferOutcome::Aborted(InventoryError::DragInvalidated { slot: origin })
        );
        assert!(!drag.is_dragging());
        assert_eq!(registry.slot(origin).unwrap().item_id(), SWORD);
        assert!(registry.slot(SlotRef::new(bag, 3)).unwrap().is_empty());
    }

    #[test]
    fn test_drop_aborts_when_origin_emptied_mid_drag() {
        let (mut registry, bag) = setup();
        let mut drag = DragController::new();
        drag.begin_drag(&registry, SlotRef::new(bag, 0), PointerPosition::default())
            .unwrap();
        registry.container_mut(bag).unwrap().clear_slot(0).unwrap();

        let outcome = drag.end_drag(&mut registry, DropTarget::Discard).unwrap();

        assert!(matches!(
            outcome,
            TransferOutcome::Aborted(InventoryError::DragInvalidated { .. })
        ));
        assert_eq!(registry.container(bag).unwrap().empty_slot_count(), 4);
    }

    #[test]
    fn test_cancel() {
        let (registry, bag) = setup();
        let mut drag = DragController::new();
        drag.begin_drag(&registry, SlotRef::new(bag, 0), PointerPosition::default())
            .unwrap();
        drag.cancel();
        assert_eq!(drag.origin(), None);
    }
}
