//! Container registry - owns every live container and the shared catalog.

use std::collections::HashMap;
use std::sync::Arc;

use item_rules::ItemCatalog;

use crate::container::{Container, ContainerId, ContainerKind, Slot, SlotRef};
use crate::error::{InventoryError, InventoryResult};

/// All containers of a session, addressed by id.
///
/// Cross-container operations (drag-transfer between backpack and chest,
/// for instance) go through a single `&mut ContainerRegistry`, so a
/// multi-step mutation is never observed half-done.
#[derive(Debug)]
pub struct ContainerRegistry {
    catalog: Arc<ItemCatalog>,
    containers: HashMap<ContainerId, Container>,
}

impl ContainerRegistry {
    /// Create an empty registry sharing `catalog`.
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            catalog,
            containers: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Register a container, returning its id.
    pub fn insert(&mut self, container: Container) -> ContainerId {
        let id = container.id();
        self.containers.insert(id, container);
        id
    }

    /// Tear a container down.
    pub fn remove(&mut self, id: ContainerId) -> Option<Container> {
        self.containers.remove(&id)
    }

    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(&id)
    }

    /// Get a container, or `ContainerMissing`.
    pub fn container(&self, id: ContainerId) -> InventoryResult<&Container> {
        self.get(id)
            .ok_or(InventoryError::ContainerMissing { container: id })
    }

    /// Get a container mutably, or `ContainerMissing`.
    pub fn container_mut(&mut self, id: ContainerId) -> InventoryResult<&mut Container> {
        self.get_mut(id)
            .ok_or(InventoryError::ContainerMissing { container: id })
    }

    /// Resolve a slot address.
    pub fn slot(&self, slot: SlotRef) -> InventoryResult<&Slot> {
        self.container(slot.container)?.slot(slot.index)
    }

    /// Ids of every container of `kind`.
    pub fn ids_of_kind(&self, kind: ContainerKind) -> Vec<ContainerId> {
        self.containers
            .values()
            .filter(|c| c.kind() == kind)
            .map(|c| c.id())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}
