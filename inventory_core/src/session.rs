//! The inventory session: every container, the shop and the chests of one
//! play-through, driven by an explicit `initialize` / `tick` loop.
//!
//! All operations take `&mut self` and run to completion. Trades are refused
//! while a drag gesture is open, and a drop whose origin changed under the
//! gesture is aborted.

use std::collections::HashSet;
use std::sync::Arc;

use item_rules::{EquipmentStats, ItemCatalog, ItemCategory};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::chest::{Chest, Presenter, SilentPresenter};
use crate::config::{ConfigError, InventoryConfig};
use crate::container::{Container, ContainerId, SlotRef};
use crate::error::{InventoryError, InventoryResult};
use crate::registry::ContainerRegistry;
use crate::schedule::{EntityId, Scheduler, TaskId};
use crate::score::{treasure_value, Score};
use crate::trade::{Exchange, TradeReceipt};
use crate::transfer::{DragController, DropTarget, PointerPosition, TransferOutcome};

/// Deferred work the session hands back from [`Session::tick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A dead entity's body should be removed.
    Despawn { entity: EntityId },
    /// An entity's post-hit recovery window is over.
    RecoveryEnded { entity: EntityId },
}

/// One play-through's inventory state.
pub struct Session {
    config: InventoryConfig,
    registry: ContainerRegistry,
    backpack: ContainerId,
    equipment: ContainerId,
    chests: Vec<Chest>,
    exchange: Exchange,
    drag: DragController,
    scheduler: Scheduler<SessionEvent>,
    presenter: Arc<dyn Presenter>,
    rng: StdRng,
    notifications: Vec<String>,
    current_area: Option<String>,
    cleared_areas: HashSet<String>,
}

impl Session {
    /// Build every container, chest and the shop from `config`.
    ///
    /// Chests are stocked and closed; nothing is presented yet.
    pub fn initialize(config: InventoryConfig, catalog: Arc<ItemCatalog>) -> Result<Self, ConfigError> {
        config.validate_against(&catalog)?;

        let mut registry = ContainerRegistry::new(catalog.clone());
        let backpack = registry.insert(Container::backpack(catalog.clone(), config.backpack_slots));
        let equipment = registry.insert(Container::equipment(catalog.clone()));

        let mut chests = Vec::with_capacity(config.chests.len());
        for chest_config in &config.chests {
            let mut container = Container::chest(catalog.clone(), chest_config.slots);
            Chest::stock(&mut container, &chest_config.items)?;
            let mut chest = Chest::new(registry.insert(container)).with_storage(chest_config.storage);
            if let Some(area) = &chest_config.area {
                chest = chest.with_area(area.clone());
            }
            chests.push(chest);
        }

        let exchange = Exchange::from_config(&catalog, &config.trade, config.double_click_threshold)?;

        tracing::info!(
            backpack_slots = config.backpack_slots,
            chests = chests.len(),
            shop_items = exchange.listing().len(),
            "inventory session initialized"
        );

        Ok(Self {
            config,
            registry,
            backpack,
            equipment,
            chests,
            exchange,
            drag: DragController::new(),
            scheduler: Scheduler::new(),
            presenter: Arc::new(SilentPresenter),
            rng: StdRng::from_entropy(),
            notifications: Vec::new(),
            current_area: None,
            cleared_areas: HashSet::new(),
        })
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Make change-making reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Advance the session clock by `dt` seconds.
    ///
    /// Returns the deferred events that came due, in due order.
    pub fn tick(&mut self, dt: f32) -> Vec<SessionEvent> {
        let due = self.scheduler.tick(dt);
        self.check_remaining_treasure();
        due
    }

    /// Seconds since initialization.
    pub fn elapsed(&self) -> f64 {
        self.scheduler.elapsed()
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// Direct access for gameplay code that adds or removes items.
    pub fn registry_mut(&mut self) -> &mut ContainerRegistry {
        &mut self.registry
    }

    pub fn backpack_id(&self) -> ContainerId {
        self.backpack
    }

    pub fn equipment_id(&self) -> ContainerId {
        self.equipment
    }

    pub fn backpack(&self) -> InventoryResult<&Container> {
        self.registry.container(self.backpack)
    }

    pub fn backpack_mut(&mut self) -> InventoryResult<&mut Container> {
        self.registry.container_mut(self.backpack)
    }

    pub fn equipment(&self) -> InventoryResult<&Container> {
        self.registry.container(self.equipment)
    }

    pub fn chests(&self) -> &[Chest] {
        &self.chests
    }

    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    pub fn drag_controller(&self) -> &DragController {
        &self.drag
    }

    // Drag and drop

    pub fn begin_drag(&mut self, origin: SlotRef, position: PointerPosition) -> InventoryResult<()> {
        self.drag.begin_drag(&self.registry, origin, position)
    }

    pub fn drag_move(&mut self, position: PointerPosition) -> InventoryResult<()> {
        self.drag.drag_move(position)
    }

    /// Finish the current drag over `target`.
    pub fn end_drag(&mut self, target: DropTarget) -> InventoryResult<TransferOutcome> {
        self.drag.end_drag(&mut self.registry, target)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // Trade

    /// Buy listing entry `index` into the backpack.
    ///
    /// Failures the player can fix (space, funds, an open drag) become
    /// notifications and yield `None`.
    pub fn buy(&mut self, index: usize) -> Option<TradeReceipt> {
        if let Err(err) = self.ensure_not_dragging() {
            return self.settle_trade(Err(err));
        }
        let result = match self.registry.container_mut(self.backpack) {
            Ok(backpack) => self.exchange.purchase_listing(index, backpack, &mut self.rng),
            Err(err) => Err(err),
        };
        self.settle_trade(result)
    }

    /// Register a click on listing entry `index`; a double click buys.
    pub fn click_listing(&mut self, index: usize) -> Option<TradeReceipt> {
        if let Err(err) = self.ensure_not_dragging() {
            return self.settle_trade(Err(err));
        }
        let now = self.elapsed() as f32;
        let result = match self.registry.container_mut(self.backpack) {
            Ok(backpack) => self.exchange.click(index, now, backpack, &mut self.rng),
            Err(err) => Err(err),
        };
        match result {
            Ok(Some(receipt)) => Some(receipt),
            Ok(None) => None,
            Err(err) => self.settle_trade(Err(err)),
        }
    }

    fn ensure_not_dragging(&self) -> InventoryResult<()> {
        match self.drag.origin() {
            Some(origin) => {
                tracing::debug!(?origin, "trade refused during drag");
                Err(InventoryError::AlreadyDragging)
            }
            None => Ok(()),
        }
    }

    fn settle_trade(&mut self, result: InventoryResult<TradeReceipt>) -> Option<TradeReceipt> {
        match result {
            Ok(receipt) => Some(receipt),
            Err(err) => {
                self.notify(err.user_message());
                None
            }
        }
    }

    // Chests

    /// Open or close chest `index`. Returns whether it is now open.
    pub fn toggle_chest(&mut self, index: usize) -> InventoryResult<bool> {
        let chest = self
            .chests
            .get_mut(index)
            .ok_or(InventoryError::UnknownChest { index })?;
        chest.toggle(self.presenter.as_ref());
        Ok(chest.is_open())
    }

    /// Set the map area the player stands in. `None` for no tracked area.
    pub fn set_current_area(&mut self, area: Option<String>) {
        self.current_area = area;
    }

    fn check_remaining_treasure(&mut self) {
        let Some(area) = self.current_area.clone() else {
            return;
        };

        let mut in_area = self
            .chests
            .iter()
            .filter(|chest| chest.area() == Some(area.as_str()))
            .peekable();
        if in_area.peek().is_none() {
            return;
        }

        let has_treasure = in_area.any(|chest| self.holds_treasure(chest));

        if has_treasure {
            self.cleared_areas.remove(&area);
        } else if self.cleared_areas.insert(area.clone()) {
            self.notify(format!("All available treasure in the {} was found.", area));
        }
    }

    fn holds_treasure(&self, chest: &Chest) -> bool {
        self.registry
            .get(chest.inventory())
            .is_some_and(|container| container.contains_category(ItemCategory::Treasure))
    }

    /// Whether no area chest holds treasure any more.
    pub fn all_areas_cleared(&self) -> bool {
        self.chests
            .iter()
            .filter(|chest| !chest.is_storage() && chest.area().is_some())
            .all(|chest| !self.holds_treasure(chest))
    }

    // Score

    /// Score the run: treasure in the backpack and storage chests, the
    /// cleared-areas bonus when `days_used` is within the limit, minus
    /// `deaths` deductions.
    pub fn score(&self, days_used: u32, deaths: u32) -> Score {
        let storage = self
            .chests
            .iter()
            .filter(|chest| chest.is_storage())
            .map(Chest::inventory);
        let held: f32 = std::iter::once(self.backpack)
            .chain(storage)
            .filter_map(|id| self.registry.get(id))
            .map(treasure_value)
            .sum();

        let score = self
            .config
            .score
            .tally(held, days_used, self.all_areas_cleared(), deaths);
        tracing::info!(total = score.total, days_used, deaths, days_bonus = score.days_bonus, "run scored");
        score
    }

    // Notifications

    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(%message, "notification");
        self.notifications.push(message);
    }

    /// Take pending notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    // Deferred work

    pub fn schedule(&mut self, owner: EntityId, delay: f32, event: SessionEvent) -> TaskId {
        self.scheduler.schedule(owner, delay, event)
    }

    pub fn cancel(&mut self, task: TaskId) -> Option<SessionEvent> {
        self.scheduler.cancel(task)
    }

    /// An entity left the world; its pending work goes with it.
    pub fn entity_destroyed(&mut self, entity: EntityId) -> usize {
        self.scheduler.cancel_owner(entity)
    }

    // Player stats

    /// Speed, damage and protection from what is equipped.
    pub fn player_stats(&self) -> EquipmentStats {
        match self.equipment() {
            Ok(equipment) => equipment.equipment_stats(self.config.base_speed),
            Err(_) => EquipmentStats {
                speed: self.config.base_speed,
                ..EquipmentStats::default()
            },
        }
    }

    /// Damage left after equipped protection absorbs its share.
    pub fn incoming_damage(&self, amount: f32) -> f32 {
        self.player_stats().mitigate(amount)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backpack", &self.backpack)
            .field("equipment", &self.equipment)
            .field("chests", &self.chests)
            .field("elapsed", &self.elapsed())
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}
