//! Chests: world objects that open to reveal a container.

use std::sync::Mutex;

use item_rules::ItemId;
use serde::{Deserialize, Serialize};

use crate::container::{Container, ContainerId};
use crate::error::InventoryResult;

pub const OPEN_ANIMATION: &str = "box_open";
pub const CLOSE_ANIMATION: &str = "box_close";
pub const OPEN_SOUND: &str = "chest_open";
pub const CLOSE_SOUND: &str = "chest_close";

/// Fire-and-forget audiovisual cues. Nothing waits on them.
pub trait Presenter: Send + Sync {
    fn play_animation(&self, name: &str);
    fn play_one_shot(&self, name: &str);
}

/// Presenter that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn play_animation(&self, _name: &str) {}
    fn play_one_shot(&self, _name: &str) {}
}

/// A cue as recorded by [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Animation(String),
    OneShot(String),
}

/// Presenter that keeps every cue it receives.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all cues recorded so far.
    pub fn take(&self) -> Vec<Cue> {
        match self.cues.lock() {
            Ok(mut cues) => std::mem::take(&mut *cues),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, cue: Cue) {
        match self.cues.lock() {
            Ok(mut cues) => cues.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
    }
}

impl Presenter for RecordingPresenter {
    fn play_animation(&self, name: &str) {
        self.push(Cue::Animation(name.to_string()));
    }

    fn play_one_shot(&self, name: &str) {
        self.push(Cue::OneShot(name.to_string()));
    }
}

/// Starting contents and placement of one chest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChestConfig {
    #[serde(default = "default_chest_slots")]
    pub slots: usize,
    /// `(item id, amount)` pairs, each placed in its own slot.
    #[serde(default)]
    pub items: Vec<(ItemId, u8)>,
    /// Map area the chest sits in, for treasure bookkeeping.
    #[serde(default)]
    pub area: Option<String>,
    /// The player's own storage; its treasure counts toward the score.
    #[serde(default)]
    pub storage: bool,
}

fn default_chest_slots() -> usize {
    10
}

impl Default for ChestConfig {
    fn default() -> Self {
        Self {
            slots: default_chest_slots(),
            items: Vec::new(),
            area: None,
            storage: false,
        }
    }
}

/// A chest and the container behind it. Starts closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chest {
    inventory: ContainerId,
    area: Option<String>,
    storage: bool,
    open: bool,
}

impl Chest {
    pub fn new(inventory: ContainerId) -> Self {
        Self {
            inventory,
            area: None,
            storage: false,
            open: false,
        }
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Mark this chest as player storage.
    pub fn with_storage(mut self, storage: bool) -> Self {
        self.storage = storage;
        self
    }

    /// Fill `container` with the configured starting items.
    pub fn stock(container: &mut Container, items: &[(ItemId, u8)]) -> InventoryResult<()> {
        for &(item, amount) in items {
            container.add_item(item, amount, false)?;
        }
        Ok(())
    }

    pub fn inventory(&self) -> ContainerId {
        self.inventory
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn is_storage(&self) -> bool {
        self.storage
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, presenter: &dyn Presenter) {
        self.open = true;
        presenter.play_animation(OPEN_ANIMATION);
        presenter.play_one_shot(OPEN_SOUND);
        tracing::info!(chest = %self.inventory, "chest opened");
    }

    pub fn close(&mut self, presenter: &dyn Presenter) {
        self.open = false;
        presenter.play_animation(CLOSE_ANIMATION);
        presenter.play_one_shot(CLOSE_SOUND);
        tracing::info!(chest = %self.inventory, "chest closed");
    }

    /// Open a closed chest, close an open one.
    pub fn toggle(&mut self, presenter: &dyn Presenter) {
        if self.open {
            self.close(presenter);
        } else {
            self.open(presenter);
        }
    }
}
