//! The exchange: buying listed items with treasure from the backpack.
//!
//! A purchase is checked in full before anything moves: the buyer needs
//! enough free slots for the item plus a possible change unit, and enough
//! treasure to cover the price. Payment is then planned greedily over the
//! currency stacks in slot order, taking as many whole units from each stack
//! as fit into what is still owed. A residual that no whole unit fits is
//! settled by breaking one held unit and handing back change.

mod change;
mod listing;

pub use change::*;
pub use listing::*;

use item_rules::{ItemCatalog, ItemDefinition, ItemId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::{InventoryError, InventoryResult};
use crate::gesture::{ClickKind, ClickTracker, DEFAULT_DOUBLE_CLICK_THRESHOLD};

/// Slots a purchase may fill: the item itself and one change unit.
pub const MIN_TRADE_SLOTS: usize = 2;

/// Tolerance when comparing fractional prices.
const PRICE_EPSILON: f32 = 1e-4;

/// Exchange settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Free backpack slots required before a trade starts. Never below two.
    #[serde(default = "default_min_free_slots")]
    pub min_free_slots: usize,
    #[serde(default)]
    pub change: ChangePolicy,
    /// Catalog ids offered by the shop, in display order.
    #[serde(default)]
    pub shop_items: Vec<ItemId>,
}

fn default_min_free_slots() -> usize {
    MIN_TRADE_SLOTS
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            min_free_slots: MIN_TRADE_SLOTS,
            change: ChangePolicy::default(),
            shop_items: Vec::new(),
        }
    }
}

/// One broken currency unit and what came back for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub broken: ItemId,
    pub returned: ItemId,
}

/// What a completed purchase did to the buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub item: ItemId,
    /// Units removed per currency, in the order they were taken.
    pub paid: Vec<(ItemId, u8)>,
    pub change: Option<Change>,
}

/// A currency stack as seen by the payment planner.
#[derive(Debug, Clone, Copy)]
struct Holding {
    index: usize,
    item: ItemId,
    amount: u8,
    unit_value: f32,
}

fn holdings(buyer: &Container) -> Vec<Holding> {
    let catalog = buyer.catalog();
    buyer
        .slots()
        .iter()
        .filter_map(|slot| {
            let stack = slot.stack()?;
            let item = catalog.get(stack.item)?;
            item.category.is_currency().then_some(Holding {
                index: slot.index,
                item: stack.item,
                amount: stack.amount,
                unit_value: item.value,
            })
        })
        .collect()
}

/// Walk the holdings in order, taking whole units while they fit.
///
/// Returns `(slot index, item, units)` per stack touched and the residual.
fn plan_payment(holdings: &[Holding], price: f32) -> (Vec<(usize, ItemId, u8)>, f32) {
    let mut remaining = price;
    let mut plan = Vec::new();

    for holding in holdings {
        if remaining <= PRICE_EPSILON {
            break;
        }
        if holding.unit_value <= 0.0 {
            continue;
        }
        let fitting = ((remaining + PRICE_EPSILON) / holding.unit_value).floor();
        let take = fitting.min(holding.amount as f32) as u8;
        if take == 0 {
            continue;
        }
        remaining -= take as f32 * holding.unit_value;
        plan.push((holding.index, holding.item, take));
    }

    (plan, remaining.max(0.0))
}

/// The shop: a static listing plus the rules for paying for it.
#[derive(Debug, Clone)]
pub struct Exchange {
    listing: ShopListing,
    min_free_slots: usize,
    change: ChangePolicy,
    clicks: Vec<ClickTracker>,
}

impl Exchange {
    /// Create an exchange offering `listing`.
    pub fn new(listing: ShopListing) -> Self {
        let clicks = vec![ClickTracker::new(DEFAULT_DOUBLE_CLICK_THRESHOLD); listing.len()];
        Self {
            listing,
            min_free_slots: MIN_TRADE_SLOTS,
            change: ChangePolicy::default(),
            clicks,
        }
    }

    /// Build the exchange described by `config`.
    pub fn from_config(
        catalog: &ItemCatalog,
        config: &TradeConfig,
        double_click_threshold: f32,
    ) -> InventoryResult<Self> {
        let listing = ShopListing::from_ids(catalog, &config.shop_items)?;
        config.change.validate(catalog)?;
        Ok(Self::new(listing)
            .with_min_free_slots(config.min_free_slots)
            .with_change_policy(config.change.clone())
            .with_double_click_threshold(double_click_threshold))
    }

    pub fn with_min_free_slots(mut self, min_free_slots: usize) -> Self {
        self.min_free_slots = min_free_slots.max(MIN_TRADE_SLOTS);
        self
    }

    pub fn with_change_policy(mut self, change: ChangePolicy) -> Self {
        self.change = change;
        self
    }

    pub fn with_double_click_threshold(mut self, threshold: f32) -> Self {
        self.clicks = vec![ClickTracker::new(threshold); self.listing.len()];
        self
    }

    pub fn listing(&self) -> &ShopListing {
        &self.listing
    }

    pub fn min_free_slots(&self) -> usize {
        self.min_free_slots
    }

    pub fn change_policy(&self) -> &ChangePolicy {
        &self.change
    }

    /// Total worth of the currency `buyer` holds.
    pub fn funds(buyer: &Container) -> f32 {
        holdings(buyer)
            .iter()
            .map(|h| h.amount as f32 * h.unit_value)
            .sum()
    }

    /// Buy one unit of `item_id` with the buyer's treasure.
    ///
    /// On any error the buyer is left exactly as it was.
    pub fn purchase<R: Rng + ?Sized>(
        &self,
        buyer: &mut Container,
        item_id: ItemId,
        rng: &mut R,
    ) -> InventoryResult<TradeReceipt> {
        let item: ItemDefinition = buyer
            .catalog()
            .get(item_id)
            .cloned()
            .ok_or(InventoryError::UnknownItem { item: item_id })?;

        let available = buyer.empty_slot_count();
        if available < self.min_free_slots {
            tracing::warn!(item = %item_id, available, required = self.min_free_slots, "trade rejected: backpack too full");
            return Err(InventoryError::InsufficientSpace {
                required: self.min_free_slots,
                available,
            });
        }

        let held = holdings(buyer);
        let funds: f32 = held.iter().map(|h| h.amount as f32 * h.unit_value).sum();
        if funds + PRICE_EPSILON < item.value {
            tracing::warn!(item = %item_id, price = item.value, funds, "trade rejected: not enough treasure");
            return Err(InventoryError::InsufficientFunds {
                price: item.value,
                funds,
            });
        }

        let (plan, residual) = plan_payment(&held, item.value);

        for &(index, currency, units) in &plan {
            buyer.remove_at(index, units)?;
            tracing::debug!(currency = %currency, units, index, "paid");
        }

        let change = if residual > PRICE_EPSILON {
            self.make_change(buyer, rng)?
        } else {
            None
        };

        buyer.add_item(item.id, 1, false)?;
        tracing::debug!(item = %item.id, price = item.value, "purchase complete");

        Ok(TradeReceipt {
            item: item.id,
            paid: plan
                .into_iter()
                .map(|(_, currency, units)| (currency, units))
                .collect(),
            change,
        })
    }

    fn make_change<R: Rng + ?Sized>(
        &self,
        buyer: &mut Container,
        rng: &mut R,
    ) -> InventoryResult<Option<Change>> {
        let Some(index) = self.change.select_source(buyer) else {
            tracing::warn!("residual owed but no currency left to break");
            return Ok(None);
        };
        let broken = buyer.slot(index)?.item_id();
        let returned = self.change.select_change(buyer.catalog(), broken, rng);

        buyer.remove_at(index, 1)?;
        // A full stack of the returned kind cannot take the unit; start a new one.
        if buyer.add_item(returned, 1, true).is_err() {
            buyer.add_item(returned, 1, false)?;
        }
        tracing::debug!(broken = %broken, returned = %returned, "change made");

        Ok(Some(Change { broken, returned }))
    }

    /// Buy the listing entry at `index`.
    pub fn purchase_listing<R: Rng + ?Sized>(
        &self,
        index: usize,
        buyer: &mut Container,
        rng: &mut R,
    ) -> InventoryResult<TradeReceipt> {
        let entry = self
            .listing
            .get(index)
            .ok_or(InventoryError::UnknownListing { index })?;
        self.purchase(buyer, entry.item.id, rng)
    }

    /// Register a click on listing entry `index` at time `now`.
    ///
    /// Only a double click buys; a single click returns `Ok(None)`.
    pub fn click<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        now: f32,
        buyer: &mut Container,
        rng: &mut R,
    ) -> InventoryResult<Option<TradeReceipt>> {
        let tracker = self
            .clicks
            .get_mut(index)
            .ok_or(InventoryError::UnknownListing { index })?;

        match tracker.register(now) {
            ClickKind::Single => Ok(None),
            ClickKind::Double => self.purchase_listing(index, buyer, rng).map(Some),
        }
    }
}
