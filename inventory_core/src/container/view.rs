//! Slot view notifications.
//!
//! Containers do not render anything. After each mutation they tell an
//! optional [`SlotView`] what changed so the presentation layer can create,
//! update, or destroy its stack tokens.

use std::sync::Mutex;

use item_rules::ItemId;
use serde::{Deserialize, Serialize};

use super::SlotRef;

/// A visible change to one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotEvent {
    /// A new stack token appeared in an empty slot.
    StackCreated { slot: SlotRef, item: ItemId, amount: u8 },
    /// The amount label of an existing stack changed.
    AmountChanged { slot: SlotRef, amount: u8 },
    /// The slot's stack token was destroyed.
    StackCleared { slot: SlotRef },
}

impl SlotEvent {
    /// The slot this event concerns.
    pub fn slot(&self) -> SlotRef {
        match self {
            SlotEvent::StackCreated { slot, .. }
            | SlotEvent::AmountChanged { slot, .. }
            | SlotEvent::StackCleared { slot } => *slot,
        }
    }
}

/// Receiver of slot notifications.
pub trait SlotView: Send + Sync {
    fn notify(&self, event: SlotEvent);
}

/// View that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<SlotEvent>>,
}

impl RecordingView {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all events recorded so far.
    pub fn take(&self) -> Vec<SlotEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl SlotView for RecordingView {
    fn notify(&self, event: SlotEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerId;

    #[test]
    fn test_recording_view() {
        let view = RecordingView::new();
        let slot = SlotRef::new(ContainerId::nil(), 2);

        view.notify(SlotEvent::StackCleared { slot });
        let events = view.take();

        assert_eq!(events, vec![SlotEvent::StackCleared { slot }]);
        assert_eq!(events[0].slot(), slot);
        assert!(view.take().is_empty());
    }
}
