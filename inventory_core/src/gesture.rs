//! Click gestures: telling a double click from two single clicks.

use serde::{Deserialize, Serialize};

/// Seconds within which a second click counts as a double click.
pub const DEFAULT_DOUBLE_CLICK_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickKind {
    Single,
    Double,
}

/// Per-target click timing.
///
/// The first click arms the tracker. The next click disarms it and is a
/// double click only if it arrived within the threshold; a late second click
/// does not re-arm, so a third click starts over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTracker {
    threshold: f32,
    armed_at: Option<f32>,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_THRESHOLD)
    }
}

impl ClickTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            armed_at: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Register a click at time `now` (seconds since session start).
    pub fn register(&mut self, now: f32) -> ClickKind {
        match self.armed_at.take() {
            None => {
                self.armed_at = Some(now);
                ClickKind::Single
            }
            Some(first) if now - first < self.threshold => ClickKind::Double,
            Some(_) => ClickKind::Single,
        }
    }

    /// Forget a pending first click.
    pub fn reset(&mut self) {
        self.armed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_within_threshold() {
        let mut tracker = ClickTracker::default();
        assert_eq!(tracker.register(1.0), ClickKind::Single);
        assert_eq!(tracker.register(1.5), ClickKind::Double);
    }

    #[test]
    fn test_slow_second_click() {
        let mut tracker = ClickTracker::default();
        assert_eq!(tracker.register(1.0), ClickKind::Single);
        assert_eq!(tracker.register(1.9), ClickKind::Single);
        // The late click disarmed the tracker; this one arms it again.
        assert_eq!(tracker.register(2.0), ClickKind::Single);
        assert_eq!(tracker.register(2.3), ClickKind::Double);
    }

    #[test]
    fn test_triple_click() {
        let mut tracker = ClickTracker::new(0.5);
        assert_eq!(tracker.register(0.0), ClickKind::Single);
        assert_eq!(tracker.register(0.1), ClickKind::Double);
        assert_eq!(tracker.register(0.2), ClickKind::Single);
    }

    #[test]
    fn test_reset() {
        let mut tracker = ClickTracker::default();
        tracker.register(3.0);
        tracker.reset();
        assert_eq!(tracker.register(3.1), ClickKind::Single);
    }
}
