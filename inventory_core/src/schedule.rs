//! Deferred, time-gated callbacks.
//!
//! Things that happen "a moment later" (a dead monster despawning, a hit
//! recovery window ending) are queued here with a delay and come back out of
//! [`Scheduler::tick`] once enough frame time has elapsed. Work belongs to an
//! owner; destroying the owner cancels everything it still has pending.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for anything that can own scheduled work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil/empty entity ID (useful for session-owned work).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone)]
struct Task<E> {
    id: TaskId,
    owner: EntityId,
    due: f64,
    payload: E,
}

/// Queue of payloads released when their due time passes.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    elapsed: f64,
    next_id: u64,
    tasks: Vec<Task<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds advanced so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Release `payload` once `delay` seconds have passed.
    ///
    /// A zero or negative delay fires on the next tick.
    pub fn schedule(&mut self, owner: EntityId, delay: f32, payload: E) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.elapsed + delay.max(0.0) as f64;
        self.tasks.push(Task {
            id,
            owner,
            due,
            payload,
        });
        tracing::debug!(task = id.0, %owner, due, "task scheduled");
        id
    }

    /// Drop a pending task. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, task: TaskId) -> Option<E> {
        let position = self.tasks.iter().position(|t| t.id == task)?;
        Some(self.tasks.remove(position).payload)
    }

    /// Drop every task belonging to `owner`. Returns how many were dropped.
    pub fn cancel_owner(&mut self, owner: EntityId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner);
        let dropped = before - self.tasks.len();
        if dropped > 0 {
            tracing::debug!(%owner, dropped, "owner tasks cancelled");
        }
        dropped
    }

    /// Advance time by `dt` seconds and return every payload now due.
    ///
    /// Payloads come out in due order; equal due times keep scheduling order.
    pub fn tick(&mut self, dt: f32) -> Vec<E> {
        self.elapsed += dt.max(0.0) as f64;
        let now = self.elapsed;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.tasks).into_iter().partition(|t| t.due <= now);
        self.tasks = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|t| t.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        let monster = EntityId::new();
        scheduler.schedule(monster, 1.0, "despawn");

        assert!(scheduler.tick(0.5).is_empty());
        assert_eq!(scheduler.tick(0.5), vec!["despawn"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_due_order_with_ties() {
        let mut scheduler = Scheduler::new();
        let owner = EntityId::new();
        scheduler.schedule(owner, 2.0, 'c');
        scheduler.schedule(owner, 1.0, 'a');
        scheduler.schedule(owner, 1.0, 'b');

        assert_eq!(scheduler.tick(3.0), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_cancel_task() {
        let mut scheduler = Scheduler::new();
        let task = scheduler.schedule(EntityId::nil(), 1.0, 7);

        assert_eq!(scheduler.cancel(task), Some(7));
        assert_eq!(scheduler.cancel(task), None);
        assert!(scheduler.tick(5.0).is_empty());
    }

    #[test]
    fn test_cancel_owner() {
        let mut scheduler = Scheduler::new();
        let doomed = EntityId::new();
        let survivor = EntityId::new();
        scheduler.schedule(doomed, 1.0, "hurt over");
        scheduler.schedule(doomed, 2.0, "despawn");
        scheduler.schedule(survivor, 1.0, "other");

        assert_eq!(scheduler.cancel_owner(doomed), 2);
        assert_eq!(scheduler.tick(3.0), vec!["other"]);
    }

    #[test]
    fn test_zero_delay_fires_next_tick() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(EntityId::nil(), 0.0, ());
        assert_eq!(scheduler.tick(0.0).len(), 1);
    }
}
