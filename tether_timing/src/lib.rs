// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Timing: a host-agnostic timer queue for UI runtimes.
//!
//! The queue does not own a clock. Hosts schedule payloads against absolute
//! deadlines (in whatever unit they use, typically milliseconds), then poll
//! [`TimerQueue::pop_due`] with the current time to drain timers that have
//! elapsed.
//!
//! Ordering is deterministic: timers are yielded by deadline, and timers that
//! share a deadline are yielded in scheduling order. Timer ids are never
//! reused, so cancelling a stale id is always a harmless no-op.
//!
//! ## Minimal example
//!
//! ```rust
//! use tether_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let a = timers.schedule(600, "long press");
//! let b = timers.schedule(100, "tick");
//!
//! assert_eq!(timers.next_deadline(), Some(100));
//! assert!(timers.pop_due(50).is_none());
//! assert_eq!(timers.pop_due(100), Some((b, 100, "tick")));
//!
//! // Cancelling returns the payload once, then nothing.
//! assert_eq!(timers.cancel(a), Some("long press"));
//! assert_eq!(timers.cancel(a), None);
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use core::fmt;

use hashbrown::HashMap;

/// Identifier for a scheduled timer.
///
/// Ids are allocated monotonically per queue and never reused.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerId({})", self.0)
    }
}

/// A queue of payloads keyed by absolute deadline.
#[derive(Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    by_deadline: BTreeMap<(u64, TimerId), T>,
    deadlines: HashMap<TimerId, u64>,
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("next_id", &self.next_id)
            .field("pending", &self.by_deadline.len())
            .field("next_deadline", &self.next_deadline())
            .finish_non_exhaustive()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            by_deadline: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedules `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.by_deadline.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancels a pending timer and returns its payload.
    ///
    /// Returns `None` if the timer already fired, was already cancelled, or
    /// never existed in this queue.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.by_deadline.remove(&(deadline, id))
    }

    /// Returns `true` if `id` is still pending.
    #[must_use]
    pub fn contains(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Returns the deadline of a pending timer.
    #[must_use]
    pub fn deadline_of(&self, id: TimerId) -> Option<u64> {
        self.deadlines.get(&id).copied()
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.by_deadline.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Removes and returns the earliest timer whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, u64, T)> {
        let (&(deadline, id), _) = self.by_deadline.iter().next()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        let payload = self.by_deadline.remove(&(deadline, id))?;
        Some((id, deadline, payload))
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_deadline.len()
    }

    /// Returns `true` when no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_deadline.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.by_deadline.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(30, 'c');
        q.schedule(10, 'a');
        q.schedule(20, 'b');

        let mut seen = Vec::new();
        while let Some((_, _, p)) = q.pop_due(100) {
            seen.push(p);
        }
        assert_eq!(seen, ['a', 'b', 'c']);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_deadlines_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        let first = q.schedule(5, 1);
        let second = q.schedule(5, 2);
        assert_eq!(q.pop_due(5), Some((first, 5, 1)));
        assert_eq!(q.pop_due(5), Some((second, 5, 2)));
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(600, ());
        assert!(q.pop_due(599).is_none());
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(600).is_some());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10, "x");
        assert!(q.contains(id));
        assert_eq!(q.cancel(id), Some("x"));
        assert_eq!(q.cancel(id), None);
        assert!(!q.contains(id));
        assert!(q.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut q = TimerQueue::new();
        let id = q.schedule(1, ());
        assert!(q.pop_due(1).is_some());
        assert_eq!(q.cancel(id), None);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut q = TimerQueue::new();
        let a = q.schedule(1, ());
        q.cancel(a);
        let b = q.schedule(1, ());
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        let a = q.schedule(1, ());
        q.schedule(2, ());
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
        assert_eq!(q.deadline_of(a), None);
    }
}
