//! Named countdown timers polled once per logic tick.
//!
//! Every delayed behavior in the combat core (hitbox activation, cooldowns,
//! combo reset, hurt-stun, invincibility, retreat, landing, despawn) is a
//! named entry in an actor's [`TimerSet`]. Nothing suspends: the owner starts a
//! timer, returns, and later polls for expiry.
//!
//! # Expiry protocol
//!
//! ```text
//! timers.advance(dt);
//! while let Some(name) = timers.pop_expired() {
//!     handle(name);   // may start, restart or cancel other timers
//! }
//! ```
//!
//! [`TimerSet::pop_expired`] hands out one expired timer at a time and
//! re-checks the set on every call. A handler that cancels another timer
//! (for example, entering Hurt cancels the attack window) therefore prevents
//! it from firing, even if both expired during the same `advance`.
//!
//! Expired timers are handed out in key order, so the declaration order of
//! the key enum doubles as the tie-break priority.

use std::collections::BTreeMap;

/// A set of named countdowns keyed by `K`.
///
/// Each name is either running with some remaining time or absent. Starting a
/// running timer restarts it.
///
/// # Example
///
/// ```
/// use nightblade_core::timer::TimerSet;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// enum Name { Windup, Cooldown }
///
/// let mut timers = TimerSet::new();
/// timers.start(Name::Windup, 0.3);
/// timers.start(Name::Cooldown, 2.0);
///
/// timers.advance(0.5);
/// assert_eq!(timers.pop_expired(), Some(Name::Windup));
/// assert_eq!(timers.pop_expired(), None);
/// assert!(timers.is_running(Name::Cooldown));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSet<K: Ord> {
    remaining: BTreeMap<K, f32>,
}

impl<K: Copy + Ord> TimerSet<K> {
    /// Creates an empty timer set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            remaining: BTreeMap::new(),
        }
    }

    /// Starts (or restarts) `name` with `duration` seconds remaining.
    ///
    /// Negative or non-finite durations are treated as zero, so the timer
    /// expires on the next poll.
    pub fn start(&mut self, name: K, duration: f32) {
        let duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            0.0
        };
        self.remaining.insert(name, duration);
    }

    /// Cancels `name`. Returns whether it was running.
    pub fn cancel(&mut self, name: K) -> bool {
        self.remaining.remove(&name).is_some()
    }

    /// Cancels every timer matching `predicate`.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(K) -> bool) {
        self.remaining.retain(|&name, _| !predicate(name));
    }

    /// Cancels every timer.
    pub fn cancel_all(&mut self) {
        self.remaining.clear();
    }

    /// Returns whether `name` is running (including expired but not yet popped).
    #[must_use]
    pub fn is_running(&self, name: K) -> bool {
        self.remaining.contains_key(&name)
    }

    /// Remaining seconds for `name`, or `None` if it is not running.
    #[must_use]
    pub fn remaining(&self, name: K) -> Option<f32> {
        self.remaining.get(&name).copied()
    }

    /// Number of timers currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Returns `true` if no timer is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Decrements every timer by `dt`, never below zero.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        for remaining in self.remaining.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
    }

    /// Removes and returns the first timer (in key order) that has reached zero.
    pub fn pop_expired(&mut self) -> Option<K> {
        let name = self
            .remaining
            .iter()
            .find(|&(_, &remaining)| remaining <= 0.0)
            .map(|(&name, _)| name)?;
        self.remaining.remove(&name);
        Some(name)
    }
}

impl<K: Copy + Ord> Default for TimerSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
