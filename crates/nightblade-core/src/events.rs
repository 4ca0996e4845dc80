//! Domain events and the bus that broadcasts them.
//!
//! Actors, the progression tracker and the simulation publish [`GameEvent`]s
//! onto an explicitly owned [`EventBus`]. Cosmetic collaborators (audio, HUD,
//! damage text) subscribe closures to the bus; they observe but never decide.
//!
//! # Ordering
//!
//! Listeners run synchronously inside [`EventBus::publish`], in subscription
//! order. Every published event is also appended to the bus log, which the
//! owner drains with [`EventBus::take_events`]. The log is the record used for
//! replay comparison and tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// A one-way notification produced by the combat core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player left the ground through a jump.
    Jump,
    /// The player touched the ground while moving downward.
    Land,
    /// The player became airborne while moving downward (once per fall).
    Fall,
    /// A player attack input was accepted.
    Attack,
    /// The player started crouching.
    Crouch,
    /// The player survived a hit.
    TakeDamage,
    /// An actor's health reached zero.
    Death,
    /// An actor's health or maximum health changed.
    HealthChanged {
        /// Health after the change
        current: u32,
        /// Maximum health after the change
        max: u32,
    },
    /// An enemy entered the Dead state.
    EnemyDeath {
        /// Experience granted to the player
        experience_reward: u32,
        /// Archetype display name
        enemy_name: String,
    },
    /// The player's level increased.
    LevelUp {
        /// Level reached
        level: u32,
    },
    /// The player's experience changed.
    ExperienceChanged {
        /// Experience accumulated toward the next level
        experience: u32,
        /// Requirement for the next level, `None` at max level
        requirement: Option<u32>,
    },
}

impl GameEvent {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Jump => "Jump",
            Self::Land => "Land",
            Self::Fall => "Fall",
            Self::Attack => "Attack",
            Self::Crouch => "Crouch",
            Self::TakeDamage => "TakeDamage",
            Self::Death => "Death",
            Self::HealthChanged { .. } => "HealthChanged",
            Self::EnemyDeath { .. } => "EnemyDeath",
            Self::LevelUp { .. } => "LevelUp",
            Self::ExperienceChanged { .. } => "ExperienceChanged",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A published event together with when and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Logic tick during which the event was published.
    pub tick: u64,
    /// Actor the event concerns, if any.
    pub source: Option<ActorId>,
    /// The event itself.
    pub event: GameEvent,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Listener callback.
pub type Listener = Box<dyn FnMut(&EventRecord) + Send>;

/// Synchronous broadcast bus with an append-only log.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use nightblade_core::events::{EventBus, GameEvent};
///
/// let mut bus = EventBus::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// bus.subscribe(Box::new(move |record| {
///     sink.lock().unwrap().push(record.event.name());
/// }));
///
/// bus.publish(None, GameEvent::LevelUp { level: 2 });
///
/// assert_eq!(*seen.lock().unwrap(), vec!["LevelUp"]);
/// assert_eq!(bus.take_events().len(), 1);
/// ```
#[derive(Default)]
pub struct EventBus {
    tick: u64,
    log: Vec<EventRecord>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl EventBus {
    /// Creates an empty bus at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick stamped onto subsequently published events.
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Current tick stamp.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Registers a listener. Listeners run in subscription order.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Publishes an event: notifies every listener, then appends it to the log.
    pub fn publish(&mut self, source: Option<ActorId>, event: GameEvent) {
        let record = EventRecord {
            tick: self.tick,
            source,
            event,
        };
        for (_, listener) in &mut self.listeners {
            listener(&record);
        }
        self.log.push(record);
    }

    /// Events logged since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.log
    }

    /// Events logged at or after position `cursor` of the current log.
    #[must_use]
    pub fn events_since(&self, cursor: usize) -> &[EventRecord] {
        self.log.get(cursor..).unwrap_or(&[])
    }

    /// Number of events in the current log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns `true` if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Drains and returns the log.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.log)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("tick", &self.tick)
            .field("log", &self.log)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(bus: &mut EventBus) -> (SubscriptionId, Arc<Mutex<Vec<EventRecord>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = bus.subscribe(Box::new(move |record| {
            sink.lock().unwrap().push(record.clone());
        }));
        (id, seen)
    }

    #[test]
    fn records_carry_tick_and_source() {
        let mut bus = EventBus::new();
        bus.set_tick(12);
        bus.publish(Some(ActorId::new(3)), GameEvent::Death);

        let record = &bus.events()[0];
        assert_eq!(record.tick, 12);
        assert_eq!(record.source, Some(ActorId::new(3)));
        assert_eq!(record.event, GameEvent::Death);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["audio", "hud"] {
            let order = Arc::clone(&order);
            bus.subscribe(Box::new(move |_| order.lock().unwrap().push(tag)));
        }
        bus.publish(None, GameEvent::Jump);
        assert_eq!(*order.lock().unwrap(), vec!["audio", "hud"]);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let mut bus = EventBus::new();
        let (id, seen) = recorder(&mut bus);
        bus.publish(None, GameEvent::Jump);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(None, GameEvent::Land);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn take_events_drains_log() {
        let mut bus = EventBus::new();
        bus.publish(None, GameEvent::Attack);
        bus.publish(None, GameEvent::LevelUp { level: 2 });
        assert_eq!(bus.events_since(1).len(), 1);
        assert!(bus.events_since(5).is_empty());

        let drained = bus.take_events();
        assert_eq!(drained.len(), 2);
        assert!(bus.is_empty());
    }
}
