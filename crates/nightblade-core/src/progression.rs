//! Experience, levels and derived combat stats.
//!
//! The tracker owns the level and accumulated experience. Derived stats are a
//! pure function of the level: `base + per_level * (level - 1)`. On every
//! level-up the tracker pushes a fresh [`DerivedStats`] snapshot into its
//! [`ProgressionTarget`], which replaces the damage stats its strikes resolve
//! with. The base [`DamageStats`] given at construction are never mutated.
//!
//! # Example
//!
//! ```
//! use nightblade_core::config::{DamageStats, ProgressionConfig};
//! use nightblade_core::events::EventBus;
//! use nightblade_core::progression::{DerivedStats, ProgressionTarget, ProgressionTracker};
//! use nightblade_core::actor::ActorId;
//!
//! struct Hero(Option<DerivedStats>);
//! impl ProgressionTarget for Hero {
//!     fn apply_derived_stats(&mut self, stats: &DerivedStats, _bus: &mut EventBus) {
//!         self.0 = Some(*stats);
//!     }
//! }
//!
//! let config = ProgressionConfig {
//!     experience_requirements: vec![100, 150, 225],
//!     ..ProgressionConfig::default()
//! };
//! let mut tracker = ProgressionTracker::new(ActorId::new(0), &config, DamageStats::default());
//! let mut hero = Hero(None);
//! let mut bus = EventBus::new();
//!
//! assert_eq!(tracker.add_experience(260, &mut hero, &mut bus), 2);
//! assert_eq!(tracker.level(), 3);
//! assert_eq!(tracker.experience(), 10);
//! assert_eq!(hero.0.unwrap().level, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::config::{DamageStats, ProgressionConfig};
use crate::events::{EventBus, GameEvent};

/// Combat stats for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Level these stats belong to.
    pub level: u32,
    /// Minimum damage of the damage range.
    pub attack_power: u32,
    /// Flat damage reduction.
    pub defense: u32,
    /// Critical chance, clamped to `[0, 1]`.
    pub critical_chance: f32,
    /// Maximum health.
    pub max_health: u32,
    /// Damage stats rescaled to this level.
    pub damage: DamageStats,
}

/// Receives derived stats whenever they change.
pub trait ProgressionTarget {
    /// Replaces the target's combat stats with `stats`. Implementations refill
    /// current health to the new maximum.
    fn apply_derived_stats(&mut self, stats: &DerivedStats, bus: &mut EventBus);
}

/// Tracks experience and level for one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionTracker {
    owner: ActorId,
    config: ProgressionConfig,
    base_damage: DamageStats,
    level: u32,
    experience: u32,
}

impl ProgressionTracker {
    /// Creates a tracker at level 1 with no experience.
    #[must_use]
    pub fn new(owner: ActorId, config: &ProgressionConfig, base_damage: DamageStats) -> Self {
        Self {
            owner,
            config: config.clone(),
            base_damage,
            level: 1,
            experience: 0,
        }
    }

    /// Current level (`>= 1`).
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated toward the next level.
    #[must_use]
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    /// Highest reachable level.
    #[must_use]
    pub const fn max_level(&self) -> u32 {
        self.config.max_level
    }

    /// Experience needed to leave the current level.
    ///
    /// `None` at max level or past the end of the table: experience keeps
    /// accumulating but never levels.
    #[must_use]
    pub fn requirement(&self) -> Option<u32> {
        if self.level >= self.config.max_level {
            return None;
        }
        let index = usize::try_from(self.level - 1).ok()?;
        self.config.experience_requirements.get(index).copied()
    }

    /// Experience still missing for the next level.
    #[must_use]
    pub fn experience_to_next_level(&self) -> Option<u32> {
        self.requirement()
            .map(|req| req.saturating_sub(self.experience))
    }

    /// Fraction of the way to the next level, in `[0, 1]`. `1.0` at max level.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn experience_progress(&self) -> f32 {
        match self.requirement() {
            Some(req) => (self.experience as f32 / req as f32).min(1.0),
            None => 1.0,
        }
    }

    /// Derived stats for the current level.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn derived_stats(&self) -> DerivedStats {
        let growth = &self.config.growth;
        let steps = self.level - 1;
        let grow = |base: u32, per_level: u32| base.saturating_add(per_level.saturating_mul(steps));

        let attack_power = grow(growth.base_attack_power, growth.attack_power_per_level);
        let critical_chance = (growth.base_critical_chance
            + growth.critical_chance_per_level * steps as f32)
            .clamp(0.0, 1.0);

        DerivedStats {
            level: self.level,
            attack_power,
            defense: grow(growth.base_defense, growth.defense_per_level),
            critical_chance,
            max_health: grow(growth.base_health, growth.health_per_level).max(1),
            damage: self
                .base_damage
                .rescaled(attack_power, growth.damage_spread, critical_chance),
        }
    }

    /// Pushes the current level's stats into `target` without changing the level.
    pub fn sync(&self, target: &mut dyn ProgressionTarget, bus: &mut EventBus) {
        target.apply_derived_stats(&self.derived_stats(), bus);
    }

    /// Adds experience and levels up as many times as it covers.
    ///
    /// Each level-up subtracts the requirement, recomputes derived stats into
    /// `target` and publishes `LevelUp`. One `ExperienceChanged` follows at
    /// the end. Returns the number of levels gained.
    pub fn add_experience(
        &mut self,
        amount: u32,
        target: &mut dyn ProgressionTarget,
        bus: &mut EventBus,
    ) -> u32 {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = 0;
        while let Some(requirement) = self.requirement() {
            if self.experience < requirement {
                break;
            }
            self.experience -= requirement;
            self.level += 1;
            gained += 1;

            self.sync(target, bus);
            tracing::info!(actor = %self.owner, level = self.level, "level up");
            bus.publish(Some(self.owner), GameEvent::LevelUp { level: self.level });
        }

        bus.publish(
            Some(self.owner),
            GameEvent::ExperienceChanged {
                experience: self.experience,
                requirement: self.requirement(),
            },
        );
        gained
    }
}
