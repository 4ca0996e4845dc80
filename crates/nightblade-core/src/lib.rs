//! # Nightblade Core
//!
//! Real-time combat, behavior and progression core for Nightblade, a 2D
//! side-on action game.
//!
//! This crate provides the deterministic fight simulation: actor state
//! machines driven by named timers, randomized damage resolution with
//! knockback, and experience-based leveling, all wired together through an
//! in-process event bus.
//!
//! ## Architecture
//!
//! - **Actors**: the player and enemies, each an explicit state machine
//! - **Resolvers**: damage rolls, hit delivery, physics integration
//! - **Events**: everything observable is published on the [`EventBus`]
//! - **Progression**: experience and level-derived stats for the player
//!
//! The [`Simulation`] runs a variable-rate logic tick (timers, AI, input,
//! strikes) and a fixed-rate physics tick (velocities, gravity, ground).
//!
//! ## Usage
//!
//! ```rust
//! use glam::Vec2;
//! use nightblade_core::{GameConfig, PlayerInput, Simulation};
//!
//! let mut sim = Simulation::new(GameConfig::default())?;
//! sim.spawn_enemy("skeleton", Vec2::new(3.0, 0.0))?;
//!
//! let attack = PlayerInput { attack_pressed: true, ..PlayerInput::default() };
//! sim.advance(1.0 / 60.0, attack);
//!
//! for record in sim.take_events() {
//!     println!("{} {}", record.tick, record.event);
//! }
//! # Ok::<(), nightblade_core::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod arena;
pub mod config;
pub mod error;
pub mod events;
pub mod health;
pub mod progression;
pub mod resolver;
pub mod simulation;
pub mod timer;

#[cfg(test)]
mod tests;

pub use actor::{ActorFlags, ActorId, CombatActor, CombatState, PlayerInput};
pub use arena::Arena;
pub use config::{DamageStats, EnemyConfig, GameConfig, PlayerConfig};
pub use error::{ConfigError, MissingDependency};
pub use events::{EventBus, EventRecord, GameEvent};
pub use progression::ProgressionTracker;
pub use resolver::{DamageInfo, DamageResolver};
pub use simulation::Simulation;
