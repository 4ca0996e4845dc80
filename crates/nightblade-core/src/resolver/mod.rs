//! Resolvers turn actor intent into state changes.
//!
//! Actors decide; resolvers apply. During a logic tick an actor may emit a
//! [`Strike`](crate::actor::Strike), which the simulation routes to the
//! [`HitResolver`]. During a physics tick every body goes through the
//! [`PhysicsResolver`].
//!
//! # Invariants
//!
//! - Resolvers hold no per-actor state; they read their inputs and write
//!   through the references they are given.
//! - Given the same inputs and the same random stream, a resolver produces the
//!   same result.
//!
//! # Available Resolvers
//!
//! - [`DamageResolver`]: rolls a [`DamageInfo`] from damage stats
//! - [`HitResolver`]: delivers a strike to the target it reaches
//! - [`PhysicsResolver`]: gravity, integration and ground contact

mod damage;
mod hit;
mod physics;

pub use damage::{DamageInfo, DamageResolver};
pub use hit::{HitResolver, StrikeOutcome};
pub use physics::{PhysicsResolver, FIXED_DT};
