//! Crate-level scenario tests.
//!
//! These tests exercise the whole fight pipeline through [`Simulation`]:
//! - **Determinism tests**: same seed and inputs produce identical event logs
//! - **Integration tests**: actors, resolvers, progression and the bus together
//! - **Helper functions**: scenario configs, input drivers and event queries
//!
//! # Layout
//!
//! - `determinism.rs`: replay and log-ordering checks
//! - `integration.rs`: fights driven frame by frame
//! - `helpers.rs`: configs, drivers and event counters
//!
//! [`Simulation`]: crate::simulation::Simulation

mod helpers;

// Re-export for convenience
pub use helpers::*;
