//! Test helper functions for setting up simulations and querying events.
//!
//! Scenarios are built from [`GameConfig::default`] with small, named
//! adjustments so each test states only what it depends on.

use glam::Vec2;

use crate::actor::{ActorId, CombatActor, PlayerInput};
use crate::config::{DamageStats, EnemyConfig, GameConfig};
use crate::events::{EventRecord, GameEvent};
use crate::simulation::Simulation;

/// Frame length used by every scenario.
pub const FRAME: f32 = 1.0 / 60.0;

// =============================================================================
// Configs
// =============================================================================

/// An enemy that never notices the player and never moves on its own.
///
/// All three ranges are shorter than the spawn distances the tests use, and
/// the patrol route is empty, so the enemy stands where it was spawned.
pub fn training_dummy(max_health: u32, experience_reward: u32) -> EnemyConfig {
    EnemyConfig {
        name: "Dummy".to_string(),
        max_health,
        experience_reward,
        detection_range: 0.25,
        follow_range: 0.25,
        attack_range: 0.25,
        patrol_route: Vec::new(),
        ..EnemyConfig::default()
    }
}

/// Damage stats with a fixed roll and no crits or knockback.
pub fn flat_damage(amount: u32) -> DamageStats {
    DamageStats::new(amount, amount, 0.0, 1.5, 0.0, 0.0).unwrap()
}

/// Default config with a seed, the training dummy registered as `"dummy"`,
/// and player hits that do not knock targets out of reach.
pub fn arena_config(seed: u64, dummy: EnemyConfig) -> GameConfig {
    let mut config = GameConfig {
        seed,
        ..GameConfig::default()
    };
    config.player.damage = flat_damage(1);
    config.enemies.insert("dummy".to_string(), dummy);
    config
}

/// Builds a simulation and runs one idle frame so every body settles on the
/// ground, then clears the setup events.
pub fn settled(config: GameConfig) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    sim.advance(FRAME, PlayerInput::default());
    sim.take_events();
    sim
}

// =============================================================================
// Driving
// =============================================================================

/// Input with only the attack button pressed.
pub fn attack() -> PlayerInput {
    PlayerInput {
        attack_pressed: true,
        ..PlayerInput::default()
    }
}

/// Runs whole frames covering `seconds` with the same input each frame.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn run_for(sim: &mut Simulation, seconds: f32, input: PlayerInput) {
    let frames = (seconds / FRAME).ceil() as u32;
    for _ in 0..frames {
        sim.advance(FRAME, input);
    }
}

/// Presses attack for one frame, then idles for `seconds`.
pub fn attack_then_wait(sim: &mut Simulation, seconds: f32) {
    sim.advance(FRAME, attack());
    run_for(sim, seconds, PlayerInput::default());
}

/// Teleports the player, keeping it on the ground.
pub fn place_player(sim: &mut Simulation, x: f32) {
    sim.arena_mut().player_mut().body_mut().position.x = x;
}

// =============================================================================
// Event Queries
// =============================================================================

/// Counts events with the given name, optionally from a given source.
pub fn count(events: &[EventRecord], name: &str, source: Option<ActorId>) -> usize {
    events
        .iter()
        .filter(|r| r.event.name() == name)
        .filter(|r| source.is_none() || r.source == source)
        .count()
}

/// Levels reached, in publication order.
pub fn level_ups(events: &[EventRecord]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|r| match r.event {
            GameEvent::LevelUp { level } => Some(level),
            _ => None,
        })
        .collect()
}

/// Spawns `archetype` `distance` units to the right of the player.
pub fn spawn_ahead(sim: &mut Simulation, archetype: &str, distance: f32) -> ActorId {
    let origin = sim.player().body().position;
    sim.spawn_enemy(archetype, origin + Vec2::new(distance, 0.0))
        .unwrap()
}
