//! Simulation: the two-rate tick loop that drives a fight.
//!
//! The `Simulation` owns the arena, the event bus, the progression tracker and
//! the random source, and runs two separate ticks:
//!
//! 1. **LOGIC** ([`Simulation::update_logic`], variable `dt`): every actor
//!    advances its timers and evaluates transitions. Strikes are resolved on
//!    the spot. Enemy deaths published during the tick are then fed to the
//!    progression tracker, and despawned enemies are removed.
//! 2. **PHYSICS** ([`Simulation::step_physics`], fixed `dt`): every actor
//!    writes its intended velocity, then the physics resolver integrates it.
//!
//! [`Simulation::advance`] combines the two for a frame: one logic tick, then
//! as many fixed physics steps as the accumulated frame time covers (capped).
//!
//! # Determinism
//!
//! Given the same config (including seed) and the same input sequence, the
//! simulation produces an identical event log:
//! - The player always updates first, then enemies in ascending ID order
//! - All randomness comes from a single `ChaCha8Rng` seeded from the config
//! - Bodies are integrated in the same fixed order
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightblade_core::actor::PlayerInput;
//! use nightblade_core::config::GameConfig;
//! use nightblade_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(GameConfig::default()).unwrap();
//! sim.spawn_enemy("skeleton", Vec2::new(8.0, 0.0)).unwrap();
//!
//! for _ in 0..60 {
//!     sim.advance(1.0 / 60.0, PlayerInput::default());
//! }
//!
//! assert_eq!(sim.tick(), 60);
//! assert_eq!(sim.physics_steps(), 60);
//! ```

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actor::{ActorId, CombatActor, Perception, PlayerController, PlayerInput};
use crate::arena::Arena;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::events::{EventBus, EventRecord, GameEvent, Listener, SubscriptionId};
use crate::progression::ProgressionTracker;
use crate::resolver::{HitResolver, PhysicsResolver};

// =============================================================================
// Simulation
// =============================================================================

/// The fight orchestrator.
#[derive(Debug)]
pub struct Simulation {
    config: GameConfig,
    arena: Arena,
    bus: EventBus,
    progression: ProgressionTracker,
    physics: PhysicsResolver,
    rng: ChaCha8Rng,
    /// Logic ticks run so far.
    tick: u64,
    /// Physics steps run so far.
    physics_steps: u64,
    /// Frame time not yet consumed by physics steps.
    accumulator: f32,
}

impl Simulation {
    /// Creates a simulation with the player standing on the ground at x = 0.
    ///
    /// The player's level 1 stats are synced from the progression table and
    /// the player starts at full health.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` fails validation.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let spawn = Vec2::new(0.0, config.world.ground_height);
        let mut arena = Arena::new(spawn, &config.player);
        let mut bus = EventBus::new();
        let progression =
            ProgressionTracker::new(arena.player().id(), &config.progression, config.player.damage);
        progression.sync(arena.player_mut(), &mut bus);

        tracing::info!(seed = config.seed, archetypes = config.enemies.len(), "simulation created");

        Ok(Self {
            physics: PhysicsResolver::new(&config.world),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            arena,
            bus,
            progression,
            tick: 0,
            physics_steps: 0,
            accumulator: 0.0,
        })
    }

    /// Spawns an enemy from a named archetype.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownArchetype`] if the archetype is not configured.
    pub fn spawn_enemy(&mut self, archetype: &str, position: Vec2) -> Result<ActorId, ConfigError> {
        let enemy = self.config.enemy(archetype)?;
        Ok(self.arena.spawn_enemy(archetype, position, enemy))
    }

    /// Registers an event listener on the bus.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.bus.subscribe(listener)
    }

    // -------------------------------------------------------------------------
    // Ticks
    // -------------------------------------------------------------------------

    /// Runs one logic tick of length `dt` with the given player input.
    pub fn update_logic(&mut self, dt: f32, input: PlayerInput) {
        self.tick += 1;
        self.bus.set_tick(self.tick);
        let cursor = self.bus.len();

        self.update_player(dt, input);
        self.update_enemies(dt);
        self.award_experience(cursor);

        for id in self.arena.remove_despawned() {
            tracing::debug!(actor = %id, tick = self.tick, "enemy removed from arena");
        }
    }

    /// Runs one fixed physics step.
    pub fn step_physics(&mut self) {
        self.physics_steps += 1;
        let dt = self.physics.dt();

        let player = self.arena.player_mut();
        player.fixed_update(dt);
        self.physics.step(player.body_mut());

        for enemy in self.arena.enemies_sorted_mut() {
            enemy.fixed_update(dt);
            self.physics.step(enemy.body_mut());
        }
    }

    /// Runs one frame: a logic tick of `frame_dt`, then the physics steps the
    /// accumulated time allows, up to `world.max_physics_steps`. Returns the
    /// number of physics steps run.
    pub fn advance(&mut self, frame_dt: f32, input: PlayerInput) -> u32 {
        self.update_logic(frame_dt, input);

        let step = self.physics.dt();
        let max_steps = self.config.world.max_physics_steps;
        self.accumulator += frame_dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= step && steps < max_steps {
            self.step_physics();
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            tracing::debug!(
                tick = self.tick,
                dropped = self.accumulator,
                "physics backlog dropped"
            );
            self.accumulator = 0.0;
        }
        steps
    }

    fn update_player(&mut self, dt: f32, input: PlayerInput) {
        let player = self.arena.player_mut();
        player.set_input(input);
        let Some(strike) = player.update(dt, &mut self.bus) else {
            return;
        };
        let stats = player.damage_stats().copied();

        let target = self.arena.closest_enemy_within(strike.origin, strike.reach);
        let target = target
            .and_then(|id| self.arena.enemy_mut(id))
            .map(|enemy| enemy as &mut dyn CombatActor);
        let outcome = HitResolver::resolve(
            &strike,
            stats.as_ref(),
            target,
            &mut self.rng,
            &mut self.bus,
        );
        tracing::debug!(tick = self.tick, outcome = ?outcome, "player strike");
    }

    fn update_enemies(&mut self, dt: f32) {
        let ids: Vec<ActorId> = self.arena.enemy_ids_sorted().collect();
        for id in ids {
            let Some((player, enemy)) = self.arena.player_and_enemy_mut(id) else {
                continue;
            };
            let target = (!player.is_dead()).then_some(player.body().position);
            enemy.set_perception(Perception { target });

            let Some(strike) = enemy.update(dt, &mut self.bus) else {
                continue;
            };
            let stats = enemy.damage_stats().copied();
            let outcome = HitResolver::resolve(
                &strike,
                stats.as_ref(),
                Some(player as &mut dyn CombatActor),
                &mut self.rng,
                &mut self.bus,
            );
            if outcome.reached_target() {
                enemy.register_hit();
            }
        }
    }

    fn award_experience(&mut self, cursor: usize) {
        let rewards: Vec<u32> = self
            .bus
            .events_since(cursor)
            .iter()
            .filter_map(|record| match record.event {
                GameEvent::EnemyDeath {
                    experience_reward, ..
                } => Some(experience_reward),
                _ => None,
            })
            .collect();

        for reward in rewards {
            self.progression
                .add_experience(reward, self.arena.player_mut(), &mut self.bus);
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The arena, mutably (for setup and tests).
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &PlayerController {
        self.arena.player()
    }

    /// The progression tracker.
    #[must_use]
    pub const fn progression(&self) -> &ProgressionTracker {
        &self.progression
    }

    /// The event bus.
    #[must_use]
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Drains the event log.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        self.bus.take_events()
    }

    /// The configuration the simulation was built from.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the random source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Logic ticks run so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Physics steps run so far.
    #[must_use]
    pub const fn physics_steps(&self) -> u64 {
        self.physics_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    mod construction_tests {
        use super::*;

        #[test]
        fn new_syncs_level_one_stats() {
            let sim = Simulation::new(GameConfig::default()).unwrap();
            let growth = &sim.config().progression.growth;
            assert_eq!(sim.player().health().max(), growth.base_health);
            assert_eq!(
                sim.player().damage_stats().unwrap().min_damage(),
                growth.base_attack_power
            );
            assert_eq!(sim.tick(), 0);
        }

        #[test]
        fn player_starts_at_full_health() {
            let mut config = GameConfig::default();
            config.player.max_health = 40;
            let sim = Simulation::new(config).unwrap();
            let health = sim.player().health();
            assert_eq!(health.max(), sim.config().progression.growth.base_health);
            assert_eq!(health.current(), health.max());
        }

        #[test]
        fn invalid_config_is_rejected() {
            let mut config = GameConfig::default();
            config.player.combo.clear();
            assert!(matches!(
                Simulation::new(config),
                Err(ConfigError::EmptyCombo)
            ));
        }

        #[test]
        fn unknown_archetype_is_rejected() {
            let mut sim = Simulation::new(GameConfig::default()).unwrap();
            assert!(matches!(
                sim.spawn_enemy("dragon", Vec2::ZERO),
                Err(ConfigError::UnknownArchetype(name)) if name == "dragon"
            ));
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn advance_runs_capped_physics_steps() {
            let mut sim = Simulation::new(GameConfig::default()).unwrap();
            assert_eq!(sim.advance(DT, PlayerInput::default()), 1);

            let max = sim.config().world.max_physics_steps;
            assert_eq!(sim.advance(1.0, PlayerInput::default()), max);
            // backlog beyond the cap is dropped
            assert_eq!(sim.advance(0.0, PlayerInput::default()), 0);
        }

        #[test]
        fn player_settles_on_ground() {
            let mut sim = Simulation::new(GameConfig::default()).unwrap();
            for _ in 0..5 {
                sim.advance(DT, PlayerInput::default());
            }
            assert!(sim.player().body().is_grounded());
            assert_eq!(sim.player().body().position.y, 0.0);
        }

        #[test]
        fn events_are_stamped_with_tick() {
            let mut sim = Simulation::new(GameConfig::default()).unwrap();
            sim.take_events();
            sim.advance(DT, PlayerInput::default());
            sim.advance(
                DT,
                PlayerInput {
                    attack_pressed: true,
                    ..PlayerInput::default()
                },
            );
            let events = sim.take_events();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].tick, 2);
            assert_eq!(events[0].event, GameEvent::Attack);
            assert_eq!(events[0].source, Some(ActorId::new(0)));
        }
    }
}
