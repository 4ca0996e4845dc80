//! Tunable configuration for actors, progression and the world.
//!
//! All configuration is plain data deserialized with serde. Every section has
//! defaults matching the shipped tuning, so a config document only needs to
//! name the values it changes. Validation happens once, at load time:
//! [`GameConfig::from_json_str`] and [`GameConfig::load`] reject anything a
//! tick could not safely run with.
//!
//! # Example
//!
//! ```
//! use nightblade_core::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{
//!     "seed": 7,
//!     "player": { "max_speed": 9.0 }
//! }"#).unwrap();
//!
//! assert_eq!(config.seed, 7);
//! assert!((config.player.max_speed - 9.0).abs() < f32::EPSILON);
//! assert!(config.enemies.contains_key("skeleton"));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_finite, ensure_in_range, ensure_non_negative, ensure_positive, ConfigError,
};
use crate::resolver::FIXED_DT;

// =============================================================================
// Damage Stats
// =============================================================================

/// Damage parameters for one actor archetype.
///
/// Read-only during combat. Instances can only be built through
/// [`DamageStats::new`] (or deserialization, which goes through the same
/// checks), so a resolver never sees `min > max` or a bad multiplier.
///
/// # Example
///
/// ```
/// use nightblade_core::config::DamageStats;
///
/// let stats = DamageStats::new(10, 20, 0.1, 1.5, 5.0, 10.0).unwrap();
/// assert_eq!(stats.min_damage(), 10);
///
/// assert!(DamageStats::new(20, 10, 0.1, 1.5, 5.0, 10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DamageStatsDef", into = "DamageStatsDef")]
pub struct DamageStats {
    min_damage: u32,
    max_damage: u32,
    crit_chance: f32,
    crit_multiplier: f32,
    min_knockback: f32,
    max_knockback: f32,
}

impl DamageStats {
    /// Creates validated damage stats.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `min_damage > max_damage`, `crit_chance`
    /// is outside `[0, 1]`, `crit_multiplier` is not a finite positive
    /// number, or the knockback range is negative, non-finite or inverted.
    pub fn new(
        min_damage: u32,
        max_damage: u32,
        crit_chance: f32,
        crit_multiplier: f32,
        min_knockback: f32,
        max_knockback: f32,
    ) -> Result<Self, ConfigError> {
        if min_damage > max_damage {
            return Err(ConfigError::InvalidDamageRange {
                min: min_damage,
                max: max_damage,
            });
        }
        if !(0.0..=1.0).contains(&crit_chance) {
            return Err(ConfigError::InvalidCritChance(crit_chance));
        }
        if !crit_multiplier.is_finite() || crit_multiplier <= 0.0 {
            return Err(ConfigError::InvalidCritMultiplier(crit_multiplier));
        }
        let knockback_ok = min_knockback.is_finite()
            && max_knockback.is_finite()
            && min_knockback >= 0.0
            && min_knockback <= max_knockback;
        if !knockback_ok {
            return Err(ConfigError::InvalidKnockbackRange {
                min: min_knockback,
                max: max_knockback,
            });
        }

        Ok(Self {
            min_damage,
            max_damage,
            crit_chance,
            crit_multiplier,
            min_knockback,
            max_knockback,
        })
    }

    /// Minimum base damage (inclusive).
    #[must_use]
    pub const fn min_damage(&self) -> u32 {
        self.min_damage
    }

    /// Maximum base damage (inclusive).
    #[must_use]
    pub const fn max_damage(&self) -> u32 {
        self.max_damage
    }

    /// Probability in `[0, 1]` that a hit is critical.
    #[must_use]
    pub const fn crit_chance(&self) -> f32 {
        self.crit_chance
    }

    /// Multiplier applied to the base damage of a critical hit.
    #[must_use]
    pub const fn crit_multiplier(&self) -> f32 {
        self.crit_multiplier
    }

    /// Minimum knockback force.
    #[must_use]
    pub const fn min_knockback(&self) -> f32 {
        self.min_knockback
    }

    /// Maximum knockback force.
    #[must_use]
    pub const fn max_knockback(&self) -> f32 {
        self.max_knockback
    }

    /// Returns a copy rescaled to a new power level.
    ///
    /// The damage range becomes `[attack_power, attack_power + spread]` and the
    /// critical chance is clamped into `[0, 1]`. Multiplier and knockback are
    /// kept. Used when progression recomputes derived stats.
    #[must_use]
    pub fn rescaled(&self, attack_power: u32, spread: u32, crit_chance: f32) -> Self {
        Self {
            min_damage: attack_power,
            max_damage: attack_power.saturating_add(spread),
            crit_chance: if crit_chance.is_finite() {
                crit_chance.clamp(0.0, 1.0)
            } else {
                0.0
            },
            ..*self
        }
    }
}

impl Default for DamageStats {
    fn default() -> Self {
        Self {
            min_damage: 10,
            max_damage: 20,
            crit_chance: 0.1,
            crit_multiplier: 1.5,
            min_knockback: 5.0,
            max_knockback: 10.0,
        }
    }
}

/// Wire form of [`DamageStats`]; converted through the validating constructor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct DamageStatsDef {
    min_damage: u32,
    max_damage: u32,
    crit_chance: f32,
    crit_multiplier: f32,
    min_knockback: f32,
    max_knockback: f32,
}

impl Default for DamageStatsDef {
    fn default() -> Self {
        DamageStats::default().into()
    }
}

impl TryFrom<DamageStatsDef> for DamageStats {
    type Error = ConfigError;

    fn try_from(def: DamageStatsDef) -> Result<Self, Self::Error> {
        Self::new(
            def.min_damage,
            def.max_damage,
            def.crit_chance,
            def.crit_multiplier,
            def.min_knockback,
            def.max_knockback,
        )
    }
}

impl From<DamageStats> for DamageStatsDef {
    fn from(stats: DamageStats) -> Self {
        Self {
            min_damage: stats.min_damage,
            max_damage: stats.max_damage,
            crit_chance: stats.crit_chance,
            crit_multiplier: stats.crit_multiplier,
            min_knockback: stats.min_knockback,
            max_knockback: stats.max_knockback,
        }
    }
}

// =============================================================================
// Player
// =============================================================================

/// One step of the player's attack combo.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboStep {
    /// Fixed base damage for this step. `None` samples the stats range.
    pub base_damage: Option<u32>,
}

/// Player tuning: movement, jump, dash, attack and hurt timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting (and level 1) maximum health when no progression is attached.
    pub max_health: u32,
    /// Flat damage reduction applied to every incoming hit.
    pub defense: u32,

    /// Top horizontal speed.
    pub max_speed: f32,
    /// Horizontal acceleration toward a non-zero target speed.
    pub acceleration: f32,
    /// Horizontal deceleration toward zero.
    pub deceleration: f32,
    /// Acceleration multiplier while airborne.
    pub air_acceleration_multiplier: f32,
    /// Deceleration multiplier while airborne.
    pub air_deceleration_multiplier: f32,
    /// Speed factor while attacking or crouching.
    pub encumbered_speed_factor: f32,
    /// Apex speed window: below this vertical speed the apex bonus ramps in.
    pub apex_threshold: f32,
    /// Extra acceleration granted near the jump apex.
    pub apex_bonus: f32,

    /// Gravity multiplier relative to the world gravity.
    pub gravity_scale: f32,
    /// Extra gravity multiplier while falling.
    pub fall_gravity_multiplier: f32,
    /// Terminal downward speed (magnitude).
    pub max_fall_speed: f32,

    /// Upward velocity applied by a jump.
    pub jump_force: f32,
    /// Vertical velocity multiplier when jump is released while rising.
    pub jump_cut_multiplier: f32,
    /// Jumps available while airborne.
    pub extra_jumps: u32,
    /// Grace period after leaving the ground during which a jump is allowed.
    pub coyote_time: f32,
    /// How long a jump press is remembered.
    pub jump_buffer_time: f32,
    /// How long the landing pose lasts.
    pub landing_duration: f32,

    /// Horizontal speed during a dash.
    pub dash_speed: f32,
    /// Dash duration.
    pub dash_time: f32,
    /// Cooldown started when a dash ends.
    pub dash_cooldown: f32,

    /// Length of one attack.
    pub attack_duration: f32,
    /// Fraction of the attack after which the hit resolves.
    pub hit_delay_fraction: f32,
    /// Cooldown between attack starts.
    pub attack_cooldown: f32,
    /// Idle time after which the combo returns to its first step.
    pub combo_reset_time: f32,
    /// Radius around the player searched for a target.
    pub attack_range: f32,
    /// Combo steps, cycled in order.
    pub combo: Vec<ComboStep>,

    /// Hurt-stun duration. The player ignores damage for this window.
    pub hurt_duration: f32,

    /// Damage parameters. Progression rescales these on level-up.
    pub damage: DamageStats,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            defense: 0,
            max_speed: 8.0,
            acceleration: 70.0,
            deceleration: 70.0,
            air_acceleration_multiplier: 0.5,
            air_deceleration_multiplier: 0.5,
            encumbered_speed_factor: 0.5,
            apex_threshold: 10.0,
            apex_bonus: 2.0,
            gravity_scale: 5.0,
            fall_gravity_multiplier: 2.0,
            max_fall_speed: 20.0,
            jump_force: 15.0,
            jump_cut_multiplier: 0.5,
            extra_jumps: 1,
            coyote_time: 0.2,
            jump_buffer_time: 0.2,
            landing_duration: 0.15,
            dash_speed: 20.0,
            dash_time: 0.2,
            dash_cooldown: 1.0,
            attack_duration: 0.5,
            hit_delay_fraction: 0.3,
            attack_cooldown: 0.6,
            combo_reset_time: 1.0,
            attack_range: 1.5,
            combo: vec![
                ComboStep { base_damage: None },
                ComboStep { base_damage: None },
                ComboStep {
                    base_damage: Some(30),
                },
            ],
            hurt_duration: 0.5,
            damage: DamageStats::default(),
        }
    }
}

impl PlayerConfig {
    /// Checks every timing and movement value.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::NonPositive {
                field: "player.max_health",
                value: 0.0,
            });
        }
        if self.combo.is_empty() {
            return Err(ConfigError::EmptyCombo);
        }
        for (field, value) in [
            ("player.max_speed", self.max_speed),
            ("player.acceleration", self.acceleration),
            ("player.deceleration", self.deceleration),
            ("player.gravity_scale", self.gravity_scale),
            ("player.fall_gravity_multiplier", self.fall_gravity_multiplier),
            ("player.max_fall_speed", self.max_fall_speed),
            ("player.apex_threshold", self.apex_threshold),
            ("player.jump_force", self.jump_force),
            ("player.dash_speed", self.dash_speed),
            ("player.dash_time", self.dash_time),
            ("player.attack_duration", self.attack_duration),
            ("player.attack_range", self.attack_range),
            ("player.combo_reset_time", self.combo_reset_time),
            ("player.hurt_duration", self.hurt_duration),
        ] {
            ensure_positive(field, value)?;
        }
        for (field, value) in [
            ("player.air_acceleration_multiplier", self.air_acceleration_multiplier),
            ("player.air_deceleration_multiplier", self.air_deceleration_multiplier),
            ("player.encumbered_speed_factor", self.encumbered_speed_factor),
            ("player.apex_bonus", self.apex_bonus),
            ("player.jump_cut_multiplier", self.jump_cut_multiplier),
            ("player.coyote_time", self.coyote_time),
            ("player.jump_buffer_time", self.jump_buffer_time),
            ("player.landing_duration", self.landing_duration),
            ("player.dash_cooldown", self.dash_cooldown),
            ("player.attack_cooldown", self.attack_cooldown),
        ] {
            ensure_non_negative(field, value)?;
        }
        ensure_in_range("player.hit_delay_fraction", self.hit_delay_fraction, 0.0, 1.0)
    }
}

// =============================================================================
// Enemy
// =============================================================================

/// Enemy archetype tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Display name carried by the `EnemyDeath` event.
    pub name: String,
    /// Experience granted to the player on death.
    pub experience_reward: u32,
    /// Maximum health.
    pub max_health: u32,

    /// Walking speed while patrolling or retreating.
    pub move_speed: f32,
    /// Walking speed while chasing.
    pub chase_speed: f32,
    /// Gravity multiplier relative to the world gravity.
    pub gravity_scale: f32,
    /// Horizontal velocity decay per second while grounded.
    pub ground_friction: f32,

    /// Waypoints relative to the spawn position, visited cyclically.
    pub patrol_route: Vec<Vec2>,
    /// Pause at each waypoint.
    pub pause_duration: f32,

    /// Distance at which an idle or patrolling enemy starts chasing.
    pub detection_range: f32,
    /// Distance beyond which a chase is abandoned.
    pub follow_range: f32,
    /// Distance at which a chase turns into an attack.
    pub attack_range: f32,

    /// Cooldown between attack starts.
    pub attack_cooldown: f32,
    /// Delay between attack start and hitbox activation.
    pub hitbox_activation_delay: f32,
    /// How long the hitbox stays active.
    pub hitbox_active_duration: f32,
    /// Full attack animation length; any tail after the hitbox closes is waited out.
    pub attack_animation: f32,
    /// Radius of the attack hitbox around the enemy.
    pub hitbox_reach: f32,

    /// Time spent backing away after an attack.
    pub retreat_duration: f32,
    /// Hurt-stun duration.
    pub hurt_duration: f32,
    /// Damage immunity window started with the hurt-stun.
    pub invincibility_duration: f32,
    /// Delay between death and removal from the arena.
    pub removal_delay: f32,

    /// Damage parameters. `None` makes the enemy harmless.
    pub damage: Option<DamageStats>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            name: "Skeleton".to_string(),
            experience_reward: 50,
            max_health: 100,
            move_speed: 2.0,
            chase_speed: 4.0,
            gravity_scale: 1.0,
            ground_friction: 8.0,
            patrol_route: vec![Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)],
            pause_duration: 2.0,
            detection_range: 5.0,
            follow_range: 10.0,
            attack_range: 1.0,
            attack_cooldown: 2.0,
            hitbox_activation_delay: 0.3,
            hitbox_active_duration: 0.5,
            attack_animation: 1.0,
            hitbox_reach: 1.2,
            retreat_duration: 1.0,
            hurt_duration: 0.5,
            invincibility_duration: 1.0,
            removal_delay: 2.0,
            damage: Some(DamageStats::default()),
        }
    }
}

impl EnemyConfig {
    /// Checks ranges and timings.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::NonPositive {
                field: "enemy.max_health",
                value: 0.0,
            });
        }
        for (field, value) in [
            ("enemy.move_speed", self.move_speed),
            ("enemy.chase_speed", self.chase_speed),
            ("enemy.detection_range", self.detection_range),
            ("enemy.follow_range", self.follow_range),
            ("enemy.attack_range", self.attack_range),
            ("enemy.hitbox_active_duration", self.hitbox_active_duration),
            ("enemy.hitbox_reach", self.hitbox_reach),
            ("enemy.retreat_duration", self.retreat_duration),
            ("enemy.hurt_duration", self.hurt_duration),
        ] {
            ensure_positive(field, value)?;
        }
        for (field, value) in [
            ("enemy.gravity_scale", self.gravity_scale),
            ("enemy.ground_friction", self.ground_friction),
            ("enemy.pause_duration", self.pause_duration),
            ("enemy.attack_cooldown", self.attack_cooldown),
            ("enemy.hitbox_activation_delay", self.hitbox_activation_delay),
            ("enemy.attack_animation", self.attack_animation),
            ("enemy.invincibility_duration", self.invincibility_duration),
            ("enemy.removal_delay", self.removal_delay),
        ] {
            ensure_non_negative(field, value)?;
        }
        if self.attack_range > self.detection_range || self.detection_range > self.follow_range {
            return Err(ConfigError::InvalidRanges {
                attack: self.attack_range,
                detection: self.detection_range,
                follow: self.follow_range,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Progression
// =============================================================================

/// Per-level stat growth. Each derived stat is `base + per_level * (level - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatGrowth {
    /// Level 1 maximum health.
    pub base_health: u32,
    /// Maximum health gained per level.
    pub health_per_level: u32,
    /// Level 1 defense.
    pub base_defense: u32,
    /// Defense gained per level.
    pub defense_per_level: u32,
    /// Level 1 attack power (minimum damage).
    pub base_attack_power: u32,
    /// Attack power gained per level.
    pub attack_power_per_level: u32,
    /// Level 1 critical chance.
    pub base_critical_chance: f32,
    /// Critical chance gained per level.
    pub critical_chance_per_level: f32,
    /// Width of the damage range above attack power.
    pub damage_spread: u32,
}

impl Default for StatGrowth {
    fn default() -> Self {
        Self {
            base_health: 100,
            health_per_level: 10,
            base_defense: 0,
            defense_per_level: 1,
            base_attack_power: 10,
            attack_power_per_level: 2,
            base_critical_chance: 0.1,
            critical_chance_per_level: 0.01,
            damage_spread: 5,
        }
    }
}

/// Experience table and stat growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience needed to leave level `i + 1`. Must be non-decreasing.
    pub experience_requirements: Vec<u32>,
    /// Highest reachable level.
    pub max_level: u32,
    /// Derived stat growth.
    pub growth: StatGrowth,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            experience_requirements: vec![100, 150, 225, 340, 500, 750, 1100, 1650, 2500],
            max_level: 10,
            growth: StatGrowth::default(),
        }
    }
}

impl ProgressionConfig {
    /// Checks the level table and growth values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevelTable`] for an empty, zero-valued or
    /// decreasing table or a max level of 0, and [`ConfigError::NonPositive`]
    /// for a zero base health.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::InvalidLevelTable(
                "max_level must be at least 1".to_string(),
            ));
        }
        if self.experience_requirements.is_empty() && self.max_level > 1 {
            return Err(ConfigError::InvalidLevelTable(
                "experience_requirements is empty".to_string(),
            ));
        }
        if let Some(pos) = self.experience_requirements.iter().position(|&r| r == 0) {
            return Err(ConfigError::InvalidLevelTable(format!(
                "requirement for level {} is zero",
                pos + 1
            )));
        }
        if let Some(pos) = self
            .experience_requirements
            .windows(2)
            .position(|w| w[1] < w[0])
        {
            return Err(ConfigError::InvalidLevelTable(format!(
                "requirement for level {} is lower than level {}",
                pos + 2,
                pos + 1
            )));
        }
        if self.growth.base_health == 0 {
            return Err(ConfigError::NonPositive {
                field: "progression.growth.base_health",
                value: 0.0,
            });
        }
        ensure_non_negative(
            "progression.growth.base_critical_chance",
            self.growth.base_critical_chance,
        )?;
        ensure_non_negative(
            "progression.growth.critical_chance_per_level",
            self.growth.critical_chance_per_level,
        )?;
        Ok(())
    }
}

// =============================================================================
// World
// =============================================================================

/// Physics and timing shared by every actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Height of the flat ground.
    pub ground_height: f32,
    /// Gravity magnitude (pulls toward -Y).
    pub gravity: f32,
    /// Fixed physics timestep.
    pub fixed_dt: f32,
    /// Upper bound on physics steps run for a single frame.
    pub max_physics_steps: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            gravity: 9.81,
            fixed_dt: FIXED_DT,
            max_physics_steps: 8,
        }
    }
}

impl WorldConfig {
    /// Checks the physics parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a non-positive timestep or step cap, a
    /// negative gravity, or a non-finite ground height.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("world.fixed_dt", self.fixed_dt)?;
        ensure_non_negative("world.gravity", self.gravity)?;
        ensure_finite("world.ground_height", self.ground_height)?;
        if self.max_physics_steps == 0 {
            return Err(ConfigError::NonPositive {
                field: "world.max_physics_steps",
                value: 0.0,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Game Config
// =============================================================================

/// Complete configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random roll in the simulation.
    pub seed: u64,
    /// Physics and timing.
    pub world: WorldConfig,
    /// Player tuning.
    pub player: PlayerConfig,
    /// Experience table and stat growth.
    pub progression: ProgressionConfig,
    /// Enemy archetypes by name.
    pub enemies: BTreeMap<String, EnemyConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut enemies = BTreeMap::new();
        enemies.insert("skeleton".to_string(), EnemyConfig::default());
        Self {
            seed: 0,
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            progression: ProgressionConfig::default(),
            enemies,
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON (including damage
    /// stats that fail validation) and any validation error otherwise.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`GameConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), archetypes = config.enemies.len(), "config loaded");
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.player.validate()?;
        self.progression.validate()?;
        for enemy in self.enemies.values() {
            enemy.validate()?;
        }
        Ok(())
    }

    /// Looks up an enemy archetype by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownArchetype`] if no archetype has that name.
    pub fn enemy(&self, archetype: &str) -> Result<&EnemyConfig, ConfigError> {
        self.enemies
            .get(archetype)
            .ok_or_else(|| ConfigError::UnknownArchetype(archetype.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
