//! Actors: the player and enemy combat state machines.
//!
//! Both variants implement [`CombatActor`], the shared contract the simulation
//! drives every tick:
//!
//! - [`CombatActor::update`]: the variable-rate logic tick. Advances timers,
//!   evaluates transitions and may emit a [`Strike`] for the hit resolver.
//! - [`CombatActor::fixed_update`]: the fixed-rate physics intent. Writes the
//!   velocity the actor wants this step; gravity and integration happen in
//!   [`PhysicsResolver`](crate::resolver::PhysicsResolver).
//! - [`CombatActor::take_damage`]: synchronous damage application, called by
//!   the hit resolver at the moment of hit detection.
//!
//! # Architecture
//!
//! Each controller composes the same building blocks: a [`Body`] (position,
//! velocity, orthogonal [`ActorFlags`]), a [`Health`], and a
//! [`TimerSet`](crate::timer::TimerSet) keyed by the controller's own timer
//! names. The primary state is a single enum value per actor
//! ([`PlayerState`] or [`EnemyState`]), so exactly one primary state is active
//! at any time; cooldowns and invincibility are timers or flags beside it.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nightblade_core::actor::{ActorId, CombatActor, CombatState, PlayerController};
//! use nightblade_core::config::PlayerConfig;
//!
//! let player = PlayerController::new(ActorId::new(0), Vec2::ZERO, &PlayerConfig::default());
//! assert_eq!(player.combat_state(), CombatState::Idle);
//! assert!(!player.is_dead());
//! ```

mod enemy;
mod player;

pub use enemy::{EnemyController, EnemyState, EnemyTimer, Perception};
pub use player::{PlayerController, PlayerInput, PlayerState, PlayerTimer};

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::DamageStats;
use crate::error::MissingDependency;
use crate::events::EventBus;
use crate::health::Health;
use crate::resolver::DamageInfo;

// =============================================================================
// Identity
// =============================================================================

/// Unique identifier for an actor within an arena.
///
/// Ordered by numeric value; the arena iterates actors in this order.
///
/// # Example
///
/// ```
/// use nightblade_core::actor::ActorId;
///
/// let id = ActorId::new(7);
/// assert_eq!(id.as_u64(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates an `ActorId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Which state machine drives an actor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Input-driven player character
    Player,
    /// AI-driven enemy
    Enemy,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
        }
    }
}

// =============================================================================
// State
// =============================================================================

/// Primary combat state, common to both actor kinds.
///
/// Each kind occupies a subset: the player never patrols and the enemy never
/// dashes. See [`PlayerState`] and [`EnemyState`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    /// Standing still
    Idle,
    /// Player moving under input
    Moving,
    /// Enemy walking its patrol route
    Patrol,
    /// Enemy closing on its target
    Chase,
    /// Attack in progress
    Attacking,
    /// Hurt-stun after a non-lethal hit
    Hurt,
    /// Enemy backing away after an attack
    Retreat,
    /// Player dash in progress
    Dashing,
    /// Player crouching
    Crouching,
    /// Terminal
    Dead,
}

bitflags! {
    /// Orthogonal per-actor conditions carried beside the primary state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ActorFlags: u8 {
        /// Standing on the ground
        const GROUNDED = 1 << 0;
        /// Excluded from physics integration (set on death)
        const PHYSICS_DISABLED = 1 << 1;
        /// Attack hitbox can register hits
        const HITBOX_ACTIVE = 1 << 2;
        /// Incoming damage is ignored
        const INVINCIBLE = 1 << 3;
        /// Facing -X
        const FACING_LEFT = 1 << 4;
        /// Ready to be removed from the arena
        const REMOVED = 1 << 5;
    }
}

// =============================================================================
// Body
// =============================================================================

/// Per-body physics tuning consumed by the physics resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyParams {
    /// Gravity multiplier relative to the world gravity.
    pub gravity_scale: f32,
    /// Extra gravity multiplier while moving downward.
    pub fall_gravity_multiplier: f32,
    /// Terminal downward speed (magnitude). `None` leaves falls unbounded.
    pub max_fall_speed: Option<f32>,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            fall_gravity_multiplier: 1.0,
            max_fall_speed: None,
        }
    }
}

/// Kinematic state of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Orthogonal conditions.
    pub flags: ActorFlags,
    /// Physics tuning.
    pub params: BodyParams,
}

impl Body {
    /// Creates a resting body at `position`, facing +X.
    #[must_use]
    pub fn new(position: Vec2, params: BodyParams) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            flags: ActorFlags::empty(),
            params,
        }
    }

    /// Returns `true` while standing on the ground.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.flags.contains(ActorFlags::GROUNDED)
    }

    /// Unit vector along the facing direction (`+X` or `-X`).
    #[must_use]
    pub fn facing(&self) -> Vec2 {
        if self.flags.contains(ActorFlags::FACING_LEFT) {
            Vec2::NEG_X
        } else {
            Vec2::X
        }
    }

    /// Turns toward the sign of `x`. Zero keeps the current facing.
    pub fn face_toward_x(&mut self, x: f32) {
        if x < 0.0 {
            self.flags.insert(ActorFlags::FACING_LEFT);
        } else if x > 0.0 {
            self.flags.remove(ActorFlags::FACING_LEFT);
        }
    }

    /// Replaces the velocity with `direction * force`.
    pub fn apply_knockback(&mut self, direction: Vec2, force: f32) {
        self.velocity = direction * force;
    }
}

// =============================================================================
// Combat Contract
// =============================================================================

/// Why a hit was ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The target is already dead.
    Dead,
    /// The target's invincibility window is running.
    Invincible,
    /// The target is in hurt-stun (player only).
    Hurt,
}

/// Result of [`CombatActor::take_damage`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// The hit landed and the target survived.
    Applied {
        /// Health removed
        damage: u32,
        /// Health left
        remaining: u32,
    },
    /// The hit landed and killed the target.
    Killed {
        /// Health removed
        damage: u32,
    },
    /// The hit had no effect.
    Ignored(IgnoreReason),
}

impl DamageOutcome {
    /// Returns `true` if health changed.
    #[must_use]
    pub const fn landed(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// An attack that is ready to be resolved against whoever is in reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    /// Attacking actor.
    pub attacker: ActorId,
    /// Center of the hit area.
    pub origin: Vec2,
    /// Radius of the hit area.
    pub reach: f32,
    /// Attacker facing, used when the knockback direction is degenerate.
    pub facing: Vec2,
    /// Fixed base damage; `None` samples the attacker's damage range.
    pub base_damage: Option<u32>,
}

/// Shared contract of the player and enemy state machines.
pub trait CombatActor {
    /// Identifier.
    fn id(&self) -> ActorId;

    /// Which state machine this is.
    fn kind(&self) -> ActorKind;

    /// Current primary state.
    fn combat_state(&self) -> CombatState;

    /// Health snapshot.
    fn health(&self) -> Health;

    /// Kinematic state.
    fn body(&self) -> &Body;

    /// Mutable kinematic state, for the physics resolver.
    fn body_mut(&mut self) -> &mut Body;

    /// Damage parameters used when this actor's strikes resolve.
    fn damage_stats(&self) -> Option<&DamageStats>;

    /// Logic tick: advances timers and evaluates transitions.
    fn update(&mut self, dt: f32, bus: &mut EventBus) -> Option<Strike>;

    /// Physics tick: writes the velocity the actor wants for this step.
    fn fixed_update(&mut self, dt: f32);

    /// Applies a resolved hit.
    fn take_damage(&mut self, info: &DamageInfo, bus: &mut EventBus) -> DamageOutcome;

    /// Returns `true` once the actor is dead.
    fn is_dead(&self) -> bool {
        self.combat_state() == CombatState::Dead
    }

    /// Orthogonal flags.
    fn flags(&self) -> ActorFlags {
        self.body().flags
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Tracks which missing dependencies an actor has already reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DependencyWarnings(Vec<MissingDependency>);

impl DependencyWarnings {
    /// Logs `missing` at `warn` the first time it is seen for `actor`.
    pub(crate) fn report(&mut self, actor: ActorId, missing: MissingDependency) {
        if self.0.contains(&missing) {
            return;
        }
        self.0.push(missing);
        tracing::warn!(actor = %actor, error = %missing, "behavior disabled");
    }

    #[cfg(test)]
    pub(crate) fn has_reported(&self, missing: MissingDependency) -> bool {
        self.0.contains(&missing)
    }
}
