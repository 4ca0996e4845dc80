//! Physics integration for actor bodies.
//!
//! The `PhysicsResolver` runs once per fixed step, after every actor has
//! written its intended velocity in `fixed_update`:
//!
//! 1. Gravity, scaled per body and amplified while falling
//! 2. Terminal fall speed clamp
//! 3. `position += velocity * dt`
//! 4. Ground contact against a flat floor, which sets or clears `GROUNDED`
//!
//! # Fixed Timestep
//!
//! The default step is 1/60 second. Logic ticks may run at any rate; physics
//! always advances in these fixed increments so movement stays reproducible.

use crate::actor::{ActorFlags, Body};
use crate::config::WorldConfig;

/// Fixed timestep for physics integration (1/60 second, about 16.67 ms).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Integrates bodies against a flat ground plane.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use nightblade_core::actor::{Body, BodyParams};
/// use nightblade_core::config::WorldConfig;
/// use nightblade_core::resolver::PhysicsResolver;
///
/// let physics = PhysicsResolver::new(&WorldConfig::default());
/// let mut body = Body::new(Vec2::new(0.0, 2.0), BodyParams::default());
///
/// for _ in 0..120 {
///     physics.step(&mut body);
/// }
/// assert!(body.is_grounded());
/// assert_eq!(body.position.y, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsResolver {
    dt: f32,
    gravity: f32,
    ground_height: f32,
}

impl PhysicsResolver {
    /// Creates a resolver from the world settings.
    #[must_use]
    pub fn new(world: &WorldConfig) -> Self {
        Self {
            dt: world.fixed_dt,
            gravity: world.gravity,
            ground_height: world.ground_height,
        }
    }

    /// Returns the timestep used for integration.
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    /// Height of the ground plane.
    #[must_use]
    pub const fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// Advances one body by one fixed step. Bodies flagged
    /// `PHYSICS_DISABLED` are left untouched.
    pub fn step(&self, body: &mut Body) {
        if body.flags.contains(ActorFlags::PHYSICS_DISABLED) {
            return;
        }
        let dt = self.dt;
        let params = body.params;

        let mut gravity = self.gravity * params.gravity_scale;
        if body.velocity.y < 0.0 {
            gravity *= params.fall_gravity_multiplier;
        }
        body.velocity.y -= gravity * dt;
        if let Some(max_fall) = params.max_fall_speed {
            body.velocity.y = body.velocity.y.max(-max_fall);
        }

        body.position += body.velocity * dt;

        if body.position.y <= self.ground_height && body.velocity.y <= 0.0 {
            body.position.y = self.ground_height;
            body.velocity.y = 0.0;
            body.flags.insert(ActorFlags::GROUNDED);
        } else {
            body.flags.remove(ActorFlags::GROUNDED);
        }
    }
}
