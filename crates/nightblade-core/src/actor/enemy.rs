//! AI-driven enemy state machine.
//!
//! # Transitions
//!
//! ```text
//! Idle    --target within detection_range--> Chase
//! Idle    --otherwise------------------------> Patrol
//! Patrol  --target within detection_range--> Chase
//! Chase   --target beyond follow_range-----> Patrol
//! Chase   --within attack_range, ready-----> Attack
//! Attack  --windup, active, tail-----------> Retreat
//! Retreat --retreat_duration---------------> Chase
//! any     --non-lethal hit-----------------> Hurt --hurt_duration--> Chase
//! any     --lethal hit---------------------> Dead (removed after removal_delay)
//! ```
//!
//! Invincibility is a separate timer started alongside Hurt; it may outlive
//! the stun.

use glam::Vec2;

use crate::actor::{
    ActorFlags, ActorId, ActorKind, Body, BodyParams, CombatActor, CombatState, DamageOutcome,
    DependencyWarnings, IgnoreReason, Strike,
};
use crate::config::{DamageStats, EnemyConfig};
use crate::error::MissingDependency;
use crate::events::{EventBus, GameEvent};
use crate::health::Health;
use crate::resolver::DamageInfo;
use crate::timer::TimerSet;

/// Horizontal distance at which a waypoint counts as reached.
const WAYPOINT_TOLERANCE: f32 = 0.1;

/// Primary state of an enemy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Deciding what to do
    Idle,
    /// Walking the patrol route
    Patrol,
    /// Closing on the target
    Chase,
    /// Attack in progress (movement frozen)
    Attack,
    /// Hurt-stun
    Hurt,
    /// Backing away after an attack
    Retreat,
    /// Terminal
    Dead,
}

impl From<EnemyState> for CombatState {
    fn from(state: EnemyState) -> Self {
        match state {
            EnemyState::Idle => Self::Idle,
            EnemyState::Patrol => Self::Patrol,
            EnemyState::Chase => Self::Chase,
            EnemyState::Attack => Self::Attacking,
            EnemyState::Hurt => Self::Hurt,
            EnemyState::Retreat => Self::Retreat,
            EnemyState::Dead => Self::Dead,
        }
    }
}

/// Enemy timer names. Declaration order is the expiry priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnemyTimer {
    /// Delay before the hitbox activates
    AttackWindup,
    /// Hitbox active window
    AttackActive,
    /// Remainder of the attack animation
    AttackRecovery,
    /// Backing away
    Retreat,
    /// Hurt-stun
    Hurt,
    /// Damage immunity
    Invincibility,
    /// Waiting at a waypoint
    PatrolPause,
    /// Attack unavailable
    AttackCooldown,
    /// Removal after death
    Despawn,
}

/// What an enemy can sense this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Perception {
    /// Position of the tracked target, if one exists.
    pub target: Option<Vec2>,
}

/// An enemy actor.
#[derive(Debug, Clone)]
pub struct EnemyController {
    id: ActorId,
    archetype: String,
    config: EnemyConfig,
    body: Body,
    health: Health,
    state: EnemyState,
    timers: TimerSet<EnemyTimer>,
    route: Vec<Vec2>,
    waypoint: usize,
    perception: Perception,
    walk_speed: f32,
    attack_variant: u8,
    hit_landed: bool,
    warnings: DependencyWarnings,
}

impl EnemyController {
    /// Creates an enemy of `archetype` at `spawn`. Patrol offsets are relative
    /// to the spawn point.
    #[must_use]
    pub fn new(id: ActorId, archetype: &str, spawn: Vec2, config: &EnemyConfig) -> Self {
        let params = BodyParams {
            gravity_scale: config.gravity_scale,
            ..BodyParams::default()
        };
        Self {
            id,
            archetype: archetype.to_string(),
            body: Body::new(spawn, params),
            health: Health::new(config.max_health),
            state: EnemyState::Idle,
            timers: TimerSet::new(),
            route: config.patrol_route.iter().map(|offset| spawn + *offset).collect(),
            waypoint: 0,
            perception: Perception::default(),
            walk_speed: 0.0,
            attack_variant: 1,
            hit_landed: false,
            warnings: DependencyWarnings::default(),
            config: config.clone(),
        }
    }

    /// Sets what the enemy perceives on the next logic tick.
    pub fn set_perception(&mut self, perception: Perception) {
        self.perception = perception;
    }

    /// Current primary state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Archetype key this enemy was spawned from.
    #[must_use]
    pub fn archetype(&self) -> &str {
        &self.archetype
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Experience granted on death.
    #[must_use]
    pub const fn experience_reward(&self) -> u32 {
        self.config.experience_reward
    }

    /// Which of the two attack variants the current (or last) attack used.
    #[must_use]
    pub const fn attack_variant(&self) -> u8 {
        self.attack_variant
    }

    /// Index of the waypoint currently targeted.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint
    }

    /// Returns `true` while the attack hitbox can register a hit.
    #[must_use]
    pub fn hitbox_active(&self) -> bool {
        self.body.flags.contains(ActorFlags::HITBOX_ACTIVE)
    }

    /// Returns `true` once the removal delay after death has elapsed.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.body.flags.contains(ActorFlags::REMOVED)
    }

    /// Remaining time on `timer`, if running.
    #[must_use]
    pub fn timer_remaining(&self, timer: EnemyTimer) -> Option<f32> {
        self.timers.remaining(timer)
    }

    /// Marks the current hitbox activation as spent.
    ///
    /// Called after a strike from this enemy reached its target, whether or
    /// not the target took damage.
    pub fn register_hit(&mut self) {
        self.hit_landed = true;
    }

    // -------------------------------------------------------------------------
    // Logic tick
    // -------------------------------------------------------------------------

    fn set_state(&mut self, next: EnemyState) {
        if self.state != next {
            tracing::debug!(actor = %self.id, from = ?self.state, to = ?next, "enemy state");
            self.state = next;
        }
    }

    fn on_timer(&mut self, timer: EnemyTimer) {
        match timer {
            EnemyTimer::AttackWindup => {
                if self.state != EnemyState::Attack {
                    return;
                }
                if self.config.damage.is_none() {
                    self.warnings
                        .report(self.id, MissingDependency::DamageStats);
                }
                self.body.flags.insert(ActorFlags::HITBOX_ACTIVE);
                self.hit_landed = false;
                self.timers.start(
                    EnemyTimer::AttackActive,
                    self.config.hitbox_active_duration,
                );
            }
            EnemyTimer::AttackActive => {
                self.body.flags.remove(ActorFlags::HITBOX_ACTIVE);
                if self.state != EnemyState::Attack {
                    return;
                }
                let tail = self.config.attack_animation
                    - self.config.hitbox_activation_delay
                    - self.config.hitbox_active_duration;
                if tail > 0.0 {
                    self.timers.start(EnemyTimer::AttackRecovery, tail);
                } else {
                    self.begin_retreat();
                }
            }
            EnemyTimer::AttackRecovery => {
                if self.state == EnemyState::Attack {
                    self.begin_retreat();
                }
            }
            EnemyTimer::Retreat => {
                if self.state == EnemyState::Retreat {
                    self.set_state(EnemyState::Chase);
                }
            }
            EnemyTimer::Hurt => {
                if self.state == EnemyState::Hurt {
                    self.set_state(EnemyState::Chase);
                }
            }
            EnemyTimer::Invincibility => {
                self.body.flags.remove(ActorFlags::INVINCIBLE);
            }
            EnemyTimer::PatrolPause => {
                if !self.route.is_empty() {
                    self.waypoint = (self.waypoint + 1) % self.route.len();
                }
            }
            EnemyTimer::AttackCooldown => {}
            EnemyTimer::Despawn => {
                self.body.flags.insert(ActorFlags::REMOVED);
                tracing::info!(actor = %self.id, archetype = %self.archetype, "enemy despawned");
            }
        }
    }

    fn begin_retreat(&mut self) {
        self.timers
            .start(EnemyTimer::Retreat, self.config.retreat_duration);
        self.set_state(EnemyState::Retreat);
    }

    fn begin_patrol(&mut self) {
        self.timers.cancel(EnemyTimer::PatrolPause);
        self.set_state(EnemyState::Patrol);
    }

    fn begin_chase(&mut self) {
        self.timers.cancel(EnemyTimer::PatrolPause);
        self.set_state(EnemyState::Chase);
    }

    fn begin_attack(&mut self, target: Vec2) {
        self.walk_speed = 0.0;
        self.body.velocity.x = 0.0;
        self.body.face_toward_x(target.x - self.body.position.x);
        self.attack_variant = if self.attack_variant == 1 { 2 } else { 1 };
        self.timers.start(
            EnemyTimer::AttackWindup,
            self.config.hitbox_activation_delay,
        );
        self.timers
            .start(EnemyTimer::AttackCooldown, self.config.attack_cooldown);
        self.set_state(EnemyState::Attack);
        tracing::debug!(actor = %self.id, variant = self.attack_variant, "enemy attack");
    }

    fn think(&mut self) {
        let target = self.perception.target;
        if target.is_none() {
            self.warnings.report(self.id, MissingDependency::Target);
        }
        let distance = target.map(|t| self.body.position.distance(t));
        let detected = distance.is_some_and(|d| d <= self.config.detection_range);

        match self.state {
            EnemyState::Idle => {
                if detected {
                    self.begin_chase();
                } else {
                    self.begin_patrol();
                }
            }
            EnemyState::Patrol if detected => self.begin_chase(),
            EnemyState::Chase => match (target, distance) {
                (Some(t), Some(d)) if d <= self.config.follow_range => {
                    let ready = !self.timers.is_running(EnemyTimer::AttackCooldown);
                    if d <= self.config.attack_range && ready {
                        self.begin_attack(t);
                    }
                }
                _ => self.begin_patrol(),
            },
            _ => {}
        }

        self.steer(target);
    }

    fn steer(&mut self, target: Option<Vec2>) {
        match self.state {
            EnemyState::Patrol => self.patrol(),
            EnemyState::Chase => {
                if let Some(t) = target {
                    let dx = t.x - self.body.position.x;
                    let in_reach =
                        self.body.position.distance(t) <= self.config.attack_range;
                    self.walk_speed = if in_reach {
                        0.0
                    } else {
                        dx.signum() * self.config.chase_speed
                    };
                    self.body.face_toward_x(dx);
                }
            }
            EnemyState::Retreat => {
                self.walk_speed = match target {
                    Some(t) => {
                        let away = -(t.x - self.body.position.x).signum();
                        self.body.face_toward_x(-away);
                        away * self.config.move_speed
                    }
                    None => 0.0,
                };
            }
            _ => self.walk_speed = 0.0,
        }
    }

    fn patrol(&mut self) {
        let Some(&waypoint) = self.route.get(self.waypoint) else {
            self.warnings.report(self.id, MissingDependency::PatrolRoute);
            self.walk_speed = 0.0;
            return;
        };
        if self.timers.is_running(EnemyTimer::PatrolPause) {
            self.walk_speed = 0.0;
            return;
        }
        let dx = waypoint.x - self.body.position.x;
        if dx.abs() < WAYPOINT_TOLERANCE {
            self.walk_speed = 0.0;
            self.timers
                .start(EnemyTimer::PatrolPause, self.config.pause_duration);
        } else {
            self.walk_speed = dx.signum() * self.config.move_speed;
            self.body.face_toward_x(dx);
        }
    }

    fn die(&mut self, bus: &mut EventBus) {
        self.timers.cancel_all();
        self.walk_speed = 0.0;
        self.body.velocity = Vec2::ZERO;
        self.body
            .flags
            .remove(ActorFlags::HITBOX_ACTIVE | ActorFlags::INVINCIBLE);
        self.body.flags.insert(ActorFlags::PHYSICS_DISABLED);
        self.set_state(EnemyState::Dead);
        self.timers
            .start(EnemyTimer::Despawn, self.config.removal_delay);

        tracing::info!(
            actor = %self.id,
            archetype = %self.archetype,
            reward = self.config.experience_reward,
            "enemy died"
        );
        bus.publish(Some(self.id), GameEvent::Death);
        bus.publish(
            Some(self.id),
            GameEvent::EnemyDeath {
                experience_reward: self.config.experience_reward,
                enemy_name: self.config.name.clone(),
            },
        );
    }
}

impl CombatActor for EnemyController {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Enemy
    }

    fn combat_state(&self) -> CombatState {
        self.state.into()
    }

    fn health(&self) -> Health {
        self.health
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn damage_stats(&self) -> Option<&DamageStats> {
        self.config.damage.as_ref()
    }

    fn update(&mut self, dt: f32, _bus: &mut EventBus) -> Option<Strike> {
        if self.is_removed() {
            return None;
        }

        self.timers.advance(dt);
        while let Some(timer) = self.timers.pop_expired() {
            self.on_timer(timer);
        }
        if self.state == EnemyState::Dead {
            return None;
        }

        self.think();

        let armed = self.hitbox_active() && !self.hit_landed && self.config.damage.is_some();
        armed.then(|| Strike {
            attacker: self.id,
            origin: self.body.position,
            reach: self.config.hitbox_reach,
            facing: self.body.facing(),
            base_damage: None,
        })
    }

    fn fixed_update(&mut self, dt: f32) {
        if !self.body.is_grounded() {
            return;
        }
        match self.state {
            EnemyState::Dead => {}
            EnemyState::Hurt => {
                let decay = (1.0 - self.config.ground_friction * dt).max(0.0);
                self.body.velocity.x *= decay;
            }
            EnemyState::Attack => self.body.velocity.x = 0.0,
            _ => self.body.velocity.x = self.walk_speed,
        }
    }

    fn take_damage(&mut self, info: &DamageInfo, bus: &mut EventBus) -> DamageOutcome {
        if self.state == EnemyState::Dead {
            return DamageOutcome::Ignored(IgnoreReason::Dead);
        }
        if self.body.flags.contains(ActorFlags::INVINCIBLE) {
            return DamageOutcome::Ignored(IgnoreReason::Invincible);
        }

        let lost = self.health.damage(info.amount());
        bus.publish(
            Some(self.id),
            GameEvent::HealthChanged {
                current: self.health.current(),
                max: self.health.max(),
            },
        );

        if self.health.is_depleted() {
            self.die(bus);
            return DamageOutcome::Killed { damage: lost };
        }

        self.timers.cancel_where(|t| {
            matches!(
                t,
                EnemyTimer::AttackWindup
                    | EnemyTimer::AttackActive
                    | EnemyTimer::AttackRecovery
                    | EnemyTimer::Retreat
                    | EnemyTimer::PatrolPause
            )
        });
        self.body.flags.remove(ActorFlags::HITBOX_ACTIVE);
        self.walk_speed = 0.0;
        self.body.velocity = Vec2::ZERO;
        self.body
            .apply_knockback(info.knockback_direction(), info.knockback_force());

        self.timers.start(EnemyTimer::Hurt, self.config.hurt_duration);
        if self.config.invincibility_duration > 0.0 {
            self.body.flags.insert(ActorFlags::INVINCIBLE);
            self.timers.start(
                EnemyTimer::Invincibility,
                self.config.invincibility_duration,
            );
        }
        self.set_state(EnemyState::Hurt);

        DamageOutcome::Applied {
            damage: lost,
            remaining: self.health.current(),
        }
    }
}
