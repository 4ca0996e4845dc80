//! Input-driven player state machine.
//!
//! # Gating
//!
//! | Action | Requires | Blocked while |
//! |--------|----------|---------------|
//! | Jump   | jump buffer running, and coyote time running or an air jump left | Attacking, Dashing, Crouching |
//! | Dash   | dash cooldown ready, non-zero horizontal input | Attacking, Crouching, Dashing |
//! | Attack | attack cooldown ready | Dashing, Crouching, Attacking |
//! | Crouch | grounded, crouch held | Attacking, Dashing |
//!
//! Nothing is accepted while Hurt or Dead. The Hurt window doubles as the
//! player's invincibility window.
//!
//! # Attack timeline
//!
//! ```text
//! t = 0                      accept input, pick combo step, start timers
//! t = duration * hit_delay   AttackHit: emit a Strike for the hit resolver
//! t = duration               AttackEnd: back to Idle/Moving
//! t = attack_cooldown        next attack allowed
//! t = combo_reset_time       combo returns to the first step
//! ```

use glam::Vec2;

use crate::actor::{
    ActorFlags, ActorId, ActorKind, Body, BodyParams, CombatActor, CombatState, DamageOutcome,
    IgnoreReason, Strike,
};
use crate::config::{DamageStats, PlayerConfig};
use crate::events::{EventBus, GameEvent};
use crate::health::Health;
use crate::progression::{DerivedStats, ProgressionTarget};
use crate::resolver::DamageInfo;
use crate::timer::TimerSet;

/// Horizontal input magnitude treated as "no input".
const INPUT_DEADZONE: f32 = 0.01;

/// Primary state of the player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// No horizontal input
    Idle,
    /// Horizontal input held
    Moving,
    /// Attack in progress
    Attacking,
    /// Dash in progress
    Dashing,
    /// Crouching on the ground
    Crouching,
    /// Hurt-stun
    Hurt,
    /// Terminal
    Dead,
}

impl From<PlayerState> for CombatState {
    fn from(state: PlayerState) -> Self {
        match state {
            PlayerState::Idle => Self::Idle,
            PlayerState::Moving => Self::Moving,
            PlayerState::Attacking => Self::Attacking,
            PlayerState::Dashing => Self::Dashing,
            PlayerState::Crouching => Self::Crouching,
            PlayerState::Hurt => Self::Hurt,
            PlayerState::Dead => Self::Dead,
        }
    }
}

/// Player timer names. Declaration order is the expiry priority.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerTimer {
    /// Delay until the current attack resolves its hit
    AttackHit,
    /// End of the current attack
    AttackEnd,
    /// End of the current dash
    Dash,
    /// End of hurt-stun
    Hurt,
    /// Landing pose
    Landing,
    /// Remembered jump press
    JumpBuffer,
    /// Grace period after leaving the ground
    Coyote,
    /// Attack unavailable
    AttackCooldown,
    /// Dash unavailable
    DashCooldown,
    /// Combo returns to its first step on expiry
    ComboReset,
}

/// Input snapshot for one logic tick.
///
/// `*_pressed` fields are edges (true on the tick the button went down);
/// the others are levels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    /// Horizontal axis in `[-1, 1]`.
    pub move_x: f32,
    /// Jump went down this tick.
    pub jump_pressed: bool,
    /// Jump is held.
    pub jump_held: bool,
    /// Dash went down this tick.
    pub dash_pressed: bool,
    /// Attack went down this tick.
    pub attack_pressed: bool,
    /// Crouch is held.
    pub crouch_held: bool,
}

/// The player character.
#[derive(Debug, Clone)]
pub struct PlayerController {
    id: ActorId,
    config: PlayerConfig,
    body: Body,
    health: Health,
    state: PlayerState,
    timers: TimerSet<PlayerTimer>,
    input: PlayerInput,
    damage: DamageStats,
    defense: u32,
    combo_step: usize,
    pending_step: Option<usize>,
    air_jumps_left: u32,
    dash_direction: f32,
    jump_cut_armed: bool,
    was_grounded: bool,
    falling: bool,
    last_air_velocity_y: f32,
}

impl PlayerController {
    /// Creates a player at `position` with full health.
    #[must_use]
    pub fn new(id: ActorId, position: Vec2, config: &PlayerConfig) -> Self {
        let params = BodyParams {
            gravity_scale: config.gravity_scale,
            fall_gravity_multiplier: config.fall_gravity_multiplier,
            max_fall_speed: Some(config.max_fall_speed),
        };
        Self {
            id,
            body: Body::new(position, params),
            health: Health::new(config.max_health),
            state: PlayerState::Idle,
            timers: TimerSet::new(),
            input: PlayerInput::default(),
            damage: config.damage,
            defense: config.defense,
            combo_step: 0,
            pending_step: None,
            air_jumps_left: config.extra_jumps,
            dash_direction: 1.0,
            jump_cut_armed: false,
            was_grounded: false,
            falling: false,
            last_air_velocity_y: 0.0,
            config: config.clone(),
        }
    }

    /// Sets the input read by the next logic and physics ticks.
    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input;
    }

    /// Input currently applied.
    #[must_use]
    pub const fn input(&self) -> PlayerInput {
        self.input
    }

    /// Current primary state.
    #[must_use]
    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// Index of the combo step the next attack will use.
    #[must_use]
    pub const fn combo_step(&self) -> usize {
        self.combo_step
    }

    /// Air jumps left before landing.
    #[must_use]
    pub const fn air_jumps_left(&self) -> u32 {
        self.air_jumps_left
    }

    /// Flat damage reduction.
    #[must_use]
    pub const fn defense(&self) -> u32 {
        self.defense
    }

    /// Returns `true` while the landing pose plays.
    #[must_use]
    pub fn is_landing(&self) -> bool {
        self.timers.is_running(PlayerTimer::Landing)
    }

    /// Returns `true` when the attack cooldown has elapsed.
    #[must_use]
    pub fn attack_ready(&self) -> bool {
        !self.timers.is_running(PlayerTimer::AttackCooldown)
    }

    /// Returns `true` when the dash cooldown has elapsed.
    #[must_use]
    pub fn dash_ready(&self) -> bool {
        !self.timers.is_running(PlayerTimer::DashCooldown)
    }

    /// Remaining time on `timer`, if running.
    #[must_use]
    pub fn timer_remaining(&self, timer: PlayerTimer) -> Option<f32> {
        self.timers.remaining(timer)
    }

    // -------------------------------------------------------------------------
    // Logic tick
    // -------------------------------------------------------------------------

    fn set_state(&mut self, next: PlayerState) {
        if self.state != next {
            tracing::debug!(actor = %self.id, from = ?self.state, to = ?next, "player state");
            self.state = next;
        }
    }

    fn locomotion_state(&self) -> PlayerState {
        if self.input.move_x.abs() > INPUT_DEADZONE {
            PlayerState::Moving
        } else {
            PlayerState::Idle
        }
    }

    fn on_timer(&mut self, timer: PlayerTimer) -> Option<Strike> {
        match timer {
            PlayerTimer::AttackHit => {
                let step = self.pending_step.take()?;
                if self.state != PlayerState::Attacking {
                    return None;
                }
                return Some(Strike {
                    attacker: self.id,
                    origin: self.body.position,
                    reach: self.config.attack_range,
                    facing: self.body.facing(),
                    base_damage: self.config.combo.get(step).and_then(|s| s.base_damage),
                });
            }
            PlayerTimer::AttackEnd => {
                if self.state == PlayerState::Attacking {
                    let next = self.locomotion_state();
                    self.set_state(next);
                }
            }
            PlayerTimer::Dash => {
                if self.state == PlayerState::Dashing {
                    self.end_dash();
                    let next = self.locomotion_state();
                    self.set_state(next);
                }
            }
            PlayerTimer::Hurt => {
                self.body.flags.remove(ActorFlags::INVINCIBLE);
                if self.state == PlayerState::Hurt {
                    let next = self.locomotion_state();
                    self.set_state(next);
                }
            }
            PlayerTimer::ComboReset => {
                self.combo_step = 0;
            }
            PlayerTimer::Landing
            | PlayerTimer::JumpBuffer
            | PlayerTimer::Coyote
            | PlayerTimer::AttackCooldown
            | PlayerTimer::DashCooldown => {}
        }
        None
    }

    fn track_ground(&mut self, bus: &mut EventBus) {
        let grounded = self.body.is_grounded();
        let vy = self.body.velocity.y;

        if grounded {
            if !self.was_grounded && self.last_air_velocity_y < 0.0 {
                self.timers
                    .start(PlayerTimer::Landing, self.config.landing_duration);
                bus.publish(Some(self.id), GameEvent::Land);
            }
            self.falling = false;
            self.last_air_velocity_y = 0.0;
            if vy <= 0.0 {
                self.air_jumps_left = self.config.extra_jumps;
                self.jump_cut_armed = false;
                self.timers.start(PlayerTimer::Coyote, self.config.coyote_time);
            }
        } else {
            if vy < 0.0 && !self.falling {
                self.falling = true;
                bus.publish(Some(self.id), GameEvent::Fall);
            }
            self.last_air_velocity_y = vy;
        }
        self.was_grounded = grounded;
    }

    fn handle_input(&mut self, bus: &mut EventBus) {
        let input = self.input;

        if input.jump_pressed {
            self.timers
                .start(PlayerTimer::JumpBuffer, self.config.jump_buffer_time);
        }
        if !input.jump_held && self.jump_cut_armed && self.body.velocity.y > 0.0 {
            self.body.velocity.y *= self.config.jump_cut_multiplier;
            self.jump_cut_armed = false;
        }

        self.try_crouch(input, bus);
        self.try_jump(bus);
        self.try_dash(input);
        if input.attack_pressed {
            self.try_attack(bus);
        }

        if matches!(self.state, PlayerState::Idle | PlayerState::Moving) {
            let next = self.locomotion_state();
            self.set_state(next);
        }
        if !matches!(self.state, PlayerState::Attacking | PlayerState::Dashing) {
            self.body.face_toward_x(input.move_x);
        }
    }

    fn try_crouch(&mut self, input: PlayerInput, bus: &mut EventBus) {
        let grounded = self.body.is_grounded();
        match self.state {
            PlayerState::Idle | PlayerState::Moving if input.crouch_held && grounded => {
                self.set_state(PlayerState::Crouching);
                bus.publish(Some(self.id), GameEvent::Crouch);
            }
            PlayerState::Crouching if !input.crouch_held || !grounded => {
                let next = self.locomotion_state();
                self.set_state(next);
            }
            _ => {}
        }
    }

    fn try_jump(&mut self, bus: &mut EventBus) {
        if !self.timers.is_running(PlayerTimer::JumpBuffer) {
            return;
        }
        if matches!(
            self.state,
            PlayerState::Attacking | PlayerState::Dashing | PlayerState::Crouching
        ) {
            return;
        }
        let from_ground = self.timers.cancel(PlayerTimer::Coyote);
        if !from_ground {
            if self.air_jumps_left == 0 {
                return;
            }
            self.air_jumps_left -= 1;
        }

        self.timers.cancel(PlayerTimer::JumpBuffer);
        self.timers.cancel(PlayerTimer::Landing);
        self.body.velocity.y = self.config.jump_force;
        self.body.flags.remove(ActorFlags::GROUNDED);
        self.jump_cut_armed = true;
        self.falling = false;
        bus.publish(Some(self.id), GameEvent::Jump);
    }

    fn try_dash(&mut self, input: PlayerInput) {
        if !input.dash_pressed || !self.dash_ready() || input.move_x.abs() <= INPUT_DEADZONE {
            return;
        }
        if matches!(
            self.state,
            PlayerState::Attacking | PlayerState::Crouching | PlayerState::Dashing
        ) {
            return;
        }
        self.dash_direction = input.move_x.signum();
        self.body.face_toward_x(self.dash_direction);
        self.body.params.gravity_scale = 0.0;
        self.body.velocity = Vec2::new(self.dash_direction * self.config.dash_speed, 0.0);
        self.timers.start(PlayerTimer::Dash, self.config.dash_time);
        self.set_state(PlayerState::Dashing);
    }

    fn end_dash(&mut self) {
        self.body.params.gravity_scale = self.config.gravity_scale;
        self.timers
            .start(PlayerTimer::DashCooldown, self.config.dash_cooldown);
    }

    fn try_attack(&mut self, bus: &mut EventBus) {
        if !self.attack_ready() {
            return;
        }
        if matches!(
            self.state,
            PlayerState::Dashing | PlayerState::Crouching | PlayerState::Attacking
        ) {
            return;
        }

        let step = self.combo_step;
        self.combo_step = (step + 1) % self.config.combo.len().max(1);
        self.pending_step = Some(step);

        let duration = self.config.attack_duration;
        self.timers.start(
            PlayerTimer::AttackHit,
            duration * self.config.hit_delay_fraction,
        );
        self.timers.start(PlayerTimer::AttackEnd, duration);
        self.timers
            .start(PlayerTimer::AttackCooldown, self.config.attack_cooldown);
        self.timers
            .start(PlayerTimer::ComboReset, self.config.combo_reset_time);

        self.set_state(PlayerState::Attacking);
        tracing::debug!(actor = %self.id, step, "player attack");
        bus.publish(Some(self.id), GameEvent::Attack);
    }

    fn die(&mut self, bus: &mut EventBus) {
        self.timers.cancel_all();
        self.pending_step = None;
        self.body.velocity = Vec2::ZERO;
        self.body
            .flags
            .remove(ActorFlags::HITBOX_ACTIVE | ActorFlags::INVINCIBLE);
        self.body.flags.insert(ActorFlags::PHYSICS_DISABLED);
        self.set_state(PlayerState::Dead);
        tracing::info!(actor = %self.id, "player died");
        bus.publish(Some(self.id), GameEvent::Death);
    }

    // -------------------------------------------------------------------------
    // Physics tick
    // -------------------------------------------------------------------------

    fn run(&mut self, dt: f32) {
        let cfg = &self.config;
        let grounded = self.body.is_grounded();

        let mut target = self.input.move_x.clamp(-1.0, 1.0) * cfg.max_speed;
        if matches!(self.state, PlayerState::Attacking | PlayerState::Crouching) {
            target *= cfg.encumbered_speed_factor;
        }

        let accelerating = target.abs() > INPUT_DEADZONE;
        let mut rate = if accelerating {
            cfg.acceleration
        } else {
            cfg.deceleration
        };
        if !grounded {
            rate *= if accelerating {
                cfg.air_acceleration_multiplier
            } else {
                cfg.air_deceleration_multiplier
            };
            let vy = self.body.velocity.y.abs();
            if vy < cfg.apex_threshold {
                let apex_point = 1.0 - vy / cfg.apex_threshold;
                rate *= 1.0 + cfg.apex_bonus * apex_point;
            }
        }

        let vx = self.body.velocity.x;
        let diff = target - vx;
        if diff.abs() <= f32::EPSILON {
            return;
        }
        let force = (diff.abs() * rate).powf(0.9) * diff.signum();
        let next = vx + force * dt;
        // no overshoot past the target speed
        self.body.velocity.x = if (target - next).signum() == diff.signum() {
            next
        } else {
            target
        };
    }
}

impl CombatActor for PlayerController {
    fn id(&self) -> ActorId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        ActorKind::Player
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
        Some(&self.damage)
    }

    fn update(&mut self, dt: f32, bus: &mut EventBus) -> Option<Strike> {
        if self.state == PlayerState::Dead {
            return None;
        }

        self.timers.advance(dt);
        let mut strike = None;
        while let Some(timer) = self.timers.pop_expired() {
            if let Some(s) = self.on_timer(timer) {
                strike = Some(s);
            }
        }

        self.track_ground(bus);
        if self.state != PlayerState::Hurt {
            self.handle_input(bus);
        }
        strike
    }

    fn fixed_update(&mut self, dt: f32) {
        match self.state {
            PlayerState::Dead | PlayerState::Hurt => {}
            PlayerState::Dashing => {
                self.body.velocity = Vec2::new(self.dash_direction * self.config.dash_speed, 0.0);
            }
            _ => self.run(dt),
        }
    }

    fn take_damage(&mut self, info: &DamageInfo, bus: &mut EventBus) -> DamageOutcome {
        match self.state {
            PlayerState::Dead => return DamageOutcome::Ignored(IgnoreReason::Dead),
            PlayerState::Hurt => return DamageOutcome::Ignored(IgnoreReason::Hurt),
            _ => {}
        }

        let damage = info.amount().saturating_sub(self.defense);
        let lost = self.health.damage(damage);
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

        if self.state == PlayerState::Dashing {
            self.end_dash();
        }
        self.timers.cancel_where(|t| {
            matches!(
                t,
                PlayerTimer::AttackHit
                    | PlayerTimer::AttackEnd
                    | PlayerTimer::Dash
                    | PlayerTimer::Landing
                    | PlayerTimer::JumpBuffer
            )
        });
        self.pending_step = None;
        self.jump_cut_armed = false;

        self.body.velocity = Vec2::ZERO;
        self.body
            .apply_knockback(info.knockback_direction(), info.knockback_force());
        self.body.flags.insert(ActorFlags::INVINCIBLE);
        self.timers.start(PlayerTimer::Hurt, self.config.hurt_duration);
        self.set_state(PlayerState::Hurt);
        bus.publish(Some(self.id), GameEvent::TakeDamage);

        DamageOutcome::Applied {
            damage: lost,
            remaining: self.health.current(),
        }
    }
}

impl ProgressionTarget for PlayerController {
    fn apply_derived_stats(&mut self, stats: &DerivedStats, bus: &mut EventBus) {
        self.damage = stats.damage;
        self.defense = stats.defense;
        self.health.set_max(stats.max_health);
        self.health.heal(self.health.max());
        bus.publish(
            Some(self.id),
            GameEvent::HealthChanged {
                current: self.health.current(),
                max: self.health.max(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComboStep;

    const DT: f32 = 1.0 / 60.0;

    fn grounded_player(config: &PlayerConfig) -> PlayerController {
        let mut player = PlayerController::new(ActorId::new(0), Vec2::ZERO, config);
        player.body.flags.insert(ActorFlags::GROUNDED);
        player
    }

    fn press(player: &mut PlayerController, input: PlayerInput, bus: &mut EventBus) -> Option<Strike> {
        player.set_input(input);
        player.update(DT, bus)
    }

    fn attack() -> PlayerInput {
        PlayerInput {
            attack_pressed: true,
            ..PlayerInput::default()
        }
    }

    fn hit(amount: u32) -> DamageInfo {
        DamageInfo::new(amount, false, 1.0, 4.0, Vec2::new(-1.0, 0.0))
    }

    fn count(bus: &EventBus, name: &str) -> usize {
        bus.events().iter().filter(|r| r.event.name() == name).count()
    }

    /// Runs idle logic ticks for `seconds`.
    fn idle(player: &mut PlayerController, seconds: f32, bus: &mut EventBus) -> Vec<Strike> {
        player.set_input(PlayerInput::default());
        let steps = (seconds / DT).round() as usize;
        (0..steps).filter_map(|_| player.update(DT, bus)).collect()
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn second_press_during_cooldown_is_ignored() {
            let config = PlayerConfig {
                attack_cooldown: 1.0,
                combo_reset_time: 2.0,
                ..PlayerConfig::default()
            };
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            press(&mut player, attack(), &mut bus);
            assert_eq!(player.state(), PlayerState::Attacking);
            assert_eq!(player.combo_step(), 1);

            idle(&mut player, 0.2, &mut bus);
            press(&mut player, attack(), &mut bus);

            assert_eq!(count(&bus, "Attack"), 1);
            assert_eq!(player.combo_step(), 1);

            // still blocked after the swing ends but before the cooldown does
            idle(&mut player, 0.5, &mut bus);
            assert_eq!(player.state(), PlayerState::Idle);
            press(&mut player, attack(), &mut bus);
            assert_eq!(count(&bus, "Attack"), 1);

            idle(&mut player, 0.3, &mut bus);
            press(&mut player, attack(), &mut bus);
            assert_eq!(count(&bus, "Attack"), 2);
            assert_eq!(player.combo_step(), 2);
        }

        #[test]
        fn strike_resolves_after_hit_delay() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            assert!(press(&mut player, attack(), &mut bus).is_none());
            let strikes = idle(&mut player, 0.2, &mut bus);
            assert_eq!(strikes.len(), 1);

            let strike = strikes[0];
            assert_eq!(strike.attacker, ActorId::new(0));
            assert_eq!(strike.base_damage, None);
            assert!((strike.reach - config.attack_range).abs() < f32::EPSILON);
        }

        #[test]
        fn combo_cycles_and_final_step_uses_override() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            let mut strikes = Vec::new();
            for _ in 0..3 {
                press(&mut player, attack(), &mut bus);
                strikes.extend(idle(&mut player, 0.7, &mut bus));
            }
            assert_eq!(strikes.len(), 3);
            assert_eq!(strikes[2].base_damage, Some(30));
            assert_eq!(player.combo_step(), 0);
        }

        #[test]
        fn combo_resets_after_idle_timeout() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            press(&mut player, attack(), &mut bus);
            idle(&mut player, 0.7, &mut bus);
            assert_eq!(player.combo_step(), 1);

            idle(&mut player, 0.5, &mut bus);
            assert_eq!(player.combo_step(), 0);
        }

        #[test]
        fn single_step_combo_stays_on_first_step() {
            let config = PlayerConfig {
                combo: vec![ComboStep {
                    base_damage: Some(5),
                }],
                ..PlayerConfig::default()
            };
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();
            press(&mut player, attack(), &mut bus);
            assert_eq!(player.combo_step(), 0);
        }

        #[test]
        fn crouching_blocks_attack() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            let crouch = PlayerInput {
                crouch_held: true,
                ..PlayerInput::default()
            };
            press(&mut player, crouch, &mut bus);
            assert_eq!(player.state(), PlayerState::Crouching);
            assert_eq!(count(&bus, "Crouch"), 1);

            press(
                &mut player,
                PlayerInput {
                    attack_pressed: true,
                    ..crouch
                },
                &mut bus,
            );
            assert_eq!(count(&bus, "Attack"), 0);
            assert_eq!(player.state(), PlayerState::Crouching);
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn ground_jump_consumes_coyote_then_air_jump() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();
            idle(&mut player, DT, &mut bus);

            let jump = PlayerInput {
                jump_pressed: true,
                jump_held: true,
                ..PlayerInput::default()
            };
            press(&mut player, jump, &mut bus);
            assert_eq!(count(&bus, "Jump"), 1);
            assert!(!player.body().is_grounded());
            assert_eq!(player.air_jumps_left(), config.extra_jumps);

            press(&mut player, jump, &mut bus);
            assert_eq!(count(&bus, "Jump"), 2);
            assert_eq!(player.air_jumps_left(), 0);

            press(&mut player, jump, &mut bus);
            assert_eq!(count(&bus, "Jump"), 2);
        }

        #[test]
        fn jump_blocked_while_attacking_then_buffered() {
            let config = PlayerConfig {
                jump_buffer_time: 1.0,
                ..PlayerConfig::default()
            };
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();
            idle(&mut player, DT, &mut bus);

            press(&mut player, attack(), &mut bus);
            press(
                &mut player,
                PlayerInput {
                    jump_pressed: true,
                    jump_held: true,
                    ..PlayerInput::default()
                },
                &mut bus,
            );
            assert_eq!(count(&bus, "Jump"), 0);

            // the buffered press fires once the swing ends
            idle(&mut player, config.attack_duration + DT, &mut bus);
            assert_eq!(count(&bus, "Jump"), 1);
        }

        #[test]
        fn dash_needs_direction_and_starts_cooldown_on_end() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            press(
                &mut player,
                PlayerInput {
                    dash_pressed: true,
                    ..PlayerInput::default()
                },
                &mut bus,
            );
            assert_ne!(player.state(), PlayerState::Dashing);

            let dash = PlayerInput {
                move_x: -1.0,
                dash_pressed: true,
                ..PlayerInput::default()
            };
            press(&mut player, dash, &mut bus);
            assert_eq!(player.state(), PlayerState::Dashing);
            assert_eq!(player.body().facing(), Vec2::NEG_X);
            assert!(player.dash_ready());

            player.fixed_update(DT);
            assert!((player.body().velocity.x + config.dash_speed).abs() < 1e-4);

            idle(&mut player, config.dash_time + DT, &mut bus);
            assert_ne!(player.state(), PlayerState::Dashing);
            assert!(!player.dash_ready());
        }

        #[test]
        fn run_accelerates_toward_max_speed_without_overshoot() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            player.set_input(PlayerInput {
                move_x: 1.0,
                ..PlayerInput::default()
            });
            for _ in 0..30 {
                player.fixed_update(DT);
                assert!(player.body().velocity.x <= config.max_speed + 1e-4);
            }
            assert!((player.body().velocity.x - config.max_speed).abs() < 1e-3);
        }

        #[test]
        fn landing_emits_land_and_refills_air_jumps() {
            let config = PlayerConfig::default();
            let mut player = PlayerController::new(ActorId::new(0), Vec2::new(0.0, 3.0), &config);
            let mut bus = EventBus::new();

            player.body.velocity.y = -5.0;
            player.air_jumps_left = 0;
            idle(&mut player, DT, &mut bus);
            assert_eq!(count(&bus, "Fall"), 1);
            idle(&mut player, DT, &mut bus);
            assert_eq!(count(&bus, "Fall"), 1);

            player.body.flags.insert(ActorFlags::GROUNDED);
            player.body.velocity.y = 0.0;
            idle(&mut player, DT, &mut bus);
            assert_eq!(count(&bus, "Land"), 1);
            assert!(player.is_landing());
            assert_eq!(player.air_jumps_left(), config.extra_jumps);
        }
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn defense_reduces_damage() {
            let config = PlayerConfig {
                defense: 4,
                ..PlayerConfig::default()
            };
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            let outcome = player.take_damage(&hit(10), &mut bus);
            assert_eq!(
                outcome,
                DamageOutcome::Applied {
                    damage: 6,
                    remaining: 94
                }
            );
            assert_eq!(player.state(), PlayerState::Hurt);
            assert!(player.flags().contains(ActorFlags::INVINCIBLE));
            assert_eq!(player.body().velocity, Vec2::new(-4.0, 0.0));
            assert_eq!(count(&bus, "TakeDamage"), 1);
        }

        #[test]
        fn hurt_window_ignores_hits_then_expires() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            player.take_damage(&hit(10), &mut bus);
            assert_eq!(
                player.take_damage(&hit(10), &mut bus),
                DamageOutcome::Ignored(IgnoreReason::Hurt)
            );
            assert_eq!(player.health().current(), 90);

            idle(&mut player, config.hurt_duration + DT, &mut bus);
            assert_eq!(player.state(), PlayerState::Idle);
            assert!(!player.flags().contains(ActorFlags::INVINCIBLE));
            assert!(player.take_damage(&hit(10), &mut bus).landed());
        }

        #[test]
        fn hurt_cancels_pending_strike() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            press(&mut player, attack(), &mut bus);
            player.take_damage(&hit(1), &mut bus);
            let strikes = idle(&mut player, 1.0, &mut bus);
            assert!(strikes.is_empty());
        }

        #[test]
        fn derived_stats_refill_health() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();
            player.take_damage(&hit(50), &mut bus);
            assert_eq!(player.health().current(), 50);

            let stats = DerivedStats {
                level: 2,
                attack_power: 12,
                defense: 1,
                critical_chance: 0.1,
                max_health: 120,
                damage: DamageStats::default(),
            };
            player.apply_derived_stats(&stats, &mut bus);

            assert_eq!(player.health().current(), 120);
            assert_eq!(player.health().max(), 120);
            assert_eq!(
                bus.events().last().map(|r| &r.event),
                Some(&GameEvent::HealthChanged {
                    current: 120,
                    max: 120
                })
            );
        }

        #[test]
        fn death_is_terminal_and_idempotent() {
            let config = PlayerConfig::default();
            let mut player = grounded_player(&config);
            let mut bus = EventBus::new();

            press(&mut player, attack(), &mut bus);
            let outcome = player.take_damage(&hit(500), &mut bus);
            assert_eq!(outcome, DamageOutcome::Killed { damage: 100 });
            assert!(player.is_dead());
            assert!(player.flags().contains(ActorFlags::PHYSICS_DISABLED));

            let events_before = bus.len();
            let health_before = player.health();
            assert_eq!(
                player.take_damage(&hit(5), &mut bus),
                DamageOutcome::Ignored(IgnoreReason::Dead)
            );
            assert!(idle(&mut player, 1.0, &mut bus).is_empty());
            assert_eq!(bus.len(), events_before);
            assert_eq!(player.health(), health_before);
            assert_eq!(count(&bus, "Death"), 1);
        }
    }
}
