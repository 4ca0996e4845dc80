//! Hit resolution: applying a [`Strike`] to the actor it reaches.
//!
//! Delivery is synchronous. The strike is resolved into a [`DamageInfo`] and
//! handed to the target's `take_damage` in the same call, so two strikes
//! landing in one tick apply in the order the caller resolves them.

use rand::Rng;

use crate::actor::{CombatActor, DamageOutcome, Strike};
use crate::config::DamageStats;
use crate::error::MissingDependency;
use crate::events::EventBus;
use crate::resolver::{DamageInfo, DamageResolver};

/// Result of resolving one strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeOutcome {
    /// A target was in reach and received the hit.
    Hit {
        /// The resolved hit
        info: DamageInfo,
        /// What the target did with it
        outcome: DamageOutcome,
    },
    /// Nobody eligible was in reach. The attack still completes normally.
    NoTarget,
    /// The attacker cannot deal damage.
    Disabled(MissingDependency),
}

impl StrikeOutcome {
    /// Returns `true` if the strike reached a target, whether or not the
    /// target took damage.
    #[must_use]
    pub const fn reached_target(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Resolves strikes against targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitResolver;

impl HitResolver {
    /// Resolves `strike` against `target`.
    ///
    /// Returns [`StrikeOutcome::Disabled`] without rolling if `stats` is
    /// missing, and [`StrikeOutcome::NoTarget`] if there is no target, it is
    /// already dead, or it lies outside the strike's reach. Otherwise the hit
    /// is rolled and applied; the knockback points from the strike origin to
    /// the target, falling back to the attacker's facing.
    pub fn resolve<R: Rng + ?Sized>(
        strike: &Strike,
        stats: Option<&DamageStats>,
        target: Option<&mut dyn CombatActor>,
        rng: &mut R,
        bus: &mut EventBus,
    ) -> StrikeOutcome {
        let Some(stats) = stats else {
            return StrikeOutcome::Disabled(MissingDependency::DamageStats);
        };
        let Some(target) = target else {
            return StrikeOutcome::NoTarget;
        };
        let target_position = target.body().position;
        if target.is_dead() || strike.origin.distance(target_position) > strike.reach {
            return StrikeOutcome::NoTarget;
        }

        let direction =
            DamageResolver::knockback_direction(strike.origin, target_position, strike.facing);
        let info = DamageResolver::resolve(stats, strike.base_damage, direction, rng);
        let outcome = target.take_damage(&info, bus);

        tracing::debug!(
            attacker = %strike.attacker,
            target = %target.id(),
            amount = info.amount(),
            critical = info.is_critical(),
            outcome = ?outcome,
            "strike resolved"
        );

        StrikeOutcome::Hit { info, outcome }
    }
}
