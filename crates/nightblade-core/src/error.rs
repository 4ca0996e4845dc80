//! Error types for the combat core.
//!
//! Two families exist:
//!
//! - [`ConfigError`]: invalid tuning data. Raised only while loading or
//!   constructing configuration, never during a tick.
//! - [`MissingDependency`]: a collaborator an actor needs is absent. These are
//!   never returned from a tick; the owning actor logs them once and disables
//!   the dependent behavior.
//!
//! An attack that finds nobody in range is not an error at all, see
//! [`StrikeOutcome::NoTarget`](crate::resolver::StrikeOutcome::NoTarget).

use std::path::PathBuf;

/// Configuration rejected at load time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `min_damage` exceeds `max_damage`.
    #[error("invalid damage range: min {min} > max {max}")]
    InvalidDamageRange {
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// Critical chance outside `[0, 1]`.
    #[error("critical chance {0} is outside [0, 1]")]
    InvalidCritChance(f32),

    /// Critical multiplier that is not a finite positive number.
    #[error("critical multiplier {0} must be finite and > 0")]
    InvalidCritMultiplier(f32),

    /// Knockback range that is negative, non-finite or inverted.
    #[error("invalid knockback range: [{min}, {max}]")]
    InvalidKnockbackRange {
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// A duration or distance that must be strictly positive.
    #[error("{field} must be finite and > 0 (got {value})")]
    NonPositive {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: f32,
    },

    /// A duration or distance that must not be negative.
    #[error("{field} must be finite and >= 0 (got {value})")]
    Negative {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: f32,
    },

    /// A value that must lie inside a closed interval.
    #[error("{field} must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: f32,
        /// Lowest accepted value
        min: f32,
        /// Highest accepted value
        max: f32,
    },

    /// A coordinate that may take any sign but must be a real number.
    #[error("{field} must be finite (got {value})")]
    NonFinite {
        /// Name of the offending field
        field: &'static str,
        /// Configured value
        value: f32,
    },

    /// Enemy ranges that cannot produce a sensible chase.
    #[error("enemy ranges out of order: attack {attack} <= detection {detection} <= follow {follow} required")]
    InvalidRanges {
        /// Attack range
        attack: f32,
        /// Detection range
        detection: f32,
        /// Follow range
        follow: f32,
    },

    /// The player has no combo steps.
    #[error("player combo must contain at least one step")]
    EmptyCombo,

    /// The level table is unusable.
    #[error("invalid level table: {0}")]
    InvalidLevelTable(String),

    /// An enemy archetype name that is not present in the config.
    #[error("unknown enemy archetype '{0}'")]
    UnknownArchetype(String),

    /// The config document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// A collaborator an actor needs in order to perform some behavior.
///
/// Logged with `warn!` the first time it is noticed. The behavior it guards
/// is skipped for that actor while the tick carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum MissingDependency {
    /// No damage stats: strikes from this actor resolve no damage.
    #[error("damage stats are not configured; strikes deal no damage")]
    DamageStats,

    /// No patrol route: the enemy stands still while patrolling.
    #[error("patrol route is empty; enemy holds position")]
    PatrolRoute,

    /// No target in the perception input: the enemy cannot chase or attack.
    #[error("no target to track; chase and attack disabled")]
    Target,
}

pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
