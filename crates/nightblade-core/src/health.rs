//! Clamped actor health.

use serde::{Deserialize, Serialize};

/// Current and maximum health. `0 <= current <= max` and `max >= 1` hold
/// after every write.
///
/// # Example
///
/// ```
/// use nightblade_core::health::Health;
///
/// let mut health = Health::new(15);
/// health.damage(20);
/// assert_eq!(health.current(), 0);
/// assert!(health.is_depleted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Full health with the given maximum (raised to at least 1).
    #[must_use]
    pub fn new(max: u32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Returns `true` once health has reached zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Removes up to `amount` health. Returns the health actually lost.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current);
        self.current -= lost;
        lost
    }

    /// Restores up to `amount` health, never above max. Returns the health gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max - self.current);
        self.current += gained;
        gained
    }

    /// Changes the maximum (raised to at least 1) and clamps current health to it.
    pub fn set_max(&mut self, max: u32) {
        self.max = max.max(1);
        self.current = self.current.min(self.max);
    }
}
