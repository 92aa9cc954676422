//! Value types shared by world entities.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The four capability attributes of an operative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Attributes {
    /// Perception score.
    pub perception: u32,
    /// Operation score.
    pub operation: u32,
    /// Resistance score.
    pub resistance: u32,
    /// Power score.
    pub power: u32,
}

impl Attributes {
    /// Construct from the four scores in requirement-vector order.
    pub const fn new(perception: u32, operation: u32, resistance: u32, power: u32) -> Self {
        Self {
            perception,
            operation,
            resistance,
            power,
        }
    }

    /// Scores in requirement-vector order (Perception, Operation, Resistance, Power).
    pub const fn as_array(&self) -> [u32; 4] {
        [self.perception, self.operation, self.resistance, self.power]
    }
}

impl From<[u32; 4]> for Attributes {
    fn from([perception, operation, resistance, power]: [u32; 4]) -> Self {
        Self::new(perception, operation, resistance, power)
    }
}

/// A bounded pool such as hit points or sanity.
///
/// `current` is kept within `[0, max]` by every mutating method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vital {
    /// Current value.
    pub current: u32,
    /// Maximum value.
    pub max: u32,
}

impl Vital {
    /// A full pool.
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// A pool with an explicit current value, clamped to `max`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Whether the pool is exhausted.
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Subtract `amount`, saturating at zero. Returns the amount removed.
    pub const fn damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before.saturating_sub(self.current)
    }

    /// Add `amount`, capped at `max`. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current.saturating_sub(before)
    }
}
