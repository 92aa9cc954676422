//! Read-only game content consumed by the settlement systems.
//!
//! The engine never owns content; it reads it through [`ContentRegistry`].
//! [`ContentTable`] is a plain in-memory implementation that deserializes
//! from any serde format.

use std::collections::BTreeMap;

use containment_types::{AnomalyDefId, AnomalyPhase};
use containment_world::StartingResources;
use serde::{Deserialize, Serialize};

/// Content errors detected by [`ContentTable::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    /// The table defines no anomalies, so nothing can ever spawn.
    #[error("content table defines no anomalies")]
    NoAnomalies,

    /// An anomaly has a non-finite or negative effect radius.
    #[error("anomaly {def} has invalid radius {radius}")]
    InvalidRadius {
        /// Offending definition.
        def: AnomalyDefId,
        /// Rejected value.
        radius: f32,
    },

    /// The population-to-money rate is non-finite or negative.
    #[error("invalid pop_to_money_rate {0}")]
    InvalidRate(f64),
}

/// Requirements and hazards of one phase of an anomaly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    /// Attribute thresholds in Perception/Operation/Resistance/Power order.
    #[serde(default)]
    pub requirements: [u32; 4],
    /// Base hit-point damage per worker per day.
    #[serde(default)]
    pub hp_damage: u32,
    /// Base sanity damage per worker per day.
    #[serde(default)]
    pub sanity_damage: u32,
}

/// Static definition of an anomaly type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDef {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Investigation phase data.
    #[serde(default)]
    pub investigate: PhaseDef,
    /// Containment phase data.
    #[serde(default)]
    pub contain: PhaseDef,
    /// Management phase data.
    #[serde(default)]
    pub operate: PhaseDef,
    /// Area-effect radius; zero hits the nearest city only.
    #[serde(default)]
    pub radius: f32,
    /// Population removed per affected city per day.
    #[serde(default)]
    pub population_kill: u32,
    /// Negentropy produced per day while operated.
    #[serde(default)]
    pub negentropy_per_day: i64,
}

impl AnomalyDef {
    /// Phase data for `phase`.
    pub const fn phase(&self, phase: AnomalyPhase) -> &PhaseDef {
        match phase {
            AnomalyPhase::Investigate => &self.investigate,
            AnomalyPhase::Contain => &self.contain,
            AnomalyPhase::Operate => &self.operate,
        }
    }
}

/// Economy and balance constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Money earned per inhabitant per day.
    #[serde(default = "default_pop_to_money_rate")]
    pub pop_to_money_rate: f64,
    /// Percentage of max HP and sanity restored per day at base.
    #[serde(default = "default_recovery_percent")]
    pub recovery_percent: u32,
    /// Resources of a freshly created world.
    #[serde(default)]
    pub starting: StartingResources,
}

const fn default_pop_to_money_rate() -> f64 {
    0.01
}

const fn default_recovery_percent() -> u32 {
    10
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            pop_to_money_rate: default_pop_to_money_rate(),
            recovery_percent: default_recovery_percent(),
            starting: StartingResources::default(),
        }
    }
}

/// Read-only access to game content.
pub trait ContentRegistry {
    /// Look up an anomaly definition.
    fn anomaly(&self, id: &AnomalyDefId) -> Option<&AnomalyDef>;

    /// All anomaly definition ids in ascending order.
    fn anomaly_ids(&self) -> Vec<AnomalyDefId>;

    /// Balance constants.
    fn balance(&self) -> &Balance;

    /// Number of anomalies to spawn at the start of `day`.
    fn spawn_quota(&self, day: u32) -> u32;
}

/// In-memory content registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentTable {
    /// Balance constants.
    #[serde(default)]
    pub balance: Balance,
    /// Anomaly definitions by id.
    #[serde(default)]
    pub anomalies: BTreeMap<AnomalyDefId, AnomalyDef>,
    /// Spawn quota steps: from the keyed day onward, spawn this many per day.
    #[serde(default)]
    pub spawn_schedule: BTreeMap<u32, u32>,
}

impl ContentTable {
    /// Check the table for values the systems cannot use.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.anomalies.is_empty() {
            return Err(ContentError::NoAnomalies);
        }
        let rate = self.balance.pop_to_money_rate;
        if !rate.is_finite() || rate < 0.0 {
            return Err(ContentError::InvalidRate(rate));
        }
        for (id, def) in &self.anomalies {
            if !def.radius.is_finite() || def.radius < 0.0 {
                return Err(ContentError::InvalidRadius {
                    def: id.clone(),
                    radius: def.radius,
                });
            }
        }
        Ok(())
    }
}

impl ContentRegistry for ContentTable {
    fn anomaly(&self, id: &AnomalyDefId) -> Option<&AnomalyDef> {
        self.anomalies.get(id)
    }

    fn anomaly_ids(&self) -> Vec<AnomalyDefId> {
        self.anomalies.keys().cloned().collect()
    }

    fn balance(&self) -> &Balance {
        &self.balance
    }

    fn spawn_quota(&self, day: u32) -> u32 {
        self.spawn_schedule
            .range(..=day)
            .next_back()
            .map_or(0, |(_, quota)| *quota)
    }
}
