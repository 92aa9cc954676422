//! Derived id-to-position index over the world collections.
//!
//! The index is a cache. It is rebuilt in O(n) after every structural change
//! and every hit is verified against the collection, falling back to a linear
//! scan, so a stale index can slow a lookup down but never return the wrong
//! entity.

use std::collections::BTreeMap;

use containment_types::{AgentId, AnomalyId, CityId};

use crate::state::{AgentEntity, AnomalyInstance, CityEntity};

/// Position lookups for cities, agents and anomalies.
#[derive(Debug, Clone, Default)]
pub struct WorldIndex {
    cities: BTreeMap<CityId, usize>,
    agents: BTreeMap<AgentId, usize>,
    anomalies: BTreeMap<AnomalyId, usize>,
}

impl WorldIndex {
    /// Build an index over the given collections.
    ///
    /// When ids repeat, the first occurrence wins, matching the linear-scan
    /// fallback.
    pub fn build(
        cities: &[CityEntity],
        agents: &[AgentEntity],
        anomalies: &[AnomalyInstance],
    ) -> Self {
        let mut index = Self::default();
        for (pos, city) in cities.iter().enumerate() {
            index.cities.entry(city.id.clone()).or_insert(pos);
        }
        for (pos, agent) in agents.iter().enumerate() {
            index.agents.entry(agent.id.clone()).or_insert(pos);
        }
        for (pos, anomaly) in anomalies.iter().enumerate() {
            index.anomalies.entry(anomaly.id.clone()).or_insert(pos);
        }
        index
    }

    /// Cached position of a city.
    pub fn city(&self, id: &CityId) -> Option<usize> {
        self.cities.get(id).copied()
    }

    /// Cached position of an agent.
    pub fn agent(&self, id: &AgentId) -> Option<usize> {
        self.agents.get(id).copied()
    }

    /// Cached position of an anomaly instance.
    pub fn anomaly(&self, id: &AnomalyId) -> Option<usize> {
        self.anomalies.get(id).copied()
    }
}

/// Resolve a position: trust `hint` only if it still points at a match.
pub(crate) fn locate<T>(
    items: &[T],
    hint: Option<usize>,
    matches: impl Fn(&T) -> bool,
) -> Option<usize> {
    if let Some(pos) = hint.filter(|&pos| items.get(pos).is_some_and(&matches)) {
        return Some(pos);
    }
    items.iter().position(matches)
}
