//! Fixture builders shared by the settlement unit tests.

#![allow(clippy::unwrap_used)]

use containment_types::{
    AgentId, AgentLocation, AnomalyDefId, AnomalyId, AssignmentSlot, Attributes, CityKind, MapPos,
};
use containment_world::{AgentEntity, AnomalyInstance, CityEntity, WorldState};

use crate::content::{AnomalyDef, ContentTable, PhaseDef};

/// Base at the origin, three ordinary cities along the x axis.
pub(crate) fn make_world() -> WorldState {
    let mut world = WorldState::new(1);
    world
        .add_city(CityEntity::new("BASE", "Base", CityKind::Base, 0, MapPos::new(0.0, 0.0)))
        .unwrap();
    world
        .add_city(CityEntity::new("N1", "Ashford", CityKind::Ordinary, 1000, MapPos::new(10.0, 0.0)))
        .unwrap();
    world
        .add_city(CityEntity::new("N2", "Brightwater", CityKind::Ordinary, 500, MapPos::new(13.0, 0.0)))
        .unwrap();
    world
        .add_city(CityEntity::new("N3", "Coldharbour", CityKind::Ordinary, 800, MapPos::new(30.0, 0.0)))
        .unwrap();
    world
}

pub(crate) fn make_anomaly(world: &mut WorldState, id: &str, def: &str, city: &str, seq: u64) {
    let day = world.day;
    world
        .add_anomaly(AnomalyInstance::new(id, def, city, day, seq))
        .unwrap();
}

/// Add an agent already standing at `anomaly` and listed on its `slot` roster.
pub(crate) fn make_agent_at(
    world: &mut WorldState,
    id: &str,
    attrs: [u32; 4],
    hp: u32,
    anomaly: &str,
    slot: AssignmentSlot,
) {
    let mut agent = AgentEntity::new(id, id, Attributes::from(attrs), hp, 20);
    agent.location = AgentLocation::AtAnomaly {
        anomaly: AnomalyId::from(anomaly),
        slot,
    };
    world.add_agent(agent).unwrap();
    world
        .anomaly_mut(&AnomalyId::from(anomaly))
        .unwrap()
        .rosters
        .get_mut(slot)
        .push(AgentId::from(id));
}

pub(crate) fn make_def(requirements: [u32; 4], hp_damage: u32) -> AnomalyDef {
    let phase = PhaseDef {
        requirements,
        hp_damage,
        sanity_damage: 0,
    };
    AnomalyDef {
        name: "Test".to_owned(),
        investigate: phase,
        contain: phase,
        operate: phase,
        radius: 0.0,
        population_kill: 0,
        negentropy_per_day: 0,
    }
}

pub(crate) fn make_table(def_id: &str, def: AnomalyDef) -> ContentTable {
    let mut table = ContentTable::default();
    table.anomalies.insert(AnomalyDefId::from(def_id), def);
    table
}
