//! The authoritative world aggregate and its entities.
//!
//! [`WorldState`] owns ordered collections of cities, agents, anomalies and
//! movement transitions. Entities may be mutated in place through the slice
//! accessors; structural changes (insertions) go through methods that keep
//! the derived [`WorldIndex`] in sync.

use containment_types::{
    AgentId, AgentLocation, AnomalyDefId, AnomalyId, AnomalyPhase, AssignmentSlot, Attributes,
    CityId, CityKind, MapPos, TransitionDirection, TransitionId, TransitionState, Vital,
};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::index::{WorldIndex, locate};

// ---------------------------------------------------------------------------
// Cities
// ---------------------------------------------------------------------------

/// A city on the world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntity {
    /// Unique city identifier.
    pub id: CityId,
    /// Display name.
    pub name: String,
    /// Headquarters or ordinary city.
    pub kind: CityKind,
    /// Current population. Never negative by construction.
    pub population: u32,
    /// Local panic level.
    pub local_panic: f32,
    /// Whether the city is open for anomaly spawns.
    pub unlocked: bool,
    /// Map position.
    pub position: MapPos,
    /// Anomaly definitions already discovered here.
    pub discovered: Vec<AnomalyDefId>,
}

impl CityEntity {
    /// Create an unlocked city with no discoveries.
    pub fn new(
        id: impl Into<CityId>,
        name: impl Into<String>,
        kind: CityKind,
        population: u32,
        position: MapPos,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            population,
            local_panic: 0.0,
            unlocked: true,
            position,
            discovered: Vec::new(),
        }
    }

    /// Whether this is an ordinary (tax-paying, spawnable) city.
    pub const fn is_ordinary(&self) -> bool {
        matches!(self.kind, CityKind::Ordinary)
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Result of applying damage to an agent.
///
/// `killed` and `went_insane` are edge-triggered: they are `true` only on the
/// call that first sets the corresponding sticky flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactOutcome {
    /// Hit points actually removed.
    pub hp_lost: u32,
    /// Sanity actually removed.
    pub sanity_lost: u32,
    /// The agent died on this impact.
    pub killed: bool,
    /// The agent went insane on this impact.
    pub went_insane: bool,
}

/// A player-controlled operative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntity {
    /// Unique agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Capability scores.
    pub attributes: Attributes,
    /// Hit points.
    pub hp: Vital,
    /// Sanity.
    pub sanity: Vital,
    /// Sticky death flag.
    pub is_dead: bool,
    /// Sticky insanity flag.
    pub is_insane: bool,
    /// Current location.
    pub location: AgentLocation,
}

impl AgentEntity {
    /// Create a healthy agent at base.
    pub fn new(
        id: impl Into<AgentId>,
        name: impl Into<String>,
        attributes: Attributes,
        max_hp: u32,
        max_sanity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes,
            hp: Vital::full(max_hp),
            sanity: Vital::full(max_sanity),
            is_dead: false,
            is_insane: false,
            location: AgentLocation::Base,
        }
    }

    /// Neither dead nor insane.
    pub const fn is_capable(&self) -> bool {
        !self.is_dead && !self.is_insane
    }

    /// Subtract hit points and sanity, setting the sticky flags when a pool
    /// first reaches zero.
    pub const fn apply_impact(&mut self, hp_damage: u32, sanity_damage: u32) -> ImpactOutcome {
        let hp_lost = self.hp.damage(hp_damage);
        let sanity_lost = self.sanity.damage(sanity_damage);

        let killed = !self.is_dead && self.hp.is_depleted();
        if killed {
            self.is_dead = true;
        }
        let went_insane = !self.is_insane && self.sanity.is_depleted();
        if went_insane {
            self.is_insane = true;
        }

        ImpactOutcome {
            hp_lost,
            sanity_lost,
            killed,
            went_insane,
        }
    }
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// The three exclusive rosters of an anomaly, one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rosters {
    /// Investigation roster.
    pub investigate: Vec<AgentId>,
    /// Containment roster.
    pub contain: Vec<AgentId>,
    /// Management roster.
    pub operate: Vec<AgentId>,
}

impl Rosters {
    /// Members of one slot.
    pub fn get(&self, slot: AssignmentSlot) -> &[AgentId] {
        match slot {
            AssignmentSlot::Investigate => &self.investigate,
            AssignmentSlot::Contain => &self.contain,
            AssignmentSlot::Operate => &self.operate,
        }
    }

    /// Mutable members of one slot.
    pub const fn get_mut(&mut self, slot: AssignmentSlot) -> &mut Vec<AgentId> {
        match slot {
            AssignmentSlot::Investigate => &mut self.investigate,
            AssignmentSlot::Contain => &mut self.contain,
            AssignmentSlot::Operate => &mut self.operate,
        }
    }
}

/// A live anomaly instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyInstance {
    /// Canonical instance identifier.
    pub id: AnomalyId,
    /// Static definition this instance was spawned from.
    pub def_id: AnomalyDefId,
    /// City where the anomaly appeared.
    pub origin_city: CityId,
    /// Own map position; falls back to the origin city when absent.
    pub position: Option<MapPos>,
    /// Day the anomaly spawned.
    pub spawn_day: u32,
    /// Current lifecycle phase. Never regresses.
    pub phase: AnomalyPhase,
    /// Investigation progress in `[0, 1]`.
    pub investigate_progress: f32,
    /// Containment progress in `[0, 1]`.
    pub contain_progress: f32,
    /// Per-slot rosters.
    pub rosters: Rosters,
    /// Canonical ordering key across anomalies.
    pub spawn_seq: u64,
}

impl AnomalyInstance {
    /// Create a fresh anomaly in the investigation phase.
    pub fn new(
        id: impl Into<AnomalyId>,
        def_id: impl Into<AnomalyDefId>,
        origin_city: impl Into<CityId>,
        spawn_day: u32,
        spawn_seq: u64,
    ) -> Self {
        Self {
            id: id.into(),
            def_id: def_id.into(),
            origin_city: origin_city.into(),
            position: None,
            spawn_day,
            phase: AnomalyPhase::Investigate,
            investigate_progress: 0.0,
            contain_progress: 0.0,
            rosters: Rosters::default(),
            spawn_seq,
        }
    }

    /// Progress of a phase. [`AnomalyPhase::Operate`] has no progress and
    /// reports zero.
    pub const fn progress(&self, phase: AnomalyPhase) -> f32 {
        match phase {
            AnomalyPhase::Investigate => self.investigate_progress,
            AnomalyPhase::Contain => self.contain_progress,
            AnomalyPhase::Operate => 0.0,
        }
    }

    /// Mutable progress of a phase, `None` for [`AnomalyPhase::Operate`].
    pub const fn progress_mut(&mut self, phase: AnomalyPhase) -> Option<&mut f32> {
        match phase {
            AnomalyPhase::Investigate => Some(&mut self.investigate_progress),
            AnomalyPhase::Contain => Some(&mut self.contain_progress),
            AnomalyPhase::Operate => None,
        }
    }

    /// Roster slot that works the current phase.
    pub const fn active_slot(&self) -> AssignmentSlot {
        self.phase.slot()
    }
}

// ---------------------------------------------------------------------------
// Movement transitions
// ---------------------------------------------------------------------------

/// A promised change of an agent's location.
///
/// The logical half (roster diff, travelling location) is applied on
/// enqueue; the landing half is applied when the consumer completes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTransition {
    /// Token identifier.
    pub id: TransitionId,
    /// Moving agent.
    pub agent: AgentId,
    /// Anomaly travelled to or from.
    pub anomaly: AnomalyId,
    /// Roster slot involved.
    pub slot: AssignmentSlot,
    /// Dispatch or recall.
    pub direction: TransitionDirection,
    /// Lifecycle state.
    pub state: TransitionState,
    /// Day the token was created.
    pub created_day: u32,
}

impl MovementTransition {
    /// Create a pending transition.
    pub fn pending(
        agent: AgentId,
        anomaly: AnomalyId,
        slot: AssignmentSlot,
        direction: TransitionDirection,
        created_day: u32,
    ) -> Self {
        Self {
            id: TransitionId::new(),
            agent,
            anomaly,
            slot,
            direction,
            state: TransitionState::Pending,
            created_day,
        }
    }
}

// ---------------------------------------------------------------------------
// World aggregate
// ---------------------------------------------------------------------------

/// Root aggregate of the simulation.
///
/// Cloning produces a fully independent copy; the day planner uses that as
/// its shadow state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Current day, starting at 1.
    pub day: u32,
    /// Currency.
    pub money: i64,
    /// Global panic meter.
    pub panic: f32,
    /// Negentropy meter.
    pub negentropy: i64,
    cities: Vec<CityEntity>,
    agents: Vec<AgentEntity>,
    anomalies: Vec<AnomalyInstance>,
    transitions: Vec<MovementTransition>,
    transition_lock: u32,
    next_spawn_seq: u64,
    #[serde(skip)]
    index: WorldIndex,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl WorldState {
    /// Create an empty world at the given day.
    pub fn new(day: u32) -> Self {
        Self {
            day,
            money: 0,
            panic: 0.0,
            negentropy: 0,
            cities: Vec::new(),
            agents: Vec::new(),
            anomalies: Vec::new(),
            transitions: Vec::new(),
            transition_lock: 0,
            next_spawn_seq: 0,
            index: WorldIndex::default(),
        }
    }

    /// Rebuild the derived index from the collections.
    ///
    /// Called automatically by structural mutators. Call it after
    /// deserializing, since the index is not persisted.
    pub fn rebuild_index(&mut self) {
        self.index = WorldIndex::build(&self.cities, &self.agents, &self.anomalies);
    }

    // -------------------------------------------------------------------
    // Cities
    // -------------------------------------------------------------------

    /// All cities in insertion order.
    pub fn cities(&self) -> &[CityEntity] {
        &self.cities
    }

    /// All cities, mutable in place.
    pub fn cities_mut(&mut self) -> &mut [CityEntity] {
        &mut self.cities
    }

    /// Insert a city.
    pub fn add_city(&mut self, city: CityEntity) -> Result<(), WorldError> {
        if city.id.is_empty() {
            return Err(WorldError::EmptyId { kind: "city" });
        }
        if self.city(&city.id).is_some() {
            return Err(WorldError::DuplicateCity(city.id));
        }
        self.cities.push(city);
        self.rebuild_index();
        Ok(())
    }

    fn city_pos(&self, id: &CityId) -> Option<usize> {
        locate(&self.cities, self.index.city(id), |c| c.id == *id)
    }

    /// Look up a city.
    pub fn city(&self, id: &CityId) -> Option<&CityEntity> {
        self.city_pos(id).and_then(|pos| self.cities.get(pos))
    }

    /// Look up a city mutably.
    pub fn city_mut(&mut self, id: &CityId) -> Option<&mut CityEntity> {
        self.city_pos(id).and_then(|pos| self.cities.get_mut(pos))
    }

    // -------------------------------------------------------------------
    // Agents
    // -------------------------------------------------------------------

    /// All agents in insertion order.
    pub fn agents(&self) -> &[AgentEntity] {
        &self.agents
    }

    /// All agents, mutable in place.
    pub fn agents_mut(&mut self) -> &mut [AgentEntity] {
        &mut self.agents
    }

    /// Insert an agent.
    pub fn add_agent(&mut self, agent: AgentEntity) -> Result<(), WorldError> {
        if agent.id.is_empty() {
            return Err(WorldError::EmptyId { kind: "agent" });
        }
        if self.agent(&agent.id).is_some() {
            return Err(WorldError::DuplicateAgent(agent.id));
        }
        self.agents.push(agent);
        self.rebuild_index();
        Ok(())
    }

    fn agent_pos(&self, id: &AgentId) -> Option<usize> {
        locate(&self.agents, self.index.agent(id), |a| a.id == *id)
    }

    /// Look up an agent.
    pub fn agent(&self, id: &AgentId) -> Option<&AgentEntity> {
        self.agent_pos(id).and_then(|pos| self.agents.get(pos))
    }

    /// Look up an agent mutably.
    pub fn agent_mut(&mut self, id: &AgentId) -> Option<&mut AgentEntity> {
        self.agent_pos(id).and_then(|pos| self.agents.get_mut(pos))
    }

    // -------------------------------------------------------------------
    // Anomalies
    // -------------------------------------------------------------------

    /// All anomalies in insertion order.
    pub fn anomalies(&self) -> &[AnomalyInstance] {
        &self.anomalies
    }

    /// All anomalies, mutable in place.
    pub fn anomalies_mut(&mut self) -> &mut [AnomalyInstance] {
        &mut self.anomalies
    }

    /// Insert an anomaly instance.
    ///
    /// The spawn sequence counter is advanced past the instance's sequence
    /// number so later allocations stay unique.
    pub fn add_anomaly(&mut self, anomaly: AnomalyInstance) -> Result<(), WorldError> {
        if anomaly.id.is_empty() {
            return Err(WorldError::EmptyId { kind: "anomaly" });
        }
        if self.anomaly(&anomaly.id).is_some() {
            return Err(WorldError::DuplicateAnomaly(anomaly.id));
        }
        self.next_spawn_seq = self
            .next_spawn_seq
            .max(anomaly.spawn_seq.saturating_add(1));
        self.anomalies.push(anomaly);
        self.rebuild_index();
        Ok(())
    }

    fn anomaly_pos(&self, id: &AnomalyId) -> Option<usize> {
        locate(&self.anomalies, self.index.anomaly(id), |a| a.id == *id)
    }

    /// Look up an anomaly instance.
    pub fn anomaly(&self, id: &AnomalyId) -> Option<&AnomalyInstance> {
        self.anomaly_pos(id).and_then(|pos| self.anomalies.get(pos))
    }

    /// Look up an anomaly instance mutably.
    pub fn anomaly_mut(&mut self, id: &AnomalyId) -> Option<&mut AnomalyInstance> {
        self.anomaly_pos(id).and_then(|pos| self.anomalies.get_mut(pos))
    }

    /// Anomaly ids in canonical order: ascending spawn sequence, then id.
    pub fn anomaly_order(&self) -> Vec<AnomalyId> {
        let mut keyed: Vec<(u64, &AnomalyId)> = self
            .anomalies
            .iter()
            .map(|a| (a.spawn_seq, &a.id))
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// Sequence number the next spawned anomaly will receive.
    pub const fn next_spawn_seq(&self) -> u64 {
        self.next_spawn_seq
    }

    /// Take the next spawn sequence number.
    pub const fn allocate_spawn_seq(&mut self) -> u64 {
        let seq = self.next_spawn_seq;
        self.next_spawn_seq = seq.saturating_add(1);
        seq
    }

    // -------------------------------------------------------------------
    // Movement transitions
    // -------------------------------------------------------------------

    /// All transitions in enqueue order.
    pub fn transitions(&self) -> &[MovementTransition] {
        &self.transitions
    }

    /// All transitions, mutable in place.
    pub fn transitions_mut(&mut self) -> &mut [MovementTransition] {
        &mut self.transitions
    }

    /// Number of enqueued transitions not yet completed.
    pub const fn transition_lock(&self) -> u32 {
        self.transition_lock
    }

    /// Append a transition and take the lock once for it.
    pub fn enqueue_transition(&mut self, transition: MovementTransition) {
        self.transitions.push(transition);
        self.transition_lock = self.transition_lock.saturating_add(1);
    }

    /// Release the lock once. Never drops below zero.
    pub const fn release_transition_lock(&mut self) {
        self.transition_lock = self.transition_lock.saturating_sub(1);
    }

    /// Remove completed transitions, returning how many were dropped.
    pub fn prune_completed_transitions(&mut self) -> usize {
        let before = self.transitions.len();
        self.transitions
            .retain(|t| t.state != TransitionState::Completed);
        before.saturating_sub(self.transitions.len())
    }

    /// Drop every transition and reset the lock.
    pub fn clear_transitions(&mut self) {
        self.transitions.clear();
        self.transition_lock = 0;
    }
}
