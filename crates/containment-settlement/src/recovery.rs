//! Daily recovery of operatives resting at headquarters.

use containment_types::{AgentLocation, Vital};
use containment_world::WorldState;
use tracing::debug;

use crate::content::Balance;

/// `ceil(max * percent / 100)`.
pub fn recovery_amount(vital: Vital, percent: u32) -> u32 {
    let scaled = u64::from(vital.max)
        .saturating_mul(u64::from(percent))
        .saturating_add(99)
        / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Heal living, sane agents at base. Returns how many agents regained
/// anything.
pub fn apply_base_recovery(state: &mut WorldState, balance: &Balance) -> usize {
    let mut healed = 0_usize;
    for agent in state.agents_mut() {
        if !agent.is_capable() || agent.location != AgentLocation::Base {
            continue;
        }
        let hp = recovery_amount(agent.hp, balance.recovery_percent);
        let sanity = recovery_amount(agent.sanity, balance.recovery_percent);
        let restored = agent.hp.heal(hp).saturating_add(agent.sanity.heal(sanity));
        if restored > 0 {
            healed = healed.saturating_add(1);
        }
    }
    debug!(healed, "Base recovery settled");
    healed
}
