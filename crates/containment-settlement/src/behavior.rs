//! Anomaly area effects on surrounding cities.

use containment_types::{AnomalyId, CityId, DayEvent};
use containment_world::WorldState;
use tracing::debug;

use crate::content::ContentRegistry;
use crate::sink::EventSink;
use crate::util::{anomaly_position, find_anomaly, population_loss, resolve_def};

/// What one anomaly's area effect did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaEffectReport {
    /// Cities that lost population.
    pub cities_hit: Vec<CityId>,
    /// Total population removed.
    pub population_lost: u64,
}

/// Apply one day of area effect from `anomaly_id`.
///
/// A zero radius hits only the nearest city; otherwise every city within the
/// radius is hit. Nothing is emitted unless some city actually loses
/// population.
pub fn apply_area_effect(
    state: &mut WorldState,
    anomaly_id: &AnomalyId,
    registry: &dyn ContentRegistry,
    sink: &mut dyn EventSink,
) -> AreaEffectReport {
    let mut report = AreaEffectReport::default();

    let Some(anomaly) = find_anomaly(state, anomaly_id) else {
        return report;
    };
    let Some(origin) = anomaly_position(state, anomaly) else {
        debug!(anomaly = %anomaly_id, "Anomaly position unresolved, area effect skipped");
        return report;
    };
    let def = resolve_def(registry, anomaly);
    let radius = def.radius.max(0.0);

    let targets: Vec<(usize, f32)> = if radius > 0.0 {
        state
            .cities()
            .iter()
            .enumerate()
            .map(|(pos, city)| (pos, origin.distance(city.position)))
            .filter(|(_, distance)| *distance <= radius)
            .collect()
    } else {
        let mut nearest: Option<(usize, f32)> = None;
        for (pos, city) in state.cities().iter().enumerate() {
            let d2 = origin.distance_squared(city.position);
            if nearest.is_none_or(|(_, best)| d2 < best) {
                nearest = Some((pos, d2));
            }
        }
        nearest
            .map(|(pos, d2)| (pos, d2.sqrt()))
            .into_iter()
            .collect()
    };

    let hits: Vec<(usize, f32, u32)> = targets
        .into_iter()
        .filter_map(|(pos, distance)| {
            let city = state.cities().get(pos)?;
            let loss = population_loss(&def, city.population);
            (loss > 0).then_some((pos, distance, loss))
        })
        .collect();

    if hits.is_empty() {
        return report;
    }

    sink.emit(DayEvent::AreaAttack {
        anomaly: anomaly_id.clone(),
        origin,
        radius,
    });

    for (pos, distance, loss) in hits {
        let Some(city) = state.cities_mut().get_mut(pos) else {
            continue;
        };
        let before = city.population;
        let after = before.saturating_sub(loss);
        city.population = after;
        report.cities_hit.push(city.id.clone());
        report.population_lost = report.population_lost.saturating_add(u64::from(loss));
        sink.emit(DayEvent::CityPopulationLoss {
            anomaly: anomaly_id.clone(),
            city: city.id.clone(),
            before,
            loss,
            after,
            distance,
            radius,
        });
    }

    debug!(
        anomaly = %anomaly_id,
        radius,
        hit = report.cities_hit.len(),
        lost = report.population_lost,
        "Area effect applied"
    );
    report
}
