//! City taxes.

use containment_types::{CityId, DayEvent};
use containment_world::WorldState;
use tracing::debug;

use crate::content::Balance;
use crate::sink::EventSink;

/// Daily income of a city: `floor(population * rate)`, never negative.
#[allow(clippy::cast_possible_truncation)]
pub fn city_income(population: u32, rate: f64) -> i64 {
    let rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
    // Bounded well inside i64, so the cast cannot wrap.
    (f64::from(population) * rate).floor().min(9.0e15) as i64
}

/// Collect taxes from every ordinary city in ascending id order.
///
/// Returns the total money added.
pub fn apply_city_economy(
    state: &mut WorldState,
    balance: &Balance,
    sink: &mut dyn EventSink,
) -> i64 {
    let mut payers: Vec<(usize, &CityId)> = state
        .cities()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_ordinary())
        .map(|(pos, c)| (pos, &c.id))
        .collect();
    payers.sort_by(|a, b| a.1.cmp(b.1));
    let order: Vec<usize> = payers.into_iter().map(|(pos, _)| pos).collect();

    let mut total: i64 = 0;
    for pos in order {
        let Some(city) = state.cities().get(pos) else {
            continue;
        };
        let amount = city_income(city.population, balance.pop_to_money_rate);
        if amount <= 0 {
            continue;
        }
        let event = DayEvent::CityMoneyBurst {
            city: city.id.clone(),
            position: city.position,
            amount,
        };
        state.money = state.money.saturating_add(amount);
        total = total.saturating_add(amount);
        sink.emit(event);
    }

    debug!(total, money = state.money, "City economy settled");
    total
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use containment_types::{CityKind, MapPos};
    use containment_world::CityEntity;

    use super::*;
    use crate::testing::make_world;

    #[test]
    fn income_floors() {
        assert_eq!(city_income(1000, 0.01), 10);
        assert_eq!(city_income(999, 0.01), 9);
        assert_eq!(city_income(1000, -1.0), 0);
        assert_eq!(city_income(1000, f64::NAN), 0);
    }

    #[test]
    fn ordinary_cities_pay_in_id_order() {
        let mut world = make_world();
        world
            .add_city(CityEntity::new("M0", "Late", CityKind::Ordinary, 300, MapPos::default()))
            .unwrap();
        let balance = Balance {
            pop_to_money_rate: 0.1,
            ..Balance::default()
        };

        let mut events = Vec::new();
        let total = apply_city_economy(&mut world, &balance, &mut events);

        // N1 1000, N2 500, N3 800, M0 300 -> 100 + 50 + 80 + 30.
        assert_eq!(total, 260);
        assert_eq!(world.money, 260);
        let payers: Vec<CityId> = events
            .iter()
            .filter_map(|e| match e {
                DayEvent::CityMoneyBurst { city, .. } => Some(city.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            payers,
            vec![CityId::from("M0"), CityId::from("N1"), CityId::from("N2"), CityId::from("N3")]
        );
    }

    #[test]
    fn empty_cities_pay_nothing() {
        let mut world = make_world();
        for city in world.cities_mut() {
            city.population = 0;
        }
        let mut events = Vec::new();
        assert_eq!(apply_city_economy(&mut world, &Balance::default(), &mut events), 0);
        assert!(events.is_empty());
    }
}
