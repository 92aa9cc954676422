//! Default starting world for a new game.
//!
//! One headquarters, five ordinary cities laid out around it, and a squad of
//! six operatives with complementary attribute profiles.

use containment_types::{Attributes, CityKind, MapPos};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::state::{AgentEntity, CityEntity, WorldState};

/// Id of the headquarters city in the starting world.
pub const BASE_CITY_ID: &str = "BASE";

/// Global resources a new world starts with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartingResources {
    /// Initial money.
    #[serde(default = "default_money")]
    pub money: i64,
    /// Initial global panic.
    #[serde(default)]
    pub panic: f32,
    /// Initial negentropy.
    #[serde(default)]
    pub negentropy: i64,
}

const fn default_money() -> i64 {
    1000
}

impl Default for StartingResources {
    fn default() -> Self {
        Self {
            money: default_money(),
            panic: 0.0,
            negentropy: 0,
        }
    }
}

/// `(id, name, population, x, y, unlocked)`
const CITIES: [(&str, &str, u32, f32, f32, bool); 5] = [
    ("N1", "Ashford", 12_000, 4.0, 1.0, true),
    ("N2", "Brightwater", 8_500, -3.0, 2.5, true),
    ("N3", "Coldharbour", 15_000, 1.5, -4.0, true),
    ("N4", "Dunmere", 6_000, -5.5, -2.0, true),
    ("N5", "Eastwatch", 20_000, 9.0, 6.0, false),
];

/// `(id, name, [perception, operation, resistance, power], hp, sanity)`
const AGENTS: [(&str, &str, [u32; 4], u32, u32); 6] = [
    ("A01", "Hale", [6, 4, 6, 4], 20, 20),
    ("A02", "Ivers", [4, 6, 4, 6], 22, 16),
    ("A03", "Juno", [7, 5, 3, 3], 16, 24),
    ("A04", "Kestrel", [3, 3, 7, 7], 26, 14),
    ("A05", "Lark", [5, 5, 5, 5], 20, 20),
    ("A06", "Moss", [6, 6, 2, 4], 18, 20),
];

/// Build the default starting world.
pub fn create_starting_world(resources: StartingResources) -> Result<WorldState, WorldError> {
    let mut world = WorldState::new(1);
    world.money = resources.money;
    world.panic = resources.panic;
    world.negentropy = resources.negentropy;

    world.add_city(CityEntity::new(
        BASE_CITY_ID,
        "Headquarters",
        CityKind::Base,
        0,
        MapPos::new(0.0, 0.0),
    ))?;

    for (id, name, population, x, y, unlocked) in CITIES {
        let mut city = CityEntity::new(id, name, CityKind::Ordinary, population, MapPos::new(x, y));
        city.unlocked = unlocked;
        world.add_city(city)?;
    }

    for (id, name, attrs, hp, sanity) in AGENTS {
        world.add_agent(AgentEntity::new(id, name, Attributes::from(attrs), hp, sanity))?;
    }

    Ok(world)
}
