pub mod factory;
pub mod graph;

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Plains,
    Mountains,
    Forest,
    Desert,
    Swamp,
    Hills,
    Coastal,
    Tundra,
}

impl Terrain {
    pub const ALL: [Terrain; 8] = [
        Terrain::Plains,
        Terrain::Mountains,
        Terrain::Forest,
        Terrain::Desert,
        Terrain::Swamp,
        Terrain::Hills,
        Terrain::Coastal,
        Terrain::Tundra,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Terrain::Plains)
    }

    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Terrain::Plains => [150, 200, 100],
            Terrain::Mountains => [150, 150, 150],
            Terrain::Forest => [60, 120, 60],
            Terrain::Desert => [200, 180, 120],
            Terrain::Swamp => [80, 100, 60],
            Terrain::Hills => [170, 160, 110],
            Terrain::Coastal => [120, 180, 200],
            Terrain::Tundra => [200, 220, 180],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Climate {
    Temperate,
    Tropical,
    Arctic,
    Desert,
    Mediterranean,
    Continental,
}

impl Climate {
    pub const ALL: [Climate; 6] = [
        Climate::Temperate,
        Climate::Tropical,
        Climate::Arctic,
        Climate::Desert,
        Climate::Mediterranean,
        Climate::Continental,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Climate::Temperate)
    }
}

/// Провинция — атомарная клетка карты.
///
/// После создания меняются только `nation_id` и `is_capital`, и только
/// один раз, во время роста наций.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Province {
    pub id: u32,
    pub nation_id: Option<u32>,
    pub name: String,
    pub center: Point,
    pub polygon: Vec<Point>,
    pub neighbors: BTreeSet<u32>,
    pub terrain: Terrain,
    pub climate: Climate,
    pub area: f64,
    pub population: u64,
    pub is_capital: bool,
}
