// src/province/factory.rs
use crate::config::PopulationSettings;
use crate::geometry::polygon_area;
use crate::naming::NameGenerator;
use crate::province::{Climate, Province, Terrain};
use crate::tessellation::Cell;
use rand::Rng;

/// Превращает клетки тесселяции в провинции.
///
/// Порядок обращений к генератору для каждой клетки фиксирован:
/// рельеф, климат, название, плотность населения.
pub fn build_provinces(
    cells: &[Cell],
    population: &PopulationSettings,
    rng: &mut impl Rng,
) -> Vec<Province> {
    cells
        .iter()
        .enumerate()
        .map(|(id, cell)| {
            let terrain = Terrain::random(rng);
            let climate = Climate::random(rng);
            let name = NameGenerator::place_name(rng);
            let density = if population.max_density > population.min_density {
                rng.gen_range(population.min_density..population.max_density)
            } else {
                population.min_density
            };
            let area = polygon_area(&cell.polygon);

            Province {
                id: id as u32,
                nation_id: None,
                name,
                center: cell.site,
                polygon: cell.polygon.clone(),
                neighbors: cell.neighbors.iter().map(|&n| n as u32).collect(),
                terrain,
                climate,
                area,
                population: (area * density).round() as u64,
                is_capital: false,
            }
        })
        .collect()
}
