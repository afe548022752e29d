use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MapError;
use crate::province::Province;
use crate::province::graph::is_connected_subset;

/// Нация — связная группа провинций вокруг столицы.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nation {
    pub id: u32,
    pub name: String,
    pub capital: u32,
    pub province_ids: Vec<u32>,
    pub area: f64,
    pub population: u64,
}

/// Итог роста наций.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowthReport {
    /// Столицы в порядке номеров наций (`capitals[i]` — столица нации `i + 1`)
    pub capitals: Vec<u32>,
    /// Провинции, до которых не дотянулась ни одна нация
    pub unreachable: Vec<u32>,
}

/// Делит провинции на `nation_count` наций.
///
/// Список провинций перемешивается (Фишер — Йетс), первые `nation_count`
/// становятся столицами, дальше — `grow_from_capitals`.
pub fn grow_nations(
    provinces: &mut [Province],
    nation_count: usize,
    rng: &mut impl Rng,
) -> Result<GrowthReport, MapError> {
    if nation_count == 0 || nation_count > provinces.len() {
        return Err(MapError::invalid(format!(
            "nation_count ({nation_count}) must be within 1..={} live provinces",
            provinces.len()
        )));
    }

    let mut order: Vec<usize> = (0..provinces.len()).collect();
    order.shuffle(rng);
    order.truncate(nation_count);

    Ok(grow_from_capitals(provinces, &order))
}

/// Одновременный BFS из всех столиц.
///
/// За один раунд каждая нация по порядку `1..=K` снимает одну провинцию со
/// своей очереди и забирает всех её ещё свободных соседей. Порядок наций в
/// раунде и есть правило разрешения конфликтов. Остановка — когда свободных
/// провинций не осталось или все очереди пусты одновременно.
///
/// `capitals` — индексы в `provinces`; нация `i + 1` растёт из `capitals[i]`.
pub fn grow_from_capitals(provinces: &mut [Province], capitals: &[usize]) -> GrowthReport {
    let mut assigned = vec![false; provinces.len()];
    let mut unassigned = provinces.len();
    let mut queues: Vec<VecDeque<usize>> = Vec::with_capacity(capitals.len());

    for (i, &capital) in capitals.iter().enumerate() {
        let province = &mut provinces[capital];
        province.nation_id = Some(i as u32 + 1);
        province.is_capital = true;
        assigned[capital] = true;
        unassigned -= 1;
        queues.push(VecDeque::from([capital]));
    }

    let mut rounds = 0;
    while unassigned > 0 {
        let mut progressed = false;
        for (i, queue) in queues.iter_mut().enumerate() {
            let Some(current) = queue.pop_front() else {
                continue;
            };
            progressed = true;

            let neighbors: Vec<usize> = provinces[current]
                .neighbors
                .iter()
                .map(|&n| n as usize)
                .collect();
            for n in neighbors {
                if n < assigned.len() && !assigned[n] {
                    assigned[n] = true;
                    unassigned -= 1;
                    provinces[n].nation_id = Some(i as u32 + 1);
                    queue.push_back(n);
                }
            }
        }
        if !progressed {
            break;
        }
        rounds += 1;
    }

    let unreachable: Vec<u32> = provinces
        .iter()
        .filter(|p| p.nation_id.is_none())
        .map(|p| p.id)
        .collect();
    if !unreachable.is_empty() {
        warn!(
            "{} провинций не достались ни одной нации: {:?}",
            unreachable.len(),
            unreachable
        );
    }
    debug!("Рост наций: {} столиц, {rounds} раундов", capitals.len());

    GrowthReport {
        capitals: capitals.iter().map(|&c| provinces[c].id).collect(),
        unreachable,
    }
}

/// Сводка по нациям; название нации — название её столицы.
#[must_use]
pub fn summarize_nations(provinces: &[Province]) -> Vec<Nation> {
    let mut nations: Vec<Nation> = provinces
        .iter()
        .filter(|p| p.is_capital)
        .filter_map(|p| {
            p.nation_id.map(|id| Nation {
                id,
                name: p.name.clone(),
                capital: p.id,
                province_ids: Vec::new(),
                area: 0.0,
                population: 0,
            })
        })
        .collect();
    nations.sort_by_key(|n| n.id);

    for province in provinces {
        let Some(nation_id) = province.nation_id else {
            continue;
        };
        if let Ok(idx) = nations.binary_search_by_key(&nation_id, |n| n.id) {
            let nation = &mut nations[idx];
            nation.province_ids.push(province.id);
            nation.area += province.area;
            nation.population += province.population;
        }
    }
    nations
}

/// Связна ли нация по графу смежности провинций.
#[must_use]
pub fn is_contiguous(provinces: &[Province], nation_id: u32) -> bool {
    let members: Vec<u32> = provinces
        .iter()
        .filter(|p| p.nation_id == Some(nation_id))
        .map(|p| p.id)
        .collect();
    is_connected_subset(provinces, &members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::province::graph::tests::stub;
    use crate::rng::rng_from_seed;

    /// A–B, A–C, B–D, C–D
    fn diamond() -> Vec<Province> {
        vec![
            stub(0, &[1, 2]), // A
            stub(1, &[0, 3]), // B
            stub(2, &[0, 3]), // C
            stub(3, &[1, 2]), // D
        ]
    }

    #[test]
    fn round_robin_tie_break_on_the_diamond() {
        let mut provinces = diamond();
        let report = grow_from_capitals(&mut provinces, &[0, 3]);

        // Нация 1 (A) ходит первой и забирает B и C раньше, чем нация 2 (D)
        // успевает снять D со своей очереди.
        let nations: Vec<Option<u32>> = provinces.iter().map(|p| p.nation_id).collect();
        assert_eq!(nations, vec![Some(1), Some(1), Some(1), Some(2)]);
        assert_eq!(report.capitals, vec![0, 3]);
        assert!(report.unreachable.is_empty());
        assert!(provinces[0].is_capital && provinces[3].is_capital);
        assert!(!provinces[1].is_capital && !provinces[2].is_capital);
    }

    #[test]
    fn reversed_nation_order_flips_the_diamond() {
        let mut provinces = diamond();
        grow_from_capitals(&mut provinces, &[3, 0]);
        let nations: Vec<Option<u32>> = provinces.iter().map(|p| p.nation_id).collect();
        assert_eq!(nations, vec![Some(2), Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn growth_alternates_on_a_path() {
        // 0-1-2-3-4-5, столицы на концах
        let mut provinces = vec![
            stub(0, &[1]),
            stub(1, &[0, 2]),
            stub(2, &[1, 3]),
            stub(3, &[2, 4]),
            stub(4, &[3, 5]),
            stub(5, &[4]),
        ];
        grow_from_capitals(&mut provinces, &[0, 5]);
        let nations: Vec<Option<u32>> = provinces.iter().map(|p| p.nation_id).collect();
        assert_eq!(
            nations,
            vec![Some(1), Some(1), Some(1), Some(2), Some(2), Some(2)]
        );
        assert!(is_contiguous(&provinces, 1));
        assert!(is_contiguous(&provinces, 2));
    }

    #[test]
    fn unreachable_provinces_stay_unassigned() {
        // 0-1   2 (изолирована)
        let mut provinces = vec![stub(0, &[1]), stub(1, &[0]), stub(2, &[])];
        let report = grow_from_capitals(&mut provinces, &[0]);
        assert_eq!(report.unreachable, vec![2]);
        assert_eq!(provinces[1].nation_id, Some(1));
        assert_eq!(provinces[2].nation_id, None);
    }

    #[test]
    fn every_province_a_nation() {
        let mut provinces = diamond();
        let mut rng = rng_from_seed("all");
        let report = grow_nations(&mut provinces, 4, &mut rng).unwrap();

        assert_eq!(report.capitals.len(), 4);
        assert!(provinces.iter().all(|p| p.is_capital));
        let mut ids: Vec<u32> = provinces.iter().filter_map(|p| p.nation_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn too_many_nations_is_rejected() {
        let mut provinces = diamond();
        let mut rng = rng_from_seed("many");
        assert!(matches!(
            grow_nations(&mut provinces, 5, &mut rng),
            Err(MapError::InvalidParameters(_))
        ));
        assert!(provinces.iter().all(|p| p.nation_id.is_none()));
    }

    #[test]
    fn summaries_add_up() {
        let mut provinces = diamond();
        provinces[1].population = 10;
        provinces[2].population = 5;
        grow_from_capitals(&mut provinces, &[0, 3]);
        let nations = summarize_nations(&provinces);

        assert_eq!(nations.len(), 2);
        assert_eq!(nations[0].id, 1);
        assert_eq!(nations[0].capital, 0);
        assert_eq!(nations[0].province_ids, vec![0, 1, 2]);
        assert_eq!(nations[0].population, 15);
        assert!((nations[0].area - 3.0).abs() < 1e-9);
        assert_eq!(nations[1].province_ids, vec![3]);
        assert_eq!(nations[1].name, "Prov_3");
    }
}
