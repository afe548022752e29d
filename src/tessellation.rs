// src/tessellation.rs
//! Разбиение прямоугольника карты на клетки Вороного
//!
//! 1. **Сэмплирование** — `sample_points` бросает N равномерных точек.
//! 2. **Делоне** — точки вставляются в `spade::DelaunayTriangulation`.
//! 3. **Клетки** — клетка сайта получается из прямоугольника карты
//!    отсечением серединными перпендикулярами ко всем соседям по Делоне.
//!    Рёбра клетки помнят, каким соседом они порождены, поэтому смежность
//!    берётся из самой ограниченной диаграммы, а не из триангуляции:
//!    соседи по Делоне, чьи клетки внутри карты не соприкасаются, отбрасываются.
//!
//! Сайт, для которого клетку построить не удалось (дубликат точки, ошибка
//! вставки, вырожденный многоугольник), просто пропадает — итоговых клеток
//! может оказаться меньше, чем запрошено.

use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use spade::{DelaunayTriangulation, Point2, Triangulation};
use tracing::{debug, warn};

use crate::geometry::{self, LabeledVertex, Point};

/// Рёбра короче этого считаются точечным касанием, а не общей границей.
const MIN_SHARED_EDGE: f64 = 1e-7;
const MIN_CELL_AREA: f64 = 1e-9;

/// Ограниченная клетка Вороного.
#[derive(Debug, Clone)]
pub struct Cell {
    pub site: Point,
    pub polygon: Vec<Point>,
    /// Индексы соседних клеток в `Tessellation::cells`
    pub neighbors: BTreeSet<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    /// Выжившие клетки, перенумерованные подряд в порядке сэмплирования
    pub cells: Vec<Cell>,
    /// Сколько сайтов потеряно
    pub gaps: usize,
}

/// Равномерные точки в `[0, width) × [0, height)`.
pub fn sample_points(width: f64, height: f64, count: usize, rng: &mut impl Rng) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..width);
            let y = rng.gen_range(0.0..height);
            Point::new(x, y)
        })
        .collect()
}

#[must_use]
pub fn tessellate(sites: &[Point], width: f64, height: f64) -> Tessellation {
    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    // индекс вершины spade -> первый сайт с этой позицией
    let mut owner: HashMap<usize, usize> = HashMap::with_capacity(sites.len());
    let mut handles = vec![None; sites.len()];

    for (i, site) in sites.iter().enumerate() {
        match triangulation.insert(Point2::new(site.x, site.y)) {
            Ok(handle) => {
                if let std::collections::hash_map::Entry::Vacant(slot) = owner.entry(handle.index())
                {
                    slot.insert(i);
                    handles[i] = Some(handle);
                } else {
                    debug!("Сайт {i} совпал с уже вставленной точкой");
                }
            }
            Err(err) => debug!("Сайт {i} не вставлен в триангуляцию: {err:?}"),
        }
    }

    let frame: Vec<LabeledVertex> = geometry::rectangle(width, height)
        .into_iter()
        .map(|p| (p, None))
        .collect();

    // ШАГ 1: клетки в индексах исходных сайтов
    let mut raw: Vec<Option<(Vec<Point>, BTreeSet<usize>)>> = vec![None; sites.len()];
    for (i, handle) in handles.iter().enumerate() {
        let Some(handle) = *handle else { continue };
        let vertex = triangulation.vertex(handle);

        let mut cell = frame.clone();
        for edge in vertex.out_edges() {
            let neighbor = edge.to();
            let Some(&j) = owner.get(&neighbor.fix().index()) else {
                continue;
            };
            let pos = neighbor.position();
            cell = geometry::clip_by_bisector(&cell, sites[i], Point::new(pos.x, pos.y), j);
            if cell.is_empty() {
                break;
            }
        }

        let polygon: Vec<Point> = cell.iter().map(|v| v.0).collect();
        if polygon.len() < 3 || geometry::polygon_area(&polygon) < MIN_CELL_AREA {
            continue;
        }

        let n = cell.len();
        let neighbors = (0..n)
            .filter_map(|k| {
                let (p, label) = cell[k];
                let next = cell[(k + 1) % n].0;
                label.filter(|_| p.distance(next) > MIN_SHARED_EDGE)
            })
            .collect();
        raw[i] = Some((polygon, neighbors));
    }

    // ШАГ 2: плотная нумерация выживших
    let mut dense = vec![None; sites.len()];
    let mut cells = Vec::with_capacity(sites.len());
    for (i, entry) in raw.iter().enumerate() {
        if let Some((polygon, _)) = entry {
            dense[i] = Some(cells.len());
            cells.push(Cell {
                site: sites[i],
                polygon: polygon.clone(),
                neighbors: BTreeSet::new(),
            });
        }
    }

    // ШАГ 3: симметричная смежность
    for (i, entry) in raw.iter().enumerate() {
        let (Some(a), Some((_, neighbors))) = (dense[i], entry) else {
            continue;
        };
        for &j in neighbors {
            if let Some(b) = dense[j] {
                cells[a].neighbors.insert(b);
                cells[b].neighbors.insert(a);
            }
        }
    }

    let gaps = sites.len() - cells.len();
    if gaps > 0 {
        warn!("Потеряно {gaps} клеток из {} при тесселяции", sites.len());
    }
    debug!(
        "Тесселяция: {} клеток, {} вершин Делоне",
        cells.len(),
        triangulation.num_vertices()
    );

    Tessellation { cells, gaps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::rng_from_seed;
    use approx::assert_relative_eq;

    fn total_area(t: &Tessellation) -> f64 {
        t.cells.iter().map(|c| geometry::polygon_area(&c.polygon)).sum()
    }

    #[test]
    fn sampled_points_stay_inside_the_map() {
        let mut rng = rng_from_seed("points");
        let points = sample_points(1000.0, 600.0, 200, &mut rng);
        assert_eq!(points.len(), 200);
        assert!(
            points
                .iter()
                .all(|p| (0.0..1000.0).contains(&p.x) && (0.0..600.0).contains(&p.y))
        );
    }

    #[test]
    fn four_quadrants() {
        let sites = [
            Point::new(25.0, 25.0),
            Point::new(75.0, 25.0),
            Point::new(25.0, 75.0),
            Point::new(75.0, 75.0),
        ];
        let t = tessellate(&sites, 100.0, 100.0);

        assert_eq!(t.gaps, 0);
        assert_eq!(t.cells.len(), 4);
        for cell in &t.cells {
            assert_relative_eq!(geometry::polygon_area(&cell.polygon), 2500.0, epsilon = 1e-6);
        }
        assert!(t.cells[0].neighbors.contains(&1));
        assert!(t.cells[0].neighbors.contains(&2));
        assert!(t.cells[3].neighbors.contains(&1));
        assert!(t.cells[3].neighbors.contains(&2));
    }

    #[test]
    fn single_site_owns_the_whole_map() {
        let t = tessellate(&[Point::new(10.0, 20.0)], 50.0, 40.0);
        assert_eq!(t.cells.len(), 1);
        assert!(t.cells[0].neighbors.is_empty());
        assert_relative_eq!(geometry::polygon_area(&t.cells[0].polygon), 2000.0);
    }

    #[test]
    fn duplicate_site_is_dropped() {
        let sites = [
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(80.0, 50.0),
        ];
        let t = tessellate(&sites, 100.0, 100.0);
        assert_eq!(t.gaps, 1);
        assert_eq!(t.cells.len(), 2);
        assert_eq!(t.cells[0].neighbors, BTreeSet::from([1]));
        assert_eq!(t.cells[1].neighbors, BTreeSet::from([0]));
    }

    #[test]
    fn random_cells_cover_the_map_with_symmetric_adjacency() {
        let mut rng = rng_from_seed("cover");
        let sites = sample_points(800.0, 500.0, 120, &mut rng);
        let t = tessellate(&sites, 800.0, 500.0);

        assert_eq!(t.cells.len() + t.gaps, 120);
        assert_relative_eq!(total_area(&t), 800.0 * 500.0, max_relative = 1e-9);

        for (a, cell) in t.cells.iter().enumerate() {
            assert!(cell.polygon.len() >= 3);
            assert!(!cell.neighbors.contains(&a));
            for &b in &cell.neighbors {
                assert!(t.cells[b].neighbors.contains(&a), "{a} -> {b} не симметрично");
                // у соседей должно быть общее ребро, то есть хотя бы две общие вершины
                let shared = cell
                    .polygon
                    .iter()
                    .filter(|p| t.cells[b].polygon.iter().any(|q| p.approx_eq(*q, 1e-6)))
                    .count();
                assert!(shared >= 2, "клетки {a} и {b} без общего ребра");
            }
        }
    }
}
