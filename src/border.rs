// src/border.rs
//! Фрактальные границы между соседними провинциями
//!
//! Для каждой пары соседей ищутся вершины одного многоугольника, лежащие
//! рядом с вершинами другого, — это концы общего ребра. Отрезок между первыми
//! двумя такими вершинами превращается в ломаную рекурсивным смещением
//! середины перпендикулярно отрезку. Самопересечения не исключаются.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BorderSettings;
use crate::geometry::Point;
use crate::province::Province;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Border {
    /// Канонический ключ пары: `"<меньший id>-<больший id>"`
    pub id: String,
    #[serde(rename = "region1")]
    pub province1: u32,
    #[serde(rename = "region2")]
    pub province2: u32,
    pub path: Vec<Point>,
}

#[must_use]
pub fn border_key(a: u32, b: u32) -> String {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    format!("{lo}-{hi}")
}

#[derive(Debug, Clone, Default)]
pub struct BorderReport {
    pub borders: Vec<Border>,
    /// Пары соседей, у которых не нашлось двух общих вершин
    pub gaps: usize,
}

/// Строит по одной границе на каждую пару соседей.
///
/// Пары обходятся в каноническом порядке (по id первой провинции, затем по
/// id соседа), поэтому шум границ детерминирован при том же сиде.
pub fn synthesize_borders(
    provinces: &[Province],
    settings: &BorderSettings,
    rng: &mut impl Rng,
) -> BorderReport {
    let mut report = BorderReport::default();
    let mut seen = HashSet::new();

    for province in provinces {
        for &n_id in &province.neighbors {
            let key = border_key(province.id, n_id);
            if !seen.insert(key.clone()) {
                continue;
            }
            let (Some(a), Some(b)) = (
                provinces.get(province.id.min(n_id) as usize),
                provinces.get(province.id.max(n_id) as usize),
            ) else {
                report.gaps += 1;
                continue;
            };

            let shared = shared_vertices(&a.polygon, &b.polygon, settings.shared_vertex_epsilon);
            let [start, end, ..] = shared[..] else {
                debug!("Граница {key}: найдено общих вершин — {}", shared.len());
                report.gaps += 1;
                continue;
            };

            report.borders.push(Border {
                id: key,
                province1: a.id,
                province2: b.id,
                path: wavy_path(start, end, settings, rng),
            });
        }
    }

    debug!(
        "Границ построено: {}, пропущено: {}",
        report.borders.len(),
        report.gaps
    );
    report
}

/// Вершины `first`, у которых в `second` есть вершина ближе `epsilon`,
/// в порядке обхода `first`.
#[must_use]
pub fn shared_vertices(first: &[Point], second: &[Point], epsilon: f64) -> Vec<Point> {
    first
        .iter()
        .filter(|p| second.iter().any(|q| p.approx_eq(*q, epsilon)))
        .copied()
        .collect()
}

/// Ломаная от `start` до `end` методом смещения середины.
///
/// Первая и последняя точки — ровно `start` и `end`.
pub fn wavy_path(
    start: Point,
    end: Point,
    settings: &BorderSettings,
    rng: &mut impl Rng,
) -> Vec<Point> {
    let mut path = vec![start];
    let displacement = start.distance(end) * settings.initial_displacement;
    displace(start, end, displacement, 0, settings, rng, &mut path);
    path
}

fn displace(
    start: Point,
    end: Point,
    displacement: f64,
    depth: u32,
    settings: &BorderSettings,
    rng: &mut impl Rng,
    path: &mut Vec<Point>,
) {
    let length = start.distance(end);
    if length < settings.min_segment_length || depth >= settings.max_depth {
        path.push(end);
        return;
    }

    // единичная нормаль к отрезку
    let nx = -(end.y - start.y) / length;
    let ny = (end.x - start.x) / length;
    let offset = rng.gen_range(-1.0..1.0) * displacement;
    let mid = start.midpoint(end);
    let mid = Point::new(mid.x + nx * offset, mid.y + ny * offset);

    let next = displacement * settings.roughness;
    displace(start, mid, next, depth + 1, settings, rng, path);
    displace(mid, end, next, depth + 1, settings, rng, path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle;
    use crate::province::graph::tests::stub;
    use crate::rng::rng_from_seed;

    #[test]
    fn keys_are_canonical() {
        assert_eq!(border_key(7, 3), "3-7");
        assert_eq!(border_key(3, 7), "3-7");
    }

    #[test]
    fn path_keeps_its_endpoints_and_subdivides() {
        let settings = BorderSettings::default();
        let mut rng = rng_from_seed("wavy");
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let path = wavy_path(start, end, &settings, &mut rng);

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        assert!(path.len() > 2);
        // каждый отрезок ломаной короче порога деления
        for pair in path.windows(2) {
            assert!(pair[0].distance(pair[1]) < settings.min_segment_length);
        }
    }

    #[test]
    fn short_segment_stays_straight() {
        let settings = BorderSettings::default();
        let mut rng = rng_from_seed("short");
        let path = wavy_path(Point::new(0.0, 0.0), Point::new(3.0, 0.0), &settings, &mut rng);
        assert_eq!(path, vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
    }

    #[test]
    fn zero_displacement_keeps_the_line_straight() {
        let settings = BorderSettings {
            initial_displacement: 0.0,
            ..BorderSettings::default()
        };
        let mut rng = rng_from_seed("flat");
        let path = wavy_path(Point::new(0.0, 5.0), Point::new(64.0, 5.0), &settings, &mut rng);
        assert!(path.iter().all(|p| (p.y - 5.0).abs() < 1e-12));
    }

    #[test]
    fn neighbours_with_a_shared_edge_get_one_border() {
        // два квадрата 10×10 с общим ребром x = 10
        let mut left = stub(0, &[1]);
        left.polygon = rectangle(10.0, 10.0);
        let mut right = stub(1, &[0]);
        right.polygon = rectangle(10.0, 10.0)
            .into_iter()
            .map(|p| Point::new(p.x + 10.0, p.y))
            .collect();

        let mut rng = rng_from_seed("pair");
        let report = synthesize_borders(&[left, right], &BorderSettings::default(), &mut rng);

        assert_eq!(report.gaps, 0);
        assert_eq!(report.borders.len(), 1);
        let border = &report.borders[0];
        assert_eq!(border.id, "0-1");
        assert_eq!((border.province1, border.province2), (0, 1));
        assert_eq!(border.path.first(), Some(&Point::new(10.0, 0.0)));
        assert_eq!(border.path.last(), Some(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn neighbours_touching_at_one_vertex_are_skipped() {
        let mut a = stub(0, &[1]);
        a.polygon = rectangle(10.0, 10.0);
        let mut b = stub(1, &[0]);
        b.polygon = rectangle(10.0, 10.0)
            .into_iter()
            .map(|p| Point::new(p.x + 10.0, p.y + 10.0))
            .collect();

        let mut rng = rng_from_seed("corner");
        let report = synthesize_borders(&[a, b], &BorderSettings::default(), &mut rng);
        assert!(report.borders.is_empty());
        assert_eq!(report.gaps, 1);
    }
}
