// src/geometry.rs
//! Плоская геометрия: точки, площади, отсечение полуплоскостью

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    #[must_use]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    #[must_use]
    pub fn approx_eq(self, other: Point, epsilon: f64) -> bool {
        self.distance(other) < epsilon
    }
}

/// Площадь многоугольника по формуле шнурования (всегда неотрицательная).
#[must_use]
pub fn polygon_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let n = polygon.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    (twice * 0.5).abs()
}

/// Прямоугольник карты `[0, width] × [0, height]` против часовой стрелки.
#[must_use]
pub fn rectangle(width: f64, height: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ]
}

/// Вершина клетки вместе с меткой ребра, которое из неё выходит.
///
/// Метка `Some(j)` — ребро лежит на серединном перпендикуляре к соседу `j`,
/// `None` — на границе карты.
pub type LabeledVertex = (Point, Option<usize>);

/// Отсекает выпуклый многоугольник полуплоскостью точек, которые ближе к
/// `site`, чем к `other` (алгоритм Сазерленда — Ходжмана).
///
/// Новые рёбра вдоль серединного перпендикуляра получают метку `label`.
#[must_use]
pub fn clip_by_bisector(
    polygon: &[LabeledVertex],
    site: Point,
    other: Point,
    label: usize,
) -> Vec<LabeledVertex> {
    let mid = site.midpoint(other);
    let (dx, dy) = (other.x - site.x, other.y - site.y);
    // f(p) <= 0 — точка на стороне site
    let side = |p: Point| (p.x - mid.x) * dx + (p.y - mid.y) * dy;

    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let (cur, cur_label) = polygon[i];
        let (next, _) = polygon[(i + 1) % n];
        let (fc, fn_) = (side(cur), side(next));
        let cur_in = fc <= 0.0;
        let next_in = fn_ <= 0.0;

        match (cur_in, next_in) {
            (true, true) => out.push((cur, cur_label)),
            (true, false) => {
                out.push((cur, cur_label));
                out.push((cur.lerp(next, fc / (fc - fn_)), Some(label)));
            }
            (false, true) => out.push((cur.lerp(next, fc / (fc - fn_)), cur_label)),
            (false, false) => {}
        }
    }
    dedup_vertices(out)
}

/// Склеивает совпадающие соседние вершины; метка берётся у последней,
/// так как именно её ребро имеет ненулевую длину.
fn dedup_vertices(vertices: Vec<LabeledVertex>) -> Vec<LabeledVertex> {
    const EPS: f64 = 1e-9;
    let mut out: Vec<LabeledVertex> = Vec::with_capacity(vertices.len());
    for (p, label) in vertices {
        match out.last_mut() {
            Some(last) if last.0.approx_eq(p, EPS) => last.1 = label,
            _ => out.push((p, label)),
        }
    }
    while out.len() > 1 && out[0].0.approx_eq(out[out.len() - 1].0, EPS) {
        if let Some((_, label)) = out.pop() {
            out[0].1 = label;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labeled(points: Vec<Point>) -> Vec<LabeledVertex> {
        points.into_iter().map(|p| (p, None)).collect()
    }

    #[test]
    fn area_is_positive_for_both_windings() {
        let mut square = rectangle(10.0, 4.0);
        assert_relative_eq!(polygon_area(&square), 40.0);
        square.reverse();
        assert_relative_eq!(polygon_area(&square), 40.0);
        assert_relative_eq!(polygon_area(&square[..2]), 0.0);
    }

    #[test]
    fn bisector_clip_halves_the_square() {
        let square = labeled(rectangle(10.0, 10.0));
        let clipped = clip_by_bisector(&square, Point::new(2.0, 5.0), Point::new(8.0, 5.0), 7);
        let polygon: Vec<Point> = clipped.iter().map(|v| v.0).collect();

        assert_eq!(polygon.len(), 4);
        assert_relative_eq!(polygon_area(&polygon), 50.0, epsilon = 1e-9);
        assert!(polygon.iter().all(|p| p.x <= 5.0 + 1e-9));
        // ровно одно ребро легло на перпендикуляр
        assert_eq!(clipped.iter().filter(|v| v.1 == Some(7)).count(), 1);
    }

    #[test]
    fn clip_through_a_corner_does_not_duplicate_vertices() {
        let square = labeled(rectangle(10.0, 10.0));
        // перпендикуляр — диагональ от (0, 10) к (10, 0)
        let clipped = clip_by_bisector(&square, Point::new(0.0, 0.0), Point::new(10.0, 10.0), 1);
        assert_eq!(clipped.len(), 3);
        let polygon: Vec<Point> = clipped.iter().map(|v| v.0).collect();
        assert_relative_eq!(polygon_area(&polygon), 50.0, epsilon = 1e-9);
        assert_eq!(clipped.iter().filter(|v| v.1 == Some(1)).count(), 1);
    }

    #[test]
    fn point_helpers() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_relative_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
        assert!(b.approx_eq(Point::new(3.05, 4.0), 0.1));
    }
}
