// src/render.rs
//! Визуализация карты в PNG
//!
//! Провинции заливаются цветом нации (ничейные — серым) или цветом
//! ландшафта, поверх рисуются фрактальные границы и столицы. Цвет нации
//! детерминирован её номером, поэтому одна и та же карта всегда выглядит
//! одинаково.

use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as PixelPoint;
use rand::{Rng, SeedableRng};

use crate::error::MapError;
use crate::geometry::Point;
use crate::province::Province;
use crate::world::WorldMap;

const BACKGROUND: Rgba<u8> = Rgba([20, 20, 60, 255]);
const UNASSIGNED: Rgba<u8> = Rgba([128, 128, 128, 255]);
const NATION_BORDER: Rgba<u8> = Rgba([20, 20, 20, 255]);
const PROVINCE_BORDER: Rgba<u8> = Rgba([90, 90, 90, 255]);
const CAPITAL: Rgba<u8> = Rgba([200, 30, 30, 255]);

/// Максимальная сторона изображения в пикселях
const MAX_SIDE: f64 = 8192.0;

/// Чем заливать провинции.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillMode {
    #[default]
    Nations,
    Terrain,
}

fn nation_color(nation_id: u32) -> Rgba<u8> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(u64::from(nation_id));
    Rgba([
        rng.gen_range(100..220),
        rng.gen_range(120..255),
        rng.gen_range(50..160),
        255,
    ])
}

fn to_pixel(p: Point, scale: f64) -> (f32, f32) {
    ((p.x * scale) as f32, (p.y * scale) as f32)
}

/// Контур многоугольника в целых пикселях без повторов.
///
/// `draw_polygon_mut` паникует, если первая точка совпадает с последней.
fn pixel_polygon(polygon: &[Point], scale: f64) -> Vec<PixelPoint<i32>> {
    let mut points: Vec<PixelPoint<i32>> = Vec::with_capacity(polygon.len());
    for p in polygon {
        let q = PixelPoint::new((p.x * scale).round() as i32, (p.y * scale).round() as i32);
        if points.last() != Some(&q) {
            points.push(q);
        }
    }
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn terrain_color(province: &Province) -> Rgba<u8> {
    let [r, g, b] = province.terrain.to_rgb();
    Rgba([r, g, b, 255])
}

/// Рисует карту; `scale` — пикселей на единицу длины карты.
pub fn render_map(map: &WorldMap, scale: f64, mode: FillMode) -> Result<RgbaImage, MapError> {
    if !(scale > 0.0) || map.width * scale > MAX_SIDE || map.height * scale > MAX_SIDE {
        return Err(MapError::InvalidParameters(format!(
            "scale {scale} gives an image outside 1..={MAX_SIDE} px per side"
        )));
    }
    let width = ((map.width * scale).ceil() as u32).max(1);
    let height = ((map.height * scale).ceil() as u32).max(1);
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    let mut colors: HashMap<u32, Rgba<u8>> = HashMap::new();
    for province in &map.provinces {
        let color = match mode {
            FillMode::Nations => province
                .nation_id
                .map_or(UNASSIGNED, |id| *colors.entry(id).or_insert_with(|| nation_color(id))),
            FillMode::Terrain => terrain_color(province),
        };
        let polygon = pixel_polygon(&province.polygon, scale);
        if polygon.len() >= 3 {
            draw_polygon_mut(&mut img, &polygon, color);
        }
    }

    for border in &map.borders {
        let nation = |id: u32| map.province(id).and_then(|p| p.nation_id);
        let color = if nation(border.province1) == nation(border.province2) {
            PROVINCE_BORDER
        } else {
            NATION_BORDER
        };
        for pair in border.path.windows(2) {
            draw_line_segment_mut(
                &mut img,
                to_pixel(pair[0], scale),
                to_pixel(pair[1], scale),
                color,
            );
        }
    }

    let radius = ((3.0 * scale).round() as i32).max(2);
    for capital in map.capitals() {
        let (x, y) = to_pixel(capital.center, scale);
        draw_filled_circle_mut(&mut img, (x as i32, y as i32), radius, CAPITAL);
    }

    Ok(img)
}

pub fn save_png(
    map: &WorldMap,
    path: impl AsRef<Path>,
    scale: f64,
    mode: FillMode,
) -> Result<(), MapError> {
    render_map(map, scale, mode)?.save(path)?;
    Ok(())
}
