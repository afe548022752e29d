// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие генерацией:
//! - Размер карты, число провинций и наций, сид
//! - Настройки фрактальных границ
//! - Диапазон плотности населения
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::MapError;

/// Настройки фрактальных границ между провинциями
///
/// Граница строится рекурсивным смещением середины отрезка
/// между двумя общими вершинами соседних провинций.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorderSettings {
    /// Максимальное расстояние, на котором вершины двух многоугольников считаются общими
    #[serde(default = "default_shared_vertex_epsilon")]
    pub shared_vertex_epsilon: f64,

    /// Множитель смещения на каждом уровне рекурсии:
    /// - ближе к `0.0` → граница быстро выпрямляется,
    /// - ближе к `1.0` → мелкие изломы почти так же сильны, как крупные.
    #[serde(default = "default_roughness")]
    pub roughness: f64,

    /// Начальное смещение как доля длины исходного отрезка
    #[serde(default = "default_initial_displacement")]
    pub initial_displacement: f64,

    /// Отрезки короче этого не делятся дальше
    #[serde(default = "default_min_segment_length")]
    pub min_segment_length: f64,

    /// Жёсткий предел глубины рекурсии
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_shared_vertex_epsilon() -> f64 {
    0.1
}
fn default_roughness() -> f64 {
    0.5
}
fn default_initial_displacement() -> f64 {
    0.25
}
fn default_min_segment_length() -> f64 {
    5.0
}
fn default_max_depth() -> u32 {
    12
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            shared_vertex_epsilon: 0.1,
            roughness: 0.5,
            initial_displacement: 0.25,
            min_segment_length: 5.0,
            max_depth: 12,
        }
    }
}

/// Плотность населения на единицу площади (чисто косметическая величина)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopulationSettings {
    #[serde(default = "default_min_density")]
    pub min_density: f64,
    #[serde(default = "default_max_density")]
    pub max_density: f64,
}

fn default_min_density() -> f64 {
    0.5
}
fn default_max_density() -> f64 {
    2.0
}

impl Default for PopulationSettings {
    fn default() -> Self {
        Self {
            min_density: 0.5,
            max_density: 2.0,
        }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация для одного вызова генерации. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldGenerationParams {
    /// Ширина карты (по умолчанию 1000)
    #[serde(default = "default_width")]
    pub width: f64,

    /// Высота карты (по умолчанию 600)
    #[serde(default = "default_height")]
    pub height: f64,

    /// Запрошенное число провинций. Фактическое может быть меньше:
    /// вырожденные клетки тесселяции отбрасываются.
    #[serde(default = "default_province_count")]
    pub province_count: usize,

    /// Число наций, не больше числа провинций
    #[serde(default = "default_nation_count")]
    pub nation_count: usize,

    /// Сид генератора. Без него сид создаётся заново и записывается в карту.
    #[serde(default)]
    pub seed: Option<String>,

    /// Настройки фрактальных границ
    #[serde(default)]
    pub borders: BorderSettings,

    /// Плотность населения
    #[serde(default)]
    pub population: PopulationSettings,
}

fn default_width() -> f64 {
    1000.0
}
fn default_height() -> f64 {
    600.0
}
fn default_province_count() -> usize {
    40
}
fn default_nation_count() -> usize {
    5
}

impl Default for WorldGenerationParams {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            province_count: 40,
            nation_count: 5,
            seed: None,
            borders: BorderSettings::default(),
            population: PopulationSettings::default(),
        }
    }
}

impl WorldGenerationParams {
    #[must_use]
    pub fn new(width: f64, height: f64, province_count: usize, nation_count: usize) -> Self {
        Self {
            width,
            height,
            province_count,
            nation_count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// width = 1200
    /// height = 800
    /// province_count = 60
    /// nation_count = 6
    /// seed = "test1"
    ///
    /// [borders]
    /// roughness = 0.6
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, MapError> {
        Ok(toml::from_str(contents)?)
    }

    /// Проверяет параметры до начала любых вычислений.
    pub fn validate(&self) -> Result<(), MapError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(MapError::invalid(format!(
                "width must be a positive number, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(MapError::invalid(format!(
                "height must be a positive number, got {}",
                self.height
            )));
        }
        if self.province_count == 0 {
            return Err(MapError::invalid("province_count must be positive"));
        }
        if self.nation_count == 0 {
            return Err(MapError::invalid("nation_count must be positive"));
        }
        if self.nation_count > self.province_count {
            return Err(MapError::invalid(format!(
                "nation_count ({}) exceeds province_count ({})",
                self.nation_count, self.province_count
            )));
        }

        let b = &self.borders;
        if !(b.shared_vertex_epsilon.is_finite() && b.shared_vertex_epsilon > 0.0) {
            return Err(MapError::invalid("borders.shared_vertex_epsilon must be positive"));
        }
        if !(b.roughness > 0.0 && b.roughness < 1.0) {
            return Err(MapError::invalid("borders.roughness must lie in (0, 1)"));
        }
        if !(b.initial_displacement.is_finite() && b.initial_displacement >= 0.0) {
            return Err(MapError::invalid(
                "borders.initial_displacement must be a finite non-negative number",
            ));
        }
        if !(b.min_segment_length.is_finite() && b.min_segment_length > 0.0) {
            return Err(MapError::invalid("borders.min_segment_length must be positive"));
        }

        let p = &self.population;
        if !(p.min_density.is_finite()
            && p.max_density.is_finite()
            && p.min_density >= 0.0
            && p.max_density >= p.min_density)
        {
            return Err(MapError::invalid(
                "population density range must be finite, non-negative and ordered",
            ));
        }
        Ok(())
    }
}
