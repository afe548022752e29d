// src/world.rs
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::error::MapError;
use crate::nation::{Nation, summarize_nations};
use crate::province::Province;

/// Версия формата карты
pub const MAP_FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

/// Готовая карта мира. Создаётся один раз и больше не меняется.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub seed: String,
    #[serde(rename = "regions")]
    pub provinces: Vec<Province>,
    pub borders: Vec<Border>,
    pub metadata: MapMetadata,
}

impl WorldMap {
    #[must_use]
    pub fn province(&self, id: u32) -> Option<&Province> {
        self.provinces.get(id as usize).filter(|p| p.id == id)
    }

    #[must_use]
    pub fn nations(&self) -> Vec<Nation> {
        summarize_nations(&self.provinces)
    }

    #[must_use]
    pub fn capitals(&self) -> Vec<&Province> {
        self.provinces.iter().filter(|p| p.is_capital).collect()
    }

    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Диагностика одного прогона генерации.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapStats {
    pub requested_provinces: usize,
    pub provinces: usize,
    pub nations: usize,
    pub borders: usize,
    /// Сайты, для которых не удалось построить клетку
    pub tessellation_gaps: usize,
    /// Провинции без нации
    pub unreachable_provinces: usize,
    /// Пары соседей без границы
    pub border_gaps: usize,
    /// Компоненты связности графа провинций
    pub components: usize,
}
