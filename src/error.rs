// src/error.rs
//! Ошибки генератора карт
//!
//! Прерывает генерацию только `InvalidParameters`. Пропуски тесселяции,
//! недостижимые провинции и несостоявшиеся границы ошибками не считаются:
//! они попадают в диагностику (`MapStats`) и в лог.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Map not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl MapError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MapError::InvalidParameters(message.into())
    }
}
