// src/rng.rs
//! Детерминированный источник случайности
//!
//! Каждый вызов генерации получает собственный экземпляр `MapRng`, созданный
//! из строки-сида. Глобального генератора нет, поэтому параллельные вызовы
//! не перемешивают свои последовательности.

use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};

/// Генератор, через который проходят все случайные решения одной карты.
pub type MapRng = rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Создаёт генератор из строкового сида.
///
/// Хеш FNV-1a не зависит от платформы и версии компилятора
/// (в отличие от `DefaultHasher`), поэтому один и тот же сид даёт
/// одну и ту же карту на любой машине.
#[must_use]
pub fn rng_from_seed(seed: &str) -> MapRng {
    MapRng::seed_from_u64(fnv1a(FNV_OFFSET_BASIS, seed.as_bytes()))
}

/// Новый сид для вызова без явного сида. Возвращается в `WorldMap::seed`.
#[must_use]
pub fn fresh_seed() -> String {
    random_suffix(16)
}

/// Идентификатор карты: время + случайный хвост.
///
/// Берётся из `thread_rng`, а не из сидированного потока: содержимое карты
/// зависит только от параметров и сида.
#[must_use]
pub fn map_id() -> String {
    format!(
        "map_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        random_suffix(6).to_lowercase()
    )
}

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn fnv1a(mut state: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        state ^= u64::from(*byte);
        state = state.wrapping_mul(FNV_PRIME);
    }
    state
}
