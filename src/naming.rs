// src/naming.rs
//! Слоговый генератор названий провинций
//!
//! Название = начальный слог + (иногда) средний слог + конечный слог.
//! Уникальность не проверяется: одинаковые названия у разных провинций допустимы.

use rand::Rng;
use rand::seq::SliceRandom;

const START_SYLLABLES: [&str; 24] = [
    "Al", "Bar", "Cor", "Dun", "El", "Fal", "Gar", "Hal", "Ir", "Kar", "Lor", "Mar", "Nor", "Or",
    "Pel", "Quel", "Ros", "Sar", "Tal", "Ul", "Val", "Wen", "Yr", "Zan",
];

const MIDDLE_SYLLABLES: [&str; 16] = [
    "a", "e", "i", "o", "an", "en", "in", "on", "ar", "er", "ir", "or", "al", "el", "il", "ol",
];

const END_SYLLABLES: [&str; 20] = [
    "dor", "heim", "ia", "mar", "mont", "nia", "ran", "reth", "stad", "thal", "vale", "wick",
    "burg", "ford", "gard", "holm", "land", "mere", "shire", "ton",
];

/// Вероятность вставить средний слог
const MIDDLE_CHANCE: f64 = 0.5;

pub struct NameGenerator;

impl NameGenerator {
    /// Название провинции (например, "Karendor", "Valmere").
    pub fn place_name(rng: &mut impl Rng) -> String {
        let start = START_SYLLABLES.choose(rng).copied().unwrap_or("Al");
        let middle = if rng.gen_bool(MIDDLE_CHANCE) {
            MIDDLE_SYLLABLES.choose(rng).copied().unwrap_or_default()
        } else {
            ""
        };
        let end = END_SYLLABLES.choose(rng).copied().unwrap_or("ia");
        format!("{start}{middle}{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::rng_from_seed;

    #[test]
    fn names_are_capitalized_and_built_from_pools() {
        let mut rng = rng_from_seed("names");
        for _ in 0..100 {
            let name = NameGenerator::place_name(&mut rng);
            assert!(name.chars().next().is_some_and(char::is_uppercase), "{name}");
            assert!(START_SYLLABLES.iter().any(|s| name.starts_with(s)), "{name}");
            assert!(END_SYLLABLES.iter().any(|s| name.ends_with(s)), "{name}");
        }
    }

    #[test]
    fn names_follow_the_seed() {
        let a: Vec<String> = {
            let mut rng = rng_from_seed("kingdom");
            (0..10).map(|_| NameGenerator::place_name(&mut rng)).collect()
        };
        let b: Vec<String> = {
            let mut rng = rng_from_seed("kingdom");
            (0..10).map(|_| NameGenerator::place_name(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
