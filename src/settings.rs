use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ValueEnum)]
pub enum Language {
    English,
    Russian,
    Chinese,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ValueEnum)]
pub enum Difficulty {
    Simple,
    Middle,
    Hard,
}

/// Exercise levels. `BigText` is the long-form exercise used by fixed-text
/// tournaments; it is never drawn randomly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ValueEnum)]
pub enum Level {
    L1,
    L2,
    L3,
    L4,
    L5,
    BigText,
}

impl Level {
    const RANDOM_POOL: [Level; 5] = [Level::L1, Level::L2, Level::L3, Level::L4, Level::L5];
}

/// The shared language/difficulty/level triple an exercise is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,
    pub difficulty: Difficulty,
    pub level: Level,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            difficulty: Difficulty::Simple,
            level: Level::L1,
        }
    }
}

impl Settings {
    pub fn new(language: Language, difficulty: Difficulty, level: Level) -> Self {
        Self {
            language,
            difficulty,
            level,
        }
    }

    /// Draws a fresh standard level; tournaments call this between matches
    /// when not running in big-text mode.
    pub fn randomize_level<R: Rng>(&mut self, rng: &mut R) {
        // choose over a non-empty const array cannot fail
        if let Some(level) = Level::RANDOM_POOL.choose(rng) {
            self.level = *level;
        }
    }

    pub fn set_big_text(&mut self) {
        self.level = Level::BigText;
    }
}
