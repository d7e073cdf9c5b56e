use crate::settings::{Difficulty, Language, Level, Settings};
use include_dir::{include_dir, Dir};

static EXERCISE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/exercises");

/// Resolves `(language, difficulty, level)` to an exercise text.
///
/// Lookup never fails: a missing exercise file is substituted with a
/// non-empty placeholder so sessions and scoring always see real text.
pub fn exercise_text(settings: &Settings) -> String {
    let name = file_name(settings.language, settings.difficulty, settings.level);
    match EXERCISE_DIR.get_file(&name).and_then(|f| f.contents_utf8()) {
        Some(text) => text.trim_end_matches('\n').to_string(),
        None => placeholder(settings),
    }
}

fn file_name(language: Language, difficulty: Difficulty, level: Level) -> String {
    let level = match level {
        Level::L1 => "l1",
        Level::L2 => "l2",
        Level::L3 => "l3",
        Level::L4 => "l4",
        Level::L5 => "l5",
        Level::BigText => "big_text",
    };
    format!(
        "{}_{}_{}.txt",
        language.to_string().to_lowercase(),
        difficulty.to_string().to_lowercase(),
        level
    )
}

fn placeholder(settings: &Settings) -> String {
    format!(
        "Exercise not found for {}, difficulty {}, level {}",
        settings.language, settings.difficulty, settings.level
    )
}
