use crate::scoring::Score;
use crate::settings::{Difficulty, Language, Level, Settings};
use chrono::Local;
use directories::ProjectDirs;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One persisted attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: String,
    pub language: Language,
    pub difficulty: Difficulty,
    pub level: Level,
    pub chars_typed: usize,
    pub total_chars: usize,
    pub correct_keystrokes: usize,
    pub accuracy: f64,
    pub wpm: f64,
    pub time_elapsed: f64,
    pub completed: bool,
}

impl Record {
    pub fn from_attempt(settings: &Settings, score: &Score, total_chars: usize) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            language: settings.language,
            difficulty: settings.difficulty,
            level: settings.level,
            chars_typed: score.chars_typed,
            total_chars,
            correct_keystrokes: score.correct_keystrokes,
            accuracy: (score.accuracy * 100.0).round() / 100.0,
            wpm: (score.wpm * 100.0).round() / 100.0,
            time_elapsed: (score.elapsed_secs * 100.0).round() / 100.0,
            completed: score.chars_typed >= total_chars,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    records: Vec<Record>,
}

/// JSON-backed attempt history.
///
/// Loads are tolerant: a missing or unparseable file is treated as an
/// empty history rather than an error.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<Record>,
}

impl RecordStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keyduel") {
            pd.data_dir().join("records.json")
        } else {
            PathBuf::from("keyduel_records.json")
        };
        Self::with_path(path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref().to_path_buf();
        let records = load_records(&path);
        Self { path, records }
    }

    pub fn save_record(&mut self, record: Record) -> std::io::Result<()> {
        self.records.push(record);
        self.flush()
    }

    /// The `count` most recent records, oldest first.
    pub fn last(&self, count: usize) -> Vec<&Record> {
        let sorted: Vec<&Record> = self
            .records
            .iter()
            .sorted_by(|a, b| a.timestamp.cmp(&b.timestamp))
            .collect();
        let skip = sorted.len().saturating_sub(count);
        sorted.into_iter().skip(skip).collect()
    }

    /// The historical maximum-WPM record for the given exercise, if any.
    pub fn best_record(
        &self,
        language: Language,
        difficulty: Difficulty,
        level: Level,
    ) -> Option<&Record> {
        self.records
            .iter()
            .filter(|r| r.language == language && r.difficulty == difficulty && r.level == level)
            .max_by(|a, b| a.wpm.total_cmp(&b.wpm))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = RecordFile {
            records: self.records.clone(),
        };
        let data = serde_json::to_vec_pretty(&file).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

fn load_records(path: &Path) -> Vec<Record> {
    if let Ok(bytes) = fs::read(path) {
        if let Ok(file) = serde_json::from_slice::<RecordFile>(&bytes) {
            return file.records;
        }
    }
    Vec::new()
}
