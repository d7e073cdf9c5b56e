use crate::scoring::Score;
use crate::settings::{Difficulty, Language};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One persisted tournament outcome: the winner and their best score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentStat {
    pub language: Language,
    pub difficulty: Difficulty,
    pub correct_keystrokes: usize,
    pub uniformity_score: u32,
    pub name: String,
}

impl TournamentStat {
    pub fn new(language: Language, difficulty: Difficulty, name: String, best: &Score) -> Self {
        Self {
            language,
            difficulty,
            correct_keystrokes: best.correct_keystrokes,
            uniformity_score: best.uniformity_score,
            name,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatFile {
    stats: Vec<TournamentStat>,
}

/// JSON-backed tournament history, tolerant of missing or corrupt files
/// like [`crate::records::RecordStore`].
#[derive(Debug)]
pub struct TournamentStatStore {
    path: PathBuf,
    stats: Vec<TournamentStat>,
}

impl TournamentStatStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "keyduel") {
            pd.data_dir().join("tournament.json")
        } else {
            PathBuf::from("keyduel_tournament.json")
        };
        Self::with_path(path)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref().to_path_buf();
        let stats = load_stats(&path);
        Self { path, stats }
    }

    pub fn save_stat(&mut self, stat: TournamentStat) -> std::io::Result<()> {
        self.stats.push(stat);
        self.flush()
    }

    /// The `count` most recent tournament outcomes, oldest first.
    pub fn last(&self, count: usize) -> &[TournamentStat] {
        let skip = self.stats.len().saturating_sub(count);
        &self.stats[skip..]
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = StatFile {
            stats: self.stats.clone(),
        };
        let data = serde_json::to_vec_pretty(&file).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

fn load_stats(path: &Path) -> Vec<TournamentStat> {
    if let Ok(bytes) = fs::read(path) {
        if let Ok(file) = serde_json::from_slice::<StatFile>(&bytes) {
            return file.stats;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn stat(name: &str, correct: usize) -> TournamentStat {
        TournamentStat {
            language: Language::English,
            difficulty: Difficulty::Simple,
            correct_keystrokes: correct,
            uniformity_score: 75,
            name: name.to_string(),
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = TournamentStatStore::with_path(dir.path().join("tournament.json"));

        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tournament.json");
        fs::write(&path, "]]]").unwrap();

        assert!(TournamentStatStore::with_path(&path).is_empty());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tournament.json");

        let mut store = TournamentStatStore::with_path(&path);
        store.save_stat(stat("alice", 120)).unwrap();
        store.save_stat(stat("bob", 90)).unwrap();

        let reloaded = TournamentStatStore::with_path(&path);
        assert_eq!(reloaded.last(5).len(), 2);
        assert_eq!(reloaded.last(5)[0].name, "alice");
    }

    #[test]
    fn last_caps_at_available_entries() {
        let dir = tempdir().unwrap();
        let mut store = TournamentStatStore::with_path(dir.path().join("tournament.json"));
        store.save_stat(stat("alice", 10)).unwrap();
        store.save_stat(stat("bob", 20)).unwrap();
        store.save_stat(stat("cara", 30)).unwrap();

        let last_two = store.last(2);
        assert_eq!(last_two.len(), 2);
        assert_eq!(last_two[0].name, "bob");
        assert_eq!(last_two[1].name, "cara");
    }

    #[test]
    fn stat_built_from_champion_score() {
        let best = Score {
            elapsed_secs: 20.0,
            chars_typed: 50,
            correct_keystrokes: 48,
            accuracy: 96.0,
            wpm: 30.0,
            uniformity_score: 82,
            avg_deviation: 0.02,
        };

        let stat = TournamentStat::new(Language::Russian, Difficulty::Hard, "vera".into(), &best);

        assert_eq!(stat.correct_keystrokes, 48);
        assert_eq!(stat.uniformity_score, 82);
        assert_eq!(stat.name, "vera");
    }
}
