//! High-score persistence: a JSON file used as a flat key-value slot map.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::games::chaos_type::session::FinalScore;

pub const HIGH_SCORES_KEY: &str = "highScores";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub user: String,
    pub level: u32,
    pub word_count: u32,
    /// Time spent in the running phase, milliseconds
    pub time: u64,
}

impl ScoreRecord {
    pub fn from_final(user: &str, score: &FinalScore) -> Self {
        Self {
            user: user.to_string(),
            level: score.level,
            word_count: score.word_count,
            time: score.elapsed_ms,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("score store serialization: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where finished games end up.
pub trait ScoreStore {
    /// Never fails: anything missing or unreadable counts as no scores.
    fn load(&self) -> Vec<ScoreRecord>;

    fn append(&mut self, record: ScoreRecord) -> Result<(), StoreError>;
}

/// Best first: more words, then higher level, then the faster run.
pub fn rank(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| {
        b.word_count
            .cmp(&a.word_count)
            .then(b.level.cmp(&a.level))
            .then(a.time.cmp(&b.time))
    });
}

pub struct JsonScoreStore {
    path: PathBuf,
    max_scores: usize,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>, max_scores: usize) -> Self {
        Self {
            path: path.into(),
            max_scores,
        }
    }

    fn read_slots(&self) -> Map<String, Value> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read score store");
                return Map::new();
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(slots) => slots,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "score store is not a JSON object");
                Map::new()
            }
        }
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> Vec<ScoreRecord> {
        let mut slots = self.read_slots();
        let Some(value) = slots.remove(HIGH_SCORES_KEY) else {
            return Vec::new();
        };
        match serde_json::from_value(value) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed high scores");
                Vec::new()
            }
        }
    }

    fn append(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        let mut records = self.load();
        records.push(record);
        rank(&mut records);
        records.truncate(self.max_scores);

        let mut slots = self.read_slots();
        slots.insert(HIGH_SCORES_KEY.to_string(), serde_json::to_value(&records)?);
        let body = serde_json::to_string_pretty(&slots)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        std::fs::write(&self.path, body).map_err(|e| self.io_err(e))?;
        info!(path = %self.path.display(), kept = records.len(), "high scores saved");
        Ok(())
    }
}

/// Turns finished sessions into stored score records for one player.
pub struct ScoreRecorder<S> {
    user: String,
    store: S,
}

impl<S: ScoreStore> ScoreRecorder<S> {
    pub fn new(user: impl Into<String>, store: S) -> Self {
        Self {
            user: user.into(),
            store,
        }
    }

    pub fn record(&mut self, score: &FinalScore) -> Result<(), StoreError> {
        self.store.append(ScoreRecord::from_final(&self.user, score))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("chaostype-{}-{}.json", name, std::process::id()))
    }

    fn record(user: &str, level: u32, word_count: u32, time: u64) -> ScoreRecord {
        ScoreRecord { user: user.into(), level, word_count, time }
    }

    #[test]
    fn missing_file_means_no_scores() {
        let store = JsonScoreStore::new(temp_path("absent"), 10);
        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_file_means_no_scores() {
        let path = temp_path("malformed");
        std::fs::write(&path, "not json at all").unwrap();
        let store = JsonScoreStore::new(&path, 10);
        assert!(store.load().is_empty());

        std::fs::write(&path, r#"{"highScores": "oops"}"#).unwrap();
        assert!(store.load().is_empty());

        std::fs::write(&path, r#"{"other": 1}"#).unwrap();
        assert!(store.load().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn records_use_camel_case_keys() {
        let json = serde_json::to_value(record("ann", 2, 7, 61_000)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "user": "ann", "level": 2, "wordCount": 7, "time": 61000 })
        );
    }

    #[test]
    fn append_ranks_trims_and_keeps_other_slots() {
        let path = temp_path("append");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        let mut store = JsonScoreStore::new(&path, 2);

        store.append(record("slow", 1, 3, 30_000)).unwrap();
        store.append(record("best", 4, 20, 90_000)).unwrap();
        store.append(record("mid", 2, 9, 40_000)).unwrap();

        let loaded = store.load();
        let users: Vec<_> = loaded.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, ["best", "mid"]);

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn append_recovers_from_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "[[[").unwrap();
        let mut store = JsonScoreStore::new(&path, 10);
        store.append(record("ann", 1, 1, 1000)).unwrap();
        assert_eq!(store.load(), vec![record("ann", 1, 1, 1000)]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn append_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("chaostype-dir-{}", std::process::id()));
        let path = dir.join("nested").join("scores.json");
        let mut store = JsonScoreStore::new(&path, 10);
        store.append(record("ann", 1, 1, 1000)).unwrap();
        assert_eq!(store.load().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn ranking_breaks_ties_by_level_then_time() {
        let mut records = vec![
            record("a", 1, 5, 10_000),
            record("b", 2, 5, 20_000),
            record("c", 2, 5, 15_000),
            record("d", 1, 6, 99_000),
        ];
        rank(&mut records);
        let users: Vec<_> = records.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, ["d", "c", "b", "a"]);
    }

    #[test]
    fn recorder_writes_final_score() {
        let path = temp_path("recorder");
        let mut recorder = ScoreRecorder::new("zed", JsonScoreStore::new(&path, 10));
        recorder
            .record(&FinalScore { level: 3, word_count: 12, elapsed_ms: 45_000 })
            .unwrap();
        assert_eq!(recorder.store().load(), vec![record("zed", 3, 12, 45_000)]);
        let _ = std::fs::remove_file(&path);
    }
}
