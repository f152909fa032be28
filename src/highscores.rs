//! Single-player high score
//!
//! One best score survives between sessions. Storage is behind
//! [`ScoreStore`]; the CLI uses a JSON file, tests use memory.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sim::MatchReport;

/// Persistent slot for the best single-player score
pub trait ScoreStore {
    fn load(&self) -> Option<u32>;
    fn store(&mut self, score: u32);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self { value: Some(value) }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Option<u32> {
        self.value
    }

    fn store(&mut self, score: u32) {
        self.value = Some(score);
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// JSON file store; I/O failures are logged and treated as "no record"
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Option<u32> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No high score at {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str::<HighScoreFile>(&json) {
            Ok(file) => Some(file.high_score),
            Err(e) => {
                log::warn!("Ignoring corrupt high score file {}: {e}", self.path.display());
                None
            }
        }
    }

    fn store(&mut self, score: u32) {
        let result = serde_json::to_string(&HighScoreFile { high_score: score })
            .map_err(std::io::Error::from)
            .and_then(|json| fs::write(&self.path, json));
        match result {
            Ok(()) => log::info!("High score {score} saved"),
            Err(e) => log::warn!("Failed to save high score: {e}"),
        }
    }
}

/// Outcome of submitting a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResult {
    pub new_record: bool,
    /// Best score after this submission
    pub high_score: u32,
}

pub struct HighScore;

impl HighScore {
    /// Compare a single-player result against the stored best.
    /// Versus matches never touch the record and return `None`.
    pub fn submit(store: &mut impl ScoreStore, report: &MatchReport) -> Option<RecordResult> {
        if report.player2.is_some() {
            return None;
        }
        let score = report.player1.score;
        let previous = store.load().unwrap_or(0);
        if score > previous {
            store.store(score);
            log::info!("New high score: {score} (was {previous})");
            Some(RecordResult {
                new_record: true,
                high_score: score,
            })
        } else {
            Some(RecordResult {
                new_record: false,
                high_score: previous,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Background;
    use crate::sim::{PlayerReport, PlayerSlot, PlayerStats};

    fn report(p1: u32, p2: Option<u32>) -> MatchReport {
        let of = |score| PlayerReport {
            score,
            stats: PlayerStats::default(),
        };
        MatchReport {
            player1: of(p1),
            player2: p2.map(of),
            winner: p2.filter(|&s| s < p1).map(|_| PlayerSlot::One),
            background: Background::Office,
        }
    }

    #[test]
    fn test_first_score_is_a_record() {
        let mut store = MemoryStore::new();
        let result = HighScore::submit(&mut store, &report(7, None));
        assert_eq!(
            result,
            Some(RecordResult {
                new_record: true,
                high_score: 7
            })
        );
        assert_eq!(store.load(), Some(7));
    }

    #[test]
    fn test_equal_score_is_not_a_record() {
        let mut store = MemoryStore::with_value(7);
        let result = HighScore::submit(&mut store, &report(7, None)).unwrap();
        assert!(!result.new_record);
        assert_eq!(result.high_score, 7);
    }

    #[test]
    fn test_versus_ignored() {
        let mut store = MemoryStore::with_value(3);
        assert!(HighScore::submit(&mut store, &report(50, Some(10))).is_none());
        assert_eq!(store.load(), Some(3));
    }

    #[test]
    fn test_file_store_roundtrip_and_corruption() {
        let path = std::env::temp_dir().join(format!(
            "startup-scramble-hs-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        let mut store = FileStore::new(&path);
        assert_eq!(store.load(), None);

        store.store(12);
        assert_eq!(store.load(), Some(12));

        fs::write(&path, "not json").unwrap();
        assert_eq!(store.load(), None);
        let _ = fs::remove_file(&path);
    }
}
