//! Match configuration
//!
//! Loaded from a JSON file by the headless runner, or built directly by a host.
//! Unknown strings and out-of-range numbers never fail a match start: they
//! fall back to the documented defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DURATION_SECS, MAX_DURATION_SECS, MIN_DURATION_SECS};

/// Backdrop selected on the menu (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Background {
    #[default]
    Hackathon,
    City,
    Office,
    Stage,
}

impl Background {
    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Hackathon => "hackathon",
            Background::City => "city",
            Background::Office => "office",
            Background::Stage => "stage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hackathon" => Some(Background::Hackathon),
            "city" => Some(Background::City),
            "office" => Some(Background::Office),
            "stage" => Some(Background::Stage),
            _ => None,
        }
    }
}

impl From<String> for Background {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or_else(|| {
            log::warn!("Unknown background {s:?}, using {}", Background::default().as_str());
            Background::default()
        })
    }
}

impl From<Background> for String {
    fn from(bg: Background) -> Self {
        bg.as_str().to_string()
    }
}

/// Single-player high-score run or two-player versus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum GameMode {
    Single,
    #[default]
    Multi,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::Multi => "multi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "1p" => Some(GameMode::Single),
            "multi" | "versus" | "2p" => Some(GameMode::Multi),
            _ => None,
        }
    }
}

impl From<String> for GameMode {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or_else(|| {
            log::warn!("Unknown game mode {s:?}, using {}", GameMode::default().as_str());
            GameMode::default()
        })
    }
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Everything needed to start a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Countdown length in seconds
    pub duration_seconds: u32,
    pub mode: GameMode,
    pub background: Background,
    /// RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_SECS,
            mode: GameMode::default(),
            background: Background::default(),
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn new(duration_seconds: u32, single_player: bool, background: Background) -> Self {
        Self {
            duration_seconds,
            mode: if single_player {
                GameMode::Single
            } else {
                GameMode::Multi
            },
            background,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn single_player(&self) -> bool {
        self.mode == GameMode::Single
    }

    /// Duration clamped to the supported range
    pub fn effective_duration(&self) -> u32 {
        self.duration_seconds.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded match config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid match config {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read match config {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
