//! Startup Scramble - an arcade money-grab minigame
//!
//! Core modules:
//! - `sim`: Gameplay simulation (spawning, collisions, effects, scoring, events)
//! - `platform`: Logical controls and input polling
//! - `settings`: Match configuration
//! - `highscores`: Single-player record persistence

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{FileStore, HighScore, MemoryStore, RecordResult, ScoreStore};
pub use settings::{Background, GameMode, MatchConfig};
pub use sim::{Match, MatchReport, TickInput, start};

/// Game configuration constants
pub mod consts {
    /// Nominal tick rate of the host loop (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Top surface of the ground strip
    pub const GROUND_Y: f32 = 540.0;
    /// Items are dropped once their centre passes this far below the play area
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Match defaults
    pub const DEFAULT_DURATION_SECS: u32 = 60;
    pub const MIN_DURATION_SECS: u32 = 1;
    pub const MAX_DURATION_SECS: u32 = 600;
    /// Pitch mode covers the final seconds of a match
    pub const PITCH_MODE_SECS: u32 = 10;

    /// Difficulty ramp
    pub const DIFFICULTY_START: f32 = 1.0;
    pub const DIFFICULTY_STEP: f32 = 0.25;
    pub const DIFFICULTY_MAX: f32 = 3.0;
    pub const DIFFICULTY_STEP_SECS: u32 = 10;

    /// Player body (hitbox already trimmed from the 32x48 sprite)
    pub const PLAYER_WIDTH: f32 = 25.6;
    pub const PLAYER_HEIGHT: f32 = 43.2;
    /// Body scale while the mentor power-up is active
    pub const ENLARGED_SCALE: f32 = 1.5;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const BOOST_SPEED_FACTOR: f32 = 1.4;
    pub const SLOW_SPEED_FACTOR: f32 = 0.5;
    pub const JUMP_IMPULSE: f32 = -400.0;
    pub const BOOSTED_JUMP_IMPULSE: f32 = -500.0;

    /// Gravity applied to players (units/s²)
    pub const GRAVITY: f32 = 800.0;
    pub const ANTI_GRAVITY: f32 = 300.0;

    /// Fall speeds (units/s)
    pub const BILL_FALL_SPEED: f32 = 150.0;
    pub const OBSTACLE_FALL_SPEED: f32 = 180.0;
    pub const PICKUP_FALL_SPEED: f32 = 100.0;
}
