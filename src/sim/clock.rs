//! Countdown clock and difficulty ramp
//!
//! Elapsed time is accumulated in milliseconds and converted into whole
//! seconds; each second decrements the countdown and may bump difficulty.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Result of advancing the clock by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockStep {
    /// Whole seconds consumed this tick
    pub seconds: u32,
    /// Pitch mode began during this tick
    pub entered_pitch_mode: bool,
    /// Countdown reached zero during this tick
    pub expired: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchClock {
    time_remaining: u32,
    elapsed_secs: u32,
    accum_ms: u64,
    difficulty: f32,
}

impl MatchClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            time_remaining: duration_secs,
            elapsed_secs: 0,
            accum_ms: 0,
            difficulty: DIFFICULTY_START,
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    /// Final stretch of the match
    pub fn pitch_mode(&self) -> bool {
        self.time_remaining <= PITCH_MODE_SECS
    }

    pub fn expired(&self) -> bool {
        self.time_remaining == 0
    }

    pub fn advance(&mut self, elapsed_ms: u32) -> ClockStep {
        let mut step = ClockStep::default();
        if self.expired() {
            return step;
        }

        self.accum_ms += u64::from(elapsed_ms);
        while self.accum_ms >= 1000 && !self.expired() {
            self.accum_ms -= 1000;
            let was_pitch = self.pitch_mode();
            self.time_remaining -= 1;
            self.elapsed_secs += 1;
            step.seconds += 1;

            if self.elapsed_secs.is_multiple_of(DIFFICULTY_STEP_SECS) && !self.pitch_mode() {
                self.difficulty = (self.difficulty + DIFFICULTY_STEP).clamp(DIFFICULTY_START, DIFFICULTY_MAX);
                log::debug!("Difficulty -> {:.2}", self.difficulty);
            }
            if !was_pitch && self.pitch_mode() {
                step.entered_pitch_mode = true;
            }
            if self.expired() {
                step.expired = true;
            }
        }
        step
    }
}
