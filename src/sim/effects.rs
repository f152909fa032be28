//! Per-player timed power-up windows
//!
//! Each effect is its own expiry timestamp (or remaining-duration counter for
//! the speed boost) and resets independently. The tint is cosmetic and only
//! clears once every timed effect is inactive at the same time.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Mentor bulb: boost + enlargement + double jump
pub const MENTOR_DURATION_MS: u64 = 8000;
/// Multiplier pickups (x2 / x5), also open a double-jump window
pub const MULTIPLIER_DURATION_MS: u64 = 7000;
/// Slow inflicted on the opponent by a slowbook
pub const SLOW_DURATION_MS: u64 = 6000;
pub const FREEZE_DURATION_MS: u64 = 3000;

/// Per-player score scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreMultiplier {
    #[default]
    X1,
    X2,
    X5,
}

impl ScoreMultiplier {
    pub fn factor(self) -> i64 {
        match self {
            ScoreMultiplier::X1 => 1,
            ScoreMultiplier::X2 => 2,
            ScoreMultiplier::X5 => 5,
        }
    }
}

/// Cosmetic body tint (last applied wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    None,
    Gold,
    Energy,
    Blue,
    Slowed,
    Frozen,
}

/// Which effects lapsed during a reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expired {
    pub speed_boost: bool,
    pub multiplier: bool,
    pub slow: bool,
    pub freeze: bool,
}

impl Expired {
    pub fn any(&self) -> bool {
        self.speed_boost || self.multiplier || self.slow || self.freeze
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectState {
    pub double_jump_until: u64,
    pub speed_boost_remaining_ms: u64,
    /// Body scaled up (tied to the speed boost)
    pub enlarged: bool,
    pub multiplier: ScoreMultiplier,
    pub multiplier_until: u64,
    pub slowed_until: u64,
    pub frozen_until: u64,
    pub tint: Tint,
}

impl EffectState {
    pub fn is_frozen(&self, now: u64) -> bool {
        now < self.frozen_until
    }

    pub fn is_slowed(&self, now: u64) -> bool {
        now < self.slowed_until
    }

    pub fn has_double_jump(&self, now: u64) -> bool {
        now < self.double_jump_until
    }

    pub fn is_speed_boosted(&self) -> bool {
        self.speed_boost_remaining_ms > 0
    }

    /// Enlarged and boosted: may steal points on contact
    pub fn is_empowered(&self) -> bool {
        self.enlarged && self.is_speed_boosted()
    }

    pub fn multiplier_active(&self, now: u64) -> bool {
        self.multiplier != ScoreMultiplier::X1 && now < self.multiplier_until
    }

    /// Jump budget granted on landing
    pub fn max_jumps(&self, now: u64) -> u8 {
        if self.has_double_jump(now) { 2 } else { 1 }
    }

    pub fn horizontal_speed(&self, now: u64) -> f32 {
        let mut speed = PLAYER_SPEED;
        if self.is_speed_boosted() {
            speed *= BOOST_SPEED_FACTOR;
        }
        if self.is_slowed(now) {
            speed *= SLOW_SPEED_FACTOR;
        }
        speed
    }

    pub fn jump_impulse(&self) -> f32 {
        if self.is_speed_boosted() {
            BOOSTED_JUMP_IMPULSE
        } else {
            JUMP_IMPULSE
        }
    }

    /// Any of the four timed effects still running
    pub fn any_active(&self, now: u64) -> bool {
        self.is_speed_boosted()
            || self.multiplier_active(now)
            || self.is_slowed(now)
            || self.is_frozen(now)
    }

    pub fn apply_mentor(&mut self, now: u64) {
        self.speed_boost_remaining_ms = MENTOR_DURATION_MS;
        self.enlarged = true;
        self.double_jump_until = now + MENTOR_DURATION_MS;
        self.tint = Tint::Gold;
    }

    /// Newest pickup overwrites value and deadline
    pub fn apply_multiplier(&mut self, multiplier: ScoreMultiplier, now: u64) {
        self.multiplier = multiplier;
        self.multiplier_until = now + MULTIPLIER_DURATION_MS;
        self.double_jump_until = now + MULTIPLIER_DURATION_MS;
        self.tint = match multiplier {
            ScoreMultiplier::X5 => Tint::Blue,
            _ => Tint::Energy,
        };
    }

    pub fn apply_slow(&mut self, now: u64) {
        self.slowed_until = now + SLOW_DURATION_MS;
        self.tint = Tint::Slowed;
    }

    pub fn apply_freeze(&mut self, now: u64) {
        self.frozen_until = now + FREEZE_DURATION_MS;
        self.tint = Tint::Frozen;
    }

    /// Expire lapsed effects; runs after collisions each tick
    pub fn reconcile(&mut self, now: u64, elapsed_ms: u64) -> Expired {
        let mut expired = Expired::default();

        if self.speed_boost_remaining_ms > 0 {
            self.speed_boost_remaining_ms = self.speed_boost_remaining_ms.saturating_sub(elapsed_ms);
            if self.speed_boost_remaining_ms == 0 {
                self.enlarged = false;
                expired.speed_boost = true;
            }
        }
        if self.multiplier_until > 0 && now >= self.multiplier_until {
            self.multiplier = ScoreMultiplier::X1;
            self.multiplier_until = 0;
            expired.multiplier = true;
        }
        if self.slowed_until > 0 && now >= self.slowed_until {
            self.slowed_until = 0;
            expired.slow = true;
        }
        if self.frozen_until > 0 && now >= self.frozen_until {
            self.frozen_until = 0;
            expired.freeze = true;
        }

        if self.tint != Tint::None && !self.any_active(now) {
            self.tint = Tint::None;
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentor_boosts_and_expires() {
        let mut fx = EffectState::default();
        fx.apply_mentor(1000);
        assert!(fx.is_empowered());
        assert!((fx.horizontal_speed(1000) - 280.0).abs() < 0.001);
        assert!((fx.jump_impulse() - BOOSTED_JUMP_IMPULSE).abs() < 0.001);

        let expired = fx.reconcile(9000, MENTOR_DURATION_MS);
        assert!(expired.speed_boost);
        assert!(!fx.enlarged);
        assert!((fx.jump_impulse() - JUMP_IMPULSE).abs() < 0.001);
        assert_eq!(fx.tint, Tint::None);
    }

    #[test]
    fn test_newest_multiplier_overwrites() {
        let mut fx = EffectState::default();
        fx.apply_multiplier(ScoreMultiplier::X5, 0);
        fx.apply_multiplier(ScoreMultiplier::X2, 3000);
        assert_eq!(fx.multiplier, ScoreMultiplier::X2);
        assert_eq!(fx.multiplier_until, 3000 + MULTIPLIER_DURATION_MS);

        fx.reconcile(9999, 16);
        assert_eq!(fx.multiplier, ScoreMultiplier::X2);
        let expired = fx.reconcile(10_000, 16);
        assert!(expired.multiplier);
        assert_eq!(fx.multiplier, ScoreMultiplier::X1);
    }

    #[test]
    fn test_slow_halves_boosted_speed() {
        let mut fx = EffectState::default();
        fx.apply_mentor(0);
        fx.apply_slow(0);
        assert!((fx.horizontal_speed(10) - PLAYER_SPEED * 1.4 * 0.5).abs() < 0.001);
        assert!((fx.horizontal_speed(SLOW_DURATION_MS) - PLAYER_SPEED * 1.4).abs() < 0.001);
    }

    #[test]
    fn test_tint_waits_for_all_effects() {
        let mut fx = EffectState::default();
        fx.apply_freeze(0);
        fx.apply_multiplier(ScoreMultiplier::X2, 0);

        // Freeze lapses first, multiplier still running
        let expired = fx.reconcile(FREEZE_DURATION_MS, 16);
        assert!(expired.freeze);
        assert_ne!(fx.tint, Tint::None);

        fx.reconcile(MULTIPLIER_DURATION_MS, 16);
        assert_eq!(fx.tint, Tint::None);
    }

    #[test]
    fn test_double_jump_window() {
        let mut fx = EffectState::default();
        assert_eq!(fx.max_jumps(0), 1);
        fx.apply_multiplier(ScoreMultiplier::X2, 100);
        assert_eq!(fx.max_jumps(200), 2);
        assert_eq!(fx.max_jumps(100 + MULTIPLIER_DURATION_MS), 1);
    }

    #[test]
    fn test_reconcile_idempotent() {
        let mut fx = EffectState::default();
        fx.apply_slow(0);
        assert!(fx.reconcile(SLOW_DURATION_MS, 16).slow);
        assert!(!fx.reconcile(SLOW_DURATION_MS + 16, 16).any());
    }
}
