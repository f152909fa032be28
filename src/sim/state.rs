//! Match state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::MatchClock;
use super::effects::EffectState;
use crate::consts::*;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Running,
    /// Terminal: nothing advances any more
    Over,
}

/// Player slot (stable iteration and collection order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Falling entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Money; green (+) or red (-)
    Bill,
    /// Standard obstacle, costs one point
    Obstacle,
    /// Burnout: freezes the collector
    Freeze,
    /// Mentor bulb: speed boost, enlargement, double jump
    PowerUp,
    /// Energy drink: x2 multiplier
    Multiplier,
    /// Bottle: x5 multiplier
    BlueLabel,
    /// Slows the opponent (versus only)
    SlowBook,
}

impl ItemKind {
    /// Bounding box size
    pub fn size(self) -> Vec2 {
        match self {
            ItemKind::Bill | ItemKind::Obstacle => Vec2::new(40.0, 20.0),
            ItemKind::Freeze => Vec2::new(28.0, 28.0),
            ItemKind::PowerUp => Vec2::new(28.0, 34.0),
            ItemKind::Multiplier => Vec2::new(19.2, 25.6),
            ItemKind::BlueLabel => Vec2::new(28.0, 50.0),
            ItemKind::SlowBook => Vec2::new(28.8, 36.0),
        }
    }

    /// Items routed to the effect layer rather than the score engine
    pub fn is_pickup(self) -> bool {
        !matches!(self, ItemKind::Bill | ItemKind::Obstacle)
    }
}

/// A falling collectible, obstacle or power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub kind: ItemKind,
    /// Centre position
    pub pos: Vec2,
    pub vel_y: f32,
    /// ±1 for bills (−5 for a red pitch-mode bill), −1 for obstacles, 0 otherwise
    pub base_value: i32,
    /// ×2 on green pitch-mode bills, else 1
    pub multiplier_tag: i32,
    pub active: bool,
}

impl FallingItem {
    pub fn new(id: u32, kind: ItemKind, pos: Vec2, vel_y: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel_y,
            base_value: 0,
            multiplier_tag: 1,
            active: true,
        }
    }

    /// Deactivate; returns false if it was already inactive
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Below the lower play-area bound
    pub fn is_offscreen(&self) -> bool {
        self.pos.y > WORLD_HEIGHT + OFFSCREEN_MARGIN
    }
}

/// Per-player end-of-match counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Bills collected (either polarity)
    pub bills: u32,
    /// Standard obstacles hit
    pub hits: u32,
    /// Mentor power-ups collected
    pub powerups_collected: u32,
}

/// A player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub slot: PlayerSlot,
    /// Centre of the body
    pub pos: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub jumps_remaining: u8,
    pub effects: EffectState,
    pub score: u32,
    pub combo: u32,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(slot: PlayerSlot, x: f32) -> Self {
        Self {
            slot,
            pos: Vec2::new(x, GROUND_Y - PLAYER_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            on_ground: true,
            jumps_remaining: 1,
            effects: EffectState::default(),
            score: 0,
            combo: 0,
            stats: PlayerStats::default(),
        }
    }

    /// Body size, scaled while enlarged
    pub fn size(&self) -> Vec2 {
        let base = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        if self.effects.enlarged {
            base * ENLARGED_SCALE
        } else {
            base
        }
    }
}

/// Global event kinds (mutually exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// All score deltas doubled
    GoldenHour,
    /// One-time burst of extra bills
    BillStorm,
    /// Reduced gravity for both players
    AntiGravity,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::GoldenHour,
        EventKind::BillStorm,
        EventKind::AntiGravity,
    ];

    pub fn duration_ms(self) -> u64 {
        match self {
            EventKind::GoldenHour => 5000,
            EventKind::BillStorm => 3000,
            EventKind::AntiGravity => 6000,
        }
    }
}

/// Shared per-tick match values read by every subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub clock: MatchClock,
    pub phase: MatchPhase,
    /// Monotonic match time (ms), sampled once per tick
    pub now_ms: u64,
    pub single_player: bool,
    pub active_event: Option<EventKind>,
    pub event_ends_at: u64,
}

impl MatchState {
    pub fn new(duration_secs: u32, single_player: bool) -> Self {
        Self {
            clock: MatchClock::new(duration_secs),
            phase: MatchPhase::Running,
            now_ms: 0,
            single_player,
            active_event: None,
            event_ends_at: 0,
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.clock.time_remaining()
    }

    pub fn difficulty(&self) -> f32 {
        self.clock.difficulty()
    }

    pub fn pitch_mode(&self) -> bool {
        self.clock.pitch_mode()
    }

    pub fn golden_hour(&self) -> bool {
        self.active_event == Some(EventKind::GoldenHour)
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Over
    }
}

/// Feedback emitted for the host (sound, particles, tint, shake)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BillCollected {
        slot: PlayerSlot,
        value: i32,
        pos: Vec2,
    },
    ComboBonus {
        slot: PlayerSlot,
    },
    ObstacleHit {
        slot: PlayerSlot,
        pos: Vec2,
    },
    Frozen {
        slot: PlayerSlot,
    },
    PickupCollected {
        slot: PlayerSlot,
        kind: ItemKind,
        pos: Vec2,
    },
    ScoreStolen {
        thief: PlayerSlot,
        victim: PlayerSlot,
    },
    PitchModeStarted,
    GlobalEventStarted(EventKind),
    GlobalEventEnded(EventKind),
    MatchEnded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut item = FallingItem::new(1, ItemKind::Bill, Vec2::ZERO, 150.0);
        assert!(item.deactivate());
        assert!(!item.deactivate());
        assert!(!item.active);
    }

    #[test]
    fn test_enlarged_player_is_bigger() {
        let mut player = Player::new(PlayerSlot::One, 100.0);
        let small = player.size();
        player.effects.enlarged = true;
        assert!(player.size().x > small.x);
        assert!((player.size().y - PLAYER_HEIGHT * ENLARGED_SCALE).abs() < 0.001);
    }

    #[test]
    fn test_offscreen_bound() {
        let mut item = FallingItem::new(1, ItemKind::PowerUp, Vec2::new(100.0, 640.0), 100.0);
        assert!(!item.is_offscreen());
        item.pos.y = 651.0;
        assert!(item.is_offscreen());
    }

    #[test]
    fn test_pickup_routing() {
        assert!(!ItemKind::Bill.is_pickup());
        assert!(!ItemKind::Obstacle.is_pickup());
        assert!(ItemKind::Freeze.is_pickup());
        assert!(ItemKind::SlowBook.is_pickup());
    }
}
