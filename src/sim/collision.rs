//! Collision detection and outcome dispatch
//!
//! Players and items are axis-aligned boxes. Items are tested in id order,
//! player 1 before player 2, and an item can be taken by at most one player.

use glam::Vec2;

use super::effects::ScoreMultiplier;
use super::score;
use super::state::{FallingItem, GameEvent, ItemKind, MatchState, Player};

/// Minimum gap between two steals (ms)
pub const STEAL_COOLDOWN_MS: u64 = 1000;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn of_player(player: &Player) -> Self {
        Self::from_center(player.pos, player.size())
    }

    pub fn of_item(item: &FallingItem) -> Self {
        Self::from_center(item.pos, item.kind.size())
    }

    /// Overlap test; touching edges count as a hit
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Test every active item against the players and apply outcomes.
/// Collected and fallen items are removed.
pub fn resolve_items(
    state: &MatchState,
    players: &mut [Player],
    items: &mut Vec<FallingItem>,
    events: &mut Vec<GameEvent>,
) {
    let bounds: Vec<Aabb> = players.iter().map(Aabb::of_player).collect();

    for item in items.iter_mut() {
        if !item.active {
            continue;
        }
        let item_box = Aabb::of_item(item);
        let Some(idx) = bounds.iter().position(|b| b.intersects(&item_box)) else {
            continue;
        };
        if item.deactivate() {
            dispatch(state, players, idx, item, events);
        }
    }

    items.retain(|item| item.active && !item.is_offscreen());
}

/// Route a collected item to the score engine or the effect layer
fn dispatch(
    state: &MatchState,
    players: &mut [Player],
    idx: usize,
    item: &FallingItem,
    events: &mut Vec<GameEvent>,
) {
    let now = state.now_ms;
    let slot = players[idx].slot;

    match item.kind {
        ItemKind::Bill => {
            let outcome = score::collect_bill(&mut players[idx], item, state.golden_hour());
            log::debug!("{slot:?} bill {:+} -> {}", outcome.value, players[idx].score);
            events.push(GameEvent::BillCollected {
                slot,
                value: outcome.value as i32,
                pos: item.pos,
            });
            if outcome.combo_bonus {
                events.push(GameEvent::ComboBonus { slot });
            }
        }
        ItemKind::Obstacle => {
            score::collect_obstacle(&mut players[idx]);
            log::debug!("{slot:?} hit obstacle -> {}", players[idx].score);
            events.push(GameEvent::ObstacleHit { slot, pos: item.pos });
        }
        ItemKind::Freeze => {
            players[idx].effects.apply_freeze(now);
            score::collect_freeze(&mut players[idx]);
            events.push(GameEvent::Frozen { slot });
        }
        ItemKind::PowerUp => {
            players[idx].effects.apply_mentor(now);
            players[idx].stats.powerups_collected += 1;
            events.push(GameEvent::PickupCollected { slot, kind: item.kind, pos: item.pos });
        }
        ItemKind::Multiplier | ItemKind::BlueLabel => {
            let multiplier = if item.kind == ItemKind::BlueLabel {
                ScoreMultiplier::X5
            } else {
                ScoreMultiplier::X2
            };
            players[idx].effects.apply_multiplier(multiplier, now);
            events.push(GameEvent::PickupCollected { slot, kind: item.kind, pos: item.pos });
        }
        ItemKind::SlowBook => {
            if state.single_player {
                return;
            }
            if let Some(opponent) = players.iter_mut().find(|p| p.slot == slot.opponent()) {
                opponent.effects.apply_slow(now);
            }
            events.push(GameEvent::PickupCollected { slot, kind: item.kind, pos: item.pos });
        }
    }
}

/// Player-vs-player contact: an empowered player steals one point from a
/// non-empowered one. Player 1 is checked first.
pub fn resolve_steal(
    state: &MatchState,
    players: &mut [Player],
    last_steal_at: &mut Option<u64>,
    events: &mut Vec<GameEvent>,
) {
    if state.single_player {
        return;
    }
    let [p1, p2] = players else {
        return;
    };
    let now = state.now_ms;
    if last_steal_at.is_some_and(|t| now.saturating_sub(t) < STEAL_COOLDOWN_MS) {
        return;
    }
    if !Aabb::of_player(p1).intersects(&Aabb::of_player(p2)) {
        return;
    }

    let (thief, victim) = match (p1.effects.is_empowered(), p2.effects.is_empowered()) {
        (true, false) => (p1, p2),
        (false, true) => (p2, p1),
        _ => return,
    };
    score::steal_point(thief, victim);
    *last_steal_at = Some(now);
    log::debug!("{:?} stole a point from {:?}", thief.slot, victim.slot);
    events.push(GameEvent::ScoreStolen {
        thief: thief.slot,
        victim: victim.slot,
    });
}
