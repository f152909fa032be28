//! Periodic entity creation
//!
//! Every spawn family runs on its own accumulator compared against a fixed
//! interval each tick. The bill-storm burst is a separate queue of timed
//! extra bill spawns, independent of the regular bill interval.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::state::{FallingItem, ItemKind, MatchState};
use crate::consts::*;

pub const BILL_INTERVAL_MS: u64 = 1000;
pub const OBSTACLE_INTERVAL_MS: u64 = 1500;
pub const POWERUP_INTERVAL_MS: u64 = 10_000;
pub const MULTIPLIER_INTERVAL_MS: u64 = 12_000;
pub const BLUELABEL_INTERVAL_MS: u64 = 16_000;
pub const SLOWBOOK_INTERVAL_MS: u64 = 14_000;

pub const MAX_ACTIVE_BILLS: usize = 60;
pub const MAX_ACTIVE_OBSTACLES: usize = 30;

pub const RED_BILL_CHANCE: f32 = 0.35;
pub const PITCH_RED_BILL_CHANCE: f32 = 0.85;
pub const PITCH_BILLS_PER_SPAWN: u32 = 3;
/// Vertical stagger between pitch-mode bills of one spawn
pub const PITCH_BILL_STAGGER: f32 = 25.0;
pub const OBSTACLE_CHANCE: f32 = 0.6;
pub const FREEZE_CHANCE: f32 = 0.25;

pub const STORM_BILLS: u32 = 20;
pub const STORM_SPACING_MS: u64 = 150;

const SPAWN_Y: f32 = -20.0;
const BILL_MARGIN: f32 = 50.0;
const PICKUP_MARGIN: f32 = 100.0;

/// Fixed-interval accumulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval_ms: u64,
    accum_ms: u64,
}

impl SpawnTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            accum_ms: 0,
        }
    }

    /// Number of times the interval elapsed
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        self.accum_ms += elapsed_ms;
        let mut fires = 0;
        while self.accum_ms >= self.interval_ms {
            self.accum_ms -= self.interval_ms;
            fires += 1;
        }
        fires
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StormBurst {
    remaining: u32,
    next_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySpawner {
    bills: SpawnTimer,
    obstacles: SpawnTimer,
    powerups: SpawnTimer,
    multipliers: SpawnTimer,
    bluelabels: SpawnTimer,
    slowbooks: SpawnTimer,
    storm: Option<StormBurst>,
    /// Spawn function invocations (including no-ops at a cap)
    calls: u64,
    next_id: u32,
}

impl Default for EntitySpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl EntitySpawner {
    pub fn new() -> Self {
        Self {
            bills: SpawnTimer::new(BILL_INTERVAL_MS),
            obstacles: SpawnTimer::new(OBSTACLE_INTERVAL_MS),
            powerups: SpawnTimer::new(POWERUP_INTERVAL_MS),
            multipliers: SpawnTimer::new(MULTIPLIER_INTERVAL_MS),
            bluelabels: SpawnTimer::new(BLUELABEL_INTERVAL_MS),
            slowbooks: SpawnTimer::new(SLOWBOOK_INTERVAL_MS),
            storm: None,
            calls: 0,
            next_id: 1,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn storm_pending(&self) -> u32 {
        self.storm.as_ref().map_or(0, |s| s.remaining)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue the bill-storm burst, first bill immediately
    pub fn schedule_storm(&mut self, now: u64) {
        self.storm = Some(StormBurst {
            remaining: STORM_BILLS,
            next_at: now,
        });
    }

    /// Drop anything queued (match termination)
    pub fn cancel(&mut self) {
        self.storm = None;
    }

    /// Run interval timers and the storm queue for this tick
    pub fn update<R: RandomSource>(
        &mut self,
        state: &MatchState,
        items: &mut Vec<FallingItem>,
        rng: &mut R,
        elapsed_ms: u64,
    ) {
        if state.is_over() {
            return;
        }

        for _ in 0..self.bills.advance(elapsed_ms) {
            self.spawn_bills(state, items, rng);
        }
        for _ in 0..self.obstacles.advance(elapsed_ms) {
            self.spawn_obstacle(state, items, rng);
        }
        for _ in 0..self.powerups.advance(elapsed_ms) {
            self.spawn_pickup(ItemKind::PowerUp, state, items, rng);
        }
        for _ in 0..self.multipliers.advance(elapsed_ms) {
            self.spawn_pickup(ItemKind::Multiplier, state, items, rng);
        }
        for _ in 0..self.bluelabels.advance(elapsed_ms) {
            self.spawn_pickup(ItemKind::BlueLabel, state, items, rng);
        }
        for _ in 0..self.slowbooks.advance(elapsed_ms) {
            self.spawn_pickup(ItemKind::SlowBook, state, items, rng);
        }

        while let Some(storm) = self.storm.as_mut() {
            if storm.remaining == 0 || state.now_ms < storm.next_at {
                break;
            }
            storm.remaining -= 1;
            storm.next_at += STORM_SPACING_MS;
            if storm.remaining == 0 {
                self.storm = None;
            }
            self.spawn_bills(state, items, rng);
        }
    }

    /// One bill (three in pitch mode), polarity rolled once per call
    pub fn spawn_bills<R: RandomSource>(
        &mut self,
        state: &MatchState,
        items: &mut Vec<FallingItem>,
        rng: &mut R,
    ) {
        self.calls += 1;
        let room = MAX_ACTIVE_BILLS.saturating_sub(count_active(items, ItemKind::Bill));
        if room == 0 {
            return;
        }

        let pitch = state.pitch_mode();
        let red = rng.chance(if pitch { PITCH_RED_BILL_CHANCE } else { RED_BILL_CHANCE });
        let count = if pitch { PITCH_BILLS_PER_SPAWN } else { 1 }.min(room as u32);
        let (base_value, multiplier_tag) = match (red, pitch) {
            (true, true) => (-5, 1),
            (true, false) => (-1, 1),
            (false, true) => (1, 2),
            (false, false) => (1, 1),
        };

        for i in 0..count {
            let x = rng.range(BILL_MARGIN, WORLD_WIDTH - BILL_MARGIN);
            let y = SPAWN_Y - i as f32 * PITCH_BILL_STAGGER;
            let id = self.next_entity_id();
            let mut bill = FallingItem::new(
                id,
                ItemKind::Bill,
                Vec2::new(x, y),
                BILL_FALL_SPEED * state.difficulty(),
            );
            bill.base_value = base_value;
            bill.multiplier_tag = multiplier_tag;
            log::debug!("Spawn bill #{id} value={base_value} tag={multiplier_tag} x={x:.0}");
            items.push(bill);
        }
    }

    /// Gated by a 60% roll; 25% of spawns are freezes.
    /// Only standard obstacles count toward the cap.
    pub fn spawn_obstacle<R: RandomSource>(
        &mut self,
        state: &MatchState,
        items: &mut Vec<FallingItem>,
        rng: &mut R,
    ) {
        self.calls += 1;
        if !rng.chance(OBSTACLE_CHANCE) {
            return;
        }
        if count_active(items, ItemKind::Obstacle) >= MAX_ACTIVE_OBSTACLES {
            return;
        }

        let x = rng.range(BILL_MARGIN, WORLD_WIDTH - BILL_MARGIN);
        let kind = if rng.chance(FREEZE_CHANCE) {
            ItemKind::Freeze
        } else {
            ItemKind::Obstacle
        };
        let id = self.next_entity_id();
        let mut item = FallingItem::new(
            id,
            kind,
            Vec2::new(x, SPAWN_Y),
            OBSTACLE_FALL_SPEED * state.difficulty(),
        );
        if kind == ItemKind::Obstacle {
            item.base_value = -1;
        }
        log::debug!("Spawn {kind:?} #{id} x={x:.0}");
        items.push(item);
    }

    /// Power-up family; slowbooks only exist in versus
    pub fn spawn_pickup<R: RandomSource>(
        &mut self,
        kind: ItemKind,
        state: &MatchState,
        items: &mut Vec<FallingItem>,
        rng: &mut R,
    ) {
        self.calls += 1;
        if kind == ItemKind::SlowBook && state.single_player {
            return;
        }
        let x = rng.range(PICKUP_MARGIN, WORLD_WIDTH - PICKUP_MARGIN);
        let id = self.next_entity_id();
        log::debug!("Spawn {kind:?} #{id} x={x:.0}");
        items.push(FallingItem::new(id, kind, Vec2::new(x, SPAWN_Y), PICKUP_FALL_SPEED));
    }
}

fn count_active(items: &[FallingItem], kind: ItemKind) -> usize {
    items.iter().filter(|i| i.active && i.kind == kind).count()
}
