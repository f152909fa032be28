//! Global event state machine
//!
//! At most one of golden hour, bill storm and anti-gravity runs at a time.
//! All side effects live in [`EventDirector::enter`] and [`EventDirector::exit`];
//! nothing else touches gravity, the overlay or the ambient particles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Physics;
use super::rng::RandomSource;
use super::spawner::EntitySpawner;
use super::state::{EventKind, GameEvent, MatchState};
use crate::consts::*;

/// Per-tick trigger probability while eligible
pub const EVENT_CHANCE: f32 = 0.002;
/// Quiet period after an event ends (and after kickoff)
pub const EVENT_COOLDOWN_MS: u64 = 15_000;
pub const AMBIENT_PARTICLES: usize = 15;

/// Floating decoration shown during anti-gravity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AmbientParticle {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDirector {
    last_ended_at: u64,
    /// Golden-hour pulse overlay visible
    pub overlay: bool,
    pub particles: Vec<AmbientParticle>,
}

impl EventDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the running event, then roll for a new one
    pub fn update<R: RandomSource, P: Physics>(
        &mut self,
        state: &mut MatchState,
        rng: &mut R,
        physics: &mut P,
        spawner: &mut EntitySpawner,
        events: &mut Vec<GameEvent>,
    ) {
        if state.is_over() {
            return;
        }
        if state.active_event.is_some() && state.now_ms >= state.event_ends_at {
            self.exit(state, physics, events);
        }
        if self.eligible(state) && rng.chance(EVENT_CHANCE) {
            let kind = EventKind::ALL[rng.pick(EventKind::ALL.len())];
            self.enter(kind, state, rng, physics, spawner, events);
        }
    }

    pub fn eligible(&self, state: &MatchState) -> bool {
        state.active_event.is_none()
            && state.time_remaining() > PITCH_MODE_SECS
            && state.now_ms.saturating_sub(self.last_ended_at) >= EVENT_COOLDOWN_MS
    }

    /// Start `kind`; a no-op while another event is running
    pub fn enter<R: RandomSource, P: Physics>(
        &mut self,
        kind: EventKind,
        state: &mut MatchState,
        rng: &mut R,
        physics: &mut P,
        spawner: &mut EntitySpawner,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if state.active_event.is_some() {
            return false;
        }
        state.active_event = Some(kind);
        state.event_ends_at = state.now_ms + kind.duration_ms();

        match kind {
            EventKind::GoldenHour => self.overlay = true,
            EventKind::BillStorm => spawner.schedule_storm(state.now_ms),
            EventKind::AntiGravity => {
                physics.set_gravity(ANTI_GRAVITY);
                self.particles = (0..AMBIENT_PARTICLES)
                    .map(|_| AmbientParticle {
                        pos: Vec2::new(
                            rng.range(0.0, WORLD_WIDTH),
                            rng.range(WORLD_HEIGHT / 2.0, WORLD_HEIGHT),
                        ),
                        radius: rng.range(2.0, 5.0),
                    })
                    .collect();
            }
        }
        log::info!("Global event {kind:?} started ({} ms)", kind.duration_ms());
        events.push(GameEvent::GlobalEventStarted(kind));
        true
    }

    /// Restore defaults; safe to call with nothing running
    pub fn exit<P: Physics>(
        &mut self,
        state: &mut MatchState,
        physics: &mut P,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(kind) = state.active_event.take() else {
            return;
        };
        physics.set_gravity(GRAVITY);
        self.particles.clear();
        self.overlay = false;
        self.last_ended_at = state.now_ms;
        log::info!("Global event {kind:?} ended");
        events.push(GameEvent::GlobalEventEnded(kind));
    }
}
