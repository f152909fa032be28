//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay host-agnostic:
//! - Tick-driven timers only (no wall clock)
//! - All randomness through [`RandomSource`]
//! - Stable iteration order (players by slot, items by spawn id)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod effects;
pub mod events;
pub mod physics;
pub mod rng;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::MatchClock;
pub use collision::{Aabb, resolve_items, resolve_steal};
pub use effects::{EffectState, ScoreMultiplier, Tint};
pub use events::{AmbientParticle, EventDirector};
pub use physics::{ArcadePhysics, Physics, Platform};
pub use rng::{RandomSource, ScriptedRng};
pub use spawner::EntitySpawner;
pub use state::{
    EventKind, FallingItem, GameEvent, ItemKind, MatchPhase, MatchState, Player, PlayerSlot,
    PlayerStats,
};
pub use tick::{Match, MatchReport, PlayerInput, PlayerReport, TickInput, start};
