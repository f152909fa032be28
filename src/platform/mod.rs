//! Platform abstraction layer
//!
//! Hosts map their devices (keyboard, gamepad, network, scripted autopilot)
//! onto logical controls per player slot. The simulation only ever sees the
//! resulting [`TickInput`].

use serde::{Deserialize, Serialize};

use crate::sim::{PlayerInput, PlayerSlot, TickInput};

/// Logical controls shared by every input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Up,
    Jump,
    Start,
    Back,
}

/// Input device as seen by the match loop
pub trait Controls {
    /// Held this frame
    fn is_pressed(&self, slot: PlayerSlot, control: Control) -> bool;
    /// Went down this frame
    fn just_pressed(&self, slot: PlayerSlot, control: Control) -> bool;
}

impl TickInput {
    /// Sample both slots; jump accepts either the jump or up control
    pub fn poll(controls: &impl Controls) -> Self {
        let sample = |slot| PlayerInput {
            left: controls.is_pressed(slot, Control::Left),
            right: controls.is_pressed(slot, Control::Right),
            jump: controls.just_pressed(slot, Control::Jump)
                || controls.just_pressed(slot, Control::Up),
        };
        Self {
            players: [sample(PlayerSlot::One), sample(PlayerSlot::Two)],
        }
    }
}
