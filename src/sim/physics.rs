//! Movement integration
//!
//! Physics is a collaborator of the match: anything that can integrate player
//! bodies with an injectable gravity constant will do. [`ArcadePhysics`] is the
//! default: axis-aligned bodies, a ground strip, one-way platforms (two of them
//! patrolling) and world-bound clamping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{FallingItem, Player};
use crate::consts::*;

pub const PLATFORM_THICKNESS: f32 = 14.0;

pub trait Physics {
    fn gravity(&self) -> f32;
    fn set_gravity(&mut self, gravity: f32);

    /// Advance world geometry (moving platforms)
    fn step_world(&mut self, dt: f32);

    /// Integrate one player body; updates `on_ground`
    fn integrate_player(&self, player: &mut Player, dt: f32);

    fn integrate_item(&self, item: &mut FallingItem, dt: f32) {
        item.pos.y += item.vel_y * dt;
    }
}

/// Horizontal back-and-forth movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Patrol {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
    pub direction: f32,
}

/// A landable surface; players pass through from below and the sides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Centre of the top surface
    pub center: Vec2,
    pub width: f32,
    pub patrol: Option<Patrol>,
}

impl Platform {
    pub fn fixed(x: f32, top: f32, width: f32) -> Self {
        Self {
            center: Vec2::new(x, top),
            width,
            patrol: None,
        }
    }

    pub fn moving(x: f32, top: f32, width: f32, min_x: f32, max_x: f32, speed: f32) -> Self {
        Self {
            center: Vec2::new(x, top),
            width,
            patrol: Some(Patrol {
                min_x,
                max_x,
                speed,
                direction: 1.0,
            }),
        }
    }

    pub fn top(&self) -> f32 {
        self.center.y
    }

    pub fn spans(&self, left: f32, right: f32) -> bool {
        right > self.center.x - self.width / 2.0 && left < self.center.x + self.width / 2.0
    }

    fn step(&mut self, dt: f32) {
        if let Some(patrol) = self.patrol.as_mut() {
            self.center.x += patrol.speed * patrol.direction * dt;
            if self.center.x >= patrol.max_x {
                patrol.direction = -1.0;
            } else if self.center.x <= patrol.min_x {
                patrol.direction = 1.0;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadePhysics {
    gravity: f32,
    pub platforms: Vec<Platform>,
}

impl Default for ArcadePhysics {
    fn default() -> Self {
        Self::with_arena()
    }
}

impl ArcadePhysics {
    /// Flat ground only
    pub fn flat() -> Self {
        Self {
            gravity: GRAVITY,
            platforms: Vec::new(),
        }
    }

    /// Stage layout: five platforms plus three floor blocks
    pub fn with_arena() -> Self {
        let h = WORLD_HEIGHT;
        let floor = h - 60.0;
        let top = |y: f32| y - PLATFORM_THICKNESS / 2.0;
        Self {
            gravity: GRAVITY,
            platforms: vec![
                Platform::fixed(150.0, top(h - 180.0), 120.0),
                Platform::moving(400.0, top(h - 260.0), 140.0, 250.0, 550.0, 80.0),
                Platform::fixed(650.0, top(h - 180.0), 120.0),
                Platform::moving(280.0, top(h - 340.0), 100.0, 180.0, 380.0, 60.0),
                Platform::fixed(520.0, top(h - 320.0), 100.0),
                // Floor blocks
                Platform::fixed(220.0, floor - 50.0, 40.0),
                Platform::fixed(450.0, floor - 45.0, 35.0),
                Platform::fixed(600.0, floor - 48.0, 38.0),
            ],
        }
    }
}

impl Physics for ArcadePhysics {
    fn gravity(&self) -> f32 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    fn step_world(&mut self, dt: f32) {
        for platform in &mut self.platforms {
            platform.step(dt);
        }
    }

    fn integrate_player(&self, player: &mut Player, dt: f32) {
        let half = player.size() / 2.0;
        let prev_bottom = player.pos.y + half.y;

        player.vel.y += self.gravity * dt;
        player.pos += player.vel * dt;

        // World bounds
        player.pos.x = player.pos.x.clamp(half.x, WORLD_WIDTH - half.x);
        if player.pos.y - half.y < 0.0 {
            player.pos.y = half.y;
            player.vel.y = player.vel.y.max(0.0);
        }

        let bottom = player.pos.y + half.y;
        let mut landed_on = None;
        if player.vel.y >= 0.0 {
            let (left, right) = (player.pos.x - half.x, player.pos.x + half.x);
            for platform in &self.platforms {
                let top = platform.top();
                if prev_bottom <= top + 0.01 && bottom >= top && platform.spans(left, right) {
                    landed_on = Some(landed_on.map_or(top, |t: f32| t.min(top)));
                }
            }
            if bottom >= GROUND_Y {
                landed_on = Some(landed_on.map_or(GROUND_Y, |t: f32| t.min(GROUND_Y)));
            }
        }

        match landed_on {
            Some(top) => {
                player.pos.y = top - half.y;
                player.vel.y = 0.0;
                player.on_ground = true;
            }
            None => player.on_ground = false,
        }
    }
}
