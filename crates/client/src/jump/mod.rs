// Local player jump state machine.
//
// Driven purely by contact changes reported by the physics world and by the
// jump input. Only the local player runs it; remote players' jumps are implied
// by their interpolated velocity.
use glam::Vec2;

use crate::config::JumpConfig;
pub use crate::world::WallSide;

/// Observable phase of the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    /// In the air after `n` jumps (0 when falling without having jumped).
    Airborne(u8),
    WallContact(WallSide),
}

/// What the other body of a contact is, as far as jumping cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Ground, ceiling or any other static solid.
    Static,
    Wall(WallSide),
    Platform,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpState {
    grounded: bool,
    jump_count: u8,
    wall: Option<WallSide>,
}

impl JumpState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn jump_count(&self) -> u8 {
        self.jump_count
    }

    #[inline]
    pub fn wall(&self) -> Option<WallSide> {
        self.wall
    }

    pub fn phase(&self) -> JumpPhase {
        if let Some(side) = self.wall {
            JumpPhase::WallContact(side)
        } else if self.grounded {
            JumpPhase::Grounded
        } else {
            JumpPhase::Airborne(self.jump_count)
        }
    }

    /// A contact started. `above_by` is how far the player's center sits above
    /// the other body's center (positive when above).
    pub fn on_contact_start(&mut self, surface: Surface, above_by: f32, config: &JumpConfig) {
        match surface {
            Surface::Wall(side) => {
                self.wall = Some(side);
                self.jump_count = 0;
            }
            Surface::Static => {
                if above_by > config.ground_margin {
                    self.grounded = true;
                    self.jump_count = 0;
                }
            }
            Surface::Platform => {
                if above_by > config.ground_margin {
                    self.grounded = true;
                }
                if above_by > config.platform_margin {
                    self.jump_count = 0;
                }
            }
        }
    }

    /// A contact ended. Only leaving a wall changes state; the grounded flag is
    /// cleared by jumping.
    pub fn on_contact_end(&mut self, surface: Surface) {
        if let Surface::Wall(side) = surface {
            if self.wall == Some(side) {
                self.wall = None;
            }
        }
    }

    /// Try to jump. Returns the new velocity, or `None` when no jump is
    /// available.
    pub fn jump(&mut self, velocity: Vec2, config: &JumpConfig) -> Option<Vec2> {
        if self.grounded {
            self.grounded = false;
            self.jump_count = 1;
            return Some(Vec2::new(velocity.x, config.jump_force));
        }

        if self.jump_count < config.max_jumps && self.wall.is_none() {
            self.jump_count += 1;
            return Some(Vec2::new(velocity.x, config.double_jump_force));
        }

        if let Some(side) = self.wall.take() {
            self.jump_count = 1;
            return Some(Vec2::new(side.away() * config.wall_jump_push, config.wall_jump_force));
        }

        None
    }

    /// Forget everything; used on round reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
