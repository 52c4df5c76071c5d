//! Simple steering for an unattended player: run to the cheese, then the hole.

use client::network::Channel;
use client::ui::StatusSink;
use client::world::PhysicsWorld;
use client::SyncEngine;
use glam::Vec2;

const LEFT_KEY: &str = "ArrowLeft";
const RIGHT_KEY: &str = "ArrowRight";

/// Input decision for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steer {
    /// -1 left, 0 none, 1 right.
    pub direction: i8,
    pub jump: bool,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Horizontal distance under which no direction is held (px).
    deadzone: f32,
    /// How far above the player a target must be to try a jump (px).
    jump_height: f32,
    jump_cooldown_ms: f64,
    last_jump: f64,
    held: i8,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            deadzone: 10.0,
            jump_height: 40.0,
            jump_cooldown_ms: 500.0,
            last_jump: f64::NEG_INFINITY,
            held: 0,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a direction and whether to jump toward `target`.
    pub fn decide(&mut self, position: Vec2, target: Vec2, now: f64) -> Steer {
        let dx = target.x - position.x;
        let direction = if dx > self.deadzone {
            1
        } else if dx < -self.deadzone {
            -1
        } else {
            0
        };

        let wants_jump = position.y - target.y > self.jump_height;
        let jump = wants_jump && now - self.last_jump >= self.jump_cooldown_ms;
        if jump {
            self.last_jump = now;
        }

        Steer { direction, jump }
    }

    /// Steer the local player through the engine's keyboard input.
    pub fn drive<P, C, S>(&mut self, engine: &mut SyncEngine<P, C, S>, now: f64)
    where
        P: PhysicsWorld,
        C: Channel,
        S: StatusSink,
    {
        let Some(position) = engine.local_position() else {
            return;
        };
        let has_cheese = engine.local_player().is_some_and(|p| p.has_cheese);
        let target = if has_cheese {
            engine.hole()
        } else {
            engine.cheese().or(engine.hole())
        };
        let Some(target) = target.map(|t| t.viewport_position(engine.viewport())) else {
            self.release(engine);
            return;
        };

        let steer = self.decide(position, target, now);
        if steer.direction != self.held {
            self.release(engine);
            match steer.direction {
                1 => engine.key_down(RIGHT_KEY),
                -1 => engine.key_down(LEFT_KEY),
                _ => {}
            }
            self.held = steer.direction;
        }
        if steer.jump {
            engine.perform_jump();
        }
    }

    fn release<P, C, S>(&mut self, engine: &mut SyncEngine<P, C, S>)
    where
        P: PhysicsWorld,
        C: Channel,
        S: StatusSink,
    {
        engine.key_up(LEFT_KEY);
        engine.key_up(RIGHT_KEY);
        self.held = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_deadzone() {
        let mut pilot = Autopilot::new();
        let pos = Vec2::new(100.0, 400.0);
        assert_eq!(pilot.decide(pos, Vec2::new(200.0, 400.0), 0.0).direction, 1);
        assert_eq!(pilot.decide(pos, Vec2::new(20.0, 400.0), 0.0).direction, -1);
        assert_eq!(pilot.decide(pos, Vec2::new(105.0, 400.0), 0.0).direction, 0);
    }

    #[test]
    fn test_jump_cooldown() {
        let mut pilot = Autopilot::new();
        let pos = Vec2::new(100.0, 400.0);
        let above = Vec2::new(100.0, 300.0);
        assert!(pilot.decide(pos, above, 1000.0).jump);
        assert!(!pilot.decide(pos, above, 1200.0).jump);
        assert!(pilot.decide(pos, above, 1500.0).jump);
        assert!(!pilot.decide(pos, Vec2::new(100.0, 380.0), 3000.0).jump);
    }
}
