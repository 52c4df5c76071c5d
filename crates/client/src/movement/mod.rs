// Local player prediction and state reporting.
//
// Local motion is applied to the player's body immediately; the server only
// hears about it through `move` reports. Reports are sent on a per-tick
// random draw rather than on a timer, which keeps bandwidth bounded while the
// receiving side's interpolation buffer smooths the irregular stream.
use glam::Vec2;
use protocol::ClientMessage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MovementConfig;
use crate::viewport::Viewport;

#[derive(Debug)]
pub struct MovementController {
    config: MovementConfig,
    rng: StdRng,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_rng(config: MovementConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }

    #[inline]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Velocity for this tick. `direction` is -1, 0 or 1; with no direction the
    /// horizontal component decays toward zero.
    pub fn step_velocity(&self, velocity: Vec2, direction: f32) -> Vec2 {
        let vx = if direction != 0.0 {
            direction.signum() * self.config.speed
        } else {
            velocity.x * self.config.damping
        };
        Vec2::new(vx, velocity.y)
    }

    /// One random draw against the send probability.
    pub fn should_send(&mut self) -> bool {
        let p = self.config.send_probability.clamp(0.0, 1.0);
        self.rng.random_bool(p)
    }

    /// Build the canonical `move` report for a viewport-space state.
    pub fn report(viewport: &Viewport, position: Vec2, velocity: Vec2, timestamp: f64) -> ClientMessage {
        let pos = viewport.to_canonical(position);
        let vel = velocity * viewport.canonical_per_pixel();
        ClientMessage::Move {
            x: pos.x,
            y: pos.y,
            vx: vel.x,
            vy: vel.y,
            timestamp,
        }
    }

    /// Draw, and on success build the report. Nothing is drawn while the
    /// channel is closed.
    pub fn maybe_report(
        &mut self,
        channel_open: bool,
        viewport: &Viewport,
        position: Vec2,
        velocity: Vec2,
        timestamp: f64,
    ) -> Option<ClientMessage> {
        if !channel_open || !self.should_send() {
            return None;
        }
        Some(Self::report(viewport, position, velocity, timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(p: f64) -> MovementController {
        let config = MovementConfig {
            send_probability: p,
            ..MovementConfig::default()
        };
        MovementController::with_rng(config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_held_direction_sets_speed() {
        let c = controller(0.6);
        assert_eq!(c.step_velocity(Vec2::new(0.0, 2.0), 1.0), Vec2::new(3.0, 2.0));
        assert_eq!(c.step_velocity(Vec2::new(1.0, 0.0), -1.0), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_damping_never_snaps() {
        let c = controller(0.6);
        let mut v = Vec2::new(3.0, 0.0);
        for _ in 0..20 {
            let next = c.step_velocity(v, 0.0);
            assert!(next.x > 0.0 && next.x < v.x);
            v = next;
        }
        assert!((c.step_velocity(Vec2::new(3.0, 0.0), 0.0).x - 2.7).abs() < 1e-6);
    }

    #[test]
    fn test_send_rate_tracks_probability() {
        let mut c = controller(0.6);
        let sent = (0..10_000).filter(|_| c.should_send()).count();
        assert!((5_500..6_500).contains(&sent), "sent {sent}");
    }

    #[test]
    fn test_extremes() {
        let mut always = controller(1.0);
        let mut never = controller(0.0);
        for _ in 0..100 {
            assert!(always.should_send());
            assert!(!never.should_send());
        }
    }

    #[test]
    fn test_closed_channel_sends_nothing() {
        let mut c = controller(1.0);
        let vp = Viewport::new(800.0, 500.0).unwrap();
        assert!(c.maybe_report(false, &vp, Vec2::ZERO, Vec2::ZERO, 0.0).is_none());
        assert!(c.maybe_report(true, &vp, Vec2::ZERO, Vec2::ZERO, 0.0).is_some());
    }

    #[test]
    fn test_report_is_canonical() {
        let vp = Viewport::new(1600.0, 1000.0).unwrap();
        let msg = MovementController::report(&vp, Vec2::new(1580.0, 20.0), Vec2::new(6.0, -2.0), 42.0);
        assert_eq!(
            msg,
            ClientMessage::Move {
                x: 790.0,
                y: 10.0,
                vx: 3.0,
                vy: -1.0,
                timestamp: 42.0
            }
        );
    }
}
