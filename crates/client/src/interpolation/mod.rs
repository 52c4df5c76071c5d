// Lag compensation for remote players.
//
// Every `playerMove` for a remote player is stamped with its *receipt* time
// and pushed into that player's bounded sample buffer. Rendering then asks
// for the state at `now - delay`, which almost always falls between two real
// samples:
//
// ```text
//   t = (render_time - before.t) / (after.t - before.t)
//   value = before + (after - before) * t
// ```
//
// When no pair brackets the render time the newest sample is returned as-is.
use glam::Vec2;
use std::collections::{HashMap, VecDeque};

use crate::utils;

/// One received state report, in viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Receipt time (ms).
    pub timestamp: f64,
}

/// Output of [`InterpolationBuffer::get_interpolated`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolated {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl From<Sample> for Interpolated {
    fn from(s: Sample) -> Self {
        Self {
            position: s.position,
            velocity: s.velocity,
        }
    }
}

/// Per-player buffer plus the last-known target.
#[derive(Debug, Clone)]
pub struct InterpolationState {
    samples: VecDeque<Sample>,
    target: Interpolated,
}

impl InterpolationState {
    fn new(position: Vec2, velocity: Vec2, capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            target: Interpolated { position, velocity },
        }
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent reported state, kept even when the buffer is cleared.
    pub fn target(&self) -> Interpolated {
        self.target
    }
}

/// Sample buffers for every remote player, keyed by player id.
#[derive(Debug)]
pub struct InterpolationBuffer {
    players: HashMap<String, InterpolationState>,
    capacity: usize,
    delay_ms: f64,
}

impl InterpolationBuffer {
    pub fn new(capacity: usize, delay_ms: f64) -> Self {
        Self {
            players: HashMap::new(),
            capacity: capacity.max(1),
            delay_ms,
        }
    }

    /// Start tracking a player with an empty buffer.
    pub fn track(&mut self, player_id: &str, position: Vec2) {
        self.players.insert(
            player_id.to_string(),
            InterpolationState::new(position, Vec2::ZERO, self.capacity),
        );
    }

    /// Append a sample, evicting the oldest once over capacity.
    ///
    /// Timestamps never go backwards inside a buffer: a sample older than the
    /// newest one is stamped with the newest timestamp instead.
    pub fn add_sample(&mut self, player_id: &str, position: Vec2, velocity: Vec2, timestamp: f64) {
        let capacity = self.capacity;
        let state = self
            .players
            .entry(player_id.to_string())
            .or_insert_with(|| InterpolationState::new(position, velocity, capacity));

        let timestamp = match state.samples.back() {
            Some(last) => timestamp.max(last.timestamp),
            None => timestamp,
        };
        state.samples.push_back(Sample {
            position,
            velocity,
            timestamp,
        });
        while state.samples.len() > capacity {
            state.samples.pop_front();
        }
        state.target = Interpolated { position, velocity };
    }

    /// State of `player_id` at `render_time`. `None` only when the buffer is
    /// empty or the player is unknown.
    pub fn get_interpolated(&self, player_id: &str, render_time: f64) -> Option<Interpolated> {
        let samples = &self.players.get(player_id)?.samples;
        let last = *samples.back()?;

        let bracket = samples
            .iter()
            .zip(samples.iter().skip(1))
            .find(|(before, after)| before.timestamp <= render_time && after.timestamp >= render_time);

        let Some((before, after)) = bracket else {
            return Some(last.into());
        };

        let total = after.timestamp - before.timestamp;
        let t = if total > 0.0 {
            ((render_time - before.timestamp) / total) as f32
        } else {
            0.0
        };

        Some(Interpolated {
            position: utils::lerp_vec(before.position, after.position, t),
            velocity: utils::lerp_vec(before.velocity, after.velocity, t),
        })
    }

    /// Delayed view: `get_interpolated(player_id, now - delay)`.
    #[inline]
    pub fn sample_at(&self, player_id: &str, now: f64) -> Option<Interpolated> {
        self.get_interpolated(player_id, now - self.delay_ms)
    }

    pub fn state(&self, player_id: &str) -> Option<&InterpolationState> {
        self.players.get(player_id)
    }

    pub fn is_tracking(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn len(&self, player_id: &str) -> usize {
        self.players.get(player_id).map_or(0, InterpolationState::len)
    }

    pub fn remove(&mut self, player_id: &str) {
        self.players.remove(player_id);
    }

    /// Empty every buffer. Players stay tracked and keep their last target.
    pub fn clear_all(&mut self) {
        for state in self.players.values_mut() {
            state.samples.clear();
        }
    }

    /// True when every tracked buffer is empty.
    pub fn all_empty(&self) -> bool {
        self.players.values().all(InterpolationState::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_sample(buf: &mut InterpolationBuffer, t: f64, x: f32) {
        buf.add_sample("p", Vec2::new(x, 0.0), Vec2::new(x / 10.0, 0.0), t);
    }

    #[test]
    fn test_empty_and_unknown_return_none() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        assert!(buf.get_interpolated("p", 0.0).is_none());
        buf.track("p", Vec2::ZERO);
        assert!(buf.get_interpolated("p", 0.0).is_none());
        assert!(buf.is_tracking("p"));
    }

    #[test]
    fn test_exact_linear_interpolation() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 0.0);
        x_sample(&mut buf, 1100.0, 10.0);
        x_sample(&mut buf, 1300.0, 30.0);

        let r = buf.get_interpolated("p", 1025.0).unwrap();
        assert!((r.position.x - 2.5).abs() < 1e-5);
        assert!((r.velocity.x - 0.25).abs() < 1e-6);

        let r = buf.get_interpolated("p", 1200.0).unwrap();
        assert!((r.position.x - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_boundary_sample_is_exact() {
        // buffer [{t=1000,x=0},{t=1100,x=10}], delay 100, now 1200 -> render 1100 -> x 10
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 0.0);
        x_sample(&mut buf, 1100.0, 10.0);
        let r = buf.sample_at("p", 1200.0).unwrap();
        assert_eq!(r.position.x, 10.0);
    }

    #[test]
    fn test_outside_range_returns_newest_unmodified() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 0.0);
        x_sample(&mut buf, 1100.0, 10.0);

        let late = buf.get_interpolated("p", 5000.0).unwrap();
        assert_eq!(late.position, Vec2::new(10.0, 0.0));
        assert_eq!(late.velocity, Vec2::new(1.0, 0.0));

        let early = buf.get_interpolated("p", 10.0).unwrap();
        assert_eq!(early.position, Vec2::new(10.0, 0.0));
        assert_eq!(early.velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_fresh_buffer_follows_newest_sample() {
        // Both samples are newer than now - delay, as right after a clear.
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 0.0);
        x_sample(&mut buf, 1050.0, 10.0);
        assert_eq!(buf.sample_at("p", 1060.0).unwrap().position.x, 10.0);
    }

    #[test]
    fn test_single_sample_is_returned_as_is() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 7.0);
        assert_eq!(buf.get_interpolated("p", 1000.0).unwrap().position.x, 7.0);
        assert_eq!(buf.get_interpolated("p", 9999.0).unwrap().position.x, 7.0);
    }

    #[test]
    fn test_equal_timestamps_take_before() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 1.0);
        x_sample(&mut buf, 1000.0, 2.0);
        assert_eq!(buf.get_interpolated("p", 1000.0).unwrap().position.x, 1.0);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut buf = InterpolationBuffer::new(3, 100.0);
        for i in 0..5 {
            x_sample(&mut buf, 1000.0 + i as f64, i as f32);
            assert!(buf.len("p") <= 3);
        }
        let xs: Vec<f32> = buf.state("p").unwrap().samples().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 0.0);
        x_sample(&mut buf, 900.0, 5.0);
        let ts: Vec<f64> = buf.state("p").unwrap().samples().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![1000.0, 1000.0]);
    }

    #[test]
    fn test_clear_all_keeps_target() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 4.0);
        buf.track("q", Vec2::new(1.0, 1.0));
        buf.clear_all();
        assert!(buf.all_empty());
        assert!(buf.is_tracking("p"));
        assert_eq!(buf.state("p").unwrap().target().position, Vec2::new(4.0, 0.0));
        assert!(buf.get_interpolated("p", 1000.0).is_none());
    }

    #[test]
    fn test_remove() {
        let mut buf = InterpolationBuffer::new(10, 100.0);
        x_sample(&mut buf, 1000.0, 4.0);
        buf.remove("p");
        assert!(!buf.is_tracking("p"));
        assert_eq!(buf.len("p"), 0);
    }
}
