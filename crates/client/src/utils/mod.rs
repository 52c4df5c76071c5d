// Helper utilities: LERP, wall-clock time, id formatting
use glam::Vec2;
use std::time::{SystemTime, UNIX_EPOCH};

/// Linear interpolation between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation
#[inline]
pub fn lerp_vec(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Current wall-clock timestamp in milliseconds
pub fn now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// First five characters of a player id, as shown to users
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(5) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(lerp_vec(Vec2::ZERO, Vec2::new(10.0, -10.0), 0.5), Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abcdefgh"), "abcde");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("мышьмышь"), "мышьм");
    }
}
