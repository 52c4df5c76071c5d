// Synchronization tuning.
use serde::{Deserialize, Serialize};

/// Root configuration structure for the sync core.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub interpolation: InterpolationConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub jump: JumpConfig,
    #[serde(default)]
    pub objective: ObjectiveConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// Lag compensation settings for remote players.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterpolationConfig {
    /// How far in the past remote players are rendered (ms).
    #[serde(default = "default_interpolation_delay")]
    pub delay_ms: f64,
    /// Samples kept per remote player.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Fraction of the remaining distance covered per tick.
    #[serde(default = "default_lerp_factor")]
    pub lerp_factor: f32,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_interpolation_delay(),
            buffer_size: default_buffer_size(),
            lerp_factor: default_lerp_factor(),
        }
    }
}

fn default_interpolation_delay() -> f64 {
    100.0
}
fn default_buffer_size() -> usize {
    10
}
fn default_lerp_factor() -> f32 {
    0.3
}

/// Local player motion and state reporting.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovementConfig {
    /// Horizontal speed while a direction is held (px/tick).
    #[serde(default = "default_move_speed")]
    pub speed: f32,
    /// Per-tick horizontal velocity multiplier with no direction held.
    #[serde(default = "default_damping")]
    pub damping: f32,
    /// Chance of sending a `move` report on any given tick.
    #[serde(default = "default_send_probability")]
    pub send_probability: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: default_move_speed(),
            damping: default_damping(),
            send_probability: default_send_probability(),
        }
    }
}

fn default_move_speed() -> f32 {
    3.0
}
fn default_damping() -> f32 {
    0.9
}
fn default_send_probability() -> f64 {
    0.6
}

/// Jump impulses. Negative is up (screen space).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JumpConfig {
    #[serde(default = "default_max_jumps")]
    pub max_jumps: u8,
    #[serde(default = "default_jump_force")]
    pub jump_force: f32,
    #[serde(default = "default_double_jump_force")]
    pub double_jump_force: f32,
    #[serde(default = "default_wall_jump_force")]
    pub wall_jump_force: f32,
    #[serde(default = "default_wall_jump_push")]
    pub wall_jump_push: f32,
    /// Vertical distance the player center must be above a static body's center
    /// for a contact to count as standing on it.
    #[serde(default = "default_ground_margin")]
    pub ground_margin: f32,
    /// Same, for constructed platforms.
    #[serde(default = "default_platform_margin")]
    pub platform_margin: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            max_jumps: default_max_jumps(),
            jump_force: default_jump_force(),
            double_jump_force: default_double_jump_force(),
            wall_jump_force: default_wall_jump_force(),
            wall_jump_push: default_wall_jump_push(),
            ground_margin: default_ground_margin(),
            platform_margin: default_platform_margin(),
        }
    }
}

fn default_max_jumps() -> u8 {
    2
}
fn default_jump_force() -> f32 {
    -10.0
}
fn default_double_jump_force() -> f32 {
    -9.5
}
fn default_wall_jump_force() -> f32 {
    -9.0
}
fn default_wall_jump_push() -> f32 {
    4.0
}
fn default_ground_margin() -> f32 {
    10.0
}
fn default_platform_margin() -> f32 {
    5.0
}

/// Entity sizes and fixed canonical placements.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectiveConfig {
    #[serde(default = "default_player_radius")]
    pub player_radius: f32,
    #[serde(default = "default_pickup_radius")]
    pub pickup_radius: f32,
    #[serde(default = "default_goal_radius")]
    pub goal_radius: f32,
    /// Canonical point every player returns to on round reset.
    #[serde(default = "default_spawn_x")]
    pub spawn_x: f32,
    #[serde(default = "default_spawn_y")]
    pub spawn_y: f32,
    /// Canonical size of a requested platform.
    #[serde(default = "default_platform_width")]
    pub platform_width: f32,
    #[serde(default = "default_platform_height")]
    pub platform_height: f32,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            player_radius: default_player_radius(),
            pickup_radius: default_pickup_radius(),
            goal_radius: default_goal_radius(),
            spawn_x: default_spawn_x(),
            spawn_y: default_spawn_y(),
            platform_width: default_platform_width(),
            platform_height: default_platform_height(),
        }
    }
}

fn default_player_radius() -> f32 {
    20.0
}
fn default_pickup_radius() -> f32 {
    15.0
}
fn default_goal_radius() -> f32 {
    30.0
}
fn default_spawn_x() -> f32 {
    100.0
}
fn default_spawn_y() -> f32 {
    400.0
}
fn default_platform_width() -> f32 {
    100.0
}
fn default_platform_height() -> f32 {
    20.0
}

/// Round-trip probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatencyConfig {
    #[serde(default = "default_probe_interval")]
    pub probe_interval_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            probe_interval_ms: default_probe_interval(),
        }
    }
}

fn default_probe_interval() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let cfg: SyncConfig =
            serde_json::from_str(r#"{"movement":{"send_probability":1.0}}"#).unwrap();
        assert_eq!(cfg.movement.send_probability, 1.0);
        assert_eq!(cfg.movement.speed, 3.0);
        assert_eq!(cfg.interpolation.buffer_size, 10);
        assert_eq!(cfg.jump.max_jumps, 2);
        assert_eq!(cfg.latency.probe_interval_ms, 2000);
    }
}
