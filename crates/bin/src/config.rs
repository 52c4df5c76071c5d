//! Bot configuration.

use client::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Path::new("config.toml");
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("No config.toml found, creating default config");
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }
}

/// Connection and simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Game server WebSocket URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Fixed simulation steps per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
    /// Simulated viewport size in pixels.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Steer the local player toward the cheese and the hole.
    #[serde(default = "default_autopilot")]
    pub autopilot: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            tick_rate_hz: default_tick_rate(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            autopilot: default_autopilot(),
        }
    }
}

impl ServerConfig {
    /// Length of one simulation step in milliseconds.
    pub fn tick_ms(&self) -> u64 {
        (1000 / self.tick_rate_hz.max(1)).max(1) as u64
    }
}

fn default_url() -> String {
    "ws://localhost:3000".to_string()
}
fn default_tick_rate() -> u32 {
    60
}
fn default_viewport_width() -> f32 {
    800.0
}
fn default_viewport_height() -> f32 {
    500.0
}
fn default_autopilot() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.url, "ws://localhost:3000");
        assert_eq!(parsed.sync.interpolation.buffer_size, 10);
    }

    #[test]
    fn test_partial_file() {
        let parsed: Config = toml::from_str("[server]\ntick_rate_hz = 30\n").unwrap();
        assert_eq!(parsed.server.tick_ms(), 33);
        assert!(parsed.server.autopilot);
        assert_eq!(parsed.sync.latency.probe_interval_ms, 2000);
    }
}
