// Real-time synchronization core for the shaman-run game client
// Reconciles a locally predicted player with the server, replays remote players
// slightly in the past, and keeps every entity in one viewport-independent frame.

// Module structure - each module handles a specific concern
pub mod config;        // Tuning constants, serde-loadable
pub mod entity;        // Player, cheese/hole, platform records
pub mod error;         // ClientError
pub mod game;          // SyncEngine: registries, message routing, tick
pub mod input;         // Keyboard and touch state
pub mod interpolation; // Per-player delayed playback buffers
pub mod jump;          // Jump / double-jump / wall-jump state machine
pub mod latency;       // Round-trip probe
pub mod movement;      // Local prediction and move reports
pub mod network;       // Outbound channel seam
pub mod objective;     // Cheese and hole proximity
pub mod ui;            // Status sinks and formatting
pub mod utils;         // LERP, wall clock, id formatting
pub mod viewport;      // Canonical <-> pixel conversion
pub mod world;         // Physics seam and the arena world

pub use config::SyncConfig;
pub use error::ClientError;
pub use game::SyncEngine;
pub use network::Channel;
pub use ui::StatusSink;
pub use viewport::Viewport;
pub use world::{ArenaPhysics, PhysicsWorld};
