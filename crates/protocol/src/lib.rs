//! Shared protocol crate for shaman-run.
//!
//! This crate contains:
//! - Message definitions for both directions of the game channel
//! - The JSON codec used to put them on the wire
//! - Shared types (Position, canonical space dimensions)
//!
//! Every positional field carried by a message lives in canonical space,
//! a fixed 800x500 logical plane that is independent of any viewport.

mod error;
pub mod packets;

pub use error::ProtocolError;
pub use packets::{
    ClientMessage, GameSnapshot, PlatformData, PlatformId, PlayerData, Point, ServerMessage,
};

/// Width of canonical space.
pub const CANONICAL_WIDTH: f32 = 800.0;
/// Height of canonical space.
pub const CANONICAL_HEIGHT: f32 = 500.0;

/// Represents a 2D position using glam's Vec2.
pub type Position = glam::Vec2;
