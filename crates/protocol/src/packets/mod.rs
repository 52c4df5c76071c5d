//! Message definitions for the game channel.
//!
//! This module contains both client->server and server->client message types,
//! plus the payload records they share. Messages are JSON objects tagged by a
//! `"type"` field.

mod client;
mod server;

pub use client::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::Position;

/// A bare canonical position (cheese, hole).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A player as described by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub is_shaman: bool,
    #[serde(default)]
    pub has_cheese: bool,
}

impl PlayerData {
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Server-assigned platform id. Servers send either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformId::Number(n) => write!(f, "{n}"),
            PlatformId::Text(s) => f.write_str(s),
        }
    }
}

/// A constructed platform. Center position and size are canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlatformId>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub angle: f32,
}

impl PlatformData {
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Position {
        Position::new(self.width, self.height)
    }
}

/// Full world snapshot, sent on connect and on round reset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default)]
    pub players: HashMap<String, PlayerData>,
    #[serde(default)]
    pub cheese: Option<Point>,
    #[serde(default)]
    pub hole: Option<Point>,
    #[serde(default)]
    pub platforms: Vec<PlatformData>,
    #[serde(default)]
    pub shaman_id: Option<String>,
}
