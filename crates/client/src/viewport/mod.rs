// Viewport - canonical <-> pixel space conversion
//
// Every network message speaks canonical 800x500 space. The physics world and
// renderer speak the current viewport's pixel space. Conversion is a plain
// per-axis scale, no offset:
//   canonical = viewport * (800 / width, 500 / height)
//   viewport  = canonical * (width / 800, height / 500)
use glam::Vec2;
use protocol::{CANONICAL_HEIGHT, CANONICAL_WIDTH};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, ClientError> {
        if !Self::is_valid(width, height) {
            return Err(ClientError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    fn is_valid(width: f32, height: f32) -> bool {
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Viewport pixels -> canonical units.
    #[inline]
    pub fn to_canonical(&self, viewport_pos: Vec2) -> Vec2 {
        viewport_pos * self.canonical_per_pixel()
    }

    /// Canonical units -> viewport pixels.
    #[inline]
    pub fn to_viewport(&self, canonical_pos: Vec2) -> Vec2 {
        canonical_pos * self.pixels_per_canonical()
    }

    /// Velocities and sizes scale the same way positions do.
    #[inline]
    pub fn canonical_per_pixel(&self) -> Vec2 {
        Vec2::new(CANONICAL_WIDTH / self.width, CANONICAL_HEIGHT / self.height)
    }

    #[inline]
    pub fn pixels_per_canonical(&self) -> Vec2 {
        Vec2::new(self.width / CANONICAL_WIDTH, self.height / CANONICAL_HEIGHT)
    }

    /// Switch to new dimensions and return the per-axis factor
    /// `(new_width / old_width, new_height / old_height)` that live
    /// viewport-space positions must be multiplied by.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<Vec2, ClientError> {
        if !Self::is_valid(width, height) {
            return Err(ClientError::InvalidViewport { width, height });
        }
        let scale = Vec2::new(width / self.width, height / self.height);
        self.width = width;
        self.height = height;
        Ok(scale)
    }
}
