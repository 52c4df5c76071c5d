// Entities the core tracks. Bodies belong to the physics world; these records
// hold the handles plus the game-level flags.
use glam::Vec2;
use protocol::{PlatformData, PlatformId, PlayerData};

use crate::viewport::Viewport;
use crate::world::{Appearance, BodyHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntity {
    pub id: String,
    pub body: BodyHandle,
    pub is_shaman: bool,
    pub has_cheese: bool,
}

impl PlayerEntity {
    pub fn new(data: &PlayerData, body: BodyHandle) -> Self {
        Self {
            id: data.id.clone(),
            body,
            is_shaman: data.is_shaman,
            has_cheese: data.has_cheese,
        }
    }

    #[inline]
    pub fn appearance(&self) -> Appearance {
        Appearance::for_player(self.is_shaman, self.has_cheese)
    }
}

/// The cheese or the hole. The canonical position is kept so placement can be
/// recomputed exactly after a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticEntity {
    pub body: BodyHandle,
    pub canonical: Vec2,
}

impl StaticEntity {
    #[inline]
    pub fn viewport_position(&self, viewport: &Viewport) -> Vec2 {
        viewport.to_viewport(self.canonical)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: Option<PlatformId>,
    pub body: BodyHandle,
    pub canonical: PlatformData,
}

impl Platform {
    #[inline]
    pub fn viewport_position(&self, viewport: &Viewport) -> Vec2 {
        viewport.to_viewport(self.canonical.position())
    }

    /// Size in viewport pixels.
    #[inline]
    pub fn viewport_size(&self, viewport: &Viewport) -> Vec2 {
        self.canonical.size() * viewport.pixels_per_canonical()
    }
}
