// Physics seam.
//
// The sync core never simulates bodies itself. It drives a physics world
// through position/velocity setters and learns about contacts from the
// collision events the world reports after each step. Bodies are owned by
// the world; the core only keeps their handles.
mod arena;

pub use arena::ArenaPhysics;

use glam::Vec2;

/// Opaque handle to a body owned by the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u32);

/// Which side wall a body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

impl WallSide {
    /// Horizontal direction pointing away from this wall.
    #[inline]
    pub fn away(self) -> f32 {
        match self {
            WallSide::Left => 1.0,
            WallSide::Right => -1.0,
        }
    }
}

/// What a body represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Player,
    Ground,
    Ceiling,
    Wall(WallSide),
    Platform,
    /// The cheese.
    Pickup,
    /// The hole.
    Goal,
}

impl BodyKind {
    /// Non-moving bodies that players collide with.
    #[inline]
    pub fn is_solid_static(self) -> bool {
        matches!(
            self,
            BodyKind::Ground | BodyKind::Ceiling | BodyKind::Wall(_) | BodyKind::Platform
        )
    }
}

/// Render appearance of a player body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Mouse,
    CheeseCarrier,
    Shaman,
}

impl Appearance {
    /// Shaman look wins over carrying the cheese.
    pub fn for_player(is_shaman: bool, has_cheese: bool) -> Self {
        if is_shaman {
            Appearance::Shaman
        } else if has_cheese {
            Appearance::CheeseCarrier
        } else {
            Appearance::Mouse
        }
    }

    pub fn fill_style(self) -> &'static str {
        match self {
            Appearance::Mouse => "#808080",
            Appearance::CheeseCarrier => "#FFA500",
            Appearance::Shaman => "#FFD700",
        }
    }
}

/// Unordered pair of bodies in contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl CollisionPair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self { a, b }
    }

    /// If `body` is part of this pair, the other member.
    #[inline]
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.a == body {
            Some(self.b)
        } else if self.b == body {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Contact change reported by a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    Start(CollisionPair),
    End(CollisionPair),
}

/// Capability the core drives. Positions and sizes are viewport pixels.
pub trait PhysicsWorld {
    /// Replace the world bounds (ground, ceiling, side walls) for a viewport.
    fn set_bounds(&mut self, width: f32, height: f32);

    fn add_player(&mut self, position: Vec2, radius: f32, appearance: Appearance) -> BodyHandle;

    /// Add a static circular sensor (pickup or goal).
    fn add_sensor(&mut self, kind: BodyKind, position: Vec2, radius: f32) -> BodyHandle;

    /// Add a static platform centered at `position`.
    fn add_platform(&mut self, position: Vec2, size: Vec2, angle: f32) -> BodyHandle;

    fn remove(&mut self, body: BodyHandle);

    fn kind(&self, body: BodyHandle) -> Option<BodyKind>;

    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    fn set_position(&mut self, body: BodyHandle, position: Vec2);

    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn set_appearance(&mut self, body: BodyHandle, appearance: Appearance);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appearance_precedence() {
        assert_eq!(Appearance::for_player(true, true), Appearance::Shaman);
        assert_eq!(Appearance::for_player(false, true), Appearance::CheeseCarrier);
        assert_eq!(Appearance::for_player(false, false), Appearance::Mouse);
        assert_eq!(Appearance::Shaman.fill_style(), "#FFD700");
    }

    #[test]
    fn test_pair_other() {
        let pair = CollisionPair::new(BodyHandle(1), BodyHandle(2));
        assert_eq!(pair.other(BodyHandle(1)), Some(BodyHandle(2)));
        assert_eq!(pair.other(BodyHandle(2)), Some(BodyHandle(1)));
        assert_eq!(pair.other(BodyHandle(3)), None);
    }
}
