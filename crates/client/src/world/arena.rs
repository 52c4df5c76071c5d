// Minimal fixed-step physics world.
//
// Players are circles under gravity; bounds and platforms are static
// axis-aligned rectangles (platform angles are ignored);
// the cheese and the hole are circular sensors. Contact events are derived
// from the change in the contact set between two steps.
use glam::Vec2;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

use super::{
    Appearance, BodyHandle, BodyKind, CollisionEvent, CollisionPair, PhysicsWorld, WallSide,
};

/// Velocity added per step (px/tick²), close to a 60 Hz step at unit gravity.
const GRAVITY: f32 = 0.28;
const AIR_FRICTION: f32 = 0.01;
/// Resting bodies stay in contact within this distance.
const CONTACT_SLOP: f32 = 0.5;
const BOUND_THICKNESS: f32 = 20.0;

#[derive(Debug, Clone, Copy)]
enum Shape {
    Circle(f32),
    Rect { half: Vec2 },
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    shape: Shape,
    position: Vec2,
    velocity: Vec2,
    appearance: Option<Appearance>,
}

#[derive(Debug)]
pub struct ArenaPhysics {
    bodies: BTreeMap<u32, Body>,
    next_id: u32,
    bounds: Vec<BodyHandle>,
    /// (player, other) pairs touching after the last step.
    contacts: BTreeSet<(u32, u32)>,
}

impl ArenaPhysics {
    pub fn new(width: f32, height: f32) -> Self {
        let mut world = Self {
            bodies: BTreeMap::new(),
            next_id: 1,
            bounds: Vec::new(),
            contacts: BTreeSet::new(),
        };
        world.set_bounds(width, height);
        world
    }

    fn insert(&mut self, body: Body) -> BodyHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(id, body);
        BodyHandle(id)
    }

    fn add_rect(&mut self, kind: BodyKind, position: Vec2, size: Vec2) -> BodyHandle {
        self.insert(Body {
            kind,
            shape: Shape::Rect { half: size * 0.5 },
            position,
            velocity: Vec2::ZERO,
            appearance: None,
        })
    }

    /// Number of live bodies, bounds included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn appearance(&self, body: BodyHandle) -> Option<Appearance> {
        self.bodies.get(&body.0).and_then(|b| b.appearance)
    }

    /// Size of a rectangular body.
    pub fn rect_size(&self, body: BodyHandle) -> Option<Vec2> {
        match self.bodies.get(&body.0)?.shape {
            Shape::Rect { half } => Some(half * 2.0),
            Shape::Circle(_) => None,
        }
    }

    /// Advance one fixed step and report contact changes.
    pub fn step(&mut self) -> Vec<CollisionEvent> {
        let solids: Vec<(Vec2, Vec2)> = self
            .bodies
            .values()
            .filter(|b| b.kind.is_solid_static())
            .filter_map(|b| match b.shape {
                Shape::Rect { half } => Some((b.position, half)),
                Shape::Circle(_) => None,
            })
            .collect();

        for body in self.bodies.values_mut() {
            let (BodyKind::Player, Shape::Circle(radius)) = (body.kind, body.shape) else {
                continue;
            };
            body.velocity.y += GRAVITY;
            body.velocity *= 1.0 - AIR_FRICTION;
            body.position += body.velocity;
            for &(center, half) in &solids {
                resolve_circle_rect(&mut body.position, &mut body.velocity, radius, center, half);
            }
        }

        let current = self.compute_contacts();
        let mut events = Vec::new();
        for &(p, o) in current.difference(&self.contacts) {
            events.push(CollisionEvent::Start(CollisionPair::new(BodyHandle(p), BodyHandle(o))));
        }
        for &(p, o) in self.contacts.difference(&current) {
            events.push(CollisionEvent::End(CollisionPair::new(BodyHandle(p), BodyHandle(o))));
        }
        if !events.is_empty() {
            trace!("Physics step produced {} contact events", events.len());
        }
        self.contacts = current;
        events
    }

    fn compute_contacts(&self) -> BTreeSet<(u32, u32)> {
        let mut contacts = BTreeSet::new();
        for (&pid, player) in &self.bodies {
            let (BodyKind::Player, Shape::Circle(radius)) = (player.kind, player.shape) else {
                continue;
            };
            for (&oid, other) in &self.bodies {
                if other.kind == BodyKind::Player {
                    continue;
                }
                let touching = match other.shape {
                    Shape::Rect { half } => {
                        let closest = player.position.clamp(other.position - half, other.position + half);
                        player.position.distance(closest) <= radius + CONTACT_SLOP
                    }
                    Shape::Circle(r) => player.position.distance(other.position) < radius + r,
                };
                if touching {
                    contacts.insert((pid, oid));
                }
            }
        }
        contacts
    }
}

/// Push a circle out of a rectangle and drop the velocity component into it.
fn resolve_circle_rect(pos: &mut Vec2, vel: &mut Vec2, radius: f32, center: Vec2, half: Vec2) {
    let closest = pos.clamp(center - half, center + half);
    let delta = *pos - closest;
    let dist = delta.length();
    if dist >= radius {
        return;
    }

    let normal = if dist > f32::EPSILON {
        let n = delta / dist;
        *pos += n * (radius - dist);
        n
    } else {
        // Center inside the rectangle: leave along the shallowest axis.
        let d = *pos - center;
        let overlap = half + Vec2::splat(radius) - d.abs();
        if overlap.x < overlap.y {
            let sign = if d.x < 0.0 { -1.0 } else { 1.0 };
            pos.x += sign * overlap.x;
            Vec2::new(sign, 0.0)
        } else {
            let sign = if d.y < 0.0 { -1.0 } else { 1.0 };
            pos.y += sign * overlap.y;
            Vec2::new(0.0, sign)
        }
    };

    let into = vel.dot(normal);
    if into < 0.0 {
        *vel -= normal * into;
    }
}

impl PhysicsWorld for ArenaPhysics {
    fn set_bounds(&mut self, width: f32, height: f32) {
        for handle in std::mem::take(&mut self.bounds) {
            self.remove(handle);
        }
        let t = BOUND_THICKNESS;
        let bounds = vec![
            self.add_rect(BodyKind::Ground, Vec2::new(width / 2.0, height - t / 2.0), Vec2::new(width, t)),
            self.add_rect(BodyKind::Ceiling, Vec2::new(width / 2.0, t / 2.0), Vec2::new(width, t)),
            self.add_rect(
                BodyKind::Wall(WallSide::Left),
                Vec2::new(t / 2.0, height / 2.0),
                Vec2::new(t, height),
            ),
            self.add_rect(
                BodyKind::Wall(WallSide::Right),
                Vec2::new(width - t / 2.0, height / 2.0),
                Vec2::new(t, height),
            ),
        ];
        self.bounds = bounds;
    }

    fn add_player(&mut self, position: Vec2, radius: f32, appearance: Appearance) -> BodyHandle {
        self.insert(Body {
            kind: BodyKind::Player,
            shape: Shape::Circle(radius),
            position,
            velocity: Vec2::ZERO,
            appearance: Some(appearance),
        })
    }

    fn add_sensor(&mut self, kind: BodyKind, position: Vec2, radius: f32) -> BodyHandle {
        self.insert(Body {
            kind,
            shape: Shape::Circle(radius),
            position,
            velocity: Vec2::ZERO,
            appearance: None,
        })
    }

    fn add_platform(&mut self, position: Vec2, size: Vec2, _angle: f32) -> BodyHandle {
        self.add_rect(BodyKind::Platform, position, size)
    }

    fn remove(&mut self, body: BodyHandle) {
        self.bodies.remove(&body.0);
        self.contacts.retain(|&(p, o)| p != body.0 && o != body.0);
    }

    fn kind(&self, body: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(&body.0).map(|b| b.kind)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body.0).map(|b| b.position)
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.position = position;
        }
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body.0).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.velocity = velocity;
        }
    }

    fn set_appearance(&mut self, body: BodyHandle, appearance: Appearance) {
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.appearance = Some(appearance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts_with(events: &[CollisionEvent], player: BodyHandle, world: &ArenaPhysics, kind: BodyKind) -> bool {
        events.iter().any(|e| match e {
            CollisionEvent::Start(pair) => pair
                .other(player)
                .and_then(|o| world.kind(o))
                .is_some_and(|k| k == kind),
            CollisionEvent::End(_) => false,
        })
    }

    #[test]
    fn test_bounds_replaced_on_resize() {
        let mut world = ArenaPhysics::new(800.0, 500.0);
        assert_eq!(world.body_count(), 4);
        world.set_bounds(1600.0, 1000.0);
        assert_eq!(world.body_count(), 4);
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut world = ArenaPhysics::new(800.0, 500.0);
        let player = world.add_player(Vec2::new(400.0, 400.0), 20.0, Appearance::Mouse);

        let mut landed = false;
        for _ in 0..120 {
            let events = world.step();
            landed |= starts_with(&events, player, &world, BodyKind::Ground);
        }
        assert!(landed);
        let pos = world.position(player).unwrap();
        // Ground top is at 480; the circle rests on it.
        assert!((pos.y - 460.0).abs() < 1.0, "resting y = {}", pos.y);
        assert!(world.velocity(player).unwrap().y.abs() < 0.5);
    }

    #[test]
    fn test_wall_contact_starts_and_ends() {
        let mut world = ArenaPhysics::new(800.0, 500.0);
        let player = world.add_player(Vec2::new(60.0, 460.0), 20.0, Appearance::Mouse);

        let mut touched = false;
        for _ in 0..30 {
            world.set_velocity(player, Vec2::new(-3.0, world.velocity(player).unwrap().y));
            let events = world.step();
            touched |= starts_with(&events, player, &world, BodyKind::Wall(WallSide::Left));
        }
        assert!(touched);

        let mut left = false;
        for _ in 0..30 {
            world.set_velocity(player, Vec2::new(3.0, world.velocity(player).unwrap().y));
            left |= world.step().iter().any(|e| matches!(e, CollisionEvent::End(pair)
                if pair.other(player).and_then(|o| world.kind(o)) == Some(BodyKind::Wall(WallSide::Left))));
        }
        assert!(left);
    }

    #[test]
    fn test_sensor_contacts_do_not_push() {
        let mut world = ArenaPhysics::new(800.0, 500.0);
        let player = world.add_player(Vec2::new(400.0, 460.0), 20.0, Appearance::Mouse);
        let cheese = world.add_sensor(BodyKind::Pickup, Vec2::new(400.0, 460.0), 15.0);
        let events = world.step();
        assert!(events.contains(&CollisionEvent::Start(CollisionPair::new(player, cheese))));
        assert!((world.position(player).unwrap().x - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_platform_blocks_from_above() {
        let mut world = ArenaPhysics::new(800.0, 500.0);
        let platform = world.add_platform(Vec2::new(400.0, 300.0), Vec2::new(100.0, 20.0), 0.0);
        let player = world.add_player(Vec2::new(400.0, 200.0), 20.0, Appearance::Mouse);
        for _ in 0..120 {
            world.step();
        }
        let pos = world.position(player).unwrap();
        assert!((pos.y - 270.0).abs() < 1.0, "resting y = {}", pos.y);
        assert_eq!(world.rect_size(platform), Some(Vec2::new(100.0, 20.0)));
    }

    #[test]
    fn test_removed_body_leaves_no_contact() {
        let mut world = ArenaPhysics::new(800.0, 500.0);
        let player = world.add_player(Vec2::new(400.0, 460.0), 20.0, Appearance::Mouse);
        let cheese = world.add_sensor(BodyKind::Pickup, Vec2::new(400.0, 460.0), 15.0);
        world.step();
        world.remove(cheese);
        let events = world.step();
        assert!(!events.iter().any(|e| matches!(e, CollisionEvent::End(p) if p.other(player) == Some(cheese))));
        assert!(world.kind(cheese).is_none());
    }
}
