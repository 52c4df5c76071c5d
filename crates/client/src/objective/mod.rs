// Pickup and goal proximity checks for the local player.
use glam::Vec2;
use protocol::ClientMessage;

use crate::config::ObjectiveConfig;

/// One-shot event raised by [`ObjectiveDetector::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveEvent {
    CollectCheese,
    ReachHole,
}

impl ObjectiveEvent {
    pub fn message(self) -> ClientMessage {
        match self {
            ObjectiveEvent::CollectCheese => ClientMessage::CollectCheese,
            ObjectiveEvent::ReachHole => ClientMessage::ReachHole,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectiveDetector {
    reached_hole: bool,
}

impl ObjectiveDetector {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reached_hole(&self) -> bool {
        self.reached_hole
    }

    /// Run one proximity check. Positions are viewport space; radii are pixels.
    ///
    /// `has_cheese` is the local player's possession flag and is set here when
    /// the cheese is reached.
    pub fn check(
        &mut self,
        config: &ObjectiveConfig,
        player: Vec2,
        has_cheese: &mut bool,
        cheese: Option<Vec2>,
        hole: Option<Vec2>,
    ) -> Option<ObjectiveEvent> {
        if !*has_cheese {
            let cheese = cheese?;
            if player.distance(cheese) < config.player_radius + config.pickup_radius {
                *has_cheese = true;
                self.reached_hole = false;
                return Some(ObjectiveEvent::CollectCheese);
            }
            return None;
        }

        let hole = hole?;
        if !self.reached_hole && player.distance(hole) < config.player_radius + config.goal_radius {
            self.reached_hole = true;
            return Some(ObjectiveEvent::ReachHole);
        }
        None
    }

    /// Clear the reached latch for a new round.
    pub fn reset(&mut self) {
        self.reached_hole = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_once() {
        let config = ObjectiveConfig::default();
        let mut det = ObjectiveDetector::new();
        let mut has = false;
        let cheese = Some(Vec2::new(100.0, 100.0));

        assert_eq!(det.check(&config, Vec2::new(200.0, 100.0), &mut has, cheese, None), None);
        assert_eq!(
            det.check(&config, Vec2::new(130.0, 100.0), &mut has, cheese, None),
            Some(ObjectiveEvent::CollectCheese)
        );
        assert!(has);
        assert_eq!(det.check(&config, Vec2::new(130.0, 100.0), &mut has, cheese, None), None);
    }

    #[test]
    fn test_radius_is_strict() {
        let config = ObjectiveConfig::default();
        let mut det = ObjectiveDetector::new();
        let mut has = false;
        let cheese = Some(Vec2::ZERO);
        assert_eq!(det.check(&config, Vec2::new(35.0, 0.0), &mut has, cheese, None), None);
        assert!(!has);
    }

    #[test]
    fn test_goal_latched() {
        let config = ObjectiveConfig::default();
        let mut det = ObjectiveDetector::new();
        let mut has = true;
        let hole = Some(Vec2::new(700.0, 400.0));
        let at_hole = Vec2::new(710.0, 400.0);

        assert_eq!(det.check(&config, at_hole, &mut has, None, hole), Some(ObjectiveEvent::ReachHole));
        assert!(det.reached_hole());
        assert_eq!(det.check(&config, at_hole, &mut has, None, hole), None);

        det.reset();
        assert_eq!(det.check(&config, at_hole, &mut has, None, hole), Some(ObjectiveEvent::ReachHole));
    }

    #[test]
    fn test_no_hole_without_cheese() {
        let config = ObjectiveConfig::default();
        let mut det = ObjectiveDetector::new();
        let mut has = false;
        let hole = Some(Vec2::ZERO);
        assert_eq!(det.check(&config, Vec2::ZERO, &mut has, None, hole), None);
    }

    #[test]
    fn test_pickup_clears_latch() {
        let config = ObjectiveConfig::default();
        let mut det = ObjectiveDetector::new();
        let mut has = true;
        det.check(&config, Vec2::ZERO, &mut has, None, Some(Vec2::ZERO));
        assert!(det.reached_hole());
        has = false;
        det.check(&config, Vec2::ZERO, &mut has, Some(Vec2::ZERO), None);
        assert!(!det.reached_hole());
    }
}
