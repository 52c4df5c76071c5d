// Round lifecycle
use glam::Vec2;
use protocol::GameSnapshot;
use tracing::info;

use super::SyncEngine;
use crate::network::Channel;
use crate::ui::StatusSink;
use crate::world::{BodyKind, PhysicsWorld};

impl<P: PhysicsWorld, C: Channel, S: StatusSink> SyncEngine<P, C, S> {
    /// Start a new round from a reset snapshot.
    ///
    /// Local control state and every interpolation buffer are cleared, the
    /// cheese and hole are recreated where the snapshot places them, all
    /// platforms are removed and every player goes back to the spawn point
    /// with no velocity and no cheese.
    pub fn reset_round(&mut self, snapshot: &GameSnapshot) {
        info!("Round reset");
        self.status.show_message("New round!");

        self.objective.reset();
        self.jump.reset();
        self.buffer.clear_all();

        if let Some(cheese) = snapshot.cheese {
            self.place_sensor(BodyKind::Pickup, cheese);
        }
        if let Some(hole) = snapshot.hole {
            self.place_sensor(BodyKind::Goal, hole);
        }

        for platform in self.platforms.drain(..) {
            self.physics.remove(platform.body);
        }

        let spawn = self.viewport.to_viewport(self.spawn_point());
        for player in self.players.values_mut() {
            player.has_cheese = false;
            self.physics.set_position(player.body, spawn);
            self.physics.set_velocity(player.body, Vec2::ZERO);
            self.physics.set_appearance(player.body, player.appearance());
        }
    }

    /// Canonical spawn point every player returns to on reset.
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.config.objective.spawn_x, self.config.objective.spawn_y)
    }
}
