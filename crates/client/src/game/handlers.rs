// Inbound message handlers
use glam::Vec2;
use protocol::{GameSnapshot, PlatformData, PlayerData, Point};
use tracing::{debug, info, trace};

use super::SyncEngine;
use crate::entity::{Platform, PlayerEntity, StaticEntity};
use crate::latency::LatencyQuality;
use crate::network::Channel;
use crate::ui::{self, Role, StatusSink};
use crate::world::{Appearance, BodyKind, PhysicsWorld};

impl<P: PhysicsWorld, C: Channel, S: StatusSink> SyncEngine<P, C, S> {
    /// Session start: adopt the id and build the whole world from the snapshot.
    pub(super) fn on_init(&mut self, player_id: String, snapshot: GameSnapshot) {
        self.clear_world();
        self.status.player_id(&player_id);
        self.local_id = Some(player_id);

        for data in snapshot.players.values() {
            let mut data = data.clone();
            if let Some(shaman_id) = &snapshot.shaman_id {
                data.is_shaman = &data.id == shaman_id;
            }
            self.spawn_player(&data);
        }

        self.status.role(Role::from_flag(self.is_local_shaman()));

        if let Some(cheese) = snapshot.cheese {
            self.place_sensor(BodyKind::Pickup, cheese);
        }
        if let Some(hole) = snapshot.hole {
            self.place_sensor(BodyKind::Goal, hole);
        }
        for platform in snapshot.platforms {
            self.add_platform(platform);
        }

        self.status.player_count(self.players.len());
        info!("Game initialized with {} players", self.players.len());
    }

    pub(super) fn on_player_joined(&mut self, data: &PlayerData) {
        info!("Player joined: {}", data.id);
        self.spawn_player(data);
        self.status.player_count(self.players.len());
    }

    pub(super) fn on_player_left(&mut self, player_id: &str) {
        info!("Player left: {}", player_id);
        if let Some(player) = self.players.remove(player_id) {
            self.physics.remove(player.body);
            self.buffer.remove(player_id);
        }
        self.status.player_count(self.players.len());
    }

    /// Remote state report. Stamped with receipt time; reports about the
    /// local player or unknown ids are dropped.
    pub(super) fn on_player_move(&mut self, player_id: &str, position: Vec2, velocity: Vec2, now: f64) {
        if self.is_local(player_id) || !self.players.contains_key(player_id) {
            trace!("Ignoring move for {}", player_id);
            return;
        }
        let position = self.viewport.to_viewport(position);
        let velocity = velocity * self.viewport.pixels_per_canonical();
        self.buffer.add_sample(player_id, position, velocity, now);
    }

    pub(super) fn on_cheese_collected(&mut self, player_id: &str) {
        info!("Player {} collected the cheese", crate::utils::short_id(player_id));
        if let Some(cheese) = self.cheese.take() {
            self.physics.remove(cheese.body);
        }
        if let Some(player) = self.players.get_mut(player_id) {
            player.has_cheese = true;
            self.physics.set_appearance(player.body, player.appearance());
        }
    }

    pub(super) fn on_player_won(&mut self, player_id: &str) {
        info!("Winner: {}", player_id);
        self.status.show_message(&ui::format_winner(player_id));
    }

    /// Role transfer. Every other player loses the role in the same step.
    /// An id not registered yet keeps the current flags and is applied when
    /// that player spawns.
    pub(super) fn on_new_shaman(&mut self, shaman_id: &str) {
        if !self.players.contains_key(shaman_id) {
            debug!("Shaman {} not known yet, deferring", shaman_id);
            self.pending_shaman = Some(shaman_id.to_string());
            return;
        }
        info!("New shaman: {}", shaman_id);
        self.pending_shaman = None;
        for (id, player) in &mut self.players {
            player.is_shaman = id == shaman_id;
            self.physics.set_appearance(player.body, player.appearance());
        }
        self.status.role(Role::from_flag(self.is_local_shaman()));
    }

    pub(super) fn on_pong(&mut self, now: f64) {
        if let Some(rtt) = self.latency.on_pong(now) {
            let quality = LatencyQuality::from_ms(rtt);
            debug!("Latency {:.0}ms ({})", rtt, quality.as_str());
            self.status.latency(rtt, quality);
        }
    }

    pub(super) fn add_platform(&mut self, data: PlatformData) {
        let position = self.viewport.to_viewport(data.position());
        let size = data.size() * self.viewport.pixels_per_canonical();
        let body = self.physics.add_platform(position, size, data.angle);
        debug!("Platform built at ({:.1}, {:.1})", data.x, data.y);
        self.platforms.push(Platform {
            id: data.id.clone(),
            body,
            canonical: data,
        });
    }

    /// Create the cheese or the hole at a canonical point, replacing any
    /// previous one.
    pub(super) fn place_sensor(&mut self, kind: BodyKind, at: Point) {
        let radius = match kind {
            BodyKind::Goal => self.config.objective.goal_radius,
            _ => self.config.objective.pickup_radius,
        };
        let canonical = at.position();
        let body = self
            .physics
            .add_sensor(kind, self.viewport.to_viewport(canonical), radius);
        let slot = match kind {
            BodyKind::Goal => &mut self.hole,
            _ => &mut self.cheese,
        };
        if let Some(old) = slot.replace(StaticEntity { body, canonical }) {
            self.physics.remove(old.body);
        }
    }

    fn spawn_player(&mut self, data: &PlayerData) {
        if let Some(old) = self.players.remove(&data.id) {
            self.physics.remove(old.body);
        }
        let position = self.viewport.to_viewport(data.position());
        let appearance = Appearance::for_player(data.is_shaman, data.has_cheese);
        let body = self
            .physics
            .add_player(position, self.config.objective.player_radius, appearance);
        if !self.is_local(&data.id) {
            self.buffer.track(&data.id, position);
        }
        self.players.insert(data.id.clone(), PlayerEntity::new(data, body));

        if self.pending_shaman.as_deref() == Some(data.id.as_str()) {
            self.on_new_shaman(&data.id);
        }
    }

    /// Drop every entity, e.g. before a fresh snapshot.
    fn clear_world(&mut self) {
        for (id, player) in self.players.drain() {
            self.physics.remove(player.body);
            self.buffer.remove(&id);
        }
        for sensor in [self.cheese.take(), self.hole.take()].into_iter().flatten() {
            self.physics.remove(sensor.body);
        }
        for platform in self.platforms.drain(..) {
            self.physics.remove(platform.body);
        }
        self.pending_shaman = None;
        self.jump.reset();
        self.objective.reset();
    }
}
