// Sync engine: entity registries, message routing, the fixed-step tick
//
// Everything the client knows about the match lives here and is mutated only
// through engine methods, from one logical thread:
//   - inbound messages          -> handle_message / apply
//   - fixed simulation step     -> tick
//   - physics contact changes   -> on_collisions
//   - input, resize, channel    -> key_*/touch_*/request_platform, resize, on_channel_*
mod handlers;
mod round;


use glam::Vec2;
use protocol::{ClientMessage, ServerMessage};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::{debug, info, trace};

use crate::config::SyncConfig;
use crate::entity::{Platform, PlayerEntity, StaticEntity};
use crate::error::ClientError;
use crate::input::{Input, TouchButton};
use crate::interpolation::InterpolationBuffer;
use crate::jump::{JumpState, Surface};
use crate::latency::LatencyMonitor;
use crate::movement::MovementController;
use crate::network::{self, Channel};
use crate::objective::{ObjectiveDetector, ObjectiveEvent};
use crate::ui::StatusSink;
use crate::utils;
use crate::viewport::Viewport;
use crate::world::{BodyKind, CollisionEvent, PhysicsWorld};

pub struct SyncEngine<P, C, S> {
    config: SyncConfig,
    viewport: Viewport,
    physics: P,
    channel: C,
    status: S,

    local_id: Option<String>,
    players: HashMap<String, PlayerEntity>,
    cheese: Option<StaticEntity>,
    hole: Option<StaticEntity>,
    platforms: Vec<Platform>,
    /// Shaman named before that player was known.
    pending_shaman: Option<String>,

    buffer: InterpolationBuffer,
    input: Input,
    movement: MovementController,
    jump: JumpState,
    objective: ObjectiveDetector,
    latency: LatencyMonitor,
}

impl<P: PhysicsWorld, C: Channel, S: StatusSink> SyncEngine<P, C, S> {
    pub fn new(config: SyncConfig, viewport: Viewport, physics: P, channel: C, status: S) -> Self {
        Self::with_rng(config, viewport, physics, channel, status, StdRng::from_os_rng())
    }

    /// Same as [`SyncEngine::new`] with a caller-provided generator for the
    /// outbound send draw.
    pub fn with_rng(
        config: SyncConfig,
        viewport: Viewport,
        mut physics: P,
        channel: C,
        mut status: S,
        rng: StdRng,
    ) -> Self {
        physics.set_bounds(viewport.width(), viewport.height());
        status.dimensions(viewport.width(), viewport.height());

        let buffer = InterpolationBuffer::new(
            config.interpolation.buffer_size,
            config.interpolation.delay_ms,
        );
        let movement = MovementController::with_rng(config.movement.clone(), rng);
        let latency = LatencyMonitor::new(config.latency.probe_interval_ms);

        Self {
            config,
            viewport,
            physics,
            channel,
            status,
            local_id: None,
            players: HashMap::new(),
            cheese: None,
            hole: None,
            platforms: Vec::new(),
            pending_shaman: None,
            buffer,
            input: Input::new(),
            movement,
            jump: JumpState::new(),
            objective: ObjectiveDetector::new(),
            latency,
        }
    }

    // ---- accessors ----

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    pub fn local_player(&self) -> Option<&PlayerEntity> {
        self.players.get(self.local_id.as_deref()?)
    }

    /// Local player position in viewport pixels.
    pub fn local_position(&self) -> Option<Vec2> {
        self.physics.position(self.local_player()?.body)
    }

    pub fn is_local_shaman(&self) -> bool {
        self.local_player().is_some_and(|p| p.is_shaman)
    }

    pub fn player(&self, id: &str) -> Option<&PlayerEntity> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerEntity> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn cheese(&self) -> Option<&StaticEntity> {
        self.cheese.as_ref()
    }

    pub fn hole(&self) -> Option<&StaticEntity> {
        self.hole.as_ref()
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn buffer(&self) -> &InterpolationBuffer {
        &self.buffer
    }

    pub fn jump_state(&self) -> &JumpState {
        &self.jump
    }

    pub fn objective(&self) -> &ObjectiveDetector {
        &self.objective
    }

    pub fn latency(&self) -> &LatencyMonitor {
        &self.latency
    }

    fn is_local(&self, id: &str) -> bool {
        self.local_id.as_deref() == Some(id)
    }

    // ---- inbound ----

    /// Parse and apply one raw text frame. A malformed frame is an error for
    /// this call only; engine state is untouched.
    pub fn handle_message(&mut self, data: &[u8], now: f64) -> Result<(), ClientError> {
        let msg = ServerMessage::parse(data)?;
        self.apply(msg, now);
        Ok(())
    }

    pub fn apply(&mut self, msg: ServerMessage, now: f64) {
        trace!("Applying {}", msg.kind());
        match msg {
            ServerMessage::Init {
                player_id,
                game_state,
            } => self.on_init(player_id, game_state),
            ServerMessage::PlayerJoined { player } => self.on_player_joined(&player),
            ServerMessage::PlayerLeft { player_id } => self.on_player_left(&player_id),
            ServerMessage::PlayerMove {
                player_id,
                x,
                y,
                vx,
                vy,
            } => self.on_player_move(&player_id, Vec2::new(x, y), Vec2::new(vx, vy), now),
            ServerMessage::CheeseCollected { player_id } => self.on_cheese_collected(&player_id),
            ServerMessage::PlayerWon { player_id } => self.on_player_won(&player_id),
            ServerMessage::RoundReset { game_state } => self.reset_round(&game_state),
            ServerMessage::PlatformBuilt { platform } => self.add_platform(platform),
            ServerMessage::NewShaman { shaman_id } => self.on_new_shaman(&shaman_id),
            ServerMessage::Pong => self.on_pong(now),
        }
    }

    // ---- fixed step ----

    /// One simulation step: local prediction and reporting, objective checks,
    /// then remote playback.
    pub fn tick(&mut self, now: f64) {
        self.update_local(now);
        self.check_objectives();
        self.update_remotes(now);
    }

    fn update_local(&mut self, now: f64) {
        let Some(body) = self.local_player().map(|p| p.body) else {
            return;
        };
        let (Some(position), Some(velocity)) =
            (self.physics.position(body), self.physics.velocity(body))
        else {
            return;
        };

        let velocity = self.movement.step_velocity(velocity, self.input.direction());
        self.physics.set_velocity(body, velocity);

        if let Some(msg) = self.movement.maybe_report(
            self.channel.is_open(),
            &self.viewport,
            position,
            velocity,
            now,
        ) {
            network::send_or_warn(&mut self.channel, &msg);
        }
    }

    fn check_objectives(&mut self) {
        let Some(local_id) = self.local_id.as_deref() else {
            return;
        };
        let Some(player) = self.players.get_mut(local_id) else {
            return;
        };
        let Some(position) = self.physics.position(player.body) else {
            return;
        };
        let cheese = self.cheese.map(|c| c.viewport_position(&self.viewport));
        let hole = self.hole.map(|h| h.viewport_position(&self.viewport));

        let Some(event) = self.objective.check(
            &self.config.objective,
            position,
            &mut player.has_cheese,
            cheese,
            hole,
        ) else {
            return;
        };

        match event {
            ObjectiveEvent::CollectCheese => {
                self.physics.set_appearance(player.body, player.appearance());
                info!("Cheese collected");
            }
            ObjectiveEvent::ReachHole => info!("Reached the hole"),
        }
        network::send_or_warn(&mut self.channel, &event.message());
    }

    fn update_remotes(&mut self, now: f64) {
        let lerp = self.config.interpolation.lerp_factor;
        for (id, player) in &self.players {
            if self.local_id.as_deref() == Some(id.as_str()) {
                continue;
            }
            let Some(target) = self.buffer.sample_at(id, now) else {
                continue;
            };
            let Some(current) = self.physics.position(player.body) else {
                continue;
            };
            self.physics
                .set_position(player.body, utils::lerp_vec(current, target.position, lerp));
            self.physics.set_velocity(player.body, target.velocity);
        }
    }

    // ---- contacts ----

    /// Feed contact changes from the last physics step into the jump state.
    pub fn on_collisions(&mut self, events: &[CollisionEvent]) {
        let Some(body) = self.local_player().map(|p| p.body) else {
            return;
        };
        for event in events {
            let (pair, started) = match *event {
                CollisionEvent::Start(pair) => (pair, true),
                CollisionEvent::End(pair) => (pair, false),
            };
            let Some(other) = pair.other(body) else {
                continue;
            };
            let Some(surface) = self.physics.kind(other).and_then(surface_of) else {
                continue;
            };

            if !started {
                self.jump.on_contact_end(surface);
                continue;
            }
            let (Some(me), Some(them)) = (self.physics.position(body), self.physics.position(other))
            else {
                continue;
            };
            self.jump.on_contact_start(surface, them.y - me.y, &self.config.jump);
            if let Surface::Wall(side) = surface {
                debug!("Touching {:?} wall, jumps restored", side);
            }
        }
    }

    // ---- input ----

    pub fn key_down(&mut self, key: &str) {
        if !self.input.key_down(key) {
            return;
        }
        if Input::is_jump_key(key) {
            self.perform_jump();
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn touch_start(&mut self, button: TouchButton, now: f64) {
        if self.input.touch_start(button, now) {
            self.perform_jump();
        }
    }

    pub fn touch_end(&mut self, button: TouchButton) {
        self.input.touch_end(button);
    }

    /// Apply a jump to the local player if one is available.
    pub fn perform_jump(&mut self) -> bool {
        let Some(body) = self.local_player().map(|p| p.body) else {
            return false;
        };
        let Some(velocity) = self.physics.velocity(body) else {
            return false;
        };
        match self.jump.jump(velocity, &self.config.jump) {
            Some(velocity) => {
                self.physics.set_velocity(body, velocity);
                debug!("Jump ({}/{})", self.jump.jump_count(), self.config.jump.max_jumps);
                true
            }
            None => false,
        }
    }

    /// Pointer press at a viewport position. Only the shaman builds; returns
    /// whether a request went out.
    pub fn request_platform(&mut self, viewport_pos: Vec2) -> bool {
        if !self.is_local_shaman() {
            return false;
        }
        let pos = self.viewport.to_canonical(viewport_pos);
        let msg = ClientMessage::BuildPlatform {
            x: pos.x,
            y: pos.y,
            width: self.config.objective.platform_width,
            height: self.config.objective.platform_height,
            angle: 0.0,
        };
        let sent = network::send_or_warn(&mut self.channel, &msg);
        if sent {
            debug!("Platform requested at ({:.1}, {:.1})", pos.x, pos.y);
        }
        sent
    }

    // ---- viewport ----

    /// Switch to a new viewport size: dimensions, bounds, every entity, then
    /// the interpolation buffers, in that order. An invalid size changes
    /// nothing.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ClientError> {
        let scale = self.viewport.resize(width, height)?;
        self.physics.set_bounds(width, height);

        for player in self.players.values() {
            if let Some(pos) = self.physics.position(player.body) {
                self.physics.set_position(player.body, pos * scale);
            }
        }
        for sensor in [&self.cheese, &self.hole].into_iter().flatten() {
            self.physics
                .set_position(sensor.body, sensor.viewport_position(&self.viewport));
        }
        for platform in &mut self.platforms {
            self.physics.remove(platform.body);
            platform.body = self.physics.add_platform(
                platform.viewport_position(&self.viewport),
                platform.viewport_size(&self.viewport),
                platform.canonical.angle,
            );
        }

        self.buffer.clear_all();
        self.status.dimensions(width, height);
        info!("Resized to {}x{}", width, height);
        Ok(())
    }

    // ---- channel ----

    pub fn on_channel_open(&mut self) {
        info!("Channel open");
        self.latency.start();
    }

    /// Channel gone: stop probing and tell the user. No reconnect.
    pub fn on_channel_closed(&mut self) {
        info!("Channel closed");
        self.latency.cancel();
        self.input.clear();
        self.status.show_message("Connection lost!");
    }

    /// Periodic probe timer fired.
    pub fn probe_latency(&mut self, now: f64) -> bool {
        match self.latency.probe(now, self.channel.is_open()) {
            Some(msg) => network::send_or_warn(&mut self.channel, &msg),
            None => false,
        }
    }
}

fn surface_of(kind: BodyKind) -> Option<Surface> {
    match kind {
        BodyKind::Ground | BodyKind::Ceiling => Some(Surface::Static),
        BodyKind::Wall(side) => Some(Surface::Wall(side)),
        BodyKind::Platform => Some(Surface::Platform),
        BodyKind::Player | BodyKind::Pickup | BodyKind::Goal => None,
    }
}
