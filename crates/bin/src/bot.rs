//! Headless shaman-run client.
//!
//! Connects to a game server, runs the sync core against the arena physics at
//! a fixed tick rate and optionally steers the local player on its own.

use std::time::Duration;

use anyhow::Context;
use client::world::ArenaPhysics;
use client::{utils, SyncEngine, Viewport};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod autopilot;
mod config;
mod link;

use autopilot::Autopilot;
use link::{LogStatus, WsChannel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("shaman-bot v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::load()?;
    info!("Loaded configuration");
    info!("  Server: {}", config.server.url);
    info!("  Tick rate: {} Hz", config.server.tick_rate_hz);
    info!(
        "  Viewport: {}x{}",
        config.server.viewport_width, config.server.viewport_height
    );

    let (ws_stream, _) = connect_async(config.server.url.as_str())
        .await
        .with_context(|| format!("failed to connect to {}", config.server.url))?;
    info!("Connected to {}", config.server.url);

    let (mut write, mut read) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = write.send(frame).await {
                warn!("Failed to send frame: {}", e);
                break;
            }
        }
        if let Err(e) = write.close().await {
            debug!("Failed to close socket: {}", e);
        }
    });

    let viewport = Viewport::new(config.server.viewport_width, config.server.viewport_height)?;
    let physics = ArenaPhysics::new(viewport.width(), viewport.height());
    let mut engine = SyncEngine::new(
        config.sync.clone(),
        viewport,
        physics,
        WsChannel::new(tx),
        LogStatus,
    );
    engine.on_channel_open();

    let mut pilot = config.server.autopilot.then(Autopilot::new);

    let mut ticker = interval(Duration::from_millis(config.server.tick_ms()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let probe = Duration::from_millis(engine.latency().interval_ms());
    let mut prober = interval_at(Instant::now() + probe, probe);
    prober.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = engine.handle_message(text.as_bytes(), utils::now()) {
                            warn!("Ignoring message: {}", e);
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        if let Err(e) = engine.handle_message(&data, utils::now()) {
                            warn!("Ignoring message: {}", e);
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        info!("Server closed the connection: {:?}", frame);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
            _ = ticker.tick() => {
                let now = utils::now();
                if let Some(pilot) = pilot.as_mut() {
                    pilot.drive(&mut engine, now);
                }
                engine.tick(now);
                let events = engine.physics_mut().step();
                engine.on_collisions(&events);
            }
            _ = prober.tick() => {
                if engine.probe_latency(utils::now()) {
                    debug!("Latency probe sent");
                }
            }
        }
    }

    engine.channel_mut().close();
    engine.on_channel_closed();
    drop(engine);
    if let Err(e) = writer.await {
        debug!("Writer task ended abnormally: {}", e);
    }

    info!("Disconnected");
    Ok(())
}
