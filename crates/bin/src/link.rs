//! Transport glue: the engine's channel and status sink for a WebSocket bot.

use client::error::ClientError;
use client::latency::LatencyQuality;
use client::ui::{self, Role};
use client::{Channel, StatusSink};
use protocol::ClientMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};

/// Outbound half of the WebSocket. Text frames are queued for the writer
/// task, which owns the sink.
pub struct WsChannel {
    tx: mpsc::UnboundedSender<Message>,
    open: bool,
}

impl WsChannel {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx, open: true }
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

impl Channel for WsChannel {
    fn is_open(&self) -> bool {
        self.open && !self.tx.is_closed()
    }

    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        if !self.open {
            return Err(ClientError::ChannelClosed);
        }
        let frame = Message::text(msg.encode()?);
        self.tx.send(frame).map_err(|_| ClientError::ChannelClosed)
    }
}

/// Status sink that reports through the log.
#[derive(Debug, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn player_id(&mut self, id: &str) {
        info!("{}", ui::format_player_id(id));
    }

    fn role(&mut self, role: Role) {
        info!("Role: {}", role.label());
    }

    fn player_count(&mut self, count: usize) {
        info!("Players: {}", count);
    }

    fn latency(&mut self, ms: f64, quality: LatencyQuality) {
        debug!("Latency: {}", ui::format_latency(ms, quality));
    }

    fn dimensions(&mut self, width: f32, height: f32) {
        info!("Viewport: {}x{}", width, height);
    }

    fn show_message(&mut self, text: &str) {
        info!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_queues_json_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut channel = WsChannel::new(tx);
        assert!(channel.is_open());
        channel.send(&ClientMessage::Ping).unwrap();
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame, Message::text(r#"{"type":"ping"}"#));

        channel.close();
        assert!(!channel.is_open());
        assert!(matches!(
            channel.send(&ClientMessage::Ping),
            Err(ClientError::ChannelClosed)
        ));
    }

    #[test]
    fn test_dropped_writer_closes_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut channel = WsChannel::new(tx);
        drop(rx);
        assert!(!channel.is_open());
        assert!(channel.send(&ClientMessage::Ping).is_err());
    }
}
