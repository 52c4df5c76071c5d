// Outbound message channel
use protocol::ClientMessage;
use tracing::warn;

use crate::error::ClientError;

/// Bidirectional message channel, outbound half. Inbound frames are pushed
/// into the engine by whoever owns the transport.
pub trait Channel {
    fn is_open(&self) -> bool;

    /// Queue one message. Delivery is in order and at most once.
    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError>;
}

/// Send and drop on failure. Sends are never retried; the next tick or probe
/// produces fresh state anyway.
pub fn send_or_warn<C: Channel + ?Sized>(channel: &mut C, msg: &ClientMessage) -> bool {
    if !channel.is_open() {
        return false;
    }
    match channel.send(msg) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to send {}: {}", msg.kind(), e);
            false
        }
    }
}

/// Channel that records everything it is asked to send.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub open: bool,
    pub sent: Vec<ClientMessage>,
}

#[cfg(test)]
impl RecordingChannel {
    pub fn open() -> Self {
        Self {
            open: true,
            sent: Vec::new(),
        }
    }

    /// Drain recorded messages.
    pub fn take(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.sent)
    }

    pub fn count(&self, kind: &str) -> usize {
        self.sent.iter().filter(|m| m.kind() == kind).count()
    }
}

#[cfg(test)]
impl Channel for RecordingChannel {
    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        if !self.open {
            return Err(ClientError::ChannelClosed);
        }
        self.sent.push(msg.clone());
        Ok(())
    }
}
