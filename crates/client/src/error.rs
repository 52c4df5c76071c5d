// Client error types.
use protocol::ProtocolError;
use thiserror::Error;

/// Errors surfaced by the sync core.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Channel is closed")]
    ChannelClosed,

    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}
