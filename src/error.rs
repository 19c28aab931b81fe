//! Error types for the session driver.

use thiserror::Error;

/// Anything that can end or degrade a session.
#[derive(Debug, Error)]
pub enum BotError {
    /// Websocket failures terminate the session.
    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// An outbound frame failed to encode.
    #[error("failed to encode outbound frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// Hand history persistence failed.
    #[error("hand log write failed: {0}")]
    HandLog(#[from] std::io::Error),
}
