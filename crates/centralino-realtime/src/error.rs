use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("handshake error: {0}")]
    Handshake(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session command channel closed")]
    ChannelClosed,
}
