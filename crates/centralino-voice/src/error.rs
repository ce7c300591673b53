use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomError {
    #[error("LiveKit API error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    #[error("Room service error: {0}")]
    RoomService(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No participant joined room '{room}' within {waited_secs}s")]
    ParticipantTimeout { room: String, waited_secs: u64 },
}
