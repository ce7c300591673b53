use serde::{Deserialize, Serialize};
use std::fmt;

fn default_token_ttl_seconds() -> u64 {
    3600
}

fn default_room_name() -> String {
    "centralino-call".to_string()
}

fn default_agent_identity() -> String {
    "centralino-agent".to_string()
}

/// LiveKit connection settings for the call room.
#[derive(Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub url: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// Name of the room the agent joins to take calls.
    #[serde(default = "default_room_name")]
    pub room_name: String,
    /// Identity the agent publishes under; everyone else in the room is a caller.
    #[serde(default = "default_agent_identity")]
    pub agent_identity: String,
    /// JWT token TTL in seconds for LiveKit join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            room_name: default_room_name(),
            agent_identity: default_agent_identity(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for RoomConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("room_name", &self.room_name)
            .field("agent_identity", &self.agent_identity)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl RoomConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            ..Self::default()
        }
    }
}
