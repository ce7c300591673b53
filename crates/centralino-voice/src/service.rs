use crate::config::RoomConfig;
use crate::error::RoomError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use livekit_protocol::{ParticipantInfo, Room};
use std::time::Duration;
use tracing::info;

/// Default interval between participant polls while waiting for a caller.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct RoomService {
    config: RoomConfig,
    room_client: RoomClient,
}

impl RoomService {
    pub fn new(config: RoomConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    pub fn room_name(&self) -> &str {
        &self.config.room_name
    }

    pub fn agent_identity(&self) -> &str {
        &self.config.agent_identity
    }

    /// Creates the call room. LiveKit treats creation of an existing room as
    /// a no-op, so this is safe to call on every worker start.
    pub async fn ensure_room(&self, name: &str) -> Result<Room, RoomError> {
        let options = CreateRoomOptions::default();

        self.room_client
            .create_room(name, options)
            .await
            .map_err(|e| RoomError::RoomService(e.to_string()))
    }

    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, RoomError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(RoomError::LiveKit)
    }

    pub async fn remove_participant(&self, room: &str, identity: &str) -> Result<(), RoomError> {
        self.room_client
            .remove_participant(room, identity)
            .await
            .map_err(|e| RoomError::RoomService(e.to_string()))
    }

    /// Returns the number of participants currently in a room.
    /// Returns 0 if the room does not exist.
    pub async fn participant_count(&self, room_name: &str) -> Result<u32, RoomError> {
        match self.room_client.list_participants(room_name).await {
            Ok(participants) => Ok(participants.len() as u32),
            Err(_) => Ok(0), // Room doesn't exist yet
        }
    }

    /// Returns the first participant in the room whose identity differs from
    /// the agent's, if any.
    async fn find_caller(&self, room_name: &str) -> Result<Option<ParticipantInfo>, RoomError> {
        let participants = match self.room_client.list_participants(room_name).await {
            Ok(participants) => participants,
            Err(_) => return Ok(None), // Room doesn't exist yet
        };

        Ok(participants
            .into_iter()
            .find(|p| p.identity != self.config.agent_identity))
    }

    /// Whether a caller (any non-agent identity) is currently in the room.
    pub async fn caller_present(&self, room_name: &str) -> Result<bool, RoomError> {
        Ok(self.find_caller(room_name).await?.is_some())
    }

    /// Blocks until a caller joins the room, polling the room service.
    ///
    /// The agent's own identity is excluded. With `timeout = None` this waits
    /// indefinitely; otherwise a [`RoomError::ParticipantTimeout`] is returned
    /// once the deadline passes.
    pub async fn wait_for_participant(
        &self,
        room_name: &str,
        timeout: Option<Duration>,
    ) -> Result<ParticipantInfo, RoomError> {
        info!(room = room_name, "waiting for participant");

        let started = tokio::time::Instant::now();
        loop {
            if let Some(caller) = self.find_caller(room_name).await? {
                info!(
                    room = room_name,
                    identity = %caller.identity,
                    "participant joined"
                );
                return Ok(caller);
            }

            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    return Err(RoomError::ParticipantTimeout {
                        room: room_name.to_string(),
                        waited_secs: limit.as_secs(),
                    });
                }
            }

            tokio::time::sleep(DEFAULT_POLL_INTERVAL).await;
        }
    }
}
