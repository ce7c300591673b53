//! Decoding of server events arriving on the session websocket.
//!
//! The provider streams JSON events tagged by a `type` field. Only the events
//! the agent reacts to are decoded; everything else passes through as
//! [`ServerEvent::Other`] and is logged at trace level by the session loop.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use serde_json::Value;

/// A decoded server event.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    SessionCreated,
    SessionUpdated,
    /// A chunk of model speech, already base64-decoded to PCM bytes.
    AudioDelta(Vec<u8>),
    /// Incremental transcript of the model's speech.
    AssistantTranscriptDelta(String),
    /// Final transcript of the caller's last turn.
    CallerTranscript(String),
    SpeechStarted,
    SpeechStopped,
    /// The model finished streaming a function call's arguments.
    FunctionCall {
        name: String,
        call_id: String,
        arguments: Value,
    },
    ResponseDone,
    Error(String),
    /// An event type the agent does not act on.
    Other(String),
}

/// Decodes one websocket text frame into a [`ServerEvent`].
pub fn parse_server_event(text: &str) -> Result<ServerEvent, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value.get("type").and_then(Value::as_str).unwrap_or("");

    let event = match kind {
        "session.created" => ServerEvent::SessionCreated,
        "session.updated" => ServerEvent::SessionUpdated,
        "response.audio.delta" => {
            // Older event shapes carry the payload under "audio".
            let b64 = value
                .get("delta")
                .and_then(Value::as_str)
                .or_else(|| value.get("audio").and_then(Value::as_str))
                .unwrap_or("");
            let pcm = B64.decode(b64).unwrap_or_default();
            ServerEvent::AudioDelta(pcm)
        }
        "response.audio_transcript.delta" | "response.text.delta" => {
            let delta = value
                .get("delta")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            ServerEvent::AssistantTranscriptDelta(delta)
        }
        "conversation.item.input_audio_transcription.completed" => {
            let transcript = value
                .get("transcript")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            ServerEvent::CallerTranscript(transcript)
        }
        "input_audio_buffer.speech_started" => ServerEvent::SpeechStarted,
        "input_audio_buffer.speech_stopped" => ServerEvent::SpeechStopped,
        "response.function_call_arguments.done" => {
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            let call_id = value
                .get("call_id")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            // Arguments arrive as a JSON string; an undecodable one becomes
            // an empty object so the tool still sees a call.
            let raw = value.get("arguments").and_then(Value::as_str).unwrap_or("{}");
            let arguments =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Default::default()));
            ServerEvent::FunctionCall {
                name,
                call_id,
                arguments,
            }
        }
        "response.done" => ServerEvent::ResponseDone,
        "error" => {
            let message = value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .or_else(|| value.get("message").and_then(Value::as_str))
                .unwrap_or("unknown realtime error")
                .to_string();
            ServerEvent::Error(message)
        }
        other => ServerEvent::Other(other.to_string()),
    };

    Ok(event)
}
