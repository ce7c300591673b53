//! Realtime session configuration.
//!
//! Everything here is pushed to the model verbatim in the `session.update`
//! payload; nothing is interpreted locally.

use crate::tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn default_model() -> String {
    "gpt-realtime".to_string()
}

fn default_voice() -> String {
    "shimmer".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_modalities() -> Vec<String> {
    vec!["audio".to_string(), "text".to_string()]
}

fn default_audio_format() -> String {
    "pcm16".to_string()
}

fn default_prefix_padding_ms() -> u32 {
    750
}

/// Server-side voice-activity turn detection.
///
/// The thresholds are hints to the model provider; detection itself runs
/// remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnDetection {
    /// Detection mode. Only `server_vad` is used by this product.
    #[serde(rename = "type")]
    pub kind: String,
    /// Milliseconds of audio kept before detected speech onset.
    #[serde(default = "default_prefix_padding_ms")]
    pub prefix_padding_ms: u32,
    /// Milliseconds of silence that close a caller turn, if overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence_duration_ms: Option<u32>,
    /// Activation threshold (0.0 to 1.0), if overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
}

impl Default for TurnDetection {
    fn default() -> Self {
        Self {
            kind: "server_vad".to_string(),
            prefix_padding_ms: default_prefix_padding_ms(),
            silence_duration_ms: None,
            threshold: None,
        }
    }
}

/// Fixed configuration for a realtime model session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_modalities")]
    pub modalities: Vec<String>,
    /// Free-text system instructions for the operator persona.
    #[serde(default)]
    pub instructions: String,
    #[serde(default = "default_audio_format")]
    pub input_audio_format: String,
    #[serde(default = "default_audio_format")]
    pub output_audio_format: String,
    #[serde(default)]
    pub turn_detection: TurnDetection,
    /// Websocket endpoint override; the default points at the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            voice: default_voice(),
            temperature: default_temperature(),
            modalities: default_modalities(),
            instructions: String::new(),
            input_audio_format: default_audio_format(),
            output_audio_format: default_audio_format(),
            turn_detection: TurnDetection::default(),
            endpoint: None,
        }
    }
}

impl SessionConfig {
    /// The websocket URL the session connects to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!("wss://api.openai.com/v1/realtime?model={}", self.model),
        }
    }

    /// Builds the `session.update` event sent right after connecting.
    pub fn session_update(&self, tools: &ToolRegistry) -> Value {
        json!({
            "type": "session.update",
            "session": {
                "model": self.model,
                "instructions": self.instructions,
                "voice": self.voice,
                "temperature": self.temperature,
                "modalities": self.modalities,
                "input_audio_format": self.input_audio_format,
                "output_audio_format": self.output_audio_format,
                "turn_detection": self.turn_detection,
                "tools": tools.schemas(),
            }
        })
    }
}
