//! Worker configuration loading from file and environment variables.

use centralino_mailer::MailerConfig;
use centralino_realtime::SessionConfig;
use centralino_voice::RoomConfig;
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level worker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// LiveKit room settings.
    #[serde(default)]
    pub livekit: RoomConfig,

    /// Speech model settings.
    #[serde(default)]
    pub realtime: RealtimeSettings,

    /// Mailgun settings for the recap email.
    #[serde(default)]
    pub mailgun: MailerConfig,

    /// Status endpoint settings.
    #[serde(default)]
    pub status: StatusConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the hosted speech-to-speech model.
#[derive(Clone, Deserialize)]
pub struct RealtimeSettings {
    /// Provider API key. Usually supplied via `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl RealtimeSettings {
    /// Builds the fixed session configuration with the given instructions.
    pub fn session_config(&self, instructions: String) -> SessionConfig {
        SessionConfig {
            model: self.model.clone(),
            voice: self.voice.clone(),
            temperature: self.temperature,
            instructions,
            ..SessionConfig::default()
        }
    }
}

impl fmt::Debug for RealtimeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeSettings")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Network configuration for the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "centralino_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_model() -> String {
    "gpt-realtime".to_string()
}

fn default_voice() -> String {
    "shimmer".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8089
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            voice: default_voice(),
            temperature: default_temperature(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `LIVEKIT_URL` overrides `livekit.url`
/// - `LIVEKIT_API_KEY` overrides `livekit.api_key`
/// - `LIVEKIT_API_SECRET` overrides `livekit.api_secret`
/// - `OPENAI_API_KEY` overrides `realtime.api_key`
/// - `MAILGUN_API_KEY` overrides `mailgun.api_key`
/// - `MAILGUN_DOMAIN` overrides `mailgun.domain`
/// - `CENTRALINO_ROOM` overrides `livekit.room_name`
/// - `CENTRALINO_LOG_LEVEL` overrides `logging.level`
/// - `CENTRALINO_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(url) = std::env::var("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Ok(key) = std::env::var("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Ok(secret) = std::env::var("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        config.realtime.api_key = key;
    }
    if let Ok(key) = std::env::var("MAILGUN_API_KEY") {
        config.mailgun.api_key = key;
    }
    if let Ok(domain) = std::env::var("MAILGUN_DOMAIN") {
        config.mailgun.domain = domain;
    }
    if let Ok(room) = std::env::var("CENTRALINO_ROOM") {
        config.livekit.room_name = room;
    }
    if let Ok(level) = std::env::var("CENTRALINO_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("CENTRALINO_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

/// Resolves the configuration file path from the CLI argument or
/// `CENTRALINO_CONFIG_PATH`, reporting where the value came from.
pub fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("CENTRALINO_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_file_missing() {
        let config = load_config(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.realtime.model, "gpt-realtime");
        assert_eq!(config.realtime.voice, "shimmer");
        assert_eq!(config.livekit.room_name, "centralino-call");
        assert_eq!(config.status.port, 8089);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn loads_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [livekit]
            url = "wss://livekit.example.com"
            api_key = "lk-key"
            api_secret = "lk-secret"
            room_name = "support-line"

            [realtime]
            voice = "alloy"
            temperature = 0.6

            [mailgun]
            api_key = "mg-key"
            domain = "sandbox.mailgun.org"
            from = "Assistente <mailgun@sandbox.mailgun.org>"
            to = "desk@example.com"

            [logging]
            level = "debug"
            json = true
            "#
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.livekit.url, "wss://livekit.example.com");
        assert_eq!(config.livekit.room_name, "support-line");
        assert_eq!(config.realtime.voice, "alloy");
        assert_eq!(config.realtime.temperature, 0.6);
        assert_eq!(config.realtime.model, "gpt-realtime", "model defaults");
        assert_eq!(config.mailgun.domain, "sandbox.mailgun.org");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_error_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not valid toml [[[").unwrap();
        let err = load_config(file.path().to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn session_config_carries_settings() {
        let settings = RealtimeSettings {
            api_key: "sk-test".into(),
            model: "gpt-realtime".into(),
            voice: "shimmer".into(),
            temperature: 0.7,
        };
        let session = settings.session_config("Sei un operatore.".into());
        assert_eq!(session.voice, "shimmer");
        assert_eq!(session.temperature, 0.7);
        assert_eq!(session.instructions, "Sei un operatore.");
        assert_eq!(session.turn_detection.prefix_padding_ms, 750);
    }

    #[test]
    fn debug_redacts_realtime_api_key() {
        let settings = RealtimeSettings {
            api_key: "sk-very-secret".into(),
            ..RealtimeSettings::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
