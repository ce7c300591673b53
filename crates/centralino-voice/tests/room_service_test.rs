use centralino_voice::{RoomConfig, RoomService};

const DEFAULT_URL: &str = "http://localhost:7880";
const DEFAULT_KEY: &str = "devkey";
const DEFAULT_SECRET: &str = "secret";

#[tokio::test]
async fn test_generate_join_token() {
    let config = RoomConfig::new(DEFAULT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    let service = RoomService::new(config);

    let token = service
        .generate_join_token("test-room", "caller-123", "Test Caller")
        .expect("Failed to generate token");

    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_token_permissions() {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde::Deserialize;

    let config = RoomConfig::new(DEFAULT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    let service = RoomService::new(config);

    let token = service
        .generate_join_token("perm-room", "caller-perm", "Perm Caller")
        .expect("Failed to generate token");

    #[derive(Deserialize)]
    struct Claims {
        video: VideoClaims,
    }

    #[derive(Deserialize)]
    struct VideoClaims {
        #[serde(rename = "canPublish")]
        can_publish: bool,
        #[serde(rename = "canSubscribe")]
        can_subscribe: bool,
        #[serde(rename = "roomJoin")]
        room_join: bool,
    }

    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(DEFAULT_SECRET.as_bytes());
    let token_data = decode::<Claims>(&token, &key, &validation).expect("Failed to decode token");

    assert!(
        token_data.claims.video.can_publish,
        "canPublish should be true"
    );
    assert!(
        token_data.claims.video.can_subscribe,
        "canSubscribe should be true"
    );
    assert!(token_data.claims.video.room_join, "roomJoin should be true");
}

#[test]
fn test_room_config_from_toml() {
    let toml_str = r#"
        url = "ws://localhost:7880"
        api_key = "key"
        api_secret = "secret"
        room_name = "support-line"
        agent_identity = "desk-agent"
    "#;

    let config: RoomConfig = toml::from_str(toml_str).expect("parse TOML");
    assert_eq!(config.room_name, "support-line");
    assert_eq!(config.agent_identity, "desk-agent");
    assert_eq!(config.token_ttl_seconds, 3600, "TTL should default");
}

#[test]
fn test_room_config_defaults() {
    let toml_str = r#"
        url = "ws://localhost:7880"
        api_key = "key"
        api_secret = "secret"
    "#;

    let config: RoomConfig = toml::from_str(toml_str).expect("parse TOML");
    assert_eq!(config.room_name, "centralino-call");
    assert_eq!(config.agent_identity, "centralino-agent");
}

#[test]
fn test_debug_redacts_secret() {
    let config = RoomConfig::new(DEFAULT_URL, DEFAULT_KEY, "super-secret-value");
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("super-secret-value"));
    assert!(rendered.contains("[REDACTED]"));
}

#[test]
fn test_service_accessors() {
    let mut config = RoomConfig::new(DEFAULT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    config.room_name = "line-1".into();
    let service = RoomService::new(config);

    assert!(service.is_enabled());
    assert_eq!(service.get_url(), DEFAULT_URL);
    assert_eq!(service.room_name(), "line-1");
    assert_eq!(service.agent_identity(), "centralino-agent");
}
