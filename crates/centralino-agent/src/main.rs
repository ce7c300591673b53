//! Centralino worker binary — the entry point for the voice agent.
//!
//! One call-handling flow per process: join the LiveKit room, wait for a
//! caller, start the realtime model session with the fixed operator
//! configuration and the `send_summary` tool, trigger the greeting, then
//! bridge audio until the caller leaves or the process is signalled.

use centralino_agent::status::{self, Phase};
use centralino_agent::{config, instructions, summary};
use centralino_mailer::MailgunClient;
use centralino_realtime::{RealtimeSession, SessionEvent, ToolRegistry};
use centralino_voice::{RoomAgentClient, RoomService};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// Interval between checks that the caller is still in the room.
const CALLER_WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = config::resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the worker cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let room_name = config.livekit.room_name.clone();
    let agent_identity = config.livekit.agent_identity.clone();

    // Status endpoint
    let shared = status::shared_status(&room_name);
    let status_addr = SocketAddr::new(config.status.host, config.status.port);
    let status_app = status::app(shared.clone());
    let status_listener = TcpListener::bind(status_addr)
        .await
        .expect("failed to bind status endpoint — is another process using this port?");
    tracing::info!(%status_addr, "serving status endpoint");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(status_listener, status_app).await {
            tracing::error!("status endpoint error: {}", e);
        }
    });

    // Room setup
    let room_service = RoomService::new(config.livekit.clone());
    room_service
        .ensure_room(&room_name)
        .await
        .expect("failed to create call room — check livekit settings in config");

    let token = room_service
        .generate_join_token(&room_name, &agent_identity, "Centralino")
        .expect("failed to mint agent join token");

    let room_client = Arc::new(
        RoomAgentClient::connect(room_service.get_url(), &token, &room_name)
            .await
            .expect("failed to join call room"),
    );

    // Await the caller
    status::set_phase(&shared, Phase::WaitingForParticipant);
    let participant = tokio::select! {
        participant = room_service.wait_for_participant(&room_name, None) => {
            participant.expect("failed while waiting for a caller")
        }
        () = shutdown_signal() => {
            tracing::info!("shut down before any caller joined");
            return;
        }
    };

    tracing::info!(
        identity = %participant.identity,
        room = %room_name,
        "starting assistant session for participant"
    );
    status::set_phase(&shared, Phase::InCall);

    // The one declared tool: send_summary -> Mailgun
    let mailer = Arc::new(
        MailgunClient::new(config.mailgun.clone())
            .expect("invalid mailgun settings — check mailgun section in config"),
    );
    let mut registry = ToolRegistry::new();
    summary::register(&mut registry, mailer);

    // Model session
    let session_config = config
        .realtime
        .session_config(instructions::system_prompt());
    let (session, handle) = RealtimeSession::connect(&session_config, &config.realtime.api_key, registry)
        .await
        .expect("failed to connect realtime session");
    let mut session_task = tokio::spawn(session.run());

    // Caller audio -> model
    let mut room_audio = room_client.subscribe_audio();
    let uplink = handle.clone();
    tokio::spawn(async move {
        loop {
            match room_audio.recv().await {
                Ok(frame) => {
                    if uplink.append_audio(frame.pcm).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "caller audio lagged, frames dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Model events -> room
    let mut events = handle.subscribe();
    let publisher = room_client.clone();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::AssistantAudio(pcm)) => {
                    if publisher.publish_audio(&pcm).await.is_err() {
                        break;
                    }
                }
                Ok(SessionEvent::AssistantTranscript(text)) => {
                    tracing::info!(transcript = %text, "assistant turn");
                }
                Ok(SessionEvent::CallerTranscript(text)) => {
                    tracing::info!(transcript = %text, "caller turn");
                }
                Ok(SessionEvent::ToolCompleted { name }) => {
                    tracing::info!(tool = %name, "tool completed");
                }
                Ok(SessionEvent::Error(message)) => {
                    tracing::warn!(error = %message, "session reported an error");
                }
                Ok(SessionEvent::Closed) => break,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session events lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Greet the caller without waiting for speech
    handle
        .create_response()
        .await
        .expect("failed to trigger the model's first response");

    // Run until the caller leaves, the session ends, or we are signalled
    tokio::select! {
        () = watch_caller(&room_service, &room_name) => {
            tracing::info!("caller left the room, ending call");
        }
        result = &mut session_task => {
            match result {
                Ok(Ok(())) => tracing::info!("realtime session finished"),
                Ok(Err(e)) => tracing::error!("realtime session failed: {}", e),
                Err(e) => tracing::error!("realtime session task panicked: {}", e),
            }
        }
        () = shutdown_signal() => {}
    }

    // Teardown
    status::set_phase(&shared, Phase::ShuttingDown);
    let _ = handle.close().await;
    if !session_task.is_finished() {
        let _ = session_task.await;
    }
    room_client.disconnect().await;

    tracing::info!("centralino worker shut down");
}

/// Completes when no caller remains in the room.
async fn watch_caller(service: &RoomService, room_name: &str) {
    loop {
        tokio::time::sleep(CALLER_WATCH_INTERVAL).await;
        match service.caller_present(room_name).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::warn!("caller presence check failed: {}", e);
            }
        }
    }
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
