//! Status endpoint served next to the call loop.
//!
//! Load balancers and CI hit `/health` to verify the worker is up; the
//! payload also reports which phase of the call the worker is in.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

/// Phase of the worker's single call-handling flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Starting,
    WaitingForParticipant,
    InCall,
    ShuttingDown,
}

#[derive(Debug, Clone)]
pub struct AgentStatus {
    pub phase: Phase,
    pub room: String,
}

pub type SharedStatus = Arc<RwLock<AgentStatus>>;

pub fn shared_status(room: impl Into<String>) -> SharedStatus {
    Arc::new(RwLock::new(AgentStatus {
        phase: Phase::Starting,
        room: room.into(),
    }))
}

pub fn set_phase(status: &SharedStatus, phase: Phase) {
    if let Ok(mut guard) = status.write() {
        guard.phase = phase;
    }
}

/// Health check handler.
///
/// Returns `200 OK` with worker status and version.
async fn health(State(status): State<SharedStatus>) -> Json<Value> {
    let (phase, room) = {
        let guard = status.read().expect("status lock poisoned");
        (guard.phase, guard.room.clone())
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "phase": phase,
        "room": room,
    }))
}

/// Builds the status router.
pub fn app(status: SharedStatus) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_returns_ok() {
        let status = shared_status("support-line");
        set_phase(&status, Phase::WaitingForParticipant);
        let app = app(status);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["phase"], "waiting-for-participant");
        assert_eq!(json["room"], "support-line");
    }
}
