//! LiveKit room infrastructure for the Centralino agent.
//!
//! The agent never implements audio transport itself: LiveKit owns the room,
//! the WebRTC plumbing, and participant lifecycle. This crate wraps the
//! LiveKit server SDK for the pieces the worker needs — creating the call
//! room, minting join tokens, waiting for the caller to show up — plus the
//! agent's own leg in the room as a thin client facade.

pub mod agent;
pub mod config;
pub mod error;
pub mod service;

pub use agent::{RoomAgentClient, RoomAudioFrame};
pub use config::RoomConfig;
pub use error::RoomError;
pub use service::RoomService;
