//! Speech-to-speech model session for the Centralino agent.
//!
//! The heavy lifting — voice activity detection, turn taking, speech
//! synthesis — happens inside the hosted realtime model. This crate holds the
//! websocket leg of that arrangement: it opens the session, pushes the fixed
//! configuration (voice, temperature, turn-detection thresholds, system
//! instructions), streams caller audio up, fans model events out, and routes
//! the model's function calls through a local tool registry.

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod tools;

pub use config::{SessionConfig, TurnDetection};
pub use error::RealtimeError;
pub use session::{RealtimeSession, SessionEvent, SessionHandle};
pub use tools::{ToolError, ToolRegistry};
