//! Centralino worker library logic.
//!
//! The binary in `main.rs` wires these pieces together: configuration,
//! the operator system prompt, the `send_summary` tool, and the status
//! endpoint served next to the call loop.

pub mod config;
pub mod instructions;
pub mod status;
pub mod summary;
