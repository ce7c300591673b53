//! Shared domain types for the Centralino platform.
//!
//! Centralino is a voice-call customer-service agent for a gas and
//! electricity supplier. The types here cross crate boundaries: the
//! intent taxonomy used to compose the system prompt, and the payload
//! the speech model hands to the summary tool.

pub mod intent;
pub mod summary;

pub use intent::{Intent, ParseIntentError};
pub use summary::SummaryRequest;
