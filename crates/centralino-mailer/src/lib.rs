//! Transactional email delivery via Mailgun.
//!
//! One call: submit a message to the Mailgun messages endpoint and hand back
//! the provider's acknowledgment. Delivery, retries, and bounce handling are
//! all Mailgun's problem; nothing here queues or recovers.

pub mod client;
pub mod config;
pub mod error;

pub use client::{MailgunClient, Message, SendResponse};
pub use config::MailerConfig;
pub use error::MailerError;
