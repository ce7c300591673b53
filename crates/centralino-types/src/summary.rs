//! Payload of the `send_summary` tool call.

use serde::{Deserialize, Serialize};

/// Arguments the speech model supplies when invoking `send_summary`.
///
/// Both fields are free text. The intent is usually one of the canonical
/// labels from [`crate::Intent`], but the contract is deliberately loose:
/// whatever the model sends is forwarded into the recap email unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// The customer call intent.
    #[serde(default)]
    pub intent: String,
    /// Required keys/values collected to handle the intent.
    #[serde(default)]
    pub data: String,
}

impl SummaryRequest {
    pub fn new(intent: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            data: data.into(),
        }
    }
}
