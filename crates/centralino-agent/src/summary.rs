//! The `send_summary` tool.
//!
//! The one behavior in this worker that resembles a function with a
//! contract: given the model's `{intent, data}` payload, send exactly one
//! recap email through Mailgun and return the provider's acknowledgment to
//! the model. Fixed recipient, fixed sender, fixed subject; the intent and
//! data strings land in the body unmodified. No retry, no validation.

use centralino_mailer::{MailerError, MailgunClient, Message, SendResponse};
use centralino_realtime::{ToolError, ToolRegistry};
use centralino_types::SummaryRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Tool name declared to the model.
pub const SEND_SUMMARY_TOOL: &str = "send_summary";

/// Fixed subject of the recap email.
pub const RECAP_SUBJECT: &str = "Recap della tua richiesta";

/// Builds the recap email for a summary request.
pub fn recap_message(request: &SummaryRequest) -> Message {
    Message {
        subject: RECAP_SUBJECT.to_string(),
        text: format!(
            "Questo è il recap della tua richiesta\nIntent: {}\nData: {}",
            request.intent, request.data
        ),
        html: format!(
            "<h1>Questo è il recap della tua richiesta!</h1>\
             <p>Intent: {}</p>\
             <p>Data: {}</p>",
            request.intent, request.data
        ),
    }
}

/// Sends the recap email and returns Mailgun's acknowledgment.
pub async fn send_recap(
    client: &MailgunClient,
    request: &SummaryRequest,
) -> Result<SendResponse, MailerError> {
    info!(intent = %request.intent, "sending summary e-mail");
    client.send(&recap_message(request)).await
}

/// JSON schema for the tool parameters, as declared to the model.
pub fn parameters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "intent": {
                "type": "string",
                "description": "The customer call intent"
            },
            "data": {
                "type": "string",
                "description": "Required keys/values to handle the intent"
            }
        },
        "required": ["intent", "data"]
    })
}

/// Registers `send_summary` on the session's tool registry.
pub fn register(registry: &mut ToolRegistry, client: Arc<MailgunClient>) {
    registry.register(
        SEND_SUMMARY_TOOL,
        "On end call, send a summary e-mail with the collected data",
        parameters_schema(),
        move |args| {
            let client = client.clone();
            async move {
                // The payload is free-form by contract; decode tolerantly.
                let request: SummaryRequest =
                    serde_json::from_value(args).unwrap_or_default();
                if request.intent.is_empty() {
                    warn!("summary request without an intent label");
                }

                let ack = send_recap(&client, &request).await.map_err(|e| {
                    ToolError::Failed {
                        name: SEND_SUMMARY_TOOL.to_string(),
                        message: e.to_string(),
                    }
                })?;

                Ok(json!({"message": ack.message}))
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recap_has_fixed_subject_and_literal_payload() {
        let request = SummaryRequest::new(
            "voltura",
            "indirizzo_abitazione: Via Roma 1, nome_cedente: M. Rossi",
        );
        let message = recap_message(&request);

        assert_eq!(message.subject, RECAP_SUBJECT);
        assert!(message.text.contains("Intent: voltura"));
        assert!(message.text.contains("nome_cedente: M. Rossi"));
        assert!(message.html.contains("<p>Intent: voltura</p>"));
        assert!(message.html.contains("Via Roma 1"));
    }

    #[test]
    fn recap_passes_through_unrecognized_intents() {
        // The tool boundary is unvalidated: unknown labels flow straight in.
        let request = SummaryRequest::new("disdetta", "qualcosa");
        let message = recap_message(&request);
        assert!(message.text.contains("Intent: disdetta"));
    }

    #[test]
    fn schema_declares_both_string_fields() {
        let schema = parameters_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["intent"]["type"], "string");
        assert_eq!(schema["properties"]["data"]["type"], "string");
        assert_eq!(schema["required"], json!(["intent", "data"]));
    }
}
