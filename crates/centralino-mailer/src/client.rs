use crate::config::MailerConfig;
use crate::error::MailerError;
use serde::Deserialize;
use tracing::{debug, info};

/// An email to submit. Addresses come from [`MailerConfig`]; the message
/// carries only the per-send content.
#[derive(Debug, Clone)]
pub struct Message {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Mailgun's acknowledgment of an accepted message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// Client for the Mailgun messages API.
#[derive(Debug, Clone)]
pub struct MailgunClient {
    config: MailerConfig,
    http: reqwest::Client,
}

impl MailgunClient {
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        if config.domain.is_empty() {
            return Err(MailerError::Config("mailgun domain is not set".into()));
        }
        if config.from.is_empty() || config.to.is_empty() {
            return Err(MailerError::Config(
                "mailgun sender and recipient must be set".into(),
            ));
        }

        Ok(Self {
            config,
            http: reqwest::Client::new(),
        })
    }

    pub fn domain(&self) -> &str {
        &self.config.domain
    }

    /// Submits one message and returns the provider's acknowledgment.
    ///
    /// A non-2xx status is an error carrying the response body; there is no
    /// retry.
    pub async fn send(&self, message: &Message) -> Result<SendResponse, MailerError> {
        let url = format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.domain
        );

        debug!(
            domain = %self.config.domain,
            subject = %message.subject,
            "submitting message to mailgun"
        );

        let response = self
            .http
            .post(&url)
            .basic_auth("api", Some(&self.config.api_key))
            .form(&[
                ("from", self.config.from.as_str()),
                ("to", self.config.to.as_str()),
                ("subject", message.subject.as_str()),
                ("text", message.text.as_str()),
                ("html", message.html.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let ack: SendResponse = response.json().await?;
        info!(id = %ack.id, message = %ack.message, "mailgun accepted message");
        Ok(ack)
    }
}
