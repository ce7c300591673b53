use serde::{Deserialize, Serialize};
use std::fmt;

fn default_api_base() -> String {
    "https://api.mailgun.net/v3".to_string()
}

/// Mailgun account and routing settings for the recap email.
///
/// Sender, recipient, and domain are fixed per deployment; the tool callback
/// never chooses addresses at runtime.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Sending domain, e.g. a Mailgun sandbox domain.
    pub domain: String,
    /// Fixed sender, e.g. "Assistente Alegas <mailgun@sandbox...mailgun.org>".
    pub from: String,
    /// Fixed recipient of the recap email.
    pub to: String,
    /// API base URL; overridable for tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            domain: String::new(),
            from: String::new(),
            to: String::new(),
            api_base: default_api_base(),
        }
    }
}

impl fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerConfig")
            .field("api_key", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_defaults_api_base_to_mailgun() {
        let toml_str = r#"
            api_key = "key"
            domain = "sandbox.mailgun.org"
            from = "Assistente <mailgun@sandbox.mailgun.org>"
            to = "desk@example.com"
        "#;

        let config: MailerConfig = toml::from_str(toml_str).expect("parse TOML");
        assert_eq!(config.api_base, "https://api.mailgun.net/v3");
        assert_eq!(config.domain, "sandbox.mailgun.org");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = MailerConfig {
            api_key: "key-secret".into(),
            ..MailerConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("key-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
