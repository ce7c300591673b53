//! Customer-service intent taxonomy.
//!
//! An intent names which request type the remote speech model recognized
//! during a call. The taxonomy feeds the "Required Keys by Intent" table in
//! the system prompt; the tool boundary itself stays free-text, so unknown
//! intent labels are accepted there and only this module knows the canonical
//! set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Request types handled by the utility-company service desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    /// Contract takeover (change of account holder on an active supply).
    Voltura,
    /// Customer-submitted meter self-reading.
    Autolettura,
    /// Contract termination.
    CessazioneContratto,
    /// Complaint.
    Reclamo,
}

impl Intent {
    /// All intents, in the order they appear in the system prompt.
    pub const ALL: [Intent; 4] = [
        Intent::Voltura,
        Intent::Autolettura,
        Intent::CessazioneContratto,
        Intent::Reclamo,
    ];

    /// The canonical label spoken by the model when invoking a tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Voltura => "voltura",
            Intent::Autolettura => "autolettura",
            Intent::CessazioneContratto => "cessazione-contratto",
            Intent::Reclamo => "reclamo",
        }
    }

    /// Data keys the operator must collect before acting on the intent.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            Intent::Voltura => &[
                "indirizzo_abitazione",
                "nome_cedente",
                "nome_cessionario",
                "pod_cliente",
            ],
            Intent::Autolettura => &["pod_intestatario", "valore_autolettura"],
            Intent::CessazioneContratto => &[
                "anagrafica_intestatario",
                "pod_intestatario",
                "indirizzo_abitazione",
            ],
            Intent::Reclamo => &["anagrafica_intestatario", "problema"],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown intent label.
#[derive(Debug, Error)]
#[error("unknown intent: {0}")]
pub struct ParseIntentError(pub String);

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voltura" => Ok(Intent::Voltura),
            "autolettura" => Ok(Intent::Autolettura),
            "cessazione-contratto" => Ok(Intent::CessazioneContratto),
            "reclamo" => Ok(Intent::Reclamo),
            other => Err(ParseIntentError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for intent in Intent::ALL {
            let parsed: Intent = intent.as_str().parse().expect("parse canonical label");
            assert_eq!(parsed, intent);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "disdetta".parse::<Intent>().unwrap_err();
        assert_eq!(err.to_string(), "unknown intent: disdetta");
    }

    #[test]
    fn required_keys_match_prompt_table() {
        assert_eq!(
            Intent::Voltura.required_keys(),
            &[
                "indirizzo_abitazione",
                "nome_cedente",
                "nome_cessionario",
                "pod_cliente"
            ]
        );
        assert_eq!(
            Intent::Autolettura.required_keys(),
            &["pod_intestatario", "valore_autolettura"]
        );
        assert_eq!(
            Intent::CessazioneContratto.required_keys(),
            &[
                "anagrafica_intestatario",
                "pod_intestatario",
                "indirizzo_abitazione"
            ]
        );
        assert_eq!(
            Intent::Reclamo.required_keys(),
            &["anagrafica_intestatario", "problema"]
        );
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Intent::CessazioneContratto).unwrap();
        assert_eq!(json, "\"cessazione-contratto\"");
    }
}
