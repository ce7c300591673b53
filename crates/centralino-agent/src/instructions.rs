//! The operator system prompt.
//!
//! The prompt is the product: it defines the persona, the extraction rules,
//! and the per-intent data requirements. The required-keys table is rendered
//! from [`Intent`] so the prompt and the taxonomy cannot drift apart.

use centralino_types::Intent;

const PREAMBLE: &str = "System settings:

Tool use: enabled.

Instructions:
- You are a customer service operator for Alegas, a gas and electricity supply company.
- Your primary task is to extract data from the received messages by invoking the appropriate functions.
- Only use the information present in the message, do not invent or add any data.
- Invoke a intent function when needed. If the request falls outside of allowed values, kindly decline the response.
- Request to customer the missing required data to perform the relative intent action, based on \"Required Keys by Intent\" list.
- Depending on the requested service, invoke the dedicated function and ask relevant questions to gather the necessary information.
- Always respond in Italian, unless the customer asks you to use another language.
- Always send a resume to customer's e-mail with the collected data at the call termination

Personality:
- Be polite, patient, and helpful.
- Maintain a friendly, professional tone.
- Use clear, concise language to assist the user.
- Ensure that the customer feels understood and supported throughout the conversation.

Required Keys by Intent:";

/// Renders the full system prompt handed to the speech model.
pub fn system_prompt() -> String {
    let mut prompt = String::from(PREAMBLE);
    for intent in Intent::ALL {
        prompt.push_str("\n- ");
        prompt.push_str(intent.as_str());
        prompt.push_str(": ");
        prompt.push_str(&intent.required_keys().join(", "));
    }
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_intent_with_its_keys() {
        let prompt = system_prompt();
        for intent in Intent::ALL {
            assert!(prompt.contains(intent.as_str()), "missing {}", intent);
            for key in intent.required_keys() {
                assert!(prompt.contains(key), "missing key {} for {}", key, intent);
            }
        }
    }

    #[test]
    fn prompt_keeps_the_operator_persona() {
        let prompt = system_prompt();
        assert!(prompt.contains("customer service operator for Alegas"));
        assert!(prompt.contains("Always respond in Italian"));
        assert!(prompt.contains("Tool use: enabled."));
    }

    #[test]
    fn required_keys_table_is_line_per_intent() {
        let prompt = system_prompt();
        assert!(prompt.contains(
            "- voltura: indirizzo_abitazione, nome_cedente, nome_cessionario, pod_cliente"
        ));
        assert!(prompt.contains("- autolettura: pod_intestatario, valore_autolettura"));
    }
}
