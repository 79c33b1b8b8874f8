use serde::{Deserialize, Serialize};

use super::types::ContextPayload;
use crate::core::constants::prompt;

/// Wording wrapped around a payload when it is sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    pub instruction_prefix: String,
    pub references_header: String,
    pub instruction_suffix: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            instruction_prefix: prompt::INSTRUCTION_PREFIX.to_string(),
            references_header: prompt::REFERENCES_HEADER.to_string(),
            instruction_suffix: prompt::INSTRUCTION_SUFFIX.to_string(),
        }
    }
}

/// Render the prompt for one payload.
///
/// The references block is omitted entirely when there are no references.
pub fn render_prompt(payload: &ContextPayload, template: &PromptTemplate) -> String {
    let mut prompt = String::with_capacity(
        template.instruction_prefix.len()
            + payload.function_text.len()
            + template.instruction_suffix.len()
            + 64,
    );

    prompt.push_str(&template.instruction_prefix);
    prompt.push_str(&payload.function_text);

    if payload.has_external_references() {
        prompt.push('\n');
        prompt.push_str(&template.references_header);
        for reference in &payload.external_references {
            prompt.push('\n');
            prompt.push_str(&reference.text);
        }
    }

    prompt.push_str(&template.instruction_suffix);
    prompt
}
