use serde::{Deserialize, Serialize};

use crate::message::TranslationRequest;

/// Field the model must fill in its JSON answer.
pub const TRANSLATED_TEXT_FIELD: &str = "translatedText";

/// A single-turn prompt passed to a generative-text provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// System instruction prepended to the request.
    pub system_prompt: String,
    /// The user message.
    pub message: String,
    /// Ask the provider for a JSON object instead of free text, when the
    /// backend supports it.
    #[serde(default)]
    pub json_output: bool,
    /// Override the provider's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A structured message for chat-style APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// "user" or "assistant".
    pub role: String,
    /// The message content.
    pub content: String,
}

impl Prompt {
    /// Build the prompt that asks the model to translate `request`.
    ///
    /// The answer must be a JSON object carrying a single
    /// [`TRANSLATED_TEXT_FIELD`] string.
    pub fn for_translation(request: &TranslationRequest) -> Self {
        let language = request.target_language;
        Self {
            system_prompt: format!(
                "You translate short user-interface strings of a personal portfolio website. \
                 Translate the text you are given into {} ({}). \
                 Preserve punctuation, placeholders, and line breaks. \
                 Respond with a JSON object of the form {{\"{TRANSLATED_TEXT_FIELD}\": \"...\"}} and nothing else.",
                language.name(),
                language.code(),
            ),
            message: request.text.clone(),
            json_output: true,
            model: None,
        }
    }

    /// Convert to `(system_prompt, messages)` for chat APIs.
    pub fn to_api_messages(&self) -> (String, Vec<ApiMessage>) {
        let messages = vec![ApiMessage {
            role: "user".to_string(),
            content: self.message.clone(),
        }];
        (self.system_prompt.clone(), messages)
    }
}
