use serde::{Deserialize, Serialize};

use crate::language::Language;

/// A request to render `text` in `target_language`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: Language,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_language: Language) -> Self {
        Self {
            text: text.into(),
            target_language,
        }
    }
}

/// How a translation result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Genuine output of the translation service.
    Translated,
    /// No remote call was needed; the text is already in the target language.
    Passthrough,
    /// The service failed; the original text is echoed.
    Fallback,
}

/// The text to display for a [`TranslationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub outcome: Outcome,
}

impl TranslationResult {
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            translated_text: text.into(),
            outcome: Outcome::Translated,
        }
    }

    pub fn passthrough(request: &TranslationRequest) -> Self {
        Self {
            translated_text: request.text.clone(),
            outcome: Outcome::Passthrough,
        }
    }

    pub fn fallback(request: &TranslationRequest) -> Self {
        Self {
            translated_text: request.text.clone(),
            outcome: Outcome::Fallback,
        }
    }

    /// Whether this result may be remembered for the rest of the session.
    ///
    /// Fallbacks are not: a transient outage should not pin untranslated text.
    pub fn is_cacheable(&self) -> bool {
        self.outcome != Outcome::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let req = TranslationRequest::new("Hello", Language::Ru);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["targetLanguage"], "ru");
    }

    #[test]
    fn test_fallback_echoes_and_is_not_cacheable() {
        let req = TranslationRequest::new("Goodbye", Language::Ru);
        let res = TranslationResult::fallback(&req);
        assert_eq!(res.translated_text, "Goodbye");
        assert!(!res.is_cacheable());
        assert!(TranslationResult::passthrough(&req).is_cacheable());
        assert!(TranslationResult::translated("Пока").is_cacheable());
    }
}
