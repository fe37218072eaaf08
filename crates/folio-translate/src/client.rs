//! Boundary adapter to the generative-text translation service.

use folio_core::{
    config::TranslationConfig,
    error::FolioError,
    message::{TranslationRequest, TranslationResult},
    prompt::{Prompt, TRANSLATED_TEXT_FIELD},
    traits::Provider,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Translates single strings through a [`Provider`].
///
/// Never returns an error: provider failures, timeouts, and answers of the
/// wrong shape all fall back to echoing the original text.
#[derive(Clone)]
pub struct TranslationClient {
    provider: Arc<dyn Provider>,
    timeout: Duration,
}

impl TranslationClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create with the request timeout from config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &TranslationConfig) -> Self {
        Self::new(provider).with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn translate(&self, request: &TranslationRequest) -> TranslationResult {
        if request.text.trim().is_empty() || request.target_language.is_source() {
            return TranslationResult::passthrough(request);
        }

        let request_id = Uuid::new_v4();
        let provider = self.provider.name();
        let language = request.target_language;
        let start = Instant::now();
        debug!(
            "translate[{request_id}]: {provider} -> {language} ({} chars)",
            request.text.chars().count()
        );

        let prompt = Prompt::for_translation(request);
        let outcome = match tokio::time::timeout(self.timeout, self.provider.complete(&prompt)).await
        {
            Ok(Ok(raw)) => parse_response(&raw),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(FolioError::Provider(format!(
                "{provider} timed out after {}s",
                self.timeout.as_secs()
            ))),
        };

        match outcome {
            Ok(text) => {
                debug!(
                    "translate[{request_id}]: done in {}ms",
                    start.elapsed().as_millis()
                );
                TranslationResult::translated(text)
            }
            Err(e) => {
                warn!("translate[{request_id}]: showing original text for {language}: {e}");
                TranslationResult::fallback(request)
            }
        }
    }
}

/// Validate a model answer and extract the translated text.
///
/// The answer must be a JSON object (optionally inside a Markdown code
/// fence) whose `translatedText` field is a non-empty string.
pub fn parse_response(raw: &str) -> Result<String, FolioError> {
    let body = strip_code_fence(raw.trim());
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FolioError::MalformedResponse(format!("not a JSON object: {e}")))?;

    match value.get(TRANSLATED_TEXT_FIELD) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
        Some(Value::String(_)) => Err(FolioError::MalformedResponse(format!(
            "{TRANSLATED_TEXT_FIELD} is empty"
        ))),
        Some(other) => Err(FolioError::MalformedResponse(format!(
            "{TRANSLATED_TEXT_FIELD} is not a string: {other}"
        ))),
        None => Err(FolioError::MalformedResponse(format!(
            "missing {TRANSLATED_TEXT_FIELD}"
        ))),
    }
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, StubProvider};
    use folio_core::{language::Language, message::Outcome};

    #[test]
    fn test_parse_plain_json() {
        assert_eq!(
            parse_response(r#"{"translatedText":"Привет"}"#).unwrap(),
            "Привет"
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"translatedText\": \"Bonjour\"}\n```";
        assert_eq!(parse_response(raw).unwrap(), "Bonjour");
        let raw = "```\n{\"translatedText\": \"Hola\"}\n```\n";
        assert_eq!(parse_response(raw).unwrap(), "Hola");
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        for raw in [
            "Привет",
            r#"{"text":"Привет"}"#,
            r#"{"translatedText":42}"#,
            r#"{"translatedText":null}"#,
            r#"{"translatedText":"  "}"#,
            r#"["translatedText"]"#,
        ] {
            assert!(
                matches!(parse_response(raw), Err(FolioError::MalformedResponse(_))),
                "should reject {raw}"
            );
        }
    }

    #[tokio::test]
    async fn test_source_language_skips_provider() {
        let stub = StubProvider::new();
        let client = TranslationClient::new(stub.clone());
        let res = client
            .translate(&TranslationRequest::new("Hello", Language::En))
            .await;
        assert_eq!(res.translated_text, "Hello");
        assert_eq!(res.outcome, Outcome::Passthrough);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_text_skips_provider() {
        let stub = StubProvider::new();
        let client = TranslationClient::new(stub.clone());
        let res = client
            .translate(&TranslationRequest::new("   ", Language::Ru))
            .await;
        assert_eq!(res.translated_text, "   ");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let stub = StubProvider::new();
        stub.reply("Hello", Language::Ru, Reply::Text("Привет".into()));
        let client = TranslationClient::new(stub.clone());
        let res = client
            .translate(&TranslationRequest::new("Hello", Language::Ru))
            .await;
        assert_eq!(res, TranslationResult::translated("Привет"));
        assert_eq!(stub.calls(), vec![("Hello".to_string(), Some(Language::Ru))]);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let stub = StubProvider::new();
        stub.reply("Goodbye", Language::Ru, Reply::Fail);
        let client = TranslationClient::new(stub.clone());
        let res = client
            .translate(&TranslationRequest::new("Goodbye", Language::Ru))
            .await;
        assert_eq!(res.translated_text, "Goodbye");
        assert_eq!(res.outcome, Outcome::Fallback);
    }

    #[tokio::test]
    async fn test_malformed_answer_falls_back() {
        let stub = StubProvider::new();
        stub.reply("Hello", Language::Fr, Reply::Raw(r#"{"text":"Bonjour"}"#.into()));
        let client = TranslationClient::new(stub.clone());
        let res = client
            .translate(&TranslationRequest::new("Hello", Language::Fr))
            .await;
        assert_eq!(res.translated_text, "Hello");
        assert_eq!(res.outcome, Outcome::Fallback);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let stub = StubProvider::gated();
        let client =
            TranslationClient::new(stub.clone()).with_timeout(Duration::from_millis(20));
        let res = client
            .translate(&TranslationRequest::new("Hello", Language::Ru))
            .await;
        assert_eq!(res.outcome, Outcome::Fallback);
        assert_eq!(res.translated_text, "Hello");
    }
}
