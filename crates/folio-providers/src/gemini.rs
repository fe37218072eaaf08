//! Google Gemini API provider.
//!
//! Calls the Gemini `generateContent` endpoint. Auth via URL query param.

use async_trait::async_trait;
use folio_core::{error::FolioError, prompt::Prompt, traits::Provider};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    /// Create from config values.
    pub fn from_config(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    total_token_count: u64,
}

fn build_request(prompt: &Prompt) -> GeminiRequest {
    let (system, api_messages) = prompt.to_api_messages();

    let system_instruction = if system.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: system }],
        })
    };

    let contents = api_messages
        .into_iter()
        .map(|m| {
            let role = if m.role == "assistant" {
                "model"
            } else {
                "user"
            };
            GeminiContent {
                role: Some(role.to_string()),
                parts: vec![GeminiPart { text: m.content }],
            }
        })
        .collect();

    let generation_config = prompt.json_output.then(|| GenerationConfig {
        response_mime_type: "application/json".to_string(),
    });

    GeminiRequest {
        contents,
        system_instruction,
        generation_config,
    }
}

/// Pull the first candidate's text, or explain why there is none.
fn extract_text(parsed: &GeminiResponse) -> Result<String, FolioError> {
    let candidate = parsed
        .candidates
        .as_ref()
        .and_then(|c| c.first())
        .ok_or_else(|| FolioError::Provider("gemini: response has no candidates".into()))?;

    candidate
        .content
        .as_ref()
        .and_then(|c| c.parts.first())
        .map(|p| p.text.clone())
        .ok_or_else(|| {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            FolioError::Provider(format!("gemini: empty candidate (finish reason: {reason})"))
        })
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, FolioError> {
        let effective_model = prompt.model.as_deref().unwrap_or(&self.model);
        let start = Instant::now();
        let body = build_request(prompt);

        let url = format!(
            "{GEMINI_BASE_URL}/models/{effective_model}:generateContent?key={}",
            self.api_key
        );
        debug!("gemini: POST models/{effective_model}:generateContent");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FolioError::Provider(format!("gemini request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FolioError::Provider(format!(
                "gemini returned {status}: {text}"
            )));
        }

        let parsed: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| FolioError::Provider(format!("gemini: failed to parse response: {e}")))?;

        let text = extract_text(&parsed)?;
        let tokens = parsed.usage_metadata.as_ref().map(|u| u.total_token_count);
        debug!(
            "gemini: {} tokens in {}ms",
            tokens.unwrap_or_default(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("gemini: no API key configured");
            return false;
        }
        let url = format!("{GEMINI_BASE_URL}/models?key={}", self.api_key);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("gemini not available: {e}");
                false
            }
        }
    }
}
