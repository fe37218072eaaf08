//! Ollama local model provider.
//!
//! Connects to a locally running Ollama server. No API key required.

use async_trait::async_trait;
use folio_core::{error::FolioError, prompt::Prompt, traits::Provider};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Ollama provider backed by a local server.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create from config values.
    pub fn from_config(base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
        }
    }
}

// --- Serde types ---

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct OllamaChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaChatMessage>,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
}

fn build_request(model: &str, prompt: &Prompt) -> OllamaChatRequest {
    let (system, api_messages) = prompt.to_api_messages();
    let mut messages = Vec::with_capacity(api_messages.len() + 1);
    if !system.is_empty() {
        messages.push(OllamaChatMessage {
            role: "system".to_string(),
            content: system,
        });
    }
    for m in api_messages {
        messages.push(OllamaChatMessage {
            role: m.role,
            content: m.content,
        });
    }
    OllamaChatRequest {
        model: model.to_string(),
        messages,
        stream: false,
        format: prompt.json_output.then(|| "json".to_string()),
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn requires_api_key(&self) -> bool {
        false
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, FolioError> {
        let effective_model = prompt.model.as_deref().unwrap_or(&self.model);
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let start = Instant::now();
        let body = build_request(effective_model, prompt);

        debug!("ollama: POST {url} model={effective_model}");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FolioError::Provider(format!("ollama request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FolioError::Provider(format!(
                "ollama returned {status}: {text}"
            )));
        }

        let parsed: OllamaChatResponse = resp
            .json()
            .await
            .map_err(|e| FolioError::Provider(format!("ollama: failed to parse response: {e}")))?;

        let tokens = parsed.eval_count.unwrap_or(0) + parsed.prompt_eval_count.unwrap_or(0);
        debug!(
            "ollama: {tokens} tokens in {}ms",
            start.elapsed().as_millis()
        );

        parsed
            .message
            .map(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| FolioError::Provider("ollama: empty response".into()))
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("ollama not available: {e}");
                false
            }
        }
    }
}
