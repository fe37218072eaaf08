use crate::{error::FolioError, prompt::Prompt};
use async_trait::async_trait;

/// Generative-text provider trait.
///
/// Every backend (Gemini, OpenAI, Ollama, etc.) implements this trait to
/// provide a uniform interface to the translation layer.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Send a prompt to the provider and return the raw model text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, FolioError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}
