mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::FolioError;
use crate::language::{Language, LanguageSet};
use defaults::*;

/// Top-level Folio configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub folio: FolioConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files. Empty = stderr only.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider")]
    pub default: String,
    pub gemini: Option<GeminiConfig>,
    pub openai: Option<OpenAiConfig>,
    pub ollama: Option<OllamaConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default: default_provider(),
            gemini: None,
            openai: None,
            ollama: None,
        }
    }
}

/// Google Gemini provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Falls back to `GEMINI_API_KEY` when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
        }
    }
}

/// OpenAI-compatible provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Falls back to `OPENAI_API_KEY` when empty.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            base_url: default_openai_base_url(),
        }
    }
}

/// Ollama local provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

/// Translation layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Language selected at session start.
    #[serde(default = "default_language")]
    pub default_language: Language,
    /// Which languages users may pick.
    #[serde(default = "default_language_set")]
    pub languages: LanguageSet,
    /// Maximum cached strings per language. Omit for an unbounded cache.
    #[serde(default)]
    pub cache_capacity: Option<usize>,
    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            languages: default_language_set(),
            cache_capacity: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Reject settings that cannot work together.
    pub fn validate(&self) -> Result<(), FolioError> {
        let t = &self.translation;
        if !t.languages.contains(t.default_language) {
            return Err(FolioError::Config(format!(
                "default_language '{}' is not in the '{:?}' language set",
                t.default_language, t.languages
            )));
        }
        if t.cache_capacity == Some(0) {
            return Err(FolioError::Config(
                "cache_capacity must be positive; omit it for an unbounded cache".into(),
            ));
        }
        if t.request_timeout_secs == 0 {
            return Err(FolioError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Resolve an API key from config, falling back to an environment variable.
pub fn api_key_or_env(configured: &str, var: &str) -> String {
    if !configured.is_empty() {
        return configured.to_string();
    }
    std::env::var(var).unwrap_or_default()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, FolioError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| FolioError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, FolioError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| FolioError::Config(format!("failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}
