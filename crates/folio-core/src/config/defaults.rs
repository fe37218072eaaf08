//! Serde default functions for config fields.

use crate::language::{Language, LanguageSet};

pub(super) fn default_name() -> String {
    "Folio".to_string()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_provider() -> String {
    "gemini".to_string()
}

pub(super) fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub(super) fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

pub(super) fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub(super) fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

pub(super) fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

pub(super) fn default_language() -> Language {
    Language::SOURCE
}

pub(super) fn default_language_set() -> LanguageSet {
    LanguageSet::Basic
}

pub(super) fn default_request_timeout() -> u64 {
    30
}
