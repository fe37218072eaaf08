use thiserror::Error;

use crate::language::Language;

/// Top-level error type for Folio.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Error from a generative-text provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A language code that is unknown or outside the configured set.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The provider answered, but not in the expected shape.
    #[error("malformed translation response: {0}")]
    MalformedResponse(String),
}

impl FolioError {
    /// Shorthand for a language that parsed but is not enabled.
    pub fn language_not_enabled(language: Language) -> Self {
        Self::UnsupportedLanguage(format!("{} is not enabled", language.code()))
    }
}
