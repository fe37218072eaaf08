//! Languages the site can be displayed in.
//!
//! The site is authored in English; every other language is produced on
//! demand by the translation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// A display language, identified by its ISO-639-1 code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
    Ar,
    Zh,
    Fr,
    Es,
}

impl Language {
    /// Language the site's literal strings are written in.
    pub const SOURCE: Language = Language::En;

    /// Every known language, in menu order.
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Ru,
        Language::Ar,
        Language::Zh,
        Language::Fr,
        Language::Es,
    ];

    /// ISO-639-1 code (e.g. "ru").
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
            Self::Ar => "ar",
            Self::Zh => "zh",
            Self::Fr => "fr",
            Self::Es => "es",
        }
    }

    /// English display name, used in prompts and listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Russian",
            Self::Ar => "Arabic",
            Self::Zh => "Chinese",
            Self::Fr => "French",
            Self::Es => "Spanish",
        }
    }

    /// Whether text in this language is the untranslated source.
    pub fn is_source(&self) -> bool {
        *self == Self::SOURCE
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.code() == code)
            .ok_or_else(|| FolioError::UnsupportedLanguage(s.trim().to_string()))
    }
}

const BASIC: [Language; 2] = [Language::En, Language::Ru];

/// The group of languages a deployment offers.
///
/// The site-wide toggle only switches between English and Russian; the
/// assistant widget offers the wider set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageSet {
    #[default]
    Basic,
    Extended,
}

impl LanguageSet {
    /// Languages in this set, in menu order.
    pub fn languages(&self) -> &'static [Language] {
        match self {
            Self::Basic => &BASIC,
            Self::Extended => &Language::ALL,
        }
    }

    pub fn contains(&self, language: Language) -> bool {
        self.languages().contains(&language)
    }

    /// Parse `code` and check it belongs to this set.
    pub fn parse(&self, code: &str) -> Result<Language, FolioError> {
        let language: Language = code.parse()?;
        if !self.contains(language) {
            return Err(FolioError::language_not_enabled(language));
        }
        Ok(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_case_insensitive() {
        assert_eq!("ru".parse::<Language>().unwrap(), Language::Ru);
        assert_eq!(" ZH ".parse::<Language>().unwrap(), Language::Zh);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_source_language_is_english() {
        assert!(Language::En.is_source());
        assert!(!Language::Ru.is_source());
        assert_eq!(Language::default(), Language::SOURCE);
    }

    #[test]
    fn test_basic_set_only_has_en_and_ru() {
        assert_eq!(LanguageSet::Basic.languages(), &[Language::En, Language::Ru]);
        assert!(LanguageSet::Basic.parse("ru").is_ok());
        assert!(matches!(
            LanguageSet::Basic.parse("fr"),
            Err(FolioError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_extended_set_has_all_languages() {
        assert_eq!(LanguageSet::Extended.languages().len(), 6);
        assert_eq!(LanguageSet::Extended.parse("ar").unwrap(), Language::Ar);
    }

    #[test]
    fn test_language_serde_lowercase() {
        let json = serde_json::to_string(&Language::Ru).unwrap();
        assert_eq!(json, "\"ru\"");
        let set: LanguageSet = serde_json::from_str("\"extended\"").unwrap();
        assert_eq!(set, LanguageSet::Extended);
    }
}
