use super::*;

#[test]
fn test_empty_config_uses_defaults() {
    let cfg = parse("").unwrap();
    assert_eq!(cfg.folio.name, "Folio");
    assert_eq!(cfg.provider.default, "gemini");
    assert_eq!(cfg.translation.default_language, Language::En);
    assert_eq!(cfg.translation.languages, LanguageSet::Basic);
    assert_eq!(cfg.translation.cache_capacity, None);
    assert_eq!(cfg.translation.request_timeout_secs, 30);
}

#[test]
fn test_translation_section_from_toml() {
    let toml_str = r#"
        [translation]
        default_language = "fr"
        languages = "extended"
        cache_capacity = 64
        request_timeout_secs = 5
    "#;
    let cfg = parse(toml_str).unwrap();
    assert_eq!(cfg.translation.default_language, Language::Fr);
    assert_eq!(cfg.translation.languages, LanguageSet::Extended);
    assert_eq!(cfg.translation.cache_capacity, Some(64));
    assert_eq!(cfg.translation.request_timeout_secs, 5);
}

#[test]
fn test_default_language_outside_set_is_rejected() {
    let toml_str = r#"
        [translation]
        default_language = "zh"
        languages = "basic"
    "#;
    let err = parse(toml_str).unwrap_err();
    assert!(matches!(err, FolioError::Config(_)), "got {err:?}");
}

#[test]
fn test_zero_cache_capacity_is_rejected() {
    let toml_str = r#"
        [translation]
        cache_capacity = 0
    "#;
    assert!(parse(toml_str).is_err());
}

#[test]
fn test_unknown_language_fails_to_parse() {
    let toml_str = r#"
        [translation]
        default_language = "de"
    "#;
    assert!(parse(toml_str).is_err());
}

#[test]
fn test_provider_sections_fill_defaults() {
    let toml_str = r#"
        [provider]
        default = "ollama"

        [provider.ollama]
        model = "qwen2.5"

        [provider.gemini]
        api_key = "AIza-test"
    "#;
    let cfg = parse(toml_str).unwrap();
    assert_eq!(cfg.provider.default, "ollama");
    let ollama = cfg.provider.ollama.unwrap();
    assert_eq!(ollama.model, "qwen2.5");
    assert_eq!(ollama.base_url, "http://localhost:11434");
    let gemini = cfg.provider.gemini.unwrap();
    assert_eq!(gemini.api_key, "AIza-test");
    assert_eq!(gemini.model, "gemini-2.0-flash");
    assert!(cfg.provider.openai.is_none());
}

#[test]
fn test_api_key_prefers_configured_value() {
    assert_eq!(
        api_key_or_env("sk-configured", "FOLIO_TEST_UNSET_KEY"),
        "sk-configured"
    );
    assert_eq!(api_key_or_env("", "FOLIO_TEST_UNSET_KEY"), "");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/folio/config.toml").unwrap();
    assert_eq!(cfg.folio.log_level, "info");
}

#[test]
fn test_load_reads_file() {
    let tmp = std::env::temp_dir().join("__folio_test_load_config__.toml");
    std::fs::write(&tmp, "[folio]\nname = \"Portfolio\"\n").unwrap();
    let cfg = load(tmp.to_str().unwrap()).unwrap();
    assert_eq!(cfg.folio.name, "Portfolio");
    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_load_unreadable_path_is_config_error() {
    let dir = std::env::temp_dir().join("__folio_test_load_dir__");
    std::fs::create_dir_all(&dir).unwrap();
    let err = load(dir.to_str().unwrap()).unwrap_err();
    match err {
        FolioError::Config(msg) => assert!(msg.contains("__folio_test_load_dir__")),
        other => panic!("expected config error, got {other:?}"),
    }
    let _ = std::fs::remove_dir(&dir);
}
