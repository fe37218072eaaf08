mod session;

use clap::{Parser, Subcommand};
use folio_core::{config, traits::Provider};
use folio_providers::{gemini::GeminiProvider, ollama::OllamaProvider, openai::OpenAiProvider};
use folio_translate::{TranslationClient, Translator};
use std::sync::Arc;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Folio: on-demand translation of portfolio UI text"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one string and print it.
    Translate {
        /// Target language code (e.g. "ru").
        #[arg(short, long)]
        to: String,
        /// The text to translate.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Translate lines from stdin through one session cache.
    Session {
        /// Language to start in (defaults to the configured one).
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// List the languages users can select.
    Languages,
    /// Check configuration and provider availability.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_logging(&cfg.folio)?;

    match cli.command {
        Commands::Translate { to, text } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: folio translate --to <code> <text>");
            }
            let translator = build_translator(&cfg)?;
            translator.select(&to)?;
            println!("{}", translator.translate(&text.join(" ")).await);
        }
        Commands::Session { lang } => {
            let translator = build_translator(&cfg)?;
            if let Some(code) = lang {
                translator.select(&code)?;
            }
            session::run(translator).await?;
        }
        Commands::Languages => {
            let t = &cfg.translation;
            for language in t.languages.languages() {
                let marker = if *language == t.default_language {
                    " (default)"
                } else {
                    ""
                };
                println!("{} {}{marker}", language.code(), language.name());
            }
        }
        Commands::Status => {
            println!("{} status\n", cfg.folio.name);
            println!("Config: {}", cli.config);
            println!("Provider: {}", cfg.provider.default);
            println!(
                "Languages: {:?} (default {})",
                cfg.translation.languages, cfg.translation.default_language
            );
            println!(
                "Cache: {}",
                cfg.translation
                    .cache_capacity
                    .map(|c| format!("{c} entries"))
                    .unwrap_or_else(|| "unbounded".to_string())
            );
            println!();

            let provider = build_provider(&cfg)?;
            let available = provider.is_available().await;
            println!(
                "  {}: {}",
                provider.name(),
                if available { "available" } else { "not available" }
            );
        }
    }

    Ok(())
}

/// Log to stderr, or to a daily file under `log_dir` when set.
fn init_logging(cfg: &config::FolioConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    if cfg.log_dir.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    std::fs::create_dir_all(&cfg.log_dir)?;
    let appender = tracing_appender::rolling::daily(&cfg.log_dir, "folio.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

/// API key for the configured provider, falling back to its environment variable.
fn resolve_api_key(cfg: &config::Config) -> String {
    let (configured, var) = match cfg.provider.default.as_str() {
        "gemini" => (
            cfg.provider.gemini.as_ref().map(|g| g.api_key.as_str()),
            "GEMINI_API_KEY",
        ),
        "openai" => (
            cfg.provider.openai.as_ref().map(|o| o.api_key.as_str()),
            "OPENAI_API_KEY",
        ),
        _ => return String::new(),
    };
    config::api_key_or_env(configured.unwrap_or_default(), var)
}

/// Build the configured provider.
fn build_provider(cfg: &config::Config) -> anyhow::Result<Arc<dyn Provider>> {
    match cfg.provider.default.as_str() {
        "gemini" => {
            let g = cfg.provider.gemini.clone().unwrap_or_default();
            Ok(Arc::new(GeminiProvider::from_config(
                resolve_api_key(cfg),
                g.model,
            )))
        }
        "openai" => {
            let o = cfg.provider.openai.clone().unwrap_or_default();
            Ok(Arc::new(OpenAiProvider::from_config(
                o.base_url,
                resolve_api_key(cfg),
                o.model,
            )))
        }
        "ollama" => {
            let o = cfg.provider.ollama.clone().unwrap_or_default();
            Ok(Arc::new(OllamaProvider::from_config(o.base_url, o.model)))
        }
        other => anyhow::bail!("unsupported provider: {other}"),
    }
}

/// Build the session translator on top of the configured provider.
fn build_translator(cfg: &config::Config) -> anyhow::Result<Arc<Translator>> {
    let provider = build_provider(cfg)?;
    if provider.requires_api_key() && resolve_api_key(cfg).is_empty() {
        warn!(
            "{}: no API key configured, text will be shown untranslated",
            provider.name()
        );
    }
    let client = TranslationClient::from_config(provider, &cfg.translation);
    Ok(Arc::new(Translator::new(client, &cfg.translation)))
}
