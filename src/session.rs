//! Interactive translation session over stdin.
//!
//! Every plain line is translated through the shared session cache. Lines
//! starting with `:` are session commands.

use folio_translate::{Projection, Stats, Translator};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Session commands.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// `:lang <code>`: switch the display language.
    Language(&'a str),
    /// `:pin <text>`: keep a string on screen across language changes.
    Pin(&'a str),
    /// `:pins`: show pinned strings.
    Pins,
    /// `:langs`: list selectable languages.
    Languages,
    Stats,
    Clear,
    Help,
    Quit,
}

impl<'a> Command<'a> {
    /// Parse a `:`-prefixed command. Returns `None` for text to translate.
    pub fn parse(line: &'a str) -> Option<Result<Self, String>> {
        let rest = line.trim().strip_prefix(':')?;
        let (cmd, arg) = match rest.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (rest, ""),
        };
        let parsed = match (cmd, arg.is_empty()) {
            ("lang", false) => Ok(Self::Language(arg)),
            ("lang", true) => Err("usage: :lang <code>".to_string()),
            ("pin", false) => Ok(Self::Pin(arg)),
            ("pin", true) => Err("usage: :pin <text>".to_string()),
            ("pins", _) => Ok(Self::Pins),
            ("langs", _) => Ok(Self::Languages),
            ("stats", _) => Ok(Self::Stats),
            ("clear", _) => Ok(Self::Clear),
            ("help", _) => Ok(Self::Help),
            ("quit" | "q" | "exit", _) => Ok(Self::Quit),
            (other, _) => Err(format!("unknown command :{other} (try :help)")),
        };
        Some(parsed)
    }
}

const HELP: &str = "\
:lang <code>   switch language
:langs         list languages
:pin <text>    keep a string translated across language changes
:pins          show pinned strings
:stats         cache statistics
:clear         forget cached translations
:quit          leave the session
anything else is translated";

/// Render cache statistics for display.
pub fn format_stats(stats: &Stats) -> String {
    let capacity = stats
        .capacity
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unbounded".to_string());
    let mut out = format!(
        "language: {} (generation {})\ncached: {} / {capacity}\nhits: {}  misses: {}\nservice requests: {}  in flight: {}",
        stats.language,
        stats.generation,
        stats.entries,
        stats.hits,
        stats.misses,
        stats.requests,
        stats.in_flight,
    );
    if let Some(age) = stats.oldest_entry_age {
        out.push_str(&format!("\noldest entry: {}s ago", age.num_seconds()));
    }
    out
}

/// Read stdin until EOF or `:quit`.
pub async fn run(translator: Arc<Translator>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pins: Vec<Projection> = Vec::new();

    println!(
        "Folio session in {} via {}. Type :help for commands.",
        translator.language().name(),
        translator.provider_name()
    );

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            None => {
                println!("{}", translator.translate(line.trim()).await);
                continue;
            }
            Some(Err(usage)) => {
                eprintln!("{usage}");
                continue;
            }
            Some(Ok(command)) => command,
        };

        match command {
            Command::Language(code) => match translator.select(code) {
                Ok(true) => {
                    println!("language: {}", translator.language().name());
                    for pin in pins.iter_mut() {
                        println!("  {}", pin.settled().await);
                    }
                }
                Ok(false) => println!("already showing {}", translator.language().name()),
                Err(e) => eprintln!("{e}"),
            },
            Command::Pin(text) => {
                let mut pin = Projection::spawn(translator.clone(), text);
                println!("  {}", pin.settled().await);
                pins.push(pin);
            }
            Command::Pins => {
                for pin in &pins {
                    println!("  {} -> {}", pin.source(), pin.displayed());
                }
            }
            Command::Languages => {
                let current = translator.language();
                for language in translator.languages().languages() {
                    let marker = if *language == current { "*" } else { " " };
                    println!("{marker} {} {}", language.code(), language.name());
                }
            }
            Command::Stats => println!("{}", format_stats(&translator.stats())),
            Command::Clear => {
                translator.clear_cache();
                println!("cache cleared");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}
