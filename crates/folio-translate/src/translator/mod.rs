//! Session-wide translation state.
//!
//! A [`Translator`] owns the current language, the per-language cache, and
//! the map of requests still in flight. It is built once at startup and
//! shared as `Arc<Translator>`; nothing else writes the cache.


use folio_core::{
    config::TranslationConfig,
    error::FolioError,
    language::{Language, LanguageSet},
    message::{Outcome, TranslationRequest, TranslationResult},
};
use chrono::{TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, OnceCell};
use tracing::{debug, info};

use crate::cache::TranslationCache;
use crate::client::TranslationClient;

/// The language a request was issued under, plus how many language changes
/// preceded it. Two requests with equal epochs target the same cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    pub language: Language,
    pub generation: u64,
}

/// Point-in-time counters for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub language: Language,
    pub generation: u64,
    pub entries: usize,
    pub capacity: Option<usize>,
    /// Age of the longest-held cache entry.
    pub oldest_entry_age: Option<TimeDelta>,
    pub hits: u64,
    pub misses: u64,
    pub requests: u64,
    pub in_flight: usize,
}

type InFlight = Arc<OnceCell<TranslationResult>>;

struct SessionState {
    epoch: Epoch,
    cache: TranslationCache,
    in_flight: HashMap<String, InFlight>,
}

/// One caller's hold on an in-flight request.
///
/// If the caller is dropped before the request settles and no other caller
/// is waiting on it, the entry is removed from the in-flight map.
struct Waiter<'a> {
    translator: &'a Translator,
    text: &'a str,
    cell: InFlight,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut state = self.translator.lock();
        let Some(current) = state.in_flight.get(self.text) else {
            return;
        };
        // One reference in the map, one here.
        if Arc::ptr_eq(current, &self.cell) && Arc::strong_count(&self.cell) == 2 {
            state.in_flight.remove(self.text);
            debug!("in-flight request for {:?} abandoned", self.text);
        }
    }
}

pub struct Translator {
    client: TranslationClient,
    languages: LanguageSet,
    state: Mutex<SessionState>,
    epoch_tx: watch::Sender<Epoch>,
    requests: AtomicU64,
}

impl Translator {
    /// Start a session in `config.default_language`.
    pub fn new(client: TranslationClient, config: &TranslationConfig) -> Self {
        let epoch = Epoch {
            language: config.default_language,
            generation: 0,
        };
        let (epoch_tx, _) = watch::channel(epoch);
        Self {
            client,
            languages: config.languages,
            state: Mutex::new(SessionState {
                epoch,
                cache: TranslationCache::with_capacity(config.cache_capacity),
                in_flight: HashMap::new(),
            }),
            epoch_tx,
            requests: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn language(&self) -> Language {
        self.lock().epoch.language
    }

    pub fn epoch(&self) -> Epoch {
        self.lock().epoch
    }

    /// Languages users may select.
    pub fn languages(&self) -> LanguageSet {
        self.languages
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Receive the new epoch after every language change.
    pub fn subscribe(&self) -> watch::Receiver<Epoch> {
        self.epoch_tx.subscribe()
    }

    /// Switch the display language.
    ///
    /// Returns `Ok(false)` when `language` is already current; the cache is
    /// then left alone. Otherwise every cached entry and in-flight request is
    /// dropped and subscribers are notified.
    pub fn set_language(&self, language: Language) -> Result<bool, FolioError> {
        if !self.languages.contains(language) {
            return Err(FolioError::language_not_enabled(language));
        }

        let (epoch, dropped) = {
            let mut state = self.lock();
            if state.epoch.language == language {
                return Ok(false);
            }
            state.epoch = Epoch {
                language,
                generation: state.epoch.generation + 1,
            };
            let dropped = state.cache.len();
            state.cache.clear();
            state.in_flight.clear();
            (state.epoch, dropped)
        };

        info!(
            "language set to {} (generation {}), dropped {dropped} cached strings",
            epoch.language, epoch.generation
        );
        self.epoch_tx.send_replace(epoch);
        Ok(true)
    }

    /// Parse a language code and switch to it.
    pub fn select(&self, code: &str) -> Result<bool, FolioError> {
        let language = self.languages.parse(code)?;
        self.set_language(language)
    }

    /// Render `text` in the current language.
    ///
    /// Never fails: empty input yields `""`, and any service problem yields
    /// `text` unchanged. Repeated calls are served from the cache, and
    /// concurrent calls for the same uncached text share one request.
    pub async fn translate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let (epoch, cell) = {
            let mut state = self.lock();
            if let Some(hit) = state.cache.get(text) {
                return hit;
            }
            let cell = state.in_flight.entry(text.to_string()).or_default().clone();
            (state.epoch, cell)
        };
        let waiter = Waiter {
            translator: self,
            text,
            cell,
        };

        let result = waiter
            .cell
            .get_or_init(|| async move {
                let result = self
                    .client
                    .translate(&TranslationRequest::new(text, epoch.language))
                    .await;
                if result.outcome != Outcome::Passthrough {
                    self.requests.fetch_add(1, Ordering::Relaxed);
                }
                result
            })
            .await
            .clone();

        self.settle(text, epoch, &waiter.cell, &result);
        result.translated_text
    }

    /// Record a finished request, unless the language moved on meanwhile.
    fn settle(&self, text: &str, epoch: Epoch, cell: &InFlight, result: &TranslationResult) {
        let mut state = self.lock();
        if state.epoch != epoch {
            debug!(
                "dropping {} result issued under generation {}; now at {}",
                epoch.language, epoch.generation, state.epoch.generation
            );
            return;
        }
        if state
            .in_flight
            .get(text)
            .is_some_and(|current| Arc::ptr_eq(current, cell))
        {
            state.in_flight.remove(text);
        }
        if result.is_cacheable() && state.cache.peek(text).is_none() {
            state
                .cache
                .insert(text.to_string(), result.translated_text.clone());
        }
    }

    /// Forget every cached translation without changing language.
    pub fn clear_cache(&self) {
        self.lock().cache.clear();
    }

    pub fn stats(&self) -> Stats {
        let state = self.lock();
        Stats {
            language: state.epoch.language,
            generation: state.epoch.generation,
            entries: state.cache.len(),
            capacity: state.cache.capacity(),
            oldest_entry_age: state.cache.oldest().map(|at| Utc::now() - at),
            hits: state.cache.hits(),
            misses: state.cache.misses(),
            requests: self.requests.load(Ordering::Relaxed),
            in_flight: state.in_flight.len(),
        }
    }
}
