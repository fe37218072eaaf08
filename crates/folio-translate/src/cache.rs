//! Session cache of translated strings.
//!
//! Keys are the source text only, so one cache holds entries for exactly one
//! language. The owner must [`clear`](TranslationCache::clear) it whenever
//! the language changes.

use chrono::{DateTime, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;

/// A remembered translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub translated_text: String,
    pub cached_at: DateTime<Utc>,
}

/// Source text -> translation, optionally bounded with LRU eviction.
pub struct TranslationCache {
    entries: LruCache<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl TranslationCache {
    /// `None` = unbounded.
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        let entries = match capacity {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            entries,
            hits: 0,
            misses: 0,
        }
    }

    /// Build from a configured capacity, where `None` or `0` mean unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self::new(capacity.and_then(NonZeroUsize::new))
    }

    /// Look up `text`, marking it recently used and counting the hit or miss.
    pub fn get(&mut self, text: &str) -> Option<String> {
        match self.entries.get(text) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.translated_text.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up `text` without touching recency or counters.
    pub fn peek(&self, text: &str) -> Option<&CacheEntry> {
        self.entries.peek(text)
    }

    pub fn insert(&mut self, text: String, translated_text: String) {
        self.entries.put(
            text,
            CacheEntry {
                translated_text,
                cached_at: Utc::now(),
            },
        );
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured bound, or `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        let cap = self.entries.cap().get();
        (cap != usize::MAX).then_some(cap)
    }

    /// When the longest-held entry was stored.
    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.entries.iter().map(|(_, entry)| entry.cached_at).min()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(None)
    }
}
