//! Phonetic code memoisation.
//!
//! Phonetic encoding dominates the cost of `Similarity` criteria, and real
//! datasets repeat the same names many times. [`PhoneticCache`] maps a
//! normalized cell value to its code for exactly one language; switching
//! language clears it, so codes from one strategy never leak into another.
//!
//! Lookups and inserts go through a sharded concurrent map, so parallel row
//! evaluations only contend when they hit the same shard on a miss.

use dashmap::DashMap;

use crate::phonetic::{PhoneticEncoder, PhoneticStrategy};

/// A read-through cache of phonetic codes for one language.
///
/// # Examples
///
/// ```
/// use rowmatch::PhoneticCache;
///
/// let mut cache = PhoneticCache::new("fr");
/// let first = cache.code("BEAUX");
/// assert_eq!(cache.code("BEAUX"), first);
/// assert_eq!(cache.len(), 1);
///
/// // Same language (any case): contents are kept.
/// assert!(!cache.reset_for("FR"));
/// // Different language: contents are dropped.
/// assert!(cache.reset_for("en"));
/// assert!(cache.is_empty());
/// ```
#[derive(Debug)]
pub struct PhoneticCache {
    language: String,
    strategy: PhoneticStrategy,
    codes: DashMap<String, String>,
}

impl PhoneticCache {
    /// Default initial capacity, sized for a typical name column.
    const INITIAL_CAPACITY: usize = 2000;

    /// Creates an empty cache bound to `language`.
    pub fn new(language: &str) -> Self {
        Self {
            language: normalize_language(language),
            strategy: PhoneticStrategy::for_language(language),
            codes: DashMap::with_capacity(Self::INITIAL_CAPACITY),
        }
    }

    /// The language code this cache currently holds codes for (lower-cased).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The phonetic strategy matching [`language`](Self::language).
    pub fn strategy(&self) -> PhoneticStrategy {
        self.strategy
    }

    /// Rebinds the cache to `language`, clearing it if the language changed.
    ///
    /// Language codes compare case-insensitively. Returns `true` when the
    /// cache was cleared. Taking `&mut self` guarantees no evaluation is
    /// reading the cache while it switches language.
    pub fn reset_for(&mut self, language: &str) -> bool {
        let language = normalize_language(language);
        if language == self.language {
            return false;
        }
        tracing::debug!(
            from = %self.language,
            to = %language,
            dropped = self.codes.len(),
            "phonetic cache reset"
        );
        self.codes.clear();
        self.strategy = PhoneticStrategy::for_language(&language);
        self.language = language;
        true
    }

    /// Returns the phonetic code for `text`, computing and storing it on a miss.
    ///
    /// `text` is expected to be trimmed and upper-cased already; it is used
    /// verbatim as the key.
    pub fn code(&self, text: &str) -> String {
        if let Some(code) = self.codes.get(text) {
            return code.clone();
        }
        // Encode outside the shard lock; a racing insert of the same key
        // computes the same code, and the first one stored wins.
        let code = self.strategy.encode(text);
        self.codes
            .entry(text.to_owned())
            .or_insert(code)
            .value()
            .clone()
    }

    /// Encodes `text` without touching the cache.
    pub fn encode_uncached(&self, text: &str) -> String {
        self.strategy.encode(text)
    }

    /// Number of memoised codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if nothing is memoised.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Drops every memoised code, keeping the language binding.
    pub fn clear(&mut self) {
        self.codes.clear();
    }
}

impl Default for PhoneticCache {
    fn default() -> Self {
        Self::new("")
    }
}

fn normalize_language(language: &str) -> String {
    language.trim().to_ascii_lowercase()
}
