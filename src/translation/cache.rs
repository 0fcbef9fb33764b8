/*!
 * Translation caching.
 *
 * Subtitles repeat themselves ("Yes.", "What?", song lyrics). The caching
 * decorator remembers each distinct cue text for the lifetime of a run so a
 * repeated cue does not cost another backend call.
 */

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Translator;

/// In-memory map from source text to translation
#[derive(Debug, Default, Clone)]
pub struct TranslationCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<String, String>>>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a translation from the cache
    pub fn get(&self, source_text: &str) -> Option<String> {
        match self.cache.read().get(source_text) {
            Some(translation) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for '{}'", truncate_text(source_text, 30));
                Some(translation.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(&self, source_text: &str, translation: &str) {
        self.cache
            .write()
            .insert(source_text.to_string(), translation.to_string());
    }

    /// (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        let hit_rate = if total > 0 { hits as f64 / total as f64 } else { 0.0 };

        (hits, misses, hit_rate)
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

/// [`Translator`] decorator that consults a [`TranslationCache`] first.
///
/// Only successful, non-empty answers are cached; failures always reach the
/// caller.
pub struct CachingTranslator<T> {
    inner: T,
    cache: TranslationCache,
}

impl<T: Translator> CachingTranslator<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: TranslationCache::new(),
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }
}

#[async_trait]
impl<T: Translator> Translator for CachingTranslator<T> {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        if let Some(cached) = self.cache.get(text) {
            return Ok(cached);
        }

        let translated = self.inner.translate(text).await?;
        if !translated.trim().is_empty() {
            self.cache.store(text, &translated);
        }
        Ok(translated)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
