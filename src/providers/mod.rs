/*!
 * Translation backends.
 *
 * The engine only knows the [`Translator`] trait. Concrete backends live here:
 * - `ollama`: Ollama chat API client and the translator built on it
 * - `mock`: scripted translator for tests and dry runs
 *
 * Timeouts and retries are a backend concern; the engine never retries.
 */

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ProviderError;

pub mod mock;
pub mod ollama;

/// Maps source text to target text.
///
/// Implementations return only the translated text, with no commentary or
/// markdown fencing, and report failures as [`ProviderError`].
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one unit of text
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        (**self).translate(text).await
    }
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Box<T> {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        (**self).translate(text).await
    }
}

/// Adapter turning a plain synchronous function into a [`Translator`]
pub struct FnTranslator<F> {
    func: F,
}

impl<F> FnTranslator<F>
where
    F: Fn(&str) -> Result<String, ProviderError> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> Translator for FnTranslator<F>
where
    F: Fn(&str) -> Result<String, ProviderError> + Send + Sync,
{
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        (self.func)(text)
    }
}

/// Translator that returns its input unchanged
pub fn identity() -> FnTranslator<fn(&str) -> Result<String, ProviderError>> {
    fn echo(text: &str) -> Result<String, ProviderError> {
        Ok(text.to_string())
    }
    FnTranslator::new(echo as fn(&str) -> Result<String, ProviderError>)
}
