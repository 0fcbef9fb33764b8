/*!
 * Document translation engine.
 *
 * Splits a WebVTT document, translates every cue through a bounded pool of
 * in-flight requests, and reassembles the document in source order.
 */

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::app_config::{EngineConfig, FailurePolicy};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Translator;
use crate::webvtt::{self, CueBlock, Document};

use super::cue::{CueOutcome, translate_cue};

/// Options for a document translation run
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum number of cues waiting on the backend at once; 1 is sequential
    pub max_concurrent_requests: usize,

    /// Backend failure handling
    pub failure_policy: FailurePolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_concurrent_requests: config.concurrent_requests.max(1),
            failure_policy: config.failure_policy,
        }
    }
}

/// A cue left untranslated under [`FailurePolicy::KeepOriginal`]
#[derive(Debug)]
pub struct CueFailure {
    /// Zero-based position among the document's cues
    pub cue_index: usize,
    /// The cue's timing line, for locating it in the file
    pub timing: String,
    pub error: ProviderError,
}

/// Result of a document translation run
#[derive(Debug)]
pub struct TranslationReport {
    /// Translated document
    pub document: Document,
    /// Cues sent to the backend and successfully translated
    pub translated_cues: usize,
    /// Cues with no text, never sent to the backend
    pub skipped_cues: usize,
    /// Cues that kept their original text
    pub failures: Vec<CueFailure>,
    pub elapsed: Duration,
}

impl TranslationReport {
    /// Rendered WebVTT output
    pub fn output(&self) -> String {
        self.document.render()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} cue(s) translated, {} empty, {} failed in {:.2}s",
            self.translated_cues,
            self.skipped_cues,
            self.failures.len(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Structure-preserving WebVTT translator
pub struct VttTranslator<T: ?Sized> {
    translator: Arc<T>,
    options: EngineOptions,
}

impl<T> VttTranslator<T>
where
    T: Translator + ?Sized,
{
    pub fn new(translator: Arc<T>) -> Self {
        Self::with_options(translator, EngineOptions::default())
    }

    pub fn with_options(translator: Arc<T>, options: EngineOptions) -> Self {
        Self { translator, options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn translator(&self) -> &Arc<T> {
        &self.translator
    }

    /// Translate raw WebVTT text and render the result
    pub async fn translate_str(&self, raw: &str) -> Result<String, TranslationError> {
        Ok(self.translate_document(&webvtt::split(raw)).await?.output())
    }

    /// Translate an already split document
    pub async fn translate_document(&self, document: &Document) -> Result<TranslationReport, TranslationError> {
        self.translate_document_with_progress(document, |_, _| {}).await
    }

    /// Translate a document, reporting `(done, total)` after each cue
    pub async fn translate_document_with_progress<F>(
        &self,
        document: &Document,
        progress_callback: F,
    ) -> Result<TranslationReport, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let start_time = Instant::now();
        let cues: Vec<&CueBlock> = document.cues().collect();
        let total = cues.len();
        let concurrency = self.options.max_concurrent_requests.max(1);
        let processed = AtomicUsize::new(0);

        info!("Translating {} cue(s) with up to {} request(s) in flight", total, concurrency);

        let translator = &self.translator;
        let processed = &processed;
        let progress_callback = &progress_callback;

        let outcomes = stream::iter(cues.iter().enumerate())
            .map(|(cue_index, cue)| async move {
                let result = translate_cue(cue, &**translator).await;

                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress_callback(done, total);

                if let Err(e) = &result {
                    warn!("Cue {} ({}) failed: {}", cue_index + 1, cue.timing, e);
                }

                (cue_index, result)
            })
            .buffer_unordered(concurrency);

        let mut results: Vec<(usize, Result<CueOutcome, ProviderError>)> = match self.options.failure_policy {
            // Stop dispatching new cues as soon as one fails
            FailurePolicy::Abort => {
                outcomes
                    .map(|(cue_index, result)| match result {
                        Ok(outcome) => Ok((cue_index, Ok(outcome))),
                        Err(source) => Err(TranslationError::Backend { cue_index, source }),
                    })
                    .try_collect()
                    .await?
            }
            FailurePolicy::KeepOriginal => outcomes.collect().await,
        };

        // Completion order is arbitrary; restore document order
        results.sort_by_key(|(idx, _)| *idx);

        let mut translated = Vec::with_capacity(total);
        let mut failures = Vec::new();
        let mut translated_cues = 0;
        let mut skipped_cues = 0;

        for (cue_index, result) in results {
            match result {
                Ok(outcome) => {
                    if outcome.was_translated() {
                        translated_cues += 1;
                    } else {
                        skipped_cues += 1;
                    }
                    translated.push(outcome.into_cue());
                }
                Err(error) => match self.options.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(TranslationError::Backend { cue_index, source: error });
                    }
                    FailurePolicy::KeepOriginal => {
                        let original = cues[cue_index];
                        failures.push(CueFailure {
                            cue_index,
                            timing: original.timing.clone(),
                            error,
                        });
                        translated.push(original.clone());
                    }
                },
            }
        }

        let report = TranslationReport {
            document: document.with_cues(translated),
            translated_cues,
            skipped_cues,
            failures,
            elapsed: start_time.elapsed(),
        };

        debug!("{}", report.summary());
        Ok(report)
    }
}
