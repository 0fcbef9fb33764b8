/*!
 * Mock translator for tests and dry runs.
 *
 * - `MockTranslator::working()` - tags the input as translated
 * - `MockTranslator::echo()` - returns the input unchanged
 * - `MockTranslator::intermittent(n)` - fails every n-th request
 * - `MockTranslator::failing()` - always fails
 * - `MockTranslator::empty()` - answers with an empty string
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[TRANSLATED] <text>`
    Working,
    /// Returns the input unchanged
    Echo,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Succeeds after sleeping (ordering tests under concurrency)
    Slow { delay_ms: u64 },
}

/// Mock translator recording every request it sees
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Texts received, in call order
    requests: Arc<Mutex<Vec<String>>>,
    /// Fixed answers for specific inputs, checked before `behavior`
    scripted: Arc<HashMap<String, String>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            scripted: Arc::new(HashMap::new()),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Answer `input` with `output` regardless of behavior
    pub fn with_response(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.scripted).insert(input.into(), output.into());
        self
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());

        if let MockBehavior::Intermittent { fail_every } = self.behavior {
            if fail_every > 0 && count % fail_every == fail_every - 1 {
                return Err(ProviderError::ApiError {
                    message: format!("Simulated intermittent failure (request #{})", count + 1),
                    status_code: 503,
                });
            }
        }

        if let Some(answer) = self.scripted.get(text) {
            return Ok(answer.clone());
        }

        match self.behavior {
            MockBehavior::Working | MockBehavior::Intermittent { .. } => {
                Ok(format!("[TRANSLATED] {}", text))
            }

            MockBehavior::Echo => Ok(text.to_string()),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(format!("[TRANSLATED] {}", text))
            }
        }
    }
}
