use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::{Config, OllamaConfig};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Translator;

/// Ollama client for interacting with the Ollama chat API
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    /// How long to keep the model loaded in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

/// Chat response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl ChatRequest {
    /// Create a new non-streaming chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: None,
            stream: Some(false),
            keep_alive: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL with default policy
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new_with_config(url, 60, 3, 1000)
    }

    /// Create a new Ollama client with timeout and retry policy
    ///
    /// Ollama speaks HTTP/1.1; connections are kept alive for parallel cues.
    pub fn new_with_config(
        url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        let base_url = url.into().trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(20)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "Failed to build HTTP client for {} ({}), falling back to defaults without the {}s timeout",
                    base_url, e, timeout_secs
                );
                Client::new()
            });

        Self {
            base_url,
            client,
            max_retries,
            backoff_base_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exponential delay before retry `attempt` (1-based), capped at 2^16 steps
    fn backoff_delay_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        self.backoff_base_ms.saturating_mul(factor)
    }

    /// Chat with the Ollama API, retrying server and network errors
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.map_err(|e| {
                        ProviderError::RequestFailed(format!("Failed to read Ollama response body: {}", e))
                    })?;

                    if status.is_success() {
                        return parse_chat_response(&body);
                    }

                    let err = ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message: body,
                    };

                    if !status.is_server_error() {
                        // Client error - don't retry
                        error!("Ollama API error: {}", err);
                        return Err(err);
                    }

                    error!("Ollama API error: {} - attempt {}/{}", err, attempt + 1, self.max_retries + 1);
                    last_error = Some(err);
                }
                Err(e) => {
                    let err = if e.is_connect() || e.is_timeout() {
                        ProviderError::ConnectionError(e.to_string())
                    } else {
                        ProviderError::RequestFailed(e.to_string())
                    };
                    error!("Ollama API network error: {} - attempt {}/{}", err, attempt + 1, self.max_retries + 1);
                    last_error = Some(err);
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_delay_ms(attempt);
                warn!("Retrying Ollama request in {}ms", backoff_ms);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        response["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Parse a chat response body.
///
/// Accepts a single JSON object, or JSONL streaming chunks whose message
/// contents are concatenated.
pub fn parse_chat_response(body: &str) -> Result<ChatResponse, ProviderError> {
    match serde_json::from_str::<ChatResponse>(body) {
        Ok(response) => Ok(response),
        Err(e) => {
            debug!(
                "Ollama chat response is not a single object ({}); trying JSONL. First 500 chars: {}",
                e,
                body.chars().take(500).collect::<String>()
            );

            let chunks: Vec<serde_json::Value> = body
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect();

            let Some(last) = chunks.last() else {
                return Err(ProviderError::ParseError(format!(
                    "Failed to parse Ollama API chat response: {}",
                    e
                )));
            };

            let content: String = chunks
                .iter()
                .filter_map(|chunk| chunk.get("message")?.get("content")?.as_str())
                .collect();

            Ok(ChatResponse {
                model: last.get("model").and_then(|v| v.as_str()).unwrap_or("unknown").to_string(),
                created_at: last.get("created_at").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content,
                },
                done: last.get("done").and_then(|v| v.as_bool()).unwrap_or(true),
                prompt_eval_count: last.get("prompt_eval_count").and_then(|v| v.as_u64()),
                eval_count: last.get("eval_count").and_then(|v| v.as_u64()),
            })
        }
    }
}

/// Fill `{source_language}` / `{target_language}` placeholders in a prompt
pub fn build_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    let source_name = language_utils::describe_language(source_language);
    let target_name = language_utils::describe_language(target_language);

    template
        .replace("{source_language}", &source_name)
        .replace("{target_language}", &target_name)
}

/// [`Translator`] backed by an Ollama chat model
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: Ollama,
    model: String,
    system_prompt: String,
    temperature: f32,
    keep_alive: Option<String>,
}

impl OllamaTranslator {
    pub fn new(client: Ollama, model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature: 0.3,
            keep_alive: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: Option<String>) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Build a translator for the configured language pair
    pub fn from_config(config: &Config) -> Self {
        let backend: &OllamaConfig = &config.backend;
        let client = Ollama::new_with_config(
            backend.endpoint.clone(),
            backend.timeout_secs,
            backend.retry_count,
            backend.retry_backoff_ms,
        );
        let system_prompt = build_system_prompt(
            &backend.system_prompt,
            &config.source_language,
            &config.target_language,
        );

        Self::new(client, backend.model.clone(), system_prompt)
            .with_temperature(backend.temperature)
            .with_keep_alive(backend.keep_alive.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Check that the server answers before starting a long run
    pub async fn test_connection(&self) -> Result<String, ProviderError> {
        self.client.version().await
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        let request = ChatRequest::new(
            self.model.clone(),
            vec![ChatMessage::system(self.system_prompt.clone()), ChatMessage::user(text)],
        )
        .temperature(self.temperature);

        match &self.keep_alive {
            Some(keep_alive) => request.keep_alive(keep_alive.clone()),
            None => request,
        }
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let response = self.client.chat(&self.build_request(text)).await?;
        debug!(
            "Ollama answered ({:?} prompt tokens, {:?} completion tokens)",
            response.prompt_eval_count, response.eval_count
        );
        Ok(response.message.content.trim().to_string())
    }
}
