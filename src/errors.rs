/*!
 * Error types for the vtt-translate application.
 *
 * Parsing WebVTT never fails, so every error here comes from the translation
 * backend or from the application shell around the engine.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered with nothing usable for a non-empty input
    #[error("Backend returned an empty translation")]
    EmptyResponse,
}

/// Errors raised while translating a document
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The backend failed for one cue; the whole document fails with it
    #[error("Translation backend failed on cue {cue_index}: {source}")]
    Backend {
        /// Zero-based position of the cue among the document's cues
        cue_index: usize,
        /// Underlying backend failure, unchanged
        #[source]
        source: ProviderError,
    },
}

impl TranslationError {
    /// Index of the cue that caused the failure
    pub fn cue_index(&self) -> usize {
        match self {
            Self::Backend { cue_index, .. } => *cue_index,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
