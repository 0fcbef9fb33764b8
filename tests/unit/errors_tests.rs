/*!
 * Tests for error types
 */

use std::error::Error;
use vtt_translate::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_providerError_display_shouldDescribeFailure() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "model is loading".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - model is loading");
    assert_eq!(ProviderError::EmptyResponse.to_string(), "Backend returned an empty translation");
}

#[test]
fn test_translationError_shouldCarryCueIndexAndSource() {
    let error = TranslationError::Backend {
        cue_index: 4,
        source: ProviderError::ConnectionError("refused".to_string()),
    };

    assert_eq!(error.cue_index(), 4);
    assert!(error.to_string().contains("cue 4"));

    let source = error.source().expect("backend error keeps its source");
    assert_eq!(source.to_string(), "Connection error: refused");
}

#[test]
fn test_appError_fromConversions_shouldWrapErrors() {
    let from_provider: AppError = ProviderError::RequestFailed("timeout".to_string()).into();
    assert!(matches!(from_provider, AppError::Provider(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.vtt").into();
    assert!(matches!(from_io, AppError::File(msg) if msg.contains("missing.vtt")));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(msg) if msg == "something odd"));

    let translation = TranslationError::Backend {
        cue_index: 0,
        source: ProviderError::EmptyResponse,
    };
    let from_translation: AppError = translation.into();
    assert!(from_translation.to_string().starts_with("Translation error:"));
}
