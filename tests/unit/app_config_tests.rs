/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::str::FromStr;
use vtt_translate::app_config::{Config, FailurePolicy, LogLevel, MAX_RETRY_BACKOFF_MS};

use crate::common;

#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt-BR");
    assert_eq!(config.backend.model, "llama3");
    assert_eq!(config.backend.endpoint, "http://127.0.0.1:11434");
    assert_eq!(config.engine.failure_policy, FailurePolicy::Abort);
    assert!(config.engine.concurrent_requests >= 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "xx-invalid".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.engine.concurrent_requests = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let mut config = Config::default();
    config.backend.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    config.backend.endpoint = "ftp://127.0.0.1:11434".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withHugeRetryBackoff_shouldFail() {
    let mut config = Config::default();
    config.backend.retry_backoff_ms = MAX_RETRY_BACKOFF_MS;
    assert!(config.validate().is_ok());

    config.backend.retry_backoff_ms = u64::MAX;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyModel_shouldFail() {
    let mut config = Config::default();
    config.backend.model = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.backend.model, Config::default().backend.model);
    let reloaded = Config::load(&path)?;
    assert_eq!(reloaded.target_language, config.target_language);
    Ok(())
}

#[test]
fn test_load_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "target_language": "fr", "engine": { "failure_policy": "keep_original" }, "log_level": "debug" }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.source_language, "en");
    assert_eq!(config.engine.failure_policy, FailurePolicy::KeepOriginal);
    assert!(config.engine.cache_enabled);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.backend.retry_count, 3);
    Ok(())
}

#[test]
fn test_load_withMalformedJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn test_failurePolicy_fromStr_shouldAcceptBothSpellings() {
    assert_eq!(FailurePolicy::from_str("abort").unwrap(), FailurePolicy::Abort);
    assert_eq!(FailurePolicy::from_str("keep-original").unwrap(), FailurePolicy::KeepOriginal);
    assert_eq!(FailurePolicy::from_str("KEEP_ORIGINAL").unwrap(), FailurePolicy::KeepOriginal);
    assert!(FailurePolicy::from_str("retry").is_err());
    assert_eq!(FailurePolicy::KeepOriginal.to_string(), "keep_original");
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(log::LevelFilter::from(&LogLevel::Warn), log::LevelFilter::Warn);
    assert_eq!(log::LevelFilter::from(&LogLevel::Trace), log::LevelFilter::Trace);
}
