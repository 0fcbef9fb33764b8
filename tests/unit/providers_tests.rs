/*!
 * Tests for translation backends
 */

use std::sync::Arc;
use vtt_translate::app_config::Config;
use vtt_translate::errors::ProviderError;
use vtt_translate::providers::mock::MockTranslator;
use vtt_translate::providers::ollama::{Ollama, OllamaTranslator};
use vtt_translate::providers::{FnTranslator, Translator, identity};

use crate::common::fake_ollama::{CannedResponse, FakeOllama};

fn translator_for(server: &FakeOllama, max_retries: u32) -> OllamaTranslator {
    let client = Ollama::new_with_config(server.url(), 5, max_retries, 1);
    OllamaTranslator::new(client, "llama3", "Translate English to French.")
}

#[tokio::test]
async fn test_identity_shouldReturnInput() {
    assert_eq!(identity().translate("Hello").await.unwrap(), "Hello");
}

#[tokio::test]
async fn test_fnTranslator_shouldWrapClosure() {
    let translator = FnTranslator::new(|text: &str| Ok(text.to_uppercase()));
    assert_eq!(translator.translate("shout").await.unwrap(), "SHOUT");
}

#[tokio::test]
async fn test_traitObjects_shouldDelegate() {
    let boxed: Box<dyn Translator> = Box::new(MockTranslator::working());
    let shared: Arc<dyn Translator> = Arc::new(MockTranslator::echo());

    assert_eq!(boxed.translate("a").await.unwrap(), "[TRANSLATED] a");
    assert_eq!(shared.translate("b").await.unwrap(), "b");
}

#[test]
fn test_fromConfig_shouldApplyPromptTemplate() {
    let translator = OllamaTranslator::from_config(&Config::default());

    assert_eq!(translator.model(), "llama3");
    assert!(translator.system_prompt().contains("translates English to Portuguese (BR)"));
    assert!(translator.system_prompt().contains("ONLY the translated text"));
}

#[tokio::test]
async fn test_ollamaTranslator_shouldSendChatRequestAndTrimAnswer() {
    let server = FakeOllama::start(vec![CannedResponse::chat("  Bonjour le monde\n")]).await;
    let translator = translator_for(&server, 0).with_temperature(0.2);

    let answer = translator.translate("Hello world").await.unwrap();
    assert_eq!(answer, "Bonjour le monde");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].0.starts_with("POST /api/chat"));

    let body: serde_json::Value = serde_json::from_str(&requests[0].1).unwrap();
    assert_eq!(body["model"], "llama3");
    assert_eq!(body["stream"], false);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "Translate English to French.");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Hello world");
    assert!((body["options"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    assert!(body.get("keep_alive").is_none());
}

#[tokio::test]
async fn test_ollamaTranslator_withKeepAlive_shouldSendIt() {
    let server = FakeOllama::start(vec![CannedResponse::chat("Salut")]).await;
    let translator = translator_for(&server, 0).with_keep_alive(Some("10m".to_string()));

    translator.translate("Hi").await.unwrap();

    let body: serde_json::Value = serde_json::from_str(&server.requests()[0].1).unwrap();
    assert_eq!(body["keep_alive"], "10m");
}

#[tokio::test]
async fn test_ollamaClient_withServerError_shouldRetryThenSucceed() {
    let server = FakeOllama::start(vec![
        CannedResponse::status(503, "loading model"),
        CannedResponse::chat("Merci"),
    ])
    .await;
    let translator = translator_for(&server, 2);

    assert_eq!(translator.translate("Thanks").await.unwrap(), "Merci");
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_ollamaClient_withClientError_shouldNotRetry() {
    let server = FakeOllama::start(vec![CannedResponse::status(404, r#"{"error":"model not found"}"#)]).await;
    let translator = translator_for(&server, 3);

    let result = translator.translate("Hello").await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 404, .. })));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_ollamaClient_withPersistentServerError_shouldGiveUpAfterRetries() {
    let server = FakeOllama::start(vec![CannedResponse::status(500, "boom")]).await;
    let translator = translator_for(&server, 2);

    let result = translator.translate("Hello").await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_ollamaClient_withNoServer_shouldReportConnectionError() {
    // Grab a free port, then close it again
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = Ollama::new_with_config(format!("http://127.0.0.1:{}", port), 2, 0, 1);
    let translator = OllamaTranslator::new(client, "llama3", "prompt");

    let result = translator.translate("Hello").await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

#[tokio::test]
async fn test_ollamaTranslator_testConnection_shouldReturnVersion() {
    let server = FakeOllama::start(vec![CannedResponse::status(200, r#"{"version":"0.1.32"}"#)]).await;
    let translator = translator_for(&server, 0);

    assert_eq!(translator.test_connection().await.unwrap(), "0.1.32");
    assert!(server.requests()[0].0.starts_with("GET /api/version"));
}

#[tokio::test]
async fn test_mockTranslator_withScriptedResponse_shouldOverrideBehavior() {
    let mock = MockTranslator::failing().with_response("Hello", "Hola");

    assert_eq!(mock.translate("Hello").await.unwrap(), "Hola");
    assert!(mock.translate("Other").await.is_err());
    assert_eq!(mock.requests(), vec!["Hello", "Other"]);
}
