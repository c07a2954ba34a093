mod fixtures;

use docchat_llm_api::{CompletionProvider, CompletionRequest, DocumentExtractor, GeminiClient, ProviderError};
use fixtures::{ProviderMockServer, TEST_API_KEY};
use pretty_assertions::assert_eq;

const MODEL: &str = "gemini-2.0-flash-exp";

fn client_for(server: &ProviderMockServer, api_key: &str) -> GeminiClient {
    GeminiClient::new(
        "gemini".to_string(),
        api_key.to_string(),
        MODEL.to_string(),
        format!("{}/", server.uri()),
        reqwest::Client::new(),
    )
}

fn sample_request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![],
        prompt: "RULES:\n1. Be brief.\n\nUser: Hi\nAssistant:".to_string(),
    }
}

#[tokio::test]
async fn test_complete_sends_single_prompt() {
    let server = ProviderMockServer::new().await;
    server.mock_gemini_success(MODEL, "Hello there").await;

    let text = client_for(&server, TEST_API_KEY).complete(&sample_request()).await.unwrap();
    assert_eq!(text, "Hello there");

    let bodies = server.received_bodies().await;
    assert_eq!(
        bodies[0],
        serde_json::json!({
            "contents": [{
                "parts": [{"text": "RULES:\n1. Be brief.\n\nUser: Hi\nAssistant:"}],
                "role": "user"
            }]
        })
    );
}

#[tokio::test]
async fn test_error_status_is_status_error() {
    let server = ProviderMockServer::new().await;
    server.mock_gemini_error(MODEL, 503).await;

    let err = client_for(&server, TEST_API_KEY).complete(&sample_request()).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
}

#[tokio::test]
async fn test_blocked_response_is_malformed() {
    let server = ProviderMockServer::new().await;
    server.mock_gemini_blocked(MODEL).await;

    let err = client_for(&server, TEST_API_KEY).complete(&sample_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Malformed { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_missing_key_fails_without_request() {
    let server = ProviderMockServer::new().await;

    let err = client_for(&server, "  ").complete(&sample_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::NotConfigured { .. }), "got {:?}", err);
    assert!(server.received_bodies().await.is_empty());
}

#[tokio::test]
async fn test_extract_text_sends_inline_pdf() {
    let server = ProviderMockServer::new().await;
    server.mock_gemini_success(MODEL, "Chapter 1. Introduction").await;

    let text = client_for(&server, TEST_API_KEY)
        .extract_text("application/pdf", b"%PDF-1.4 test")
        .await
        .unwrap();
    assert_eq!(text, "Chapter 1. Introduction");

    let bodies = server.received_bodies().await;
    let parts = &bodies[0]["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
    assert_eq!(parts[0]["inlineData"]["data"], "JVBERi0xLjQgdGVzdA==");
    assert!(parts[1]["text"].as_str().unwrap().contains("Extract all of the text"));
}

#[tokio::test]
async fn test_transport_error_does_not_expose_key() {
    // Nothing listens on port 1
    let client = GeminiClient::new(
        "gemini".to_string(),
        "SECRET-KEY-123".to_string(),
        MODEL.to_string(),
        "http://127.0.0.1:1".to_string(),
        reqwest::Client::new(),
    );

    let err = client.complete(&sample_request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport { .. }), "got {:?}", err);
    assert!(!err.to_string().contains("SECRET-KEY-123"), "key leaked: {}", err);
    assert!(!format!("{:?}", err).contains("SECRET-KEY-123"), "key leaked: {:?}", err);
}
