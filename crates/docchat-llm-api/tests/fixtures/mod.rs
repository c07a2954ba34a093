#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const CHAT_PATH: &str = "/api/v1/chat/completions";

/// Mock server utilities for testing provider clients
pub struct ProviderMockServer {
    server: MockServer,
}

impl ProviderMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.server.uri(), CHAT_PATH)
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mock a successful OpenAI-compatible completion
    pub async fn mock_chat_success(&self, response_content: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "gen-test123",
                "object": "chat.completion",
                "model": "mistralai/mistral-small",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": response_content},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock an OpenAI-compatible error response
    pub async fn mock_chat_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": message, "code": status}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock an OpenAI-compatible 200 response without choices
    pub async fn mock_chat_empty_choices(&self) {
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful Gemini generateContent call
    pub async fn mock_gemini_success(&self, model: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", model)))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": text}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 7}
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a Gemini error status
    pub async fn mock_gemini_error(&self, model: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", model)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"code": status, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a Gemini response blocked before producing text
    pub async fn mock_gemini_blocked(&self, model: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", model)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "SAFETY"}],
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Requests received so far, as JSON bodies
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
