use async_trait::async_trait;
use docchat_logging::RequestLogger;
use serde::Deserialize;

use crate::client::{CompletionProvider, CompletionRequest};
use crate::config::{Attribution, BackendType};
use crate::error::{ProviderError, ProviderResult};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 512;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completion client for OpenAI-compatible endpoints (OpenRouter, Groq, llama.cpp, ...)
pub struct OpenAiCompatClient {
    name: String,
    api_key: String,
    model: String,
    api_url: String,
    temperature: f32,
    max_tokens: u32,
    attribution: Attribution,
    client: reqwest::Client,
    logger: Option<RequestLogger>,
}

impl OpenAiCompatClient {
    pub fn new(name: String, api_key: String, model: String, api_url: String, client: reqwest::Client) -> Self {
        Self {
            name,
            api_key,
            model,
            api_url,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            attribution: Attribution::default(),
            client,
            logger: None,
        }
    }

    pub fn with_generation(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn with_request_logger(mut self, logger: Option<RequestLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn build_chat_request(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    fn parse_completion(&self, response_text: &str) -> ProviderResult<String> {
        let chat_response: ChatCompletionResponse = serde_json::from_str(response_text)
            .map_err(|e| ProviderError::malformed(&self.name, format!("invalid JSON: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty());

        content.ok_or_else(|| ProviderError::malformed(&self.name, "no content in choices[0].message"))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatClient {
    fn backend(&self) -> BackendType {
        BackendType::OpenAiCompatible
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let api_request = self.build_chat_request(request);

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log_request(&self.name, &self.model, &self.api_url, &self.api_key, &api_request) {
                tracing::warn!(error = %e, "failed to write request log");
            }
        }

        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json");
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key.trim()));
        }
        if let Some(referer) = &self.attribution.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.attribution.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(&self.name, e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(&self.name, e))?;

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log_response(&self.name, &self.model, status, &response_text) {
                tracing::warn!(error = %e, "failed to write response log");
            }
        }

        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: self.name.clone(),
                status,
                body: response_text,
            });
        }

        self.parse_completion(&response_text)
    }
}
