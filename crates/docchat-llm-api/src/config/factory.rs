use std::sync::Arc;

use docchat_logging::RequestLogger;

use crate::client::{gemini::GeminiClient, openai_compat::OpenAiCompatClient, CompletionProvider, DocumentExtractor};
use crate::config::{normalize_api_url, Attribution, BackendType, ProviderConfig};

/// Client factory for creating provider clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create a completion client for the backend named in `config`
    ///
    /// # Arguments
    /// * `config` - Provider descriptor (backend, URL, credential, model)
    /// * `http` - Shared HTTP client; carries the request timeout
    /// * `attribution` - Referer/title headers for OpenAI-compatible backends
    /// * `logger` - Optional on-disk request logger
    pub fn create(
        config: &ProviderConfig,
        http: reqwest::Client,
        attribution: &Attribution,
        logger: Option<RequestLogger>,
    ) -> Arc<dyn CompletionProvider> {
        match config.backend {
            BackendType::OpenAiCompatible => {
                let url = normalize_api_url(&config.api_url);
                Arc::new(
                    OpenAiCompatClient::new(
                        config.id.to_string(),
                        config.api_key.clone(),
                        config.model.clone(),
                        url,
                        http,
                    )
                    .with_generation(config.temperature, config.max_tokens)
                    .with_attribution(attribution.clone())
                    .with_request_logger(logger),
                )
            }
            BackendType::Gemini => Arc::new(
                GeminiClient::new(
                    config.id.to_string(),
                    config.api_key.clone(),
                    config.model.clone(),
                    config.api_url.clone(),
                    http,
                )
                .with_request_logger(logger),
            ),
        }
    }

    /// Create the document extractor (always Gemini, which accepts inline PDFs)
    pub fn create_extractor(
        api_key: String,
        model: String,
        api_url: String,
        http: reqwest::Client,
        logger: Option<RequestLogger>,
    ) -> Arc<dyn DocumentExtractor> {
        Arc::new(
            GeminiClient::new("ingestion".to_string(), api_key, model, api_url, http)
                .with_request_logger(logger),
        )
    }
}
