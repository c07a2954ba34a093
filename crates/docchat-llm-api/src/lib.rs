//! # docchat-llm-api
//!
//! Clients for the upstream text-generation backends docchat talks to:
//! - OpenAI-compatible chat completion endpoints (OpenRouter, Groq, llama.cpp, ...)
//! - Google Gemini `generateContent`
//!
//! ## Features
//!
//! - **Unified Interface**: a single `CompletionProvider` trait for every backend
//! - **Document Ingestion**: `DocumentExtractor` turns PDF bytes into plain text
//! - **Typed Failures**: `ProviderError` separates transport, status and malformed-response failures
//! - **Request Logging**: optional on-disk request/response logs via `docchat-logging`
//!
//! ## Example
//!
//! ```rust,no_run
//! use docchat_llm_api::{Attribution, ClientFactory, CompletionRequest, ChatMessage, ProviderConfig};
//!
//! # async fn run() -> Result<(), docchat_llm_api::ProviderError> {
//! let config = ProviderConfig::default_primary();
//! let client = ClientFactory::create(&config, reqwest::Client::new(), &Attribution::default(), None);
//!
//! let request = CompletionRequest {
//!     messages: vec![ChatMessage::user("Hello!")],
//!     prompt: "User: Hello!\nAssistant:".to_string(),
//! };
//! let text = client.complete(&request).await?;
//! println!("Response: {}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use client::{
    ChatMessage,
    CompletionProvider,
    CompletionRequest,
    DocumentExtractor,
    gemini::GeminiClient,
    openai_compat::OpenAiCompatClient,
};

pub use config::{
    Attribution,
    BackendType,
    ClientFactory,
    ProviderConfig,
    GEMINI_API_URL,
    OPENROUTER_API_URL,
    normalize_api_url,
    get_default_url_for_backend,
};

pub use error::{ProviderError, ProviderResult};
