use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BackendType;
use crate::error::ProviderResult;

pub mod gemini;
pub mod openai_compat;

/// Chat message structure (OpenAI-compatible format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// One conversation to complete, rendered in both shapes upstream APIs accept
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Role-tagged messages for chat-completion endpoints
    pub messages: Vec<ChatMessage>,
    /// The same conversation flattened into a single prompt string
    pub prompt: String,
}

/// A text-generation backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn backend(&self) -> BackendType;

    fn model(&self) -> &str;

    /// Produce a single completion for `request`
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String>;
}

/// Turns an uploaded document into plain text
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, mime_type: &str, bytes: &[u8]) -> ProviderResult<String>;
}
