use async_trait::async_trait;
use base64::Engine as _;
use docchat_logging::RequestLogger;
use serde::{Deserialize, Serialize};

use crate::client::{CompletionProvider, CompletionRequest, DocumentExtractor};
use crate::config::BackendType;
use crate::error::{ProviderError, ProviderResult};

/// Instruction sent alongside an inline document for text extraction
pub const EXTRACTION_INSTRUCTION: &str = "Extract all of the text in this document. \
Preserve headings, paragraphs and important information. \
Return only the text, without any commentary.";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<GenerateContentCandidate>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentCandidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    TextPart(TextPart),
    InlineDataPart(InlineDataPart),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPart {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataPart {
    pub inline_data: GenerativeContentBlob,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerativeContentBlob {
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.as_ref()?.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::TextPart(text) => Some(text.text.as_str()),
                Part::InlineDataPart(_) => None,
            })
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Google Gemini client for single-prompt generation and document extraction
pub struct GeminiClient {
    name: String,
    api_key: String,
    model: String,
    api_url: String,
    client: reqwest::Client,
    logger: Option<RequestLogger>,
}

impl GeminiClient {
    pub fn new(name: String, api_key: String, model: String, api_url: String, client: reqwest::Client) -> Self {
        // Ensure api_url doesn't end with a slash
        let api_url = api_url.trim_end_matches('/').to_string();
        Self {
            name,
            api_key,
            model,
            api_url,
            client,
            logger: None,
        }
    }

    pub fn with_request_logger(mut self, logger: Option<RequestLogger>) -> Self {
        self.logger = logger;
        self
    }

    fn generate_content_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_url,
            model,
            self.api_key.trim()
        )
    }

    /// Call `generateContent` on the configured model
    pub async fn generate_content(&self, request: &GenerateContentRequest) -> ProviderResult<GenerateContentResponse> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured {
                provider: self.name.clone(),
                reason: "missing Gemini API key".to_string(),
            });
        }

        let url = self.generate_content_url(&self.model);
        let body = serde_json::to_value(request)
            .map_err(|e| ProviderError::malformed(&self.name, format!("cannot encode request: {}", e)))?;

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log_request(&self.name, &self.model, &url, "", &body) {
                tracing::warn!(error = %e, "failed to write request log");
            }
        }

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
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

        serde_json::from_str(&response_text)
            .map_err(|e| ProviderError::malformed(&self.name, format!("invalid JSON: {}", e)))
    }

    fn require_text(&self, response: GenerateContentResponse) -> ProviderResult<String> {
        response
            .text()
            .ok_or_else(|| ProviderError::malformed(&self.name, "no text in candidates[0].content"))
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    fn backend(&self) -> BackendType {
        BackendType::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::TextPart(TextPart {
                    text: request.prompt.clone(),
                })],
                role: Some(Role::User),
            }],
        };

        let response = self.generate_content(&request).await?;
        self.require_text(response)
    }
}

#[async_trait]
impl DocumentExtractor for GeminiClient {
    async fn extract_text(&self, mime_type: &str, bytes: &[u8]) -> ProviderResult<String> {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        tracing::debug!(encoded_len = data.len(), mime_type, "sending document for extraction");

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineDataPart(InlineDataPart {
                        inline_data: GenerativeContentBlob {
                            mime_type: mime_type.to_string(),
                            data,
                        },
                    }),
                    Part::TextPart(TextPart {
                        text: EXTRACTION_INSTRUCTION.to_string(),
                    }),
                ],
                role: Some(Role::User),
            }],
        };

        let response = self.generate_content(&request).await?;
        self.require_text(response)
    }
}
