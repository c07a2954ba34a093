use std::fmt;

use docchat_types::{DailyQuota, ProviderId};

use crate::client::openai_compat::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

pub mod factory;
pub use factory::ClientFactory;

/// Wire protocol spoken by an upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `POST .../chat/completions` with a message list and bearer token
    OpenAiCompatible,
    /// Gemini `generateContent` with a single composed prompt
    Gemini,
}

impl BackendType {
    /// Parse backend type from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "openai-compatible" | "openai_compatible" | "openrouter" | "groq" | "llama"
            | "llamacpp" | "llama.cpp" => Some(Self::OpenAiCompatible),
            "gemini" | "google" | "google-ai" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAiCompatible => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default OpenRouter chat completions URL
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default Gemini API base URL
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Get the default URL for a given backend type
pub fn get_default_url_for_backend(backend: &BackendType) -> String {
    match backend {
        BackendType::OpenAiCompatible => OPENROUTER_API_URL.to_string(),
        BackendType::Gemini => GEMINI_API_URL.to_string(),
    }
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") || url.contains("/chat") {
        return url.to_string();
    }

    // If URL ends with a slash, append path without leading slash
    if url.ends_with('/') {
        format!("{}v1/chat/completions", url)
    } else {
        // Append the standard OpenAI-compatible path
        format!("{}/v1/chat/completions", url)
    }
}

/// Headers OpenRouter uses to attribute traffic to an application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribution {
    pub referer: Option<String>,
    pub title: Option<String>,
}

/// Static descriptor of one upstream provider
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub id: ProviderId,
    pub display_name: String,
    pub backend: BackendType,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub daily_quota: DailyQuota,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Quota-limited primary: Mistral Small through OpenRouter
    pub fn default_primary() -> Self {
        Self {
            id: ProviderId::from("mistral"),
            display_name: "Mistral Small 24B".to_string(),
            backend: BackendType::OpenAiCompatible,
            api_url: OPENROUTER_API_URL.to_string(),
            api_key: String::new(),
            model: "mistralai/mistral-small".to_string(),
            daily_quota: DailyQuota::Limited(10_000),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Unlimited fallback: Gemini Flash
    pub fn default_fallback() -> Self {
        Self {
            id: ProviderId::from("gemini"),
            display_name: "Gemini 2.0 Flash".to_string(),
            backend: BackendType::Gemini,
            api_url: GEMINI_API_URL.to_string(),
            api_key: String::new(),
            model: "gemini-2.0-flash-exp".to_string(),
            daily_quota: DailyQuota::Unlimited,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<unset>".to_string()
        } else {
            docchat_logging::mask_secret(&self.api_key)
        };
        f.debug_struct("ProviderConfig")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("backend", &self.backend)
            .field("api_url", &self.api_url)
            .field("api_key", &api_key)
            .field("model", &self.model)
            .field("daily_quota", &self.daily_quota)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
