use serde::{Deserialize, Serialize};

use docchat_chat::{DispatchOutcome, ExtractedDocument, SlotRole};
use docchat_types::{ChatTurn, DailyQuota, ProviderId, UsageSnapshot};

/// Body of `POST /chat`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub chat_history: Option<Vec<ChatTurn>>,
    /// Text extracted from the uploaded document, if any
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub provider: ProviderId,
    pub provider_name: String,
    pub fallback_used: bool,
    pub usage: UsageSnapshot,
}

impl From<DispatchOutcome> for ChatResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        let fallback_used = outcome.fallback_used();
        Self {
            response: outcome.response,
            provider: outcome.provider,
            provider_name: outcome.provider_name,
            fallback_used,
            usage: outcome.usage,
        }
    }
}

/// Query string of `POST /api/upload-pdf`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(default, alias = "fileName")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub document: ExtractedDocument,
}

/// One provider's standing for today
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUsage {
    pub id: ProviderId,
    pub name: String,
    pub role: SlotRole,
    pub quota: DailyQuota,
    pub used: u64,
}

/// Body of `GET /api/usage`
#[derive(Debug, Clone, Serialize)]
pub struct UsageResponse {
    pub usage: UsageSnapshot,
    pub providers: Vec<ProviderUsage>,
}
