use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        DefaultBodyLimit, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use docchat_chat::{ingest_pdf, DispatchError, Dispatcher, IngestError, SlotRole};
use docchat_llm_api::{DocumentExtractor, ProviderError};

use crate::web::protocol::{
    ChatRequest, ChatResponse, ProviderUsage, UploadQuery, UploadResponse, UsageResponse,
};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// `None` when no ingestion credential is configured
    pub extractor: Option<Arc<dyn DocumentExtractor>>,
    pub max_upload_bytes: usize,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    // Leave room for the handler to report oversized uploads itself
    let upload_limit = state.max_upload_bytes.saturating_add(1);

    Router::new()
        .route("/chat", post(chat))
        .route("/api/chat", post(chat))
        .route(
            "/api/upload-pdf",
            post(upload_pdf).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/usage", get(usage))
        .route("/health", get(health))
        .with_state(state)
}

/// POST /chat - Answer a message, optionally grounded in document text
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let message = request.message.unwrap_or_default();
    let history = request.chat_history.unwrap_or_default();

    let outcome = state
        .dispatcher
        .dispatch(&message, &history, request.context.as_deref())
        .await?;

    Ok(Json(ChatResponse::from(outcome)))
}

/// POST /api/upload-pdf?filename=<name>.pdf - Extract text from raw PDF bytes
async fn upload_pdf(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let body = body.map_err(|rejection| AppError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let extractor = state.extractor.as_ref().ok_or(AppError::IngestionUnavailable)?;

    let document = ingest_pdf(
        &**extractor,
        query.filename.as_deref().unwrap_or_default(),
        &body,
        state.max_upload_bytes,
    )
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        document,
    }))
}

/// GET /api/usage - Today's counters and each provider's quota
async fn usage(State(state): State<AppState>) -> Json<UsageResponse> {
    let usage = state.dispatcher.usage().await;

    let providers = [SlotRole::Primary, SlotRole::Fallback]
        .into_iter()
        .map(|role| {
            let slot = state.dispatcher.slot(role);
            ProviderUsage {
                id: slot.id().clone(),
                name: slot.config.display_name.clone(),
                role,
                quota: slot.config.daily_quota,
                used: usage.count(slot.id()),
            }
        })
        .collect();

    Json(UsageResponse { usage, providers })
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Error type for handlers; rendered as `{"error", "status"}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("PDF text extraction is not configured; set GEMINI_API_KEY or DOCCHAT_INGESTION_KEY")]
    IngestionUnavailable,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Dispatch(DispatchError::MissingMessage) => StatusCode::BAD_REQUEST,
            AppError::Dispatch(DispatchError::AllProvidersFailed { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Ingest(err) => match err {
                IngestError::MissingFileName | IngestError::NotPdf(_) | IngestError::EmptyFile => {
                    StatusCode::BAD_REQUEST
                }
                IngestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                IngestError::InsufficientText { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                IngestError::Extraction(ProviderError::NotConfigured { .. }) => StatusCode::SERVICE_UNAVAILABLE,
                IngestError::Extraction(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::IngestionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "request rejected");
        }

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
