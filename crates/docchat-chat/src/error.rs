use docchat_llm_api::ProviderError;
use docchat_types::ProviderId;
use thiserror::Error;

/// A failed upstream call, tagged with the provider it went to
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ProviderFailure {
    pub provider: ProviderId,
    pub error: ProviderError,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Rejected before any upstream call
    #[error("message is required")]
    MissingMessage,

    /// The selected provider and its fallback both failed
    #[error("all providers failed: {first}; {second}")]
    AllProvidersFailed {
        first: ProviderFailure,
        second: ProviderFailure,
    },
}

/// Invalid provider arrangement
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("fallback provider '{0}' must have an unlimited daily quota")]
    LimitedFallback(ProviderId),

    #[error("primary and fallback providers share the id '{0}'")]
    DuplicateProviderId(ProviderId),
}

/// Why an uploaded document produced no usable text
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file name is required")]
    MissingFileName,

    #[error("only PDF files can be uploaded (got '{0}')")]
    NotPdf(String),

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("uploaded file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("text extraction failed: {0}")]
    Extraction(#[from] ProviderError),

    #[error("not enough text could be extracted from the PDF ({chars} characters); make sure the file contains text")]
    InsufficientText { chars: usize },
}
