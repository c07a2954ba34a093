use thiserror::Error;

/// Why an upstream call produced no usable text
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never got an HTTP response (DNS, connect, timeout, ...)
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status
    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// A 2xx response without the expected fields
    #[error("{provider} returned a malformed response: {reason}")]
    Malformed { provider: String, reason: String },

    /// The client cannot make the call at all (e.g. missing credential)
    #[error("{provider} is not configured: {reason}")]
    NotConfigured { provider: String, reason: String },
}

impl ProviderError {
    /// The URL is dropped from `source` since it may carry a credential in its query
    pub(crate) fn transport(provider: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            source: source.without_url(),
        }
    }

    pub(crate) fn malformed(provider: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    /// Display name of the provider that failed
    pub fn provider(&self) -> &str {
        match self {
            Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::Malformed { provider, .. }
            | Self::NotConfigured { provider, .. } => provider,
        }
    }

    /// HTTP status reported by the upstream, if it answered at all
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
