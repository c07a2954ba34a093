use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::get_logs_dir;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Mask a credential, keeping only its first 10 characters
pub fn mask_secret(secret: &str) -> String {
    format!("{}***", secret.chars().take(10).collect::<String>())
}

/// Render a URL with any `key` query parameter masked
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return url.to_string();
    };

    if parsed.query_pairs().any(|(name, _)| name == "key") {
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(name, value)| {
                let value = if name == "key" { mask_secret(&value) } else { value.into_owned() };
                (name.into_owned(), value)
            })
            .collect();
        parsed.query_pairs_mut().clear().extend_pairs(pairs);
    }

    parsed.to_string()
}

/// Writes upstream HTTP traffic to timestamped files for persistent debugging
#[derive(Debug, Clone)]
pub struct RequestLogger {
    dir: PathBuf,
}

impl RequestLogger {
    /// Create a logger writing into `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create request log directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Create a logger writing into ~/.docchat/logs
    pub fn in_default_dir() -> Result<Self> {
        Self::new(get_logs_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, kind: &str, provider: &str, model: &str) -> PathBuf {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let model_name = model.replace(['/', ':'], "-");
        self.dir
            .join(format!("{}-{}-{}-{}-{}.txt", kind, timestamp, seq, provider, model_name))
    }

    /// Log an outgoing request body
    pub fn log_request(
        &self,
        provider: &str,
        model: &str,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<PathBuf> {
        let file_path = self.file_path("req", provider, model);

        let mut log_content = String::new();
        log_content.push_str("HTTP REQUEST LOG\n");
        log_content.push_str("================\n\n");
        log_content.push_str(&format!("Timestamp: {}\n", Utc::now().to_rfc3339()));
        log_content.push_str(&format!("Provider: {}\n", provider));
        log_content.push_str(&format!("Model: {}\n\n", model));

        // Parse URL to show host and port
        if let Ok(parsed_url) = reqwest::Url::parse(url) {
            log_content.push_str(&format!("URL: {}\n", redact_url(url)));
            log_content.push_str(&format!("Host: {}\n", parsed_url.host_str().unwrap_or("unknown")));
            log_content.push_str(&format!(
                "Port: {}\n",
                parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                    if parsed_url.scheme() == "https" {
                        "443 (default)".to_string()
                    } else {
                        "80 (default)".to_string()
                    }
                })
            ));
            log_content.push_str(&format!("Scheme: {}\n\n", parsed_url.scheme()));
        } else {
            log_content.push_str(&format!("URL: {}\n\n", url));
        }

        log_content.push_str("Headers:\n");
        log_content.push_str("  Content-Type: application/json\n");
        if !api_key.is_empty() {
            log_content.push_str(&format!("  Authorization: Bearer {}\n", mask_secret(api_key)));
        }
        log_content.push('\n');

        log_content.push_str("Request Body:\n");
        match serde_json::to_string_pretty(body) {
            Ok(json) => {
                log_content.push_str(&json);
                log_content.push('\n');
            }
            Err(e) => {
                log_content.push_str(&format!("Error serializing request: {}\n", e));
            }
        }

        fs::write(&file_path, log_content)
            .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

        tracing::debug!(path = %file_path.display(), "request logged");
        Ok(file_path)
    }

    /// Log a response status and raw body
    pub fn log_response(
        &self,
        provider: &str,
        model: &str,
        status: reqwest::StatusCode,
        body: &str,
    ) -> Result<PathBuf> {
        let file_path = self.file_path("resp", provider, model);

        let mut log_content = String::new();
        log_content.push_str("HTTP RESPONSE LOG\n");
        log_content.push_str("=================\n\n");
        log_content.push_str(&format!("Timestamp: {}\n", Utc::now().to_rfc3339()));
        log_content.push_str(&format!("Provider: {}\n", provider));
        log_content.push_str(&format!("Model: {}\n", model));
        log_content.push_str(&format!("Status: {}\n\n", status));
        log_content.push_str("Response Body:\n");

        // Pretty-print JSON bodies, keep anything else verbatim
        match serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
        {
            Some(pretty) => log_content.push_str(&pretty),
            None => log_content.push_str(body),
        }
        log_content.push('\n');

        fs::write(&file_path, log_content)
            .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

        tracing::debug!(path = %file_path.display(), "response logged");
        Ok(file_path)
    }
}
