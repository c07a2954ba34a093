// Logging module - upstream request/response debug logs
pub mod request_logger;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use request_logger::{mask_secret, redact_url, RequestLogger};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Get or create the base docchat directory (~/.docchat)
pub fn get_docchat_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let docchat_dir = PathBuf::from(home_dir).join(".docchat");

    if !docchat_dir.exists() {
        std::fs::create_dir_all(&docchat_dir).context("Failed to create docchat directory")?;
    }

    Ok(docchat_dir)
}

/// Get or create the logs directory (~/.docchat/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_docchat_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir).context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}
