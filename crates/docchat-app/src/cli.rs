use clap::Parser;
use docchat_types::DailyQuota;
use std::path::PathBuf;

/// CLI arguments for docchat-server
///
/// Every value is optional here; anything left unset falls through to the
/// environment, then the config file, then built-in defaults.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "docchat-server")]
#[command(about = "docchat - document-grounded chat backend with quota-based provider fallback")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (default: ./docchat.toml if present)
    #[arg(long, short = 'c', value_name = "PATH", env = "DOCCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(long, value_name = "ADDR", env = "DOCCHAT_BIND")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p', env = "DOCCHAT_PORT")]
    pub port: Option<u16>,

    /// Serve static files from this directory for unmatched paths
    #[arg(long, value_name = "DIR", env = "DOCCHAT_WEB_DIR")]
    pub web_dir: Option<PathBuf>,

    /// Timeout for each upstream HTTP request, in seconds
    #[arg(long, value_name = "SECS", env = "DOCCHAT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Largest accepted PDF upload, in megabytes
    #[arg(long, value_name = "MB", env = "DOCCHAT_MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<u64>,

    /// Write every upstream request and response to the logs directory
    #[arg(long)]
    pub log_requests: bool,

    /// Directory for request logs (default: ~/.docchat/logs)
    #[arg(long, value_name = "DIR", env = "DOCCHAT_LOGS_DIR")]
    pub logs_dir: Option<PathBuf>,

    /// Public URL of the site, sent as HTTP-Referer to OpenAI-compatible backends
    #[arg(long, value_name = "URL", env = "DOCCHAT_SITE_URL")]
    pub site_url: Option<String>,

    /// Persona instruction placed at the top of every prompt
    #[arg(long, value_name = "TEXT", env = "DOCCHAT_PERSONA")]
    pub persona: Option<String>,

    /// Language every answer must be written in
    #[arg(long, value_name = "LANGUAGE", env = "DOCCHAT_LANGUAGE")]
    pub language: Option<String>,

    /// Backend type for the primary provider (openai, openrouter, gemini)
    #[arg(long, value_name = "BACKEND")]
    pub primary_backend: Option<String>,

    /// API URL for the primary provider
    #[arg(long, value_name = "URL")]
    pub primary_url: Option<String>,

    /// API key for the primary provider
    #[arg(long, value_name = "KEY")]
    pub primary_key: Option<String>,

    /// Model name for the primary provider
    #[arg(long, value_name = "MODEL")]
    pub primary_model: Option<String>,

    /// Daily request quota for the primary provider (a number or "unlimited")
    #[arg(long, value_name = "N")]
    pub primary_quota: Option<DailyQuota>,

    /// Display name reported for the primary provider
    #[arg(long, value_name = "NAME")]
    pub primary_name: Option<String>,

    /// Backend type for the fallback provider (openai, openrouter, gemini)
    #[arg(long, value_name = "BACKEND")]
    pub fallback_backend: Option<String>,

    /// API URL for the fallback provider
    #[arg(long, value_name = "URL")]
    pub fallback_url: Option<String>,

    /// API key for the fallback provider
    #[arg(long, value_name = "KEY")]
    pub fallback_key: Option<String>,

    /// Model name for the fallback provider
    #[arg(long, value_name = "MODEL")]
    pub fallback_model: Option<String>,

    /// Daily request quota for the fallback provider; must be "unlimited"
    #[arg(long, value_name = "N")]
    pub fallback_quota: Option<DailyQuota>,

    /// Display name reported for the fallback provider
    #[arg(long, value_name = "NAME")]
    pub fallback_name: Option<String>,
}

/// The per-slot flags of one provider
#[derive(Debug, Default, Clone)]
pub struct SlotArgs {
    pub backend: Option<String>,
    pub url: Option<String>,
    pub key: Option<String>,
    pub model: Option<String>,
    pub quota: Option<DailyQuota>,
    pub name: Option<String>,
}

impl Cli {
    pub fn primary_args(&self) -> SlotArgs {
        SlotArgs {
            backend: self.primary_backend.clone(),
            url: self.primary_url.clone(),
            key: self.primary_key.clone(),
            model: self.primary_model.clone(),
            quota: self.primary_quota,
            name: self.primary_name.clone(),
        }
    }

    pub fn fallback_args(&self) -> SlotArgs {
        SlotArgs {
            backend: self.fallback_backend.clone(),
            url: self.fallback_url.clone(),
            key: self.fallback_key.clone(),
            model: self.fallback_model.clone(),
            quota: self.fallback_quota,
            name: self.fallback_name.clone(),
        }
    }
}
