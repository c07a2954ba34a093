use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use docchat_chat::PromptSettings;
use docchat_llm_api::{get_default_url_for_backend, Attribution, BackendType, ProviderConfig, GEMINI_API_URL};
use docchat_types::{DailyQuota, ProviderId};

use crate::cli::{Cli, SlotArgs};

pub mod helpers;

use helpers::{default_model_for_backend, get_slot_config_from_env, legacy_key_var, EnvLookup, SlotEnv};

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 20;
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_INGESTION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_CONFIG_FILE: &str = "docchat.toml";
pub const APP_TITLE: &str = "docchat";

/// Contents of `docchat.toml`
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub prompt: PromptSection,
    pub primary: SlotSection,
    pub fallback: SlotSection,
    pub ingestion: IngestionSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub web_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub max_upload_mb: Option<u64>,
    pub site_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptSection {
    pub persona: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlotSection {
    pub id: Option<String>,
    pub name: Option<String>,
    pub backend: Option<String>,
    pub url: Option<String>,
    pub key: Option<String>,
    pub model: Option<String>,
    pub quota: Option<DailyQuota>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestionSection {
    pub key: Option<String>,
    pub model: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub log_requests: Option<bool>,
    pub logs_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the file named on the command line, or `./docchat.toml` when it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Credentials and model for the PDF text extractor
#[derive(Clone, PartialEq)]
pub struct IngestionConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

impl IngestionConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for IngestionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionConfig")
            .field("configured", &self.is_configured())
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub web_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub attribution: Attribution,
    pub prompt: PromptSettings,
    pub primary: ProviderConfig,
    pub fallback: ProviderConfig,
    pub ingestion: IngestionConfig,
    pub log_requests: bool,
    pub logs_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Merge CLI flags, environment, config file and defaults, in that order of precedence
    pub fn resolve(cli: &Cli, file: &FileConfig, env: EnvLookup<'_>) -> Result<Self> {
        let server = &file.server;

        let bind = cli
            .bind
            .clone()
            .or_else(|| server.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let port = cli.port.or(server.port).unwrap_or(DEFAULT_PORT);
        let bind_ip: IpAddr = bind
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .with_context(|| format!("Invalid bind address {}", bind))?;
        let bind_addr = SocketAddr::new(bind_ip, port);

        let timeout_secs = cli
            .request_timeout_secs
            .or(server.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let upload_mb = cli
            .max_upload_mb
            .or(server.max_upload_mb)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        let site_url = cli
            .site_url
            .clone()
            .or_else(|| server.site_url.clone())
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        let default_prompt = PromptSettings::default();
        let prompt = PromptSettings {
            persona: cli
                .persona
                .clone()
                .or_else(|| file.prompt.persona.clone())
                .unwrap_or(default_prompt.persona),
            language: cli.language.clone().or_else(|| file.prompt.language.clone()),
        };

        let primary = resolve_slot(
            ProviderConfig::default_primary(),
            &cli.primary_args(),
            &get_slot_config_from_env("primary", env),
            &file.primary,
            env,
        )
        .context("Invalid primary provider configuration")?;
        let fallback = resolve_slot(
            ProviderConfig::default_fallback(),
            &cli.fallback_args(),
            &get_slot_config_from_env("fallback", env),
            &file.fallback,
            env,
        )
        .context("Invalid fallback provider configuration")?;

        let ingestion = IngestionConfig {
            api_key: env("DOCCHAT_INGESTION_KEY")
                .or_else(|| file.ingestion.key.clone())
                .or_else(|| env(legacy_key_var(BackendType::Gemini)))
                .unwrap_or_default(),
            model: env("DOCCHAT_INGESTION_MODEL")
                .or_else(|| file.ingestion.model.clone())
                .unwrap_or_else(|| DEFAULT_INGESTION_MODEL.to_string()),
            api_url: env("DOCCHAT_INGESTION_URL")
                .or_else(|| file.ingestion.url.clone())
                .unwrap_or_else(|| GEMINI_API_URL.to_string()),
        };

        Ok(Self {
            bind_addr,
            web_dir: cli.web_dir.clone().or_else(|| server.web_dir.clone()),
            request_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: (upload_mb as usize).saturating_mul(1024 * 1024),
            attribution: Attribution {
                referer: Some(site_url),
                title: Some(APP_TITLE.to_string()),
            },
            prompt,
            primary,
            fallback,
            ingestion,
            log_requests: cli.log_requests || file.logging.log_requests.unwrap_or(false),
            logs_dir: cli.logs_dir.clone().or_else(|| file.logging.logs_dir.clone()),
        })
    }
}

fn parse_backend(value: &str) -> Result<BackendType> {
    BackendType::from_str(value)
        .ok_or_else(|| anyhow!("Unknown backend '{}' (expected openai, openrouter or gemini)", value))
}

/// Build one provider descriptor; CLI > DOCCHAT_* env > legacy env key > file > defaults
fn resolve_slot(
    defaults: ProviderConfig,
    cli: &SlotArgs,
    slot_env: &SlotEnv,
    file: &SlotSection,
    env: EnvLookup<'_>,
) -> Result<ProviderConfig> {
    let backend = match cli
        .backend
        .as_ref()
        .or(slot_env.backend.as_ref())
        .or(file.backend.as_ref())
    {
        Some(value) => parse_backend(value)?,
        None => defaults.backend,
    };
    let backend_changed = backend != defaults.backend;

    let quota = match (cli.quota, slot_env.quota.as_deref(), file.quota) {
        (Some(quota), _, _) => quota,
        (None, Some(value), _) => value.parse::<DailyQuota>()?,
        (None, None, Some(quota)) => quota,
        (None, None, None) => defaults.daily_quota,
    };

    let api_url = cli
        .url
        .clone()
        .or_else(|| slot_env.url.clone())
        .or_else(|| file.url.clone())
        .unwrap_or_else(|| get_default_url_for_backend(&backend));

    let model = cli
        .model
        .clone()
        .or_else(|| slot_env.model.clone())
        .or_else(|| file.model.clone())
        .unwrap_or_else(|| {
            if backend_changed {
                default_model_for_backend(backend).to_string()
            } else {
                defaults.model.clone()
            }
        });

    let api_key = cli
        .key
        .clone()
        .or_else(|| slot_env.key.clone())
        .or_else(|| env(legacy_key_var(backend)))
        .or_else(|| file.key.clone())
        .unwrap_or_default();

    let id = file
        .id
        .clone()
        .map(ProviderId::new)
        .unwrap_or_else(|| defaults.id.clone());
    let display_name = cli
        .name
        .clone()
        .or_else(|| slot_env.name.clone())
        .or_else(|| file.name.clone())
        .unwrap_or_else(|| {
            if id == defaults.id && !backend_changed {
                defaults.display_name.clone()
            } else {
                model.clone()
            }
        });

    Ok(ProviderConfig {
        id,
        display_name,
        backend,
        api_url,
        api_key,
        model,
        daily_quota: quota,
        temperature: file.temperature.unwrap_or(defaults.temperature),
        max_tokens: file.max_tokens.unwrap_or(defaults.max_tokens),
    })
}
