use std::io::Write;
use std::time::Duration;

use docchat::types::{DailyQuota, ProviderId};
use docchat::{AppConfig, Cli, FileConfig};
use docchat::llm_api::BackendType;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const SAMPLE_TOML: &str = r#"
[server]
bind = "0.0.0.0"
port = 8088
request_timeout_secs = 30
max_upload_mb = 5
site_url = "https://docs.example.com"

[prompt]
persona = "You are a patient tutor."
language = "Turkish"

[primary]
id = "groq"
name = "Llama on Groq"
backend = "openai"
url = "https://api.groq.com/openai/v1/chat/completions"
model = "llama-3.1-8b-instant"
quota = 500
temperature = 0.2
max_tokens = 256

[fallback]
quota = "unlimited"
key = "file-gemini-key"

[ingestion]
model = "gemini-1.5-pro"

[logging]
log_requests = true
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_load_file_config() {
    let file = write_config(SAMPLE_TOML);
    let config = FileConfig::load(file.path()).unwrap();

    assert_eq!(config.server.port, Some(8088));
    assert_eq!(config.primary.quota, Some(DailyQuota::Limited(500)));
    assert_eq!(config.fallback.quota, Some(DailyQuota::Unlimited));
    assert_eq!(config.logging.log_requests, Some(true));
}

#[test]
fn test_file_values_apply_when_nothing_overrides() {
    let file = FileConfig::parse(SAMPLE_TOML).unwrap();
    let config = AppConfig::resolve(&Cli::default(), &file, &no_env).unwrap();

    assert_eq!(config.bind_addr, "0.0.0.0:8088".parse().unwrap());
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    assert_eq!(config.attribution.referer.as_deref(), Some("https://docs.example.com"));
    assert_eq!(config.prompt.persona, "You are a patient tutor.");
    assert_eq!(config.prompt.language.as_deref(), Some("Turkish"));

    assert_eq!(config.primary.id, ProviderId::from("groq"));
    assert_eq!(config.primary.display_name, "Llama on Groq");
    assert_eq!(config.primary.backend, BackendType::OpenAiCompatible);
    assert_eq!(config.primary.model, "llama-3.1-8b-instant");
    assert_eq!(config.primary.daily_quota, DailyQuota::Limited(500));
    assert_eq!(config.primary.temperature, 0.2);
    assert_eq!(config.primary.max_tokens, 256);

    assert_eq!(config.fallback.id, ProviderId::from("gemini"));
    assert_eq!(config.fallback.api_key, "file-gemini-key");
    assert_eq!(config.ingestion.model, "gemini-1.5-pro");
    assert!(config.log_requests);
}

#[test]
fn test_precedence_cli_over_env_over_file() {
    let file = FileConfig::parse(SAMPLE_TOML).unwrap();
    let env = |name: &str| match name {
        "DOCCHAT_PRIMARY_MODEL" => Some("env-model".to_string()),
        "DOCCHAT_PRIMARY_QUOTA" => Some("42".to_string()),
        "DOCCHAT_FALLBACK_KEY" => Some("env-gemini-key".to_string()),
        _ => None,
    };
    let cli = Cli {
        port: Some(9000),
        primary_quota: Some(DailyQuota::Limited(7)),
        ..Cli::default()
    };

    let config = AppConfig::resolve(&cli, &file, &env).unwrap();

    assert_eq!(config.bind_addr.port(), 9000);
    assert_eq!(config.primary.daily_quota, DailyQuota::Limited(7));
    assert_eq!(config.primary.model, "env-model");
    assert_eq!(config.fallback.api_key, "env-gemini-key");
}

#[test]
fn test_invalid_env_quota_is_an_error() {
    let env = |name: &str| (name == "DOCCHAT_PRIMARY_QUOTA").then(|| "plenty".to_string());
    let err = AppConfig::resolve(&Cli::default(), &FileConfig::default(), &env).unwrap_err();
    assert!(format!("{:#}", err).contains("plenty"));
}

#[test]
fn test_unknown_keys_are_rejected() {
    let result = FileConfig::parse("[server]\nprot = 3000\n");
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FileConfig::load(&dir.path().join("absent.toml"));
    assert!(result.is_err());
}
