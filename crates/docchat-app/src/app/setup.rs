use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use docchat_chat::{Clock, Dispatcher, InMemoryUsageStore, ProviderSlot, SystemClock};
use docchat_llm_api::{ClientFactory, ProviderConfig};
use docchat_logging::RequestLogger;

use crate::cli::Cli;
use crate::config::helpers::process_env;
use crate::config::{AppConfig, FileConfig};
use crate::web::AppState;

/// Set up application configuration from CLI arguments, environment and config file
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let file = FileConfig::discover(cli.config.as_deref())?;
    AppConfig::resolve(cli, &file, &process_env)
}

/// Build the HTTP client, provider clients, usage store and dispatcher
pub fn build_state(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let logger = if config.log_requests {
        let logger = match &config.logs_dir {
            Some(dir) => RequestLogger::new(dir)?,
            None => RequestLogger::in_default_dir()?,
        };
        eprintln!(
            "{} Logging upstream requests to {}",
            "📝".cyan(),
            logger.dir().display()
        );
        Some(logger)
    } else {
        None
    };

    for provider in [&config.primary, &config.fallback] {
        announce_provider(provider);
    }

    let primary_client = ClientFactory::create(&config.primary, http.clone(), &config.attribution, logger.clone());
    let fallback_client = ClientFactory::create(&config.fallback, http.clone(), &config.attribution, logger.clone());

    let store = Arc::new(InMemoryUsageStore::new(
        [config.primary.id.clone(), config.fallback.id.clone()],
        clock.today(),
    ));

    let dispatcher = Dispatcher::new(
        ProviderSlot::new(config.primary.clone(), primary_client),
        ProviderSlot::new(config.fallback.clone(), fallback_client),
        store,
        clock,
        config.prompt.clone(),
    )
    .context("Invalid provider configuration")?;

    let extractor = if config.ingestion.is_configured() {
        Some(ClientFactory::create_extractor(
            config.ingestion.api_key.clone(),
            config.ingestion.model.clone(),
            config.ingestion.api_url.clone(),
            http,
            logger,
        ))
    } else {
        eprintln!(
            "{} No ingestion key configured; PDF uploads will be rejected",
            "⚠️".yellow()
        );
        None
    };

    Ok(AppState {
        dispatcher: Arc::new(dispatcher),
        extractor,
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Build application state using the system clock
pub fn build_default_state(config: &AppConfig) -> Result<AppState> {
    build_state(config, Arc::new(SystemClock))
}

fn announce_provider(provider: &ProviderConfig) {
    eprintln!(
        "{} {} ({}) via {} at {}, daily quota: {}",
        "🤖".cyan(),
        provider.display_name,
        provider.model,
        provider.backend,
        provider.api_url,
        provider.daily_quota
    );
    if provider.api_key.trim().is_empty() {
        eprintln!(
            "{} No API key for '{}'; its requests will fail and fall back",
            "⚠️".yellow(),
            provider.id
        );
    }
}
