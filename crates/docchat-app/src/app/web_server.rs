use anyhow::Result;

use crate::app::setup::build_default_state;
use crate::config::AppConfig;
use crate::web::server::{WebServer, WebServerConfig};

/// Run the web server
pub async fn run_web_server(config: AppConfig) -> Result<()> {
    let state = build_default_state(&config)?;

    tracing::info!(
        addr = %config.bind_addr,
        timeout_secs = config.request_timeout.as_secs(),
        max_upload_bytes = config.max_upload_bytes,
        "starting docchat server"
    );

    let server_config = WebServerConfig {
        bind_addr: config.bind_addr,
        web_dir: config.web_dir,
    };

    WebServer::new(server_config, state).start().await
}
