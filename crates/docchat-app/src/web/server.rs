use anyhow::{Context, Result};
use axum::Router;
use colored::Colorize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::web::routes::{self, AppState};

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub web_dir: Option<PathBuf>,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: WebServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// The full application: API routes, optional static files, CORS and request tracing
    pub fn app(&self) -> Router {
        let mut app = routes::create_router(self.state.clone());

        if let Some(web_dir) = &self.config.web_dir {
            if web_dir.exists() {
                tracing::info!(dir = %web_dir.display(), "serving static files");
                app = app.fallback_service(ServeDir::new(web_dir));
            } else {
                tracing::warn!(dir = %web_dir.display(), "web directory does not exist, not serving static files");
            }
        }

        // Allow browser front-ends hosted elsewhere
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Start the web server and run until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let app = self.app();
        let addr = self.config.bind_addr;

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        println!("{} docchat server listening on {}", "🌐".cyan(), format!("http://{}", addr).bold());
        println!("   Chat endpoint:   POST http://{}/chat", addr);
        println!("   PDF upload:      POST http://{}/api/upload-pdf?filename=<name>.pdf", addr);
        println!("   Usage counters:  GET  http://{}/api/usage", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Web server error")?;

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("received interrupt signal");
}
