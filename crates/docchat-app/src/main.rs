use anyhow::Result;
use clap::Parser;

use docchat::logging::init_tracing;
use docchat::{run_web_server, setup_from_cli, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    let config = setup_from_cli(&cli)?;
    run_web_server(config).await
}
