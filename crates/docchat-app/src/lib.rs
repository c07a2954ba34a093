//! docchat Application Library
//!
//! CLI, configuration and the HTTP service around the chat dispatcher.

pub use docchat_chat as chat;
pub use docchat_llm_api as llm_api;
pub use docchat_types as types;

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod web;

pub use app::{build_state, run_web_server, setup_from_cli};
pub use cli::Cli;
pub use config::{AppConfig, FileConfig};
pub use web::{create_router, AppState};
