pub mod setup;
pub mod web_server;

pub use setup::{build_default_state, build_state, setup_from_cli};
pub use web_server::run_web_server;
