// Web frontend module
pub mod protocol;
pub mod routes;
pub mod server;

pub use protocol::{ChatRequest, ChatResponse, UploadResponse, UsageResponse};
pub use routes::{create_router, AppError, AppState};
pub use server::{WebServer, WebServerConfig};
