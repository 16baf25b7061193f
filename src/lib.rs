pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod token;
pub mod vendor;

pub use config::Config;
pub use error::GatewayError;
pub use http::{create_router, AppState};
pub use orchestrator::{TaskHandle, TaskOrchestrator};
pub use token::{BuilderToken, BuilderTokenCache, MediaTokenBuilder};
pub use vendor::{RttClient, SpeechTaskApi};
