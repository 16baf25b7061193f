use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::orchestrator::TaskOrchestrator;
use crate::token::{BuilderTokenCache, MediaTokenBuilder};
use crate::vendor::{RttClient, SpeechTaskApi};

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TaskOrchestrator>,
}

impl AppState {
    /// Wire the orchestrator to the real vendor client.
    pub fn new(config: &Config) -> Result<Self> {
        let client: Arc<dyn SpeechTaskApi> = Arc::new(RttClient::new(&config.vendor)?);
        Ok(Self::with_api(config, client))
    }

    /// Wire the orchestrator to an arbitrary vendor API (used by tests).
    pub fn with_api(config: &Config, api: Arc<dyn SpeechTaskApi>) -> Self {
        let media = MediaTokenBuilder::new(
            config.vendor.app_id.clone(),
            config.vendor.app_certificate.clone(),
            config.rtt.token_expiry_secs,
            config.rtt.privilege_expiry_secs,
        );
        let orchestrator = TaskOrchestrator::new(
            api,
            BuilderTokenCache::new(),
            media,
            config.rtt.clone(),
            config.storage.clone(),
        );
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
