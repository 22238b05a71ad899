//! Application state.

use std::sync::Arc;

use anyhow::Context;

use clipcoach_core::{CoachConfig, FeedbackPipeline, RemoteAssetService};
use clipcoach_gemini::GeminiClient;

use crate::config::ApiConfig;
use crate::security::AccessGate;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: FeedbackPipeline,
    pub gate: Arc<AccessGate>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from the environment.
    ///
    /// Fails when the Gemini credential or the access password is missing,
    /// so the server never starts in a state where every request would fail.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let client = GeminiClient::from_env().context("Failed to configure Gemini client")?;
        Self::from_parts(config, Arc::new(client), &CoachConfig::from_env())
    }

    /// Build state around an existing remote asset service.
    pub fn from_parts(
        config: ApiConfig,
        service: Arc<dyn RemoteAssetService>,
        coach: &CoachConfig,
    ) -> anyhow::Result<Self> {
        let password = config
            .access_password
            .as_deref()
            .context("ACCESS_PASSWORD not set")?;
        let gate = AccessGate::new(password, config.session_ttl)
            .context("ACCESS_PASSWORD must not be empty")?;

        Ok(Self {
            pipeline: FeedbackPipeline::new(service, coach),
            gate: Arc::new(gate),
            config,
        })
    }
}
