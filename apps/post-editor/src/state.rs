//! Application state - the adapters the editor runs against.

use std::sync::Arc;

#[cfg(feature = "http")]
use anyhow::Context;

use postdesk_core::ports::{Navigator, PostsApi};
use postdesk_infra::{InMemoryPostsApi, RecordingNavigator};

#[cfg(feature = "http")]
use postdesk_infra::HttpPostsApi;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn PostsApi>,
    pub navigator: Arc<dyn Navigator>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// The in-memory API is only used when running offline; a remote client
    /// that cannot be built is an error.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let navigator: Arc<dyn Navigator> = Arc::new(RecordingNavigator::new());

        if config.offline {
            tracing::info!("Offline mode - using in-memory posts API");
            return Ok(Self {
                api: Arc::new(InMemoryPostsApi::new()),
                navigator,
            });
        }

        #[cfg(feature = "http")]
        let api: Arc<dyn PostsApi> = {
            let api = HttpPostsApi::new(&config.api).context("failed to build the HTTP client")?;
            tracing::info!(base_url = %config.api.base_url, "Using HTTP posts API");
            Arc::new(api)
        };

        #[cfg(not(feature = "http"))]
        let api: Arc<dyn PostsApi> = Arc::new(InMemoryPostsApi::new());

        Ok(Self { api, navigator })
    }
}
