//! Navigator that records where the editor asked to go.

use async_trait::async_trait;
use tokio::sync::RwLock;

use postdesk_core::ports::Navigator;

/// Keeps the navigation history in memory.
#[derive(Default)]
pub struct RecordingNavigator {
    history: RwLock<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.read().await.clone()
    }

    pub async fn current(&self) -> Option<String> {
        self.history.read().await.last().cloned()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate_to(&self, path: &str) {
        tracing::info!(path = %path, "Navigating");
        self.history.write().await.push(path.to_string());
    }
}
