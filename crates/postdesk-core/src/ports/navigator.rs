use async_trait::async_trait;

/// Navigation port - requests that the application move to another view.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate_to(&self, path: &str);
}
