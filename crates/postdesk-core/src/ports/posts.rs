use async_trait::async_trait;

use crate::domain::{Post, PostId, PostPayload};
use crate::error::ApiError;

/// Remote posts API consumed by the editor.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Fetch an existing post by its identifier.
    async fn fetch_post(&self, id: &PostId) -> Result<Post, ApiError>;

    /// Create a post from a payload carrying a new image file. Returns the
    /// post as the server stored it, including its id and image path.
    async fn create_post(&self, post: &PostPayload) -> Result<Post, ApiError>;

    /// Update an existing post. `post.id` is always set.
    async fn update_post(&self, post: &PostPayload) -> Result<(), ApiError>;
}
