//! In-memory posts API - used for offline runs and tests.
//!
//! Note: Data is lost on process restart.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use postdesk_core::domain::{ImageValue, Post, PostId, PostPayload};
use postdesk_core::error::ApiError;
use postdesk_core::ports::PostsApi;

/// Path prefix under which uploaded images are "stored".
pub const IMAGE_PREFIX: &str = "/images/";

/// Posts API over a `HashMap`, with injectable failures.
pub struct InMemoryPostsApi {
    store: RwLock<HashMap<PostId, Post>>,
    failures: RwLock<VecDeque<ApiError>>,
    requests: RwLock<Vec<PostPayload>>,
}

impl InMemoryPostsApi {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            failures: RwLock::new(VecDeque::new()),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with existing posts. Posts without an id get one.
    pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let store = posts
            .into_iter()
            .map(|mut post| {
                let id = post.id.get_or_insert_with(new_id).clone();
                (id, post)
            })
            .collect();

        Self {
            store: RwLock::new(store),
            ..Self::new()
        }
    }

    /// Make the next call fail with `err`.
    pub async fn fail_next(&self, err: ApiError) {
        self.failures.write().await.push_back(err);
    }

    pub async fn get(&self, id: &PostId) -> Option<Post> {
        self.store.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Payloads received by `create_post` and `update_post`, in order.
    pub async fn requests(&self) -> Vec<PostPayload> {
        self.requests.read().await.clone()
    }

    async fn take_failure(&self) -> Result<(), ApiError> {
        match self.failures.write().await.pop_front() {
            Some(err) => {
                tracing::debug!(error = %err, "Injected failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

impl Default for InMemoryPostsApi {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> PostId {
    PostId::new(Uuid::new_v4().simple().to_string())
}

fn stored_path(image: &ImageValue, previous: &str) -> String {
    match image {
        ImageValue::File(file) => format!("{}{}", IMAGE_PREFIX, file.name),
        ImageValue::Stored(path) if path.is_empty() => previous.to_string(),
        ImageValue::Stored(path) => path.clone(),
    }
}

#[async_trait]
impl PostsApi for InMemoryPostsApi {
    async fn fetch_post(&self, id: &PostId) -> Result<Post, ApiError> {
        self.take_failure().await?;
        self.get(id).await.ok_or_else(|| ApiError::NotFound(id.clone()))
    }

    async fn create_post(&self, post: &PostPayload) -> Result<Post, ApiError> {
        self.requests.write().await.push(post.clone());
        self.take_failure().await?;

        if !post.image.is_file() {
            return Err(ApiError::InvalidRequest(
                "a new post needs an image file".to_string(),
            ));
        }

        let id = new_id();
        let stored = Post {
            id: Some(id.clone()),
            title: post.title.clone(),
            content: post.content.clone(),
            image_path: stored_path(&post.image, ""),
            creator: None,
        };

        self.store.write().await.insert(id.clone(), stored.clone());
        tracing::debug!(post_id = %id, "Post stored");

        Ok(stored)
    }

    async fn update_post(&self, post: &PostPayload) -> Result<(), ApiError> {
        self.requests.write().await.push(post.clone());
        self.take_failure().await?;

        let id = post.id.as_ref().ok_or_else(|| {
            ApiError::InvalidRequest("cannot update a post without an id".to_string())
        })?;

        let mut store = self.store.write().await;
        let existing = store
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(id.clone()))?;

        existing.title = post.title.clone();
        existing.content = post.content.clone();
        existing.image_path = stored_path(&post.image, &existing.image_path);
        tracing::debug!(post_id = %id, "Post updated");

        Ok(())
    }
}
