//! HTTP posts API backed by `reqwest`.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};

use postdesk_core::domain::{ImageFile, ImageValue, Post, PostId, PostPayload};
use postdesk_core::error::ApiError;
use postdesk_core::form::sniff;
use postdesk_core::ports::PostsApi;
use postdesk_shared::dto::fields;
use postdesk_shared::{
    CreatePostResponse, CreatedPostDto, MessageResponse, PostDto, UpdatePostRequest,
};

/// Configuration for [`HttpPostsApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, without the `/posts` suffix.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("POSTDESK_API_URL").unwrap_or(defaults.base_url),
            timeout: env::var("POSTDESK_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Posts API client speaking JSON and multipart over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPostsApi {
    client: Client,
    base_url: Url,
}

impl HttpPostsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::InvalidRequest(format!("invalid API URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "invalid API URL {}: not a base URL",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn posts_url(&self) -> Url {
        self.endpoint(&["posts"])
    }

    fn post_url(&self, id: &PostId) -> Url {
        self.endpoint(&["posts", id.as_str()])
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Map non-success statuses to [`ApiError`], passing successful responses through.
async fn check_status(response: Response, id: Option<&PostId>) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(ApiError::NotFound(id.clone()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: MessageResponse::from_error_body(&body),
    })
}

fn image_part(file: &ImageFile) -> Result<Part, ApiError> {
    let mime = sniff(&file.bytes)
        .map(str::to_string)
        .or_else(|| file.content_type.clone())
        .unwrap_or_else(|| {
            mime_guess::from_path(&file.name)
                .first_or_octet_stream()
                .to_string()
        });

    Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&mime)
        .map_err(|e| ApiError::InvalidRequest(format!("image type {}: {}", mime, e)))
}

fn created_from_dto(dto: CreatedPostDto) -> Post {
    Post::persisted(dto.id, dto.title, dto.content, dto.image_path)
}

fn post_from_dto(dto: PostDto) -> Post {
    Post {
        id: Some(PostId::new(dto.id)),
        title: dto.title,
        content: dto.content,
        image_path: dto.image_path,
        creator: dto.creator,
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn fetch_post(&self, id: &PostId) -> Result<Post, ApiError> {
        tracing::debug!(post_id = %id, "GET post");

        let response = self
            .client
            .get(self.post_url(id))
            .send()
            .await
            .map_err(transport)?;
        let dto: PostDto = check_status(response, Some(id))
            .await?
            .json()
            .await
            .map_err(transport)?;

        Ok(post_from_dto(dto))
    }

    async fn create_post(&self, post: &PostPayload) -> Result<Post, ApiError> {
        let ImageValue::File(file) = &post.image else {
            return Err(ApiError::InvalidRequest(
                "a new post needs an image file".to_string(),
            ));
        };

        tracing::debug!(title = %post.title, file = %file.name, "POST post");

        let form = Form::new()
            .text(fields::TITLE, post.title.clone())
            .text(fields::CONTENT, post.content.clone())
            .part(fields::IMAGE, image_part(file)?);

        let response = self
            .client
            .post(self.posts_url())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let created: CreatePostResponse = check_status(response, None)
            .await?
            .json()
            .await
            .map_err(transport)?;

        tracing::debug!(
            post_id = %created.post.id,
            image_path = %created.post.image_path,
            message = %created.message,
            "Post created"
        );
        Ok(created_from_dto(created.post))
    }

    async fn update_post(&self, post: &PostPayload) -> Result<(), ApiError> {
        let Some(id) = &post.id else {
            return Err(ApiError::InvalidRequest(
                "cannot update a post without an id".to_string(),
            ));
        };

        tracing::debug!(post_id = %id, new_image = post.image.is_file(), "PUT post");

        let request = self.client.put(self.post_url(id));
        let request = match &post.image {
            ImageValue::File(file) => request.multipart(
                Form::new()
                    .text(fields::ID, id.to_string())
                    .text(fields::TITLE, post.title.clone())
                    .text(fields::CONTENT, post.content.clone())
                    .part(fields::IMAGE, image_part(file)?),
            ),
            ImageValue::Stored(path) => request.json(&UpdatePostRequest {
                id: id.to_string(),
                title: post.title.clone(),
                content: post.content.clone(),
                image_path: path.clone(),
            }),
        };

        let response = request.send().await.map_err(transport)?;
        let message: MessageResponse = check_status(response, Some(id))
            .await?
            .json()
            .await
            .map_err(transport)?;

        tracing::debug!(post_id = %id, message = %message.message, "Post updated");
        Ok(())
    }
}
