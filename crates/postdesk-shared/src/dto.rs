//! Data Transfer Objects - request/response bodies of the posts API.

use serde::{Deserialize, Serialize};

/// A post as returned by `GET /posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

/// The post echoed back by `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostDto {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_path: String,
}

/// Response to `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub message: String,
    pub post: CreatedPostDto,
}

/// JSON body of `PUT /posts/{id}` when the stored image is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_path: String,
}

/// Multipart field names shared by create and update uploads.
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const IMAGE: &str = "image";
}
