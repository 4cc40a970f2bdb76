//! Editor-level error types.

use thiserror::Error;

use crate::domain::PostId;

/// Errors reported by a [`PostsApi`](crate::ports::PostsApi) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Post not found: {0}")]
    NotFound(PostId),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

/// Editor errors - failures surfaced to whoever drives the editor.
///
/// None of these are fatal; the editor stays usable and the operation can be
/// retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Route unavailable: {0}")]
    Route(String),

    #[error("Operation cancelled")]
    Cancelled,
}
