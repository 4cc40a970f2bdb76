//! # Postdesk Infrastructure
//!
//! Concrete implementations of the ports defined in `postdesk-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No HTTP client, in-memory adapters only
//! - `http` - Posts API over HTTP via reqwest

pub mod api;
pub mod files;
pub mod navigator;
pub mod route;

// Re-exports - In-Memory
pub use api::InMemoryPostsApi;
pub use files::{FileError, read_image};
pub use navigator::RecordingNavigator;
pub use route::{StaticRoute, WatchRoute};

// Re-exports - HTTP
#[cfg(feature = "http")]
pub use api::{ApiConfig, HttpPostsApi};
