//! Posts API implementations - HTTP and in-memory.

mod memory;

pub use memory::{IMAGE_PREFIX, InMemoryPostsApi};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use self::http::{ApiConfig, HttpPostsApi};
