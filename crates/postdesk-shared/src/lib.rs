//! # Postdesk Shared
//!
//! Wire types of the posts API, shared by the HTTP client and test servers.

pub mod dto;
pub mod response;

pub use dto::{CreatePostResponse, CreatedPostDto, PostDto, UpdatePostRequest};
pub use response::MessageResponse;
