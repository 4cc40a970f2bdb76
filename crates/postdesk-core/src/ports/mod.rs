//! Ports - trait definitions for the editor's collaborators.
//! These are the "interfaces" that infrastructure must implement.

mod navigator;
mod posts;
mod route;

pub use navigator::Navigator;
pub use posts::PostsApi;
pub use route::{POST_ID_PARAM, ParamMap, Route};
