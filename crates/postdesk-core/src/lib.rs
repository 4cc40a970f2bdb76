//! # Postdesk Core
//!
//! The post editor: create-or-edit mode resolution, the typed post form,
//! image preview and submission.
//! Collaborators (posts API, route, navigator) are reached through the traits
//! in [`ports`]; this crate has no HTTP or IO of its own.

pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod form;
pub mod ports;
pub mod preview;

pub use config::EditorConfig;
pub use editor::{Mode, PostEditor, SaveKind, SavedPost, SkipReason, SubmitOutcome};
pub use error::{ApiError, EditorError};
