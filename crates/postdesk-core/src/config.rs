//! Editor configuration loaded from environment variables.

use std::env;

use crate::form::AcceptedTypes;

/// Default minimum title length.
pub const DEFAULT_TITLE_MIN_LENGTH: usize = 3;

/// Validation settings for the post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub title_min_length: usize,
    pub accepted_image_types: AcceptedTypes,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title_min_length: DEFAULT_TITLE_MIN_LENGTH,
            accepted_image_types: AcceptedTypes::default(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from environment variables.
    ///
    /// - `POSTDESK_TITLE_MIN_LENGTH` (default 3)
    /// - `POSTDESK_ACCEPTED_IMAGE_TYPES`, comma separated (default `png,jpeg,gif`)
    pub fn from_env() -> Self {
        Self {
            title_min_length: env::var("POSTDESK_TITLE_MIN_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TITLE_MIN_LENGTH),
            accepted_image_types: env::var("POSTDESK_ACCEPTED_IMAGE_TYPES")
                .ok()
                .map(|list| AcceptedTypes::parse(&list))
                .filter(|types| !types.is_empty())
                .unwrap_or_default(),
        }
    }
}
