//! Post form model - typed fields with per-field validation.

mod field;
mod mime;

pub use field::{
    FieldError, FieldStatus, ImageField, Rule, TextField, validate_image, validate_text,
};
pub use mime::{AcceptedTypes, IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG, check_mime_type, sniff};

use crate::config::EditorConfig;
use crate::domain::{ImageValue, Post};

/// Current values of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFormValue {
    pub title: String,
    pub content: String,
    pub image: Option<ImageValue>,
}

/// Named field, used to report errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldName {
    Title,
    Content,
    Image,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::Content => "content",
            FieldName::Image => "image",
        }
    }
}

/// The post form: title, content and image.
#[derive(Debug, Clone)]
pub struct PostForm {
    pub title: TextField,
    pub content: TextField,
    pub image: ImageField,
    accepted: AcceptedTypes,
}

impl PostForm {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            title: TextField::new(vec![Rule::Required, Rule::MinLength(config.title_min_length)]),
            content: TextField::new(vec![Rule::Required]),
            image: ImageField::new(false),
            accepted: config.accepted_image_types.clone(),
        }
    }

    pub fn accepted_types(&self) -> &AcceptedTypes {
        &self.accepted
    }

    /// Every field is valid. Pending fields count as not valid.
    pub fn is_valid(&self) -> bool {
        self.title.is_valid() && self.content.is_valid() && self.image.is_valid()
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// All current errors, keyed by field.
    pub fn errors(&self) -> Vec<(FieldName, FieldError)> {
        let title = self.title.errors().iter().map(|e| (FieldName::Title, e.clone()));
        let content = self
            .content
            .errors()
            .iter()
            .map(|e| (FieldName::Content, e.clone()));
        let image = self.image.errors().iter().map(|e| (FieldName::Image, e.clone()));
        title.chain(content).chain(image).collect()
    }

    /// Human readable summary of [`errors`](Self::errors).
    pub fn error_summary(&self) -> String {
        self.errors()
            .iter()
            .map(|(field, err)| format!("{} {}", field.as_str(), err))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn value(&self) -> PostFormValue {
        PostFormValue {
            title: self.title.value().to_string(),
            content: self.content.value().to_string(),
            image: self.image.value().cloned(),
        }
    }

    /// Bind a fetched post's text fields. The image field is left as is; the
    /// editor clears it before loading and keeps the stored image as the
    /// preview.
    pub fn patch(&mut self, post: &Post) {
        self.title.set(post.title.clone());
        self.content.set(post.content.clone());
    }

    /// Select an image and resolve its validation.
    pub fn set_image(&mut self, value: ImageValue) -> FieldStatus {
        self.image.set_pending(value);
        self.image.validate(&self.accepted)
    }

    pub fn reset(&mut self) {
        self.title.reset();
        self.content.reset();
        self.image.reset();
    }
}
