use std::fmt;

use serde::{Deserialize, Serialize};

use super::image::ImageValue;

/// Server-assigned post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Post entity as known to the editor.
///
/// An unsaved post has no `id`. `image_path` and `creator` are filled in by
/// the server once the post is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<PostId>,
    pub title: String,
    pub content: String,
    pub image_path: String,
    pub creator: Option<String>,
}

impl Post {
    /// Blank post used when entering create mode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A post that already exists on the server.
    pub fn persisted(
        id: impl Into<PostId>,
        title: impl Into<String>,
        content: impl Into<String>,
        image_path: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            content: content.into(),
            image_path: image_path.into(),
            creator: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Candidate post assembled from the form on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPayload {
    pub id: Option<PostId>,
    pub title: String,
    pub content: String,
    pub image: ImageValue,
}

impl PostPayload {
    /// Turn the payload into the post the server now holds.
    ///
    /// `image_path` is only known for stored images; a freshly uploaded file
    /// leaves it blank until the server reports it.
    pub fn into_post(self, id: PostId) -> Post {
        let image_path = match self.image {
            ImageValue::Stored(path) => path,
            ImageValue::File(_) => String::new(),
        };

        Post {
            id: Some(id),
            title: self.title,
            content: self.content,
            image_path,
            creator: None,
        }
    }
}
