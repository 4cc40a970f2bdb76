//! MIME validation by content sniffing.
//!
//! The declared content type of an upload cannot be trusted, so the image
//! field is validated against the file's leading bytes.

use super::field::FieldError;
use crate::domain::ImageFile;

pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_GIF: &str = "image/gif";

/// Detect the image type from the first bytes of a file.
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(IMAGE_PNG),
        [0x47, 0x49, 0x46, 0x38, ..] => Some(IMAGE_GIF),
        [0xFF, 0xD8, 0xFF, 0xE0..=0xE3 | 0xE8, ..] => Some(IMAGE_JPEG),
        _ => None,
    }
}

/// Set of MIME types the image field accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTypes(Vec<String>);

impl Default for AcceptedTypes {
    fn default() -> Self {
        Self(vec![
            IMAGE_PNG.to_string(),
            IMAGE_JPEG.to_string(),
            IMAGE_GIF.to_string(),
        ])
    }
}

impl AcceptedTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(types.into_iter().map(|t| normalize(t.as_ref())).collect())
    }

    /// Parse a comma separated list. Bare subtypes (`png`) are read as `image/png`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim).filter(|t| !t.is_empty()))
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.0.iter().any(|t| t.eq_ignore_ascii_case(mime))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

fn normalize(mime: &str) -> String {
    let mime = mime.to_ascii_lowercase();
    match mime.as_str() {
        "jpg" => IMAGE_JPEG.to_string(),
        _ if mime.contains('/') => mime,
        _ => format!("image/{mime}"),
    }
}

/// Check a file against the accepted set, returning the detected type.
pub fn check_mime_type(
    file: &ImageFile,
    accepted: &AcceptedTypes,
) -> Result<&'static str, FieldError> {
    match sniff(&file.bytes) {
        Some(mime) if accepted.contains(mime) => Ok(mime),
        detected => Err(FieldError::InvalidMimeType {
            detected: detected.map(str::to_string),
        }),
    }
}
