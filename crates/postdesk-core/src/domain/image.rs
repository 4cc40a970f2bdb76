use std::fmt;

/// A file selected by the user, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    /// Content type declared by whoever produced the file, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Keep file contents out of logs.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Value of the image field: a new upload or a reference to a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValue {
    File(ImageFile),
    Stored(String),
}

impl ImageValue {
    pub fn as_file(&self) -> Option<&ImageFile> {
        match self {
            ImageValue::File(file) => Some(file),
            ImageValue::Stored(_) => None,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ImageValue::File(_))
    }
}

/// Displayable representation of the current image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePreview {
    /// `data:` URL built from a freshly picked file.
    DataUrl(String),
    /// Path of an image already stored by the server.
    Stored(String),
}

impl ImagePreview {
    pub fn as_str(&self) -> &str {
        match self {
            ImagePreview::DataUrl(url) => url,
            ImagePreview::Stored(path) => path,
        }
    }
}

impl fmt::Display for ImagePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
