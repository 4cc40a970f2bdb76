//! Reading image files picked from disk.

use std::path::{Path, PathBuf};

use postdesk_core::domain::ImageFile;

/// Errors while reading a picked file.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a file: {0}")]
    NotAFile(PathBuf),
}

/// Load a file into memory, guessing its declared type from the extension.
///
/// The guess is only informational; the editor validates the content itself.
pub async fn read_image(path: impl AsRef<Path>) -> Result<ImageFile, FileError> {
    let path = path.as_ref();
    let read_err = |source| FileError::Read {
        path: path.to_path_buf(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(read_err)?;
    if !metadata.is_file() {
        return Err(FileError::NotAFile(path.to_path_buf()));
    }

    let bytes = tokio::fs::read(path).await.map_err(read_err)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let content_type = mime_guess::from_path(path).first_raw().map(str::to_string);

    tracing::debug!(file = %name, len = bytes.len(), content_type = ?content_type, "Image read");

    Ok(ImageFile::new(name, content_type, bytes))
}
