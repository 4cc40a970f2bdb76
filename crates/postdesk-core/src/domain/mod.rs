//! Domain entities - the post being edited and its image.

mod image;

mod post;

pub use image::{ImageFile, ImagePreview, ImageValue};
pub use post::{Post, PostId, PostPayload};
