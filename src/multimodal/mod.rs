//! Image intake for uploaded files.

pub mod error;
pub mod media;

pub use error::{MediaError, MediaResult};
pub use media::{decode_image, is_image_content_type, ImageFrame};
