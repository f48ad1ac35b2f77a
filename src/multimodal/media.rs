use std::sync::Arc;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use tokio::task;

use super::error::{MediaError, MediaResult};

/// A decoded upload together with the bytes it was decoded from.
///
/// The original bytes are what gets forwarded to the model; decoding only
/// proves the payload is a real image and tells us its actual format.
#[derive(Debug)]
pub struct ImageFrame {
    pub image: DynamicImage,
    pub raw: Bytes,
    pub format: ImageFormat,
}

impl ImageFrame {
    pub fn new(image: DynamicImage, raw: Bytes, format: ImageFormat) -> Self {
        Self { image, raw, format }
    }

    /// MIME type sniffed from the bytes, not the client-declared one.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Whether a declared content type names an image media type.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Decode uploaded bytes on the blocking pool.
pub async fn decode_image(bytes: Bytes) -> MediaResult<Arc<ImageFrame>> {
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    let raw = bytes.clone();
    let (image, format) = task::spawn_blocking(move || -> MediaResult<_> {
        let format = image::guess_format(&raw)?;
        let image = image::load_from_memory_with_format(&raw, format)?;
        Ok((image, format))
    })
    .await??;

    Ok(Arc::new(ImageFrame::new(image, bytes, format)))
}
