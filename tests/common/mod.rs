// Shared helpers for integration tests
#![allow(dead_code)]

pub mod mock_gemini_server;
pub mod test_app;

use std::{
    io::Cursor,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use waste_classifier::{
    classifier::{ClassificationClient, ClientError, ClientResult},
    multimodal::ImageFrame,
};

/// Canned reply for [`MockClassificationClient`].
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    Status { status: u16, message: String },
}

/// Classification client that returns a fixed reply and counts calls.
pub struct MockClassificationClient {
    reply: MockReply,
    calls: AtomicUsize,
}

impl MockClassificationClient {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Text(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Status {
                status,
                message: message.into(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationClient for MockClassificationClient {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn classify(&self, _image: &ImageFrame) -> ClientResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Status { status, message } => Err(ClientError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([20, 120, 200])));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub const BOUNDARY: &str = "----waste-classifier-test-boundary";

/// Build a multipart/form-data body with one file part named `file`.
pub fn multipart_body(file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Multipart body with two file parts.
pub fn multipart_two_files(first: &[u8], second: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in [("front.png", first), ("back.png", second)] {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Multipart body containing only a plain text field.
pub fn multipart_without_file() -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = BOUNDARY
    )
    .into_bytes()
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
