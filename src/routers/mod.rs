//! HTTP handlers and their error mapping

pub mod analyze;
pub mod error;

pub use analyze::{analyze_image, analyze_upload, read_upload, ImageUpload};
pub use error::AnalyzeError;
