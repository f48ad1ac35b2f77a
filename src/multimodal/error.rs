use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("uploaded file is empty")]
    Empty,
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("image decode task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}
