//! Error handling and custom error types
//!
//! Per-request API failures are not errors here: they are folded into
//! [`crate::ai::Outcome`]. This enum covers startup and local failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Image encoding error: {0}")]
    Encoding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
