//! Photo decoding and upload encoding
//!
//! Caller bytes (JPEG or PNG) are decoded into a [`DynamicImage`], then
//! re-encoded as a bounded-size JPEG for inline transport.

pub mod encoder;
pub mod mime;

pub use encoder::ImageEncoder;

use crate::{Error, Result};
use image::DynamicImage;

/// Compressed image plus its text-safe form, ready to embed in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub base64: String,
    pub mime_type: &'static str,
}

impl EncodedImage {
    /// `data:` URL form used by OpenAI-style message parts.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Decodes a caller-supplied photo. Only JPEG and PNG are accepted.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let format = match mime::detect_image_mime(bytes) {
        Some(mime::JPEG) => image::ImageFormat::Jpeg,
        Some(mime::PNG) => image::ImageFormat::Png,
        _ => {
            return Err(Error::UnsupportedImage(
                "expected a JPEG or PNG photo".to_string(),
            ))
        }
    };

    Ok(image::load_from_memory_with_format(bytes, format)?)
}
