use super::{mime, EncodedImage};
use crate::config::Config;
use crate::{Error, Result};
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

/// Re-encodes photos as JPEG, downscaling anything larger than `max_dimension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageEncoder {
    quality: u8,
    max_dimension: Option<u32>,
}

impl ImageEncoder {
    pub fn new(quality: u8, max_dimension: Option<u32>) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            max_dimension,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jpeg_quality, config.max_image_dimension)
    }

    pub fn encode(&self, image: &DynamicImage) -> Result<EncodedImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::Encoding("image has no pixels".to_string()));
        }

        let scaled;
        let source = match self.max_dimension {
            Some(max) if image.width() > max || image.height() > max => {
                // Aspect ratio is preserved; the longer side becomes `max`.
                scaled = image.resize(max, max, FilterType::Lanczos3);
                tracing::debug!(
                    "Downscaled {}x{} photo to {}x{}",
                    image.width(),
                    image.height(),
                    scaled.width(),
                    scaled.height()
                );
                &scaled
            }
            _ => image,
        };

        let rgb = source.to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode_image(&rgb)
            .map_err(|e| Error::Encoding(format!("JPEG compression failed: {}", e)))?;

        if bytes.is_empty() {
            return Err(Error::Encoding("JPEG encoder produced no data".to_string()));
        }

        let base64 = base64::engine::general_purpose::STANDARD.encode(&bytes);

        Ok(EncodedImage {
            bytes,
            base64,
            mime_type: mime::JPEG,
        })
    }
}

impl Default for ImageEncoder {
    fn default() -> Self {
        Self::new(85, Some(2048))
    }
}
