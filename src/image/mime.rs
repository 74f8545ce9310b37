//! Input format sniffing for caller-supplied photos.

pub const JPEG: &str = "image/jpeg";
pub const PNG: &str = "image/png";

/// Returns the mime type for JPEG or PNG bytes, `None` for anything else.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(JPEG),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(PNG),
        _ => {
            tracing::debug!(
                "Unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(PNG)
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(JPEG));
    }

    #[test]
    fn test_webp_is_not_accepted() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            None
        );
    }

    #[test]
    fn test_empty_is_not_accepted() {
        assert_eq!(detect_image_mime(&[]), None);
    }
}
