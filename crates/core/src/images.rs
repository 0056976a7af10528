//! Validation of uploaded images (application photos, design images,
//! category pictures).
//!
//! Only the header is decoded: enough to prove the bytes are an image of an
//! accepted format and to read its dimensions.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::error::CoreError;

/// Maximum accepted upload size (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Accepted formats, as shown to users.
pub const ACCEPTED_FORMATS: &[&str] = &["JPG", "JPEG", "PNG", "BMP"];

/// Raw upload as received from a form field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Name of the form field the file arrived in.
    pub field: String,
    pub bytes: Vec<u8>,
}

/// An upload that passed [`validate_image`].
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    /// Canonical file extension for the detected format.
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Check size, format and readability of an upload.
pub fn validate_image(upload: ImageUpload) -> Result<ValidatedImage, CoreError> {
    let field = upload.field.as_str();

    if upload.bytes.is_empty() {
        return Err(CoreError::Validation(format!("{field}: the uploaded file is empty")));
    }
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "{field}: image exceeds maximum size of 2MB (got {} bytes)",
            upload.bytes.len()
        )));
    }

    let reader = ImageReader::new(Cursor::new(upload.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("{field}: unreadable image: {e}")))?;

    let extension = match reader.format() {
        Some(ImageFormat::Png) => "png",
        Some(ImageFormat::Jpeg) => "jpg",
        Some(ImageFormat::Bmp) => "bmp",
        _ => {
            return Err(CoreError::Validation(format!(
                "{field}: unsupported image format. Accepted: {}",
                ACCEPTED_FORMATS.join(", ")
            )))
        }
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("{field}: unreadable image: {e}")))?;

    Ok(ValidatedImage {
        extension,
        width,
        height,
        bytes: upload.bytes,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use image::{Rgb, RgbImage};

    use super::*;

    /// Encode a tiny solid-colour image in the given format.
    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(3, 2, Rgb([200, 40, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn upload(bytes: Vec<u8>) -> ImageUpload {
        ImageUpload {
            field: "image".to_string(),
            bytes,
        }
    }

    #[test]
    fn png_is_accepted_with_dimensions() {
        let img = validate_image(upload(encoded(ImageFormat::Png))).unwrap();
        assert_eq!(img.extension, "png");
        assert_eq!((img.width, img.height), (3, 2));
    }

    #[test]
    fn jpeg_and_bmp_are_accepted() {
        assert_eq!(validate_image(upload(encoded(ImageFormat::Jpeg))).unwrap().extension, "jpg");
        assert_eq!(validate_image(upload(encoded(ImageFormat::Bmp))).unwrap().extension, "bmp");
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert_matches!(validate_image(upload(Vec::new())), Err(CoreError::Validation(_)));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = validate_image(upload(b"definitely not an image".to_vec()));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn oversize_upload_is_rejected_before_decoding() {
        let mut bytes = encoded(ImageFormat::Png);
        bytes.resize(MAX_IMAGE_BYTES + 1, 0);
        let result = validate_image(upload(bytes));
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("2MB"));
    }
}
