//! Book cover upload validation and naming.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use uuid::Uuid;

use crate::error::CoreError;

/// Directory (relative to the media root) that book covers are stored in.
pub const UPLOAD_DIR: &str = "uploads/book";

/// Request field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Format and size of an accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// Check that `bytes` are a complete image of an accepted format. The whole
/// image is decoded, so a valid header followed by corrupt data is rejected.
pub fn inspect_image(bytes: &[u8]) -> Result<ImageInfo, CoreError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| invalid_image())?;

    let format = reader
        .format()
        .filter(|format| ACCEPTED_FORMATS.contains(format))
        .ok_or_else(invalid_image)?;

    let image = reader.decode().map_err(|_| invalid_image())?;

    Ok(ImageInfo {
        format,
        width: image.width(),
        height: image.height(),
    })
}

/// Generate a unique storage key for an upload, keeping the extension of the
/// client-supplied filename.
///
/// ```
/// use bookshelf_core::images::image_storage_key;
///
/// let key = image_storage_key("cover.PNG");
/// assert!(key.starts_with("uploads/book/"));
/// assert!(key.ends_with(".PNG"));
/// ```
pub fn image_storage_key(original_filename: &str) -> String {
    let extension = Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    format!("{UPLOAD_DIR}/{}{extension}", Uuid::new_v4())
}

fn invalid_image() -> CoreError {
    CoreError::field(IMAGE_FIELD, INVALID_IMAGE)
}
