//! Image upload payloads and their client-side validation.
//!
//! An image reaches the backend as the `image` part of a multipart request.
//! It can originate either from a file on disk or from a `data:` URL that an
//! image picker already base64-encoded.

use std::path::Path;

use base64::Engine as _;
use thiserror::Error;

/// Upload ceiling enforced before any request is made.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/jpg", "image/webp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("unsupported image type \"{0}\"; expected one of image/jpeg, image/png, image/jpg, image/webp")]
    UnsupportedType(String),

    #[error("image is empty")]
    Empty,

    #[error("malformed data URL: {0}")]
    InvalidDataUrl(String),

    #[error("could not read image {path}: {reason}")]
    Read { path: String, reason: String },
}

/// A validated image ready to be attached to a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    bytes: Vec<u8>,
    file_name: String,
    mime: String,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// # Errors
    ///
    /// Returns [`ImageError`] when the payload is empty, larger than
    /// [`MAX_IMAGE_BYTES`], or not one of [`ALLOWED_IMAGE_TYPES`].
    pub fn new(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Self, ImageError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
            return Err(ImageError::UnsupportedType(mime));
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self {
            bytes,
            file_name: file_name.to_string(),
            mime,
        })
    }

    /// Decodes a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDataUrl`] for anything that is not a
    /// base64 data URL, plus the validation errors of [`ImageUpload::new`].
    pub fn from_data_url(data_url: &str, file_name: &str) -> Result<Self, ImageError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| ImageError::InvalidDataUrl("missing data: prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ImageError::InvalidDataUrl("missing ',' separator".to_string()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| ImageError::InvalidDataUrl("only base64 payloads are supported".to_string()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ImageError::InvalidDataUrl(e.to_string()))?;
        Self::new(bytes, file_name, mime)
    }

    /// Reads an image from disk, inferring its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedType`] for unknown extensions,
    /// [`ImageError::Read`] when the file cannot be read, plus the validation
    /// errors of [`ImageUpload::new`].
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mime = mime_for_extension(&ext)
            .ok_or_else(|| ImageError::UnsupportedType(format!(".{ext}")))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let bytes = std::fs::read(path).map_err(|e| ImageError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::new(bytes, &file_name, mime)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }
}

/// Maps a lowercase file extension to one of the allowed MIME types.
#[must_use]
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_small_png() {
        let img = ImageUpload::new(vec![1, 2, 3], "a.png", "image/png").unwrap();
        assert_eq!(img.mime(), "image/png");
        assert_eq!(img.bytes().len(), 3);
    }

    #[test]
    fn rejects_gif() {
        let err = ImageUpload::new(vec![1], "a.gif", "image/gif").unwrap_err();
        assert_eq!(err, ImageError::UnsupportedType("image/gif".to_string()));
    }

    #[test]
    fn rejects_payload_over_five_megabytes() {
        let err = ImageUpload::new(vec![0; MAX_IMAGE_BYTES + 1], "big.jpg", "image/jpeg").unwrap_err();
        assert!(matches!(err, ImageError::TooLarge { .. }));
    }

    #[test]
    fn accepts_payload_at_exact_limit() {
        assert!(ImageUpload::new(vec![0; MAX_IMAGE_BYTES], "ok.jpg", "image/jpeg").is_ok());
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(
            ImageUpload::new(vec![], "a.png", "image/png").unwrap_err(),
            ImageError::Empty
        );
    }

    #[test]
    fn decodes_base64_data_url() {
        // "hello" in base64
        let img = ImageUpload::from_data_url("data:image/webp;base64,aGVsbG8=", "product-image.jpg")
            .unwrap();
        assert_eq!(img.bytes(), b"hello");
        assert_eq!(img.mime(), "image/webp");
        assert_eq!(img.file_name(), "product-image.jpg");
    }

    #[test]
    fn data_url_without_prefix_is_rejected() {
        assert!(matches!(
            ImageUpload::from_data_url("/uploads/x.jpg", "x.jpg"),
            Err(ImageError::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn non_base64_data_url_is_rejected() {
        assert!(matches!(
            ImageUpload::from_data_url("data:image/png,rawbytes", "x.png"),
            Err(ImageError::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn data_url_with_disallowed_mime_is_rejected() {
        assert!(matches!(
            ImageUpload::from_data_url("data:image/gif;base64,aGVsbG8=", "x.gif"),
            Err(ImageError::UnsupportedType(_))
        ));
    }

    #[test]
    fn mime_for_extension_maps_known_types() {
        assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("webp"), Some("image/webp"));
        assert_eq!(mime_for_extension("bmp"), None);
    }

    #[test]
    fn from_path_rejects_unknown_extension_before_reading() {
        let err = ImageUpload::from_path(Path::new("/nonexistent/file.bmp")).unwrap_err();
        assert_eq!(err, ImageError::UnsupportedType(".bmp".to_string()));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = ImageUpload::from_path(Path::new("/nonexistent/file.png")).unwrap_err();
        assert!(matches!(err, ImageError::Read { .. }));
    }
}
