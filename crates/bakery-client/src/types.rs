//! Wire types that only exist at the HTTP boundary.

use std::path::PathBuf;

use bakery_core::{Category, ImageError, ImageUpload, Page, Pagination};
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// The shapes `GET /api/categories` has been observed to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CategoryListing {
    Paged(Page<Category>),
    Counted { items: Vec<Category>, total: u64 },
    Bare(Vec<Category>),
}

impl CategoryListing {
    /// Converts any listing shape into the requested page.
    ///
    /// Unpaginated responses are sliced client-side. A counted envelope
    /// whose `total` exceeds its item count is taken to be the server's own
    /// page.
    pub(crate) fn into_page(self, page: u32, page_size: u32) -> Page<Category> {
        match self {
            CategoryListing::Paged(paged) => Page {
                items: paged.items,
                pagination: paged.pagination.normalized(),
            },
            CategoryListing::Counted { items, total } if total > items.len() as u64 => Page {
                items,
                pagination: Pagination::new(page, page_size, total),
            },
            CategoryListing::Counted { items, .. } | CategoryListing::Bare(items) => {
                Page::from_all(items, page, page_size)
            }
        }
    }
}

/// Where an uploaded image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A `data:<mime>;base64,...` URL, as produced by a browser image picker.
    DataUrl(String),
    /// A file on disk; the MIME type is taken from the extension.
    File(PathBuf),
    /// Bytes that have already been validated.
    Upload(ImageUpload),
}

impl ImageSource {
    /// Validates the image. `data_url_name` names data-URL uploads, which
    /// carry no file name of their own.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] when the image is unreadable, too large or of
    /// an unsupported type.
    pub fn into_upload(self, data_url_name: &str) -> Result<ImageUpload, ImageError> {
        match self {
            ImageSource::DataUrl(url) => ImageUpload::from_data_url(&url, data_url_name),
            ImageSource::File(path) => ImageUpload::from_path(&path),
            ImageSource::Upload(upload) => Ok(upload),
        }
    }
}
