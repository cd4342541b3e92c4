//! Typed async client for the bakery REST API.
//!
//! [`ApiClient`] covers products, categories and authentication. The bearer
//! token lives in a shared [`Session`]; a 401 or 403 from any call clears it.

pub mod auth;
pub mod categories;
pub mod client;
pub mod error;
pub mod products;
pub mod session;
pub mod types;
pub mod urls;

pub use categories::CATEGORY_IMAGE_NAME;
pub use client::ApiClient;
pub use error::{ClientError, ErrorCategory};
pub use products::PRODUCT_IMAGE_NAME;
pub use session::{FileStore, MemoryStore, Session, SessionError, TokenStore, AUTH_TOKEN_KEY};
pub use types::{ImageSource, LoginResponse};
pub use urls::absolute_image_url;
