//! Domain model and configuration shared by every bakery crate.
//!
//! Nothing in here talks to the network. The only I/O is [`load_app_config`]
//! (process environment and `.env`) and [`ImageUpload::from_path`].

pub mod app_config;
pub mod categories;
pub mod config;
pub mod images;
pub mod order;
pub mod pagination;
pub mod products;
pub mod users;
pub mod validation;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use categories::{slugify, Category, CategoryDraft, CategoryPatch};
pub use config::{load_app_config, load_app_config_from_env};
pub use images::{ImageError, ImageUpload};
pub use order::whatsapp_order_link;
pub use pagination::{clamp_page_size, Page, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use products::{
    effective_price, filter_by_name, format_price, normalize_tags, Discount, Product, ProductDraft,
    ProductPatch,
};
pub use users::User;
pub use validation::{CategoryForm, FieldError, ProductForm, ValidationError};

/// Errors raised while building domain values from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("discount must be a whole percentage between 0 and 100, got {0}")]
    InvalidDiscount(String),

    #[error("price must be a non-negative decimal, got {0}")]
    InvalidPrice(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
