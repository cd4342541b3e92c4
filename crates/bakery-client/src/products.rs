//! Product endpoints.

use bakery_core::{Page, Product, ProductDraft, ProductPatch};
use reqwest::Method;

use crate::client::{multipart_form, ApiClient};
use crate::error::ClientError;
use crate::types::ImageSource;

const PRODUCTS_PATH: &str = "api/products";

/// File name given to products uploaded from a `data:` URL.
pub const PRODUCT_IMAGE_NAME: &str = "product-image.jpg";

impl ApiClient {
    /// Fetches one page of products, optionally restricted to a category name.
    ///
    /// Inconsistent pagination metadata is recomputed from the counts.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::NotFound`], [`ClientError::Api`] on non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not a product page.
    pub async fn list_products(
        &self,
        page: u32,
        page_size: u32,
        category: Option<&str>,
    ) -> Result<Page<Product>, ClientError> {
        let mut url = self.endpoint(PRODUCTS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("limit", &page_size.to_string());
            if let Some(category) = category {
                pairs.append_pair("category", category);
            }
        }

        let context = format!("list_products(page={page}, category={category:?})");
        let mut listing: Page<Product> = self.send_json(self.request(Method::GET, url), &context).await?;
        listing.pagination = listing.pagination.normalized();
        Ok(listing.map_items(|p| self.absolutize_product(p)))
    }

    /// # Errors
    ///
    /// - [`ClientError::MissingIdentifier`] for a blank `id`.
    /// - [`ClientError::NotFound`] when no product has that id.
    /// - [`ClientError::Http`], [`ClientError::Api`],
    ///   [`ClientError::Deserialize`] as for [`ApiClient::list_products`].
    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        let url = self.endpoint_with_id(PRODUCTS_PATH, id, "product")?;
        let product: Product = self
            .send_json(self.request(Method::GET, url), &format!("get_product(id={id})"))
            .await?;
        Ok(self.absolutize_product(product))
    }

    /// Creates a product from validated form fields and an optional image.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotAuthenticated`] when signed out; nothing is sent.
    /// - [`ClientError::Image`] when the image fails validation; nothing is sent.
    /// - [`ClientError::Unauthorized`] on 401/403; the session is cleared.
    /// - [`ClientError::Api`] with the backend message on other failures.
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        image: Option<ImageSource>,
    ) -> Result<Product, ClientError> {
        self.require_token()?;
        let image = image
            .map(|source| source.into_upload(PRODUCT_IMAGE_NAME))
            .transpose()?;
        let form = multipart_form(draft.form_fields(), image)?;
        let url = self.endpoint(PRODUCTS_PATH)?;

        let product: Product = self
            .send_json(self.request(Method::POST, url).multipart(form), "create_product")
            .await?;
        tracing::info!(id = %product.id, name = %product.name, "product created");
        Ok(self.absolutize_product(product))
    }

    /// Sends only the fields present in `patch`, plus an optional new image.
    ///
    /// # Errors
    ///
    /// As for [`ApiClient::create_product`], plus
    /// [`ClientError::MissingIdentifier`] and [`ClientError::NotFound`].
    pub async fn update_product(
        &self,
        id: &str,
        patch: &ProductPatch,
        image: Option<ImageSource>,
    ) -> Result<Product, ClientError> {
        let url = self.endpoint_with_id(PRODUCTS_PATH, id, "product")?;
        self.require_token()?;
        let image = image
            .map(|source| source.into_upload(PRODUCT_IMAGE_NAME))
            .transpose()?;
        let form = multipart_form(patch.form_fields(), image)?;

        let product: Product = self
            .send_json(
                self.request(Method::PUT, url).multipart(form),
                &format!("update_product(id={id})"),
            )
            .await?;
        tracing::info!(id = %product.id, "product updated");
        Ok(self.absolutize_product(product))
    }

    /// # Errors
    ///
    /// - [`ClientError::MissingIdentifier`] for a blank `id`; nothing is sent.
    /// - [`ClientError::NotAuthenticated`] when signed out; nothing is sent.
    /// - [`ClientError::NotFound`], [`ClientError::Unauthorized`],
    ///   [`ClientError::Api`] on non-2xx status.
    pub async fn delete_product(&self, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint_with_id(PRODUCTS_PATH, id, "product")?;
        self.require_token()?;
        self.send(self.request(Method::DELETE, url)).await?;
        tracing::info!(%id, "product deleted");
        Ok(())
    }
}
