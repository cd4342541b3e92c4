//! Category endpoints.

use bakery_core::{Category, CategoryDraft, CategoryPatch, Page};
use reqwest::Method;

use crate::client::{multipart_form, ApiClient};
use crate::error::ClientError;
use crate::types::{CategoryListing, ImageSource};

const CATEGORIES_PATH: &str = "api/categories";

/// File name given to categories uploaded from a `data:` URL.
pub const CATEGORY_IMAGE_NAME: &str = "category-image.jpg";

impl ApiClient {
    /// Fetches one page of categories.
    ///
    /// The backend has returned a bare array, an `{items, total}` envelope
    /// and the paginated envelope at different times; all three become a
    /// [`Page`], sliced client-side when the backend did not paginate.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::NotFound`], [`ClientError::Api`] on non-2xx status.
    /// - [`ClientError::Deserialize`] if the body matches none of the shapes.
    pub async fn list_categories(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Category>, ClientError> {
        let mut url = self.endpoint(CATEGORIES_PATH)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &page_size.to_string());

        let listing: CategoryListing = self
            .send_json(
                self.request(Method::GET, url),
                &format!("list_categories(page={page})"),
            )
            .await?;
        Ok(listing
            .into_page(page, page_size)
            .map_items(|c| self.absolutize_category(c)))
    }

    /// # Errors
    ///
    /// - [`ClientError::MissingIdentifier`] for a blank `id`.
    /// - [`ClientError::NotFound`] when no category has that id.
    pub async fn get_category(&self, id: &str) -> Result<Category, ClientError> {
        let url = self.endpoint_with_id(CATEGORIES_PATH, id, "category")?;
        let category: Category = self
            .send_json(self.request(Method::GET, url), &format!("get_category(id={id})"))
            .await?;
        Ok(self.absolutize_category(category))
    }

    /// # Errors
    ///
    /// - [`ClientError::NotAuthenticated`] when signed out; nothing is sent.
    /// - [`ClientError::Image`] when the image fails validation; nothing is sent.
    /// - [`ClientError::Unauthorized`] on 401/403; the session is cleared.
    /// - [`ClientError::Api`] with the backend message on other failures.
    pub async fn create_category(
        &self,
        draft: &CategoryDraft,
        image: Option<ImageSource>,
    ) -> Result<Category, ClientError> {
        self.require_token()?;
        let image = image
            .map(|source| source.into_upload(CATEGORY_IMAGE_NAME))
            .transpose()?;
        let form = multipart_form(draft.form_fields(), image)?;
        let url = self.endpoint(CATEGORIES_PATH)?;

        let category: Category = self
            .send_json(self.request(Method::POST, url).multipart(form), "create_category")
            .await?;
        tracing::info!(id = %category.id, slug = %category.slug, "category created");
        Ok(self.absolutize_category(category))
    }

    /// # Errors
    ///
    /// As for [`ApiClient::create_category`], plus
    /// [`ClientError::MissingIdentifier`] and [`ClientError::NotFound`].
    pub async fn update_category(
        &self,
        id: &str,
        patch: &CategoryPatch,
        image: Option<ImageSource>,
    ) -> Result<Category, ClientError> {
        let url = self.endpoint_with_id(CATEGORIES_PATH, id, "category")?;
        self.require_token()?;
        let image = image
            .map(|source| source.into_upload(CATEGORY_IMAGE_NAME))
            .transpose()?;
        let form = multipart_form(patch.form_fields(), image)?;

        let category: Category = self
            .send_json(
                self.request(Method::PUT, url).multipart(form),
                &format!("update_category(id={id})"),
            )
            .await?;
        tracing::info!(id = %category.id, "category updated");
        Ok(self.absolutize_category(category))
    }

    /// # Errors
    ///
    /// - [`ClientError::MissingIdentifier`] for a blank `id`; nothing is sent.
    /// - [`ClientError::NotAuthenticated`] when signed out; nothing is sent.
    /// - [`ClientError::NotFound`], [`ClientError::Unauthorized`],
    ///   [`ClientError::Api`] on non-2xx status.
    pub async fn delete_category(&self, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint_with_id(CATEGORIES_PATH, id, "category")?;
        self.require_token()?;
        self.send(self.request(Method::DELETE, url)).await?;
        tracing::info!(%id, "category deleted");
        Ok(())
    }
}
