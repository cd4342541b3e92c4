//! Admin CRUD screen: a table, an add/edit form and a delete action over one
//! resource.
//!
//! Client-side validation failures block submission. Backend failures keep
//! the form open with the backend's message so nothing typed is lost.
//! Successful mutations close the form and refetch the current page.

use std::future::Future;
use std::sync::Arc;

use bakery_client::{ApiClient, ClientError, ErrorCategory, ImageSource};
use bakery_core::{
    Category, CategoryDraft, CategoryForm, CategoryPatch, Page, Product, ProductDraft,
    ProductForm, ProductPatch, ValidationError,
};

use super::table::{require_id, Column, DataTable, TableError, TableRow};

/// One backend collection the console can manage.
pub trait CrudResource: Send + Sync {
    type Entity: TableRow + Clone + Send + Sync;
    type Form: Clone + Send;
    type Draft: Send;
    type Patch: Send;

    /// Singular, capitalised, for notices: `"Product"`.
    const NOUN: &'static str;

    fn list(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Page<Self::Entity>, ClientError>> + Send;

    fn blank_form(&self) -> Self::Form;

    fn form_for(&self, entity: &Self::Entity) -> Self::Form;

    /// # Errors
    ///
    /// Returns every invalid field.
    fn validate_new(&self, form: &Self::Form) -> Result<Self::Draft, ValidationError>;

    /// # Errors
    ///
    /// Returns every invalid field.
    fn validate_edit(
        &self,
        form: &Self::Form,
        original: &Self::Entity,
    ) -> Result<Self::Patch, ValidationError>;

    fn is_unchanged(patch: &Self::Patch) -> bool;

    fn create(
        &self,
        draft: Self::Draft,
        image: Option<ImageSource>,
    ) -> impl Future<Output = Result<Self::Entity, ClientError>> + Send;

    fn update(
        &self,
        id: &str,
        patch: Self::Patch,
        image: Option<ImageSource>,
    ) -> impl Future<Output = Result<Self::Entity, ClientError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}

pub struct ProductAdmin {
    client: Arc<ApiClient>,
}

impl ProductAdmin {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl CrudResource for ProductAdmin {
    type Entity = Product;
    type Form = ProductForm;
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const NOUN: &'static str = "Product";

    async fn list(&self, page: u32, page_size: u32) -> Result<Page<Product>, ClientError> {
        self.client.list_products(page, page_size, None).await
    }

    fn blank_form(&self) -> ProductForm {
        ProductForm::default()
    }

    fn form_for(&self, entity: &Product) -> ProductForm {
        ProductForm::from_product(entity)
    }

    fn validate_new(&self, form: &ProductForm) -> Result<ProductDraft, ValidationError> {
        form.validate()
    }

    fn validate_edit(
        &self,
        form: &ProductForm,
        original: &Product,
    ) -> Result<ProductPatch, ValidationError> {
        form.to_patch(original)
    }

    fn is_unchanged(patch: &ProductPatch) -> bool {
        patch.is_empty()
    }

    async fn create(
        &self,
        draft: ProductDraft,
        image: Option<ImageSource>,
    ) -> Result<Product, ClientError> {
        self.client.create_product(&draft, image).await
    }

    async fn update(
        &self,
        id: &str,
        patch: ProductPatch,
        image: Option<ImageSource>,
    ) -> Result<Product, ClientError> {
        self.client.update_product(id, &patch, image).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete_product(id).await
    }
}

pub struct CategoryAdmin {
    client: Arc<ApiClient>,
}

impl CategoryAdmin {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl CrudResource for CategoryAdmin {
    type Entity = Category;
    type Form = CategoryForm;
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const NOUN: &'static str = "Category";

    async fn list(&self, page: u32, page_size: u32) -> Result<Page<Category>, ClientError> {
        self.client.list_categories(page, page_size).await
    }

    fn blank_form(&self) -> CategoryForm {
        CategoryForm::new()
    }

    fn form_for(&self, entity: &Category) -> CategoryForm {
        CategoryForm::from_category(entity)
    }

    fn validate_new(&self, form: &CategoryForm) -> Result<CategoryDraft, ValidationError> {
        form.validate()
    }

    fn validate_edit(
        &self,
        form: &CategoryForm,
        original: &Category,
    ) -> Result<CategoryPatch, ValidationError> {
        form.to_patch(original)
    }

    fn is_unchanged(patch: &CategoryPatch) -> bool {
        patch.is_empty()
    }

    async fn create(
        &self,
        draft: CategoryDraft,
        image: Option<ImageSource>,
    ) -> Result<Category, ClientError> {
        self.client.create_category(&draft, image).await
    }

    async fn update(
        &self,
        id: &str,
        patch: CategoryPatch,
        image: Option<ImageSource>,
    ) -> Result<Category, ClientError> {
        self.client.update_category(id, &patch, image).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete_category(id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode<E> {
    Add,
    Edit(E),
}

/// The open add/edit form.
pub struct Editor<R: CrudResource> {
    mode: EditorMode<R::Entity>,
    pub form: R::Form,
    field_errors: Option<ValidationError>,
    submit_error: Option<String>,
}

impl<R: CrudResource> Editor<R> {
    #[must_use]
    pub fn mode(&self) -> &EditorMode<R::Entity> {
        &self.mode
    }

    #[must_use]
    pub fn field_errors(&self) -> Option<&ValidationError> {
        self.field_errors.as_ref()
    }

    /// The backend's message from the last failed submit.
    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Edit form with nothing changed and no new image; closed without a request.
    Unchanged,
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The backend rejected the request; the form stays open.
    Failed,
    NoEditor,
}

pub struct AdminConsole<R: CrudResource> {
    resource: R,
    table: DataTable<R::Entity>,
    editor: Option<Editor<R>>,
    banner: Option<String>,
    notice: Option<String>,
    requires_login: bool,
}

impl<R: CrudResource> AdminConsole<R> {
    #[must_use]
    pub fn new(resource: R, columns: Vec<Column<R::Entity>>) -> Self {
        Self {
            resource,
            table: DataTable::new(columns),
            editor: None,
            banner: None,
            notice: None,
            requires_login: false,
        }
    }

    #[must_use]
    pub fn table(&self) -> &DataTable<R::Entity> {
        &self.table
    }

    #[must_use]
    pub fn editor(&self) -> Option<&Editor<R>> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor<R>> {
        self.editor.as_mut()
    }

    /// Error banner text, if any.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Confirmation of the last successful action.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Set once the backend rejected the session; the caller should route
    /// to the login page.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        self.requires_login
    }

    fn note_failure(&mut self, err: &ClientError) -> String {
        if err.category() == ErrorCategory::Authorization {
            self.requires_login = true;
        }
        err.user_message()
    }

    /// Refetches the current page. Returns `false` when the fetch failed and
    /// the banner was set.
    pub async fn refresh(&mut self) -> bool {
        let state = *self.table.state();
        match self
            .resource
            .list(state.fetch_page(), state.rows_per_page())
            .await
        {
            Ok(page) => {
                self.table.load(page);
                true
            }
            Err(ClientError::NotFound { .. }) => {
                self.table.clear();
                true
            }
            Err(err) => {
                tracing::warn!(resource = R::NOUN, error = %err, "admin table fetch failed");
                self.banner = Some(self.note_failure(&err));
                false
            }
        }
    }

    /// Moves to a 0-based page and refetches.
    pub async fn set_page(&mut self, page_index: u32) -> bool {
        self.table.state_mut().set_page_index(page_index);
        self.refresh().await
    }

    /// Changes the page size, returns to the first page and refetches.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidRowsPerPage`] for unsupported sizes.
    pub async fn set_rows_per_page(&mut self, rows: u32) -> Result<bool, TableError> {
        self.table.state_mut().set_rows_per_page(rows)?;
        Ok(self.refresh().await)
    }

    pub fn open_add(&mut self) {
        self.editor = Some(Editor {
            mode: EditorMode::Add,
            form: self.resource.blank_form(),
            field_errors: None,
            submit_error: None,
        });
    }

    /// # Errors
    ///
    /// Returns [`TableError`] when `id` is blank or not on the current page.
    pub fn open_edit(&mut self, id: &str) -> Result<(), TableError> {
        let original = self.table.find(id)?.clone();
        self.editor = Some(Editor {
            form: self.resource.form_for(&original),
            mode: EditorMode::Edit(original),
            field_errors: None,
            submit_error: None,
        });
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.editor = None;
    }

    /// Validates and sends the open form.
    pub async fn submit(&mut self, image: Option<ImageSource>) -> SubmitOutcome {
        let Some(editor) = self.editor.as_mut() else {
            return SubmitOutcome::NoEditor;
        };
        editor.field_errors = None;
        editor.submit_error = None;
        let form = editor.form.clone();
        let mode = editor.mode.clone();

        let result = match mode {
            EditorMode::Add => match self.resource.validate_new(&form) {
                Ok(draft) => self.resource.create(draft, image).await.map(|_| "created"),
                Err(invalid) => return self.reject(invalid),
            },
            EditorMode::Edit(original) => match self.resource.validate_edit(&form, &original) {
                Ok(patch) if R::is_unchanged(&patch) && image.is_none() => {
                    self.editor = None;
                    return SubmitOutcome::Unchanged;
                }
                Ok(patch) => self
                    .resource
                    .update(original.row_id(), patch, image)
                    .await
                    .map(|_| "updated"),
                Err(invalid) => return self.reject(invalid),
            },
        };

        match result {
            Ok(verb) => {
                self.editor = None;
                self.notice = Some(format!("{} {verb}", R::NOUN));
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                let message = self.note_failure(&err);
                if let Some(editor) = self.editor.as_mut() {
                    editor.submit_error = Some(message);
                }
                SubmitOutcome::Failed
            }
        }
    }

    fn reject(&mut self, invalid: ValidationError) -> SubmitOutcome {
        if let Some(editor) = self.editor.as_mut() {
            editor.field_errors = Some(invalid);
        }
        SubmitOutcome::Invalid
    }

    /// Deletes a row and refetches.
    ///
    /// Returns `Ok(false)` when the backend refused; the banner then
    /// carries the reason.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingIdentifier`] for a blank id; nothing is
    /// sent.
    pub async fn delete(&mut self, id: &str) -> Result<bool, TableError> {
        let id = require_id(id)?.to_string();
        match self.resource.delete(&id).await {
            Ok(()) => {
                self.notice = Some(format!("{} deleted", R::NOUN));
                self.refresh().await;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(resource = R::NOUN, %id, error = %err, "delete failed");
                self.banner = Some(self.note_failure(&err));
                Ok(false)
            }
        }
    }
}
