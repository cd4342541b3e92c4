//! The storefront product listing.
//!
//! [`ListingState`] is the synchronous state machine; [`Listing`] drives it
//! against a [`ProductSource`]. The state lives behind a `std::sync::Mutex`
//! that is only held between awaits, so every caller goes through the same
//! epoch and in-flight guards no matter how many tasks share the handle.

pub mod state;
pub mod trigger;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bakery_client::{ApiClient, ClientError};
use bakery_core::{Page, Product};

pub use state::{Completion, FetchRequest, FetchTicket, ListingState, LoadError, Mode, Phase};
pub use trigger::SentinelTrigger;

/// The category dimension of the storefront listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parses a UI label; `"All"` and blank mean no filter.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(label.to_string())
        }
    }

    /// The value of the `category` query parameter, if any.
    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_category().unwrap_or("All"))
    }
}

/// Anything that can serve pages of products for a filter value.
pub trait ProductSource<F>: Send + Sync {
    fn fetch_page(
        &self,
        filter: &F,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Page<Product>, ClientError>> + Send;
}

impl ProductSource<CategoryFilter> for ApiClient {
    async fn fetch_page(
        &self,
        filter: &CategoryFilter,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Product>, ClientError> {
        self.list_products(page, page_size, filter.as_category())
            .await
    }
}

/// Shared async handle over a [`ListingState`].
///
/// Cloning is cheap and every clone drives the same state.
pub struct Listing<F, S> {
    state: Arc<Mutex<ListingState<F>>>,
    source: Arc<S>,
}

impl<F, S> Clone for Listing<F, S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            source: Arc::clone(&self.source),
        }
    }
}

impl<F, S> Listing<F, S>
where
    F: Clone + PartialEq + Send + Sync,
    S: ProductSource<F>,
{
    pub fn new(source: Arc<S>, filter: F, page_size: u32, mode: Mode) -> Self {
        Self {
            state: Arc::new(Mutex::new(ListingState::new(filter, page_size, mode))),
            source,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListingState<F>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self, request: Option<FetchRequest<F>>) -> Option<Completion> {
        let request = request?;
        let result = self
            .source
            .fetch_page(&request.filter, request.page, request.page_size)
            .await;
        Some(self.lock().complete(request.ticket, result))
    }

    /// Fetches page 1 under the current filter.
    pub async fn initial_load(&self) -> Completion {
        let request = self.lock().initial_load();
        self.run(Some(request)).await.unwrap_or(Completion::Stale)
    }

    /// Switches the filter and fetches its first page. `None` when the
    /// filter did not change.
    pub async fn set_filter(&self, filter: F) -> Option<Completion> {
        let request = self.lock().set_filter(filter);
        self.run(request).await
    }

    /// Fetches the next page unless one is already loading or none remain.
    pub async fn load_more(&self) -> Option<Completion> {
        let request = self.lock().load_more();
        self.run(request).await
    }

    /// Reports the sentinel's visibility; loads more on a hidden-to-visible
    /// edge.
    pub async fn sentinel_visible(&self, visible: bool) -> Option<Completion> {
        let request = self.lock().sentinel_visible(visible);
        self.run(request).await
    }

    pub async fn go_to_page(&self, page: u32) -> Option<Completion> {
        let request = self.lock().go_to_page(page);
        self.run(request).await
    }

    pub async fn retry(&self) -> Option<Completion> {
        let request = self.lock().retry();
        self.run(request).await
    }

    pub fn dismiss_error(&self) {
        self.lock().dismiss_error();
    }

    /// Runs `f` against the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&ListingState<F>) -> R) -> R {
        f(&self.lock())
    }

    #[must_use]
    pub fn items(&self) -> Vec<Product> {
        self.lock().items().to_vec()
    }

    /// Clones of the items matching `query` by name.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        self.lock()
            .visible_items(query)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.lock().has_more()
    }

    #[must_use]
    pub fn error(&self) -> Option<LoadError> {
        self.lock().error().cloned()
    }
}
