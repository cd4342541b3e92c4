//! "Shop by flavour" and "shop by occasion" shelves.
//!
//! Both shelves fetch a single batch of products and facet it client-side:
//! the facet values are collected in first-seen order, the first one is
//! selected, and up to [`SHELF_LIMIT`] matching products are shown.

use bakery_client::ClientError;
use bakery_core::{Product, MAX_PAGE_SIZE};

use crate::listing::{CategoryFilter, ProductSource};

/// Products shown per selected facet value.
pub const SHELF_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    /// The product's `flavour` field.
    Flavour,
    /// Each of the product's tags.
    Occasion,
}

impl Facet {
    fn values_of(self, product: &Product) -> Vec<&str> {
        match self {
            Facet::Flavour => vec![product.flavour.as_str()],
            Facet::Occasion => product.tags.iter().map(String::as_str).collect(),
        }
    }

    fn matches(self, product: &Product, value: &str) -> bool {
        match self {
            Facet::Flavour => product.flavour == value,
            Facet::Occasion => product.has_tag(value),
        }
    }
}

/// Unique non-blank facet values in first-seen order.
#[must_use]
pub fn facet_values(products: &[Product], facet: Facet) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in products.iter().flat_map(|p| facet.values_of(p)) {
        if !value.trim().is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

#[derive(Debug, Clone)]
pub struct FacetShelf {
    facet: Facet,
    products: Vec<Product>,
    values: Vec<String>,
    selected: Option<String>,
    window_start: usize,
    per_view: usize,
}

impl FacetShelf {
    /// Fetches the first batch of products and builds the shelf.
    ///
    /// A not-found response yields an empty shelf.
    ///
    /// # Errors
    ///
    /// Returns any other [`ClientError`] from the source.
    pub async fn load<S>(source: &S, facet: Facet, per_view: usize) -> Result<Self, ClientError>
    where
        S: ProductSource<CategoryFilter>,
    {
        let products = match source
            .fetch_page(&CategoryFilter::All, 1, MAX_PAGE_SIZE)
            .await
        {
            Ok(page) => page.items,
            Err(ClientError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self::from_products(facet, products, per_view))
    }

    /// `per_view` is how many facet values the carousel shows at once.
    #[must_use]
    pub fn from_products(facet: Facet, products: Vec<Product>, per_view: usize) -> Self {
        let values = facet_values(&products, facet);
        let selected = values.first().cloned();
        Self {
            facet,
            products,
            values,
            selected,
            window_start: 0,
            per_view: per_view.max(1),
        }
    }

    #[must_use]
    pub fn facet(&self) -> Facet {
        self.facet
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects `value`. Unknown values are ignored and return `false`.
    pub fn select(&mut self, value: &str) -> bool {
        if self.values.iter().any(|v| v == value) {
            self.selected = Some(value.to_string());
            true
        } else {
            false
        }
    }

    /// Up to [`SHELF_LIMIT`] products matching the selected value.
    #[must_use]
    pub fn shown(&self) -> Vec<&Product> {
        let Some(selected) = self.selected.as_deref() else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| self.facet.matches(p, selected))
            .take(SHELF_LIMIT)
            .collect()
    }

    /// "View all" is offered when the shelf is full.
    #[must_use]
    pub fn has_view_all(&self) -> bool {
        self.shown().len() == SHELF_LIMIT
    }

    /// The facet values currently inside the carousel window.
    #[must_use]
    pub fn visible_values(&self) -> &[String] {
        let end = (self.window_start + self.per_view).min(self.values.len());
        &self.values[self.window_start.min(end)..end]
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.window_start > 0
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.window_start + self.per_view < self.values.len()
    }

    /// Slides the window one value right and selects its first value.
    pub fn next(&mut self) {
        let last_start = self.values.len().saturating_sub(self.per_view);
        self.window_start = (self.window_start + 1).min(last_start);
        self.select_window_start();
    }

    /// Slides the window one value left and selects its first value.
    pub fn prev(&mut self) {
        self.window_start = self.window_start.saturating_sub(1);
        self.select_window_start();
    }

    fn select_window_start(&mut self) {
        if let Some(first) = self.values.get(self.window_start) {
            self.selected = Some(first.clone());
        }
    }
}
