//! Column-driven data table with 0-based paging.

use bakery_core::{format_price, Category, Page, Pagination, Product};
use thiserror::Error;

/// Rows-per-page choices offered by the table footer.
pub const ROWS_PER_PAGE_OPTIONS: [u32; 4] = [5, 10, 25, 50];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("row has no identifier")]
    MissingIdentifier,

    #[error("{0} rows per page is not offered; choose one of 5, 10, 25, 50")]
    InvalidRowsPerPage(u32),

    #[error("no row with id {0}")]
    UnknownRow(String),
}

/// An entity that can be shown as a table row.
pub trait TableRow {
    fn row_id(&self) -> &str;

    /// Raw display value for a column key. Unknown keys render empty.
    fn field(&self, key: &str) -> String;
}

impl TableRow for Product {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "price" => format_price(self.price),
            "category" => self.category.clone(),
            "discount" => self.discount.percent().to_string(),
            "tags" => self.tags.join(", "),
            "available" => self.available.to_string(),
            "theme" => self.theme.clone(),
            "flavour" => self.flavour.clone(),
            "image" => self.cover_image().unwrap_or_default().to_string(),
            _ => String::new(),
        }
    }
}

impl TableRow for Category {
    fn row_id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "slug" => self.slug.clone(),
            "image" => self.cover_image().unwrap_or_default().to_string(),
            _ => String::new(),
        }
    }
}

pub struct Column<T> {
    pub key: &'static str,
    pub label: &'static str,
    formatter: Option<fn(&T) -> String>,
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("formatted", &self.formatter.is_some())
            .finish()
    }
}

impl<T: TableRow> Column<T> {
    #[must_use]
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            formatter: None,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: fn(&T) -> String) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn cell(&self, row: &T) -> String {
        match self.formatter {
            Some(format) => format(row),
            None => row.field(self.key),
        }
    }
}

/// Paging position. `page_index` is 0-based; the backend is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableState {
    page_index: u32,
    rows_per_page: u32,
    total_items: u64,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            page_index: 0,
            rows_per_page: 10,
            total_items: 0,
        }
    }
}

impl TableState {
    #[must_use]
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    #[must_use]
    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// The 1-based page to request from the backend.
    #[must_use]
    pub fn fetch_page(&self) -> u32 {
        self.page_index.saturating_add(1)
    }

    pub fn set_page_index(&mut self, page_index: u32) {
        self.page_index = page_index;
    }

    /// # Errors
    ///
    /// Returns [`TableError::InvalidRowsPerPage`] for sizes not in
    /// [`ROWS_PER_PAGE_OPTIONS`].
    pub fn set_rows_per_page(&mut self, rows: u32) -> Result<(), TableError> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&rows) {
            return Err(TableError::InvalidRowsPerPage(rows));
        }
        self.rows_per_page = rows;
        self.page_index = 0;
        Ok(())
    }

    pub fn apply(&mut self, pagination: &Pagination) {
        self.total_items = pagination.total_items;
    }
}

/// Columns plus the rows of the current page.
#[derive(Debug)]
pub struct DataTable<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    state: TableState,
}

impl<T: TableRow> DataTable<T> {
    #[must_use]
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            state: TableState::default(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    #[must_use]
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }

    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Every row rendered through the columns.
    #[must_use]
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }

    #[must_use]
    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TableState {
        &mut self.state
    }

    pub fn load(&mut self, page: Page<T>) {
        self.state.apply(&page.pagination);
        self.rows = page.items;
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// # Errors
    ///
    /// [`TableError::MissingIdentifier`] for a blank id,
    /// [`TableError::UnknownRow`] when no row on this page has it.
    pub fn find(&self, id: &str) -> Result<&T, TableError> {
        let id = require_id(id)?;
        self.rows
            .iter()
            .find(|row| row.row_id() == id)
            .ok_or_else(|| TableError::UnknownRow(id.to_string()))
    }
}

/// Rejects blank identifiers before they can reach the backend.
///
/// # Errors
///
/// Returns [`TableError::MissingIdentifier`] when `id` is blank.
pub fn require_id(id: &str) -> Result<&str, TableError> {
    let id = id.trim();
    if id.is_empty() {
        Err(TableError::MissingIdentifier)
    } else {
        Ok(id)
    }
}

/// Default columns for the products table.
#[must_use]
pub fn product_columns() -> Vec<Column<Product>> {
    vec![
        Column::new("image", "Image"),
        Column::new("name", "Name"),
        Column::new("category", "Category"),
        Column::new("price", "Price")
            .with_formatter(|p: &Product| format!("NRs. {}", format_price(p.price))),
        Column::new("discount", "Discount")
            .with_formatter(|p: &Product| format!("{}%", p.discount.percent())),
        Column::new("available", "Available").with_formatter(|p: &Product| {
            let label = if p.available { "Yes" } else { "No" };
            label.to_string()
        }),
    ]
}

/// Default columns for the categories table.
#[must_use]
pub fn category_columns() -> Vec<Column<Category>> {
    vec![
        Column::new("image", "Image"),
        Column::new("name", "Name"),
        Column::new("slug", "Slug"),
        Column::new("description", "Description"),
    ]
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bakery_core::Discount;
    use rust_decimal::Decimal;

    use super::*;

    fn bun() -> Product {
        Product {
            id: "p1".to_string(),
            product_id: None,
            name: "Honey Bun".to_string(),
            description: "Sweet".to_string(),
            price: Decimal::from_str("45.5").unwrap(),
            discount: Discount::new(10).unwrap(),
            category: "Bread".to_string(),
            tags: vec!["breakfast".to_string()],
            theme: String::new(),
            flavour: "Honey".to_string(),
            images: vec![],
            available: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn rows_per_page_change_resets_page() {
        let mut state = TableState::default();
        state.set_page_index(3);
        assert_eq!(state.fetch_page(), 4);
        state.set_rows_per_page(25).unwrap();
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.rows_per_page(), 25);
    }

    #[test]
    fn last_page_index_does_not_overflow() {
        let mut state = TableState::default();
        state.set_page_index(u32::MAX);
        assert_eq!(state.fetch_page(), u32::MAX);
    }

    #[test]
    fn unsupported_rows_per_page_is_rejected() {
        let mut state = TableState::default();
        state.set_page_index(2);
        assert_eq!(
            state.set_rows_per_page(7),
            Err(TableError::InvalidRowsPerPage(7))
        );
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn formatters_override_raw_fields() {
        let mut table = DataTable::new(product_columns());
        table.load(Page::from_all(vec![bun()], 1, 10));
        assert_eq!(
            table.headers(),
            vec!["Image", "Name", "Category", "Price", "Discount", "Available"]
        );
        assert_eq!(
            table.cells()[0],
            vec!["", "Honey Bun", "Bread", "NRs. 45.50", "10%", "No"]
        );
        assert_eq!(table.state().total_items(), 1);
    }

    #[test]
    fn find_requires_identifier() {
        let mut table = DataTable::new(product_columns());
        table.load(Page::from_all(vec![bun()], 1, 10));
        assert_eq!(table.find(" ").unwrap_err(), TableError::MissingIdentifier);
        assert_eq!(
            table.find("nope").unwrap_err(),
            TableError::UnknownRow("nope".to_string())
        );
        assert_eq!(table.find("p1").unwrap().name, "Honey Bun");
    }

    #[test]
    fn category_raw_fields() {
        let category = Category {
            id: "c1".to_string(),
            name: "Cake".to_string(),
            description: "All cakes".to_string(),
            slug: "cake".to_string(),
            images: vec!["http://x/cake.jpg".to_string()],
        };
        let cells: Vec<String> = category_columns()
            .iter()
            .map(|c| c.cell(&category))
            .collect();
        assert_eq!(cells, vec!["http://x/cake.jpg", "Cake", "cake", "All cakes"]);
    }
}
