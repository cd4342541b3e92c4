//! Offset pagination metadata as returned by the bakery backend.
//!
//! Wire shape:
//!
//! ```text
//! { "items": [...],
//!   "pagination": { "page": 2, "limit": 10, "total_items": 31,
//!                   "total_pages": 4, "has_next": true, "has_prev": true } }
//! ```
//!
//! `page` is 1-based. The derived fields must agree with the counts; see
//! [`Pagination::is_consistent`].

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Clamps a requested page size into `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn clamp_page_size(requested: u32) -> u32 {
    requested.clamp(1, MAX_PAGE_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    #[serde(rename = "limit")]
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Builds pagination metadata with every derived field computed from
    /// `page`, `page_size` and `total_items`.
    ///
    /// A zero `page` or `page_size` is treated as 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(page_size)))
            .unwrap_or(u32::MAX);
        Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Returns `true` when the derived fields agree with the counts.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        *self == Self::new(self.page, self.page_size, self.total_items)
    }

    /// Returns `self` unchanged when consistent, otherwise the metadata
    /// recomputed from `page`, `page_size` and `total_items`.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.is_consistent() {
            return self;
        }
        let fixed = Self::new(self.page, self.page_size, self.total_items);
        tracing::warn!(
            page = self.page,
            page_size = self.page_size,
            total_items = self.total_items,
            reported_total_pages = self.total_pages,
            reported_has_next = self.has_next,
            total_pages = fixed.total_pages,
            has_next = fixed.has_next,
            "inconsistent pagination from backend; recomputed derived fields"
        );
        fixed
    }

    /// 0-based offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of entities plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// An empty page: no items, `total_pages == 0`, no neighbours.
    #[must_use]
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::new(page, page_size, 0),
        }
    }

    /// Slices a complete, unpaginated collection down to the requested page.
    ///
    /// Used when the backend returns every entity at once.
    #[must_use]
    pub fn from_all(all: Vec<T>, page: u32, page_size: u32) -> Self {
        let pagination = Pagination::new(page, page_size, all.len() as u64);
        let skip = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let take = pagination.page_size as usize;
        let items = all.into_iter().skip(skip).take(take).collect();
        Self { items, pagination }
    }

    /// Applies `f` to every item, keeping the pagination metadata.
    #[must_use]
    pub fn map_items<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.pagination.has_next
    }
}
