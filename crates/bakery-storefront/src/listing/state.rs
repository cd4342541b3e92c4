//! Synchronous state machine behind [`super::Listing`].
//!
//! Every fetch is described by a [`FetchTicket`]. A ticket is only applied
//! when it is still the in-flight ticket of the current epoch; anything
//! else is a stale response and is dropped.

use bakery_client::{ClientError, ErrorCategory};
use bakery_core::{clamp_page_size, filter_by_name, Page, Pagination, Product};

use super::trigger::SentinelTrigger;

/// How fetched pages are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pages are appended as the sentinel scrolls into view.
    #[default]
    Infinite,
    /// One page at a time, chosen with `go_to_page`. Sentinel signals are
    /// ignored.
    Paged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// The item set is being (re)built from page 1 or a jumped-to page.
    InitialLoading,
    LoadingMore,
}

/// Identifies one outstanding fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    seq: u64,
    page: u32,
}

impl FetchTicket {
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Everything a driver needs to perform the fetch for a ticket.
#[derive(Debug, Clone)]
pub struct FetchRequest<F> {
    pub ticket: FetchTicket,
    pub filter: F,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The response belonged to a superseded epoch or ticket and was dropped.
    Stale,
}

/// A fetch failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&ClientError> for LoadError {
    fn from(err: &ClientError) -> Self {
        Self {
            category: err.category(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug)]
pub struct ListingState<F> {
    filter: F,
    mode: Mode,
    page_size: u32,
    items: Vec<Product>,
    /// Next page to request in infinite mode; the page after the shown one
    /// in paged mode.
    next_page: u32,
    has_more: bool,
    phase: Phase,
    error: Option<LoadError>,
    failed_page: Option<u32>,
    pagination: Option<Pagination>,
    epoch: u64,
    next_seq: u64,
    in_flight: Option<FetchTicket>,
    sentinel: SentinelTrigger,
}

impl<F: Clone + PartialEq> ListingState<F> {
    /// A listing that has not fetched anything yet. Call
    /// [`ListingState::initial_load`] to start.
    #[must_use]
    pub fn new(filter: F, page_size: u32, mode: Mode) -> Self {
        Self {
            filter,
            mode,
            page_size: clamp_page_size(page_size),
            items: Vec::new(),
            next_page: 1,
            has_more: true,
            phase: Phase::Idle,
            error: None,
            failed_page: None,
            pagination: None,
            epoch: 0,
            next_seq: 0,
            in_flight: None,
            sentinel: SentinelTrigger::default(),
        }
    }

    fn issue(&mut self, page: u32) -> FetchRequest<F> {
        self.next_seq += 1;
        let ticket = FetchTicket {
            epoch: self.epoch,
            seq: self.next_seq,
            page,
        };
        self.in_flight = Some(ticket);
        FetchRequest {
            ticket,
            filter: self.filter.clone(),
            page,
            page_size: self.page_size,
        }
    }

    /// Starts a new epoch: clears everything and fetches page 1.
    fn restart(&mut self) -> FetchRequest<F> {
        self.epoch += 1;
        self.items.clear();
        self.next_page = 1;
        self.has_more = true;
        self.error = None;
        self.failed_page = None;
        self.pagination = None;
        self.phase = Phase::InitialLoading;
        self.sentinel.reset();
        self.issue(1)
    }

    /// Switches the filter. A no-op when `filter` equals the current one.
    pub fn set_filter(&mut self, filter: F) -> Option<FetchRequest<F>> {
        if filter == self.filter {
            return None;
        }
        self.filter = filter;
        Some(self.restart())
    }

    /// Refetches from page 1 under the current filter, superseding any
    /// outstanding fetch.
    pub fn initial_load(&mut self) -> FetchRequest<F> {
        self.restart()
    }

    /// Requests the next page. Returns `None` when there is nothing more,
    /// a fetch is already outstanding, or the listing is in paged mode.
    pub fn load_more(&mut self) -> Option<FetchRequest<F>> {
        if self.mode == Mode::Paged || !self.has_more || self.in_flight.is_some() {
            return None;
        }
        self.phase = Phase::LoadingMore;
        let page = self.next_page;
        Some(self.issue(page))
    }

    /// Feeds a visibility observation of the end-of-list sentinel.
    ///
    /// Only a transition into view can trigger a fetch.
    pub fn sentinel_visible(&mut self, visible: bool) -> Option<FetchRequest<F>> {
        if !self.sentinel.observe(visible) || self.mode == Mode::Paged {
            return None;
        }
        self.load_more()
    }

    /// Paged mode only: replaces the shown items with page `page`.
    ///
    /// Pages past the last one the backend reported are refused.
    pub fn go_to_page(&mut self, page: u32) -> Option<FetchRequest<F>> {
        if self.mode != Mode::Paged || page == 0 {
            return None;
        }
        if let Some(known) = self.pagination {
            if known.total_pages > 0 && page > known.total_pages {
                return None;
            }
        }
        self.epoch += 1;
        self.items.clear();
        self.error = None;
        self.failed_page = None;
        self.phase = Phase::InitialLoading;
        Some(self.issue(page))
    }

    /// Retries after a failure. Only ever triggered by the user.
    pub fn retry(&mut self) -> Option<FetchRequest<F>> {
        let failed_page = self.failed_page?;
        match self.mode {
            Mode::Paged => self.go_to_page(failed_page),
            Mode::Infinite if self.items.is_empty() => Some(self.restart()),
            Mode::Infinite => {
                self.error = None;
                self.failed_page = None;
                self.has_more = true;
                self.load_more()
            }
        }
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<Product>, ClientError>,
    ) -> Completion {
        if ticket.epoch != self.epoch || self.in_flight != Some(ticket) {
            tracing::warn!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                page = ticket.page,
                "discarding stale listing response"
            );
            return Completion::Stale;
        }
        self.in_flight = None;
        let appending = self.phase == Phase::LoadingMore;
        self.phase = Phase::Idle;

        match result {
            Ok(page) => {
                if appending {
                    self.items.extend(page.items);
                } else {
                    self.items = page.items;
                }
                self.has_more = page.pagination.has_next;
                self.next_page = ticket.page.saturating_add(1);
                // The sentinel moved below the new items; its next report
                // starts a fresh observation.
                self.sentinel.reset();
                self.pagination = Some(page.pagination);
                self.error = None;
            }
            Err(ClientError::NotFound { .. }) => {
                if !appending {
                    self.items.clear();
                }
                self.has_more = false;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(page = ticket.page, error = %err, "listing fetch failed");
                self.error = Some(LoadError::from(&err));
                self.failed_page = Some(ticket.page);
                self.has_more = false;
            }
        }
        Completion::Applied
    }

    /// Hides the error banner. The listing stays exhausted until
    /// [`ListingState::retry`] or a new epoch.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Items whose name contains `query`, ignoring case. Never fetches.
    #[must_use]
    pub fn visible_items(&self, query: &str) -> Vec<&Product> {
        filter_by_name(&self.items, query)
    }

    #[must_use]
    pub fn filter(&self) -> &F {
        &self.filter
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// The next page infinite mode would request.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.next_page
    }

    /// The last page that was applied; 0 before the first response.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.pagination.map_or(0, |p| p.page)
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_initial_loading(&self) -> bool {
        self.phase == Phase::InitialLoading
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.phase == Phase::LoadingMore
    }

    #[must_use]
    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True once a load finished with no items and no error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase == Phase::Idle
            && self.in_flight.is_none()
            && self.epoch > 0
            && self.items.is_empty()
            && self.error.is_none()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
