//! List queries and stale-response protection for the list pages
//!
//! A page never refetches implicitly. Each fetch is described by a
//! [`ListQuery`], tagged with a [`RequestToken`], and its response is only
//! applied if no newer fetch has started since.

use matchdesk_core::types::Page;
use matchdesk_services::ServiceResult;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

/// Identifies one fetch; later fetches carry larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Hands out request tokens and remembers the latest
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// Create a sequencer with no requests issued
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue a new token, superseding every earlier one
    pub fn next(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `token` is the most recently issued
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }
}

/// Everything a list fetch depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Page-specific filters
    pub filters: F,
}

impl<F: Default> ListQuery<F> {
    /// First page with default filters
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            filters: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    /// Same filters, different page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// New filters; always goes back to page 1
    pub fn with_filters(mut self, filters: F) -> Self {
        self.filters = filters;
        self.page = 1;
        self
    }
}

/// Loaded rows plus the loading flag
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    /// Rows of the current page
    pub items: Vec<T>,
    /// Total rows across all pages
    pub total: u64,
    /// Whether a fetch is pending
    pub loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
        }
    }
}

/// Query, state and sequencing for one list page
#[derive(Debug)]
pub struct ListController<F, T> {
    label: &'static str,
    query: ListQuery<F>,
    state: ListState<T>,
    sequencer: RequestSequencer,
}

impl<F: Clone + Default, T> ListController<F, T> {
    /// Create a controller at page 1 with default filters
    pub fn new(label: &'static str, page_size: u32) -> Self {
        Self {
            label,
            query: ListQuery::first(page_size),
            state: ListState::default(),
            sequencer: RequestSequencer::new(),
        }
    }

    /// Current query
    pub const fn query(&self) -> &ListQuery<F> {
        &self.query
    }

    /// Current state
    pub const fn state(&self) -> &ListState<T> {
        &self.state
    }

    /// Rows of the current page
    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    /// Total number of pages, at least 1
    pub fn total_pages(&self) -> u32 {
        let page_size = u64::from(self.query.page_size.max(1));
        u32::try_from(self.state.total.div_ceil(page_size))
            .unwrap_or(u32::MAX)
            .max(1)
    }

    /// Replace the filters, returning to page 1
    pub fn set_filters(&mut self, filters: F) {
        self.query = self.query.clone().with_filters(filters);
    }

    /// Move to `page`
    pub fn set_page(&mut self, page: u32) {
        self.query = self.query.clone().with_page(page);
    }

    /// Start a fetch: marks the list loading and returns the token and query to fetch with
    pub fn begin(&mut self) -> (RequestToken, ListQuery<F>) {
        self.state.loading = true;
        (self.sequencer.next(), self.query.clone())
    }

    /// Apply a fetch result
    ///
    /// Returns `false` and leaves the state alone when `token` has been
    /// superseded. A failed fetch empties the list.
    pub fn complete(&mut self, token: RequestToken, result: ServiceResult<Page<T>>) -> bool {
        if !self.sequencer.is_latest(token) {
            debug!(list = self.label, ?token, "Discarding stale response");
            return false;
        }

        match result {
            Ok(page) => {
                self.state.items = page.items;
                self.state.total = page.total;
            }
            Err(e) => {
                error!(list = self.label, error = %e, "Failed to fetch list");
                self.state.items.clear();
                self.state.total = 0;
            }
        }
        self.state.loading = false;
        true
    }

    /// Fetch the current query with `fetch` and apply the result
    pub async fn refresh<Fut>(&mut self, fetch: impl FnOnce(ListQuery<F>) -> Fut) -> bool
    where
        Fut: Future<Output = ServiceResult<Page<T>>>,
    {
        let (token, query) = self.begin();
        let result = fetch(query).await;
        self.complete(token, result)
    }
}
