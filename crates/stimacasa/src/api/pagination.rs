//! Offset/limit "load more" support for the paginated list endpoints.

use std::future::Future;

use tracing::debug;

use super::client::ApiClient;
use super::endpoints::DashboardKind;
use super::error::ApiError;
use super::types::{DashboardResponse, DashboardStatistics, ImmobileSummary, PageMeta, PagedList};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }
}

/// Response envelope carrying one page of items.
pub trait Paginated {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, PageMeta);
}

impl<T> Paginated for PagedList<T> {
    type Item = T;

    fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.items, self.page)
    }
}

impl Paginated for DashboardResponse {
    type Item = ImmobileSummary;

    fn into_parts(self) -> (Vec<ImmobileSummary>, PageMeta) {
        (self.immobili, self.page)
    }
}

/// Position in a paginated listing; stops once the server reports `hasMore: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: u32,
    limit: u32,
    has_more: bool,
}

impl PageCursor {
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            has_more: true,
        }
    }

    /// The request to issue next, or `None` when the listing is exhausted.
    pub fn next_request(&self) -> Option<PageRequest> {
        self.has_more.then_some(PageRequest {
            offset: self.offset,
            limit: self.limit,
        })
    }

    pub fn advance(&mut self, meta: &PageMeta) {
        self.offset = meta.next_offset;
        self.has_more = meta.has_more;
    }

    pub fn is_exhausted(&self) -> bool {
        !self.has_more
    }
}

/// Items accumulated across successive "load more" fetches.
#[derive(Debug, Clone)]
pub struct Feed<T> {
    cursor: PageCursor,
    items: Vec<T>,
}

impl<T> Feed<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            cursor: PageCursor::new(limit),
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        !self.cursor.is_exhausted()
    }

    pub fn next_request(&self) -> Option<PageRequest> {
        self.cursor.next_request()
    }

    /// Append a fetched page and move the cursor; returns the count of new items.
    pub fn absorb(&mut self, items: Vec<T>, meta: PageMeta) -> usize {
        let added = items.len();
        self.items.extend(items);
        self.cursor.advance(&meta);
        debug!(
            added,
            next_offset = meta.next_offset,
            has_more = meta.has_more,
            "feed page loaded"
        );
        added
    }

    /// Fetch the next page through `fetch`, or do nothing when the listing is exhausted.
    ///
    /// Returns `Ok(None)` without calling `fetch` once the server reported no more pages.
    pub async fn load_more<P, F, Fut>(&mut self, fetch: F) -> Result<Option<usize>, ApiError>
    where
        P: Paginated<Item = T>,
        F: FnOnce(PageRequest) -> Fut,
        Fut: Future<Output = Result<P, ApiError>>,
    {
        let Some(request) = self.next_request() else {
            return Ok(None);
        };
        let (items, meta) = fetch(request).await?.into_parts();
        Ok(Some(self.absorb(items, meta)))
    }
}

/// Admin or agent dashboard with its listing loaded incrementally.
#[derive(Debug)]
pub struct DashboardFeed<'c> {
    client: &'c ApiClient,
    kind: DashboardKind,
    statistics: Option<DashboardStatistics>,
    feed: Feed<ImmobileSummary>,
}

impl<'c> DashboardFeed<'c> {
    pub fn new(client: &'c ApiClient, kind: DashboardKind, limit: u32) -> Self {
        Self {
            client,
            kind,
            statistics: None,
            feed: Feed::new(limit),
        }
    }

    /// Counters from the most recent page.
    pub fn statistics(&self) -> Option<&DashboardStatistics> {
        self.statistics.as_ref()
    }

    pub fn immobili(&self) -> &[ImmobileSummary] {
        self.feed.items()
    }

    pub fn has_more(&self) -> bool {
        self.feed.has_more()
    }

    pub async fn load_more(&mut self) -> Result<Option<usize>, ApiError> {
        let Some(request) = self.feed.next_request() else {
            return Ok(None);
        };
        let response = self.client.dashboard(self.kind, request).await?;
        self.statistics = Some(response.statistics.clone());
        let (items, meta) = response.into_parts();
        Ok(Some(self.feed.absorb(items, meta)))
    }
}
