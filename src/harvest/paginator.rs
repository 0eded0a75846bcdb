//! Exhaustive walks over `Link`-paginated GitHub collections.
//!
//! A walk starts at a known cursor and follows each page's `rel="next"`
//! cursor until a page arrives without one. Pages are fetched strictly one
//! after another: page N is fully delivered to the caller before page N+1 is
//! requested. There is no page-count bound other than the server ending the
//! chain, but a cursor that repeats one already visited ends the walk so a
//! misbehaving server cannot trap the harvester in a loop.

use std::collections::HashSet;
use std::marker::PhantomData;

use futures::Stream;
use serde::de::DeserializeOwned;

use crate::github::error::IntakeError;
use crate::github::gateway::{ApiPage, CollectionGateway};
use crate::github::pagination::PageCursor;

use super::gate::ConcurrencyGate;
use super::retry::RetryPolicy;

/// Totals reported once a walk has drained its collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationSummary {
    /// Pages fetched, including empty ones.
    pub pages: usize,
    /// Items delivered across all pages.
    pub items: usize,
}

/// Shared handles every stage needs to issue a fetch.
pub struct FetchContext<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    gateway: &'a G,
    gate: &'a ConcurrencyGate,
    retry: RetryPolicy,
}

impl<G> Clone for FetchContext<'_, G>
where
    G: CollectionGateway + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for FetchContext<'_, G> where G: CollectionGateway + ?Sized {}

impl<'a, G> FetchContext<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    /// Bundles the gateway with the gate and retry policy guarding it.
    #[must_use]
    pub const fn new(gateway: &'a G, gate: &'a ConcurrencyGate, retry: RetryPolicy) -> Self {
        Self {
            gateway,
            gate,
            retry,
        }
    }

    /// Starts a walk at `start`.
    #[must_use]
    pub fn paginate<T>(self, start: PageCursor) -> CursorPaginator<'a, G, T>
    where
        T: DeserializeOwned,
    {
        CursorPaginator::new(self.gateway, self.gate, self.retry, start)
    }

    /// Fetches one page while holding a gate permit, retrying transient
    /// failures.
    ///
    /// # Errors
    ///
    /// Returns the gateway's error once retries are exhausted.
    pub async fn fetch(self, cursor: &PageCursor) -> Result<ApiPage, IntakeError> {
        let Self {
            gateway,
            gate,
            retry,
        } = self;
        retry
            .run("fetch page", || async move {
                let _permit = gate.acquire().await?;
                gateway.fetch_page(cursor).await
            })
            .await
    }
}

/// Lazy sequence of typed pages starting from one cursor.
///
/// Each fetch holds a permit from the shared [`ConcurrencyGate`] and is
/// retried according to the [`RetryPolicy`]. When a fetch fails the cursor is
/// kept, so calling [`CursorPaginator::next_page`] again retries the same page.
pub struct CursorPaginator<'a, G, T>
where
    G: CollectionGateway + ?Sized,
{
    context: FetchContext<'a, G>,
    next: Option<PageCursor>,
    visited: HashSet<PageCursor>,
    pages_fetched: usize,
    item: PhantomData<fn() -> T>,
}

impl<'a, G, T> CursorPaginator<'a, G, T>
where
    G: CollectionGateway + ?Sized,
    T: DeserializeOwned,
{
    /// Prepares a walk beginning at `start`. Nothing is fetched until the
    /// first page is requested.
    #[must_use]
    pub fn new(
        gateway: &'a G,
        gate: &'a ConcurrencyGate,
        retry: RetryPolicy,
        start: PageCursor,
    ) -> Self {
        Self {
            context: FetchContext::new(gateway, gate, retry),
            next: Some(start),
            visited: HashSet::new(),
            pages_fetched: 0,
            item: PhantomData,
        }
    }

    /// Number of pages fetched so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Returns `true` once the last page has been delivered.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Fetches the next page and deserialises its items.
    ///
    /// Returns `Ok(None)` when the walk has ended.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures once retries are exhausted, and returns
    /// [`IntakeError::Api`] when an element does not match `T`.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, IntakeError> {
        let Some(cursor) = self.next.take() else {
            return Ok(None);
        };

        if !self.visited.insert(cursor.clone()) {
            tracing::warn!(
                cursor = cursor.as_str(),
                "pagination cursor repeated; ending walk"
            );
            return Ok(None);
        }

        let page = match self.context.fetch(&cursor).await {
            Ok(page) => page,
            Err(error) => {
                self.visited.remove(&cursor);
                self.next = Some(cursor);
                return Err(error);
            }
        };

        self.pages_fetched += 1;
        tracing::debug!(
            cursor = cursor.as_str(),
            items = page.items.len(),
            has_next = page.next.is_some(),
            "fetched page"
        );
        self.next = page.next;
        let items = page
            .items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|error| IntakeError::Api {
                message: format!("unexpected item in page {cursor}: {error}"),
            })?;
        Ok(Some(items))
    }

    /// Drains the walk, invoking `on_item` for every element in page order.
    ///
    /// Items delivered before a failure stay delivered.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`CursorPaginator::next_page`].
    pub async fn for_each_item<F>(mut self, mut on_item: F) -> Result<PaginationSummary, IntakeError>
    where
        F: FnMut(T),
    {
        let mut summary = PaginationSummary::default();
        while let Some(items) = self.next_page().await? {
            summary.pages += 1;
            summary.items += items.len();
            items.into_iter().for_each(&mut on_item);
        }
        Ok(summary)
    }

    /// Turns the walk into a stream of pages.
    pub fn pages(self) -> impl Stream<Item = Result<Vec<T>, IntakeError>> {
        futures::stream::try_unfold(self, |mut paginator| async move {
            let page = paginator.next_page().await?;
            Ok(page.map(|items| (items, paginator)))
        })
    }
}
