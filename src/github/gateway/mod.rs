//! Gateways for fetching paginated collections through Octocrab.
//!
//! The harvester only needs one capability from GitHub: fetch a page at a
//! cursor and report where the next page lives. The trait keeps that seam
//! mockable while the Octocrab implementation handles real HTTP requests.

mod client;
mod collection;
mod error_mapping;
mod http_utils;

pub use collection::OctocrabCollectionGateway;

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::pagination::PageCursor;
use crate::github::rate_limit::RateLimitInfo;

/// One page of a paginated collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiPage {
    /// Page elements in the order GitHub returned them.
    pub items: Vec<serde_json::Value>,
    /// Cursor for the following page, absent on the last page.
    pub next: Option<PageCursor>,
    /// Rate limit headers sent with the page, when present.
    pub rate_limit: Option<RateLimitInfo>,
}

impl ApiPage {
    /// Builds a page from its items and optional next cursor.
    #[must_use]
    pub const fn new(items: Vec<serde_json::Value>, next: Option<PageCursor>) -> Self {
        Self {
            items,
            next,
            rate_limit: None,
        }
    }
}

/// Authenticated fetch capability for paginated GitHub collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionGateway: Send + Sync {
    /// Fetch the page at `cursor`.
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiPage, IntakeError>;
}
