//! Collects open pull requests from every enumerated repository.
//!
//! One walk is started per repository and all walks run concurrently,
//! bounded only by the shared gate. The phase ticks to
//! `scanning children (i of N)` as each walk is initiated, not as it
//! finishes.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::github::error::IntakeError;
use crate::github::gateway::CollectionGateway;
use crate::github::locator::OrganisationLocator;
use crate::github::models::{ApiPullRequest, PullRequest, Repository};

use super::hyperlinks::activate_hyperlinks;
use super::paginator::FetchContext;
use super::state::{HarvestPhase, HarvestState};

const MILLIS_PER_DAY: u64 = 86_400_000;
const OPEN: &str = "open";

/// Totals for one collection sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Repositories walked.
    pub walks: usize,
    /// Pull requests returned by GitHub, open or not.
    pub seen: usize,
    /// Open pull requests appended to the state.
    pub kept: usize,
}

/// Second harvest stage.
pub struct ChildCollector<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    context: FetchContext<'a, G>,
    per_page: u8,
    now: DateTime<Utc>,
}

impl<'a, G> ChildCollector<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    /// Creates the stage. Ages are measured against `now`.
    #[must_use]
    pub const fn new(context: FetchContext<'a, G>, per_page: u8, now: DateTime<Utc>) -> Self {
        Self {
            context,
            per_page,
            now,
        }
    }

    /// Walks the pull requests of every repository currently in `state`.
    ///
    /// # Errors
    ///
    /// Returns the first walk failure. Pull requests already appended by any
    /// walk remain in `state`.
    pub async fn collect(
        &self,
        locator: &OrganisationLocator,
        state: &HarvestState,
    ) -> Result<CollectionSummary, IntakeError> {
        let parents = state.snapshot().parents;
        let total = parents.len();
        let initiated = AtomicUsize::new(0);

        let walks = parents
            .iter()
            .map(|parent| self.walk(locator, parent, total, &initiated, state));
        let results = try_join_all(walks).await?;

        Ok(results
            .into_iter()
            .fold(CollectionSummary::default(), |acc, (seen, kept)| {
                CollectionSummary {
                    walks: acc.walks + 1,
                    seen: acc.seen + seen,
                    kept: acc.kept + kept,
                }
            }))
    }

    async fn walk(
        &self,
        locator: &OrganisationLocator,
        parent: &Repository,
        total: usize,
        initiated: &AtomicUsize,
        state: &HarvestState,
    ) -> Result<(usize, usize), IntakeError> {
        let current = initiated.fetch_add(1, Ordering::Relaxed) + 1;
        state.advance(HarvestPhase::ScanningChildren { current, total });

        let repository = parent.name.as_str();
        let mut kept = 0;
        let summary = self
            .context
            .paginate::<ApiPullRequest>(locator.pull_requests_cursor(repository, self.per_page))
            .for_each_item(|api| {
                if let Some(pull) = harvest_pull_request(api, repository, self.now)
                    && state.push_child(pull)
                {
                    kept += 1;
                }
            })
            .await?;

        tracing::debug!(repository, seen = summary.items, kept, "collected pull requests");
        Ok((summary.items, kept))
    }
}

/// Converts an API pull request into a harvested one, discarding anything
/// that is not open.
pub(crate) fn harvest_pull_request(
    api: ApiPullRequest,
    repository: &str,
    now: DateTime<Utc>,
) -> Option<PullRequest> {
    if api.state != OPEN {
        return None;
    }

    let comments_url = api.comments_location();
    let body = activate_hyperlinks(api.body.as_deref().unwrap_or_default());
    Some(PullRequest {
        id: api.id,
        number: api.number,
        title: api.title,
        author: api.user.and_then(|user| user.login),
        html_url: api.html_url,
        repository: repository.to_owned(),
        state: api.state,
        days_since_created: days_between(api.created_at, now),
        days_since_updated: days_between(api.updated_at, now),
        created_at: api.created_at,
        updated_at: api.updated_at,
        body,
        comments_url,
        last_comment: None,
    })
}

/// Whole days between two instants, rounded to the nearest day.
///
/// The difference is absolute, so the argument order does not matter.
///
/// # Example
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use prdash::harvest::children::days_between;
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
/// let created = now - Duration::hours(3 * 24 + 10);
/// assert_eq!(days_between(created, now), 3);
/// ```
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "rounding to whole days is the intended result"
)]
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let millis = (to - from).num_milliseconds().unsigned_abs();
    millis.saturating_add(MILLIS_PER_DAY / 2) / MILLIS_PER_DAY
}
