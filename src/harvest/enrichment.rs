//! Best-effort latest-comment lookup for every collected pull request.
//!
//! Lookups run concurrently and each publishes its result as soon as it
//! lands. Failures and empty comment lists are logged and otherwise ignored.
//! An outstanding-task counter settles the harvest when the last lookup
//! finishes, whatever its outcome.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

use crate::github::error::IntakeError;
use crate::github::gateway::CollectionGateway;
use crate::github::models::{ApiComment, PullRequestComment};
use crate::github::pagination::PageCursor;

use super::paginator::FetchContext;
use super::state::{EnrichmentTarget, HarvestPhase, HarvestState};

/// Query asking GitHub for newest comments first.
const NEWEST_FIRST: [(&str, &str); 2] = [("sort", "created"), ("direction", "desc")];

/// Outcome counts for one enrichment sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// Lookups issued.
    pub attempted: usize,
    /// Comments attached.
    pub attached: usize,
    /// Pull requests with no comments.
    pub empty: usize,
    /// Lookups that failed.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Attached,
    Empty,
    Failed,
}

/// Third harvest stage.
pub struct EnrichmentScanner<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    context: FetchContext<'a, G>,
}

impl<'a, G> EnrichmentScanner<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    /// Creates the stage.
    #[must_use]
    pub const fn new(context: FetchContext<'a, G>) -> Self {
        Self { context }
    }

    /// Looks up the latest comment of every pull request currently in
    /// `state`. Pull requests appended afterwards are not visited.
    ///
    /// Never fails; the harvest is settled once every lookup has finished.
    pub async fn scan(&self, state: &HarvestState) -> EnrichmentSummary {
        state.advance(HarvestPhase::ScanningComments);
        let targets = state.enrichment_targets();
        if targets.is_empty() {
            state.mark_enrichment_complete();
            return EnrichmentSummary::default();
        }

        let outstanding = AtomicUsize::new(targets.len());
        let outcomes = join_all(
            targets
                .iter()
                .map(|target| self.enrich(target, &outstanding, state)),
        )
        .await;

        outcomes.into_iter().fold(
            EnrichmentSummary {
                attempted: targets.len(),
                ..EnrichmentSummary::default()
            },
            |mut summary, outcome| {
                match outcome {
                    Outcome::Attached => summary.attached += 1,
                    Outcome::Empty => summary.empty += 1,
                    Outcome::Failed => summary.failed += 1,
                }
                summary
            },
        )
    }

    async fn enrich(
        &self,
        target: &EnrichmentTarget,
        outstanding: &AtomicUsize,
        state: &HarvestState,
    ) -> Outcome {
        let outcome = match self.latest_comment(target).await {
            Ok(Some(comment)) => {
                state.attach_comment(target.id, comment);
                Outcome::Attached
            }
            Ok(None) => Outcome::Empty,
            Err(error) => {
                tracing::warn!(
                    pull_request = target.id,
                    "latest comment lookup failed: {error}"
                );
                Outcome::Failed
            }
        };

        if outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            state.mark_enrichment_complete();
        }
        outcome
    }

    async fn latest_comment(
        &self,
        target: &EnrichmentTarget,
    ) -> Result<Option<PullRequestComment>, IntakeError> {
        let cursor = PageCursor::new(target.comments_url.as_str()).with_query(&NEWEST_FIRST);
        let page = self.context.fetch(&cursor).await?;
        let Some(latest) = page.items.into_iter().next() else {
            return Ok(None);
        };
        let comment: ApiComment =
            serde_json::from_value(latest).map_err(|error| IntakeError::Api {
                message: format!("unexpected comment payload: {error}"),
            })?;
        Ok(Some(comment.into()))
    }
}
