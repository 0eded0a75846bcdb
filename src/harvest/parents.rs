//! Enumerates the organisation's repositories.

use crate::github::error::IntakeError;
use crate::github::gateway::CollectionGateway;
use crate::github::locator::OrganisationLocator;
use crate::github::models::ApiRepository;

use super::paginator::{FetchContext, PaginationSummary};
use super::state::{HarvestPhase, HarvestState};

/// First harvest stage: one walk over `/orgs/{org}/repos`.
pub struct ParentEnumerator<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    context: FetchContext<'a, G>,
    per_page: u8,
}

impl<'a, G> ParentEnumerator<'a, G>
where
    G: CollectionGateway + ?Sized,
{
    /// Creates the stage.
    #[must_use]
    pub const fn new(context: FetchContext<'a, G>, per_page: u8) -> Self {
        Self { context, per_page }
    }

    /// Appends every repository to `state` as it arrives.
    ///
    /// # Errors
    ///
    /// Propagates the first fetch failure. Repositories appended before the
    /// failure remain in `state`.
    pub async fn enumerate(
        &self,
        locator: &OrganisationLocator,
        state: &HarvestState,
    ) -> Result<PaginationSummary, IntakeError> {
        state.advance(HarvestPhase::ScanningParents);
        let summary = self
            .context
            .paginate::<ApiRepository>(locator.repositories_cursor(self.per_page))
            .for_each_item(|repository| state.push_parent(repository.into()))
            .await?;
        tracing::debug!(
            organisation = locator.organisation().as_str(),
            repositories = summary.items,
            pages = summary.pages,
            "enumerated repositories"
        );
        Ok(summary)
    }
}
