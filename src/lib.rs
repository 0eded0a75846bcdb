//! prdash library crate: harvests an organisation's open pull requests.
//!
//! The library wraps Octocrab to walk GitHub's `Link`-paginated collections,
//! fans out across every repository of an organisation, enriches each open
//! pull request with its latest comment, and publishes progress through a
//! watch channel so dashboards can render while the harvest runs.

pub mod config;
pub mod github;
pub mod harvest;
pub mod telemetry;

pub use config::PrDashConfig;
pub use github::{
    CollectionGateway, IntakeError, OctocrabCollectionGateway, OrganisationLocator,
    PersonalAccessToken, PullRequest, PullRequestComment, Repository,
};
pub use harvest::{HarvestOptions, HarvestPhase, HarvestSnapshot, Harvester, Lifespan};
