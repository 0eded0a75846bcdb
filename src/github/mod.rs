//! GitHub collection access for the harvester.
//!
//! This module wraps Octocrab to fetch pages of GitHub collections, follow
//! their `Link` header cursors, and map failures into user-friendly error
//! variants so that callers never see Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use error::IntakeError;
pub use gateway::{ApiPage, CollectionGateway, OctocrabCollectionGateway};
pub use locator::{OrganisationLocator, OrganisationName, PersonalAccessToken};
pub use models::{PullRequest, PullRequestComment, Repository, SafeHtml};
pub use pagination::{PageCursor, parse_next_link};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockCollectionGateway;

#[cfg(test)]
mod tests;
