//! Data models for harvested repositories, pull requests, and comments.
//!
//! Types prefixed with `Api` are internal deserialisation targets matching
//! the GitHub REST payloads. Harvest stages convert them into the public
//! domain types held in the harvest state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Markup that has been produced by the harvester and is trusted for
/// rendering without further escaping.
///
/// Only the harvest stages can mark content as safe; consumers can read it
/// but not forge it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub(crate) const fn trusted(markup: String) -> Self {
        Self(markup)
    }

    /// Borrow the markup.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Repository belonging to the harvested organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Short repository name, used to address its pull requests.
    pub name: String,
    /// `owner/name` form when GitHub supplied it.
    pub full_name: Option<String>,
    /// Browser URL for the repository.
    pub html_url: Option<String>,
}

/// Most recent discussion comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestComment {
    /// Comment identifier.
    pub id: Option<u64>,
    /// Author login.
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Comment body as written.
    pub body: String,
}

/// Open pull request collected from one of the organisation's repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Globally unique pull request identifier.
    pub id: u64,
    /// Pull request number within its repository.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Browser URL for the pull request.
    pub html_url: Option<String>,
    /// Name of the repository the pull request targets.
    pub repository: String,
    /// State reported by GitHub; always `open` once harvested.
    pub state: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Whole days between creation and the harvest instant.
    pub days_since_created: u64,
    /// Whole days between the last update and the harvest instant.
    pub days_since_updated: u64,
    /// Description with hyperlinks activated.
    pub body: SafeHtml,
    /// Location of the pull request's discussion comments.
    pub comments_url: Option<String>,
    /// Most recent comment, filled in by the enrichment sweep.
    pub last_comment: Option<PullRequestComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

/// API response type for organisation repository listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) full_name: Option<String>,
    pub(crate) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLink {
    pub(crate) href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiPullRequestLinks {
    pub(crate) comments: Option<ApiLink>,
}

/// API response type for repository pull request listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) id: u64,
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) state: String,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) body: Option<String>,
    pub(crate) comments_url: Option<String>,
    #[serde(rename = "_links", default)]
    pub(crate) links: ApiPullRequestLinks,
}

impl ApiPullRequest {
    /// Comment sub-collection location, preferring the `_links` entry.
    pub(crate) fn comments_location(&self) -> Option<String> {
        self.links
            .comments
            .as_ref()
            .map(|link| link.href.clone())
            .or_else(|| self.comments_url.clone())
    }
}

/// API response type for issue comments.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiComment {
    pub(crate) id: Option<u64>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) body: Option<String>,
}

impl From<ApiRepository> for Repository {
    fn from(value: ApiRepository) -> Self {
        Self {
            name: value.name,
            full_name: value.full_name,
            html_url: value.html_url,
        }
    }
}

impl From<ApiComment> for PullRequestComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
            body: value.body.unwrap_or_default(),
        }
    }
}
