//! Test helpers for constructing harvested `PullRequest` fixtures.
//!
//! # Examples
//!
//! ```
//! use prdash::github::models::test_support::PullRequestBuilder;
//!
//! let pull = PullRequestBuilder::new(1, "openmrs-core")
//!     .title("Fix login")
//!     .days_since_created(3)
//!     .build();
//! assert_eq!(pull.days_since_created, 3);
//! assert_eq!(pull.repository, "openmrs-core");
//! ```

use chrono::{DateTime, Utc};

use super::{PullRequest, PullRequestComment, SafeHtml};

/// Builder for `PullRequest` values with sensible defaults.
#[derive(Debug, Clone)]
pub struct PullRequestBuilder {
    pull: PullRequest,
}

impl PullRequestBuilder {
    /// Starts an open pull request with the given id in `repository`.
    #[must_use]
    pub fn new(id: u64, repository: &str) -> Self {
        Self {
            pull: PullRequest {
                id,
                number: id,
                title: None,
                author: None,
                html_url: None,
                repository: repository.to_owned(),
                state: "open".to_owned(),
                created_at: DateTime::<Utc>::UNIX_EPOCH,
                updated_at: DateTime::<Utc>::UNIX_EPOCH,
                days_since_created: 0,
                days_since_updated: 0,
                body: SafeHtml::default(),
                comments_url: None,
                last_comment: None,
            },
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.pull.title = Some(title.to_owned());
        self
    }

    /// Sets the author login.
    #[must_use]
    pub fn author(mut self, author: &str) -> Self {
        self.pull.author = Some(author.to_owned());
        self
    }

    /// Sets the body markup, treating it as already trusted.
    #[must_use]
    pub fn body(mut self, markup: &str) -> Self {
        self.pull.body = SafeHtml::trusted(markup.to_owned());
        self
    }

    /// Sets the age in days.
    #[must_use]
    pub const fn days_since_created(mut self, days: u64) -> Self {
        self.pull.days_since_created = days;
        self
    }

    /// Sets the days since the last update.
    #[must_use]
    pub const fn days_since_updated(mut self, days: u64) -> Self {
        self.pull.days_since_updated = days;
        self
    }

    /// Sets the comment sub-collection location.
    #[must_use]
    pub fn comments_url(mut self, url: &str) -> Self {
        self.pull.comments_url = Some(url.to_owned());
        self
    }

    /// Attaches a latest comment.
    #[must_use]
    pub fn last_comment(mut self, comment: PullRequestComment) -> Self {
        self.pull.last_comment = Some(comment);
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> PullRequest {
        self.pull
    }
}
