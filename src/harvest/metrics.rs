//! Dashboard statistics derived from the harvested pull requests.

use std::fmt;

use crate::github::models::PullRequest;

/// Average age of a set of pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifespan {
    /// Mean age in whole days.
    Days(u64),
    /// No pull request matched; rendered as `?`.
    Unknown,
}

impl fmt::Display for Lifespan {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(formatter, "{days}"),
            Self::Unknown => formatter.write_str("?"),
        }
    }
}

/// Mean `days_since_created` of the pull requests accepted by `predicate`,
/// rounded to the nearest day with halves rounding up.
///
/// # Example
///
/// ```
/// use prdash::github::models::test_support::PullRequestBuilder;
/// use prdash::harvest::metrics::{Lifespan, average_lifespan_days};
///
/// let pulls: Vec<_> = [2, 3, 5]
///     .into_iter()
///     .enumerate()
///     .map(|(id, days)| PullRequestBuilder::new(id as u64, "core").days_since_created(days).build())
///     .collect();
/// assert_eq!(average_lifespan_days(&pulls, |_| true), Lifespan::Days(3));
/// assert_eq!(average_lifespan_days(&pulls, |_| false).to_string(), "?");
/// ```
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "integer rounding of the mean avoids float arithmetic"
)]
pub fn average_lifespan_days<F>(children: &[PullRequest], predicate: F) -> Lifespan
where
    F: Fn(&PullRequest) -> bool,
{
    let (count, total) = children
        .iter()
        .filter(|child| predicate(child))
        .fold((0_u64, 0_u64), |(count, total), child| {
            (count + 1, total.saturating_add(child.days_since_created))
        });

    if count == 0 {
        return Lifespan::Unknown;
    }
    Lifespan::Days(total.saturating_mul(2).saturating_add(count) / count.saturating_mul(2))
}

/// Case-insensitive substring filter over the fields a dashboard shows.
///
/// An empty filter matches every pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    /// Builds a filter from user input. Surrounding whitespace is ignored.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    /// Returns `true` when the filter has no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether any displayed field of `pull` contains the filter text.
    #[must_use]
    pub fn matches(&self, pull: &PullRequest) -> bool {
        if self.is_empty() {
            return true;
        }
        let number = pull.number.to_string();
        let comment = pull.last_comment.as_ref();
        [
            pull.title.as_deref(),
            pull.author.as_deref(),
            Some(pull.repository.as_str()),
            Some(pull.state.as_str()),
            Some(number.as_str()),
            Some(pull.body.as_str()),
            comment.map(|c| c.body.as_str()),
            comment.and_then(|c| c.author.as_deref()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }
}
