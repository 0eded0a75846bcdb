//! Cursor handling for GitHub's `Link` header pagination.
//!
//! GitHub carries the location of the next page out-of-band in a `Link`
//! header such as `<https://api.github.com/orgs/x/repos?page=2>; rel="next"`.
//! This module extracts that location as an opaque [`PageCursor`] and
//! validates the page size used to start a walk.

use std::fmt;

use url::form_urlencoded;

use super::error::IntakeError;

/// Largest page size GitHub accepts for list endpoints.
pub const MAX_PER_PAGE: u8 = 100;

/// Opaque reference to one page of a paginated collection.
///
/// A cursor is either an API-relative path (for the first page of a walk) or
/// the absolute URL copied from a `rel="next"` link. Callers never inspect
/// it; gateways resolve it against their API base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wraps a path or URL as a cursor.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Borrow the underlying location.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns a cursor with the given query parameters appended.
    ///
    /// # Example
    ///
    /// ```
    /// use prdash::github::pagination::PageCursor;
    ///
    /// let cursor = PageCursor::new("/repos/o/r/issues/1/comments")
    ///     .with_query(&[("sort", "created"), ("direction", "desc")]);
    /// assert_eq!(
    ///     cursor.as_str(),
    ///     "/repos/o/r/issues/1/comments?sort=created&direction=desc"
    /// );
    /// ```
    #[must_use]
    pub fn with_query(&self, pairs: &[(&str, &str)]) -> Self {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        if encoded.is_empty() {
            return self.clone();
        }
        let separator = if self.0.contains('?') { '&' } else { '?' };
        Self(format!("{}{separator}{encoded}", self.0))
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Extracts the `rel="next"` target from a `Link` header value.
///
/// Missing, empty, or malformed headers all yield `None`, which ends the
/// walk exactly like the last page does.
///
/// # Example
///
/// ```
/// use prdash::github::pagination::parse_next_link;
///
/// let header = r#"<https://api.github.com/orgs/x/repos?page=3>; rel="next", <https://api.github.com/orgs/x/repos?page=9>; rel="last""#;
/// let next = parse_next_link(Some(header)).expect("next link present");
/// assert_eq!(next.as_str(), "https://api.github.com/orgs/x/repos?page=3");
/// ```
#[must_use]
pub fn parse_next_link(header: Option<&str>) -> Option<PageCursor> {
    header?.split(',').find_map(next_target)
}

fn next_target(relation: &str) -> Option<PageCursor> {
    let mut parts = relation.split(';');
    let target = parts.next()?.trim();
    let is_next = parts.any(|param| {
        let trimmed = param.trim();
        trimmed.eq_ignore_ascii_case("rel=\"next\"") || trimmed.eq_ignore_ascii_case("rel=next")
    });
    if !is_next {
        return None;
    }

    let location = target.strip_prefix('<')?.strip_suffix('>')?.trim();
    if location.is_empty() {
        return None;
    }
    Some(PageCursor::new(location))
}

/// Validates a requested page size.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidPagination`] when `per_page` is zero or
/// exceeds [`MAX_PER_PAGE`].
pub fn validate_per_page(per_page: u64) -> Result<u8, IntakeError> {
    if per_page == 0 {
        return Err(IntakeError::InvalidPagination {
            message: "per_page must be at least 1".to_owned(),
        });
    }

    match u8::try_from(per_page) {
        Ok(value) if value <= MAX_PER_PAGE => Ok(value),
        _ => Err(IntakeError::InvalidPagination {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        }),
    }
}
