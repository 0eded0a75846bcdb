//! Turns plain-text URLs in pull request descriptions into anchors.
//!
//! Everything outside a matched URL is HTML-escaped, so the result can be
//! rendered as trusted markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::github::models::SafeHtml;

#[expect(
    clippy::expect_used,
    reason = "pattern is a compile-time constant covered by tests"
)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_\+.~#?&/=]*)",
    )
    .expect("URL pattern should compile")
});

/// Rewrites every `http(s)` URL in `text` as
/// `<a href="URL" target="_blank">URL</a>`.
///
/// # Example
///
/// ```
/// use prdash::harvest::hyperlinks::activate_hyperlinks;
///
/// let html = activate_hyperlinks("see http://example.com/x for info");
/// assert_eq!(
///     html.as_str(),
///     r#"see <a href="http://example.com/x" target="_blank">http://example.com/x</a> for info"#
/// );
/// ```
#[must_use]
pub fn activate_hyperlinks(text: &str) -> SafeHtml {
    let mut markup = String::with_capacity(text.len());
    let mut cursor = 0;

    for found in URL_PATTERN.find_iter(text) {
        let gap = text.get(cursor..found.start()).unwrap_or_default();
        markup.push_str(&html_escape::encode_text(gap));
        let url = found.as_str();
        markup.push_str("<a href=\"");
        markup.push_str(&html_escape::encode_double_quoted_attribute(url));
        markup.push_str("\" target=\"_blank\">");
        markup.push_str(&html_escape::encode_text(url));
        markup.push_str("</a>");
        cursor = found.end();
    }
    let tail = text.get(cursor..).unwrap_or_default();
    markup.push_str(&html_escape::encode_text(tail));

    SafeHtml::trusted(markup)
}
