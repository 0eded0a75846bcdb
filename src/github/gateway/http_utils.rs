//! Response helpers shared by the gateway implementation.

use http::header::HeaderValue;
use serde::Deserialize;

/// Error document GitHub returns alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct GitHubErrorBody {
    pub(super) message: Option<String>,
    pub(super) documentation_url: Option<String>,
}

pub(super) fn header_to_string(header_value: Option<&HeaderValue>) -> Option<String> {
    header_value
        .and_then(|raw| raw.to_str().ok())
        .map(ToOwned::to_owned)
}

pub(super) fn parse_error_body(body: &str) -> GitHubErrorBody {
    serde_json::from_str::<GitHubErrorBody>(body).unwrap_or_default()
}
