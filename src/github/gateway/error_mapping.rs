//! Error mapping helpers for the Octocrab collection gateway.

use http::{HeaderMap, StatusCode};

use crate::github::error::IntakeError;
use crate::github::rate_limit::RateLimitInfo;

use super::http_utils::GitHubErrorBody;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a response represents a rate limit error based on the
/// HTTP status and the message / documentation URL content.
pub(super) fn is_rate_limit_error(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> IntakeError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_status_error(
            operation,
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
            None,
        );
    }

    if is_network_error(error) {
        return IntakeError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    IntakeError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success HTTP response into an [`IntakeError`].
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &GitHubErrorBody,
) -> IntakeError {
    let message = body.message.as_deref().unwrap_or("unknown error");
    map_status_error(
        operation,
        status,
        message,
        body.documentation_url.as_deref(),
        RateLimitInfo::from_headers(headers),
    )
}

fn map_status_error(
    operation: &str,
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
    rate_limit: Option<RateLimitInfo>,
) -> IntakeError {
    if is_rate_limit_error(status, message, documentation_url) {
        let base_message = format!("{operation} failed: {message}");
        let rendered = match &rate_limit {
            Some(info) => format!(
                "{base_message} (resets at {reset})",
                reset = info.reset_at()
            ),
            None => base_message,
        };
        return IntakeError::RateLimitExceeded {
            rate_limit,
            message: rendered,
        };
    }

    if is_auth_failure(status) {
        IntakeError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else if status.is_server_error() {
        IntakeError::Network {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    } else {
        IntakeError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}
