//! Octocrab implementation of the collection gateway.

use async_trait::async_trait;
use http::Uri;
use http::header::LINK;
use octocrab::Octocrab;

use crate::github::error::IntakeError;
use crate::github::locator::{OrganisationLocator, PersonalAccessToken};
use crate::github::pagination::{PageCursor, parse_next_link};
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::{header_to_string, parse_error_body};
use super::{ApiPage, CollectionGateway};

const OPERATION: &str = "fetch page";

/// Octocrab-backed gateway.
pub struct OctocrabCollectionGateway {
    client: Octocrab,
}

impl OctocrabCollectionGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and organisation.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the base URI cannot be parsed or
    /// `IntakeError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &OrganisationLocator,
    ) -> Result<Self, IntakeError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl CollectionGateway for OctocrabCollectionGateway {
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<ApiPage, IntakeError> {
        let uri: Uri = cursor
            .as_str()
            .parse::<Uri>()
            .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

        let response = self
            .client
            ._get_with_headers(uri, None)
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let body = self
                .client
                .body_to_string(response)
                .await
                .unwrap_or_else(|_| String::new());
            return Err(map_http_error(
                OPERATION,
                status,
                &headers,
                &parse_error_body(&body),
            ));
        }

        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        let items: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|error| IntakeError::Api {
                message: format!("page body is not a JSON array: {error}"),
            })?;

        let next = parse_next_link(header_to_string(headers.get(LINK)).as_deref());
        Ok(ApiPage {
            items,
            next,
            rate_limit: RateLimitInfo::from_headers(&headers),
        })
    }
}
