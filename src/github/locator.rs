//! URL parsing and identity wrappers for organisation harvesting.

use url::Url;

use super::error::IntakeError;
use super::pagination::PageCursor;

/// Organisation login wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganisationName(String);

impl OrganisationName {
    /// Validates that the organisation name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingOrganisation` when the value is blank.
    pub fn new(value: &str) -> Result<Self, IntakeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingOrganisation);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the organisation value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, IntakeError> {
    if host.eq_ignore_ascii_case("github.com") {
        Url::parse("https://api.github.com")
            .map_err(|error| IntakeError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| IntakeError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Organisation identity and the API base its collections live under.
///
/// # Example
///
/// ```
/// use prdash::github::locator::OrganisationLocator;
///
/// let locator = OrganisationLocator::parse("https://github.com/openmrs")
///     .expect("should parse organisation URL");
/// assert_eq!(locator.organisation().as_str(), "openmrs");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganisationLocator {
    api_base: Url,
    organisation: OrganisationName,
}

impl OrganisationLocator {
    /// Creates a locator from an organisation name and an explicit API URL.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingOrganisation` when the name is blank or
    /// `IntakeError::InvalidUrl` when the API URL cannot be parsed.
    pub fn from_name(organisation: &str, api_url: &str) -> Result<Self, IntakeError> {
        let validated = OrganisationName::new(organisation)?;
        let api_base =
            Url::parse(api_url).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base,
            organisation: validated,
        })
    }

    /// Parses an organisation page URL such as `https://github.com/<org>`.
    ///
    /// GitHub Enterprise hosts map to `<scheme>://<host>/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when parsing fails or
    /// `MissingPathSegments` when the path does not start with an
    /// organisation segment.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let parsed =
            Url::parse(input).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

        let organisation_segment = parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .ok_or(IntakeError::MissingPathSegments)?;

        let host = parsed
            .host_str()
            .ok_or_else(|| IntakeError::InvalidUrl("URL must include a host".to_owned()))?;
        let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;

        Ok(Self {
            api_base,
            organisation: OrganisationName::new(organisation_segment)?,
        })
    }

    /// Accepts either an organisation URL or a bare organisation name.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::parse`] and [`Self::from_name`].
    pub fn resolve(input: &str, api_url: &str) -> Result<Self, IntakeError> {
        if input.contains("://") {
            Self::parse(input)
        } else {
            Self::from_name(input, api_url)
        }
    }

    /// API base URL for this organisation's host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Organisation name.
    #[must_use]
    pub const fn organisation(&self) -> &OrganisationName {
        &self.organisation
    }

    /// First page of the organisation's repository collection.
    #[must_use]
    pub fn repositories_cursor(&self, per_page: u8) -> PageCursor {
        let page_size = per_page.to_string();
        PageCursor::new(format!("/orgs/{}/repos", self.organisation.as_str()))
            .with_query(&[("per_page", page_size.as_str())])
    }

    /// First page of one repository's pull request collection.
    #[must_use]
    pub fn pull_requests_cursor(&self, repository: &str, per_page: u8) -> PageCursor {
        let page_size = per_page.to_string();
        PageCursor::new(format!(
            "/repos/{}/{repository}/pulls",
            self.organisation.as_str()
        ))
        .with_query(&[("per_page", page_size.as_str())])
    }
}
