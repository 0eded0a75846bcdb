//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prdash.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRDASH_ORGANISATION`, `PRDASH_TOKEN`, or
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--organisation`/`-o` and `--token`/`-t`
//!
//! # Configuration File
//!
//! ```toml
//! organisation = "openmrs"
//! token = "ghp_example"
//! api_url = "https://api.github.com"
//! per_page = 100
//! max_concurrent_requests = 8
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::IntakeError;
use crate::github::locator::{OrganisationLocator, PersonalAccessToken};
use crate::github::pagination::{MAX_PER_PAGE, validate_per_page};
use crate::harvest::gate::DEFAULT_MAX_CONCURRENT_REQUESTS;
use crate::harvest::metrics::TextFilter;
use crate::harvest::pipeline::HarvestOptions;
use crate::harvest::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, RetryPolicy};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PRDASH_ORGANISATION` or `--organisation`: Organisation name or URL
/// - `PRDASH_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PRDASH_API_URL` or `--api-url`: REST API base URL
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prdash::PrDashConfig;
///
/// let config = PrDashConfig::load().expect("failed to load configuration");
/// let locator = config.locator().expect("organisation required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRDASH",
    discovery(
        dotfile_name = ".prdash.toml",
        config_file_name = "prdash.toml",
        app_name = "prdash"
    )
)]
pub struct PrDashConfig {
    /// Organisation to harvest, as a name (`openmrs`) or URL
    /// (`https://github.com/openmrs`).
    ///
    /// Can be provided via:
    /// - CLI: `--organisation <ORG>` or `-o <ORG>`
    /// - Environment: `PRDASH_ORGANISATION`
    /// - Config file: `organisation = "..."`
    #[ortho_config(cli_short = 'o')]
    pub organisation: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRDASH_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// REST API base used when `organisation` is a bare name.
    ///
    /// Defaults to `https://api.github.com`. GitHub Enterprise hosts use
    /// `https://<host>/api/v3`.
    #[ortho_config()]
    pub api_url: String,

    /// Page size requested from list endpoints (1 to 100).
    #[ortho_config()]
    pub per_page: u64,

    /// Upper bound on requests in flight at once.
    #[ortho_config()]
    pub max_concurrent_requests: usize,

    /// Retries after a transport failure.
    #[ortho_config()]
    pub max_retries: u32,

    /// Delay before the first retry, doubled for each further attempt.
    #[ortho_config()]
    pub retry_base_delay_ms: u64,

    /// Case-insensitive text filter applied to the dashboard and the
    /// average lifespan.
    ///
    /// Can be provided via:
    /// - CLI: `--filter <TEXT>` or `-f <TEXT>`
    /// - Config file: `filter = "..."`
    #[ortho_config(cli_short = 'f')]
    pub filter: Option<String>,

    /// Prints one JSON object per pull request instead of a table.
    ///
    /// Can be provided via:
    /// - CLI: `--jsonl` / `-j`
    /// - Config file: `jsonl = true`
    #[ortho_config(cli_short = 'j')]
    pub jsonl: bool,

    /// Writes telemetry events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for PrDashConfig {
    fn default() -> Self {
        Self {
            organisation: None,
            token: None,
            api_url: DEFAULT_API_URL.to_owned(),
            per_page: u64::from(MAX_PER_PAGE),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: u64::try_from(DEFAULT_BASE_DELAY.as_millis())
                .unwrap_or(u64::MAX),
            filter: None,
            jsonl: false,
            telemetry: false,
        }
    }
}

impl PrDashConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, IntakeError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(IntakeError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Returns the organisation or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingOrganisation`] when none is configured.
    pub fn require_organisation(&self) -> Result<&str, IntakeError> {
        self.organisation
            .as_deref()
            .filter(|organisation| !organisation.trim().is_empty())
            .ok_or(IntakeError::MissingOrganisation)
    }

    /// Resolves the organisation against the configured API URL.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingOrganisation`] or a URL error from
    /// [`OrganisationLocator::resolve`].
    pub fn locator(&self) -> Result<OrganisationLocator, IntakeError> {
        OrganisationLocator::resolve(self.require_organisation()?, &self.api_url)
    }

    /// Checks numeric settings for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] for a bad `per_page` and
    /// [`IntakeError::Configuration`] when `max_concurrent_requests` is zero.
    pub fn validate(&self) -> Result<(), IntakeError> {
        validate_per_page(self.per_page)?;
        if self.max_concurrent_requests == 0 {
            return Err(IntakeError::Configuration {
                message: "max_concurrent_requests must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Converts the harvest settings into [`HarvestOptions`].
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`PrDashConfig::validate`].
    pub fn harvest_options(&self) -> Result<HarvestOptions, IntakeError> {
        self.validate()?;
        Ok(HarvestOptions {
            per_page: validate_per_page(self.per_page)?,
            max_concurrent_requests: self.max_concurrent_requests,
            retry: RetryPolicy::new(
                self.max_retries,
                Duration::from_millis(self.retry_base_delay_ms),
            ),
        })
    }

    /// Text filter built from `filter`; empty when unset.
    #[must_use]
    pub fn text_filter(&self) -> TextFilter {
        TextFilter::new(self.filter.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests;
