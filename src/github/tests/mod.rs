//! Unit tests for organisation locators and tokens.

use rstest::rstest;

use super::{IntakeError, OrganisationLocator, PageCursor, PersonalAccessToken};

#[rstest]
fn parses_github_organisation_url() {
    let locator = OrganisationLocator::parse("https://github.com/openmrs")
        .expect("should parse organisation URL");
    assert_eq!(locator.organisation().as_str(), "openmrs", "organisation mismatch");
    assert_eq!(
        locator.api_base().as_str(),
        "https://api.github.com/",
        "api base mismatch"
    );
}

#[rstest]
fn parses_enterprise_organisation_url() {
    let locator = OrganisationLocator::parse("https://ghe.example.com/platform/")
        .expect("should parse enterprise URL");
    assert_eq!(locator.organisation().as_str(), "platform");
    assert_eq!(
        locator.api_base().as_str(),
        "https://ghe.example.com/api/v3",
        "enterprise api base mismatch"
    );
}

#[rstest]
fn preserves_enterprise_port() {
    let locator = OrganisationLocator::parse("http://127.0.0.1:8080/openmrs")
        .expect("should parse local URL");
    assert_eq!(locator.api_base().as_str(), "http://127.0.0.1:8080/api/v3");
}

#[rstest]
#[case::no_path("https://github.com")]
#[case::slash_only("https://github.com/")]
fn rejects_url_without_organisation(#[case] input: &str) {
    let result = OrganisationLocator::parse(input);
    assert!(
        matches!(result, Err(IntakeError::MissingPathSegments)),
        "expected MissingPathSegments, got {result:?}"
    );
}

#[rstest]
fn rejects_unparseable_url() {
    let result = OrganisationLocator::parse("https://exa mple.com/openmrs");
    assert!(
        matches!(result, Err(IntakeError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}

#[rstest]
#[case::bare_name("openmrs", "https://api.github.com/")]
#[case::url("https://ghe.example.com/openmrs", "https://ghe.example.com/api/v3")]
fn resolve_accepts_names_and_urls(#[case] input: &str, #[case] expected_base: &str) {
    let locator = OrganisationLocator::resolve(input, "https://api.github.com")
        .expect("organisation should resolve");
    assert_eq!(locator.organisation().as_str(), "openmrs");
    assert_eq!(locator.api_base().as_str(), expected_base);
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn rejects_blank_organisation_name(#[case] name: &str) {
    let result = OrganisationLocator::from_name(name, "https://api.github.com");
    assert_eq!(result, Err(IntakeError::MissingOrganisation));
}

#[rstest]
fn builds_collection_cursors() {
    let locator = OrganisationLocator::from_name("openmrs", "https://api.github.com")
        .expect("locator should build");

    assert_eq!(
        locator.repositories_cursor(100),
        PageCursor::new("/orgs/openmrs/repos?per_page=100")
    );
    assert_eq!(
        locator.pull_requests_cursor("openmrs-core", 30),
        PageCursor::new("/repos/openmrs/openmrs-core/pulls?per_page=30")
    );
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \t ")]
fn rejects_blank_tokens(#[case] token: &str) {
    assert_eq!(PersonalAccessToken::new(token), Err(IntakeError::MissingToken));
}

#[rstest]
fn trims_token_whitespace() {
    let token = PersonalAccessToken::new("  ghp_example \n").expect("token should be valid");
    assert_eq!(token.value(), "ghp_example");
}
