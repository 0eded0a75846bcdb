//! Wiremock fixtures imitating the GitHub organisation endpoints.
//!
//! Paths carry the `/api/v3` prefix because organisations are addressed as
//! `<server>/<org>`, which the locator treats as a GitHub Enterprise host.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Organisation every fixture serves.
pub const ORGANISATION: &str = "openmrs";

/// Fixed harvest instant used by the fixtures.
pub fn harvest_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-10T00:00:00Z")
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or_else(|error| panic!("invalid fixture timestamp: {error}"))
}

/// Organisation URL pointing at the mock server.
pub fn organisation_url(server: &MockServer) -> String {
    format!("{}/{ORGANISATION}", server.uri())
}

fn repositories_path() -> String {
    format!("/api/v3/orgs/{ORGANISATION}/repos")
}

fn pulls_path(repository: &str) -> String {
    format!("/api/v3/repos/{ORGANISATION}/{repository}/pulls")
}

fn comments_path(repository: &str, number: u64) -> String {
    format!("/api/v3/repos/{ORGANISATION}/{repository}/issues/{number}/comments")
}

/// JSON for one pull request created `age_days` before [`harvest_instant`].
pub fn pull_json(
    server: &MockServer,
    repository: &str,
    id: u64,
    state: &str,
    age_days: i64,
) -> Value {
    let created_at = harvest_instant() - Duration::days(age_days);
    json!({
        "id": id,
        "number": id,
        "title": format!("Change {id} in {repository}"),
        "state": state,
        "html_url": format!("https://github.com/{ORGANISATION}/{repository}/pull/{id}"),
        "user": { "login": "octocat" },
        "created_at": created_at,
        "updated_at": created_at,
        "body": "See https://issues.openmrs.org/browse/TRUNK-1 for context",
        "comments_url": format!("{}{}", server.uri(), comments_path(repository, id))
    })
}

/// JSON for one comment.
pub fn comment_json(body: &str, created_at: &str) -> Value {
    json!({
        "id": 1,
        "user": { "login": "reviewer" },
        "created_at": created_at,
        "body": body
    })
}

/// Serves the repository list split into `pages` linked pages.
pub async fn mount_repositories(server: &MockServer, names: &[&str], pages: usize) {
    let chunk = names.len().div_ceil(pages.max(1)).max(1);
    let chunks: Vec<_> = names.chunks(chunk).collect();
    let last = chunks.len().max(1);

    if chunks.is_empty() {
        Mock::given(method("GET"))
            .and(path(repositories_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
        return;
    }

    for (offset, chunk_names) in chunks.iter().enumerate() {
        let page = offset + 1;
        let body: Vec<_> = chunk_names
            .iter()
            .map(|name| json!({ "name": name, "full_name": format!("{ORGANISATION}/{name}") }))
            .collect();
        let mut response = ResponseTemplate::new(200).set_body_json(body);
        if page < last {
            response = response.insert_header(
                "Link",
                format!(
                    "<{}{}?page={}>; rel=\"next\", <{}{}?page={last}>; rel=\"last\"",
                    server.uri(),
                    repositories_path(),
                    page + 1,
                    server.uri(),
                    repositories_path()
                ),
            );
        }

        let mock = Mock::given(method("GET")).and(path(repositories_path()));
        let mock = if page == 1 {
            mock.and(query_param("per_page", "100"))
        } else {
            mock.and(query_param("page", page.to_string()))
        };
        mock.respond_with(response).expect(1).mount(server).await;
    }
}

/// Serves one page of pull requests for `repository`.
pub async fn mount_pulls(server: &MockServer, repository: &str, pulls: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(pulls_path(repository)))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
        .mount(server)
        .await;
}

/// Serves an empty pull request list for `repository` unless a
/// [`mount_pulls`] mock for it also exists.
pub async fn mount_empty_pulls(server: &MockServer, repository: &str) {
    Mock::given(method("GET"))
        .and(path(pulls_path(repository)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(8)
        .mount(server)
        .await;
}

/// Serves a failing response for the repository list.
pub async fn mount_repository_failure(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(repositories_path()))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Serves `comments`, newest first, for one pull request.
pub async fn mount_comments(server: &MockServer, repository: &str, number: u64, comments: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(comments_path(repository, number)))
        .and(query_param("sort", "created"))
        .and(query_param("direction", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comments))
        .mount(server)
        .await;
}

/// Answers every comment lookup without a specific mock with an empty list.
pub async fn mount_no_comments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"/issues/\d+/comments$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(10)
        .mount(server)
        .await;
}
