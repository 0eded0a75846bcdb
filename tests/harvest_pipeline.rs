//! End-to-end harvest tests against a wiremock GitHub organisation.

mod support;

use futures::future;
use prdash::harvest::{
    HarvestOptions, HarvestPhase, Harvester, Lifespan, RetryPolicy, average_lifespan_days,
};
use prdash::{IntakeError, OctocrabCollectionGateway, OrganisationLocator, PersonalAccessToken};
use serde_json::json;
use support::github_fixtures::{
    comment_json, harvest_instant, mount_comments, mount_empty_pulls, mount_no_comments,
    mount_pulls, mount_repositories, mount_repository_failure, organisation_url, pull_json,
};
use wiremock::{MockServer, ResponseTemplate};

async fn harvester(server: &MockServer) -> Harvester<OctocrabCollectionGateway> {
    mount_no_comments(server).await;
    let locator = OrganisationLocator::parse(&organisation_url(server))
        .expect("mock organisation URL should parse");
    let token = PersonalAccessToken::new("pipeline-token").expect("token should be valid");
    let gateway =
        OctocrabCollectionGateway::for_token(&token, &locator).expect("gateway should build");
    let options = HarvestOptions {
        retry: RetryPolicy::none(),
        ..HarvestOptions::default()
    };
    Harvester::new(gateway, locator, options)
}

#[tokio::test]
async fn follows_repository_pages_until_the_last() {
    let server = MockServer::start().await;
    let names = ["repo-1", "repo-2", "repo-3", "repo-4", "repo-5"];
    mount_repositories(&server, &names, 3).await;
    for name in names {
        mount_empty_pulls(&server, name).await;
    }
    let pulls = vec![
        pull_json(&server, "repo-3", 31, "open", 2),
        pull_json(&server, "repo-3", 32, "open", 4),
    ];
    mount_pulls(&server, "repo-3", pulls).await;

    let harvester = harvester(&server).await;
    let report = harvester
        .run_at(harvest_instant())
        .await
        .expect("harvest should succeed");

    assert_eq!(report.parents.pages, 3);
    assert_eq!(report.parents.items, 5);
    let snapshot = harvester.snapshot();
    let parent_names: Vec<_> = snapshot.parents.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(parent_names, names);
    assert_eq!(snapshot.children.len(), 2);
    assert!(
        snapshot
            .children
            .iter()
            .all(|pull| pull.repository == "repo-3")
    );
}

#[tokio::test]
async fn keeps_only_open_pull_requests() {
    let server = MockServer::start().await;
    mount_repositories(&server, &["core"], 1).await;
    let pulls = (1..=10)
        .map(|id| {
            let state = if id <= 5 { "open" } else { "closed" };
            pull_json(&server, "core", id, state, 1)
        })
        .collect();
    mount_pulls(&server, "core", pulls).await;

    let harvester = harvester(&server).await;
    let report = harvester
        .run_at(harvest_instant())
        .await
        .expect("harvest should succeed");

    assert_eq!(report.children.seen, 10);
    assert_eq!(report.children.kept, 5);
    let mut ids: Vec<_> = harvester
        .snapshot()
        .children
        .iter()
        .map(|pull| pull.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn attaches_the_newest_comment() {
    let server = MockServer::start().await;
    mount_repositories(&server, &["core"], 1).await;
    mount_pulls(
        &server,
        "core",
        vec![
            pull_json(&server, "core", 7, "open", 3),
            pull_json(&server, "core", 8, "open", 3),
        ],
    )
    .await;
    mount_comments(
        &server,
        "core",
        7,
        vec![
            comment_json("T3", "2025-03-09T00:00:00Z"),
            comment_json("T2", "2025-03-08T00:00:00Z"),
            comment_json("T1", "2025-03-07T00:00:00Z"),
        ],
    )
    .await;

    let harvester = harvester(&server).await;
    let report = harvester
        .run_at(harvest_instant())
        .await
        .expect("harvest should succeed");

    assert_eq!(report.enrichment.attempted, 2);
    assert_eq!(report.enrichment.attached, 1);
    assert_eq!(report.enrichment.empty, 1);
    let snapshot = harvester.snapshot();
    assert!(snapshot.enrichment_complete);
    let commented = snapshot
        .children
        .iter()
        .find(|pull| pull.id == 7)
        .expect("pull request 7 should be harvested");
    assert_eq!(
        commented.last_comment.as_ref().map(|comment| comment.body.as_str()),
        Some("T3")
    );
    assert!(
        commented
            .body
            .as_str()
            .contains("<a href=\"https://issues.openmrs.org/browse/TRUNK-1\" target=\"_blank\">"),
        "body should carry an activated link: {}",
        commented.body
    );
}

#[tokio::test]
async fn subscribers_see_the_harvest_settle() {
    let server = MockServer::start().await;
    mount_repositories(&server, &["core", "web"], 1).await;
    mount_pulls(&server, "core", vec![pull_json(&server, "core", 1, "open", 2)]).await;
    mount_pulls(
        &server,
        "web",
        vec![
            pull_json(&server, "web", 2, "open", 3),
            pull_json(&server, "web", 3, "open", 5),
        ],
    )
    .await;

    let harvester = harvester(&server).await;
    let mut receiver = harvester.subscribe();
    let watcher = async move {
        receiver
            .wait_for(|snapshot| snapshot.phase.is_terminal())
            .await
            .map(|snapshot| snapshot.clone())
    };

    let (settled, outcome) = future::join(watcher, harvester.run_at(harvest_instant())).await;
    outcome.expect("harvest should succeed");
    let snapshot = settled.expect("state sender should outlive the harvest");

    assert_eq!(snapshot.phase, HarvestPhase::Settled);
    assert_eq!(snapshot.phase.to_string(), "");
    assert_eq!(
        average_lifespan_days(&snapshot.children, |_| true),
        Lifespan::Days(3)
    );
}

#[tokio::test]
async fn rate_limited_organisation_fails_the_harvest() {
    let server = MockServer::start().await;
    let response = ResponseTemplate::new(403)
        .set_body_json(json!({ "message": "API rate limit exceeded for user" }))
        .insert_header("X-RateLimit-Limit", "5000")
        .insert_header("X-RateLimit-Remaining", "0")
        .insert_header("X-RateLimit-Reset", "1700000000");
    mount_repository_failure(&server, response).await;

    let harvester = harvester(&server).await;
    let error = harvester
        .run_at(harvest_instant())
        .await
        .expect_err("rate limited harvest should fail");

    assert!(
        matches!(error, IntakeError::RateLimitExceeded { .. }),
        "expected RateLimitExceeded, got {error:?}"
    );
    let snapshot = harvester.snapshot();
    assert!(snapshot.parents.is_empty());
    assert!(matches!(snapshot.phase, HarvestPhase::Failed { .. }));
    assert!(!snapshot.enrichment_complete);
}

#[tokio::test]
async fn empty_organisation_settles_with_unknown_lifespan() {
    let server = MockServer::start().await;
    mount_repositories(&server, &[], 1).await;

    let harvester = harvester(&server).await;
    harvester
        .run_at(harvest_instant())
        .await
        .expect("empty harvest should succeed");

    let snapshot = harvester.snapshot();
    assert_eq!(snapshot.phase, HarvestPhase::Settled);
    assert!(snapshot.enrichment_complete);
    assert_eq!(
        average_lifespan_days(&snapshot.children, |_| true).to_string(),
        "?"
    );
}
