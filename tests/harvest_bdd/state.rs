//! Scenario state and harvest execution for the harvest BDD tests.

use prdash::harvest::{HarvestOptions, HarvestSnapshot, Harvester, RetryPolicy};
use prdash::{IntakeError, OctocrabCollectionGateway, OrganisationLocator, PersonalAccessToken};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

use super::github_fixtures::{harvest_instant, organisation_url};
use super::runtime::{self, SharedRuntime};

#[derive(ScenarioState, Default)]
pub(crate) struct HarvestScenario {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) snapshot: Slot<HarvestSnapshot>,
    pub(crate) error: Slot<IntakeError>,
    pub(crate) next_id: Slot<u64>,
}

impl HarvestScenario {
    /// Hands out pull request ids unique within the scenario.
    pub(crate) fn allocate_id(&self) -> u64 {
        let id = self.next_id.get().unwrap_or(1);
        self.next_id.set(id + 1);
        id
    }
}

/// Ensures the runtime and server are initialised.
fn ensure_runtime_and_server(scenario: &HarvestScenario) -> SharedRuntime {
    runtime::ensure_runtime_and_server(&scenario.runtime, &scenario.server)
        .unwrap_or_else(|error| panic!("failed to start runtime and server: {error}"))
}

/// Runs `action` with the mock server and the runtime that drives it.
pub(crate) fn with_server<T>(
    scenario: &HarvestScenario,
    action: impl FnOnce(&MockServer, &SharedRuntime) -> T,
) -> T {
    let shared_runtime = ensure_runtime_and_server(scenario);
    scenario
        .server
        .with_ref(|server| action(server, &shared_runtime))
        .unwrap_or_else(|| panic!("mock server not initialised"))
}

/// Harvests the mock organisation, recording the final snapshot and any
/// error.
pub(crate) fn run_harvest(scenario: &HarvestScenario) {
    let shared_runtime = ensure_runtime_and_server(scenario);
    let url = scenario
        .server
        .with_ref(organisation_url)
        .unwrap_or_else(|| panic!("mock server URL missing"));

    let (snapshot, outcome) = shared_runtime.block_on(async {
        let harvest = async {
            let locator = OrganisationLocator::parse(&url)?;
            let token = PersonalAccessToken::new("bdd-token")?;
            let gateway = OctocrabCollectionGateway::for_token(&token, &locator)?;
            let options = HarvestOptions {
                retry: RetryPolicy::none(),
                ..HarvestOptions::default()
            };
            let harvester = Harvester::new(gateway, locator, options);
            let outcome = harvester.run_at(harvest_instant()).await.map(|_| ());
            Ok::<_, IntakeError>((harvester.snapshot(), outcome))
        };
        match harvest.await {
            Ok(result) => result,
            Err(error) => (HarvestSnapshot::default(), Err(error)),
        }
    });

    scenario.snapshot.set(snapshot);
    if let Err(error) = outcome {
        scenario.error.set(error);
    }
}
