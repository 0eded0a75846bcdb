//! Support modules for the harvest BDD tests.

#[path = "../support/github_fixtures.rs"]
pub(crate) mod github_fixtures;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use state::{HarvestScenario, run_harvest, with_server};
