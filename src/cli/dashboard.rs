//! Harvests an organisation and prints its pull request dashboard.

use std::io::{self, Write};
use std::sync::Arc;

use futures::future::join;
use prdash::github::CollectionGateway;
use prdash::harvest::{HarvestSnapshot, Harvester, average_lifespan_days};
use prdash::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use prdash::{
    IntakeError, OctocrabCollectionGateway, OrganisationLocator, PersonalAccessToken, PrDashConfig,
};
use tokio::sync::watch;

use super::output::{write_dashboard_jsonl, write_dashboard_table, write_lifespan, write_progress};

/// Runs a harvest against GitHub, printing progress to stderr and the
/// dashboard to stdout.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] or [`IntakeError::MissingToken`]
/// if required configuration is missing, or the first harvest failure.
pub async fn run(config: &PrDashConfig) -> Result<(), IntakeError> {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();
    run_with_gateway_builder(
        config,
        OctocrabCollectionGateway::for_token,
        &mut stderr,
        &mut stdout,
    )
    .await
}

/// Runs a harvest using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, P, W>(
    config: &PrDashConfig,
    build_gateway: F,
    progress: &mut P,
    writer: &mut W,
) -> Result<(), IntakeError>
where
    G: CollectionGateway,
    F: FnOnce(&PersonalAccessToken, &OrganisationLocator) -> Result<G, IntakeError>,
    P: Write,
    W: Write,
{
    let options = config.harvest_options()?;
    let locator = config.locator()?;
    let token = config.resolve_token()?;
    let gateway = build_gateway(&token, &locator)?;
    let organisation = locator.organisation().as_str().to_owned();

    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    };
    let harvester = Harvester::new(gateway, locator, options).with_telemetry(telemetry);

    let (progress_result, outcome) =
        join(echo_progress(harvester.subscribe(), progress), harvester.run()).await;
    outcome?;
    progress_result?;

    write_dashboard(config, &organisation, &harvester.snapshot(), writer)
}

/// Echoes each distinct phase until the harvest reaches a terminal phase.
async fn echo_progress<P: Write>(
    mut receiver: watch::Receiver<HarvestSnapshot>,
    progress: &mut P,
) -> Result<(), IntakeError> {
    let mut last = None;
    loop {
        let phase = receiver.borrow_and_update().phase.clone();
        if last.as_ref() != Some(&phase) {
            write_progress(progress, &phase)?;
        }
        if phase.is_terminal() {
            return Ok(());
        }
        last = Some(phase);
        if receiver.changed().await.is_err() {
            return Ok(());
        }
    }
}

fn write_dashboard<W: Write>(
    config: &PrDashConfig,
    organisation: &str,
    snapshot: &HarvestSnapshot,
    writer: &mut W,
) -> Result<(), IntakeError> {
    let filter = config.text_filter();
    let visible: Vec<_> = snapshot
        .children
        .iter()
        .filter(|pull| filter.matches(pull))
        .collect();

    if config.jsonl {
        write_dashboard_jsonl(writer, &visible)?;
    } else {
        write_dashboard_table(writer, organisation, &visible)?;
    }
    write_lifespan(
        writer,
        average_lifespan_days(&snapshot.children, |pull| filter.matches(pull)),
    )
}
