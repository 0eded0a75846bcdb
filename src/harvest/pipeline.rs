//! Drives the harvest stages in order against one organisation.
//!
//! ```text
//! ParentEnumerator -> ChildCollector -> EnrichmentScanner
//! ```
//!
//! Each stage starts once the previous one has settled. Consumers observe
//! progress through [`Harvester::subscribe`] while [`Harvester::run`] is in
//! flight.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::github::error::IntakeError;
use crate::github::gateway::CollectionGateway;
use crate::github::locator::OrganisationLocator;
use crate::github::pagination::MAX_PER_PAGE;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

use super::children::{ChildCollector, CollectionSummary};
use super::enrichment::{EnrichmentScanner, EnrichmentSummary};
use super::gate::{ConcurrencyGate, DEFAULT_MAX_CONCURRENT_REQUESTS};
use super::paginator::{FetchContext, PaginationSummary};
use super::parents::ParentEnumerator;
use super::retry::RetryPolicy;
use super::state::{HarvestPhase, HarvestSnapshot, HarvestState};

/// Tunables for one harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Page size requested from list endpoints.
    pub per_page: u8,
    /// Upper bound on in-flight requests.
    pub max_concurrent_requests: usize,
    /// Retry policy for transport failures.
    pub retry: RetryPolicy,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            per_page: MAX_PER_PAGE,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            retry: RetryPolicy::default(),
        }
    }
}

/// What a completed harvest produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestReport {
    /// Repository walk totals.
    pub parents: PaginationSummary,
    /// Pull request walk totals.
    pub children: CollectionSummary,
    /// Latest-comment lookup totals.
    pub enrichment: EnrichmentSummary,
}

/// Runs the full pipeline for one organisation.
pub struct Harvester<G>
where
    G: CollectionGateway,
{
    gateway: G,
    locator: OrganisationLocator,
    options: HarvestOptions,
    gate: ConcurrencyGate,
    state: Arc<HarvestState>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl<G> Harvester<G>
where
    G: CollectionGateway,
{
    /// Creates a harvester with an idle state and no telemetry.
    #[must_use]
    pub fn new(gateway: G, locator: OrganisationLocator, options: HarvestOptions) -> Self {
        Self {
            gateway,
            locator,
            gate: ConcurrencyGate::new(options.max_concurrent_requests),
            options,
            state: Arc::new(HarvestState::new()),
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Routes telemetry events to `sink`.
    #[must_use]
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    /// Shared handle to the harvest state.
    #[must_use]
    pub fn state(&self) -> Arc<HarvestState> {
        Arc::clone(&self.state)
    }

    /// Receiver notified whenever the state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HarvestSnapshot> {
        self.state.subscribe()
    }

    /// Current copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> HarvestSnapshot {
        self.state.snapshot()
    }

    /// Runs every stage, measuring ages against the current time.
    ///
    /// # Errors
    ///
    /// Returns the first repository or pull request walk failure. The state
    /// keeps whatever was collected and its phase becomes `Failed`.
    pub async fn run(&self) -> Result<HarvestReport, IntakeError> {
        self.run_at(Utc::now()).await
    }

    /// Runs every stage, measuring ages against `now`.
    ///
    /// # Errors
    ///
    /// See [`Harvester::run`].
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<HarvestReport, IntakeError> {
        match self.stages(now).await {
            Ok(report) => {
                let snapshot = self.state.snapshot();
                self.telemetry.record(TelemetryEvent::HarvestCompleted {
                    repositories: snapshot.parents.len(),
                    pull_requests: snapshot.children.len(),
                    enriched: snapshot.enriched(),
                });
                Ok(report)
            }
            Err(error) => {
                self.state.fail(error.to_string());
                Err(error)
            }
        }
    }

    async fn stages(&self, now: DateTime<Utc>) -> Result<HarvestReport, IntakeError> {
        let context = FetchContext::new(&self.gateway, &self.gate, self.options.retry);
        let per_page = self.options.per_page;

        self.enter(&HarvestPhase::ScanningParents);
        let parents = ParentEnumerator::new(context, per_page)
            .enumerate(&self.locator, &self.state)
            .await?;

        self.enter(&HarvestPhase::ScanningChildren {
            current: 0,
            total: parents.items,
        });
        let children = ChildCollector::new(context, per_page, now)
            .collect(&self.locator, &self.state)
            .await?;

        self.enter(&HarvestPhase::ScanningComments);
        let enrichment = EnrichmentScanner::new(context).scan(&self.state).await;

        Ok(HarvestReport {
            parents,
            children,
            enrichment,
        })
    }

    fn enter(&self, phase: &HarvestPhase) {
        self.telemetry.record(TelemetryEvent::PhaseEntered {
            phase: phase.label().to_owned(),
        });
    }
}
