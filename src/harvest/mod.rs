//! The harvesting pipeline.
//!
//! Turns GitHub's paginated REST collections into an enriched, in-memory
//! dataset of an organisation's open pull requests:
//!
//! - [`parents`] walks the organisation's repositories,
//! - [`children`] walks every repository's pull requests concurrently,
//! - [`enrichment`] attaches each pull request's latest comment,
//! - [`metrics`] derives dashboard statistics from the result.
//!
//! [`pipeline::Harvester`] runs the stages in order and publishes progress
//! through [`state::HarvestState`].

pub mod children;
pub mod enrichment;
pub mod gate;
pub mod hyperlinks;
pub mod metrics;
pub mod paginator;
pub mod parents;
pub mod pipeline;
pub mod retry;
pub mod state;

pub use children::{ChildCollector, CollectionSummary, days_between};
pub use enrichment::{EnrichmentScanner, EnrichmentSummary};
pub use gate::ConcurrencyGate;
pub use hyperlinks::activate_hyperlinks;
pub use metrics::{Lifespan, TextFilter, average_lifespan_days};
pub use paginator::{CursorPaginator, FetchContext, PaginationSummary};
pub use parents::ParentEnumerator;
pub use pipeline::{HarvestOptions, HarvestReport, Harvester};
pub use retry::RetryPolicy;
pub use state::{EnrichmentTarget, HarvestPhase, HarvestSnapshot, HarvestState};
