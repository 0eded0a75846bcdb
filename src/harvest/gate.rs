//! Bounded concurrency gate shared by every fetch the harvester issues.
//!
//! The pipeline fans out one walk per repository and one comment lookup per
//! pull request. Each individual fetch holds a permit from this gate while it
//! is in flight, so the number of concurrent requests against GitHub never
//! exceeds the configured capacity no matter how wide the fan-out is.

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::github::error::IntakeError;

/// Default number of requests allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

/// Fixed-size permit pool guarding outbound requests.
#[derive(Debug)]
pub struct ConcurrencyGate {
    semaphore: Semaphore,
    capacity: usize,
}

impl ConcurrencyGate {
    /// Creates a gate admitting `capacity` concurrent fetches.
    ///
    /// A capacity of zero is raised to one so the harvest can always make
    /// progress.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let bounded = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Semaphore::new(bounded),
            capacity: bounded,
        }
    }

    /// Waits for a free slot. The slot is released when the permit drops.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Api`] if the gate has been closed.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, IntakeError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|error| IntakeError::Api {
                message: format!("concurrency gate closed: {error}"),
            })
    }

    /// Total number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held by an in-flight fetch.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT_REQUESTS)
    }
}
