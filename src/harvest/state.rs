//! Shared harvest state published to consumers through a watch channel.
//!
//! The harvester is the only writer. Consumers call
//! [`HarvestState::subscribe`] to be woken on every change, or
//! [`HarvestState::snapshot`] for a point-in-time copy.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::github::models::{PullRequest, PullRequestComment, Repository};

/// Progress through the harvest.
///
/// Phases only move forward. `Failed` and `Settled` are terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HarvestPhase {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// Walking the organisation's repositories.
    ScanningParents,
    /// Walking each repository's pull requests.
    ScanningChildren {
        /// Walks initiated so far.
        current: usize,
        /// Total number of walks.
        total: usize,
    },
    /// Fetching the latest comment for each pull request.
    ScanningComments,
    /// Every stage finished.
    Settled,
    /// A stage failed; the collected data is partial.
    Failed {
        /// Rendered error.
        message: String,
    },
}

impl HarvestPhase {
    const fn rank(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::ScanningParents => 1,
            Self::ScanningChildren { .. } => 2,
            Self::ScanningComments => 3,
            Self::Settled | Self::Failed { .. } => 4,
        }
    }

    /// Stable name of the phase without its progress detail.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ScanningParents => "scanning parents",
            Self::ScanningChildren { .. } => "scanning children",
            Self::ScanningComments => "scanning comments",
            Self::Settled => "settled",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns `true` for `Settled` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Failed { .. })
    }

    /// Whether moving from `self` to `next` keeps the phase monotonic.
    #[must_use]
    pub fn permits(&self, next: &Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (
                Self::ScanningChildren { current, .. },
                Self::ScanningChildren {
                    current: next_current,
                    ..
                },
            ) => next_current > current,
            _ => next.rank() > self.rank(),
        }
    }
}

impl fmt::Display for HarvestPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => formatter.write_str("idle"),
            Self::ScanningParents => formatter.write_str("scanning parents"),
            Self::ScanningChildren { current, total } => {
                write!(formatter, "scanning children ({current} of {total})")
            }
            Self::ScanningComments => formatter.write_str("scanning comments"),
            Self::Settled => Ok(()),
            Self::Failed { message } => write!(formatter, "failed: {message}"),
        }
    }
}

/// Point-in-time copy of the harvest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSnapshot {
    /// Repositories in the order they arrived.
    pub parents: Vec<Repository>,
    /// Open pull requests in the order they arrived.
    pub children: Vec<PullRequest>,
    /// Current phase.
    pub phase: HarvestPhase,
    /// Set once every enrichment task has finished.
    pub enrichment_complete: bool,
}

impl HarvestSnapshot {
    /// Number of pull requests with a latest comment attached.
    #[must_use]
    pub fn enriched(&self) -> usize {
        self.children
            .iter()
            .filter(|child| child.last_comment.is_some())
            .count()
    }
}

/// Pull request still waiting for its latest comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentTarget {
    /// Pull request id.
    pub id: u64,
    /// Location of its comment sub-collection.
    pub comments_url: String,
}

/// Append-only harvest state.
#[derive(Debug)]
pub struct HarvestState {
    sender: watch::Sender<HarvestSnapshot>,
    positions: Mutex<HashMap<u64, usize>>,
}

impl Default for HarvestState {
    fn default() -> Self {
        Self::new()
    }
}

impl HarvestState {
    /// Creates an empty, idle state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(HarvestSnapshot::default());
        Self {
            sender,
            positions: Mutex::new(HashMap::new()),
        }
    }

    /// Receiver notified on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HarvestSnapshot> {
        self.sender.subscribe()
    }

    /// Copies the current state.
    #[must_use]
    pub fn snapshot(&self) -> HarvestSnapshot {
        self.sender.borrow().clone()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> HarvestPhase {
        self.sender.borrow().phase.clone()
    }

    /// Moves to `next` if that keeps the phase monotonic.
    ///
    /// Returns whether the phase changed.
    pub fn advance(&self, next: HarvestPhase) -> bool {
        let changed = self.sender.send_if_modified(|snapshot| {
            if snapshot.phase.permits(&next) {
                snapshot.phase = next.clone();
                true
            } else {
                false
            }
        });
        if changed {
            tracing::info!(phase = %next, "harvest phase changed");
        }
        changed
    }

    /// Records a stage failure. Ignored once the harvest is terminal.
    pub fn fail(&self, message: impl Into<String>) -> bool {
        self.advance(HarvestPhase::Failed {
            message: message.into(),
        })
    }

    /// Appends a repository.
    pub fn push_parent(&self, parent: Repository) {
        self.sender.send_modify(|snapshot| snapshot.parents.push(parent));
    }

    /// Appends a pull request unless one with the same id is present.
    ///
    /// Returns whether it was appended.
    pub fn push_child(&self, child: PullRequest) -> bool {
        let mut positions = self
            .positions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if positions.contains_key(&child.id) {
            tracing::debug!(id = child.id, "dropping duplicate pull request");
            return false;
        }
        let id = child.id;
        self.sender.send_modify(|snapshot| {
            positions.insert(id, snapshot.children.len());
            snapshot.children.push(child);
        });
        true
    }

    /// Pull requests currently held that can be enriched.
    #[must_use]
    pub fn enrichment_targets(&self) -> Vec<EnrichmentTarget> {
        self.sender
            .borrow()
            .children
            .iter()
            .filter(|child| child.last_comment.is_none())
            .filter_map(|child| {
                child.comments_url.as_ref().map(|url| EnrichmentTarget {
                    id: child.id,
                    comments_url: url.clone(),
                })
            })
            .collect()
    }

    /// Attaches the latest comment to pull request `id`.
    ///
    /// A comment is attached at most once; later calls leave it untouched.
    /// Returns whether the comment was attached.
    pub fn attach_comment(&self, id: u64, comment: PullRequestComment) -> bool {
        let positions = self
            .positions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(&position) = positions.get(&id) else {
            return false;
        };
        self.sender.send_if_modified(|snapshot| {
            match snapshot.children.get_mut(position) {
                Some(child) if child.last_comment.is_none() => {
                    child.last_comment = Some(comment);
                    true
                }
                _ => false,
            }
        })
    }

    /// Flags enrichment as finished and settles the harvest.
    pub fn mark_enrichment_complete(&self) {
        self.sender
            .send_modify(|snapshot| snapshot.enrichment_complete = true);
        self.advance(HarvestPhase::Settled);
    }
}
