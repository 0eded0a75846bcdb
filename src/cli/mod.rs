//! CLI handlers for the pull request dashboard.
//!
//! - [`dashboard`]: Runs a harvest and prints the resulting dashboard
//!
//! Output formatting utilities are in [`output`].

pub mod dashboard;
pub mod output;
