//! Shared test utilities.

pub mod github_fixtures;
