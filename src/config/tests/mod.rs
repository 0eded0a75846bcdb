//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, organisation, and locator resolution tests
//! - `validation`: Range checks and harvest option conversion

mod helpers;
