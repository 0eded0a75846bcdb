//! prdash CLI entrypoint: harvest an organisation and print its dashboard.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prdash::{IntakeError, PrDashConfig};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    config.validate()?;
    cli::dashboard::run(&config).await
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to `warn`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrDashConfig, IntakeError> {
    PrDashConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}
