//! Check-config command: load, validate, and display the configuration.

use anyhow::{Context, Result};
use clap::Args;
use flowstate_core::{ConfigLoader, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;

/// Arguments for the check-config command.
#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Runs the check-config command, returning the process exit code.
///
/// Prints the effective configuration (defaults, file, and environment
/// overrides merged) after validation. A missing file is fine; the
/// defaults stand.
///
/// # Errors
/// Returns an error if the file fails to parse or the merged
/// configuration fails validation.
pub fn run_check_config(args: &CheckConfigArgs) -> Result<i32> {
    let config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;

    println!("Configuration OK: {}", args.config.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(0)
}
