use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use chalobus::cli::Cli;
use chalobus::config::Config;
use chalobus::logging::{init_logging, Verbosity};
use chalobus::utils::error::report_error;
use chalobus::utils::OutputStyle;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose, cli.debug));

    // Ensure configuration exists and load it
    if cli.config.is_none() {
        Config::ensure_config_exists().context("Failed to create default configuration")?;
    }

    let config = if let Some(config_path) = &cli.config {
        Config::load_custom(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        Config::load().context("Failed to load configuration")?
    };
    OutputStyle::set_color_enabled(config.general.color);

    // Domain failures are reported to the user, never propagated as panics
    match cli.command.execute(config) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            if !e.is_user_facing() {
                error!(error = %e, "Command failed");
            }
            report_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
