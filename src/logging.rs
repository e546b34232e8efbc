//! Logging setup for chalobus.
//!
//! Diagnostics go through `tracing`; user-facing output is printed directly
//! by the command handlers and is not affected by the verbosity level.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Info and above, including every board mutation.
    Verbose,
    /// Debug and above, including storage reads and writes.
    Debug,
}

impl Verbosity {
    /// Map CLI flags onto a verbosity level.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8, debug: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match (verbose, debug) {
            (_, true) | (2.., _) => Self::Debug,
            (1, _) => Self::Verbose,
            _ => Self::Normal,
        }
    }

    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Debug => Level::DEBUG,
        }
    }
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. Logs go to stderr
/// so they never interleave with JSON list output.
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("chalobus={}", verbosity.to_level_filter());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already installed
    let _ = subscriber.try_init();
}
