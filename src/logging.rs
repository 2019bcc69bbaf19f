// src/logging.rs
// =============================================================================
// Logging setup.
//
// All log output goes to stderr, so `--json` output on stdout stays clean.
// The level defaults to `info` (`debug` with --verbose) and can always be
// overridden with RUST_LOG, e.g.:
//   RUST_LOG=domain_crawler=debug,reqwest=warn
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
