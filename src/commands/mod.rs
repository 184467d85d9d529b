//! Command dispatch and handlers.

pub mod check;

use std::env;

use crate::cli::{Cli, Command};
use crate::logging;

/// Dispatch a parsed command line to its handler.
///
/// Loads `.env` and installs logging before the handler runs.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let _ = dotenvy::dotenv();

    let level = cli.log_level.clone().or_else(|| env::var(logging::LOG_VAR).ok());
    if let Err(e) = logging::init(level.as_deref()) {
        tracing::warn!("{e}; using {}", logging::DEFAULT_LEVEL);
    }

    match &cli.command {
        Command::Check(args) => check::run(args),
    }
}
