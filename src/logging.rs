//! Diagnostic logging.
//!
//! Events go to stderr; stdout is reserved for the hook response.

use tracing::Level;
use tracing_subscriber::fmt;

/// Environment variable selecting the log level.
pub const LOG_VAR: &str = "DATEGUARD_LOG";

/// Level used when none is configured.
pub const DEFAULT_LEVEL: Level = Level::WARN;

/// Installs the global subscriber at `level`, or [`DEFAULT_LEVEL`].
///
/// A second call is a no-op.
///
/// # Errors
///
/// Returns an error string if `level` is not a recognised level name. The
/// default subscriber is still installed in that case.
pub fn init(level: Option<&str>) -> Result<(), String> {
    let parsed = level.map(parse_log_level).transpose();
    let max_level = parsed.as_ref().ok().copied().flatten().unwrap_or(DEFAULT_LEVEL);

    let subscriber = fmt()
        .with_max_level(max_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    parsed.map(|_| ())
}

/// Parses a level name, case-insensitively.
///
/// # Errors
///
/// Returns an error string naming the accepted values.
pub fn parse_log_level(level: &str) -> Result<Level, String> {
    match level.trim().to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => Err(format!(
            "invalid log level {other:?}; expected error, warn, info, debug or trace"
        )),
    }
}
