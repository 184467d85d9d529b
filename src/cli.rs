//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `dateguard`.
#[derive(Debug, Parser)]
#[command(
    name = "dateguard",
    version,
    about = "Block issue transitions until Start Date and Due Date are set"
)]
pub struct Cli {
    /// Log level for diagnostics on stderr (overrides `DATEGUARD_LOG`).
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate one transition and print the hook response as JSON.
    ///
    /// Reads `{"issue":{"key":"..."}}` from stdin unless `--issue` or
    /// `--payload` is given.
    Check(CheckArgs),
}

/// Arguments for `dateguard check`.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Issue key to validate instead of reading a payload.
    #[arg(long, value_name = "KEY", conflicts_with = "payload")]
    pub issue: Option<String>,
    /// File holding the invocation payload.
    #[arg(long, value_name = "FILE")]
    pub payload: Option<PathBuf>,
    /// Tracker base URL (overrides `DATEGUARD_SITE_URL`).
    #[arg(long, value_name = "URL")]
    pub site: Option<String>,
    /// Start-date field key (overrides `DATEGUARD_START_DATE_FIELD`).
    #[arg(long, value_name = "FIELD")]
    pub start_date_field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_check_with_issue() {
        let cli = Cli::parse_from(["dateguard", "check", "--issue", "PROJ-1"]);
        let Command::Check(args) = cli.command;
        assert_eq!(args.issue.as_deref(), Some("PROJ-1"));
        assert!(args.payload.is_none());
    }

    #[test]
    fn parses_overrides_and_global_log_level() {
        let cli = Cli::parse_from([
            "dateguard",
            "check",
            "--site",
            "https://acme.example",
            "--start-date-field",
            "customfield_10015",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Check(args) = cli.command;
        assert_eq!(args.site.as_deref(), Some("https://acme.example"));
        assert_eq!(args.start_date_field.as_deref(), Some("customfield_10015"));
    }

    #[test]
    fn issue_and_payload_conflict() {
        let result =
            Cli::try_parse_from(["dateguard", "check", "--issue", "PROJ-1", "--payload", "p.json"]);
        assert!(result.is_err());
    }
}
