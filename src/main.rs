//! Binary entrypoint for the `dateguard` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Set DATEGUARD_RECORD=<file> to capture the outbound call to a cassette.
    match dateguard::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
