//! Binary entry point for the yamlhost daemon.

use std::process::ExitCode;

#[expect(
    clippy::print_stderr,
    reason = "telemetry is not installed until bootstrap completes"
)]
fn main() -> ExitCode {
    match yamlhostd::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("yamlhostd: {error}");
            ExitCode::FAILURE
        }
    }
}
