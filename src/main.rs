use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use laser_chess::console::console_loop::run_stdio_loop;

fn main() -> ExitCode {
    // stdout carries the console protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run_stdio_loop() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "console loop stopped");
            ExitCode::FAILURE
        }
    }
}
