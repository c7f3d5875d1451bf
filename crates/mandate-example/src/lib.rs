//! Shared entry point of the demo binaries.
//!
//! Each binary builds a [`Program`] and hands it to [`run`], which installs
//! logging, executes the process arguments and prints what the command
//! returned. Set `RUST_LOG=mandate=debug` to watch registration and dispatch.

use std::process::ExitCode;

use mandate::Program;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

/// Runs a demo program on the process arguments.
///
/// Usage errors, `--help` and `--version` exit through clap before this
/// returns. A non-empty command result is printed to stdout.
pub fn run(program: anyhow::Result<Program>) -> ExitCode {
    init_logging();

    let program = match program {
        Ok(program) => program,
        Err(err) => {
            error!(error = %err, "invalid command setup");
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    match program.run() {
        Ok(done) => {
            debug!(command = %done.command, "finished");
            if !done.output.is_none() {
                println!("{}", done.output);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
