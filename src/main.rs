//! stereoscale CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run the rescale
//! and exit with a non-zero status on any error.
//! For programmatic use, prefer the library API (`stereoscale::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
