//! # Prebuilt Cache CLI
//!
//! This is the binary entry point for the `prebuilt-cache` command-line
//! tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Translating any raised error into a single `ERROR: <message>` line on
//!   stderr and exit code 1, which is the contract the build orchestrator
//!   scripts against. Success exits 0; usage errors exit 2 (clap).
//!
//! The core application logic lives in the `prebuilt_cache` library crate;
//! the binary is a thin wrapper around it.

mod cli;
mod commands;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(error) = cli.execute() {
        eprintln!("ERROR: {error:#}");
        std::process::exit(1);
    }
}
