//! Main entry point for histrank.
//!
//! Parses the verb, sets up file logging, runs the verb once and exits.
//! Failures are logged and never reported to the calling shell widget, which
//! simply sees empty output.

use std::io;

use anyhow::Result;
use clap::Parser;

use histrank::cli::{self, Cli};
use histrank::utils;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hold the guard so buffered log lines are flushed on exit
    let _log_guard = utils::logger::init_logging(&utils::paths::log_dir());

    let verb = format!("{:?}", cli.command);
    let stdout = io::stdout();
    if let Err(e) = cli::run(cli, &mut stdout.lock()) {
        tracing::error!(verb = %verb, "Command failed: {:#}", e);
    }
    Ok(())
}
