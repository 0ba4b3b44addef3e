//! lookup-enrich CLI
//!
//! Reads JSON or JSON Lines from stdin, enriches each record from a reference table or DNS, and
//! writes the result to stdout.

use clap::Parser;

mod args;
mod logging;
mod run;

use args::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only records.
    logging::init_logging(cli.log_level)?;

    run::execute(cli)
}
