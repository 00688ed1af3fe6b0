use clap::Parser;
use color_eyre::eyre::{Report, Result};
use flusweep::Cli;

fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let cli = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", cli.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    // failed jobs are reported in the summary, not through the exit code
    flusweep::run(&cli.args)?;

    Ok(())
}
