//! [Command-line interface](Cli) (CLI) of the main binary.


use crate::run;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = flusweep::Cli::parse();
/// ```
/// Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// use flusweep::{job::Backend, sweep::attributes::Build};
///
/// let input = ["flusweep", "--build", "cdc", "--system", "sbatch", "--frequencies", "subsampled"];
/// let cli = flusweep::Cli::parse_from(input);
/// assert_eq!(cli.args.build, Build::Cdc);
/// assert_eq!(cli.args.system, Backend::Sbatch);
///
/// let input = ["flusweep", "--system", "slurm"];
/// assert!(flusweep::Cli::try_parse_from(input).is_err());
/// ```
#[derive(Debug, Parser)]
#[clap(name = "flusweep", author, version)]
#[clap(about = "flusweep runs the prepare and process steps of seasonal influenza builds.")]
#[clap(after_help = "Every job's command line is printed to stdout before it runs. A failed job does not stop the sweep.")]
pub struct Cli {
    #[clap(flatten)]
    pub args: run::Args,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ValueEnum)]
pub enum Verbosity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        // Convert to lowercase for RUST_LOG env var compatibility
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
