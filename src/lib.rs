//! `flusweep` runs seasonal influenza builds over a sweep of parameters.
//!
//! ## Builds
//!
//! 1. **live** sweeps every lineage (h3n2, h1n1pdm, vic, yam) over the
//!    2y, 3y, 6y and 12y resolutions.
//!
//! 1. **cdc** sweeps every lineage over the 2y, 3y and 6y resolutions, for cell
//!    and egg passaged viruses, with HI titers. Focus reduction (FRA) titers are
//!    added for h3n2 only.
//!
//! ## Steps
//!
//! Each point of the sweep runs two programs, one after another:
//!
//! - `flu.prepare.py` assembles the sequences and titers into `prepared/<prefix>.json`.
//! - `flu.process.py` runs the analysis on that JSON.
//!
//! The process step either runs locally, is submitted to a queue with `qsub`,
//! or is wrapped in an `sbatch` submission. With a scheduler, only the
//! submission is awaited.
//!
//! ## Failures
//!
//! A failed step never stops the sweep. Every job's outcome is collected into
//! a [`Summary`], which is logged at the end and can be written as JSON or as
//! a table.

pub mod cli;
pub mod job;
pub mod run;
pub mod sweep;
pub mod utils;

#[doc(inline)]
pub use crate::cli::{Cli, Verbosity};
#[doc(inline)]
pub use crate::run::{run, Args, Summary};
#[doc(inline)]
pub use crate::utils::table::Table;
