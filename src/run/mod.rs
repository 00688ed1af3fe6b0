//! Run the prepare and process jobs of a build, one after another.

pub mod summary;

use crate::job::{self, Backend, Job, Resources};
use crate::sweep::{self, attributes::*, Layout};
use crate::utils::table::Table;
use clap::Args as ClapArgs;
use color_eyre::eyre::{Report, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

pub use summary::{Outcome, Record, Summary};

// ----------------------------------------------------------------------------
// Args

/// Run every prepare and process job of a build.
#[derive(Clone, Debug, Deserialize, ClapArgs, Serialize)]
pub struct Args {
    /// Build to run [possible values: live, cdc]
    #[clap(short = 'b', long, default_value_t = Args::default().build)]
    pub build: Build,

    /// Where to run the process step [possible values: local, qsub, sbatch]
    #[clap(short = 's', long, default_value_t = Args::default().system)]
    pub system: Backend,

    /// Frequencies to estimate: complete, or anything else for subsampled.
    #[clap(long, default_value_t = Args::default().frequencies)]
    pub frequencies: Frequencies,

    /// Restrict the sweep to these lineages.
    ///
    /// Comma separated, for example: --lineage h3n2,vic
    #[clap(short = 'l', long, value_delimiter = ',')]
    pub lineage: Option<Vec<Lineage>>,

    /// Python interpreter used for the prepare step and local/sbatch process jobs.
    #[clap(long, default_value_t = Args::default().python)]
    pub python: String,

    /// Submission script handed to qsub.
    #[clap(long, default_value_os_t = Args::default().submit_script)]
    pub submit_script: PathBuf,

    #[clap(flatten)]
    pub layout: Layout,

    #[clap(flatten)]
    pub resources: Resources,

    /// Print and record the jobs without running them.
    #[clap(short = 'd', long)]
    pub dry_run: bool,

    /// Write a JSON summary of the run to this file.
    #[clap(long)]
    #[serde(skip)]
    pub summary: Option<PathBuf>,

    /// Write the outcome table to this file (.tsv, .csv, or .txt).
    #[clap(long)]
    #[serde(skip)]
    pub table: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            build: Build::default(),
            system: Backend::default(),
            frequencies: Frequencies::default(),
            lineage: None,
            python: String::from("python"),
            submit_script: PathBuf::from("submit_script.sh"),
            layout: Layout::default(),
            resources: Resources::default(),
            dry_run: false,
            summary: None,
            table: None,
        }
    }
}

impl Args {
    /// Return true if the lineage was requested on the command-line, or none were.
    pub fn includes(&self, lineage: &Lineage) -> bool {
        match &self.lineage {
            Some(lineages) => lineages.contains(lineage),
            None => true,
        }
    }
}

// ----------------------------------------------------------------------------
// Executor

/// Runs a job to completion and reports how it went.
pub trait Executor {
    fn execute(&mut self, job: &Job) -> Outcome;
}

/// Spawn the job as a child process and wait for it.
#[derive(Debug, Default)]
pub struct Process;

impl Executor for Process {
    fn execute(&mut self, job: &Job) -> Outcome {
        match Command::new(&job.program).args(&job.args).status() {
            Ok(status) if status.success() => Outcome::Success,
            Ok(status) => Outcome::Failed(exit_status_string(&status)),
            Err(e) => Outcome::Failed(format!("failed to spawn {}: {e}", job.program)),
        }
    }
}

/// Run nothing.
#[derive(Debug, Default)]
pub struct DryRun;

impl Executor for DryRun {
    fn execute(&mut self, _job: &Job) -> Outcome {
        Outcome::Skipped
    }
}

// ----------------------------------------------------------------------------
// Functions

/// Run a build, then report and optionally export the outcomes.
///
/// Failed jobs do not stop the sweep and do not make the run fail. Only
/// paths that cannot be handed to the jobs, and writing the requested
/// reports, can fail.
pub fn run(args: &Args) -> Result<Summary, Report> {
    info!(
        "Running build: {}, system: {}, frequencies: {}",
        args.build, args.system, args.frequencies
    );

    let summary = match args.dry_run {
        true => dispatch(args, &mut DryRun)?,
        false => dispatch(args, &mut Process)?,
    };

    report(&summary, args)?;

    Ok(summary)
}

/// Run both jobs of every point in the sweep, in order, through the executor.
///
/// Each job's command line is printed to stdout before it runs. A failed
/// job does not stop the sweep, but jobs that cannot be built from the
/// configured paths do.
pub fn dispatch<E>(args: &Args, executor: &mut E) -> Result<Summary, Report>
where
    E: Executor + ?Sized,
{
    let mut summary = Summary::new(args);

    for params in sweep::params(args.build).filter(|p| args.includes(&p.lineage)) {
        debug!("Parameters: {params}");
        for (stage, job) in job::steps(&params, args)? {
            let command = job.command_line();
            println!("{command}");

            let outcome = executor.execute(&job);
            if let Outcome::Failed(reason) = &outcome {
                warn!("The {stage} step failed for {params}: {reason}");
            }
            summary.records.push(Record { params, stage, command, outcome });
        }
    }

    Ok(summary.finish())
}

/// Log the outcome counts and write the requested report files.
pub fn report(summary: &Summary, args: &Args) -> Result<(), Report> {
    let table: Table = summary.to_table();
    if !table.rows.is_empty() {
        info!("Outcomes:\n{}", table.to_markdown());
    }

    let counts = summary.counts();
    info!(
        "Jobs succeeded: {}, failed: {}, skipped: {}",
        counts.success, counts.failed, counts.skipped
    );
    for record in summary.failures() {
        warn!("Failed {} step: {}", record.stage, record.command);
    }

    if let Some(path) = &args.summary {
        info!("Writing summary: {path:?}");
        summary.write(path)?;
    }
    if let Some(path) = &args.table {
        info!("Writing table: {path:?}");
        table.write(path)?;
    }

    Ok(())
}

fn exit_status_string(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("terminated by signal {signal}");
        }
    }
    "terminated by signal".to_string()
}
