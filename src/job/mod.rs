//! Build the prepare and process jobs for one point of the sweep.

#[cfg(test)]
mod tests;

use crate::run::Args;
use crate::sweep::attributes::{Build, Frequencies};
use crate::sweep::{path_arg, Params};
use clap::Args as ClapArgs;
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Script that assembles sequences and titers into a prepared JSON.
pub const PREPARE_SCRIPT: &str = "flu.prepare.py";
/// Script that runs the analysis on a prepared JSON.
pub const PROCESS_SCRIPT: &str = "flu.process.py";
/// Queue submission program.
pub const QSUB: &str = "qsub";
/// Batch scheduler submission program.
pub const SBATCH: &str = "sbatch";

// ----------------------------------------------------------------------------
// Job

/// An external program and its arguments.
///
/// Arguments are kept as a list and handed to the process spawn as is,
/// so no shell quoting is involved in running a job.
///
/// ```rust
/// use flusweep::job::Job;
///
/// let job = Job::new("python").arg("flu.process.py").args(["--json", "prepared/flu.json"]);
/// assert_eq!(job.command_line(), "python flu.process.py --json prepared/flu.json");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Job {
    pub program: String,
    pub args: Vec<String>,
}

impl Job {
    pub fn new<S>(program: S) -> Self
    where
        S: Into<String>,
    {
        Job { program: program.into(), args: Vec::new() }
    }

    /// Add an argument to the job.
    pub fn arg<S>(mut self, arg: S) -> Self
    where
        S: Into<String>,
    {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the job.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The job as a single shell-quoted line, for printing and for `sbatch --wrap`.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

// ----------------------------------------------------------------------------
// Stage

/// The two steps run for every point of the sweep, in this order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Prepare,
    Process,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Prepare => write!(f, "prepare"),
            Stage::Process => write!(f, "process"),
        }
    }
}

// ----------------------------------------------------------------------------
// Backend

/// Where the process step runs.
#[derive(Clone, Copy, Debug, Default, Deserialize, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Run directly with the python interpreter.
    #[default]
    Local,
    /// Submit to a cluster queue through the submission script.
    Qsub,
    /// Submit to a batch scheduler as a wrapped command.
    Sbatch,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Local => write!(f, "local"),
            Backend::Qsub => write!(f, "qsub"),
            Backend::Sbatch => write!(f, "sbatch"),
        }
    }
}

impl FromStr for Backend {
    type Err = Report;

    /// Convert a string to a Backend.
    ///
    /// ```rust
    /// use flusweep::job::Backend;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Backend::from_str("sbatch")?, Backend::Sbatch);
    /// assert!(Backend::from_str("slurm").is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_str(backend: &str) -> Result<Self, Report> {
        match backend {
            "local" => Ok(Backend::Local),
            "qsub" => Ok(Backend::Qsub),
            "sbatch" => Ok(Backend::Sbatch),
            _ => Err(eyre!("Unsupported backend: {backend}"))
                .suggestion(format!("Please choose from: {}", Backend::iter().join(", "))),
        }
    }
}

// ----------------------------------------------------------------------------
// Resources

/// Resources requested from the batch scheduler for each process job.
#[derive(Clone, Debug, Deserialize, ClapArgs, PartialEq, Serialize)]
pub struct Resources {
    /// Number of tasks requested from sbatch.
    #[clap(long, default_value_t = Resources::default().ntasks)]
    pub ntasks: usize,

    /// Number of CPUs per task requested from sbatch.
    #[clap(long, default_value_t = Resources::default().cpus)]
    pub cpus: usize,

    /// Memory (MB) requested from sbatch.
    #[clap(long, default_value_t = Resources::default().mem)]
    pub mem: usize,

    /// Wall time limit (HH:MM:SS) requested from sbatch.
    #[clap(long, default_value_t = Resources::default().time)]
    pub time: String,
}

impl Default for Resources {
    fn default() -> Self {
        Resources { ntasks: 1, cpus: 2, mem: 8096, time: String::from("12:00:00") }
    }
}

impl Resources {
    /// Scheduler arguments placed before `--wrap`.
    pub fn sbatch_args(&self) -> Vec<String> {
        vec![
            "-n".to_string(),
            self.ntasks.to_string(),
            "-c".to_string(),
            self.cpus.to_string(),
            "--mem".to_string(),
            self.mem.to_string(),
            "--time".to_string(),
            self.time.clone(),
        ]
    }
}

// ----------------------------------------------------------------------------
// Functions

/// Build the prepare job.
///
/// The prepare step always runs locally, whatever the backend.
pub fn prepare(params: &Params, frequencies: &Frequencies, args: &Args) -> Result<Job, Report> {
    let files = args.layout.files(params);

    let job = Job::new(&args.python).arg(PREPARE_SCRIPT).args([
        "--lineage".to_string(),
        params.lineage.to_string(),
        "--resolution".to_string(),
        params.resolution.to_string(),
        "--sequences".to_string(),
        path_arg(&files.sequences)?,
        "--titers".to_string(),
        path_arg(&files.titers)?,
        "--file_prefix".to_string(),
        files.file_prefix,
    ]);

    let job = match frequencies {
        Frequencies::Complete => job.arg("--complete_frequencies"),
        Frequencies::Subsampled => job,
    };

    Ok(job)
}

/// Build the process job, wrapped for the backend.
pub fn process(params: &Params, backend: &Backend, args: &Args) -> Result<Job, Report> {
    let files = args.layout.files(params);

    let mut script_args = vec!["--json".to_string(), path_arg(&files.json)?];
    if params.build() == Build::Cdc {
        script_args.push("--titers_export".to_string());
    }

    let job = match backend {
        Backend::Local => Job::new(&args.python).arg(PROCESS_SCRIPT).args(script_args),
        Backend::Qsub => Job::new(QSUB)
            .arg(path_arg(&args.submit_script)?)
            .arg(PROCESS_SCRIPT)
            .args(script_args),
        Backend::Sbatch => {
            let wrapped = Job::new(&args.python).arg(PROCESS_SCRIPT).args(script_args);
            Job::new(SBATCH)
                .args(args.resources.sbatch_args())
                .arg("--wrap")
                .arg(wrapped.command_line())
        }
    };

    Ok(job)
}

/// Both jobs for one point of the sweep, in execution order.
pub fn steps(params: &Params, args: &Args) -> Result<[(Stage, Job); 2], Report> {
    Ok([
        (Stage::Prepare, prepare(params, &args.frequencies, args)?),
        (Stage::Process, process(params, &args.system, args)?),
    ])
}
