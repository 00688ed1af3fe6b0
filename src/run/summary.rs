use crate::job::Stage;
use crate::run::Args;
use crate::sweep::Params;
use crate::utils::{create_parent_dir, table::Table};
use chrono::prelude::*;
use color_eyre::eyre::{Report, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// ----------------------------------------------------------------------------
// Outcome

/// How a single job ended.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Outcome {
    /// The job exited with status 0.
    Success,
    /// The job could not be spawned, exited with a non-zero status, or was killed by a signal.
    Failed(String),
    /// The job was not run (dry run).
    Skipped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failed(_) => write!(f, "failed"),
            Outcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// One job of the sweep and its outcome.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
    pub params: Params,
    pub stage: Stage,
    /// The command line as printed before running.
    pub command: String,
    pub outcome: Outcome,
}

/// Number of jobs per outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Counts {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

// ----------------------------------------------------------------------------
// Summary

/// A summary of a sweep: its configuration, timing, and every job outcome.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Summary {
    /// CLI version that ran the sweep.
    pub version: String,
    /// Effective configuration.
    pub args: Args,
    /// When the sweep started.
    pub start: DateTime<Local>,
    /// When the sweep ended, unset while running.
    pub end: Option<DateTime<Local>>,
    /// Job outcomes, in execution order.
    pub records: Vec<Record>,
}

impl Summary {
    /// Start a new summary for a sweep.
    pub fn new(args: &Args) -> Self {
        Summary {
            version: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            args: args.clone(),
            start: Local::now(),
            end: None,
            records: Vec::new(),
        }
    }

    /// Mark the sweep as ended.
    pub fn finish(mut self) -> Self {
        self.end = Some(Local::now());
        self
    }

    /// Count the jobs per outcome.
    pub fn counts(&self) -> Counts {
        self.records.iter().fold(Counts::default(), |mut counts, record| {
            match record.outcome {
                Outcome::Success => counts.success += 1,
                Outcome::Failed(_) => counts.failed += 1,
                Outcome::Skipped => counts.skipped += 1,
            }
            counts
        })
    }

    /// Records of the jobs that failed.
    pub fn failures(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| matches!(r.outcome, Outcome::Failed(_))).collect()
    }

    /// Tabulate the job outcomes, one row per job.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.headers = ["Lineage", "Resolution", "Passage", "Assay", "Stage", "Outcome"]
            .into_iter()
            .map(String::from)
            .collect();

        for record in &self.records {
            let params = &record.params;
            table.rows.push(vec![
                params.lineage.to_string(),
                params.resolution.to_string(),
                params.passage.map(|p| p.to_string()).unwrap_or_default(),
                params.assay.map(|a| a.to_string()).unwrap_or_default(),
                record.stage.to_string(),
                record.outcome.to_string(),
            ]);
        }

        table
    }

    /// Read summary from JSON file.
    pub fn read<P>(path: &P) -> Result<Summary, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let summary = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read file: {path:?}."))?;
        let summary = serde_json::from_str(&summary)
            .wrap_err_with(|| format!("Failed to parse file: {path:?}"))?;

        Ok(summary)
    }

    /// Write summary to JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        create_parent_dir(path)?;
        let mut file =
            File::create(path).wrap_err_with(|| format!("Failed to create file: {path:?}"))?;

        let output = serde_json::to_string_pretty(self)
            .wrap_err_with(|| format!("Failed to serialize summary: {path:?}"))?;

        file.write_all(format!("{}\n", output).as_bytes())
            .wrap_err_with(|| format!("Failed to write file: {path:?}"))?;

        Ok(())
    }
}
