//! Enumerate the parameter combinations of a build.

pub mod attributes;

use crate::sweep::attributes::{Assay, Build, Lineage, Passage, Resolution};
use clap::Args as ClapArgs;
use color_eyre::eyre::{ContextCompat, Report, Result};
use color_eyre::Help;
use itertools::iproduct;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

// ----------------------------------------------------------------------------
// Params

/// One point of the parameter sweep.
///
/// The `passage` and `assay` are only set for the [`Build::Cdc`] build.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Params {
    pub lineage: Lineage,
    pub resolution: Resolution,
    pub passage: Option<Passage>,
    pub assay: Option<Assay>,
}

impl Params {
    /// Parameters of a live build.
    pub fn live(lineage: Lineage, resolution: Resolution) -> Self {
        Params { lineage, resolution, passage: None, assay: None }
    }

    /// Parameters of a cdc build.
    pub fn cdc(lineage: Lineage, resolution: Resolution, passage: Passage, assay: Assay) -> Self {
        Params { lineage, resolution, passage: Some(passage), assay: Some(assay) }
    }

    /// The build these parameters belong to.
    pub fn build(&self) -> Build {
        match (self.passage, self.assay) {
            (Some(_), Some(_)) => Build::Cdc,
            _ => Build::Live,
        }
    }

    /// Prefix shared by the prepare output and the process input.
    ///
    /// ```rust
    /// use flusweep::sweep::Params;
    /// use flusweep::sweep::attributes::*;
    ///
    /// let params = Params::live(Lineage::H3n2, Resolution::Y2);
    /// assert_eq!(params.file_prefix(), "flu_h3n2_ha_2y");
    ///
    /// let params = Params::cdc(Lineage::H3n2, Resolution::Y6, Passage::Egg, Assay::Fra);
    /// assert_eq!(params.file_prefix(), "flu_h3n2_ha_6y_egg_fra");
    /// ```
    pub fn file_prefix(&self) -> String {
        let prefix = format!("flu_{}_ha_{}", self.lineage, self.resolution);
        match (self.passage, self.assay) {
            (Some(passage), Some(assay)) => format!("{prefix}_{passage}_{assay}"),
            _ => prefix,
        }
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.lineage, self.resolution)?;
        if let (Some(passage), Some(assay)) = (self.passage, self.assay) {
            write!(f, " {passage} {assay}")?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Layout

/// Where input files are read from and prepared files are written to.
#[derive(Clone, Debug, Deserialize, ClapArgs, PartialEq, Serialize)]
pub struct Layout {
    /// Directory of the sequence and titer files.
    #[clap(long, default_value_os_t = Layout::default().data_dir)]
    pub data_dir: PathBuf,

    /// Directory where the prepare step writes its JSON.
    #[clap(long, default_value_os_t = Layout::default().prepared_dir)]
    pub prepared_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        Layout {
            data_dir: PathBuf::from("../../fauna/data"),
            prepared_dir: PathBuf::from("prepared"),
        }
    }

    /// Resolve the files used by both steps for one set of parameters.
    pub fn files(&self, params: &Params) -> Files {
        let lineage = params.lineage;
        let titers = match (params.passage, params.assay) {
            (Some(passage), Some(assay)) => format!("{lineage}_cdc_{assay}_{passage}_titers.tsv"),
            _ => format!("{lineage}_hi_titers.tsv"),
        };
        let file_prefix = params.file_prefix();

        Files {
            sequences: self.data_dir.join(format!("{lineage}.fasta")),
            titers: self.data_dir.join(titers),
            json: self.prepared_dir.join(format!("{file_prefix}.json")),
            file_prefix,
        }
    }
}

/// Files for one point of the sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct Files {
    /// Input sequences.
    pub sequences: PathBuf,
    /// Input titers.
    pub titers: PathBuf,
    /// Output prefix handed to the prepare step.
    pub file_prefix: String,
    /// JSON written by the prepare step, read by the process step.
    pub json: PathBuf,
}

// ----------------------------------------------------------------------------
// Functions

/// Lazily enumerate the parameters of a build, in sweep order.
///
/// Lineage is the outermost loop, then resolution, passage, and assay.
/// Focus reduction assays are skipped for every lineage but h3n2.
///
/// ```rust
/// use flusweep::sweep;
/// use flusweep::sweep::attributes::Build;
///
/// assert_eq!(sweep::params(Build::Live).count(), 16);
/// assert_eq!(sweep::params(Build::Cdc).count(), 30);
/// ```
pub fn params(build: Build) -> Box<dyn Iterator<Item = Params>> {
    debug!("Enumerating parameters for build: {build}");
    let resolutions = build.resolutions();

    match build {
        Build::Live => Box::new(
            iproduct!(Lineage::iter(), resolutions)
                .map(|(lineage, resolution)| Params::live(lineage, resolution)),
        ),
        Build::Cdc => Box::new(
            iproduct!(Lineage::iter(), resolutions, Passage::iter(), Assay::iter())
                .filter(|(lineage, _, _, assay)| assay.is_compatible(lineage))
                .map(|(lineage, resolution, passage, assay)| {
                    Params::cdc(lineage, resolution, passage, assay)
                }),
        ),
    }
}

/// Convert a path to the argument handed to the analysis programs.
///
/// Paths that are not valid UTF-8 are rejected rather than altered.
///
/// ```rust
/// use flusweep::sweep::path_arg;
///
/// assert_eq!(path_arg(&"prepared/flu_h3n2_ha_2y.json")?, "prepared/flu_h3n2_ha_2y.json");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn path_arg<P>(path: &P) -> Result<String, Report>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    path.to_str()
        .map(String::from)
        .wrap_err_with(|| format!("Path is not valid UTF-8: {path:?}"))
        .suggestion("Rename the file or directory, or choose another with --data-dir, --prepared-dir or --submit-script")
}
