
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::str::FromStr;
use strum::{EnumIter, EnumProperty, IntoEnumIterator};

// ----------------------------------------------------------------------------
// Lineage

/// An influenza lineage.
///
/// Each lineage has its own sequence and titer files in the data directory.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
pub enum Lineage {
    /// Influenza A, subtype H3N2
    #[default]
    #[serde(rename = "h3n2")]
    H3n2,
    /// Influenza A, pandemic H1N1 (2009)
    #[serde(rename = "h1n1pdm")]
    H1n1pdm,
    /// Influenza B, Victoria lineage
    #[serde(rename = "vic")]
    Vic,
    /// Influenza B, Yamagata lineage
    #[serde(rename = "yam")]
    Yam,
}

impl std::fmt::Display for Lineage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lineage = match self {
            Lineage::H3n2 => "h3n2",
            Lineage::H1n1pdm => "h1n1pdm",
            Lineage::Vic => "vic",
            Lineage::Yam => "yam",
        };

        write!(f, "{lineage}")
    }
}

impl FromStr for Lineage {
    type Err = Report;

    /// Convert a string to a Lineage.
    fn from_str(lineage: &str) -> Result<Self, Report> {
        let lineage = match lineage {
            "h3n2" => Lineage::H3n2,
            "h1n1pdm" => Lineage::H1n1pdm,
            "vic" => Lineage::Vic,
            "yam" => Lineage::Yam,
            _ => Err(eyre!("Unknown lineage: {lineage}"))
                .suggestion(format!("Please choose from: {}", Lineage::iter().join(", ")))?,
        };

        Ok(lineage)
    }
}

// ----------------------------------------------------------------------------
// Resolution

/// The time span of the analysis window.
///
/// Resolutions marked with the `cdc` property are the ones swept by the [`Build::Cdc`] build.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, EnumIter, EnumProperty, Eq, Hash, PartialEq, Serialize,
)]
pub enum Resolution {
    /// Two years
    #[default]
    #[serde(rename = "2y")]
    #[strum(props(cdc = "true"))]
    Y2,
    /// Three years
    #[serde(rename = "3y")]
    #[strum(props(cdc = "true"))]
    Y3,
    /// Six years
    #[serde(rename = "6y")]
    #[strum(props(cdc = "true"))]
    Y6,
    /// Twelve years
    #[serde(rename = "12y")]
    #[strum(props(cdc = "false"))]
    Y12,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let resolution = match self {
            Resolution::Y2 => "2y",
            Resolution::Y3 => "3y",
            Resolution::Y6 => "6y",
            Resolution::Y12 => "12y",
        };

        write!(f, "{resolution}")
    }
}

impl FromStr for Resolution {
    type Err = Report;

    fn from_str(resolution: &str) -> Result<Self, Report> {
        let resolution = match resolution {
            "2y" => Resolution::Y2,
            "3y" => Resolution::Y3,
            "6y" => Resolution::Y6,
            "12y" => Resolution::Y12,
            _ => Err(eyre!("Unknown resolution: {resolution}")).suggestion(format!(
                "Please choose from: {}",
                Resolution::iter().join(", ")
            ))?,
        };

        Ok(resolution)
    }
}

// ----------------------------------------------------------------------------
// Passage

/// The laboratory propagation method of the titered virus.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Passage {
    #[default]
    Cell,
    Egg,
}

impl std::fmt::Display for Passage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Passage::Cell => write!(f, "cell"),
            Passage::Egg => write!(f, "egg"),
        }
    }
}

// ----------------------------------------------------------------------------
// Assay

/// The laboratory technique that produced the titers.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Assay {
    /// Hemagglutination inhibition
    #[default]
    Hi,
    /// Focus reduction assay
    Fra,
}

impl Assay {
    /// Return true if titers from this assay exist for the lineage.
    ///
    /// Focus reduction titers are only produced for h3n2.
    ///
    /// ```rust
    /// use flusweep::sweep::attributes::{Assay, Lineage};
    ///
    /// assert!(Assay::Hi.is_compatible(&Lineage::Yam));
    /// assert!(Assay::Fra.is_compatible(&Lineage::H3n2));
    /// assert!(!Assay::Fra.is_compatible(&Lineage::Vic));
    /// ```
    pub fn is_compatible(&self, lineage: &Lineage) -> bool {
        match self {
            Assay::Hi => true,
            Assay::Fra => *lineage == Lineage::H3n2,
        }
    }
}

impl std::fmt::Display for Assay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assay::Hi => write!(f, "hi"),
            Assay::Fra => write!(f, "fra"),
        }
    }
}

// ----------------------------------------------------------------------------
// Build

/// The build, which decides the shape of the parameter sweep.
#[derive(Clone, Copy, Debug, Default, Deserialize, EnumIter, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Build {
    /// Public builds: lineage × resolution, with HI titers.
    #[default]
    Live,
    /// CDC builds: lineage × resolution × passage × assay.
    Cdc,
}

impl Build {
    /// The resolutions swept by this build, in sweep order.
    ///
    /// ```rust
    /// use flusweep::sweep::attributes::{Build, Resolution};
    ///
    /// assert_eq!(Build::Live.resolutions().len(), 4);
    /// assert!(!Build::Cdc.resolutions().contains(&Resolution::Y12));
    /// ```
    pub fn resolutions(&self) -> Vec<Resolution> {
        match self {
            Build::Live => Resolution::iter().collect(),
            Build::Cdc => Resolution::iter()
                .filter(|r| r.get_str("cdc").unwrap_or("false") == "true")
                .collect(),
        }
    }
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Build::Live => write!(f, "live"),
            Build::Cdc => write!(f, "cdc"),
        }
    }
}

impl FromStr for Build {
    type Err = Report;

    fn from_str(build: &str) -> Result<Self, Report> {
        match build {
            "live" => Ok(Build::Live),
            "cdc" => Ok(Build::Cdc),
            _ => Err(eyre!("Unsupported build: {build}")).suggestion(format!("Please choose from: {}", Build::iter().join(", "))),
        }
    }
}

// ----------------------------------------------------------------------------
// Frequencies

/// How the prepare step estimates frequencies.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequencies {
    /// Estimate frequencies on all available sequences.
    #[default]
    Complete,
    /// Estimate frequencies on the subsampled sequences only.
    Subsampled,
}

impl std::fmt::Display for Frequencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequencies::Complete => write!(f, "complete"),
            Frequencies::Subsampled => write!(f, "subsampled"),
        }
    }
}

impl FromStr for Frequencies {
    type Err = Report;

    /// Anything other than `complete` means subsampled.
    ///
    /// ```rust
    /// use flusweep::sweep::attributes::Frequencies;
    /// use std::str::FromStr;
    ///
    /// assert_eq!(Frequencies::from_str("complete")?, Frequencies::Complete);
    /// assert_eq!(Frequencies::from_str("subsampled")?, Frequencies::Subsampled);
    /// assert_eq!(Frequencies::from_str("partial")?, Frequencies::Subsampled);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_str(frequencies: &str) -> Result<Self, Report> {
        let frequencies = match frequencies {
            "complete" => Frequencies::Complete,
            _ => Frequencies::Subsampled,
        };

        Ok(frequencies)
    }
}
