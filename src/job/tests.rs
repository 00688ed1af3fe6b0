use crate::job::{self, Backend, Job, Stage};
use crate::run::Args;
use crate::sweep::attributes::{Assay, Build, Frequencies, Lineage, Passage, Resolution};
use crate::sweep::{self, Params};

use color_eyre::eyre::{Report, Result};
use std::path::PathBuf;
use std::str::FromStr;

const LIVE_PREPARE: &str = "--lineage h3n2 --resolution 2y --sequences ../../fauna/data/h3n2.fasta --titers ../../fauna/data/h3n2_hi_titers.tsv --file_prefix flu_h3n2_ha_2y --complete_frequencies";

#[test]
fn live_local_complete() -> Result<(), Report> {
    let args = Args::default();
    let params = Params::live(Lineage::H3n2, Resolution::Y2);
    let [(first, prepare), (second, process)] = job::steps(&params, &args)?;

    assert_eq!(first, Stage::Prepare);
    assert_eq!(second, Stage::Process);
    assert_eq!(prepare.command_line(), format!("python flu.prepare.py {LIVE_PREPARE}"));
    assert_eq!(
        process.command_line(),
        "python flu.process.py --json prepared/flu_h3n2_ha_2y.json"
    );
    Ok(())
}

#[test]
fn deterministic() -> Result<(), Report> {
    let args = Args { system: Backend::Sbatch, ..Default::default() };
    for params in sweep::params(Build::Cdc) {
        assert_eq!(job::steps(&params, &args)?, job::steps(&params, &args)?);
    }
    Ok(())
}

#[test]
fn complete_frequencies_flag() -> Result<(), Report> {
    let args = Args::default();
    let params = Params::cdc(Lineage::Vic, Resolution::Y3, Passage::Cell, Assay::Hi);
    let flag = "--complete_frequencies".to_string();

    let complete = job::prepare(&params, &Frequencies::Complete, &args)?;
    assert_eq!(complete.args.last(), Some(&flag));

    let subsampled = job::prepare(&params, &Frequencies::Subsampled, &args)?;
    assert!(!subsampled.args.contains(&flag));
    Ok(())
}

#[test]
fn cdc_prepare() -> Result<(), Report> {
    let args = Args::default();
    let params = Params::cdc(Lineage::H3n2, Resolution::Y6, Passage::Egg, Assay::Fra);
    let observed = job::prepare(&params, &Frequencies::Subsampled, &args)?;
    let expected = Job::new("python").arg("flu.prepare.py").args([
        "--lineage",
        "h3n2",
        "--resolution",
        "6y",
        "--sequences",
        "../../fauna/data/h3n2.fasta",
        "--titers",
        "../../fauna/data/h3n2_cdc_fra_egg_titers.tsv",
        "--file_prefix",
        "flu_h3n2_ha_6y_egg_fra",
    ]);
    assert_eq!(expected, observed);
    Ok(())
}

#[test]
fn cdc_process_exports_titers() -> Result<(), Report> {
    let args = Args::default();
    let params = Params::cdc(Lineage::Yam, Resolution::Y2, Passage::Cell, Assay::Hi);
    let observed = job::process(&params, &Backend::Local, &args)?;
    let expected = Job::new("python").args([
        "flu.process.py",
        "--json",
        "prepared/flu_yam_ha_2y_cell_hi.json",
        "--titers_export",
    ]);
    assert_eq!(expected, observed);
    Ok(())
}

#[test]
fn qsub_process() -> Result<(), Report> {
    let args = Args::default();
    let params = Params::live(Lineage::H1n1pdm, Resolution::Y12);
    let observed = job::process(&params, &Backend::Qsub, &args)?;
    let expected = Job::new("qsub").args([
        "submit_script.sh",
        "flu.process.py",
        "--json",
        "prepared/flu_h1n1pdm_ha_12y.json",
    ]);
    assert_eq!(expected, observed);
    Ok(())
}

#[test]
fn sbatch_process() -> Result<(), Report> {
    let args = Args::default();
    let params = Params::live(Lineage::Vic, Resolution::Y2);
    let observed = job::process(&params, &Backend::Sbatch, &args)?;
    let expected = Job::new("sbatch").args([
        "-n",
        "1",
        "-c",
        "2",
        "--mem",
        "8096",
        "--time",
        "12:00:00",
        "--wrap",
        "python flu.process.py --json prepared/flu_vic_ha_2y.json",
    ]);
    assert_eq!(expected, observed);

    // the wrapped command is one argument, quoted once on display
    assert!(observed
        .command_line()
        .ends_with("--wrap 'python flu.process.py --json prepared/flu_vic_ha_2y.json'"));
    Ok(())
}

#[test]
fn prepare_ignores_backend() -> Result<(), Report> {
    let params = Params::live(Lineage::Yam, Resolution::Y3);
    let local = Args::default();
    let qsub = Args { system: Backend::Qsub, ..Default::default() };
    let sbatch = Args { system: Backend::Sbatch, ..Default::default() };

    let expected = job::prepare(&params, &local.frequencies, &local)?;
    assert_eq!(expected, job::prepare(&params, &qsub.frequencies, &qsub)?);
    assert_eq!(expected, job::prepare(&params, &sbatch.frequencies, &sbatch)?);
    Ok(())
}

#[test]
fn backend_exhaustive() -> Result<(), Report> {
    let params = Params::live(Lineage::H3n2, Resolution::Y2);
    let args = Args::default();

    let programs = ["local", "qsub", "sbatch"]
        .into_iter()
        .map(|name| {
            Backend::from_str(name)
                .and_then(|b| job::process(&params, &b, &args))
                .map(|job| job.program)
        })
        .collect::<Result<Vec<_>, Report>>()?;
    assert_eq!(programs, vec!["python", "qsub", "sbatch"]);
    Ok(())
}

#[test]
fn backend_unsupported() {
    let error = Backend::from_str("slurm").unwrap_err();
    assert!(error.to_string().contains("Unsupported backend: slurm"));
}

#[test]
fn custom_python_and_resources() -> Result<(), Report> {
    let mut args = Args::default();
    args.python = "python3".to_string();
    args.resources.mem = 16000;
    args.resources.time = "01:00:00".to_string();

    let params = Params::live(Lineage::H3n2, Resolution::Y2);
    let job = job::process(&params, &Backend::Sbatch, &args)?;

    assert_eq!(job.args[5], "16000");
    assert_eq!(job.args[7], "01:00:00");
    assert_eq!(
        job.args.last().map(String::as_str),
        Some("python3 flu.process.py --json prepared/flu_h3n2_ha_2y.json")
    );
    Ok(())
}

#[test]
fn custom_directories() -> Result<(), Report> {
    let mut args = Args::default();
    args.layout.data_dir = PathBuf::from("/data/fauna");
    args.layout.prepared_dir = PathBuf::from("/scratch/prepared");
    args.submit_script = PathBuf::from("/home/flu/submit.sh");

    let params = Params::live(Lineage::Vic, Resolution::Y6);
    let prepare = job::prepare(&params, &Frequencies::Complete, &args)?;
    assert_eq!(prepare.args[6], "/data/fauna/vic.fasta");
    assert_eq!(prepare.args[8], "/data/fauna/vic_hi_titers.tsv");

    let process = job::process(&params, &Backend::Qsub, &args)?;
    assert_eq!(process.args[0], "/home/flu/submit.sh");
    assert_eq!(process.args[3], "/scratch/prepared/flu_vic_ha_6y.json");
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_utf8_paths_rejected() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let invalid = PathBuf::from(OsStr::from_bytes(b"/data/fl\xffu"));
    let params = Params::live(Lineage::H3n2, Resolution::Y2);

    // the data directory is only read by the prepare step
    let mut args = Args::default();
    args.layout.data_dir = invalid.clone();
    let error = job::prepare(&params, &Frequencies::Complete, &args).unwrap_err();
    assert!(error.to_string().starts_with("Path is not valid UTF-8"));
    assert!(job::process(&params, &Backend::Local, &args).is_ok());

    let mut args = Args::default();
    args.layout.prepared_dir = invalid.clone();
    assert!(job::process(&params, &Backend::Local, &args).is_err());
    assert!(job::process(&params, &Backend::Sbatch, &args).is_err());

    let mut args = Args::default();
    args.submit_script = invalid;
    assert!(job::process(&params, &Backend::Qsub, &args).is_err());
    assert!(job::process(&params, &Backend::Local, &args).is_ok());
}
