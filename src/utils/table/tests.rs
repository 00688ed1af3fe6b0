use crate::utils::table::Table;

use color_eyre::eyre::{Report, Result};
use indoc::indoc;
use tempfile::TempDir;

fn toy_table() -> Table {
    Table {
        headers: vec!["Lineage".to_string(), "Outcome".to_string()],
        rows: vec![
            vec!["h3n2".to_string(), "success".to_string()],
            vec!["h1n1pdm".to_string(), "failed".to_string()],
        ],
    }
}

#[test]
fn markdown() {
    let expected = indoc! {"
        | Lineage | Outcome |
        |---------|---------|
        |  h3n2   | success |
        | h1n1pdm | failed  |
    "};
    assert_eq!(expected, toy_table().to_markdown());
}

#[test]
fn markdown_headers_only() {
    let table = Table { headers: vec!["Stage".to_string()], rows: Vec::new() };
    assert_eq!(table.to_markdown(), "| Stage |\n|-------|\n");
}

#[test]
fn write_delimited() -> Result<(), Report> {
    let tmp = TempDir::new()?;
    let table = toy_table();

    let path = tmp.path().join("outcomes.tsv");
    table.write(&path)?;
    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents, "Lineage\tOutcome\nh3n2\tsuccess\nh1n1pdm\tfailed\n");

    // parent directories are created as needed
    let path = tmp.path().join("nested/outcomes.csv");
    table.write(&path)?;
    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents, "Lineage,Outcome\nh3n2,success\nh1n1pdm,failed\n");
    Ok(())
}

#[test]
fn write_unknown_extension() -> Result<(), Report> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("outcomes.xlsx");
    assert!(toy_table().write(&path).is_err());
    assert!(!path.exists());
    Ok(())
}
