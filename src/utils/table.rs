#[cfg(test)]
mod tests;

use crate::utils::{create_parent_dir, get_delimiter};
use color_eyre::eyre::{Report, Result, WrapErr};
use itertools::Itertools;
use std::default::Default;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A table of text cells, with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new() }
    }

    /// Write to a delimited file, the delimiter follows the file extension.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        // Parse line delimiter from file extension
        let delim = get_delimiter(path)?.to_string();

        create_parent_dir(path)?;
        let mut file =
            File::create(path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;

        // write headers
        let line = format!("{}\n", self.headers.iter().join(&delim));
        file.write_all(line.as_bytes())
            .wrap_err_with(|| format!("Unable to write table headers: {line}"))?;

        // write regular rows
        for row in &self.rows {
            let line = format!("{}\n", row.iter().join(&delim));
            file.write_all(line.as_bytes())
                .wrap_err_with(|| format!("Unable to write table rows: {line}"))?;
        }

        Ok(())
    }

    /// Convert table to markdown format, with centered cells.
    pub fn to_markdown(&self) -> String {
        // get the maximum width of each column, +2 to add space on either side
        let col_widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(col_i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col_i))
                    .map(|cell| cell.len())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(header.len())
                    + 2
            })
            .collect_vec();

        let mut markdown = String::from("|");
        // frame in between headers and rows
        let mut header_frame = String::from("|");

        // Create the header line
        for (header, col_width) in self.headers.iter().zip(col_widths.iter()) {
            markdown.push_str(&format!("{:^width$}|", header, width = col_width));
            header_frame.push_str(&format!("{}|", "-".repeat(*col_width)));
        }
        markdown.push('\n');
        markdown.push_str(&header_frame);
        markdown.push('\n');

        // Create the row lines
        for row in &self.rows {
            markdown.push('|');
            for (col_i, col_width) in col_widths.iter().enumerate() {
                let cell = row.get(col_i).map(String::as_str).unwrap_or_default();
                markdown.push_str(&format!("{:^width$}|", cell, width = col_width));
            }
            markdown.push('\n');
        }

        markdown
    }
}
