//! Interactive selection of the run's source and format.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use flatdiff::{DocumentFormat, SourceKind};

/// Asks which source the documents come from.
pub fn choose_source<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<SourceKind> {
    writeln!(output, "Select source:\n 1 – File System\n 2 – Database")?;
    match prompt(input, output)?.as_str() {
        "1" => Ok(SourceKind::File),
        "2" => Ok(SourceKind::Database),
        _ => bail!("Invalid source selection"),
    }
}

/// Asks which document format to compare.
pub fn choose_format<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<DocumentFormat> {
    writeln!(output, "\nSelect data format:\n 1 – XML\n 2 – JSON")?;
    match prompt(input, output)?.as_str() {
        "1" => Ok(DocumentFormat::Xml),
        "2" => Ok(DocumentFormat::Json),
        _ => bail!("Invalid format selection"),
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Enter 1 or 2: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
