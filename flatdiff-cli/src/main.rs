//! flatdiff - Batch XML/JSON Document Comparison CLI

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flatdiff::{
    load_pairs, write_report, Comparison, Config, DocumentFormat, DocumentPair, ExclusionSet,
    FileSource, PairDifference, ReportWriter, RunSummary, SourceKind,
};
use tracing::Level;

mod menu;

const DEFAULT_CONFIG: &str = "flatdiff.toml";

/// Batch XML/JSON Document Comparison Tool
#[derive(Parser)]
#[command(name = "flatdiff")]
#[command(version)]
#[command(about = "Compare XML and JSON document pairs and report differences as CSV", long_about = None)]
struct Cli {
    /// Configuration file (default: flatdiff.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every pair of a pair list
    #[command(visible_alias = "r")]
    Run {
        /// Where documents come from (asked interactively if omitted)
        #[arg(short, long, value_enum)]
        source: Option<SourceArg>,
        /// Document format (asked interactively if omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Report file (default: all_differences_<source>_<format>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also report attributes only the right document carries
        #[arg(long)]
        symmetric_attributes: bool,
    },

    /// Compare two documents on disk
    #[command(visible_alias = "c")]
    Compare {
        /// Left document
        left: PathBuf,
        /// Right document
        right: PathBuf,
        /// Document format (default: from the left file's extension)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Exclusion list (default: from the configuration)
        #[arg(short, long)]
        exclusions: Option<PathBuf>,
        /// Report file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    File,
    Db,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::File => SourceKind::File,
            SourceArg::Db => SourceKind::Database,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Xml,
    Json,
}

impl From<FormatArg> for DocumentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xml => DocumentFormat::Xml,
            FormatArg::Json => DocumentFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Run {
            source,
            format,
            output,
            symmetric_attributes,
        } => run_batch(
            config,
            source.map(Into::into),
            format.map(Into::into),
            output,
            symmetric_attributes,
        ),
        Commands::Compare {
            left,
            right,
            format,
            exclusions,
            output,
        } => run_compare(
            &config,
            &left,
            &right,
            format.map(Into::into),
            exclusions.as_deref(),
            output.as_deref(),
        ),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// An explicit config file must exist; the default one is optional.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration '{}'", path.display()))?,
        None => Config::load_or_default(DEFAULT_CONFIG)
            .with_context(|| format!("loading configuration '{}'", DEFAULT_CONFIG))?,
    };
    Ok(config)
}

fn source_label(source: SourceKind) -> &'static str {
    match source {
        SourceKind::File => "File System",
        SourceKind::Database => "Database",
    }
}

/// Runs a full pair-list comparison and writes the report.
fn run_batch(
    mut config: Config,
    source: Option<SourceKind>,
    format: Option<DocumentFormat>,
    output: Option<PathBuf>,
    symmetric_attributes: bool,
) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let source = match source {
        Some(source) => source,
        None => menu::choose_source(&mut stdin.lock(), &mut stdout.lock())?,
    };
    let format = match format {
        Some(format) => format,
        None => menu::choose_format(&mut stdin.lock(), &mut stdout.lock())?,
    };
    if symmetric_attributes {
        config.diff.symmetric_attributes = true;
    }
    let output = output.unwrap_or_else(|| config.default_output(source, format));

    eprintln!(
        "Running {} {} comparison. Output will be in '{}'",
        source_label(source),
        format.to_string().to_uppercase(),
        output.display()
    );

    let canonicalizer = config.canonicalizer();
    let exclusions = config.exclusions(&canonicalizer);
    let comparison = Comparison::with_options(&canonicalizer, &exclusions, config.diff);
    let pairs = load_pairs(
        config.pair_list(source, format),
        config.pair_columns(source, format),
    )?;

    let summary = match source {
        SourceKind::File => comparison.run(&mut config.file_source(), format, &pairs)?,
        SourceKind::Database => run_database(&config, &comparison, format, &pairs)?,
    };

    let written = write_report(&output, &summary.rows, config.report.layout)?;
    eprintln!(
        "Operation finished: {} differences in {} of {} pairs ({} skipped). Please check '{}' for results.",
        written,
        summary.processed,
        summary.total(),
        summary.skipped.len(),
        output.display()
    );
    Ok(())
}

#[cfg(feature = "database")]
fn run_database(
    config: &Config,
    comparison: &Comparison,
    format: DocumentFormat,
    pairs: &[DocumentPair],
) -> Result<RunSummary> {
    let mut source = flatdiff::DatabaseSource::connect(&config.database)?;
    Ok(comparison.run(&mut source, format, pairs)?)
}

#[cfg(not(feature = "database"))]
fn run_database(
    _config: &Config,
    _comparison: &Comparison,
    _format: DocumentFormat,
    _pairs: &[DocumentPair],
) -> Result<RunSummary> {
    bail!("database support is not enabled; rebuild with `--features database`")
}

/// Compares two files and writes their report.
fn run_compare(
    config: &Config,
    left: &Path,
    right: &Path,
    format: Option<DocumentFormat>,
    exclusions: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let format = format.unwrap_or_else(|| infer_format(left));
    let canonicalizer = config.canonicalizer();
    let exclusions = match exclusions {
        Some(path) => ExclusionSet::load(path, &canonicalizer),
        None => config.exclusions(&canonicalizer),
    };
    let comparison = Comparison::with_options(&canonicalizer, &exclusions, config.diff);

    let pair = DocumentPair::new(path_id(left)?, path_id(right)?);
    // Identifiers are paths; resolve them against the working directory
    let mut source = FileSource::new("");
    let records = comparison.compare_pair(&mut source, format, &pair)?;

    let rows = records
        .into_iter()
        .map(|record| PairDifference {
            left_id: pair.left.clone(),
            right_id: pair.right.clone(),
            record,
        })
        .collect::<Vec<_>>();

    match output {
        Some(path) => {
            write_report(path, &rows, config.report.layout)?;
            eprintln!("{} differences written to '{}'", rows.len(), path.display());
        }
        None => {
            let mut writer =
                ReportWriter::new(BufWriter::new(io::stdout().lock()), config.report.layout)?;
            for row in &rows {
                writer.write_row(row)?;
            }
            writer.finish()?;
        }
    }
    Ok(())
}

fn infer_format(path: &Path) -> DocumentFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
        _ => DocumentFormat::Xml,
    }
}

fn path_id(path: &Path) -> Result<String> {
    match path.to_str() {
        Some(id) => Ok(id.to_string()),
        None => bail!("path '{}' is not valid UTF-8", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_format() {
        assert_eq!(infer_format(Path::new("a/order.JSON")), DocumentFormat::Json);
        assert_eq!(infer_format(Path::new("order.xml")), DocumentFormat::Xml);
        assert_eq!(infer_format(Path::new("order")), DocumentFormat::Xml);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "flatdiff", "-vv", "run", "--source", "db", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run { source, format, .. } => {
                assert_eq!(source.map(SourceKind::from), Some(SourceKind::Database));
                assert_eq!(format.map(DocumentFormat::from), Some(DocumentFormat::Json));
            }
            Commands::Compare { .. } => panic!("expected run"),
        }
    }
}
