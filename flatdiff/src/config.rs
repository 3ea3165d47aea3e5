//! Run configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file at all) describes the standard layout:
//!
//! ```toml
//! [paths]
//! document_dir = "xml_files"
//! exclusions = "ignore_attributes.csv"
//!
//! [canonical]
//! tags = { OrderHdr = "OrderHeader" }
//! attributes = { Name = "name" }
//!
//! [diff]
//! symmetric_attributes = false
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canonical::Canonicalizer;
use crate::constants::IGNORE_TAGS;
use crate::diff::DiffOptions;
use crate::error::{Error, Result};
use crate::exclusion::ExclusionSet;
use crate::report::ReportLayout;
use crate::source::{DocumentFormat, FileSource, PairColumns};

/// Where the documents of a run come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Files in the document directory.
    File,
    /// Rows fetched from the database.
    Database,
}

impl SourceKind {
    /// Short name used in default report file names.
    pub fn short_name(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Database => "db",
        }
    }
}

/// Complete configuration of a comparison run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Pair-list column names per source and format.
    pub columns: ColumnsConfig,
    /// Database connection and queries.
    pub database: DatabaseConfig,
    /// Canonicalization tables.
    pub canonical: CanonicalConfig,
    /// Comparison options.
    pub diff: DiffOptions,
    /// Report layout.
    pub report: ReportConfig,
}

impl Config {
    /// Reads a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                Error::Configuration(format!("config file '{}' not found", path.display()))
            }
            _ => Error::Io(e),
        })?;
        Self::from_toml(&text)
    }

    /// Reads a configuration file if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the canonicalizer described by the `[canonical]` section.
    pub fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::new()
            .with_tag_map(self.canonical.tags.clone())
            .with_attr_map(self.canonical.attributes.clone())
            .with_ignore_tags(self.canonical.ignore_tags.clone())
    }

    /// Loads the exclusion list; a missing or unreadable list excludes nothing.
    pub fn exclusions(&self, canonicalizer: &Canonicalizer) -> ExclusionSet {
        ExclusionSet::load(&self.paths.exclusions, canonicalizer)
    }

    /// File source over the document directory.
    pub fn file_source(&self) -> FileSource {
        FileSource::new(&self.paths.document_dir)
            .with_xml_extension(&self.paths.xml_extension)
            .with_json_extension(&self.paths.json_extension)
    }

    /// Returns the pair list for a source and format.
    pub fn pair_list(&self, source: SourceKind, format: DocumentFormat) -> &Path {
        match (source, format) {
            (SourceKind::File, DocumentFormat::Xml) => &self.paths.file_pairs_xml,
            (SourceKind::File, DocumentFormat::Json) => &self.paths.file_pairs_json,
            (SourceKind::Database, DocumentFormat::Xml) => &self.paths.db_pairs_xml,
            (SourceKind::Database, DocumentFormat::Json) => &self.paths.db_pairs_json,
        }
    }

    /// Returns the pair-list columns for a source and format.
    pub fn pair_columns(&self, source: SourceKind, format: DocumentFormat) -> &PairColumns {
        match (source, format) {
            (SourceKind::File, DocumentFormat::Xml) => &self.columns.file_xml,
            (SourceKind::File, DocumentFormat::Json) => &self.columns.file_json,
            (SourceKind::Database, _) => &self.columns.database,
        }
    }

    /// Default report path, e.g. `all_differences_file_xml.csv`.
    pub fn default_output(&self, source: SourceKind, format: DocumentFormat) -> PathBuf {
        self.paths.output_dir.join(format!(
            "all_differences_{}_{}.csv",
            source.short_name(),
            format
        ))
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding XML and JSON documents.
    pub document_dir: PathBuf,
    /// Extension appended to XML file identifiers (empty for none).
    pub xml_extension: String,
    /// Extension appended to JSON file identifiers (empty for none).
    pub json_extension: String,
    /// Exclusion list.
    pub exclusions: PathBuf,
    /// Pair list for XML files.
    pub file_pairs_xml: PathBuf,
    /// Pair list for JSON files.
    pub file_pairs_json: PathBuf,
    /// Pair list for XML database rows.
    pub db_pairs_xml: PathBuf,
    /// Pair list for JSON database rows.
    pub db_pairs_json: PathBuf,
    /// Directory default reports are written to.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            document_dir: PathBuf::from("xml_files"),
            xml_extension: "xml".to_string(),
            json_extension: String::new(),
            exclusions: PathBuf::from("ignore_attributes.csv"),
            file_pairs_xml: PathBuf::from("file_pairs_xml.csv"),
            file_pairs_json: PathBuf::from("file_pairs_json.csv"),
            db_pairs_xml: PathBuf::from("db_orders_xml.csv"),
            db_pairs_json: PathBuf::from("db_orders_json.csv"),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Pair-list column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Columns of the XML file pair list.
    pub file_xml: PairColumns,
    /// Columns of the JSON file pair list.
    pub file_json: PairColumns,
    /// Columns of both database pair lists.
    pub database: PairColumns,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        ColumnsConfig {
            file_xml: PairColumns::new("wcs_file", "micro_file"),
            file_json: PairColumns::new("wcs_json", "micro_json"),
            database: PairColumns::new("wcs_order_id", "micro_order_id"),
        }
    }
}

/// Database connection string and per-format queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// libpq-style connection string.
    pub url: String,
    /// Query returning the XML text for identifier `$1`.
    pub xml_query: String,
    /// Query returning the JSON document for identifier `$1`.
    pub json_query: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "host=localhost user=postgres dbname=orders".to_string(),
            xml_query: "SELECT xml_content FROM orders WHERE order_id::text = $1".to_string(),
            json_query: "SELECT json_content FROM orders_json WHERE order_id::text = $1"
                .to_string(),
        }
    }
}

/// Canonicalization tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalConfig {
    /// Raw tag name to canonical tag name.
    pub tags: BTreeMap<String, String>,
    /// Raw attribute name to canonical attribute name.
    pub attributes: BTreeMap<String, String>,
    /// Canonical tags dropped with their subtree.
    pub ignore_tags: Vec<String>,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        CanonicalConfig {
            tags: BTreeMap::new(),
            attributes: BTreeMap::new(),
            ignore_tags: IGNORE_TAGS.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Column layout of the report.
    pub layout: ReportLayout,
}
