//! flatdiff - Batch comparison of XML and JSON document pairs
//!
//! This library compares pairs of documents that are supposed to describe
//! the same business entity and reports their differences as CSV rows.
//!
//! # Overview
//!
//! XML documents are parsed into element trees, names are canonicalized,
//! and each tree is flattened into a map keyed by a positional path such as
//! `/Root[1]/Order[1]/UserDataField[@name='Region']`. Two flattened
//! documents are then compared path by path: missing and extra tags,
//! attribute and text differences. Tags and attributes listed in an
//! exclusion file are never reported.
//!
//! JSON documents are flattened into `a.b[0].c` style keys and compared
//! value by value.
//!
//! # Key Features
//!
//! - Namespace-insensitive, order-tolerant matching of named containers
//! - Configurable canonicalization of tag and attribute names
//! - File system and (with the `database` feature) PostgreSQL sources
//! - A malformed or missing document skips only its own pair

pub mod batch;
pub mod canonical;
pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod exclusion;
pub mod flatten;
pub mod node;
pub mod report;
pub mod source;
pub mod xml;

// Re-export commonly used types
pub use batch::{Comparison, RunSummary, SkippedPair};
pub use canonical::{strip_namespace, Canonicalizer};
pub use config::{Config, SourceKind};
pub use constants::*;
pub use error::{Error, Result};
pub use exclusion::ExclusionSet;
pub use flatten::{flatten_json, flatten_xml, FlatDocument, FlatNode, FlatScalars};
pub use node::{Attributes, XmlElement};
pub use report::{write_report, PairDifference, ReportLayout, ReportWriter};
pub use xml::{parse_bytes, parse_str};

// Re-export diff types
pub use diff::{diff_scalars, DiffKind, DiffOptions, DifferenceRecord, StructuralDiff};

// Re-export source types
#[cfg(feature = "database")]
pub use source::DatabaseSource;
pub use source::{
    load_pairs, DocumentFormat, DocumentPair, DocumentSource, FileSource, PairColumns, RawJson,
    RawXml,
};
