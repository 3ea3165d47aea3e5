//! Document sources and pair lists.
//!
//! A [`DocumentSource`] turns a document identifier into raw XML text or a
//! JSON value. Identifiers come in pairs from a CSV list (see
//! [`load_pairs`]).

#[cfg(feature = "database")]
mod database;
mod file;
mod pairs;

#[cfg(feature = "database")]
pub use database::DatabaseSource;
pub use file::FileSource;
pub use pairs::{load_pairs, read_pairs, DocumentPair, PairColumns};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::node::XmlElement;
use crate::xml::{parse_bytes, parse_str};

/// Format of the documents being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// XML documents, compared structurally.
    Xml,
    /// JSON documents, compared leaf by leaf.
    Json,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Xml => f.write_str("xml"),
            DocumentFormat::Json => f.write_str("json"),
        }
    }
}

/// An XML document as delivered by a source.
///
/// Files arrive as bytes and are decoded according to their XML declaration;
/// database columns arrive as already decoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawXml {
    /// Decoded text; any declared encoding is ignored.
    Text(String),
    /// Undecoded bytes.
    Bytes(Vec<u8>),
}

impl RawXml {
    /// Parses the document into an element tree.
    pub fn parse(&self) -> Result<XmlElement> {
        match self {
            RawXml::Text(text) => parse_str(text),
            RawXml::Bytes(bytes) => parse_bytes(bytes),
        }
    }
}

/// A JSON document as delivered by a source.
///
/// Database drivers hand back either the column text or an already decoded
/// value, depending on the column type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawJson {
    /// Undecoded JSON text.
    Text(String),
    /// A decoded JSON value.
    Decoded(Value),
}

impl RawJson {
    /// Normalizes to a decoded value, parsing text if necessary.
    pub fn into_value(self) -> Result<Value> {
        match self {
            RawJson::Text(text) => Ok(serde_json::from_str(&text)?),
            RawJson::Decoded(value) => Ok(value),
        }
    }
}

/// Supplies documents by identifier.
pub trait DocumentSource {
    /// Fetches the raw XML of a document.
    fn fetch_xml(&mut self, id: &str) -> Result<RawXml>;

    /// Fetches a JSON document in whatever form the source holds it.
    fn fetch_raw_json(&mut self, id: &str) -> Result<RawJson>;

    /// Fetches a JSON document and decodes it.
    fn fetch_json(&mut self, id: &str) -> Result<Value> {
        self.fetch_raw_json(id)?.into_value()
    }
}
