//! Exclusion of tags, named blocks and attributes from comparison.
//!
//! The exclusion list is a CSV file with an `attribute` (or `Attribute`)
//! column. Each entry is canonicalized like an attribute name, and the same
//! set is consulted for tags, for `name` attribute values and for attribute
//! names.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::canonical::Canonicalizer;
use crate::constants::EXCLUSION_COLUMNS;
use crate::error::Result;
use crate::flatten::FlatNode;

/// Canonical names ignored during XML comparison.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    names: FxHashSet<String>,
}

impl ExclusionSet {
    /// Creates an empty exclusion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an exclusion set from names, canonicalizing each one.
    pub fn from_names<I, S>(names: I, canonicalizer: &Canonicalizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .map(|n| canonicalizer.canonical_attr(&n).to_string())
            .collect();
        ExclusionSet { names }
    }

    /// Loads the exclusion list from a CSV file.
    ///
    /// A missing or unreadable file is not fatal: a warning is logged and
    /// an empty set returned.
    pub fn load<P: AsRef<Path>>(path: P, canonicalizer: &Canonicalizer) -> Self {
        let path = path.as_ref();
        let set = match File::open(path) {
            Ok(file) => match Self::from_reader(file, canonicalizer) {
                Ok(set) => set,
                Err(e) => {
                    warn!("Error loading excluded attributes from {}: {}", path.display(), e);
                    Self::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Attribute-exclusion file not found: {}", path.display());
                Self::new()
            }
            Err(e) => {
                warn!("Cannot open attribute-exclusion file {}: {}", path.display(), e);
                Self::new()
            }
        };
        info!("Loaded {} excluded attributes", set.len());
        set
    }

    /// Reads exclusion entries from CSV data with a header row.
    ///
    /// Rows that fail to parse are skipped with a warning. Data without a
    /// recognized column yields an empty set.
    pub fn from_reader<R: Read>(reader: R, canonicalizer: &Canonicalizer) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let Some(column) = EXCLUSION_COLUMNS
            .iter()
            .find_map(|name| headers.iter().position(|h| h == *name))
        else {
            warn!(
                "Exclusion list has no {} column",
                EXCLUSION_COLUMNS.join("/")
            );
            return Ok(Self::new());
        };

        let mut names = FxHashSet::default();
        for (row, record) in rdr.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping exclusion row {}: {}", row + 2, e);
                    continue;
                }
            };
            let Some(value) = record.get(column).map(str::trim) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let name = canonicalizer.canonical_attr(value).to_string();
            debug!("Excluded attribute loaded: '{}'", name);
            names.insert(name);
        }
        Ok(ExclusionSet { names })
    }

    /// Returns true if the canonical name is excluded.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of excluded names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if a flattened node must be dropped from comparison.
    ///
    /// A node is dropped when its canonical tag is excluded, or when its
    /// `name` attribute holds an excluded name.
    pub fn should_exclude(&self, node: &FlatNode) -> bool {
        self.contains(&node.tag) || node.name_attr().is_some_and(|name| self.contains(name))
    }
}
