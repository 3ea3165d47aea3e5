//! Batch comparison of document pairs.
//!
//! A [`Comparison`] bundles the read-only state shared by every pair of a
//! run: canonicalization tables, exclusion set and diff options. Pairs are
//! compared one after another; a pair whose documents are missing or
//! malformed is logged and skipped, while run-level failures (such as a lost
//! database connection) stop the run.

use serde_json::Value;
use tracing::{info, warn};

use crate::canonical::Canonicalizer;
use crate::diff::{diff_scalars, DiffOptions, DifferenceRecord, StructuralDiff};
use crate::error::{Error, Result};
use crate::exclusion::ExclusionSet;
use crate::flatten::{flatten_json, flatten_xml};
use crate::node::XmlElement;
use crate::report::PairDifference;
use crate::source::{DocumentFormat, DocumentPair, DocumentSource};
use crate::xml::parse_str;

/// A pair left out of the report, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedPair {
    /// The pair that was skipped.
    pub pair: DocumentPair,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Differences of all compared pairs, in pair-list order.
    pub rows: Vec<PairDifference>,
    /// Number of pairs compared.
    pub processed: usize,
    /// Pairs that could not be compared.
    pub skipped: Vec<SkippedPair>,
}

impl RunSummary {
    /// Number of pairs the run was given.
    pub fn total(&self) -> usize {
        self.processed + self.skipped.len()
    }
}

/// Shared, read-only state for comparing document pairs.
pub struct Comparison<'a> {
    canonicalizer: &'a Canonicalizer,
    exclusions: &'a ExclusionSet,
    options: DiffOptions,
}

impl<'a> Comparison<'a> {
    /// Creates a comparison with default diff options.
    pub fn new(canonicalizer: &'a Canonicalizer, exclusions: &'a ExclusionSet) -> Self {
        Self::with_options(canonicalizer, exclusions, DiffOptions::default())
    }

    /// Creates a comparison with the given diff options.
    pub fn with_options(
        canonicalizer: &'a Canonicalizer,
        exclusions: &'a ExclusionSet,
        options: DiffOptions,
    ) -> Self {
        Comparison {
            canonicalizer,
            exclusions,
            options,
        }
    }

    /// Compares two parsed XML documents.
    pub fn compare_xml(&self, left: &XmlElement, right: &XmlElement) -> Vec<DifferenceRecord> {
        let left = flatten_xml(left, self.canonicalizer);
        let right = flatten_xml(right, self.canonicalizer);
        StructuralDiff::with_options(self.exclusions, self.options).diff(&left, &right)
    }

    /// Parses and compares two XML texts.
    pub fn compare_xml_str(&self, left: &str, right: &str) -> Result<Vec<DifferenceRecord>> {
        let left = parse_str(left)?;
        let right = parse_str(right)?;
        Ok(self.compare_xml(&left, &right))
    }

    /// Compares two JSON values.
    ///
    /// Exclusions do not apply to JSON documents.
    pub fn compare_json_values(&self, left: &Value, right: &Value) -> Vec<DifferenceRecord> {
        diff_scalars(&flatten_json(left), &flatten_json(right))
    }

    /// Fetches, parses and compares the documents of one pair.
    pub fn compare_pair<S: DocumentSource + ?Sized>(
        &self,
        source: &mut S,
        format: DocumentFormat,
        pair: &DocumentPair,
    ) -> Result<Vec<DifferenceRecord>> {
        match format {
            DocumentFormat::Xml => {
                let left = source.fetch_xml(&pair.left)?;
                let right = source.fetch_xml(&pair.right)?;
                Ok(self.compare_xml(&left.parse()?, &right.parse()?))
            }
            DocumentFormat::Json => {
                let left = source.fetch_json(&pair.left)?;
                let right = source.fetch_json(&pair.right)?;
                Ok(self.compare_json_values(&left, &right))
            }
        }
    }

    /// Compares every pair in order.
    ///
    /// Pairs failing with a pair-local error are recorded in
    /// [`RunSummary::skipped`]; any other error aborts the run.
    pub fn run<S: DocumentSource + ?Sized>(
        &self,
        source: &mut S,
        format: DocumentFormat,
        pairs: &[DocumentPair],
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for pair in pairs {
            info!("Comparing {} <-> {}", pair.left, pair.right);
            match self.compare_pair(source, format, pair) {
                Ok(records) => {
                    info!("{} differences", records.len());
                    summary.processed += 1;
                    summary
                        .rows
                        .extend(records.into_iter().map(|record| PairDifference {
                            left_id: pair.left.clone(),
                            right_id: pair.right.clone(),
                            record,
                        }));
                }
                Err(e) if e.is_pair_local() || matches!(e, Error::Io(_)) => {
                    warn!("Skipping pair {} <-> {}: {}", pair.left, pair.right, e);
                    summary.skipped.push(SkippedPair {
                        pair: pair.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Compared {} of {} pairs ({} skipped)",
            summary.processed,
            summary.total(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}
