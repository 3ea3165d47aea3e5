//! Pair lists naming the documents to compare.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Names of the two required pair-list columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairColumns {
    /// Column holding the left document identifier.
    pub left: String,
    /// Column holding the right document identifier.
    pub right: String,
}

impl PairColumns {
    /// Creates a column pair.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        PairColumns {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Identifiers of two documents to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    /// Left document identifier.
    pub left: String,
    /// Right document identifier.
    pub right: String,
    /// Line of the pair list this pair was read from (header is line 1).
    pub row: usize,
}

impl DocumentPair {
    /// Creates a pair not tied to a pair-list line.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        DocumentPair {
            left: left.into(),
            right: right.into(),
            row: 0,
        }
    }
}

/// Loads document pairs from a CSV file.
///
/// A missing or empty file, or a header lacking either column, is a
/// configuration error. Rows with an empty identifier are skipped with a
/// warning.
pub fn load_pairs<P: AsRef<Path>>(path: P, columns: &PairColumns) -> Result<Vec<DocumentPair>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            Error::Configuration(format!("Input CSV file '{}' not found", path.display()))
        }
        _ => Error::Io(e),
    })?;
    read_pairs(file, columns, &path.display().to_string())
}

/// Reads document pairs from CSV data with a header row.
///
/// `origin` names the data in messages.
pub fn read_pairs<R: Read>(
    reader: R,
    columns: &PairColumns,
    origin: &str,
) -> Result<Vec<DocumentPair>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(Error::Configuration(format!(
            "CSV file '{}' is empty or not a valid CSV",
            origin
        )));
    }

    let position = |name: &str| headers.iter().position(|h| h == name);
    let (Some(left_idx), Some(right_idx)) = (position(&columns.left), position(&columns.right))
    else {
        return Err(Error::Configuration(format!(
            "CSV '{}' must have columns: {}, {}",
            origin, columns.left, columns.right
        )));
    };

    let mut pairs = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        // Blank lines are skipped by the reader, so ask it for the line
        let row = record
            .position()
            .map_or(index + 2, |pos| pos.line() as usize);
        let left = record.get(left_idx).unwrap_or_default();
        let right = record.get(right_idx).unwrap_or_default();
        if left.is_empty() || right.is_empty() {
            warn!(
                "Skipping row {} due to missing '{}' or '{}' in '{}'",
                row, columns.left, columns.right, origin
            );
            continue;
        }
        pairs.push(DocumentPair {
            left: left.to_string(),
            right: right.to_string(),
            row,
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> PairColumns {
        PairColumns::new("wcs_file", "micro_file")
    }

    #[test]
    fn test_reads_pairs() {
        let csv = "wcs_file,micro_file\nw1,m1\nw2,m2\n";
        let pairs = read_pairs(csv.as_bytes(), &columns(), "pairs.csv").unwrap();
        assert_eq!(
            pairs,
            vec![
                DocumentPair {
                    left: "w1".into(),
                    right: "m1".into(),
                    row: 2,
                },
                DocumentPair {
                    left: "w2".into(),
                    right: "m2".into(),
                    row: 3,
                },
            ]
        );
    }

    #[test]
    fn test_row_numbers_count_blank_lines() {
        let csv = "wcs_file,micro_file\n\nw1,m1\n\n\nw2,m2\n";
        let pairs = read_pairs(csv.as_bytes(), &columns(), "pairs.csv").unwrap();
        let rows: Vec<usize> = pairs.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![3, 6]);
    }

    #[test]
    fn test_extra_columns_and_order() {
        let csv = "note,micro_file,wcs_file\nx,m1,w1\n";
        let pairs = read_pairs(csv.as_bytes(), &columns(), "pairs.csv").unwrap();
        assert_eq!(pairs[0].left, "w1");
        assert_eq!(pairs[0].right, "m1");
    }

    #[test]
    fn test_rows_missing_a_value_are_skipped() {
        let csv = "wcs_file,micro_file\nw1,\n,m2\nw3,m3\nw4\n";
        let pairs = read_pairs(csv.as_bytes(), &columns(), "pairs.csv").unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left, "w3");
        assert_eq!(pairs[0].row, 4);
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let csv = "wcs_file,other\nw1,m1\n";
        let err = read_pairs(csv.as_bytes(), &columns(), "pairs.csv").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_empty_input_is_configuration_error() {
        let err = read_pairs("".as_bytes(), &columns(), "pairs.csv").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pairs(dir.path().join("absent.csv"), &columns()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
