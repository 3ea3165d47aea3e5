//! Value comparison of flattened JSON documents.

use super::record::{DiffKind, DifferenceRecord};
use crate::constants::ABSENT;
use crate::flatten::FlatScalars;

/// Compares two flattened JSON documents key by key.
///
/// Keys are visited in left document order, then right-only keys in right
/// document order. A key missing on one side is a `MissingKey` record with
/// `-` for the absent value; a key on both sides with different text is a
/// `ValueMismatch`.
pub fn diff_scalars(left: &FlatScalars, right: &FlatScalars) -> Vec<DifferenceRecord> {
    let right_only = right.keys().filter(|key| !left.contains_key(*key));
    let mut diffs = Vec::new();

    for key in left.keys().chain(right_only) {
        let left_value = left.get(key);
        let right_value = right.get(key);
        if left_value == right_value {
            continue;
        }
        let kind = if left_value.is_some() && right_value.is_some() {
            DiffKind::ValueMismatch
        } else {
            DiffKind::MissingKey
        };
        diffs.push(DifferenceRecord::new(
            key,
            kind,
            left_value.map_or(ABSENT, String::as_str),
            right_value.map_or(ABSENT, String::as_str),
        ));
    }

    diffs
}
