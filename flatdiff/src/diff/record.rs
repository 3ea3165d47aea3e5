//! Difference records.
//!
//! Represents the individual divergences reported for a document pair.

use std::fmt;

use crate::constants::{ABSENT, TEXT_IDENTIFIER};

/// Kinds of differences between two documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// Element present on the left only.
    TagMissing,
    /// Attribute of a matched element present on the left only.
    AttributeMissing,
    /// Attribute present on both sides with different values.
    AttributeMismatch,
    /// Leading text of a matched element differs.
    TextMismatch,
    /// Element present on the right only.
    ExtraTag,
    /// Attribute of a matched element present on the right only.
    ///
    /// Only reported when symmetric attribute comparison is enabled.
    ExtraAttribute,
    /// JSON leaf present on both sides with different values.
    ValueMismatch,
    /// JSON leaf present on one side only.
    MissingKey,
}

impl DiffKind {
    /// Returns the label written to reports.
    pub fn label(&self) -> &'static str {
        match self {
            DiffKind::TagMissing => "Tag missing",
            DiffKind::AttributeMissing => "Attribute missing",
            DiffKind::AttributeMismatch => "Attribute mismatch",
            DiffKind::TextMismatch => "Text mismatch",
            DiffKind::ExtraTag => "Extra tag",
            DiffKind::ExtraAttribute => "Extra attribute",
            DiffKind::ValueMismatch => "Value mismatch",
            DiffKind::MissingKey => "Missing key",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single difference between the left and right document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceRecord {
    /// Attribute or tag name, JSON path, or `(text)`.
    pub identifier: String,
    /// The kind of difference.
    pub kind: DiffKind,
    /// Value on the left side, `-` when absent.
    pub left: String,
    /// Value on the right side, `-` when absent.
    pub right: String,
}

impl DifferenceRecord {
    /// Creates a new difference record.
    pub fn new(
        identifier: impl Into<String>,
        kind: DiffKind,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        DifferenceRecord {
            identifier: identifier.into(),
            kind,
            left: left.into(),
            right: right.into(),
        }
    }

    /// Creates a tag-missing record.
    pub fn tag_missing(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(identifier, DiffKind::TagMissing, text, ABSENT)
    }

    /// Creates an extra-tag record.
    pub fn extra_tag(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(identifier, DiffKind::ExtraTag, ABSENT, text)
    }

    /// Creates a text-mismatch record.
    pub fn text_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(TEXT_IDENTIFIER, DiffKind::TextMismatch, left, right)
    }
}

impl fmt::Display for DifferenceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({} -> {})",
            self.identifier, self.kind, self.left, self.right
        )
    }
}
