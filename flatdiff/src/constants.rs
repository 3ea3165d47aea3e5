//! Constants used throughout flatdiff.

/// Tags whose whole subtree is dropped while flattening.
///
/// These are envelope elements carrying routing and process metadata that
/// differ between any two systems.
pub const IGNORE_TAGS: [&str; 4] = [
    "ApplicationArea",
    "Process",
    "ActionCriteria",
    "ActionExpression",
];

/// Container tags addressed by their `name` attribute instead of position.
pub const NAMED_CONTAINER_TAGS: [&str; 2] = ["ProtocolData", "UserDataField"];

/// Attribute used for named-container addressing and name-based exclusion.
pub const NAME_ATTR: &str = "name";

/// Value reported for the side of a difference where nothing exists.
pub const ABSENT: &str = "-";

/// Identifier reported for text-content mismatches.
pub const TEXT_IDENTIFIER: &str = "(text)";

/// Accepted column names of the exclusion list, in lookup order.
pub const EXCLUSION_COLUMNS: [&str; 2] = ["attribute", "Attribute"];

/// Characters ending a namespace prefix (`{uri}local` or `prefix:local`).
pub const NAMESPACE_SEPARATORS: [char; 2] = ['}', ':'];
