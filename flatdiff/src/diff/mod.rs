//! Comparison of flattened documents.
//!
//! The structural differ compares two flattened XML documents node by node
//! under an exclusion set; the scalar differ compares two flattened JSON
//! documents value by value. Both produce [`DifferenceRecord`]s in a stable
//! order.

mod record;
mod scalar;
mod structural;

pub use record::{DiffKind, DifferenceRecord};
pub use scalar::diff_scalars;
pub use structural::{DiffOptions, StructuralDiff};
