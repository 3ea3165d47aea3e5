//! Flattening of document trees into path-keyed maps.
//!
//! Both flatteners turn a nested document into an ordered map whose keys are
//! unique, reproducible addresses. Two documents are then compared key by
//! key, independent of how their trees were shaped.

mod json;
mod xml;

pub use json::{flatten_json, FlatScalars};
pub use xml::{flatten_xml, FlatDocument, FlatNode};
