//! XML parsing.
//!
//! Builds an owned [`XmlElement`](crate::node::XmlElement) tree from XML
//! text using quick-xml's streaming reader.

mod parser;

pub use parser::{parse_bytes, parse_str};
