//! Element tree for parsed XML documents.
//!
//! The parser produces an owned tree of [`XmlElement`]s. Only what the
//! flattener needs is kept: the qualified name, attributes in document
//! order, the leading text and the child elements. Comments, processing
//! instructions and text following a child element are not represented.

mod xml_content;

pub use xml_content::{Attributes, XmlElement};
