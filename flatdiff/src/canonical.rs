//! Tag and attribute canonicalization.
//!
//! Two systems producing "the same" document rarely agree on every name.
//! A [`Canonicalizer`] maps raw tag and attribute names onto one shared
//! vocabulary before flattening, strips namespace prefixes and decides which
//! tags are dropped entirely. It is built once per run and only read after
//! that.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::{IGNORE_TAGS, NAMESPACE_SEPARATORS};

/// Removes a namespace prefix from a tag or attribute name.
///
/// Everything up to and including the last separator is removed, so both
/// `{urn:x}Order` and `ns0:Order` become `Order`. Names without a separator
/// are returned unchanged.
pub fn strip_namespace(name: &str) -> &str {
    match name.rfind(NAMESPACE_SEPARATORS) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Static lookup tables for canonical tag and attribute names.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    tags: FxHashMap<String, String>,
    attributes: FxHashMap<String, String>,
    ignore_tags: FxHashSet<String>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer with empty mapping tables and the default
    /// ignore set.
    pub fn new() -> Self {
        Canonicalizer {
            tags: FxHashMap::default(),
            attributes: FxHashMap::default(),
            ignore_tags: IGNORE_TAGS.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Replaces the tag mapping table.
    pub fn with_tag_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tags = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Replaces the attribute mapping table.
    pub fn with_attr_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Replaces the set of ignored canonical tags.
    pub fn with_ignore_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the canonical form of a tag name, or the name itself.
    pub fn canonical_tag<'a>(&'a self, name: &'a str) -> &'a str {
        self.tags.get(name).map_or(name, String::as_str)
    }

    /// Returns the canonical form of an attribute name, or the name itself.
    pub fn canonical_attr<'a>(&'a self, name: &'a str) -> &'a str {
        self.attributes.get(name).map_or(name, String::as_str)
    }

    /// Returns true if elements with this canonical tag are dropped along
    /// with their subtree.
    pub fn is_ignored(&self, canonical_tag: &str) -> bool {
        self.ignore_tags.contains(canonical_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_namespace_clark_notation() {
        assert_eq!(strip_namespace("{urn:oagis}SyncOrder"), "SyncOrder");
    }

    #[test]
    fn test_strip_namespace_prefix() {
        assert_eq!(strip_namespace("ns0:SyncOrder"), "SyncOrder");
        assert_eq!(strip_namespace("SyncOrder"), "SyncOrder");
    }

    #[test]
    fn test_strip_namespace_uses_last_separator() {
        assert_eq!(strip_namespace("{http://x.org/a}b"), "b");
    }

    #[test]
    fn test_identity_fallback() {
        let canon = Canonicalizer::new();
        assert_eq!(canon.canonical_tag("Order"), "Order");
        assert_eq!(canon.canonical_attr("id"), "id");
    }

    #[test]
    fn test_mapped_names() {
        let canon = Canonicalizer::new()
            .with_tag_map([("OrderHdr", "OrderHeader")])
            .with_attr_map([("Name", "name")]);
        assert_eq!(canon.canonical_tag("OrderHdr"), "OrderHeader");
        assert_eq!(canon.canonical_attr("Name"), "name");
        assert_eq!(canon.canonical_attr("name"), "name");
    }

    #[test]
    fn test_default_ignore_tags() {
        let canon = Canonicalizer::new();
        assert!(canon.is_ignored("ApplicationArea"));
        assert!(canon.is_ignored("ActionExpression"));
        assert!(!canon.is_ignored("DataArea"));
    }

    #[test]
    fn test_custom_ignore_tags() {
        let canon = Canonicalizer::new().with_ignore_tags(["Envelope"]);
        assert!(canon.is_ignored("Envelope"));
        assert!(!canon.is_ignored("Process"));
    }
}
