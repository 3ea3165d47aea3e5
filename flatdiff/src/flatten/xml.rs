//! XML element tree flattening.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::canonical::{strip_namespace, Canonicalizer};
use crate::constants::{NAMED_CONTAINER_TAGS, NAME_ATTR};
use crate::node::{Attributes, XmlElement};

/// One element of a flattened XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    /// Unique address of the element within its document.
    pub path: String,
    /// Attributes keyed by canonical name, values unchanged.
    pub attributes: Attributes,
    /// Leading text, trimmed.
    pub text: String,
    /// Canonical tag name.
    pub tag: String,
}

impl FlatNode {
    /// Returns the value of the `name` attribute, if present.
    pub fn name_attr(&self) -> Option<&str> {
        self.attributes.get(NAME_ATTR).map(String::as_str)
    }

    /// Returns the last segment of the path, e.g. `Item[2]`.
    pub fn last_segment(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A flattened XML document: path to node, in document order.
pub type FlatDocument = IndexMap<String, FlatNode>;

/// Flattens an element tree into a path-keyed map.
///
/// Paths are built as `parent/Tag[n]`, where `n` counts same-tag siblings
/// under one parent starting at 1. Named containers carrying a non-empty
/// `name` attribute are addressed as `parent/Tag[@name='value']` instead and
/// do not advance the sibling count. Ignored tags are dropped together with
/// their subtree.
pub fn flatten_xml(root: &XmlElement, canonicalizer: &Canonicalizer) -> FlatDocument {
    let mut nodes = FlatDocument::new();
    let mut siblings = FxHashMap::default();
    visit(root, "", &mut siblings, canonicalizer, &mut nodes);
    nodes
}

fn visit(
    element: &XmlElement,
    parent_path: &str,
    siblings: &mut FxHashMap<String, usize>,
    canonicalizer: &Canonicalizer,
    nodes: &mut FlatDocument,
) {
    let tag = canonicalizer
        .canonical_tag(strip_namespace(element.qname()))
        .to_string();
    if canonicalizer.is_ignored(&tag) {
        trace!("Ignoring tag: {}", tag);
        return;
    }

    let attributes: Attributes = element
        .attributes()
        .iter()
        .map(|(key, value)| {
            let key = canonicalizer.canonical_attr(strip_namespace(key));
            (key.to_string(), value.clone())
        })
        .collect();

    let path = match attributes.get(NAME_ATTR) {
        Some(name) if !name.is_empty() && NAMED_CONTAINER_TAGS.contains(&tag.as_str()) => {
            format!("{}/{}[@name='{}']", parent_path, tag, name)
        }
        _ => {
            let index = siblings.entry(tag.clone()).or_insert(0);
            *index += 1;
            format!("{}/{}[{}]", parent_path, tag, index)
        }
    };

    let node = FlatNode {
        path: path.clone(),
        attributes,
        text: element.text().trim().to_string(),
        tag,
    };
    if nodes.insert(path.clone(), node).is_some() {
        debug!("Duplicate path {}, keeping the later element", path);
    }

    let mut child_siblings = FxHashMap::default();
    for child in element.children() {
        visit(child, &path, &mut child_siblings, canonicalizer, nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    fn flatten(xml: &str) -> FlatDocument {
        flatten_xml(&parse_str(xml).unwrap(), &Canonicalizer::new())
    }

    fn paths(doc: &FlatDocument) -> Vec<&str> {
        doc.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_root_path() {
        let doc = flatten("<Order/>");
        assert_eq!(paths(&doc), vec!["/Order[1]"]);
    }

    #[test]
    fn test_sibling_indexing() {
        let doc = flatten("<Root><Line/><Line/><Line/></Root>");
        assert_eq!(
            paths(&doc),
            vec!["/Root[1]", "/Root[1]/Line[1]", "/Root[1]/Line[2]", "/Root[1]/Line[3]"]
        );
    }

    #[test]
    fn test_counter_is_scoped_per_parent() {
        let doc = flatten("<Root><A><B/></A><A><B/><B/></A></Root>");
        assert_eq!(
            paths(&doc),
            vec![
                "/Root[1]",
                "/Root[1]/A[1]",
                "/Root[1]/A[1]/B[1]",
                "/Root[1]/A[2]",
                "/Root[1]/A[2]/B[1]",
                "/Root[1]/A[2]/B[2]",
            ]
        );
    }

    #[test]
    fn test_named_container_addressing() {
        let doc = flatten(
            r#"<Root><UserDataField name="color">red</UserDataField><UserDataField name="size">L</UserDataField></Root>"#,
        );
        assert!(doc.contains_key("/Root[1]/UserDataField[@name='color']"));
        assert!(doc.contains_key("/Root[1]/UserDataField[@name='size']"));
    }

    #[test]
    fn test_named_container_does_not_advance_counter() {
        let doc = flatten(
            r#"<Root><ProtocolData name="a"/><ProtocolData/><ProtocolData name=""/></Root>"#,
        );
        assert_eq!(
            paths(&doc),
            vec![
                "/Root[1]",
                "/Root[1]/ProtocolData[@name='a']",
                "/Root[1]/ProtocolData[1]",
                "/Root[1]/ProtocolData[2]",
            ]
        );
    }

    #[test]
    fn test_duplicate_named_containers_keep_the_later() {
        let doc = flatten(
            r#"<Root><UserDataField name="k" v="1">first</UserDataField><Other/><UserDataField name="k" v="2">second</UserDataField></Root>"#,
        );
        assert_eq!(
            paths(&doc),
            vec!["/Root[1]", "/Root[1]/UserDataField[@name='k']", "/Root[1]/Other[1]"]
        );
        let node = &doc["/Root[1]/UserDataField[@name='k']"];
        assert_eq!(node.text, "second");
        assert_eq!(node.attributes.get("v"), Some(&"2".to_string()));
    }

    #[test]
    fn test_name_attribute_on_other_tags_uses_index() {
        let doc = flatten(r#"<Root><Item name="A"/></Root>"#);
        assert!(doc.contains_key("/Root[1]/Item[1]"));
    }

    #[test]
    fn test_ignored_subtree_is_dropped() {
        let doc = flatten(
            "<Root><ApplicationArea><Sender>x</Sender></ApplicationArea><Data>1</Data></Root>",
        );
        assert_eq!(paths(&doc), vec!["/Root[1]", "/Root[1]/Data[1]"]);
    }

    #[test]
    fn test_namespaces_are_stripped() {
        let doc = flatten(r#"<ns0:Root xmlns:ns0="urn:x"><ns0:Item xsi:type="t"/></ns0:Root>"#);
        let item = &doc["/Root[1]/Item[1]"];
        assert_eq!(item.tag, "Item");
        assert_eq!(item.attributes.get("type"), Some(&"t".to_string()));
    }

    #[test]
    fn test_canonical_names() {
        let canon = Canonicalizer::new()
            .with_tag_map([("Ln", "Line")])
            .with_attr_map([("Name", "name")]);
        let root = parse_str(r#"<Root><Ln Name="x">v</Ln></Root>"#).unwrap();
        let doc = flatten_xml(&root, &canon);
        let line = &doc["/Root[1]/Line[1]"];
        assert_eq!(line.tag, "Line");
        assert_eq!(line.name_attr(), Some("x"));
        assert_eq!(line.text, "v");
    }

    #[test]
    fn test_text_is_trimmed() {
        let doc = flatten("<Root>\n   value  \n</Root>");
        assert_eq!(doc["/Root[1]"].text, "value");
    }

    #[test]
    fn test_flattening_is_deterministic() {
        let xml = r#"<Root><A x="1">t</A><B/><A/><UserDataField name="k"/></Root>"#;
        let root = parse_str(xml).unwrap();
        let canon = Canonicalizer::new();
        assert_eq!(flatten_xml(&root, &canon), flatten_xml(&root, &canon));
    }

    #[test]
    fn test_paths_match_nodes() {
        let doc = flatten("<Root><A/><A><B/></A></Root>");
        for (path, node) in &doc {
            assert_eq!(path, &node.path);
        }
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_last_segment() {
        let doc = flatten("<Root><A/><A/></Root>");
        assert_eq!(doc["/Root[1]/A[2]"].last_segment(), "A[2]");
    }
}
