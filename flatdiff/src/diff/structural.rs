//! Structural comparison of flattened XML documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::record::{DiffKind, DifferenceRecord};
use crate::constants::ABSENT;
use crate::exclusion::ExclusionSet;
use crate::flatten::{FlatDocument, FlatNode};

/// Options controlling the structural comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Also report attributes that only the right-hand element carries.
    ///
    /// Off by default: attributes are compared from the left element's point
    /// of view only.
    pub symmetric_attributes: bool,
}

/// Compares flattened XML documents under an exclusion set.
pub struct StructuralDiff<'a> {
    exclusions: &'a ExclusionSet,
    options: DiffOptions,
}

impl<'a> StructuralDiff<'a> {
    /// Creates a differ with default options.
    pub fn new(exclusions: &'a ExclusionSet) -> Self {
        Self::with_options(exclusions, DiffOptions::default())
    }

    /// Creates a differ with the given options.
    pub fn with_options(exclusions: &'a ExclusionSet, options: DiffOptions) -> Self {
        StructuralDiff {
            exclusions,
            options,
        }
    }

    /// Compares two flattened documents.
    ///
    /// Records for left paths come first, in left document order, followed
    /// by extra tags in right document order.
    pub fn diff(&self, left: &FlatDocument, right: &FlatDocument) -> Vec<DifferenceRecord> {
        let left = self.filter(left);
        let right = self.filter(right);
        let mut diffs = Vec::new();

        for (path, left_node) in &left {
            match right.get(path) {
                None => {
                    let identifier = self.identifier(left_node);
                    if let Some(identifier) = identifier {
                        diffs.push(DifferenceRecord::tag_missing(identifier, &left_node.text));
                    }
                }
                Some(right_node) => self.compare_nodes(left_node, right_node, &mut diffs),
            }
        }

        for (path, right_node) in &right {
            if left.contains_key(path) {
                continue;
            }
            if let Some(identifier) = self.identifier(right_node) {
                diffs.push(DifferenceRecord::extra_tag(identifier, &right_node.text));
            }
        }

        diffs
    }

    /// Drops excluded nodes, keeping document order.
    fn filter<'d>(&self, doc: &'d FlatDocument) -> IndexMap<&'d str, &'d FlatNode> {
        doc.iter()
            .filter(|(_, node)| !self.exclusions.should_exclude(node))
            .map(|(path, node)| (path.as_str(), node))
            .collect()
    }

    /// Name reported for an unmatched node, or `None` if it is excluded.
    ///
    /// The `name` attribute is preferred; otherwise the last path segment.
    fn identifier<'n>(&self, node: &'n FlatNode) -> Option<&'n str> {
        let identifier = node.name_attr().unwrap_or_else(|| node.last_segment());
        if self.exclusions.contains(identifier) || self.exclusions.contains(&node.tag) {
            None
        } else {
            Some(identifier)
        }
    }

    fn compare_nodes(&self, left: &FlatNode, right: &FlatNode, diffs: &mut Vec<DifferenceRecord>) {
        for (attr, left_value) in &left.attributes {
            if self.exclusions.contains(attr) {
                continue;
            }
            match right.attributes.get(attr) {
                None => diffs.push(DifferenceRecord::new(
                    attr,
                    DiffKind::AttributeMissing,
                    left_value,
                    ABSENT,
                )),
                Some(right_value) if right_value != left_value => {
                    diffs.push(DifferenceRecord::new(
                        attr,
                        DiffKind::AttributeMismatch,
                        left_value,
                        right_value,
                    ))
                }
                Some(_) => {}
            }
        }

        if self.options.symmetric_attributes {
            for (attr, right_value) in &right.attributes {
                if self.exclusions.contains(attr) || left.attributes.contains_key(attr) {
                    continue;
                }
                diffs.push(DifferenceRecord::new(
                    attr,
                    DiffKind::ExtraAttribute,
                    ABSENT,
                    right_value,
                ));
            }
        }

        if left.text != right.text {
            diffs.push(DifferenceRecord::text_mismatch(&left.text, &right.text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::Canonicalizer;
    use crate::flatten::flatten_xml;
    use crate::xml::parse_str;
    use pretty_assertions::assert_eq;

    fn flat(xml: &str) -> FlatDocument {
        flatten_xml(&parse_str(xml).unwrap(), &Canonicalizer::new())
    }

    fn diff(left: &str, right: &str, excluded: &[&str]) -> Vec<DifferenceRecord> {
        let exclusions = ExclusionSet::from_names(excluded, &Canonicalizer::new());
        StructuralDiff::new(&exclusions).diff(&flat(left), &flat(right))
    }

    #[test]
    fn test_identical_documents() {
        let xml = r#"<Root a="1"><Item name="A">1</Item><UserDataField name="k">v</UserDataField></Root>"#;
        assert!(diff(xml, xml, &[]).is_empty());
    }

    #[test]
    fn test_text_mismatch() {
        let diffs = diff(
            r#"<Root><Item name="A">1</Item></Root>"#,
            r#"<Root><Item name="A">2</Item></Root>"#,
            &[],
        );
        assert_eq!(diffs, vec![DifferenceRecord::text_mismatch("1", "2")]);
    }

    #[test]
    fn test_tag_missing_uses_name_attribute() {
        let diffs = diff(
            r#"<Root><Item name="A">1</Item><Item name="B">x</Item></Root>"#,
            r#"<Root><Item name="A">2</Item></Root>"#,
            &[],
        );
        assert_eq!(
            diffs,
            vec![
                DifferenceRecord::text_mismatch("1", "2"),
                DifferenceRecord::tag_missing("B", "x"),
            ]
        );
    }

    #[test]
    fn test_unnamed_nodes_use_last_segment() {
        let diffs = diff("<Root><A/></Root>", "<Root><A/><A>t</A></Root>", &[]);
        assert_eq!(diffs, vec![DifferenceRecord::extra_tag("A[2]", "t")]);
    }

    #[test]
    fn test_left_exclusive_records_come_first() {
        let diffs = diff("<Root><L>l</L></Root>", "<Root><R>r</R></Root>", &[]);
        assert_eq!(
            diffs,
            vec![
                DifferenceRecord::tag_missing("L[1]", "l"),
                DifferenceRecord::extra_tag("R[1]", "r"),
            ]
        );
    }

    #[test]
    fn test_attribute_mismatch_and_missing() {
        let diffs = diff(
            r#"<Root><A x="1" y="2"/></Root>"#,
            r#"<Root><A x="9"/></Root>"#,
            &[],
        );
        assert_eq!(
            diffs,
            vec![
                DifferenceRecord::new("x", DiffKind::AttributeMismatch, "1", "9"),
                DifferenceRecord::new("y", DiffKind::AttributeMissing, "2", "-"),
            ]
        );
    }

    #[test]
    fn test_right_only_attribute_is_not_reported_by_default() {
        let diffs = diff(r#"<Root><A/></Root>"#, r#"<Root><A extra="1"/></Root>"#, &[]);
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_symmetric_attributes() {
        let exclusions = ExclusionSet::new();
        let options = DiffOptions {
            symmetric_attributes: true,
        };
        let diffs = StructuralDiff::with_options(&exclusions, options).diff(
            &flat(r#"<Root><A/></Root>"#),
            &flat(r#"<Root><A extra="1"/></Root>"#),
        );
        assert_eq!(
            diffs,
            vec![DifferenceRecord::new("extra", DiffKind::ExtraAttribute, "-", "1")]
        );
    }

    #[test]
    fn test_excluded_attributes_never_reported() {
        let diffs = diff(
            r#"<Root><A stamp="1" gone="x"/></Root>"#,
            r#"<Root><A stamp="2"/></Root>"#,
            &["stamp", "gone"],
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_excluded_attributes_with_symmetric_option() {
        let exclusions = ExclusionSet::from_names(["stamp"], &Canonicalizer::new());
        let options = DiffOptions {
            symmetric_attributes: true,
        };
        let diffs = StructuralDiff::with_options(&exclusions, options).diff(
            &flat("<Root><A/></Root>"),
            &flat(r#"<Root><A stamp="2"/></Root>"#),
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_excluded_tag_is_not_compared() {
        let diffs = diff(
            "<Root><Timestamp>2023</Timestamp></Root>",
            "<Root><Timestamp>2024</Timestamp></Root>",
            &["Timestamp"],
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_excluded_name_drops_whole_node() {
        let diffs = diff(
            r#"<Root><UserDataField name="Timestamp">1</UserDataField></Root>"#,
            "<Root/>",
            &["Timestamp"],
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_excluded_identifier_is_not_reported_missing() {
        // The last segment "A[2]" is excluded by name, not by tag
        let diffs = diff("<Root><A/><A/></Root>", "<Root><A/></Root>", &["A[2]"]);
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_reordered_named_containers() {
        let diffs = diff(
            r#"<Root><UserDataField name="a">1</UserDataField><UserDataField name="b">2</UserDataField></Root>"#,
            r#"<Root><UserDataField name="b">2</UserDataField><UserDataField name="a">1</UserDataField></Root>"#,
            &[],
        );
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_ignored_tags_produce_no_records() {
        let diffs = diff(
            "<Root><ApplicationArea><CreationDateTime>1</CreationDateTime></ApplicationArea></Root>",
            "<Root><ApplicationArea><CreationDateTime>2</CreationDateTime><Extra/></ApplicationArea></Root>",
            &[],
        );
        assert!(diffs.is_empty());
    }
}
