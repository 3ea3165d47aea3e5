//! XML parser that builds element trees.
//!
//! This parser uses quick-xml's streaming API. Element and attribute names
//! are kept as written (prefixes included); namespace declarations are not
//! reported as attributes. Line endings and attribute values are normalized
//! as an XML 1.0 processor does, so CRLF and LF copies of a document parse
//! to the same tree.

use std::borrow::Cow;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::node::{Attributes, XmlElement};

/// Parses XML from a string and returns the document element.
///
/// The text is already decoded, so any encoding in the XML declaration is
/// ignored.
pub fn parse_str(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    // Don't trim text - the flattener trims leading text itself
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;
    parse_reader(&mut reader)
}

/// Parses XML from raw bytes and returns the document element.
///
/// The byte order mark or the encoding named in the XML declaration selects
/// the decoder; UTF-8 is assumed otherwise.
pub fn parse_bytes(xml: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;
    parse_reader(&mut reader)
}

fn parse_reader<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<XmlElement> {
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let element = parse_element(e, reader)?;
                if stack.is_empty() && root.is_some() {
                    return Err(Error::Parse(
                        "content after the document element".to_string(),
                    ));
                }
                stack.push(element);
            }
            Ok(Event::End(_)) => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unexpected closing tag".to_string()))?;
                close_element(&mut stack, &mut root, finished);
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing tag - handle like Start + End
                let element = parse_element(e, reader)?;
                if stack.is_empty() && root.is_some() {
                    return Err(Error::Parse(
                        "content after the document element".to_string(),
                    ));
                }
                close_element(&mut stack, &mut root, element);
            }
            Ok(Event::Text(e)) => {
                let raw = decode(reader, e.as_ref())?;
                match stack.last_mut() {
                    Some(current) => {
                        let raw = normalize_line_endings(&raw);
                        let text = unescape(&raw).map_err(|e| Error::Parse(e.to_string()))?;
                        current.push_text(&text);
                    }
                    None if !raw.trim().is_empty() => {
                        return Err(Error::Parse(
                            "text outside the document element".to_string(),
                        ));
                    }
                    None => {}
                }
            }
            Ok(Event::CData(ref e)) => {
                // Treat CDATA like text
                let raw = decode(reader, e.as_ref())?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&normalize_line_endings(&raw));
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                let name = decode(reader, e.as_ref())?;
                let resolved = resolve_reference(&name)?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&resolved);
                }
            }
            Ok(Event::Eof) => break,
            Ok(Event::Comment(_)) | Ok(Event::Decl(_)) | Ok(Event::PI(_)) => {
                // Comments, the XML declaration and processing instructions
                // carry no comparable content
            }
            Ok(Event::DocType(_)) => {
                // Ignore DOCTYPE
            }
            Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::Parse(format!("unclosed element <{}>", open.qname())));
    }
    root.ok_or_else(|| Error::Parse("document has no root element".to_string()))
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.add_child(element),
        None => *root = Some(element),
    }
}

/// Parses an element's name and attributes.
fn parse_element<R>(e: &BytesStart, reader: &Reader<R>) -> Result<XmlElement> {
    let name = reader
        .decoder()
        .decode(e.name().as_ref())
        .map_err(|e| Error::Parse(e.to_string()))?
        .to_string();

    let mut attributes = Attributes::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();
        if is_namespace_decl(&key) {
            continue;
        }
        let raw = decode(reader, attr.value.as_ref())?;
        let raw = normalize_attribute_value(&raw);
        let value = unescape(&raw)
            .map_err(|e| Error::Parse(e.to_string()))?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(XmlElement::new(name, attributes))
}

/// Decodes raw event bytes with the document's encoding.
fn decode<'b, R>(reader: &Reader<R>, bytes: &'b [u8]) -> Result<Cow<'b, str>> {
    reader
        .decoder()
        .decode(bytes)
        .map_err(|e| Error::Parse(e.to_string()))
}

/// Turns `\r\n` and lone `\r` into `\n`.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Replaces literal tabs and line breaks in an attribute value with spaces.
///
/// Runs before references are resolved, so `&#10;` still yields a newline.
fn normalize_attribute_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        normalize_line_endings(value)
            .chars()
            .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
            .collect(),
    )
}

fn is_namespace_decl(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// Resolves a character reference (`#65`, `#x41`) or predefined entity.
fn resolve_reference(name: &str) -> Result<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse::<u32>(),
        }
        .map_err(|_| Error::Parse(format!("invalid character reference &{};", name)))?;
        return char::from_u32(code)
            .map(String::from)
            .ok_or_else(|| Error::Parse(format!("invalid character reference &{};", name)));
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| Error::Parse(format!("undefined entity &{};", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_xml() {
        let root = parse_str(r#"<root><child>text</child></root>"#).unwrap();
        assert_eq!(root.qname(), "root");
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.children()[0].qname(), "child");
        assert_eq!(root.children()[0].text(), "text");
    }

    #[test]
    fn test_parse_with_attributes() {
        let root = parse_str(r#"<root id="foo" class="bar">content</root>"#).unwrap();
        assert_eq!(root.attributes().get("id"), Some(&"foo".to_string()));
        assert_eq!(root.attributes().get("class"), Some(&"bar".to_string()));
        assert_eq!(root.text(), "content");
    }

    #[test]
    fn test_namespace_declarations_are_dropped() {
        let xml = r#"<ns0:root xmlns:ns0="urn:x" xmlns="urn:y" ns0:id="1"/>"#;
        let root = parse_str(xml).unwrap();
        assert_eq!(root.qname(), "ns0:root");
        assert_eq!(root.attributes().len(), 1);
        assert_eq!(root.attributes().get("ns0:id"), Some(&"1".to_string()));
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let root = parse_str("<root>  hello   world  </root>").unwrap();
        assert_eq!(root.text(), "  hello   world  ");
    }

    #[test]
    fn test_only_leading_text_is_kept() {
        let root = parse_str("<root>head<a/>tail</root>").unwrap();
        assert_eq!(root.text(), "head");
        assert_eq!(root.children()[0].text(), "");
    }

    #[test]
    fn test_entities_and_cdata() {
        let root = parse_str("<root>a &amp; b &#65;&#x42;<![CDATA[<c>]]></root>").unwrap();
        assert_eq!(root.text(), "a & b AB<c>");
    }

    #[test]
    fn test_comments_are_skipped() {
        let root = parse_str("<root>a<!-- note -->b</root>").unwrap();
        assert_eq!(root.text(), "ab");
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn test_declaration_is_ignored() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root/>";
        let root = parse_str(xml).unwrap();
        assert_eq!(root.qname(), "root");
    }

    #[test]
    fn test_nested_elements() {
        let root = parse_str("<a><b><c>deep</c></b></a>").unwrap();
        let c = &root.children()[0].children()[0];
        assert_eq!(c.qname(), "c");
        assert_eq!(c.text(), "deep");
    }

    #[test]
    fn test_mismatched_tags_fail() {
        assert!(matches!(parse_str("<a><b></a>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_unclosed_element_fails() {
        assert!(matches!(parse_str("<a><b></b>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_empty_document_fails() {
        assert!(matches!(parse_str("   "), Err(Error::Parse(_))));
    }

    #[test]
    fn test_second_root_fails() {
        assert!(matches!(parse_str("<a/><b/>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let root = parse_str("<root>line1\r\nline2\rline3<![CDATA[a\r\nb]]></root>").unwrap();
        assert_eq!(root.text(), "line1\nline2\nline3a\nb");
    }

    #[test]
    fn test_character_reference_keeps_carriage_return() {
        let root = parse_str("<root>a&#13;b</root>").unwrap();
        assert_eq!(root.text(), "a\rb");
    }

    #[test]
    fn test_attribute_whitespace_is_normalized() {
        let root = parse_str("<root v=\"a\nb\" w=\"c\r\nd\te\" x=\"f&#10;g\"/>").unwrap();
        assert_eq!(root.attributes().get("v"), Some(&"a b".to_string()));
        assert_eq!(root.attributes().get("w"), Some(&"c d e".to_string()));
        assert_eq!(root.attributes().get("x"), Some(&"f\ng".to_string()));
    }

    #[test]
    fn test_crlf_and_lf_documents_parse_alike() {
        let lf = parse_str("<root>\n  <a k=\"1\n2\">x\ny</a>\n</root>").unwrap();
        let crlf = parse_str("<root>\r\n  <a k=\"1\r\n2\">x\r\ny</a>\r\n</root>").unwrap();
        assert_eq!(lf, crlf);
    }

    #[test]
    fn test_parse_bytes_utf8() {
        let root = parse_bytes("<root>café</root>".as_bytes()).unwrap();
        assert_eq!(root.text(), "café");
    }

    #[test]
    fn test_parse_bytes_follows_declared_encoding() {
        let mut xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><root a=\"\xe9\">caf\xe9</root>".to_vec();
        let root = parse_bytes(&xml).unwrap();
        assert_eq!(root.text(), "café");
        assert_eq!(root.attributes().get("a"), Some(&"é".to_string()));

        // Without the declaration the same bytes are not UTF-8
        xml.drain(..xml.iter().position(|&b| b == b'>').unwrap() + 1);
        assert!(matches!(parse_bytes(&xml), Err(Error::Parse(_))));
    }
}
