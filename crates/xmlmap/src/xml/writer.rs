//! XML writer: serializes a [`Document`] through `quick-xml`

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::xml::model::{Document, Element, Node};

/// Serialize a document, starting with a `<?xml version="1.0"?>` line
///
/// The output ends with a line feed. Use [`strip_declaration`] to drop the
/// first line.
pub fn to_string(doc: &Document) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(Error::serialize)?;
    writer.get_mut().push(b'\n');

    write_element(&mut writer, &doc.root)?;
    writer.get_mut().push(b'\n');

    String::from_utf8(writer.into_inner()).map_err(Error::serialize)
}

/// Remove a leading `<?xml ...?>` line, including its line feed
pub fn strip_declaration(xml: &str) -> &str {
    let Some(rest) = xml.strip_prefix("<?xml") else {
        return xml;
    };
    match rest.find('>') {
        Some(end) if end > 0 => {
            let after = rest.get(end + 1..).unwrap_or_default();
            after.strip_prefix('\n').unwrap_or(after)
        }
        _ => xml,
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        let value = escape_attribute(value);
        start.push_attribute((name.as_bytes(), value.as_bytes()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(Error::serialize);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(Error::serialize)?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(Error::serialize)?,
            Node::CData(text) => write_cdata(writer, text)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(Error::serialize)
}

/// Markup escapes plus character references for tab, LF and CR, which
/// parsers would otherwise normalize to spaces
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\t', "&#9;")
            .replace('\n', "&#10;")
            .replace('\r', "&#13;"),
    )
}

/// A CDATA section cannot contain `]]>`, so such content is split across
/// adjacent sections at that point
fn write_cdata(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        let (head, tail) = rest.split_at(pos + 2);
        writer
            .write_event(Event::CData(BytesCData::new(head)))
            .map_err(Error::serialize)?;
        rest = tail;
    }
    writer
        .write_event(Event::CData(BytesCData::new(rest)))
        .map_err(Error::serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::reader::Parser;

    fn sample() -> Result<Document> {
        let mut root = Element::new("root")?;
        let mut item = Element::new("item")?;
        item.set_attribute("name", "a \"quoted\" & <tagged>")?;
        item.push_text("1 < 2 & 3");
        root.push_element(item);
        let mut raw = Element::new("raw")?;
        raw.push_cdata("<b>bold</b>");
        root.push_element(raw);
        root.push_element(Element::new("empty")?);
        Ok(Document { root })
    }

    #[test]
    fn test_declaration_line() -> Result<()> {
        let xml = to_string(&Document { root: Element::new("root")? })?;
        assert_eq!(xml, "<?xml version=\"1.0\"?>\n<root/>\n");
        assert_eq!(strip_declaration(&xml), "<root/>\n");
        Ok(())
    }

    #[test]
    fn test_attribute_whitespace_uses_char_refs() -> Result<()> {
        let mut root = Element::new("root")?;
        root.set_attribute("note", "a\nb\tc\r<d>")?;
        let doc = Document { root };
        let xml = to_string(&doc)?;
        assert!(xml.contains("note=\"a&#10;b&#9;c&#13;&lt;d&gt;\""));
        assert_eq!(Parser::new(&xml).parse()?, doc);
        Ok(())
    }

    #[test]
    fn test_escaping_and_cdata() -> Result<()> {
        let xml = strip_declaration(&to_string(&sample()?)?).to_string();
        assert!(xml.contains("<raw><![CDATA[<b>bold</b>]]></raw>"));
        assert!(xml.contains("<empty/>"));
        assert!(!xml.contains("1 < 2"));
        Ok(())
    }

    #[test]
    fn test_output_reparses_to_same_tree() -> Result<()> {
        let doc = sample()?;
        let xml = to_string(&doc)?;
        assert_eq!(Parser::new(&xml).parse()?, doc);
        Ok(())
    }

    #[test]
    fn test_cdata_terminator_is_split() -> Result<()> {
        let mut root = Element::new("root")?;
        root.push_cdata("a]]>b");
        let xml = to_string(&Document { root })?;
        assert_eq!(strip_declaration(&xml), "<root><![CDATA[a]]]]><![CDATA[>b]]></root>\n");
        Ok(())
    }

    #[test]
    fn test_strip_declaration() {
        assert_eq!(
            strip_declaration("<?xml version=\"1.0\"?>\n<root/>\n"),
            "<root/>\n"
        );
        assert_eq!(strip_declaration("<?xml version=\"1.0\"?><root/>"), "<root/>");
        assert_eq!(strip_declaration("<root/>\n"), "<root/>\n");
        assert_eq!(strip_declaration("<?xml>rest"), "<?xml>rest");
    }
}
