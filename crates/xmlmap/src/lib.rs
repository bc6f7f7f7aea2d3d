//! xmlmap - XML to key-value tree codec
//!
//! Elements become mapping entries keyed by tag name, repeated siblings become
//! sequences, and a handful of reserved keys carry what plain maps cannot:
//! `@attributes`, `@content`, `@@content` (CDATA) and `@root`.
//!
//! # Quick Start
//!
//! ```
//! use xmlmap::{from_xml, to_xml, Value, ROOT};
//! # fn main() -> Result<(), xmlmap::Error> {
//! let map = from_xml(r#"<shelf><book id="1">Dune</book><book>Emma</book></shelf>"#)?;
//! assert_eq!(map.get(ROOT).and_then(Value::as_scalar), Some("shelf"));
//! assert_eq!(map.get("book").and_then(Value::as_sequence).map(|s| s.len()), Some(2));
//!
//! let xml = to_xml(&Value::Mapping(map), "shelf")?;
//! assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<shelf>"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::{debug, instrument};

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod value;
pub use value::{Mapping, Sequence, Value, ATTRIBUTES, CDATA, CONTENT, ROOT};

pub mod xml;
pub use xml::{
    Config as ParseConfig, Document as XmlDocument, Element as XmlElement, Node as XmlNode,
    Parser as XmlParser,
};

pub mod decode;
pub mod encode;
pub use encode::Config as EncodeConfig;

pub mod format;
pub use format::beautify;

/// Convert a mapping to an XML document string with a declaration line
pub fn to_xml(value: &Value, root_name: &str) -> Result<String> {
    to_xml_with_config(value, &EncodeConfig::new(root_name))
}

/// Convert a mapping to an XML document string
#[instrument(skip_all, fields(root = %config.root_name))]
pub fn to_xml_with_config(value: &Value, config: &EncodeConfig) -> Result<String> {
    let doc = encode::build(value, &config.root_name)?;
    debug!(children = doc.root.children.len(), "built xml tree");
    let xml = xml::writer::to_string(&doc)?;
    if config.xml_declaration {
        Ok(xml)
    } else {
        Ok(xml::writer::strip_declaration(&xml).to_string())
    }
}

/// Parse an XML document into a mapping, with `@root` holding the root tag
pub fn from_xml(xml: &str) -> Result<Mapping> {
    from_xml_with_config(xml, ParseConfig::default())
}

/// Parse with custom resource limits
///
/// Extraction recurses per nesting level; see [`ParseConfig::unlimited`]
/// before lifting the depth cap.
#[instrument(skip_all, fields(len = xml.len()))]
pub fn from_xml_with_config(xml: &str, config: ParseConfig) -> Result<Mapping> {
    let doc = XmlParser::with_config(xml, config).parse()?;
    Ok(decode::extract_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_text() -> Result<()> {
        let xml = "<catalog><item sku=\"a1\">Pen</item><item sku=\"b2\">Ink</item><note/></catalog>";
        let map = from_xml(xml)?;
        let rebuilt = to_xml_with_config(
            &Value::Mapping(map.clone()),
            &EncodeConfig::new("catalog").without_declaration(),
        )?;
        assert_eq!(
            rebuilt,
            "<catalog><item sku=\"a1\">Pen</item><item sku=\"b2\">Ink</item><note/></catalog>\n"
        );
        assert_eq!(from_xml(&rebuilt)?, map);
        Ok(())
    }

    #[test]
    fn test_limits_are_applied() {
        let err = from_xml_with_config("<a><b/></a>", ParseConfig::new(1, 0)).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxDepthExceeded { max: 1 })
        );
    }

    #[test]
    fn test_unlimited_depth_extracts_deep_nesting() -> Result<()> {
        let deep = format!("{}x{}", "<a>".repeat(1000), "</a>".repeat(1000));
        let map = from_xml_with_config(&deep, ParseConfig::unlimited())?;
        let path = vec!["a"; 999];
        let leaf = Value::Mapping(map).pointer(path).cloned();
        assert_eq!(leaf, Some(Value::from("x")));

        assert!(from_xml(&deep).is_err());
        Ok(())
    }

    #[test]
    fn test_to_xml_keeps_declaration() -> Result<()> {
        let xml = to_xml(&Value::Mapping(Mapping::new()), "root")?;
        assert_eq!(xml, "<?xml version=\"1.0\"?>\n<root/>\n");
        Ok(())
    }

    #[test]
    fn test_without_declaration_drops_first_line() -> Result<()> {
        let config = EncodeConfig::new("doc").without_declaration();
        let xml = to_xml_with_config(&Value::Mapping(Mapping::new()), &config)?;
        assert_eq!(xml, "<doc/>\n");
        Ok(())
    }

    #[test]
    fn test_root_text_survives_round_trip() -> Result<()> {
        let map = from_xml(r#"<g a="1">hi</g>"#)?;
        let config = EncodeConfig::new("g").without_declaration();
        let xml = to_xml_with_config(&Value::Mapping(map.clone()), &config)?;
        assert_eq!(xml, "<g a=\"1\">hi</g>\n");
        assert_eq!(from_xml(&xml)?, map);
        Ok(())
    }

    #[test]
    fn test_empty_list_keeps_its_element() -> Result<()> {
        let mut map = Mapping::new();
        map.insert("nonBookEntity", Sequence::new());
        map.insert("x", "1");
        let config = EncodeConfig::new("root").without_declaration();
        let xml = to_xml_with_config(&Value::Mapping(map), &config)?;
        assert_eq!(xml, "<root><nonBookEntity/><x>1</x></root>\n");
        Ok(())
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        assert!(to_xml(&Value::from("x"), "root").is_err());
    }
}
