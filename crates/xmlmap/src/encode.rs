//! Value → XML tree
//!
//! Mapping keys become child elements, `Sequence` values fan out into
//! same-named siblings (an empty one still leaves a single empty element),
//! and the reserved keys control attributes, text and CDATA content of the
//! element they sit in.

use crate::error::{Error, Result};
use crate::value::{Mapping, Value, ATTRIBUTES, CDATA, CONTENT};
use crate::xml::model::{Document, Element};

/// Options for turning a value into XML text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Name of the document's root element
    pub root_name: String,
    /// Whether the output starts with `<?xml version="1.0"?>`
    pub xml_declaration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            xml_declaration: true,
        }
    }
}

impl Config {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            ..Self::default()
        }
    }

    pub fn without_declaration(mut self) -> Self {
        self.xml_declaration = false;
        self
    }
}

/// Build the document tree for `value` under a root element named `root_name`
///
/// The value must be a mapping. Its `@attributes`, `@content` and `@@content`
/// (if any) apply to the root element; `@root` is ignored.
pub fn build(value: &Value, root_name: &str) -> Result<Document> {
    let Value::Mapping(map) = value else {
        return Err(Error::shape("top-level value must be a mapping"));
    };

    let mut root = Element::new(root_name)?;
    fill_element(&mut root, map)?;
    Ok(Document { root })
}

/// Attributes, then CDATA or text, then child elements
fn fill_element(element: &mut Element, map: &Mapping) -> Result<()> {
    if let Some(attributes) = map.get(ATTRIBUTES) {
        apply_attributes(element, attributes)?;
    }
    if let Some(cdata) = map.get(CDATA) {
        let text = scalar(&element.name, CDATA, cdata)?;
        element.push_cdata(text);
    } else if let Some(content) = map.get(CONTENT) {
        let text = scalar(&element.name, CONTENT, content)?;
        element.push_text(text);
    }
    for (key, value) in map.elements() {
        append_entry(element, key, value)?;
    }
    Ok(())
}

fn append_entry(parent: &mut Element, key: &str, value: &Value) -> Result<()> {
    match value {
        // nothing positional to fan out, so the key still gets its element
        Value::Sequence(items) if items.is_empty() => {
            parent.push_element(Element::new(key)?);
        }
        Value::Sequence(items) => {
            for item in items {
                append_entry(parent, key, item)?;
            }
        }
        Value::Mapping(map) => {
            let mut element = Element::new(key)?;
            fill_element(&mut element, map)?;
            parent.push_element(element);
        }
        Value::Scalar(text) => {
            let mut element = Element::new(key)?;
            element.push_text(text);
            parent.push_element(element);
        }
    }
    Ok(())
}

fn apply_attributes(element: &mut Element, attributes: &Value) -> Result<()> {
    let Value::Mapping(attributes) = attributes else {
        return Err(Error::shape(format!(
            "{ATTRIBUTES} of <{}> must be a mapping",
            element.name
        )));
    };
    for (name, value) in attributes {
        let text = scalar(&element.name, name, value)?;
        element.set_attribute(name, text)?;
    }
    Ok(())
}

fn scalar<'v>(element: &str, key: &str, value: &'v Value) -> Result<&'v str> {
    value
        .as_scalar()
        .ok_or_else(|| Error::shape(format!("{key} of <{element}> must be a scalar")))
}
