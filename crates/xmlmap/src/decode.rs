//! XML tree → Value
//!
//! Child elements are grouped by tag name; a group of one collapses to its
//! single value, larger groups stay a [`Sequence`]. Significant text turns an
//! element into a scalar, wrapped under `@content` when the element also
//! carries attributes. CDATA is read exactly like text.

use indexmap::IndexMap;

use crate::value::{Mapping, Sequence, Value, ATTRIBUTES, CONTENT, ROOT};
use crate::xml::model::{Document, Element, Node};

/// Extract the root element and record its name under `@root`
///
/// A root holding only text (and no attributes) lands under `@content`.
pub fn extract_document(doc: &Document) -> Mapping {
    let mut map = match extract_element(&doc.root) {
        Value::Mapping(map) => map,
        other => {
            let mut map = Mapping::new();
            map.insert(CONTENT, other);
            map
        }
    };
    map.insert(ROOT, doc.root.name.as_str());
    map
}

pub fn extract(node: &Node) -> Value {
    match node {
        Node::Element(element) => extract_element(element),
        Node::Text(text) | Node::CData(text) => Value::Scalar(trim(text).to_string()),
    }
}

/// What an element's children add up to so far
enum Collected {
    Children(IndexMap<String, Vec<Value>>),
    Text(String),
}

pub fn extract_element(element: &Element) -> Value {
    let mut collected = Collected::Children(IndexMap::new());

    for child in &element.children {
        match child {
            Node::Element(child) => {
                // once text has been seen the element is a scalar; later children are lost
                if let Collected::Children(children) = &mut collected {
                    children
                        .entry(child.name.clone())
                        .or_default()
                        .push(extract_element(child));
                }
            }
            Node::Text(text) | Node::CData(text) => {
                let text = trim(text);
                if !text.is_empty() {
                    collected = Collected::Text(text.to_string());
                }
            }
        }
    }

    let mut map = match collected {
        Collected::Text(text) if element.attributes.is_empty() => return Value::Scalar(text),
        Collected::Text(text) => {
            let mut map = Mapping::new();
            map.insert(CONTENT, text);
            map
        }
        Collected::Children(children) => children
            .into_iter()
            .map(|(name, values)| (name, collapse(values)))
            .collect(),
    };

    if !element.attributes.is_empty() {
        let attributes: Mapping = element
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), Value::Scalar(value.clone())))
            .collect();
        map.insert(ATTRIBUTES, attributes);
    }

    Value::Mapping(map)
}

fn collapse(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        if let Some(only) = values.pop() {
            return only;
        }
    }
    Value::Sequence(Sequence(values))
}

fn trim(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
