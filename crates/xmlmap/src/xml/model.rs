//! XML data model

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    /// Character data, already unescaped
    Text(String),
    /// Content of a `<![CDATA[...]]>` section
    CData(String),
}

impl Element {
    /// Create an element after checking that `name` is a legal XML name
    pub fn new(name: &str) -> Result<Self> {
        check_name(name)?;
        Ok(Self {
            name: name.to_string(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })
    }

    /// Set an attribute, replacing any previous value under the same name
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        check_name(name)?;
        self.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Append plain text; empty text adds no node
    pub fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    pub fn push_cdata(&mut self, text: &str) {
        self.children.push(Node::CData(text.to_string()));
    }

    pub fn push_element(&mut self, element: Self) {
        self.children.push(Node::Element(element));
    }

    /// Child elements, skipping text and CDATA
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::CData(_) => None,
        })
    }
}

/// Validate an element or attribute name against the XML `Name` production
pub fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_name_start(first) && chars.all(is_name_char),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_name(name))
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c == ':' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || matches!(c, '-' | '.' | '\u{B7}')
}
