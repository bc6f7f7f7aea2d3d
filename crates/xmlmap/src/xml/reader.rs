//! XML reader: builds a [`Document`] from the `quick-xml` event stream

use std::fmt;

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::error::{Error, ErrorKind, Result};
use crate::xml::model::{check_name, Document, Element, Node};

/// Configuration for the XML reader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    ///
    /// Building, extracting and writing recurse once per nesting level, so
    /// without a depth cap the thread's stack becomes the limit: documents
    /// nested tens of thousands of levels deep can overflow it. Only use this
    /// for trusted input.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser producing a whole-document tree
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
    config: Config,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(input: &'a str, config: Config) -> Self {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(false);
        Self {
            input,
            reader,
            config,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.input.len() > self.config.max_size {
            return Err(Error::new(ErrorKind::MaxSizeExceeded {
                max: self.config.max_size,
            }));
        }

        // Elements whose end tag has not been read yet, innermost last
        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = self.reader.read_event().map_err(|err| self.read_error(err))?;
            match event {
                Event::Start(start) => {
                    self.check_single_root(root.as_ref())?;
                    self.check_depth(open.len())?;
                    open.push(self.element(&start)?);
                }
                Event::Empty(start) => {
                    self.check_single_root(root.as_ref())?;
                    self.check_depth(open.len())?;
                    let element = self.element(&start)?;
                    attach(element, &mut open, &mut root);
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| self.error_here("unexpected end tag"))?;
                    attach(element, &mut open, &mut root);
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|err| self.read_error(err))?;
                    match open.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                        None if text.trim().is_empty() => {}
                        None => return Err(self.error_here("text outside of the root element")),
                    }
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data).map_err(|err| self.error_here(err))?;
                    match open.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(text.to_string())),
                        None => return Err(self.error_here("cdata outside of the root element")),
                    }
                }
                Event::Eof => break,
                other => trace!(event = ?other, "skipping markup"),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(self.error_here(format!("unclosed element <{}>", unclosed.name)));
        }

        let root = root.ok_or_else(|| self.error_here("no root element"))?;
        debug!(root = %root.name, bytes = self.input.len(), "parsed xml document");
        Ok(Document { root })
    }

    fn element(&self, start: &BytesStart<'_>) -> Result<Element> {
        let name = self.decode(start.name().as_ref())?;
        check_name(&name).map_err(|_| self.error_here(format!("invalid element name {name:?}")))?;

        let mut attributes = IndexMap::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| self.read_error(err))?;
            let key = self.decode(attribute.key.as_ref())?;
            let value = attribute
                .unescape_value()
                .map_err(|err| self.read_error(err))?;
            attributes.insert(key, value.into_owned());
        }

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn check_single_root(&self, root: Option<&Element>) -> Result<()> {
        match root {
            Some(root) => Err(self.error_here(format!(
                "second root element after <{}>",
                root.name
            ))),
            None => Ok(()),
        }
    }

    fn check_depth(&self, open: usize) -> Result<()> {
        let max = self.config.max_depth;
        if max > 0 && open >= usize::from(max) {
            return Err(Error::new(ErrorKind::MaxDepthExceeded { max }));
        }
        Ok(())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|err| self.error_here(err))
    }

    /// Error reported by quick-xml, located where the faulty markup starts
    fn read_error(&self, err: impl fmt::Display) -> Error {
        Error::syntax(to_offset(self.reader.error_position()), err.to_string())
    }

    fn error_here(&self, message: impl fmt::Display) -> Error {
        Error::syntax(to_offset(self.reader.buffer_position()), message.to_string())
    }
}

fn attach(element: Element, open: &mut [Element], root: &mut Option<Element>) {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

fn to_offset<T: TryInto<usize>>(position: T) -> usize {
    position.try_into().unwrap_or(usize::MAX)
}
