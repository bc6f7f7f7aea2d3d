//! Generic key-value tree exchanged with XML documents

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use std::ops::Index;

#[cfg(feature = "serde")]
mod serde_impl;

/// Key holding an element's attributes as a flat name → value mapping
pub const ATTRIBUTES: &str = "@attributes";
/// Key holding plain text content next to attributes
pub const CONTENT: &str = "@content";
/// Key holding content written as a CDATA section (never produced by decoding)
pub const CDATA: &str = "@@content";
/// Key naming the document's root element (added by decoding)
pub const ROOT: &str = "@root";

/// Returns true for keys that carry metadata instead of naming a child element
pub fn is_reserved(key: &str) -> bool {
    key.starts_with('@')
}

/// A node of the key-value tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Leaf text; numbers are text too
    Scalar(String),
    /// Repeated sibling elements sharing one name
    Sequence(Sequence),
    /// Child elements and reserved keys
    Mapping(Mapping),
}

impl Default for Value {
    fn default() -> Self {
        Self::Mapping(Mapping::new())
    }
}

impl Value {
    /// Returns true if this value is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns true if this value is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns true if this value is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Returns the text if this is a scalar, None otherwise
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequence if this is a sequence, None otherwise
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping if this is a mapping, None otherwise
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns a mutable reference to the mapping if this is a mapping, None otherwise
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Follows a path of mapping keys, e.g. `["library", "books", "book"]`
    pub fn pointer<'a, I>(&self, path: I) -> Option<&Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter()
            .try_fold(self, |value, key| value.as_mapping()?.get(key))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Self::Sequence(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Sequence(Sequence(values))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Mapping(Mapping(map))
    }
}

/// String-keyed entries; iteration follows insertion order, equality ignores it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapping(pub(crate) IndexMap<String, Value>);

impl Mapping {
    /// Creates a new empty mapping
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Inserts a key-value pair, returning the previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key while keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Entries whose keys name child elements
    pub fn elements(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(key, _)| !is_reserved(key))
    }
}

impl Index<&str> for Mapping {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexMap<String, Value>> for Mapping {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// Ordered values emitted as same-named siblings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence(pub(crate) Vec<Value>);

impl Sequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl Index<usize> for Sequence {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}
