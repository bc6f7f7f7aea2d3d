//! XML tree model plus the reader and writer bridging it to text

pub mod model;
pub mod reader;
pub mod writer;

pub use model::{Document, Element, Node};
pub use reader::{Config, Parser};
