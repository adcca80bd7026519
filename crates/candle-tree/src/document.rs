//! Documents: the root of a tree.

use std::io::Read;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use candle_parse::{Parser, Result as EventResult, Visitor};
use tracing::debug;

use crate::{ObjectNode, Result, TreeBuilder, TreeVisitor};

/// A parsed or hand-built Candle document.
///
/// A document is an [`ObjectNode`] whose name is fixed to
/// [`ROOT_NAME`](crate::ROOT_NAME) and whose kind is `Document`. All object
/// methods are available through `Deref`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: ObjectNode,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self {
            root: ObjectNode::root(),
        }
    }

    pub(crate) fn from_root(root: ObjectNode) -> Self {
        Self { root }
    }

    /// Parse `source` into a new document.
    pub fn parse(source: &str) -> Result<Self> {
        let mut builder = TreeBuilder::new();
        Parser::new(source).parse(&mut builder)?;
        let document = builder.finish()?;
        debug!(children = document.len(), "parsed document");
        Ok(document)
    }

    /// Replace the contents of this document with `source`.
    ///
    /// The document is cleared first, so it is left empty if parsing fails.
    pub fn read(&mut self, source: &str) -> Result<()> {
        self.root.clear();
        *self = Self::parse(source)?;
        Ok(())
    }

    /// Like [`Document::read`], taking the text from `reader`.
    pub fn read_from<R: Read>(&mut self, mut reader: R) -> Result<()> {
        self.root.clear();
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.read(&source)
    }

    pub fn root(&self) -> &ObjectNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ObjectNode {
        &mut self.root
    }

    pub fn into_root(self) -> ObjectNode {
        self.root
    }

    /// Walk the whole document, bracketed by document start and end calls.
    pub fn walk<V: TreeVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_document(&self.root);
        self.root.walk(visitor);
        visitor.visit_document_end(&self.root);
    }

    /// Replay the document as flat events.
    pub fn events<V: Visitor + ?Sized>(&self, visitor: &mut V) -> EventResult<()> {
        self.root.events(visitor)
    }
}

impl Deref for Document {
    type Target = ObjectNode;

    fn deref(&self) -> &ObjectNode {
        &self.root
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut ObjectNode {
        &mut self.root
    }
}

impl FromStr for Document {
    type Err = crate::Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}
