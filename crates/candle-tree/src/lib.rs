//! Document tree representation for Candle configuration files.
//!
//! A [`Document`] is an ordered tree of [`Node`]s: comments, named
//! [`ObjectNode`]s and named [`PropertyNode`]s holding a typed [`Value`].
//! Trees are built from validated event streams by a [`TreeBuilder`],
//! navigated and edited with `.`-separated paths, and replayed either as
//! flat events or through a structured [`TreeVisitor`].
//!
//! ```
//! let document = candle_tree::parse("server {\n\tport = 8080\n}").unwrap();
//! assert_eq!(document.get_integer("server.port").unwrap(), 8080);
//! ```

mod builder;
mod diagnostic;
mod document;
mod error;
mod node;
mod object;
mod value;
mod visit;

pub use builder::TreeBuilder;
pub use candle_parse::{Event, NodeKind, Span, ValueKind, Visitor};
pub use document::Document;
pub use error::{Error, Result};
pub use node::{CommentNode, NamedNode, Node, PropertyNode};
pub use object::{ObjectNode, ROOT_NAME};
pub use value::{Array, Value};
pub use visit::{TreeVisitor, walk_children, walk_node};

/// Parse a Candle document into a tree.
pub fn parse(source: &str) -> Result<Document> {
    Document::parse(source)
}
