//! Serialization of Candle document trees back into text.
//!
//! Output is deterministic for a given tree and [`SerializerOptions`]:
//! children are written in tree order, objects and arrays are indented one
//! level per nesting depth, and string values are escaped so that the text
//! parses back into the same tree.
//!
//! ```
//! let document = candle_tree::parse("answer = 42").unwrap();
//! let options = candle_format::SerializerOptions::new().newline("\n");
//! assert_eq!(candle_format::to_string_with(&document, &options), "answer = 42\n");
//! ```

#[macro_use]
mod tracing_macros;

mod options;
mod scalar;
mod serializer;

pub use options::SerializerOptions;
pub use scalar::{escape_string, format_float};
pub use serializer::Serializer;

use candle_tree::Document;

/// Serialize `document` with the default options.
pub fn to_string(document: &Document) -> String {
    Serializer::new().serialize_document(document)
}

/// Serialize `document` with the given options.
pub fn to_string_with(document: &Document, options: &SerializerOptions) -> String {
    Serializer::with_options(options.clone()).serialize_document(document)
}
