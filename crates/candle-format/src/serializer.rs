//! Tree serializer.

use std::io;

use candle_tree::{Array, CommentNode, Document, Node, ObjectNode, PropertyNode, TreeVisitor, Value};

use crate::options::SerializerOptions;
use crate::scalar::{escape_string, format_float};

/// Renders document trees as Candle text.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    options: SerializerOptions,
}

impl Serializer {
    /// Create a serializer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SerializerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Serialize a whole document. Every top-level node ends with a newline.
    pub fn serialize_document(&self, document: &Document) -> String {
        let mut renderer = Renderer::new(&self.options);
        document.walk(&mut renderer);
        renderer.out
    }

    /// Serialize one object, including its own name and braces.
    pub fn serialize_object(&self, object: &ObjectNode) -> String {
        let mut renderer = Renderer::new(&self.options);
        renderer.visit_object(object);
        object.walk(&mut renderer);
        renderer.visit_object_end(object);
        renderer.out
    }

    /// Serialize a single node without a trailing newline.
    pub fn serialize_node(&self, node: &Node) -> String {
        let mut renderer = Renderer::new(&self.options);
        node.walk(&mut renderer);
        renderer.out
    }

    /// Serialize a whole document into `writer`.
    pub fn write_document<W: io::Write>(
        &self,
        document: &Document,
        mut writer: W,
    ) -> io::Result<()> {
        writer.write_all(self.serialize_document(document).as_bytes())?;
        writer.flush()
    }
}

/// Structured visitor that accumulates output.
struct Renderer<'o> {
    options: &'o SerializerOptions,
    out: String,
    /// Nesting depth of the node being written.
    level: usize,
    /// Whether top-level nodes are document children.
    document: bool,
}

impl<'o> Renderer<'o> {
    fn new(options: &'o SerializerOptions) -> Self {
        Self {
            options,
            out: String::new(),
            level: 0,
            document: false,
        }
    }

    fn indent(&mut self, level: usize) {
        if let Some(unit) = self.options.indentation.as_deref() {
            for _ in 0..level {
                self.out.push_str(unit);
            }
        }
    }

    fn newline(&mut self) {
        self.out.push_str(&self.options.newline);
    }

    /// Separator after a finished child node.
    fn end_child(&mut self, single_line_comment: bool) {
        let wanted = if self.level == 0 {
            self.document
        } else {
            self.options.pretty_print || single_line_comment
        };
        if wanted {
            self.newline();
        }
    }

    /// Keep adjacent members apart when neither newlines nor indentation do.
    fn separate(&mut self) {
        let unindented = self
            .options
            .indentation
            .as_deref()
            .is_none_or(str::is_empty);
        if self.level > 0
            && !self.options.pretty_print
            && unindented
            && !self.out.ends_with(['{', '\n'])
        {
            self.out.push(' ');
        }
    }

    fn property_prefix(&mut self, property: &PropertyNode) {
        self.separate();
        self.indent(self.level);
        self.out.push_str(property.name());
        self.out
            .push_str(if self.options.pretty_print { " = " } else { "=" });
    }

    fn scalar(&mut self, value: &Value) {
        match value {
            Value::Boolean(value) => self.out.push_str(if *value { "true" } else { "false" }),
            Value::Integer(value) => self.out.push_str(&value.to_string()),
            Value::Float(value) => self.out.push_str(&format_float(*value)),
            Value::String(value) => self.quoted(value),
            Value::Enum(value) => self.out.push_str(value),
            Value::Null => self.out.push_str("null"),
            Value::Default => self.out.push_str("default"),
            Value::Array(array) => self.array(array),
        }
    }

    fn quoted(&mut self, value: &str) {
        self.out.push('"');
        self.out.push_str(&escape_string(value));
        self.out.push('"');
    }

    fn array(&mut self, array: &Array) {
        let pretty = self.options.pretty_print;
        self.out.push('[');
        if let Array::Null = array {
            if pretty {
                self.out.push(' ');
            }
            self.out.push(']');
            return;
        }
        if pretty {
            self.newline();
        }

        match array {
            Array::Null => {}
            Array::Boolean(items) => {
                for item in items {
                    self.item(|out| out.push_str(if *item { "true" } else { "false" }));
                }
            }
            Array::Integer(items) => {
                for item in items {
                    self.item(|out| out.push_str(&item.to_string()));
                }
            }
            Array::Float(items) => {
                for item in items {
                    self.item(|out| out.push_str(&format_float(*item)));
                }
            }
            Array::String(items) => {
                for item in items {
                    self.item(|out| match item {
                        Some(value) => {
                            out.push('"');
                            out.push_str(&escape_string(value));
                            out.push('"');
                        }
                        None => out.push_str("null"),
                    });
                }
            }
            Array::Enum(items) => {
                for item in items {
                    self.item(|out| out.push_str(item.as_deref().unwrap_or("null")));
                }
            }
        }
        if pretty {
            self.indent(self.level);
        }
        self.out.push(']');
    }

    /// One comma-terminated array item, on its own line when pretty printing.
    fn item(&mut self, literal: impl FnOnce(&mut String)) {
        let pretty = self.options.pretty_print;
        if pretty {
            self.indent(self.level + 1);
        }
        literal(&mut self.out);
        self.out.push(',');
        if pretty {
            self.newline();
        }
    }
}

impl TreeVisitor for Renderer<'_> {
    fn visit_document(&mut self, _document: &ObjectNode) {
        trace!("document start");
        self.document = true;
    }

    fn visit_document_end(&mut self, _document: &ObjectNode) {
        trace!(len = self.out.len(), "document end");
        self.document = false;
    }

    fn visit_object(&mut self, object: &ObjectNode) {
        trace!(name = object.name(), level = self.level, "object");
        self.separate();
        self.indent(self.level);
        self.out.push_str(object.name());
        if self.options.pretty_print {
            self.out.push(' ');
        }
        self.out.push('{');
        if self.options.pretty_print {
            self.newline();
        }
        self.level += 1;
    }

    fn visit_object_end(&mut self, _object: &ObjectNode) {
        self.level = self.level.saturating_sub(1);
        self.indent(self.level);
        self.out.push('}');
        self.end_child(false);
    }

    fn visit_comment(&mut self, comment: &CommentNode) {
        self.separate();
        self.indent(self.level);
        if comment.is_multiline() {
            self.out.push_str("/*");
            self.out.push_str(comment.text());
            self.out.push_str("*/");
        } else {
            self.out.push_str("//");
            self.out.push_str(comment.text());
        }
        self.end_child(!comment.is_multiline());
    }

    fn visit_property(&mut self, property: &PropertyNode) {
        trace!(name = property.name(), level = self.level, "property");
        self.property_prefix(property);
    }

    fn visit_value(&mut self, _property: &PropertyNode, value: &Value) {
        self.scalar(value);
    }

    fn visit_property_end(&mut self, _property: &PropertyNode) {
        self.end_child(false);
    }

    fn visit_array_property(&mut self, property: &PropertyNode, _array: &Array) {
        trace!(name = property.name(), level = self.level, "array property");
        self.property_prefix(property);
    }

    fn visit_array(&mut self, _property: &PropertyNode, array: &Array) {
        self.array(array);
    }

    fn visit_array_property_end(&mut self, _property: &PropertyNode, _array: &Array) {
        self.end_child(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lf() -> SerializerOptions {
        SerializerOptions::new().newline("\n")
    }

    fn document(nodes: Vec<Node>) -> Document {
        let mut document = Document::new();
        for node in nodes {
            document.append(node);
        }
        document
    }

    fn sample_object() -> ObjectNode {
        let mut inner = ObjectNode::new("inner");
        inner.append(PropertyNode::string("b", "x"));

        let mut object = ObjectNode::new("o");
        object
            .append(PropertyNode::integer("a", 1))
            .append(CommentNode::new(" c"))
            .append(inner);
        object
    }

    #[test]
    fn test_boolean_array_pretty() {
        let document = document(vec![PropertyNode::array(
            "name",
            Array::Boolean(vec![true, false]),
        )
        .into()]);
        assert_eq!(
            Serializer::with_options(lf()).serialize_document(&document),
            "name = [\n\ttrue,\n\tfalse,\n]\n"
        );
        assert_eq!(
            Serializer::with_options(lf().pretty_print(false)).serialize_document(&document),
            "name=[true,false,]\n"
        );
    }

    #[test]
    fn test_objects_pretty() {
        let document = document(vec![sample_object().into()]);
        assert_eq!(
            Serializer::with_options(lf()).serialize_document(&document),
            "o {\n\ta = 1\n\t// c\n\tinner {\n\t\tb = \"x\"\n\t}\n}\n"
        );
    }

    #[test]
    fn test_objects_compact() {
        let document = document(vec![sample_object().into()]);
        assert_eq!(
            Serializer::with_options(lf().compact()).serialize_document(&document),
            "o{a=1 // c\ninner{b=\"x\"}}\n"
        );
    }

    #[test]
    fn test_serialize_object_and_node() {
        let serializer = Serializer::with_options(lf().indentation("  "));
        assert_eq!(
            serializer.serialize_object(&sample_object()),
            "o {\n  a = 1\n  // c\n  inner {\n    b = \"x\"\n  }\n}"
        );
        assert_eq!(
            serializer.serialize_node(&PropertyNode::integer("a", -5).into()),
            "a = -5"
        );
        assert_eq!(
            serializer.serialize_node(&CommentNode::new(" note").into()),
            "// note"
        );
    }

    #[test]
    fn test_comments() {
        let document = document(vec![
            CommentNode::new(" a\nb ").into(),
            CommentNode::new("single").into(),
        ]);
        assert_eq!(
            Serializer::with_options(lf()).serialize_document(&document),
            "/* a\nb */\n//single\n"
        );

        let mut object = ObjectNode::new("o");
        object
            .append(CommentNode::new("x\ny"))
            .append(PropertyNode::boolean("p", true));
        assert_eq!(
            Serializer::with_options(lf().compact()).serialize_object(&object),
            "o{/*x\ny*/ p=true}"
        );
    }

    #[test]
    fn test_scalar_literals() {
        let document = document(vec![
            PropertyNode::float("f", 0.5).into(),
            PropertyNode::string("s", "a\"b").into(),
            PropertyNode::enumeration("e", "VALUE1").into(),
            PropertyNode::null("n").into(),
            PropertyNode::default_value("d").into(),
        ]);
        assert_eq!(
            Serializer::with_options(lf()).serialize_document(&document),
            "f = 0.5\ns = \"a\\\"b\"\ne = VALUE1\nn = null\nd = default\n"
        );
    }

    #[test]
    fn test_arrays() {
        let document = document(vec![
            PropertyNode::array("e", Array::Null).into(),
            PropertyNode::array("i", Array::Integer(Vec::new())).into(),
            PropertyNode::array("s", Array::String(vec![Some("x".to_string()), None])).into(),
        ]);
        assert_eq!(
            Serializer::with_options(lf()).serialize_document(&document),
            "e = [ ]\ni = [\n]\ns = [\n\t\"x\",\n\tnull,\n]\n"
        );
        assert_eq!(
            Serializer::with_options(lf().compact()).serialize_document(&document),
            "e=[]\ni=[]\ns=[\"x\",null,]\n"
        );
    }

    #[test]
    fn test_nested_array_indentation() {
        let mut object = ObjectNode::new("o");
        object.append(PropertyNode::array("l", Array::Integer(vec![1])));
        assert_eq!(
            Serializer::with_options(lf()).serialize_object(&object),
            "o {\n\tl = [\n\t\t1,\n\t]\n}"
        );
    }

    #[test]
    fn test_pretty_without_indentation() {
        let object = sample_object();
        assert_eq!(
            Serializer::with_options(lf().no_indentation()).serialize_object(&object),
            "o {\na = 1\n// c\ninner {\nb = \"x\"\n}\n}"
        );
    }

    #[test]
    fn test_parsed_document_snapshot() {
        let source = "// top\nserver {\n\thost = \"localhost\"\n\tport = 0x1F90\n\tratio = 0.5\n\tmodes = [FAST, null, SLOW]\n\tempty = []\n}\nenabled = default\n";
        let document = Document::parse(source).unwrap();
        let output = Serializer::with_options(lf().indentation("  ")).serialize_document(&document);
        insta::assert_snapshot!(output.trim_end(), @r#"
        // top
        server {
          host = "localhost"
          port = 8080
          ratio = 0.5
          modes = [
            FAST,
            null,
            SLOW,
          ]
          empty = [ ]
        }
        enabled = default
        "#);
    }

    #[test]
    fn test_write_document() {
        let document = document(vec![PropertyNode::integer("a", 1).into()]);
        let mut buffer = Vec::new();
        Serializer::with_options(lf())
            .write_document(&document, &mut buffer)
            .unwrap();
        assert_eq!(buffer, b"a = 1\n");
    }
}
