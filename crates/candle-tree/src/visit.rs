//! Structured, pre-order tree visitor.
//!
//! Unlike the flat [`candle_parse::Visitor`], a [`TreeVisitor`] sees whole
//! nodes and gets an explicit end call for every container and property.
//! Properties are reported twice: once by their abstract shape
//! ([`TreeVisitor::visit_property`] or [`TreeVisitor::visit_array_property`])
//! and once with their concrete payload ([`TreeVisitor::visit_value`] or
//! [`TreeVisitor::visit_array`]). Implement whichever pair you need; every
//! method defaults to doing nothing.
//!
//! For a scalar property the calls are `visit_property`, `visit_value`,
//! `visit_property_end`. For an array property they are
//! `visit_array_property`, `visit_array`, `visit_array_property_end`.

use crate::{Array, CommentNode, Node, ObjectNode, PropertyNode, Value};

pub trait TreeVisitor {
    /// Start of a whole document. `document` is its root object.
    fn visit_document(&mut self, _document: &ObjectNode) {}

    fn visit_document_end(&mut self, _document: &ObjectNode) {}

    /// Start of a nested object, before any of its children.
    fn visit_object(&mut self, _object: &ObjectNode) {}

    fn visit_object_end(&mut self, _object: &ObjectNode) {}

    fn visit_comment(&mut self, _comment: &CommentNode) {}

    /// A property holding a scalar, `null` or `default`.
    fn visit_property(&mut self, _property: &PropertyNode) {}

    /// The concrete value of the property passed to the last `visit_property`.
    fn visit_value(&mut self, _property: &PropertyNode, _value: &Value) {}

    fn visit_property_end(&mut self, _property: &PropertyNode) {}

    /// A property holding an array.
    fn visit_array_property(&mut self, _property: &PropertyNode, _array: &Array) {}

    /// The concrete items of the array passed to the last `visit_array_property`.
    fn visit_array(&mut self, _property: &PropertyNode, _array: &Array) {}

    fn visit_array_property_end(&mut self, _property: &PropertyNode, _array: &Array) {}
}

impl<V: TreeVisitor + ?Sized> TreeVisitor for &mut V {
    fn visit_document(&mut self, document: &ObjectNode) {
        (**self).visit_document(document)
    }

    fn visit_document_end(&mut self, document: &ObjectNode) {
        (**self).visit_document_end(document)
    }

    fn visit_object(&mut self, object: &ObjectNode) {
        (**self).visit_object(object)
    }

    fn visit_object_end(&mut self, object: &ObjectNode) {
        (**self).visit_object_end(object)
    }

    fn visit_comment(&mut self, comment: &CommentNode) {
        (**self).visit_comment(comment)
    }

    fn visit_property(&mut self, property: &PropertyNode) {
        (**self).visit_property(property)
    }

    fn visit_value(&mut self, property: &PropertyNode, value: &Value) {
        (**self).visit_value(property, value)
    }

    fn visit_property_end(&mut self, property: &PropertyNode) {
        (**self).visit_property_end(property)
    }

    fn visit_array_property(&mut self, property: &PropertyNode, array: &Array) {
        (**self).visit_array_property(property, array)
    }

    fn visit_array(&mut self, property: &PropertyNode, array: &Array) {
        (**self).visit_array(property, array)
    }

    fn visit_array_property_end(&mut self, property: &PropertyNode, array: &Array) {
        (**self).visit_array_property_end(property, array)
    }
}

/// Dispatch every child of `object`, in order.
pub fn walk_children<V: TreeVisitor + ?Sized>(object: &ObjectNode, visitor: &mut V) {
    for child in object {
        walk_node(child, visitor);
    }
}

/// Dispatch a single node, recursing into objects.
pub fn walk_node<V: TreeVisitor + ?Sized>(node: &Node, visitor: &mut V) {
    match node {
        Node::Comment(comment) => visitor.visit_comment(comment),
        Node::Object(object) => {
            visitor.visit_object(object);
            walk_children(object, visitor);
            visitor.visit_object_end(object);
        }
        Node::Property(property) => match property.value() {
            Value::Array(array) => {
                visitor.visit_array_property(property, array);
                visitor.visit_array(property, array);
                visitor.visit_array_property_end(property, array);
            }
            value => {
                visitor.visit_property(property);
                visitor.visit_value(property, value);
                visitor.visit_property_end(property);
            }
        },
    }
}
