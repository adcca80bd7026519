//! Object nodes: ordered, name-addressable containers.
//!
//! Children keep their insertion order, which is also the order they are
//! written back out in. Names are matched case-insensitively and the first
//! match in child order wins.
//!
//! Paths are `.`-separated names resolved one segment at a time, e.g.
//! `object1.child2.property17`. Every segment but the last must name an
//! object.

use std::any::type_name;
use std::str::FromStr;

use candle_parse::{NodeKind, Result as EventResult, ValueKind, Visitor};
use tracing::trace;

use crate::node::checked_name;
use crate::{Array, CommentNode, Error, NamedNode, Node, PropertyNode, Result, TreeVisitor, Value};

/// Name carried by the root object of every document.
pub const ROOT_NAME: &str = "###ROOT###";

/// Generates the plain and defaulted accessor for one array item type.
macro_rules! array_accessors {
    ($get:ident, $get_or:ident, $kind:ident, $item:ty) => {
        pub fn $get(&self, path: &str) -> Result<Option<&[$item]>> {
            Ok(match self.typed_array(path, ValueKind::$kind)? {
                Some(Array::$kind(items)) => Some(items.as_slice()),
                _ => None,
            })
        }

        pub fn $get_or<'a>(&'a self, path: &str, default: &'a [$item]) -> Result<&'a [$item]> {
            Ok(match self.typed_array_if_present(path, ValueKind::$kind)? {
                Some(Array::$kind(items)) => items.as_slice(),
                _ => default,
            })
        }
    };
}

/// A named container of child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    name: String,
    children: Vec<Node>,
    root: bool,
}

impl ObjectNode {
    /// Create an empty object. The name is taken as is; see [`ObjectNode::try_new`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            root: false,
        }
    }

    /// Create an empty object, failing with [`Error::InvalidName`] on an empty name.
    pub fn try_new(name: impl Into<String>) -> Result<Self> {
        Ok(Self::new(checked_name(name)?))
    }

    pub(crate) fn root() -> Self {
        Self {
            name: ROOT_NAME.to_string(),
            children: Vec::new(),
            root: true,
        }
    }

    /// `Document` for a document root, `Object` otherwise.
    pub fn kind(&self) -> NodeKind {
        if self.root {
            NodeKind::Document
        } else {
            NodeKind::Object
        }
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename this object. Fails for document roots and empty names.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        if self.root {
            return Err(Error::ImmutableRoot);
        }
        self.name = checked_name(name)?;
        Ok(())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }

    /// Direct child objects, in order.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectNode> {
        self.children.iter().filter_map(Node::as_object)
    }

    /// Direct child properties, in order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyNode> {
        self.children.iter().filter_map(Node::as_property)
    }

    /// Direct child comments, in order.
    pub fn comments(&self) -> impl Iterator<Item = &CommentNode> {
        self.children.iter().filter_map(Node::as_comment)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Remove every child.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Index of the first direct child called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.has_name(name))
    }

    /// Add `node` at the end, or in place of the direct child with the same name.
    pub fn append(&mut self, node: impl Into<Node>) -> &mut Self {
        let node = node.into();
        let existing = node.name().and_then(|name| self.position(name));
        match existing {
            Some(index) => {
                trace!(name = node.name(), index, "replacing child");
                self.children[index] = node;
            }
            None => self.children.push(node),
        }
        self
    }

    /// Resolve `path` to a node.
    pub fn get(&self, path: &str) -> Result<&Node> {
        self.resolve(path, path)
    }

    pub fn get_mut(&mut self, path: &str) -> Result<&mut Node> {
        self.resolve_mut(path, path)
    }

    /// Resolve `path` to a node of the given kind.
    pub fn get_kind(&self, path: &str, kind: NodeKind) -> Result<&Node> {
        let node = self.get(path)?;
        node.ensure_kind(kind)?;
        Ok(node)
    }

    pub fn get_object(&self, path: &str) -> Result<&ObjectNode> {
        match self.get(path)? {
            Node::Object(object) => Ok(object),
            other => Err(Error::node_kind(NodeKind::Object, other.kind())),
        }
    }

    pub fn get_object_mut(&mut self, path: &str) -> Result<&mut ObjectNode> {
        match self.get_mut(path)? {
            Node::Object(object) => Ok(object),
            other => Err(Error::node_kind(NodeKind::Object, other.kind())),
        }
    }

    pub fn get_property(&self, path: &str) -> Result<&PropertyNode> {
        match self.get(path)? {
            Node::Property(property) => Ok(property),
            other => Err(Error::node_kind(NodeKind::Property, other.kind())),
        }
    }

    pub fn get_property_mut(&mut self, path: &str) -> Result<&mut PropertyNode> {
        match self.get_mut(path)? {
            Node::Property(property) => Ok(property),
            other => Err(Error::node_kind(NodeKind::Property, other.kind())),
        }
    }

    /// Whether `path` resolves at all.
    pub fn is_present(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Whether `path` resolves to a node of the given kind.
    pub fn is_present_kind(&self, path: &str, kind: NodeKind) -> bool {
        self.get_kind(path, kind).is_ok()
    }

    /// Insert `node` directly before the node at `path`, in that node's parent.
    pub fn insert_before(&mut self, path: &str, node: impl Into<Node>) -> Result<()> {
        let node = checked_node(node.into())?;
        let (container, index) = self.locate_mut(path)?;
        container.children.insert(index, node);
        Ok(())
    }

    /// Insert `node` directly after the node at `path`, in that node's parent.
    pub fn insert_after(&mut self, path: &str, node: impl Into<Node>) -> Result<()> {
        let node = checked_node(node.into())?;
        let (container, index) = self.locate_mut(path)?;
        container.children.insert(index + 1, node);
        Ok(())
    }

    /// Remove the node at `path` from its parent and return it.
    pub fn remove(&mut self, path: &str) -> Result<Node> {
        let (container, index) = self.locate_mut(path)?;
        Ok(container.children.remove(index))
    }

    /// Put `node` in place of the node at `path` and return the old node.
    pub fn replace(&mut self, path: &str, node: impl Into<Node>) -> Result<Node> {
        let node = checked_node(node.into())?;
        let (container, index) = self.locate_mut(path)?;
        Ok(std::mem::replace(&mut container.children[index], node))
    }

    /// Insert `node` directly before the direct child equal to `reference`.
    pub fn insert_before_node(&mut self, reference: &Node, node: impl Into<Node>) -> Result<()> {
        let node = checked_node(node.into())?;
        let index = self.index_of_node(reference)?;
        self.children.insert(index, node);
        Ok(())
    }

    /// Insert `node` directly after the direct child equal to `reference`.
    pub fn insert_after_node(&mut self, reference: &Node, node: impl Into<Node>) -> Result<()> {
        let node = checked_node(node.into())?;
        let index = self.index_of_node(reference)?;
        self.children.insert(index + 1, node);
        Ok(())
    }

    /// Remove the direct child equal to `reference`.
    pub fn remove_node(&mut self, reference: &Node) -> Result<Node> {
        let index = self.index_of_node(reference)?;
        Ok(self.children.remove(index))
    }

    /// Put `node` in place of the direct child equal to `reference`.
    pub fn replace_node(&mut self, reference: &Node, node: impl Into<Node>) -> Result<Node> {
        let node = checked_node(node.into())?;
        let index = self.index_of_node(reference)?;
        Ok(std::mem::replace(&mut self.children[index], node))
    }

    pub fn get_boolean(&self, path: &str) -> Result<bool> {
        Ok(self
            .typed_value(path, ValueKind::Boolean)?
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    pub fn get_boolean_or(&self, path: &str, default: bool) -> Result<bool> {
        Ok(self
            .typed_value_if_present(path, ValueKind::Boolean)?
            .and_then(Value::as_bool)
            .unwrap_or(default))
    }

    pub fn get_integer(&self, path: &str) -> Result<i32> {
        Ok(self
            .typed_value(path, ValueKind::Integer)?
            .and_then(Value::as_i32)
            .unwrap_or(0))
    }

    pub fn get_integer_or(&self, path: &str, default: i32) -> Result<i32> {
        Ok(self
            .typed_value_if_present(path, ValueKind::Integer)?
            .and_then(Value::as_i32)
            .unwrap_or(default))
    }

    /// Like [`Self::get_integer`], failing if the stored value is negative.
    pub fn get_unsigned_integer(&self, path: &str) -> Result<u32> {
        let value = self.get_integer(path)?;
        u32::try_from(value).map_err(|_| Error::negative(value))
    }

    pub fn get_unsigned_integer_or(&self, path: &str, default: u32) -> Result<u32> {
        match self
            .typed_value_if_present(path, ValueKind::Integer)?
            .and_then(Value::as_i32)
        {
            Some(value) => u32::try_from(value).map_err(|_| Error::negative(value)),
            None => Ok(default),
        }
    }

    pub fn get_float(&self, path: &str) -> Result<f32> {
        Ok(self
            .typed_value(path, ValueKind::Float)?
            .and_then(Value::as_f32)
            .unwrap_or(0.0))
    }

    pub fn get_float_or(&self, path: &str, default: f32) -> Result<f32> {
        Ok(self
            .typed_value_if_present(path, ValueKind::Float)?
            .and_then(Value::as_f32)
            .unwrap_or(default))
    }

    /// Like [`Self::get_float`], failing if the stored value is negative.
    pub fn get_unsigned_float(&self, path: &str) -> Result<f32> {
        unsigned_float(self.get_float(path)?)
    }

    pub fn get_unsigned_float_or(&self, path: &str, default: f32) -> Result<f32> {
        match self
            .typed_value_if_present(path, ValueKind::Float)?
            .and_then(Value::as_f32)
        {
            Some(value) => unsigned_float(value),
            None => Ok(default),
        }
    }

    /// The string at `path`, `None` if it is `null` or `default`.
    pub fn get_string(&self, path: &str) -> Result<Option<&str>> {
        Ok(self
            .typed_value(path, ValueKind::String)?
            .and_then(Value::as_str))
    }

    pub fn get_string_or<'a>(&'a self, path: &str, default: &'a str) -> Result<&'a str> {
        Ok(self
            .typed_value_if_present(path, ValueKind::String)?
            .and_then(Value::as_str)
            .unwrap_or(default))
    }

    /// The raw enum token at `path`, `None` if it is `null` or `default`.
    pub fn get_enum(&self, path: &str) -> Result<Option<&str>> {
        Ok(self.typed_value(path, ValueKind::Enum)?.and_then(Value::as_str))
    }

    pub fn get_enum_or<'a>(&'a self, path: &str, default: &'a str) -> Result<&'a str> {
        Ok(self
            .typed_value_if_present(path, ValueKind::Enum)?
            .and_then(Value::as_str)
            .unwrap_or(default))
    }

    /// The enum at `path` converted to `E`.
    ///
    /// Fails with a type mismatch if the token is not one of `E`'s values.
    pub fn get_enum_as<E: FromStr>(&self, path: &str) -> Result<Option<E>> {
        self.get_enum(path)?.map(parse_enum).transpose()
    }

    pub fn get_enum_as_or<E: FromStr>(&self, path: &str, default: E) -> Result<E> {
        match self
            .typed_value_if_present(path, ValueKind::Enum)?
            .and_then(Value::as_str)
        {
            Some(raw) => parse_enum(raw),
            None => Ok(default),
        }
    }

    array_accessors!(get_boolean_array, get_boolean_array_or, Boolean, bool);
    array_accessors!(get_integer_array, get_integer_array_or, Integer, i32);
    array_accessors!(get_float_array, get_float_array_or, Float, f32);
    array_accessors!(get_string_array, get_string_array_or, String, Option<String>);
    array_accessors!(get_enum_array, get_enum_array_or, Enum, Option<String>);

    /// Like [`Self::get_integer_array`], failing if any item is negative.
    pub fn get_unsigned_integer_array(&self, path: &str) -> Result<Option<Vec<u32>>> {
        self.get_integer_array(path)?.map(unsigned_integers).transpose()
    }

    pub fn get_unsigned_integer_array_or(&self, path: &str, default: &[u32]) -> Result<Vec<u32>> {
        match self.typed_array_if_present(path, ValueKind::Integer)? {
            Some(Array::Integer(items)) => unsigned_integers(items),
            _ => Ok(default.to_vec()),
        }
    }

    /// Like [`Self::get_float_array`], failing if any item is negative.
    pub fn get_unsigned_float_array(&self, path: &str) -> Result<Option<&[f32]>> {
        self.get_float_array(path)?.map(unsigned_floats).transpose()
    }

    pub fn get_unsigned_float_array_or<'a>(
        &'a self,
        path: &str,
        default: &'a [f32],
    ) -> Result<&'a [f32]> {
        match self.typed_array_if_present(path, ValueKind::Float)? {
            Some(Array::Float(items)) => unsigned_floats(items),
            _ => Ok(default),
        }
    }

    /// The enum array at `path` converted to `E`, missing items stay `None`.
    pub fn get_enum_array_as<E: FromStr>(&self, path: &str) -> Result<Option<Vec<Option<E>>>> {
        self.get_enum_array(path)?.map(parse_enums).transpose()
    }

    pub fn get_enum_array_as_or<E: FromStr>(
        &self,
        path: &str,
        default: Vec<Option<E>>,
    ) -> Result<Vec<Option<E>>> {
        match self.typed_array_if_present(path, ValueKind::Enum)? {
            Some(Array::Enum(items)) => parse_enums(items),
            _ => Ok(default),
        }
    }

    /// Whether the property at `path` holds the `default` sentinel.
    pub fn is_default(&self, path: &str) -> Result<bool> {
        Ok(self.get_property(path)?.is_default())
    }

    /// Whether the property at `path` holds `null`.
    pub fn is_null(&self, path: &str) -> Result<bool> {
        Ok(self.get_property(path)?.is_null())
    }

    /// Emit the children of this object as flat events.
    ///
    /// The object's own start and end are not emitted.
    pub fn events<V: Visitor + ?Sized>(&self, visitor: &mut V) -> EventResult<()> {
        for child in &self.children {
            child.events(visitor)?;
        }
        Ok(())
    }

    /// Walk the children of this object with a structured visitor.
    pub fn walk<V: TreeVisitor + ?Sized>(&self, visitor: &mut V) {
        crate::visit::walk_children(self, visitor);
    }

    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.has_name(name))
    }

    fn resolve<'a>(&'a self, full: &str, path: &str) -> Result<&'a Node> {
        let (segment, rest) = split_first(path);
        let node = self
            .child(segment)
            .ok_or_else(|| Error::not_found(full, segment))?;
        match (rest, node) {
            (None, node) => Ok(node),
            (Some(rest), Node::Object(object)) => object.resolve(full, rest),
            (Some(_), other) => Err(Error::not_container(segment, other.kind())),
        }
    }

    fn resolve_mut<'a>(&'a mut self, full: &str, path: &str) -> Result<&'a mut Node> {
        let (segment, rest) = split_first(path);
        let index = self
            .position(segment)
            .ok_or_else(|| Error::not_found(full, segment))?;
        match (rest, &mut self.children[index]) {
            (None, node) => Ok(node),
            (Some(rest), Node::Object(object)) => object.resolve_mut(full, rest),
            (Some(_), other) => Err(Error::not_container(segment, other.kind())),
        }
    }

    /// The object holding the last segment of `path`, and that segment's index in it.
    fn locate_mut(&mut self, path: &str) -> Result<(&mut ObjectNode, usize)> {
        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, path),
        };
        let container = match parent {
            None => self,
            Some(parent) => match self.resolve_mut(path, parent)? {
                Node::Object(object) => object,
                other => return Err(Error::not_container(parent, other.kind())),
            },
        };
        let index = container
            .position(last)
            .ok_or_else(|| Error::not_found(path, last))?;
        Ok((container, index))
    }

    fn index_of_node(&self, reference: &Node) -> Result<usize> {
        self.children
            .iter()
            .position(|child| child == reference)
            .ok_or_else(|| {
                let label = match reference {
                    Node::Comment(comment) => format!("//{}", comment.text()),
                    other => other.name().unwrap_or_default().to_string(),
                };
                Error::not_found(&label, &label)
            })
    }

    /// The property value at `path`; `None` for `null`/`default`.
    fn typed_value(&self, path: &str, expected: ValueKind) -> Result<Option<&Value>> {
        let value = self.get_property(path)?.value();
        match value.kind() {
            kind if kind.is_sentinel() => Ok(None),
            kind if kind == expected => Ok(Some(value)),
            kind => Err(Error::value_kind(expected, kind)),
        }
    }

    /// Like [`Self::typed_value`], with absent paths treated as `None`.
    fn typed_value_if_present(&self, path: &str, expected: ValueKind) -> Result<Option<&Value>> {
        if !self.is_present(path) {
            return Ok(None);
        }
        self.typed_value(path, expected)
    }

    fn typed_array(&self, path: &str, item: ValueKind) -> Result<Option<&Array>> {
        checked_array(self.typed_value(path, ValueKind::Array)?, item)
    }

    fn typed_array_if_present(&self, path: &str, item: ValueKind) -> Result<Option<&Array>> {
        checked_array(self.typed_value_if_present(path, ValueKind::Array)?, item)
    }
}

/// Arrays of `item`, and untyped arrays, pass; typed arrays of anything else fail.
/// Reject named nodes whose name is empty.
fn checked_node(node: Node) -> Result<Node> {
    match node.name() {
        Some("") => Err(Error::InvalidName(String::new())),
        _ => Ok(node),
    }
}

fn checked_array(value: Option<&Value>, item: ValueKind) -> Result<Option<&Array>> {
    match value {
        Some(Value::Array(Array::Null)) => Ok(None),
        Some(Value::Array(array)) if array.item_type() == item => Ok(Some(array)),
        Some(Value::Array(array)) => Err(Error::TypeMismatch {
            expected: format!("array of {item}"),
            found: format!("array of {}", array.item_type()),
        }),
        _ => Ok(None),
    }
}

fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((segment, rest)) => (segment, Some(rest)),
        None => (path, None),
    }
}

fn unsigned_float(value: f32) -> Result<f32> {
    if value < 0.0 {
        return Err(Error::negative(value));
    }
    Ok(value)
}

fn unsigned_integers(items: &[i32]) -> Result<Vec<u32>> {
    items
        .iter()
        .map(|&v| u32::try_from(v).map_err(|_| Error::negative(v)))
        .collect()
}

fn unsigned_floats(items: &[f32]) -> Result<&[f32]> {
    match items.iter().find(|v| **v < 0.0) {
        Some(v) => Err(Error::negative(v)),
        None => Ok(items),
    }
}

fn parse_enum<E: FromStr>(raw: &str) -> Result<E> {
    raw.parse().map_err(|_| Error::TypeMismatch {
        expected: format!("value of enum {}", type_name::<E>()),
        found: format!("\"{raw}\""),
    })
}

fn parse_enums<E: FromStr>(items: &[Option<String>]) -> Result<Vec<Option<E>>> {
    items
        .iter()
        .map(|item| item.as_deref().map(parse_enum).transpose())
        .collect()
}

impl NamedNode for ObjectNode {
    fn name(&self) -> &str {
        ObjectNode::name(self)
    }

    fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        ObjectNode::set_name(self, name)
    }
}

impl<'a> IntoIterator for &'a ObjectNode {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl Extend<Node> for ObjectNode {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        for node in iter {
            self.append(node);
        }
    }
}
