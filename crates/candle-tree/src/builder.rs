//! Builds a [`Document`] from a flat event stream.

use candle_parse::{
    Error as EventError, Event, GrammarViolation, Result as EventResult, ValidationVisitor,
    ValueKind, Visitor,
};
use tracing::trace;

use crate::{Array, CommentNode, Document, ObjectNode, PropertyNode, Result, Value};

/// A [`Visitor`] that assembles events into a document tree.
///
/// Every event is validated before it touches the tree, so a builder that
/// returned no error from any event holds a well-formed partial document.
/// A builder serves exactly one event stream.
#[derive(Debug)]
pub struct TreeBuilder {
    validator: ValidationVisitor,
    /// Open objects. The first entry is the document root and is never popped.
    stack: Vec<ObjectNode>,
    /// Name of the property waiting for its value.
    pending: Option<String>,
    /// Items of the array being collected.
    items: Option<Vec<Value>>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            validator: ValidationVisitor::new(),
            stack: vec![ObjectNode::root()],
            pending: None,
            items: None,
        }
    }

    /// Finish the stream and hand back the document.
    pub fn finish(mut self) -> Result<Document> {
        self.validator.finish()?;
        match self.stack.pop() {
            Some(root) if self.stack.is_empty() => Ok(Document::from_root(root)),
            _ => Err(GrammarViolation::new("object end", "end of input").into()),
        }
    }

    fn current(&mut self) -> EventResult<&mut ObjectNode> {
        self.stack.last_mut().ok_or_else(|| {
            EventError::from(GrammarViolation::new("object", "missing document root"))
        })
    }

    fn complete_property(&mut self, value: Value) -> EventResult<()> {
        let name = self
            .pending
            .take()
            .ok_or_else(|| GrammarViolation::new("property", "value"))?;
        trace!(%name, kind = %value.kind(), "property");
        self.current()?.append(PropertyNode::new(name, value));
        Ok(())
    }
}

impl Visitor for TreeBuilder {
    fn event(&mut self, event: Event<'_>) -> EventResult<()> {
        self.validator.check(&event)?;

        match event {
            Event::Object { name } => {
                trace!(%name, depth = self.stack.len(), "open object");
                self.stack.push(ObjectNode::new(name.into_owned()));
            }
            Event::ObjectEnd => {
                if self.stack.len() < 2 {
                    return Err(
                        GrammarViolation::new("object, property or comment", "object end").into(),
                    );
                }
                if let Some(object) = self.stack.pop() {
                    trace!(name = object.name(), "close object");
                    self.current()?.append(object);
                }
            }
            Event::Property { name } => self.pending = Some(name.into_owned()),
            Event::Comment { text } => {
                self.current()?.append(CommentNode::new(text.into_owned()));
            }
            Event::ArrayStart => self.items = Some(Vec::new()),
            Event::ArrayEnd => {
                let items = self.items.take().unwrap_or_default();
                let array = collect_array(items)?;
                self.complete_property(Value::Array(array))?;
            }
            Event::Boolean(value) => self.value(Value::Boolean(value))?,
            Event::Integer(value) => self.value(Value::Integer(value))?,
            Event::Float(value) => self.value(Value::Float(value))?,
            Event::String(value) => self.value(Value::String(value.into_owned()))?,
            Event::Enum(value) => self.value(Value::Enum(value.into_owned()))?,
            Event::Null => self.value(Value::Null)?,
            Event::Default => self.value(Value::Default)?,
        }
        Ok(())
    }
}

impl TreeBuilder {
    /// Route a value into the open array, or complete the pending property.
    fn value(&mut self, value: Value) -> EventResult<()> {
        match &mut self.items {
            Some(items) => {
                items.push(value);
                Ok(())
            }
            None => self.complete_property(value),
        }
    }
}

/// Turn buffered array items into a typed array.
///
/// The first non-null item decides the type. Nulls become the missing slot
/// of string and enum arrays and the zero value of the others.
fn collect_array(items: Vec<Value>) -> EventResult<Array> {
    let Some(kind) = items.iter().find(|item| !item.is_null()).map(Value::kind) else {
        return Ok(Array::Null);
    };

    let array = match kind {
        ValueKind::Boolean => Array::Boolean(convert(
            items,
            kind,
            || false,
            |item| match item {
                Value::Boolean(value) => Some(value),
                _ => None,
            },
        )?),
        ValueKind::Integer => Array::Integer(convert(
            items,
            kind,
            || 0,
            |item| match item {
                Value::Integer(value) => Some(value),
                _ => None,
            },
        )?),
        ValueKind::Float => Array::Float(convert(
            items,
            kind,
            || 0.0,
            |item| match item {
                Value::Float(value) => Some(value),
                _ => None,
            },
        )?),
        ValueKind::String => Array::String(convert(
            items,
            kind,
            || None,
            |item| match item {
                Value::String(value) => Some(Some(value)),
                _ => None,
            },
        )?),
        ValueKind::Enum => Array::Enum(convert(
            items,
            kind,
            || None,
            |item| match item {
                Value::Enum(value) => Some(Some(value)),
                _ => None,
            },
        )?),
        other => {
            return Err(GrammarViolation::new("value or array end", other.to_string()).into());
        }
    };
    Ok(array)
}

fn convert<T>(
    items: Vec<Value>,
    kind: ValueKind,
    missing: impl Fn() -> T,
    item: impl Fn(Value) -> Option<T>,
) -> EventResult<Vec<T>> {
    items
        .into_iter()
        .map(|value| {
            if value.is_null() {
                return Ok(missing());
            }
            let found = value.kind();
            item(value).ok_or_else(|| {
                EventError::from(GrammarViolation::new(
                    format!("value of type {kind}"),
                    found.to_string(),
                ))
            })
        })
        .collect()
}
