//! The flat event visitor.

use std::borrow::Cow;

use crate::{Event, Result};

/// A consumer of a flat Candle event stream.
///
/// Implementors only need [`Visitor::event`]; the remaining methods build the
/// matching [`Event`] and forward it. Returning an error stops the producer.
pub trait Visitor {
    /// Receive one event.
    fn event(&mut self, event: Event<'_>) -> Result<()>;

    fn object(&mut self, name: &str) -> Result<()> {
        self.event(Event::Object {
            name: Cow::Borrowed(name),
        })
    }

    fn object_end(&mut self) -> Result<()> {
        self.event(Event::ObjectEnd)
    }

    fn property(&mut self, name: &str) -> Result<()> {
        self.event(Event::Property {
            name: Cow::Borrowed(name),
        })
    }

    fn array(&mut self) -> Result<()> {
        self.event(Event::ArrayStart)
    }

    fn array_end(&mut self) -> Result<()> {
        self.event(Event::ArrayEnd)
    }

    fn comment(&mut self, text: &str) -> Result<()> {
        self.event(Event::Comment {
            text: Cow::Borrowed(text),
        })
    }

    fn boolean(&mut self, value: bool) -> Result<()> {
        self.event(Event::Boolean(value))
    }

    fn integer(&mut self, value: i32) -> Result<()> {
        self.event(Event::Integer(value))
    }

    fn float(&mut self, value: f32) -> Result<()> {
        self.event(Event::Float(value))
    }

    fn string(&mut self, value: &str) -> Result<()> {
        self.event(Event::String(Cow::Borrowed(value)))
    }

    fn enumeration(&mut self, value: &str) -> Result<()> {
        self.event(Event::Enum(Cow::Borrowed(value)))
    }

    fn null(&mut self) -> Result<()> {
        self.event(Event::Null)
    }

    fn default_value(&mut self) -> Result<()> {
        self.event(Event::Default)
    }
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        (**self).event(event)
    }
}

/// Records every event it receives.
impl Visitor for Vec<Event<'static>> {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.push(event.into_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder() {
        let mut events: Vec<Event<'static>> = Vec::new();
        events.object("o").unwrap();
        events.property("n").unwrap();
        events.integer(42).unwrap();
        events.object_end().unwrap();
        assert_eq!(
            events,
            vec![
                Event::Object { name: "o".into() },
                Event::Property { name: "n".into() },
                Event::Integer(42),
                Event::ObjectEnd,
            ]
        );
    }

    #[test]
    fn test_forward_through_reference() {
        fn emit(mut visitor: impl Visitor) {
            visitor.comment("hi").unwrap();
        }

        let mut events: Vec<Event<'static>> = Vec::new();
        emit(&mut events);
        assert_eq!(events, vec![Event::Comment { text: "hi".into() }]);
    }
}
