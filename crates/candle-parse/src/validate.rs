//! Grammar validation for flat event streams.
//!
//! The validator knows nothing about concrete syntax. It only checks that
//! events arrive in an order the format allows:
//!
//! - every value is preceded by a property name (or sits inside an array)
//! - arrays do not nest and hold items of a single type
//! - `null` appears in arrays only while untyped or in string/enum arrays
//! - `default` never appears inside an array
//! - object ends match object starts
//! - object and property names are non-empty
//!
//! The first violation aborts; there is no recovery.

use tracing::trace;

use crate::{Event, GrammarViolation, Result, ValueKind, Visitor};

const MEMBER: &str = "object, property or comment";
const VALUE: &str = "value";
const ARRAY_ITEM: &str = "value or array end";

/// Item type of the currently open array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayItems {
    /// No non-null item seen yet.
    Pending,
    /// Established by the first non-null item.
    Typed(ValueKind),
}

/// State machine that rejects event sequences the grammar does not allow.
#[derive(Debug, Clone, Default)]
pub struct ValidationVisitor {
    object_depth: usize,
    array: Option<ArrayItems>,
    expecting_value: bool,
}

impl ValidationVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open objects.
    pub fn object_depth(&self) -> usize {
        self.object_depth
    }

    /// Whether a property name has been seen and its value has not.
    pub fn is_expecting_value(&self) -> bool {
        self.expecting_value
    }

    /// Whether an array is open.
    pub fn in_array(&self) -> bool {
        self.array.is_some()
    }

    /// Check one event and advance the state machine.
    pub fn check(&mut self, event: &Event<'_>) -> Result<()> {
        trace!(?event, depth = self.object_depth, "validate");
        if let Some(kind) = event.value_kind() {
            return self.check_value(kind);
        }
        match event {
            Event::Property { name } => {
                self.expect_member(event)?;
                expect_name(name)?;
                self.expecting_value = true;
            }
            Event::Object { name } => {
                self.expect_member(event)?;
                expect_name(name)?;
                self.object_depth += 1;
            }
            Event::Comment { .. } => self.expect_member(event)?,
            Event::ObjectEnd => {
                self.expect_member(event)?;
                if self.object_depth == 0 {
                    return Err(violation(MEMBER, event));
                }
                self.object_depth -= 1;
            }
            Event::ArrayStart => {
                if !self.expecting_value {
                    return Err(violation(MEMBER, event));
                }
                if self.array.is_some() {
                    return Err(violation(VALUE, event));
                }
                self.array = Some(ArrayItems::Pending);
            }
            Event::ArrayEnd => {
                if self.array.is_none() {
                    let expected = if self.expecting_value { VALUE } else { MEMBER };
                    return Err(violation(expected, event));
                }
                self.array = None;
                self.expecting_value = false;
            }
            // Values were handled above.
            Event::Boolean(_)
            | Event::Integer(_)
            | Event::Float(_)
            | Event::String(_)
            | Event::Enum(_)
            | Event::Null
            | Event::Default => {}
        }
        Ok(())
    }

    /// Confirm the stream may end here.
    pub fn finish(&self) -> Result<()> {
        if self.array.is_some() {
            return Err(GrammarViolation::new(ARRAY_ITEM, "end of input").into());
        }
        if self.expecting_value {
            return Err(GrammarViolation::new(VALUE, "end of input").into());
        }
        if self.object_depth > 0 {
            return Err(GrammarViolation::new("object end", "end of input").into());
        }
        Ok(())
    }

    fn check_value(&mut self, kind: ValueKind) -> Result<()> {
        if !self.expecting_value {
            return Err(GrammarViolation::new(MEMBER, VALUE).into());
        }

        let Some(items) = self.array else {
            self.expecting_value = false;
            return Ok(());
        };

        match (items, kind) {
            (_, ValueKind::Default) => {
                return Err(GrammarViolation::new(ARRAY_ITEM, "default").into());
            }
            (ArrayItems::Pending, ValueKind::Null) => {}
            (ArrayItems::Pending, kind) => self.array = Some(ArrayItems::Typed(kind)),
            (ArrayItems::Typed(item), ValueKind::Null) if item.accepts_null_items() => {}
            (ArrayItems::Typed(item), kind) if item == kind => {}
            (ArrayItems::Typed(item), kind) => {
                return Err(GrammarViolation::new(
                    format!("value of type {item}"),
                    kind.to_string(),
                )
                .into());
            }
        }
        Ok(())
    }

    fn expect_member(&self, event: &Event<'_>) -> Result<()> {
        if self.array.is_some() {
            return Err(violation(ARRAY_ITEM, event));
        }
        if self.expecting_value {
            return Err(violation(VALUE, event));
        }
        Ok(())
    }
}

fn expect_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GrammarViolation::new("name", "empty name").into());
    }
    Ok(())
}

fn violation(expected: &'static str, event: &Event<'_>) -> crate::Error {
    GrammarViolation::new(expected, event.category()).into()
}

impl Visitor for ValidationVisitor {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.check(&event)
    }
}

/// Runs every event through a [`ValidationVisitor`] before forwarding it.
///
/// Invalid events never reach the inner visitor.
#[derive(Debug, Default)]
pub struct Validated<V> {
    validator: ValidationVisitor,
    inner: V,
}

impl<V> Validated<V> {
    pub fn new(inner: V) -> Self {
        Self {
            validator: ValidationVisitor::new(),
            inner,
        }
    }

    /// Check that the stream is complete and hand back the inner visitor.
    pub fn finish(self) -> Result<V> {
        self.validator.finish()?;
        Ok(self.inner)
    }

    /// Hand back the inner visitor without checking for completeness.
    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V: Visitor> Visitor for Validated<V> {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.validator.check(&event)?;
        self.inner.event(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn run(events: &[Event<'_>]) -> Result<ValidationVisitor> {
        candle_testhelpers::setup();
        let mut visitor = ValidationVisitor::new();
        for event in events {
            visitor.check(event)?;
        }
        Ok(visitor)
    }

    fn prop(name: &str) -> Event<'_> {
        Event::Property { name: name.into() }
    }

    fn expect_violation(events: &[Event<'_>]) -> GrammarViolation {
        match run(events) {
            Err(Error::Grammar(violation)) => violation,
            other => panic!("expected a grammar violation, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_array() {
        expect_violation(&[prop("p"), Event::ArrayStart, Event::ArrayStart]);
    }

    #[test]
    fn test_default_in_array() {
        let v = expect_violation(&[prop("p"), Event::ArrayStart, Event::Default]);
        assert_eq!(v.found, "default");
    }

    #[test]
    fn test_early_array() {
        let v = expect_violation(&[Event::ArrayStart]);
        assert_eq!(v.to_string(), "Expected object, property or comment but got array");
    }

    #[test]
    fn test_early_array_end() {
        let v = expect_violation(&[prop("p"), Event::ArrayEnd]);
        assert_eq!(v.to_string(), "Expected value but got array end");
    }

    #[test]
    fn test_early_values() {
        for event in [
            Event::Boolean(true),
            Event::Default,
            Event::Enum("TEST1".into()),
            Event::Float(42.0),
            Event::Integer(42),
            Event::Null,
            Event::String("x".into()),
        ] {
            let v = expect_violation(&[event]);
            assert_eq!(v.to_string(), "Expected object, property or comment but got value");
        }
    }

    #[test]
    fn test_early_object_end() {
        expect_violation(&[Event::ObjectEnd]);
    }

    #[test]
    fn test_late_comment() {
        let v = expect_violation(&[prop("p"), Event::Comment { text: "c".into() }]);
        assert_eq!(v.to_string(), "Expected value but got comment");
    }

    #[test]
    fn test_late_object() {
        expect_violation(&[prop("p"), Event::Object { name: "o".into() }]);
    }

    #[test]
    fn test_empty_names() {
        let v = expect_violation(&[prop("")]);
        assert_eq!(v.to_string(), "Expected name but got empty name");
        expect_violation(&[Event::Object { name: "".into() }]);
        expect_violation(&[Event::Object { name: "o".into() }, prop("")]);
    }

    #[test]
    fn test_late_property() {
        expect_violation(&[prop("p"), prop("q")]);
    }

    #[test]
    fn test_object_end_while_expecting_value() {
        expect_violation(&[Event::Object { name: "o".into() }, prop("p"), Event::ObjectEnd]);
    }

    #[test]
    fn test_comment_inside_array() {
        let v = expect_violation(&[
            prop("p"),
            Event::ArrayStart,
            Event::Comment { text: "c".into() },
        ]);
        assert_eq!(v.expected, "value or array end");
    }

    #[test]
    fn test_mixed_arrays() {
        let cases = [
            (Event::Boolean(true), Event::Integer(42)),
            (Event::Enum("TEST1".into()), Event::Integer(42)),
            (Event::Float(42.0), Event::Integer(42)),
            (Event::Integer(42), Event::Float(42.0)),
            (Event::String("a".into()), Event::Enum("A".into())),
        ];
        for (first, second) in cases {
            expect_violation(&[prop("p"), Event::ArrayStart, first, second]);
        }
    }

    #[test]
    fn test_mixed_array_message() {
        let v = expect_violation(&[
            prop("p"),
            Event::ArrayStart,
            Event::Integer(1),
            Event::Float(1.0),
        ]);
        assert_eq!(v.to_string(), "Expected value of type Integer but got Float");
    }

    #[test]
    fn test_null_in_non_nullable_arrays() {
        for first in [Event::Boolean(true), Event::Float(42.0), Event::Integer(42)] {
            expect_violation(&[prop("p"), Event::ArrayStart, first, Event::Null]);
        }
    }

    #[test]
    fn test_integer_array_with_trailing_null() {
        expect_violation(&[
            prop("x"),
            Event::ArrayStart,
            Event::Integer(1),
            Event::Integer(2),
            Event::Null,
            Event::ArrayEnd,
        ]);
    }

    #[test]
    fn test_null_in_nullable_arrays() {
        run(&[
            prop("x"),
            Event::ArrayStart,
            Event::String("a".into()),
            Event::String("a".into()),
            Event::Null,
            Event::ArrayEnd,
        ])
        .unwrap();
        run(&[
            prop("x"),
            Event::ArrayStart,
            Event::Enum("TEST1".into()),
            Event::Null,
            Event::ArrayEnd,
        ])
        .unwrap();
    }

    #[test]
    fn test_leading_nulls_keep_array_untyped() {
        // Leading nulls are accepted before the type is known, even for
        // kinds that would reject them later.
        run(&[
            prop("x"),
            Event::ArrayStart,
            Event::Null,
            Event::Null,
            Event::Integer(1),
            Event::ArrayEnd,
        ])
        .unwrap();
    }

    #[test]
    fn test_success() {
        let mut events = Vec::new();
        let arrays: [&[Event<'_>]; 5] = [
            &[Event::Boolean(true), Event::Boolean(false), Event::Boolean(true)],
            &[Event::Enum("TEST1".into()), Event::Enum("TEST2".into())],
            &[Event::Float(1.1), Event::Float(1.2), Event::Float(1.3)],
            &[Event::Integer(21), Event::Integer(42), Event::Integer(84)],
            &[Event::String("a".into()), Event::Null],
        ];
        for items in arrays {
            events.push(prop("property1"));
            events.push(Event::ArrayStart);
            events.extend(items.iter().cloned());
            events.push(Event::ArrayEnd);
        }
        events.push(prop("empty"));
        events.push(Event::ArrayStart);
        events.push(Event::ArrayEnd);
        events.push(Event::Object { name: "o".into() });
        events.push(Event::Comment { text: "c".into() });
        events.push(prop("d"));
        events.push(Event::Default);
        events.push(prop("n"));
        events.push(Event::Null);
        events.push(Event::ObjectEnd);

        let visitor = run(&events).unwrap();
        assert_eq!(visitor.object_depth(), 0);
        assert!(!visitor.is_expecting_value());
        visitor.finish().unwrap();
    }

    #[test]
    fn test_finish_incomplete() {
        let open_object = run(&[Event::Object { name: "o".into() }]).unwrap();
        assert!(open_object.finish().is_err());

        let pending = run(&[prop("p")]).unwrap();
        assert!(pending.finish().is_err());

        let open_array = run(&[prop("p"), Event::ArrayStart]).unwrap();
        assert!(open_array.in_array());
        assert!(open_array.finish().is_err());
    }

    #[test]
    fn test_validated_blocks_invalid_events() {
        let mut validated = Validated::new(Vec::<Event<'static>>::new());
        validated.property("p").unwrap();
        validated.integer(1).unwrap();
        assert!(validated.integer(2).is_err());
        assert_eq!(
            validated.into_inner(),
            vec![Event::Property { name: "p".into() }, Event::Integer(1)]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn item() -> impl Strategy<Value = Event<'static>> {
            prop_oneof![
                any::<bool>().prop_map(Event::Boolean),
                any::<i32>().prop_map(Event::Integer),
                (-1.0e6f32..1.0e6).prop_map(Event::Float),
                "[a-z]{0,6}".prop_map(|s| Event::String(s.into())),
                "[A-Z]{1,6}".prop_map(|s| Event::Enum(s.into())),
                Just(Event::Null),
            ]
        }

        proptest! {
            #[test]
            fn array_acceptance_matches_homogeneity(items in prop::collection::vec(item(), 0..8)) {
                let mut events = vec![prop("p"), Event::ArrayStart];
                events.extend(items.iter().cloned());
                events.push(Event::ArrayEnd);

                let mut first: Option<ValueKind> = None;
                let mut legal = true;
                for kind in items.iter().filter_map(Event::value_kind) {
                    match (first, kind) {
                        (None, ValueKind::Null) => {}
                        (None, kind) => first = Some(kind),
                        (Some(f), ValueKind::Null) => legal &= f.accepts_null_items(),
                        (Some(f), kind) => legal &= f == kind,
                    }
                }

                prop_assert_eq!(run(&events).is_ok(), legal);
            }
        }
    }
}
