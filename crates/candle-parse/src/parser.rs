//! Recursive-descent parser turning Candle text into events.

use std::borrow::Cow;

use tracing::debug;

use crate::{LexerError, ParserError, Result, Span, Token, TokenKind, Tokenizer, Visitor};

/// Event-based parser for Candle documents.
///
/// The parser checks syntax only. Whether the resulting events form a valid
/// document is up to the visitor; wrap it in [`crate::Validated`] to enforce
/// the grammar as events are produced.
pub struct Parser<'src> {
    source: &'src str,
    tokenizer: Tokenizer<'src>,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokenizer: Tokenizer::new(source),
        }
    }

    /// Parse the whole document, emitting events to `visitor`.
    ///
    /// Stops at the first lexer, parser or visitor error.
    pub fn parse<V: Visitor + ?Sized>(mut self, visitor: &mut V) -> Result<()> {
        debug!(len = self.source.len(), "parsing document");
        self.members(visitor, None)?;
        debug!("document parsed");
        Ok(())
    }

    /// Parse object members until `}` (when `open` is set) or end of input.
    fn members<V: Visitor + ?Sized>(
        &mut self,
        visitor: &mut V,
        open: Option<Span>,
    ) -> Result<()> {
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Eof => {
                    return match open {
                        Some(span) => {
                            Err(ParserError::new("unclosed object, expected `}`", span).into())
                        }
                        None => Ok(()),
                    };
                }
                TokenKind::RBrace => {
                    if open.is_none() {
                        return Err(ParserError::new(
                            "unexpected `}` outside of an object",
                            token.span,
                        )
                        .into());
                    }
                    return visitor.object_end();
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    visitor.comment(comment_text(&token))?;
                }
                TokenKind::Identifier => self.member(visitor, token)?,
                _ => {
                    return Err(ParserError::new(
                        format!("expected a property or object name, found {}", describe(&token)),
                        token.span,
                    )
                    .into());
                }
            }
        }
    }

    /// Parse what follows a member name: `= value` or `{ members }`.
    fn member<V: Visitor + ?Sized>(&mut self, visitor: &mut V, name: Token<'src>) -> Result<()> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Equals => {
                visitor.property(name.text)?;
                let value = self.next_value_token(visitor)?;
                self.value(visitor, value)
            }
            TokenKind::LBrace => {
                visitor.object(name.text)?;
                self.members(visitor, Some(Span::new(name.span.start, token.span.end)))
            }
            _ => Err(ParserError::new(
                format!("expected `=` or `{{` after `{}`, found {}", name.text, describe(&token)),
                token.span,
            )
            .into()),
        }
    }

    /// Emit the value that starts with `token`.
    fn value<V: Visitor + ?Sized>(&mut self, visitor: &mut V, token: Token<'src>) -> Result<()> {
        match token.kind {
            TokenKind::Identifier => match token.text {
                "true" => visitor.boolean(true),
                "false" => visitor.boolean(false),
                "null" => visitor.null(),
                "default" => visitor.default_value(),
                other => visitor.enumeration(other),
            },
            TokenKind::Integer => match parse_integer(token.text) {
                Some(value) => visitor.integer(value),
                None => Err(ParserError::new(
                    format!("integer literal `{}` does not fit in 32 bits", token.text),
                    token.span,
                )
                .into()),
            },
            TokenKind::Float => match parse_float(token.text) {
                Some(value) if value.is_finite() => visitor.float(value),
                Some(_) => Err(ParserError::new(
                    format!("float literal `{}` does not fit in 32 bits", token.text),
                    token.span,
                )
                .into()),
                None => Err(ParserError::new(
                    format!("invalid float literal `{}`", token.text),
                    token.span,
                )
                .into()),
            },
            TokenKind::QuotedString => {
                let inner = &token.text[1..token.text.len() - 1];
                let value = unescape(inner).map_err(|e| {
                    let start = token.span.start + 1 + e.offset as u32;
                    LexerError::at(self.source, Span::new(start, start + e.len as u32), e.message)
                })?;
                visitor.string(&value)
            }
            TokenKind::LBracket => self.array(visitor),
            _ => Err(ParserError::new(
                format!("expected a value, found {}", describe(&token)),
                token.span,
            )
            .into()),
        }
    }

    /// Parse the rest of an array after `[`.
    fn array<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
        visitor.array()?;
        loop {
            let token = self.next_value_token(visitor)?;
            if token.kind == TokenKind::RBracket {
                return visitor.array_end();
            }
            self.value(visitor, token)?;

            let separator = self.next_value_token(visitor)?;
            match separator.kind {
                TokenKind::Comma => {}
                TokenKind::RBracket => return visitor.array_end(),
                _ => {
                    return Err(ParserError::new(
                        format!("expected `,` or `]`, found {}", describe(&separator)),
                        separator.span,
                    )
                    .into());
                }
            }
        }
    }

    /// Next significant token in value position; comments are forwarded.
    fn next_value_token<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> Result<Token<'src>> {
        loop {
            let token = self.next_token()?;
            if token.kind.is_comment() {
                visitor.comment(comment_text(&token))?;
            } else {
                return Ok(token);
            }
        }
    }

    /// Next token that is not whitespace, turning error tokens into lexer errors.
    fn next_token(&mut self) -> Result<Token<'src>> {
        loop {
            let token = self.tokenizer.next_token();
            match token.kind {
                kind if kind.is_trivia() => continue,
                TokenKind::Error => {
                    let message = lexer_message(&token);
                    return Err(LexerError::at(self.source, token.span, message).into());
                }
                _ => return Ok(token),
            }
        }
    }
}

/// Text of a comment token without its delimiters.
fn comment_text<'src>(token: &Token<'src>) -> &'src str {
    match token.kind {
        TokenKind::BlockComment => &token.text[2..token.text.len() - 2],
        _ => &token.text[2..],
    }
}

fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("`{}`", token.text),
    }
}

fn lexer_message(token: &Token<'_>) -> String {
    let text = token.text;
    if text.starts_with('"') {
        "unterminated string literal".to_string()
    } else if text.starts_with("/*") {
        "unterminated block comment".to_string()
    } else if text.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        && text.len() > 1
    {
        format!("malformed number literal `{text}`")
    } else {
        format!("unexpected character `{text}`")
    }
}

/// Decimal or `0x` hexadecimal integer with an optional sign.
fn parse_integer(text: &str) -> Option<i32> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn parse_float(text: &str) -> Option<f32> {
    text.trim_end_matches(['f', 'F']).parse().ok()
}

struct EscapeError {
    /// Byte offset of the backslash within the string body.
    offset: usize,
    /// Length in bytes of the offending escape.
    len: usize,
    message: String,
}

/// Resolve escape sequences in the body of a quoted string.
fn unescape(body: &str) -> std::result::Result<Cow<'_, str>, EscapeError> {
    if !body.contains('\\') {
        return Ok(Cow::Borrowed(body));
    }

    let mut result = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let invalid = |len: usize, message: String| EscapeError { offset, len, message };
        match chars.next() {
            Some((_, '\\')) => result.push('\\'),
            Some((_, '"')) => result.push('"'),
            Some((_, '/')) => result.push('/'),
            Some((_, 'b')) => result.push('\u{8}'),
            Some((_, 'f')) => result.push('\u{c}'),
            Some((_, 'n')) => result.push('\n'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, 't')) => result.push('\t'),
            Some((_, 'u')) => {
                let high = read_hex4(body, offset + 2)
                    .ok_or_else(|| invalid(2, "expected 4 hex digits after `\\u`".to_string()))?;
                skip(&mut chars, 4);

                let code = if (0xD800..0xDC00).contains(&high) {
                    let low = body
                        .get(offset + 6..offset + 8)
                        .filter(|s| *s == "\\u")
                        .and_then(|_| read_hex4(body, offset + 8))
                        .filter(|low| (0xDC00..0xE000).contains(low))
                        .ok_or_else(|| {
                            invalid(6, "unpaired surrogate in unicode escape".to_string())
                        })?;
                    skip(&mut chars, 6);
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };

                let ch = char::from_u32(code)
                    .ok_or_else(|| invalid(6, format!("invalid unicode escape `\\u{high:04X}`")))?;
                result.push(ch);
            }
            Some((_, other)) => {
                let message = format!("invalid escape sequence `\\{other}`");
                return Err(invalid(1 + other.len_utf8(), message));
            }
            None => return Err(invalid(1, "dangling `\\` at end of string".to_string())),
        }
    }

    Ok(Cow::Owned(result))
}

fn read_hex4(body: &str, at: usize) -> Option<u32> {
    let digits = body.get(at..at + 4)?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn skip(chars: &mut impl Iterator<Item = (usize, char)>, n: usize) {
    for _ in 0..n {
        chars.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Event};

    fn events(source: &str) -> Vec<Event<'static>> {
        candle_testhelpers::setup();
        let mut events = Vec::new();
        Parser::new(source).parse(&mut events).unwrap();
        events
    }

    fn error(source: &str) -> Error {
        let mut events: Vec<Event<'static>> = Vec::new();
        Parser::new(source).parse(&mut events).unwrap_err()
    }

    #[test]
    fn test_empty() {
        assert!(events("").is_empty());
        assert!(events(" \n\t\r\n").is_empty());
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            events("a = true\nb = false\nc = null\nd = default\ne = VALUE1"),
            vec![
                Event::Property { name: "a".into() },
                Event::Boolean(true),
                Event::Property { name: "b".into() },
                Event::Boolean(false),
                Event::Property { name: "c".into() },
                Event::Null,
                Event::Property { name: "d".into() },
                Event::Default,
                Event::Property { name: "e".into() },
                Event::Enum("VALUE1".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            events("a = 1234 b = -1234 c = 0xFF d = 1.5 e = -2.5f"),
            vec![
                Event::Property { name: "a".into() },
                Event::Integer(1234),
                Event::Property { name: "b".into() },
                Event::Integer(-1234),
                Event::Property { name: "c".into() },
                Event::Integer(255),
                Event::Property { name: "d".into() },
                Event::Float(1.5),
                Event::Property { name: "e".into() },
                Event::Float(-2.5),
            ]
        );
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(events("a = -2147483648")[1], Event::Integer(i32::MIN));
        assert_eq!(events("a = 0x7FFFFFFF")[1], Event::Integer(i32::MAX));
        assert!(matches!(error("a = 2147483648"), Error::Parser(_)));
    }

    #[test]
    fn test_float_bounds() {
        assert_eq!(events("a = 3.4e38")[1], Event::Float(3.4e38));
        assert_eq!(events("a = -1e-50")[1], Event::Float(-0.0));
        for source in ["a = 1e39", "a = -1e39", "a = [1.0, 1e40f]"] {
            match error(source) {
                Error::Parser(e) => assert!(
                    e.message.ends_with("does not fit in 32 bits"),
                    "unexpected message {:?}",
                    e.message
                ),
                other => panic!("expected parser error for {source:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_string_escapes() {
        let parsed = events(r#"s = "a\"b\\c\bd\fe\nf\rg\th\/i\u2764j\uD83D\uDE00""#);
        assert_eq!(
            parsed[1],
            Event::String("a\"b\\c\u{8}d\u{c}e\nf\rg\th/i\u{2764}j\u{1F600}".into())
        );
    }

    #[test]
    fn test_invalid_escape() {
        match error(r#"s = "a\qb""#) {
            Error::Lexer(e) => {
                assert_eq!((e.line, e.column), (1, 7));
                assert_eq!(e.message, "invalid escape sequence `\\q`");
            }
            other => panic!("expected lexer error, got {other:?}"),
        }
        assert!(matches!(error(r#"s = "\uD83D""#), Error::Lexer(_)));
        assert!(matches!(error(r#"s = "\u12""#), Error::Lexer(_)));
    }

    #[test]
    fn test_objects_and_comments() {
        assert_eq!(
            events("// top\nouter {\n\t/* in\nside */\n\tinner { x = 1 }\n}"),
            vec![
                Event::Comment { text: " top".into() },
                Event::Object { name: "outer".into() },
                Event::Comment { text: " in\nside ".into() },
                Event::Object { name: "inner".into() },
                Event::Property { name: "x".into() },
                Event::Integer(1),
                Event::ObjectEnd,
                Event::ObjectEnd,
            ]
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            events("a = []\nb = [1, 2,]\nc = [\n\t\"x\",\n\tnull\n]"),
            vec![
                Event::Property { name: "a".into() },
                Event::ArrayStart,
                Event::ArrayEnd,
                Event::Property { name: "b".into() },
                Event::ArrayStart,
                Event::Integer(1),
                Event::Integer(2),
                Event::ArrayEnd,
                Event::Property { name: "c".into() },
                Event::ArrayStart,
                Event::String("x".into()),
                Event::Null,
                Event::ArrayEnd,
            ]
        );
    }

    #[test]
    fn test_comment_in_value_position_is_forwarded() {
        assert_eq!(
            events("a = // why\n1"),
            vec![
                Event::Property { name: "a".into() },
                Event::Comment { text: " why".into() },
                Event::Integer(1),
            ]
        );
    }

    #[test]
    fn test_parser_errors() {
        for source in [
            "a = = 1",
            "a 1",
            "}",
            "a = [1 2]",
            "a = [,]",
            "a = ",
            "= 1",
            "o {",
        ] {
            assert!(
                matches!(error(source), Error::Parser(_)),
                "expected parser error for {source:?}"
            );
        }
    }

    #[test]
    fn test_unclosed_object_span() {
        match error("x = 1\nobj {\n  y = 2\n") {
            Error::Parser(e) => assert_eq!(e.span, Span::new(6, 11)),
            other => panic!("expected parser error, got {other:?}"),
        }
    }

    #[test]
    fn test_lexer_errors() {
        match error("a = 1\nb = #") {
            Error::Lexer(e) => {
                assert_eq!((e.line, e.column), (2, 5));
                assert_eq!(e.message, "unexpected character `#`");
            }
            other => panic!("expected lexer error, got {other:?}"),
        }
        assert!(matches!(error("a = \"open"), Error::Lexer(_)));
        assert!(matches!(error("/* open"), Error::Lexer(_)));
        assert!(matches!(error("a = 12ab"), Error::Lexer(_)));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("+42"), Some(42));
        assert_eq!(parse_integer("-0x10"), Some(-16));
        assert_eq!(parse_integer("0XfF"), Some(255));
        assert_eq!(parse_integer("0x1FFFFFFFFFFFFFFFF"), None);
    }
}
