//! Tokenizer for the Candle configuration format.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from Candle source text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Advance while the predicate holds.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Emit a single-character token.
    fn single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            // Structural tokens
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Equals),

            '"' => self.tokenize_quoted_string(),

            '/' if self.starts_with("//") => self.tokenize_line_comment(),
            '/' if self.starts_with("/*") => self.tokenize_block_comment(),

            ' ' | '\t' => {
                self.advance_while(|c| c == ' ' || c == '\t');
                self.token(TokenKind::Whitespace, start)
            }

            '\n' => self.single(TokenKind::Newline),
            '\r' => {
                self.advance();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                self.token(TokenKind::Newline, start)
            }

            _ if self.at_number_start() => self.tokenize_number(),
            _ if is_identifier_start(c) => {
                self.advance_while(is_identifier_char);
                self.token(TokenKind::Identifier, start)
            }

            _ => self.single(TokenKind::Error),
        }
    }

    /// Whether the remaining input begins a number literal.
    fn at_number_start(&self) -> bool {
        let (first, second, third) = (self.peek(), self.peek_nth(1), self.peek_nth(2));
        match first {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => matches!(second, Some(c) if c.is_ascii_digit()),
            Some('+' | '-') => match second {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => matches!(third, Some(c) if c.is_ascii_digit()),
                _ => false,
            },
            _ => false,
        }
    }

    /// Tokenize an integer or float literal.
    ///
    /// Anything identifier-like glued to the end of the literal turns the
    /// whole run into an error token.
    fn tokenize_number(&mut self) -> Token<'src> {
        let start = self.pos;

        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }

        let kind = if self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X'))
            && matches!(self.peek_nth(2), Some(c) if c.is_ascii_hexdigit())
        {
            self.advance();
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit());
            TokenKind::Integer
        } else {
            let mut kind = TokenKind::Integer;
            self.advance_while(|c| c.is_ascii_digit());

            if self.peek() == Some('.') {
                self.advance();
                self.advance_while(|c| c.is_ascii_digit());
                kind = TokenKind::Float;
            }

            if matches!(self.peek(), Some('e' | 'E')) {
                let exponent = match self.peek_nth(1) {
                    Some(c) if c.is_ascii_digit() => true,
                    Some('+' | '-') => matches!(self.peek_nth(2), Some(c) if c.is_ascii_digit()),
                    _ => false,
                };
                if exponent {
                    self.advance();
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.advance();
                    }
                    self.advance_while(|c| c.is_ascii_digit());
                    kind = TokenKind::Float;
                }
            }

            if matches!(self.peek(), Some('f' | 'F')) {
                self.advance();
                kind = TokenKind::Float;
            }
            kind
        };

        if matches!(self.peek(), Some(c) if is_identifier_char(c) || c == '.') {
            self.advance_while(|c| is_identifier_char(c) || c == '.');
            return self.token(TokenKind::Error, start);
        }

        self.token(kind, start)
    }

    /// Tokenize a quoted string: `"..."`.
    fn tokenize_quoted_string(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume opening quote
        self.advance();

        loop {
            match self.peek() {
                None => {
                    // Unterminated string
                    return self.token(TokenKind::Error, start);
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    // Escape sequence - consume backslash and next char
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.token(TokenKind::QuotedString, start)
    }

    /// Tokenize a line comment: `// ...`.
    fn tokenize_line_comment(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume `//`
        self.advance();
        self.advance();

        self.advance_while(|c| c != '\n' && c != '\r');
        self.token(TokenKind::LineComment, start)
    }

    /// Tokenize a block comment: `/* ... */`.
    fn tokenize_block_comment(&mut self) -> Token<'src> {
        let start = self.pos;

        // Consume `/*`
        self.advance();
        self.advance();

        loop {
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                return self.token(TokenKind::BlockComment, start);
            }
            if self.advance().is_none() {
                // Unterminated comment
                return self.token(TokenKind::Error, start);
            }
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Check if a character can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<(TokenKind, &str)> {
        candle_testhelpers::setup();
        Tokenizer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(tokenize("{"), vec![(TokenKind::LBrace, "{")]);
        assert_eq!(tokenize("}"), vec![(TokenKind::RBrace, "}")]);
        assert_eq!(tokenize("["), vec![(TokenKind::LBracket, "[")]);
        assert_eq!(tokenize("]"), vec![(TokenKind::RBracket, "]")]);
        assert_eq!(tokenize(","), vec![(TokenKind::Comma, ",")]);
        assert_eq!(tokenize("="), vec![(TokenKind::Equals, "=")]);
    }

    #[test]
    fn test_identifier() {
        assert_eq!(tokenize("hello"), vec![(TokenKind::Identifier, "hello")]);
        assert_eq!(
            tokenize("_private-name2"),
            vec![(TokenKind::Identifier, "_private-name2")]
        );
        assert_eq!(tokenize("VALUE1"), vec![(TokenKind::Identifier, "VALUE1")]);
    }

    #[test]
    fn test_integers() {
        assert_eq!(tokenize("1234"), vec![(TokenKind::Integer, "1234")]);
        assert_eq!(tokenize("-1234"), vec![(TokenKind::Integer, "-1234")]);
        assert_eq!(tokenize("+7"), vec![(TokenKind::Integer, "+7")]);
        assert_eq!(tokenize("0xFF"), vec![(TokenKind::Integer, "0xFF")]);
        assert_eq!(tokenize("-0Xab"), vec![(TokenKind::Integer, "-0Xab")]);
    }

    #[test]
    fn test_floats() {
        assert_eq!(tokenize("1.23"), vec![(TokenKind::Float, "1.23")]);
        assert_eq!(tokenize("-1.23"), vec![(TokenKind::Float, "-1.23")]);
        assert_eq!(tokenize(".5"), vec![(TokenKind::Float, ".5")]);
        assert_eq!(tokenize("1e10"), vec![(TokenKind::Float, "1e10")]);
        assert_eq!(tokenize("2.5E-3"), vec![(TokenKind::Float, "2.5E-3")]);
        assert_eq!(tokenize("2.5f"), vec![(TokenKind::Float, "2.5f")]);
        assert_eq!(tokenize("3F"), vec![(TokenKind::Float, "3F")]);
    }

    #[test]
    fn test_malformed_number() {
        assert_eq!(tokenize("12abc"), vec![(TokenKind::Error, "12abc")]);
        assert_eq!(tokenize("1.2.3"), vec![(TokenKind::Error, "1.2.3")]);
    }

    #[test]
    fn test_sign_without_digits() {
        assert_eq!(tokenize("-"), vec![(TokenKind::Error, "-")]);
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(
            tokenize(r#""hello world""#),
            vec![(TokenKind::QuotedString, r#""hello world""#)]
        );
        assert_eq!(
            tokenize(r#""with \"escapes\"""#),
            vec![(TokenKind::QuotedString, r#""with \"escapes\"""#)]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(tokenize(r#""oops"#), vec![(TokenKind::Error, r#""oops"#)]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tokenize("// comment"),
            vec![(TokenKind::LineComment, "// comment")]
        );
        assert_eq!(
            tokenize("/* one\ntwo */"),
            vec![(TokenKind::BlockComment, "/* one\ntwo */")]
        );
        assert_eq!(tokenize("/* open"), vec![(TokenKind::Error, "/* open")]);
        assert_eq!(tokenize("/"), vec![(TokenKind::Error, "/")]);
    }

    #[test]
    fn test_line_comment_stops_at_newline() {
        assert_eq!(
            tokenize("// a\r\nb"),
            vec![
                (TokenKind::LineComment, "// a"),
                (TokenKind::Newline, "\r\n"),
                (TokenKind::Identifier, "b"),
            ]
        );
    }

    #[test]
    fn test_property() {
        assert_eq!(
            tokenize("name = [1, 0x2,]\n"),
            vec![
                (TokenKind::Identifier, "name"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Equals, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::LBracket, "["),
                (TokenKind::Integer, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Whitespace, " "),
                (TokenKind::Integer, "0x2"),
                (TokenKind::Comma, ","),
                (TokenKind::RBracket, "]"),
                (TokenKind::Newline, "\n"),
            ]
        );
    }

    #[test]
    fn test_object() {
        assert_eq!(
            tokenize("object1{\tchild=true}"),
            vec![
                (TokenKind::Identifier, "object1"),
                (TokenKind::LBrace, "{"),
                (TokenKind::Whitespace, "\t"),
                (TokenKind::Identifier, "child"),
                (TokenKind::Equals, "="),
                (TokenKind::Identifier, "true"),
                (TokenKind::RBrace, "}"),
            ]
        );
    }

    #[test]
    fn test_unknown_character() {
        assert_eq!(
            tokenize("a = #"),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Equals, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Error, "#"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let mut tokenizer = Tokenizer::new("ab = 1");
        let first = tokenizer.next_token();
        assert_eq!(first.span, Span::new(0, 2));
        tokenizer.next_token();
        let equals = tokenizer.next_token();
        assert_eq!(equals.span, Span::new(3, 4));
        tokenizer.next_token();
        tokenizer.next_token();
        assert_eq!(tokenizer.next_token().kind, TokenKind::Eof);
        assert!(tokenizer.is_eof());
    }
}
