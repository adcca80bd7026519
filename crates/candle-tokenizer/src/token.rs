//! Token types for the Candle tokenizer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `=`
    Equals,

    // Names and literals
    /// Identifier: object and property names, keywords, enum tokens
    Identifier,
    /// Integer literal: `42`, `-7`, `0xFF`
    Integer,
    /// Float literal: `1.5`, `-0.25`, `1e10`, `2.5f`
    Float,
    /// Quoted string: `"hello"` (escapes are kept verbatim in the token text)
    QuotedString,

    // Comment tokens
    /// Line comment: `// ...`
    LineComment,
    /// Block comment: `/* ... */`
    BlockComment,

    // Whitespace tokens
    /// Horizontal whitespace: spaces and tabs
    Whitespace,
    /// Newline: `\n`, `\r\n` or a lone `\r`
    Newline,

    // Special tokens
    /// End of file
    Eof,
    /// Unrecognized or unterminated input
    Error,
}

impl TokenKind {
    /// Whether this token carries no meaning for the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Whether this token is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}
