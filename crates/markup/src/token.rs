//! Token model produced by [`crate::Tokenizer`].

use std::fmt;

/// Byte range into the tokenizer input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// One markup token.
///
/// Determinism contract:
/// - Tokens are yielded in source order.
/// - Attributes on a `StartTag` keep encounter order; duplicates are kept.
/// - Tag and attribute names are ASCII-lowercased.
/// - `Eof` is yielded exactly once, as the final token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    /// Character data, entity-decoded.
    Text(String),
    Comment(String),
    Eof,
}

/// Payload-free discriminant, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Doctype,
    StartTag,
    EndTag,
    Text,
    Comment,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Doctype(_) => TokenKind::Doctype,
            Token::StartTag { .. } => TokenKind::StartTag,
            Token::EndTag { .. } => TokenKind::EndTag,
            Token::Text(_) => TokenKind::Text,
            Token::Comment(_) => TokenKind::Comment,
            Token::Eof => TokenKind::Eof,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Doctype => "doctype",
            TokenKind::StartTag => "start tag",
            TokenKind::EndTag => "end tag",
            TokenKind::Text => "text",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of input",
        })
    }
}
