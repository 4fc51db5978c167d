//! Markup tokenizer used by the template IR rewrite pass.
//!
//! The tokenizer is deliberately small: it understands start/end tags with
//! attributes, text, comments, doctypes and the `script`/`style` raw text
//! bodies. Lexical recovery beyond that is out of scope; malformed constructs
//! degrade into text or bogus comments rather than errors.

mod entities;
mod token;
mod tokenizer;
mod void;

pub use crate::entities::decode_entities;
pub use crate::token::{Span, Token, TokenKind};
pub use crate::tokenizer::{Tokenizer, tokenize};
pub use crate::void::{VOID_ELEMENTS, is_void_element};
