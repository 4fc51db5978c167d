//! Lazy markup tokenizer with a constrained, practical name character set.
//!
//! Supported tag/attribute name characters (ASCII only): `[A-Za-z0-9:_-]`.
//! A `<` that cannot start a tag, end tag, comment or declaration is plain text.
//!
//! Known limitations (intentional):
//! - Not an HTML5 state machine; there is no parse-error recovery.
//! - Raw text close-tag scanning accepts only ASCII whitespace before `>`.
//! - A start tag cut off by the end of input is still reported, and
//!   [`Tokenizer::ended_inside_tag`] tells the caller the tag never closed.

use std::collections::VecDeque;

use memchr::memchr;

use crate::entities::decode_entities;
use crate::token::{Span, Token};
use crate::void::is_void_element;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const DOCTYPE_START: &[u8] = b"<!doctype";

// Matches only start at an ASCII `<`, which never occurs inside a UTF-8
// continuation byte.
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack
        .get(start..start + needle.len())
        .is_some_and(|window| window.eq_ignore_ascii_case(needle))
}

/// Returns true when the `<` at `i` opens markup rather than being text.
fn opens_markup(bytes: &[u8], i: usize) -> bool {
    debug_assert_eq!(bytes[i], b'<');
    match bytes.get(i + 1) {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some(b'/') | Some(b'!') | Some(b'?') => true,
        _ => false,
    }
}

/// Finds `</script` or `</style` (case-insensitive) followed by optional
/// ASCII whitespace and `>`. Returns the close tag's `(start, end)` offsets.
fn find_rawtext_close_tag(haystack: &[u8], close_tag: &[u8]) -> Option<(usize, usize)> {
    let len = haystack.len();
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= len {
        i += memchr(b'<', &haystack[i..])?;
        if i + n > len {
            return None;
        }
        if starts_with_ignore_ascii_case_at(haystack, i, close_tag) {
            let mut k = i + n;
            while k < len && haystack[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && haystack[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Convenience constructor, equivalent to [`Tokenizer::new`].
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Single-pass, non-restartable token iterator over one text buffer.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    queued: VecDeque<(Token, Span)>,
    last_span: Span,
    ended_inside_tag: bool,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            queued: VecDeque::new(),
            last_span: Span::default(),
            ended_inside_tag: false,
            done: false,
        }
    }

    /// Source span of the most recently yielded token.
    pub fn last_span(&self) -> Span {
        self.last_span
    }

    /// True when the final start tag ran into the end of input before its `>`.
    ///
    /// Only meaningful once `Token::Eof` has been yielded.
    pub fn ended_inside_tag(&self) -> bool {
        self.ended_inside_tag
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    fn emit(&mut self, token: Token, span: Span) -> Option<Token> {
        log::trace!(target: "markup.tokenizer", "emit token {token:?} at {span:?}");
        self.last_span = span;
        Some(token)
    }

    fn scan_text(&mut self) -> Option<(Token, Span)> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;
        let mut i = start;
        while i < bytes.len() {
            match memchr(b'<', &bytes[i..]) {
                Some(rel) => {
                    i += rel;
                    if opens_markup(bytes, i) {
                        break;
                    }
                    i += 1;
                }
                None => i = bytes.len(),
            }
        }
        self.pos = i;
        let decoded = decode_entities(&input[start..i]);
        if decoded.is_empty() {
            return None;
        }
        Some((Token::Text(decoded.into_owned()), Span::new(start, i)))
    }

    fn scan_comment(&mut self) -> (Token, Span) {
        let input = self.input;
        let start = self.pos;
        let body_start = start + COMMENT_START.len();
        let rest = &input[body_start..];
        let (text, end) = match rest.find(COMMENT_END) {
            Some(rel) => (&rest[..rel], body_start + rel + COMMENT_END.len()),
            None => (rest, input.len()),
        };
        self.pos = end;
        (Token::Comment(text.to_string()), Span::new(start, end))
    }

    /// `<!...>` / `<?...>` / `</ ...>` constructs that are not comments,
    /// doctypes or end tags. Their content up to `>` becomes a comment.
    fn scan_bogus_comment(&mut self, body_start: usize) -> (Token, Span) {
        let input = self.input;
        let start = self.pos;
        let bytes = input.as_bytes();
        let (body_end, end) = match memchr(b'>', &bytes[body_start..]) {
            Some(rel) => (body_start + rel, body_start + rel + 1),
            None => (bytes.len(), bytes.len()),
        };
        self.pos = end;
        (
            Token::Comment(input[body_start..body_end].to_string()),
            Span::new(start, end),
        )
    }

    fn scan_doctype(&mut self) -> (Token, Span) {
        let input = self.input;
        let start = self.pos;
        let rest = &input[start + 2..];
        let (text, end) = match rest.find('>') {
            Some(rel) => (&rest[..rel], start + 2 + rel + 1),
            None => (rest, input.len()),
        };
        self.pos = end;
        (Token::Doctype(text.trim().to_string()), Span::new(start, end))
    }

    fn scan_end_tag(&mut self) -> (Token, Span) {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;
        let name_start = start + 2;
        let mut j = name_start;
        while j < bytes.len() && is_name_char(bytes[j]) {
            j += 1;
        }
        let name = input[name_start..j].to_ascii_lowercase();
        let end = match memchr(b'>', &bytes[j..]) {
            Some(rel) => j + rel + 1,
            None => bytes.len(),
        };
        self.pos = end;
        (Token::EndTag { name }, Span::new(start, end))
    }

    fn scan_start_tag(&mut self) -> (Token, Span) {
        let input = self.input;
        let bytes = input.as_bytes();
        let len = bytes.len();
        let start = self.pos;
        let mut k = start + 1;
        while k < len && is_name_char(bytes[k]) {
            k += 1;
        }
        let name = input[start + 1..k].to_ascii_lowercase();

        let mut attributes: Vec<(String, Option<String>)> = Vec::new();
        let mut self_closing = false;
        let mut terminated = false;

        let skip_whitespace = |k: &mut usize| {
            while *k < len && bytes[*k].is_ascii_whitespace() {
                *k += 1;
            }
        };

        loop {
            skip_whitespace(&mut k);
            if k >= len {
                break;
            }
            if bytes[k] == b'>' {
                k += 1;
                terminated = true;
                break;
            }
            if bytes[k] == b'/' {
                if k + 1 < len && bytes[k + 1] == b'>' {
                    self_closing = true;
                    terminated = true;
                    k += 2;
                    break;
                }
                k += 1;
                continue;
            }
            let attr_start = k;
            while k < len && is_name_char(bytes[k]) {
                k += 1;
            }
            if attr_start == k {
                // Stray punctuation inside a tag is skipped.
                k += 1;
                continue;
            }
            let attr_name = input[attr_start..k].to_ascii_lowercase();

            skip_whitespace(&mut k);
            let value = if k < len && bytes[k] == b'=' {
                k += 1;
                skip_whitespace(&mut k);
                if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                    let quote = bytes[k];
                    k += 1;
                    let value_start = k;
                    k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                    let raw = &input[value_start..k];
                    if k < len {
                        k += 1;
                    }
                    Some(decode_entities(raw).into_owned())
                } else {
                    let value_start = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                            break;
                        }
                        k += 1;
                    }
                    Some(decode_entities(&input[value_start..k]).into_owned())
                }
            } else {
                None
            };
            attributes.push((attr_name, value));
        }

        if terminated && is_void_element(&name) {
            self_closing = true;
        }
        self.ended_inside_tag = !terminated;
        self.pos = k;

        let span = Span::new(start, k);
        if terminated && !self_closing && (name == "script" || name == "style") {
            self.queue_rawtext(&name);
        }
        (
            Token::StartTag {
                name,
                attributes,
                self_closing,
            },
            span,
        )
    }

    /// Queues the raw text body and the matching end tag of a `script` or
    /// `style` element. A missing close tag turns the rest of the input into
    /// the body and implies the end tag.
    fn queue_rawtext(&mut self, name: &str) {
        let close_tag = if name == "script" {
            SCRIPT_CLOSE_TAG
        } else {
            STYLE_CLOSE_TAG
        };
        let input = self.input;
        let body_start = self.pos;
        let rest = &input.as_bytes()[body_start..];
        let (body_end, end) = match find_rawtext_close_tag(rest, close_tag) {
            Some((rel_start, rel_end)) => (body_start + rel_start, body_start + rel_end),
            None => (input.len(), input.len()),
        };
        if body_end > body_start {
            self.queued.push_back((
                Token::Text(input[body_start..body_end].to_string()),
                Span::new(body_start, body_end),
            ));
        }
        self.queued.push_back((
            Token::EndTag {
                name: name.to_string(),
            },
            Span::new(body_end, end),
        ));
        self.pos = end;
    }

    fn scan_markup(&mut self) -> (Token, Span) {
        let input = self.input;
        let bytes = input.as_bytes();
        let i = self.pos;
        if input[i..].starts_with(COMMENT_START) {
            return self.scan_comment();
        }
        if starts_with_ignore_ascii_case_at(bytes, i, DOCTYPE_START) {
            return self.scan_doctype();
        }
        match bytes.get(i + 1) {
            Some(b'!') | Some(b'?') => self.scan_bogus_comment(i + 2),
            Some(b'/') if bytes.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic()) => {
                self.scan_end_tag()
            }
            Some(b'/') => self.scan_bogus_comment(i + 2),
            _ => self.scan_start_tag(),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some((token, span)) = self.queued.pop_front() {
            return self.emit(token, span);
        }
        if self.done {
            return None;
        }
        let input = self.input;
        let bytes = input.as_bytes();
        while self.pos < bytes.len() {
            if bytes[self.pos] == b'<' && opens_markup(bytes, self.pos) {
                let (token, span) = self.scan_markup();
                return self.emit(token, span);
            }
            if let Some((token, span)) = self.scan_text() {
                return self.emit(token, span);
            }
        }
        self.done = true;
        let end = input.len();
        self.emit(Token::Eof, Span::new(end, end))
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<Token> {
        tokenize(input).collect()
    }

    fn start(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    #[test]
    fn tokenize_nested_tags_with_attributes() {
        assert_eq!(
            collect(r#"<html><head cool="beans"></head></html>"#),
            vec![
                start("html", &[], false),
                start("head", &[("cool", Some("beans"))], false),
                end("head"),
                end("html"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn eof_is_yielded_once_and_iterator_is_fused() {
        let mut tokenizer = tokenize("");
        assert_eq!(tokenizer.next(), Some(Token::Eof));
        assert_eq!(tokenizer.next(), None);
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn void_elements_are_reported_self_closing() {
        assert_eq!(
            collect(r#"<img src="a.png">done"#),
            vec![
                start("img", &[("src", Some("a.png"))], true),
                Token::Text("done".to_string()),
                Token::Eof,
            ]
        );
        assert_eq!(
            collect("<BR/>"),
            vec![start("br", &[], true), Token::Eof]
        );
    }

    #[test]
    fn non_void_self_closing_syntax_is_reported() {
        assert_eq!(
            collect("<div/>"),
            vec![start("div", &[], true), Token::Eof]
        );
    }

    #[test]
    fn names_are_lowercased_and_values_keep_case() {
        assert_eq!(
            collect("<DiV ID=One></DIV>"),
            vec![start("div", &[("id", Some("One"))], false), end("div"), Token::Eof]
        );
    }

    #[test]
    fn attribute_forms_and_order_are_preserved() {
        assert_eq!(
            collect(r#"<input b='x y' disabled a=1 c="&amp;" b=2>"#),
            vec![
                start(
                    "input",
                    &[
                        ("b", Some("x y")),
                        ("disabled", None),
                        ("a", Some("1")),
                        ("c", Some("&")),
                        ("b", Some("2")),
                    ],
                    true
                ),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        assert_eq!(
            collect("a < b <3"),
            vec![Token::Text("a < b <3".to_string()), Token::Eof]
        );
    }

    #[test]
    fn text_is_entity_decoded() {
        assert_eq!(
            collect("<p>fish &amp; chips</p>"),
            vec![
                start("p", &[], false),
                Token::Text("fish & chips".to_string()),
                end("p"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comments_doctypes_and_bogus_comments() {
        assert_eq!(
            collect("<!DOCTYPE html><!-- hi --><?xml v?></ >"),
            vec![
                Token::Doctype("DOCTYPE html".to_string()),
                Token::Comment(" hi ".to_string()),
                Token::Comment("xml v?".to_string()),
                Token::Comment(" ".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_comment_runs_to_end() {
        assert_eq!(
            collect("<!-- open"),
            vec![Token::Comment(" open".to_string()), Token::Eof]
        );
    }

    #[test]
    fn script_body_is_raw_text() {
        assert_eq!(
            collect("<script>if (a < b) { x(); }</ScRiPt >after"),
            vec![
                start("script", &[], false),
                Token::Text("if (a < b) { x(); }".to_string()),
                end("script"),
                Token::Text("after".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn rawtext_close_tag_does_not_accept_near_matches() {
        assert_eq!(
            collect("<style>ok</stylex >no</style>"),
            vec![
                start("style", &[], false),
                Token::Text("ok</stylex >no".to_string()),
                end("style"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn rawtext_without_close_tag_implies_end_tag() {
        assert_eq!(
            collect("<script>let x = 1;"),
            vec![
                start("script", &[], false),
                Token::Text("let x = 1;".to_string()),
                end("script"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_start_tag_is_reported() {
        let mut tokenizer = tokenize(r#"<head cool="beans""#);
        assert_eq!(
            tokenizer.next(),
            Some(start("head", &[("cool", Some("beans"))], false))
        );
        assert!(tokenizer.ended_inside_tag());
        assert_eq!(tokenizer.next(), Some(Token::Eof));
        assert!(tokenizer.ended_inside_tag());
    }

    #[test]
    fn unterminated_void_tag_is_not_self_closing() {
        let tokens = collect("<img src=x");
        assert_eq!(tokens, vec![start("img", &[("src", Some("x"))], false), Token::Eof]);
    }

    #[test]
    fn terminated_tag_clears_inside_tag_flag() {
        let mut tokenizer = tokenize("<a href=x>");
        tokenizer.by_ref().for_each(drop);
        assert!(!tokenizer.ended_inside_tag());
    }

    #[test]
    fn spans_cover_source_text() {
        let input = r#"x<script type="boot"></script>y"#;
        let mut tokenizer = tokenize(input);
        let mut seen = Vec::new();
        while let Some(token) = tokenizer.next() {
            let span = tokenizer.last_span();
            seen.push((token.kind(), &input[span.start..span.end]));
        }
        assert_eq!(
            seen,
            vec![
                (crate::TokenKind::Text, "x"),
                (crate::TokenKind::StartTag, r#"<script type="boot">"#),
                (crate::TokenKind::EndTag, "</script>"),
                (crate::TokenKind::Text, "y"),
                (crate::TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn utf8_text_around_tags_is_preserved() {
        assert_eq!(
            collect("¡Hola <b>café</b> 😊"),
            vec![
                Token::Text("¡Hola ".to_string()),
                start("b", &[], false),
                Token::Text("café".to_string()),
                end("b"),
                Token::Text(" 😊".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn many_angle_brackets_stay_linear() {
        let input = "<".repeat(100_000);
        let tokens = collect(&input);
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::Text(t) if t.len() == input.len()));
    }
}
