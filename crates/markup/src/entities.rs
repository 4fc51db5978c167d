use std::borrow::Cow;

use memchr::memchr;

/// Named references recognized by [`decode_entities`]. Each must be
/// semicolon-terminated.
const NAMED: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
    ("&nbsp;", '\u{00A0}'),
];

const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Decode a small, fixed subset of character references.
///
/// Contract:
/// - Named references from a fixed table (`&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`).
/// - Numeric references `&#215;` and `&#xD7;`, only when `;`-terminated and only when they
///   name a Unicode scalar value.
/// - Anything else, including unknown names and missing semicolons, passes through untouched.
///
/// Input without `&` is returned borrowed.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let next = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&s[i..next]);
            i = next;
            continue;
        }
        match decode_reference(&s[i..]) {
            Some((ch, consumed)) => {
                out.push(ch);
                i += consumed;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }

    Cow::Owned(out)
}

/// Decode one reference at the start of `rest` (which begins with `&`),
/// returning the character and the number of bytes consumed.
fn decode_reference(rest: &str) -> Option<(char, usize)> {
    for (name, ch) in NAMED {
        if rest.starts_with(name) {
            return Some((ch, name.len()));
        }
    }

    let body = rest.strip_prefix("&#")?;
    let (digits_offset, radix, max_digits) = match body.as_bytes().first() {
        Some(b'x' | b'X') => (1, 16, MAX_HEX_DIGITS),
        _ => (0, 10, MAX_DEC_DIGITS),
    };
    let digits = &body[digits_offset..];
    let len = digits
        .bytes()
        .take(max_digits + 1)
        .take_while(|b| b.is_ascii_digit() || (radix == 16 && b.is_ascii_hexdigit()))
        .count();
    if len == 0 || len > max_digits || digits.as_bytes().get(len) != Some(&b';') {
        return None;
    }
    let value = u32::from_str_radix(&digits[..len], radix).ok()?;
    let ch = char::from_u32(value)?;
    Some((ch, 2 + digits_offset + len + 1))
}
