//! Builds owned path strings from token spans.

use alloc::string::String;

use crate::token::Token;

/// Builds a new path from an optional `base`, a `separator` and the source
/// span of `token`.
///
/// Without a base (or with an empty one) the result is a plain copy of the
/// span; otherwise it is `base`, `separator` and the span concatenated into a
/// string of exactly that length.
///
/// Returns `None` if the token is absent or its span is unusable: negative
/// offsets, an empty or reversed range, a range past the end of `src`, or
/// bytes that are not UTF‑8.
///
/// ```rust
/// use jsonflat::{Token, TokenKind, build_path};
///
/// let src = br#"{"b":1}"#;
/// let key = Token { kind: TokenKind::String, start: 2, end: 3, size: 1 };
/// assert_eq!(build_path(Some("a"), '.', src, Some(&key)).as_deref(), Some("a.b"));
/// assert_eq!(build_path(None, '.', src, Some(&key)).as_deref(), Some("b"));
/// ```
#[must_use]
pub fn build_path(
    base: Option<&str>,
    separator: char,
    src: &[u8],
    token: Option<&Token>,
) -> Option<String> {
    let segment = span(src, token?)?;

    match base {
        Some(base) if !base.is_empty() => {
            let mut path = String::with_capacity(base.len() + separator.len_utf8() + segment.len());
            path.push_str(base);
            path.push(separator);
            path.push_str(segment);
            Some(path)
        }
        _ => Some(String::from(segment)),
    }
}

/// Copies the source span of `token` into a new string.
///
/// This is [`build_path`] without a base.
#[must_use]
pub fn token_text(src: &[u8], token: Option<&Token>) -> Option<String> {
    build_path(None, '\0', src, token)
}

fn span<'src>(src: &'src [u8], token: &Token) -> Option<&'src str> {
    let start = usize::try_from(token.start).ok()?;
    let end = usize::try_from(token.end).ok()?;
    if end <= start {
        return None;
    }
    core::str::from_utf8(src.get(start..end)?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    const SRC: &[u8] = br#"{"key":"value"}"#;

    fn string(start: isize, end: isize) -> Token {
        Token {
            kind: TokenKind::String,
            start,
            end,
            size: 0,
        }
    }

    #[test]
    fn copies_span_without_base() {
        assert_eq!(
            build_path(None, '.', SRC, Some(&string(2, 5))).as_deref(),
            Some("key")
        );
        assert_eq!(
            build_path(Some(""), '.', SRC, Some(&string(2, 5))).as_deref(),
            Some("key")
        );
    }

    #[test]
    fn joins_base_and_segment() {
        assert_eq!(
            build_path(Some("outer.inner"), '/', SRC, Some(&string(8, 13))).as_deref(),
            Some("outer.inner/value")
        );
    }

    #[test]
    fn multibyte_separator() {
        assert_eq!(
            build_path(Some("a"), '→', SRC, Some(&string(2, 5))).as_deref(),
            Some("a→key")
        );
    }

    #[test]
    fn rejects_unusable_spans() {
        assert_eq!(build_path(Some("a"), '.', SRC, None), None);
        assert_eq!(token_text(SRC, Some(&string(-1, 5))), None);
        assert_eq!(token_text(SRC, Some(&string(2, -1))), None);
        assert_eq!(token_text(SRC, Some(&string(5, 5))), None);
        assert_eq!(token_text(SRC, Some(&string(5, 2))), None);
        assert_eq!(token_text(SRC, Some(&string(2, 99))), None);
    }

    #[test]
    fn rejects_spans_splitting_a_character() {
        let src = "\"é\"".as_bytes();
        assert_eq!(token_text(src, Some(&string(1, 2))), None);
        assert_eq!(token_text(src, Some(&string(1, 3))).as_deref(), Some("é"));
    }
}
