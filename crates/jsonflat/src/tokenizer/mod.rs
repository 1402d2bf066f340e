//! Tokenizer: turns raw bytes into a flat array of typed spans.
//!
//! What it does
//! - Scans the input once and writes one [`Token`] per object, array, string
//!   and primitive into a caller-provided slice, in document order.
//! - Annotates containers with the number of immediate children instead of
//!   parent pointers. A key string gets size 1 once its value is seen.
//! - Validates the grammar strictly: keys are strings followed by `:`,
//!   members are separated by `,` without trailing commas, literals and
//!   numbers follow RFC 8259, strings contain valid escapes and UTF‑8.
//!
//! Resuming
//! - When the slice is full the scan stops with [`TokenizeError::NoMemory`]
//!   *before* touching any state for the token that did not fit. Calling
//!   [`Tokenizer::tokenize`] again with a larger slice that starts with the
//!   tokens written so far continues where it stopped.
//!
//! Scope
//! - Several whitespace-separated top-level values are tokenized one after
//!   the other. Whether that is acceptable is up to the consumer.
//! - Escapes are validated, never decoded; spans always point at raw input.

use alloc::vec::Vec;

use crate::{
    error::TokenizeError,
    token::{Token, TokenKind},
};

/// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Start of input or after a complete top-level value.
    Root,
    /// After `{`.
    KeyOrEnd,
    /// After `,` inside an object.
    Key,
    /// After a key.
    Colon,
    /// After `:`, or after `,` inside an array.
    Value,
    /// After `[`.
    ValueOrEnd,
    /// After a member or element.
    CommaOrEnd,
}

/// Resumable scanner state.
///
/// ```rust
/// use jsonflat::{Token, TokenKind, Tokenizer};
///
/// let mut tokens = [Token::default(); 8];
/// let count = Tokenizer::new()
///     .tokenize(br#"{"a":true}"#, &mut tokens)
///     .unwrap();
/// assert_eq!(count, 3);
/// assert_eq!(tokens[0].kind, TokenKind::Object);
/// assert_eq!(tokens[0].size, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pos: usize,
    next: usize,
    // indices of containers whose closing bracket is pending, innermost last
    open: Vec<usize>,
    expect: Expect,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Creates a tokenizer positioned at the start of the input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pos: 0,
            next: 0,
            open: Vec::new(),
            expect: Expect::Root,
        }
    }

    /// Scans `src` into `tokens` and returns the number of tokens written.
    ///
    /// Whitespace-only input yields `Ok(0)`.
    ///
    /// # Errors
    ///
    /// [`TokenizeError::NoMemory`] when `tokens` is too small; the call can
    /// be repeated with a larger slice. Any other error means the input is
    /// not valid JSON.
    pub fn tokenize(&mut self, src: &[u8], tokens: &mut [Token]) -> Result<usize, TokenizeError> {
        while let Some(&byte) = src.get(self.pos) {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                b'{' | b'[' => {
                    self.expect_value(byte)?;
                    let (kind, expect) = if byte == b'{' {
                        (TokenKind::Object, Expect::KeyOrEnd)
                    } else {
                        (TokenKind::Array, Expect::ValueOrEnd)
                    };
                    let index = self.alloc(tokens, Token::new(kind, offset(self.pos), -1))?;
                    self.open.push(index);
                    self.expect = expect;
                    self.pos += 1;
                }
                b'}' | b']' => {
                    let kind = if byte == b'}' {
                        TokenKind::Object
                    } else {
                        TokenKind::Array
                    };
                    let closable = match kind {
                        TokenKind::Object => {
                            matches!(self.expect, Expect::KeyOrEnd | Expect::CommaOrEnd)
                        }
                        _ => matches!(self.expect, Expect::ValueOrEnd | Expect::CommaOrEnd),
                    };
                    let index = match self.open.last() {
                        Some(&index) if closable && tokens[index].kind == kind => index,
                        _ => return Err(self.invalid(byte)),
                    };
                    tokens[index].end = offset(self.pos + 1);
                    self.open.pop();
                    self.pos += 1;
                    self.value_done();
                }
                b':' => {
                    if self.expect != Expect::Colon {
                        return Err(self.invalid(byte));
                    }
                    self.expect = Expect::Value;
                    self.pos += 1;
                }
                b',' => {
                    if self.expect != Expect::CommaOrEnd {
                        return Err(self.invalid(byte));
                    }
                    self.expect = match self.open.last() {
                        Some(&index) if tokens[index].kind == TokenKind::Object => Expect::Key,
                        Some(_) => Expect::Value,
                        None => return Err(self.invalid(byte)),
                    };
                    self.pos += 1;
                }
                b'"' => {
                    let is_key = matches!(self.expect, Expect::KeyOrEnd | Expect::Key);
                    if !is_key {
                        self.expect_value(byte)?;
                    }
                    let end = scan_string(src, self.pos + 1)?;
                    self.alloc(
                        tokens,
                        Token::new(TokenKind::String, offset(self.pos + 1), offset(end)),
                    )?;
                    self.pos = end + 1;
                    if is_key {
                        self.expect = Expect::Colon;
                    } else {
                        self.value_done();
                    }
                }
                b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => {
                    self.expect_value(byte)?;
                    let end = scan_primitive(src, self.pos)?;
                    self.alloc(
                        tokens,
                        Token::new(TokenKind::Primitive, offset(self.pos), offset(end)),
                    )?;
                    self.pos = end;
                    self.value_done();
                }
                _ => return Err(self.invalid(byte)),
            }
        }

        if !self.open.is_empty() {
            return Err(TokenizeError::UnexpectedEnd { offset: src.len() });
        }

        Ok(self.next)
    }

    /// Writes `token` into the next free slot and counts it as a child of the
    /// enclosing container, or of its key inside an object.
    fn alloc(&mut self, tokens: &mut [Token], token: Token) -> Result<usize, TokenizeError> {
        let index = self.next;
        let slot = tokens.get_mut(index).ok_or(TokenizeError::NoMemory)?;
        *slot = token;
        self.next += 1;

        if let Some(&parent) = self.open.last() {
            let parent = if self.expect == Expect::Value && tokens[parent].kind == TokenKind::Object
            {
                // the key is always the token allocated right before its value
                index - 1
            } else {
                parent
            };
            tokens[parent].size += 1;
        }

        Ok(index)
    }

    fn expect_value(&self, byte: u8) -> Result<(), TokenizeError> {
        if matches!(
            self.expect,
            Expect::Root | Expect::Value | Expect::ValueOrEnd
        ) {
            Ok(())
        } else {
            Err(self.invalid(byte))
        }
    }

    fn value_done(&mut self) {
        self.expect = if self.open.is_empty() {
            Expect::Root
        } else {
            Expect::CommaOrEnd
        };
    }

    fn invalid(&self, byte: u8) -> TokenizeError {
        TokenizeError::InvalidCharacter {
            byte,
            offset: self.pos,
        }
    }
}

// Slices never exceed `isize::MAX` bytes.
#[allow(clippy::cast_possible_wrap)]
fn offset(pos: usize) -> isize {
    pos as isize
}

/// Returns the offset of the closing quote of a string whose content starts
/// at `start`.
fn scan_string(src: &[u8], start: usize) -> Result<usize, TokenizeError> {
    let mut i = start;
    loop {
        let Some(&byte) = src.get(i) else {
            return Err(TokenizeError::UnexpectedEnd { offset: src.len() });
        };
        match byte {
            b'"' => return Ok(i),
            b'\\' => match src.get(i + 1) {
                Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => i += 2,
                Some(b'u') => {
                    let Some(hex) = src.get(i + 2..i + 6) else {
                        return Err(TokenizeError::UnexpectedEnd { offset: src.len() });
                    };
                    if !hex.iter().all(u8::is_ascii_hexdigit) {
                        return Err(TokenizeError::InvalidEscape { offset: i });
                    }
                    i += 6;
                }
                Some(_) => return Err(TokenizeError::InvalidEscape { offset: i }),
                None => return Err(TokenizeError::UnexpectedEnd { offset: src.len() }),
            },
            0x00..=0x1f => return Err(TokenizeError::InvalidCharacter { byte, offset: i }),
            0x80.. => match bstr::decode_utf8(&src[i..]) {
                (Some(_), len) => i += len,
                (None, _) => return Err(TokenizeError::InvalidUtf8 { offset: i }),
            },
            _ => i += 1,
        }
    }
}

/// Returns the offset one past the end of the number or literal at `start`.
fn scan_primitive(src: &[u8], start: usize) -> Result<usize, TokenizeError> {
    match src[start] {
        b't' => scan_literal(src, start, b"true"),
        b'f' => scan_literal(src, start, b"false"),
        b'n' => scan_literal(src, start, b"null"),
        _ => scan_number(src, start),
    }
}

fn scan_literal(src: &[u8], start: usize, word: &[u8]) -> Result<usize, TokenizeError> {
    let end = start + word.len();
    if src.get(start..end) == Some(word) && is_delimiter(src.get(end)) {
        Ok(end)
    } else {
        Err(TokenizeError::InvalidLiteral { offset: start })
    }
}

fn scan_number(src: &[u8], start: usize) -> Result<usize, TokenizeError> {
    let invalid = TokenizeError::InvalidNumber { offset: start };
    let mut i = start;
    if src.get(i) == Some(&b'-') {
        i += 1;
    }

    match src.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = skip_digits(src, i + 1),
        _ => return Err(invalid),
    }

    if src.get(i) == Some(&b'.') {
        let end = skip_digits(src, i + 1);
        if end == i + 1 {
            return Err(invalid);
        }
        i = end;
    }

    if matches!(src.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(src.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let end = skip_digits(src, i);
        if end == i {
            return Err(invalid);
        }
        i = end;
    }

    if is_delimiter(src.get(i)) {
        Ok(i)
    } else {
        Err(invalid)
    }
}

fn skip_digits(src: &[u8], from: usize) -> usize {
    from + src
        .get(from..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

fn is_delimiter(byte: Option<&u8>) -> bool {
    matches!(
        byte,
        None | Some(b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}')
    )
}
