use core::fmt;

/// The type tag of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    /// A slot that has not been written by the tokenizer.
    #[default]
    Undefined,
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// A string; the span excludes the surrounding quotes.
    String,
    /// A number, `true`, `false` or `null`.
    Primitive,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Undefined => "undefined",
            TokenKind::Object => "object",
            TokenKind::Array => "array",
            TokenKind::String => "string",
            TokenKind::Primitive => "primitive",
        })
    }
}

/// A typed span into the source buffer.
///
/// Offsets are byte offsets, `-1` while unset. For containers `size` is the
/// number of immediate children: key/value pairs for an object, elements for
/// an array. A key string has size 1 once its value has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// What this token represents.
    pub kind: TokenKind,
    /// Offset of the first byte of the span.
    pub start: isize,
    /// Offset one past the last byte of the span.
    pub end: isize,
    /// Number of immediate children.
    pub size: isize,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            kind: TokenKind::Undefined,
            start: -1,
            end: -1,
            size: 0,
        }
    }
}

impl Token {
    pub(crate) fn new(kind: TokenKind, start: isize, end: isize) -> Self {
        Self {
            kind,
            start,
            end,
            size: 0,
        }
    }

    /// Whether the token is a scalar that can be stored as a value.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::Primitive)
    }
}
