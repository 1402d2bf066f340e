use thiserror::Error;

use crate::token::TokenKind;

/// Why a document could not be flattened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The input buffer was empty. Nothing was allocated.
    #[error("empty input")]
    EmptyInput,
    /// The tokenizer rejected the input or ran out of token slots.
    #[error("tokenize error: {0}")]
    Tokenize(#[from] TokenizeError),
    /// The tokens do not describe an object tree of scalar leaves.
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),
    /// A leaf span could not be extracted and
    /// [`InvalidSpanMode::Fail`](crate::InvalidSpanMode::Fail) is configured.
    #[error("invalid span {start}..{end} at token {index}")]
    InvalidSpan {
        /// Index of the offending token.
        index: usize,
        /// Start offset of the span.
        start: isize,
        /// End offset of the span.
        end: isize,
    },
    /// Objects are nested deeper than the configured maximum.
    #[error("nesting depth exceeds {max}")]
    DepthExceeded {
        /// The configured maximum depth.
        max: usize,
    },
}

/// Errors raised while scanning raw bytes into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// The token slice is full. The tokenizer can be resumed with a larger
    /// slice that starts with the tokens already written.
    #[error("not enough token slots")]
    NoMemory,
    /// The token buffer would have to grow past its hard cap.
    #[error("document needs more than {limit} tokens")]
    TokenLimit {
        /// The configured maximum number of tokens.
        limit: usize,
    },
    /// A byte that cannot appear at this position.
    #[error("invalid byte {byte:#04x} at offset {offset}")]
    InvalidCharacter {
        /// The offending byte.
        byte: u8,
        /// Its offset in the input.
        offset: usize,
    },
    /// A string contains bytes that are not UTF-8.
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the first invalid byte.
        offset: usize,
    },
    /// A backslash escape that JSON does not define.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape {
        /// Offset of the backslash.
        offset: usize,
    },
    /// A malformed number.
    #[error("invalid number at offset {offset}")]
    InvalidNumber {
        /// Offset where the number starts.
        offset: usize,
    },
    /// Something that starts like `true`, `false` or `null` but is not.
    #[error("invalid literal at offset {offset}")]
    InvalidLiteral {
        /// Offset where the literal starts.
        offset: usize,
    },
    /// The input ended inside a string or an open container.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd {
        /// Offset of the end of input.
        offset: usize,
    },
}

/// Token layouts the projector refuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The document root is not an object.
    #[error("root is {kind}, expected object")]
    RootNotObject {
        /// Kind of the root token.
        kind: TokenKind,
    },
    /// A value position holds something other than an object or a scalar.
    #[error("unsupported {kind} value at token {index}")]
    UnsupportedValue {
        /// Index of the value token.
        index: usize,
        /// Its kind.
        kind: TokenKind,
    },
    /// An object key position holds something other than a string.
    #[error("object key at token {index} is {kind}, expected string")]
    NonStringKey {
        /// Index of the key token.
        index: usize,
        /// Its kind.
        kind: TokenKind,
    },
    /// An object reports a negative number of children.
    #[error("object at token {index} has negative size {size}")]
    NegativeSize {
        /// Index of the object token.
        index: usize,
        /// The reported size.
        size: isize,
    },
    /// The token stream ended where another token was required.
    #[error("missing token at index {index}")]
    MissingToken {
        /// Index that was expected to hold a token.
        index: usize,
    },
    /// A key span that cannot be turned into a path segment, such as `""`.
    #[error("invalid key at token {index}")]
    InvalidKey {
        /// Index of the key token.
        index: usize,
    },
    /// The root object does not account for every token.
    #[error("root consumed {consumed} of {total} tokens")]
    TrailingTokens {
        /// Tokens consumed by the root object.
        consumed: usize,
        /// Tokens produced by the tokenizer.
        total: usize,
    },
}
