/// Configuration for [`Flattener`](crate::Flattener).
///
/// # Examples
///
/// ```rust
/// use jsonflat::{FlattenOptions, Flattener, InvalidSpanMode};
///
/// let flattener = Flattener::new(FlattenOptions {
///     separator: '/',
///     invalid_span: InvalidSpanMode::Empty,
///     ..Default::default()
/// });
/// let map = flattener.parse(r#"{"a":{"b":""}}"#).unwrap();
/// assert_eq!(map.get_text("a/b"), Some(""));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Character placed between path segments.
    ///
    /// # Default
    ///
    /// `'.'`
    pub separator: char,

    /// Maximum number of nested objects, counting the root.
    ///
    /// Deeper documents fail with
    /// [`FlattenError::DepthExceeded`](crate::FlattenError::DepthExceeded)
    /// instead of growing the call stack without bound.
    ///
    /// # Default
    ///
    /// `512`
    pub max_depth: usize,

    /// What to store when a leaf span cannot be extracted, which happens for
    /// the empty string `""`.
    ///
    /// # Default
    ///
    /// [`InvalidSpanMode::Null`]
    pub invalid_span: InvalidSpanMode,

    /// Sizing of the token buffer.
    pub tokens: TokenLimits,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: '.',
            max_depth: 512,
            invalid_span: InvalidSpanMode::default(),
            tokens: TokenLimits::default(),
        }
    }
}

/// How a leaf with an unusable span is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidSpanMode {
    /// Keep the key with no value.
    #[default]
    Null,
    /// Keep the key with an empty text value.
    Empty,
    /// Abort the whole parse.
    Fail,
}

/// Initial size and hard cap of the token buffer.
///
/// The buffer starts at `initial` slots and doubles each time the tokenizer
/// runs out of room, never past `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimits {
    /// Slots allocated for the first tokenizing attempt.
    ///
    /// # Default
    ///
    /// `32`
    pub initial: usize,
    /// Largest number of slots the buffer may grow to.
    ///
    /// # Default
    ///
    /// `10240`
    pub max: usize,
}

impl Default for TokenLimits {
    fn default() -> Self {
        Self {
            initial: 32,
            max: 10_240,
        }
    }
}
