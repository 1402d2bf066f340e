use crate::{
    error::{FlattenError, StructuralError},
    map::FlatMap,
    options::FlattenOptions,
    projector::Projector,
    token_stream::TokenStream,
};

/// Flattens JSON objects into [`FlatMap`]s.
///
/// # Examples
///
/// ```rust
/// use jsonflat::Flattener;
///
/// let map = Flattener::default()
///     .parse(r#"{"a":{"b":1,"c":2},"d":"x"}"#)
///     .unwrap();
/// let entries: Vec<_> = map.iter().collect();
/// assert_eq!(
///     entries,
///     [("a.b", Some("1")), ("a.c", Some("2")), ("d", Some("x"))]
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Flattener {
    options: FlattenOptions,
}

impl Flattener {
    /// Creates a flattener with the given options.
    #[must_use]
    pub fn new(options: FlattenOptions) -> Self {
        Self { options }
    }

    /// The options this flattener was built with.
    #[must_use]
    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Tokenizes `json` and projects its root object into a new map.
    ///
    /// Whitespace-only input yields an empty map. On any error the partially
    /// filled map is dropped before returning, so nothing outlives the call.
    ///
    /// # Errors
    ///
    /// - [`FlattenError::EmptyInput`] for an empty buffer.
    /// - [`FlattenError::Tokenize`] for malformed JSON or too many tokens.
    /// - [`FlattenError::Structural`] when the root is not an object, a value
    ///   is an array, or the root is followed by further values.
    /// - [`FlattenError::DepthExceeded`] and [`FlattenError::InvalidSpan`] as
    ///   configured in [`FlattenOptions`].
    pub fn parse(&self, json: impl AsRef<[u8]>) -> Result<FlatMap, FlattenError> {
        let json = json.as_ref();
        if json.is_empty() {
            return Err(FlattenError::EmptyInput);
        }

        let tokens = TokenStream::tokenize(json, self.options.tokens)?;
        let mut map = FlatMap::new();
        if tokens.is_empty() {
            return Ok(map);
        }

        let consumed = Projector::new(json, &tokens, &self.options, &mut map).project(0, None)?;
        if consumed != tokens.len() {
            return Err(StructuralError::TrailingTokens {
                consumed,
                total: tokens.len(),
            }
            .into());
        }

        Ok(map)
    }
}

/// Flattens `json` with default options.
///
/// Returns `None` for empty input and for every failure; the reason is logged
/// at `debug` level. Use [`Flattener::parse`] to inspect it instead.
///
/// ```rust
/// assert!(jsonflat::parse_json("").is_none());
/// assert!(jsonflat::parse_json(r#"{"a":[1,2]}"#).is_none());
/// assert!(jsonflat::parse_json("{}").unwrap().is_empty());
/// ```
#[must_use]
pub fn parse_json(json: impl AsRef<[u8]>) -> Option<FlatMap> {
    Flattener::default()
        .parse(json)
        .inspect_err(|err| log::debug!("discarding JSON document: {err}"))
        .ok()
}
