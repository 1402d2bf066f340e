//! Owns the token buffer for one parse and grows it until the tokenizer
//! fits.

use alloc::{vec, vec::Vec};
use core::ops::Deref;

use crate::{
    error::TokenizeError,
    options::TokenLimits,
    token::Token,
    tokenizer::Tokenizer,
};

/// The tokens of one document, trimmed to the number actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenizes `src`, starting with `limits.initial` slots and doubling on
    /// overflow up to `limits.max`.
    ///
    /// # Errors
    ///
    /// [`TokenizeError::TokenLimit`] if the document needs more than
    /// `limits.max` tokens, or the tokenizer's error for malformed input.
    pub fn tokenize(src: &[u8], limits: TokenLimits) -> Result<Self, TokenizeError> {
        let mut tokenizer = Tokenizer::new();
        let mut capacity = limits.initial.clamp(1, limits.max.max(1));
        let mut tokens = vec![Token::default(); capacity];

        loop {
            match tokenizer.tokenize(src, &mut tokens) {
                Ok(count) => {
                    tokens.truncate(count);
                    return Ok(Self { tokens });
                }
                Err(TokenizeError::NoMemory) if capacity < limits.max => {
                    capacity = capacity.saturating_mul(2).min(limits.max);
                    log::trace!("growing token buffer to {capacity}");
                    tokens.resize(capacity, Token::default());
                }
                Err(TokenizeError::NoMemory) => {
                    return Err(TokenizeError::TokenLimit { limit: limits.max });
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the document held only whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Deref for TokenStream {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;
    use crate::token::TokenKind;

    fn wide_object(keys: usize) -> String {
        let members: Vec<String> = (0..keys).map(|i| format!("\"k{i}\":{i}")).collect();
        format!("{{{}}}", members.join(","))
    }

    #[test]
    fn grows_from_the_initial_size() {
        // 1 object + 2 tokens per member
        let src = wide_object(100);
        let stream = TokenStream::tokenize(src.as_bytes(), TokenLimits::default()).unwrap();
        assert_eq!(stream.len(), 201);
        assert_eq!(stream[0].kind, TokenKind::Object);
        assert_eq!(stream[0].size, 100);
    }

    #[test]
    fn cap_is_a_hard_limit() {
        let limits = TokenLimits {
            initial: 2,
            max: 10,
        };
        // 11 tokens do not fit even after clamping growth to 10
        assert_eq!(
            TokenStream::tokenize(wide_object(5).as_bytes(), limits),
            Err(TokenizeError::TokenLimit { limit: 10 })
        );
        // 9 tokens fit
        assert_eq!(
            TokenStream::tokenize(wide_object(4).as_bytes(), limits)
                .unwrap()
                .len(),
            9
        );
    }

    #[test]
    fn exactly_at_the_cap_fits() {
        let limits = TokenLimits {
            initial: 4,
            max: 11,
        };
        assert_eq!(
            TokenStream::tokenize(wide_object(5).as_bytes(), limits)
                .unwrap()
                .len(),
            11
        );
    }

    #[test]
    fn whitespace_is_an_empty_stream() {
        let stream = TokenStream::tokenize(b"  \n", TokenLimits::default()).unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn syntax_errors_are_not_retried() {
        assert_eq!(
            TokenStream::tokenize(b"{,}", TokenLimits::default()),
            Err(TokenizeError::InvalidCharacter {
                byte: b',',
                offset: 1
            })
        );
    }
}
