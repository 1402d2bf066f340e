//! Projector: walks the flat token array as an implicit tree.
//!
//! The token array carries no parent pointers. Each container records how
//! many children follow it, and every projection step reports how many
//! array slots it consumed so the enclosing object can step over the whole
//! subtree to reach its next key.
//!
//! Invariants
//! - An object of size `n` is followed by `n` pairs, each a key string and a
//!   value subtree. The value starts right after its key.
//! - The return value of an object projection is the exact number of slots
//!   its subtree occupies. For objects whose values are all scalars this is
//!   `size * 2 + 1`.
//! - Each pair resolves its key once, as either the stored map key with the
//!   same text or the freshly built path, and uses that one `Arc<str>` for
//!   the whole subtree.
//! - Nothing here frees on failure. The caller drops the partially filled
//!   map along with the error.

use alloc::{boxed::Box, sync::Arc};

use crate::{
    error::{FlattenError, StructuralError},
    map::{FlatMap, FlatValue},
    options::{FlattenOptions, InvalidSpanMode},
    path::{build_path, token_text},
    token::{Token, TokenKind},
};

pub(crate) struct Projector<'a> {
    src: &'a [u8],
    tokens: &'a [Token],
    options: &'a FlattenOptions,
    map: &'a mut FlatMap,
    depth: usize,
}

impl<'a> Projector<'a> {
    pub(crate) fn new(
        src: &'a [u8],
        tokens: &'a [Token],
        options: &'a FlattenOptions,
        map: &'a mut FlatMap,
    ) -> Self {
        Self {
            src,
            tokens,
            options,
            map,
            depth: 0,
        }
    }

    /// Projects the token at `index` under `path` and returns the number of
    /// tokens it consumed. `path` is `None` only for the document root.
    pub(crate) fn project(
        &mut self,
        index: usize,
        path: Option<&Arc<str>>,
    ) -> Result<usize, FlattenError> {
        let token = self.token(index)?;
        match (token.kind, path) {
            (TokenKind::Object, _) => self.project_object(index, path),
            (_, Some(path)) if token.is_leaf() => self.project_leaf(index, path),
            (kind, None) => Err(StructuralError::RootNotObject { kind }.into()),
            (kind, Some(_)) => Err(StructuralError::UnsupportedValue { index, kind }.into()),
        }
    }

    fn project_object(
        &mut self,
        index: usize,
        base: Option<&Arc<str>>,
    ) -> Result<usize, FlattenError> {
        let token = self.token(index)?;
        if token.kind != TokenKind::Object {
            return Err(StructuralError::UnsupportedValue {
                index,
                kind: token.kind,
            }
            .into());
        }

        let size = usize::try_from(token.size).map_err(|_| StructuralError::NegativeSize {
            index,
            size: token.size,
        })?;
        if size == 0 {
            return Ok(1);
        }

        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(FlattenError::DepthExceeded {
                max: self.options.max_depth,
            });
        }

        let mut cursor = index + 1;
        for _ in 0..size {
            let key = self.token(cursor)?;
            if key.kind != TokenKind::String {
                return Err(StructuralError::NonStringKey {
                    index: cursor,
                    kind: key.kind,
                }
                .into());
            }

            let candidate = build_path(
                base.map(|base| &**base),
                self.options.separator,
                self.src,
                Some(key),
            )
            .ok_or(StructuralError::InvalidKey { index: cursor })?;
            let key = self.map.intern(candidate);

            let consumed = self.project(cursor + 1, Some(&key))?;
            cursor += consumed + 1;
        }

        self.depth -= 1;
        Ok(cursor - index)
    }

    fn project_leaf(&mut self, index: usize, path: &Arc<str>) -> Result<usize, FlattenError> {
        let token = self.token(index)?;
        let value: FlatValue = match token_text(self.src, Some(token)) {
            Some(text) => Some(text.into_boxed_str()),
            None => match self.options.invalid_span {
                InvalidSpanMode::Null => None,
                InvalidSpanMode::Empty => Some(Box::from("")),
                InvalidSpanMode::Fail => {
                    return Err(FlattenError::InvalidSpan {
                        index,
                        start: token.start,
                        end: token.end,
                    });
                }
            },
        };

        if let Some(previous) = self.map.put(Arc::clone(path), value) {
            log::trace!("replaced value {previous:?} at {path:?}");
        }

        Ok(1)
    }

    fn token(&self, index: usize) -> Result<&'a Token, StructuralError> {
        self.tokens
            .get(index)
            .ok_or(StructuralError::MissingToken { index })
    }
}
