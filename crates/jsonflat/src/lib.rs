//! Flattens a JSON object into a map from dotted paths to leaf text.
//!
//! ```rust
//! let map = jsonflat::parse_json(r#"{"server":{"host":"::1","port":8080},"debug":false}"#)
//!     .expect("valid document");
//!
//! assert_eq!(map.get_text("server.host"), Some("::1"));
//! assert_eq!(map.get_text("server.port"), Some("8080"));
//! assert_eq!(map.get_text("debug"), Some("false"));
//! ```
//!
//! The input is split into a flat array of typed spans by a small strict
//! tokenizer, then walked depth-first without building a tree. Leaf values
//! are the raw source text of each string or primitive: quotes are dropped,
//! escapes are left as written, and numbers keep their spelling. Arrays are
//! not supported as values and make the whole parse fail.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod flatten;
mod map;
mod options;
mod path;
mod projector;
mod token;
mod token_stream;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use error::{FlattenError, StructuralError, TokenizeError};
pub use flatten::{Flattener, parse_json};
pub use map::{FlatMap, FlatValue, IntoIter, Iter};
pub use options::{FlattenOptions, InvalidSpanMode, TokenLimits};
pub use path::{build_path, token_text};
pub use token::{Token, TokenKind};
pub use token_stream::TokenStream;
pub use tokenizer::Tokenizer;
