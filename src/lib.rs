//! # hump - CamelCase and wildcard matching for identifiers
//!
//! Matches short patterns like `AD`, `*Map` or `A*f` against a vocabulary of
//! identifiers, the way IDE "go to symbol" boxes do, and reports the byte
//! spans each pattern piece matched so callers can highlight them.
//!
//! ## Architecture
//!
//! - [`index`] - Annotated suffix tree, interval algebra, vocabulary sources
//! - [`query`] - Pattern lexer, directive tokenizer, directives and matcher
//! - [`output`] - Highlighted terminal and JSON rendering
//! - [`utils`] - State machine engine, configuration, identifier extraction
//! - [`error`] - Error type shared by the lexer, tokenizer and matcher
//!
//! ## Quick Start
//!
//! ```
//! use hump::query::PatternMatcher;
//!
//! let matcher = PatternMatcher::new(["AbcDef", "AbcDefGhj", "xyzAbcDef"]);
//!
//! // `A` and `D` joined CamelCase-style: only lower-case letters between them
//! let results = matcher.match_pattern("AD").unwrap();
//! assert_eq!(results.len(), 2);
//!
//! for (word, spans) in &results {
//!     println!("{}: {}", word, spans);
//! }
//! ```
//!
//! ## Patterns
//!
//! - `Abc` - words starting with `Abc`
//! - `*Abc` - words containing `Abc`
//! - `AbDe` - `Ab`, then `De` with no capital letter skipped in between
//! - `A*f` - `A` at the start, then `f` anywhere after it
//! - `*` - every word

pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;
