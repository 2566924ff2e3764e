//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file in the user's config directory
//! - [`fsm`] - Table-driven finite state machine shared by the lexer and tokenizer
//! - [`identifiers`] - Identifier extraction from source text
//! - [`progress`] - Optional progress reporting while scanning a codebase

pub mod app_data;
pub mod fsm;
pub mod identifiers;
pub mod progress;

pub use app_data::*;
pub use identifiers::*;
pub use progress::ScanProgress;
