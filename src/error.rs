//! Error types for pattern compilation and execution.

use thiserror::Error;

/// Errors produced while lexing, tokenizing, or executing a pattern.
///
/// Only [`MatchError::MalformedPattern`] is caused by user input; the other
/// variants indicate a misuse of the engine or a grammar mismatch between the
/// lexer and the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The pattern cannot be compiled into directives
    #[error("malformed pattern {pattern:?}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// A state machine received an event it has no transition for
    #[error("unexpected event {event} for state {state}")]
    UnexpectedEvent { event: String, state: String },

    /// The scanner was asked for a lexeme before `restart` was called
    #[error("scanner has not been initialized with a pattern")]
    ScannerNotStarted,

    /// A state machine was built without an initial state
    #[error("state machine has no initial state")]
    MissingInitialState,

    /// A state machine was built without a finished state
    #[error("state machine has no finished state")]
    MissingFinishedState,
}

impl MatchError {
    /// Whether the error was caused by the pattern text rather than by the engine
    pub fn is_user_error(&self) -> bool {
        matches!(self, MatchError::MalformedPattern { .. })
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
