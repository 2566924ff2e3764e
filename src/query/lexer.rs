//! Pattern scanner.
//!
//! Splits a raw pattern into lexemes:
//!
//! - a run of `*` becomes one [`Lexeme::AnyConcat`]
//! - a run of other characters becomes a [`Lexeme::Literal`], except that a
//!   second capital letter inside the same run closes the literal and inserts
//!   a [`Lexeme::StrictConcat`] (`"AbcDef"` scans as `Abc`, strict, `Def`)
//! - the end of input flushes the pending literal and yields [`Lexeme::End`]
//!
//! Lexemes are produced lazily; one input character may yield zero, one, or
//! two lexemes.

use crate::error::{MatchError, Result};
use crate::utils::fsm::FiniteStateMachine;
use std::collections::VecDeque;
use std::fmt;
use std::sync::LazyLock;

/// Atomic token of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lexeme {
    /// Literal text to search for
    Literal(String),
    /// `*` join: anything may come between the neighbouring literals
    AnyConcat,
    /// CamelCase join: only lower-case characters between the neighbouring literals
    StrictConcat,
    /// End of pattern
    End,
}

/// Lexeme discriminant, used as the tokenizer's event alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeKind {
    Literal,
    AnyConcat,
    StrictConcat,
    End,
}

impl Lexeme {
    pub fn literal(text: impl Into<String>) -> Self {
        Lexeme::Literal(text.into())
    }

    pub fn kind(&self) -> LexemeKind {
        match self {
            Lexeme::Literal(_) => LexemeKind::Literal,
            Lexeme::AnyConcat => LexemeKind::AnyConcat,
            Lexeme::StrictConcat => LexemeKind::StrictConcat,
            Lexeme::End => LexemeKind::End,
        }
    }

    /// Literal text, empty for joins and the end marker
    pub fn text(&self) -> &str {
        match self {
            Lexeme::Literal(text) => text,
            _ => "",
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lexeme::Literal(text) => write!(f, "LITERAL:{}", text),
            Lexeme::AnyConcat => write!(f, "ANY"),
            Lexeme::StrictConcat => write!(f, "STRICT"),
            Lexeme::End => write!(f, "END"),
        }
    }
}

/// A restartable producer of lexemes
pub trait LexemeSource {
    /// Start over on a new pattern, dropping any queued lexemes
    fn restart(&mut self, pattern: &str);

    /// Next lexeme, or `None` once [`Lexeme::End`] has been handed out
    fn next_lexeme(&mut self) -> Result<Option<Lexeme>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum State {
    Initial,
    Asterisk,
    Symbol,
    CapitalSymbol,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CharClass {
    Asterisk,
    Capital,
    Symbol,
    Eof,
}

/// Scanning position within one pattern
struct Cursor {
    pattern: String,
    /// Byte offset of the next unclassified character
    pos: usize,
    /// Byte offset where the literal being scanned begins
    lexeme_start: usize,
    pending: VecDeque<Lexeme>,
}

impl Cursor {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            pos: 0,
            lexeme_start: 0,
            pending: VecDeque::new(),
        }
    }

    fn char_class(&self) -> CharClass {
        match self.pattern[self.pos..].chars().next() {
            None => CharClass::Eof,
            Some('*') => CharClass::Asterisk,
            Some(c) if c.is_ascii_uppercase() => CharClass::Capital,
            Some(_) => CharClass::Symbol,
        }
    }

    fn advance(&mut self) {
        if let Some(c) = self.pattern[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn begin_literal(&mut self) {
        self.lexeme_start = self.pos;
    }

    fn emit_literal(&mut self) {
        let text = &self.pattern[self.lexeme_start..self.pos];
        self.pending.push_back(Lexeme::literal(text));
    }
}

type ScanAction = fn(&mut Cursor, State, State, CharClass) -> Result<()>;

fn skip(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.advance();
    Ok(())
}

fn start_literal(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.begin_literal();
    cursor.advance();
    Ok(())
}

fn finish(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.pending.push_back(Lexeme::End);
    Ok(())
}

fn any_then_literal(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.pending.push_back(Lexeme::AnyConcat);
    cursor.begin_literal();
    cursor.advance();
    Ok(())
}

fn any_then_end(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.pending.push_back(Lexeme::AnyConcat);
    cursor.pending.push_back(Lexeme::End);
    Ok(())
}

fn literal_then_asterisk(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.emit_literal();
    cursor.advance();
    Ok(())
}

fn literal_then_end(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.emit_literal();
    cursor.pending.push_back(Lexeme::End);
    Ok(())
}

fn literal_then_strict(cursor: &mut Cursor, _: State, _: State, _: CharClass) -> Result<()> {
    cursor.emit_literal();
    cursor.pending.push_back(Lexeme::StrictConcat);
    cursor.begin_literal();
    cursor.advance();
    Ok(())
}

static SCANNER_MACHINE: LazyLock<FiniteStateMachine<State, CharClass, Cursor>> =
    LazyLock::new(|| {
        use CharClass as C;
        use State as S;

        let transitions: [(State, State, CharClass, ScanAction); 16] = [
            (S::Initial, S::CapitalSymbol, C::Capital, start_literal),
            (S::Initial, S::Symbol, C::Symbol, start_literal),
            (S::Initial, S::Asterisk, C::Asterisk, skip),
            (S::Initial, S::Finished, C::Eof, finish),
            (S::Asterisk, S::Asterisk, C::Asterisk, skip),
            (S::Asterisk, S::CapitalSymbol, C::Capital, any_then_literal),
            (S::Asterisk, S::Symbol, C::Symbol, any_then_literal),
            (S::Asterisk, S::Finished, C::Eof, any_then_end),
            (S::Symbol, S::Symbol, C::Symbol, skip),
            (S::Symbol, S::CapitalSymbol, C::Capital, skip),
            (S::Symbol, S::Asterisk, C::Asterisk, literal_then_asterisk),
            (S::Symbol, S::Finished, C::Eof, literal_then_end),
            (S::CapitalSymbol, S::CapitalSymbol, C::Symbol, skip),
            (S::CapitalSymbol, S::CapitalSymbol, C::Capital, literal_then_strict),
            (S::CapitalSymbol, S::Asterisk, C::Asterisk, literal_then_asterisk),
            (S::CapitalSymbol, S::Finished, C::Eof, literal_then_end),
        ];

        transitions
            .into_iter()
            .fold(FiniteStateMachine::builder(), |builder, (from, to, event, action)| {
                builder.transition(from, to, event, action)
            })
            .initial_state(S::Initial)
            .finished_state(S::Finished)
            .build()
            .expect("scanner transition table declares initial and finished states")
    });

/// FSM-driven pattern scanner
pub struct Scanner {
    fsm: FiniteStateMachine<State, CharClass, Cursor>,
    cursor: Option<Cursor>,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            fsm: SCANNER_MACHINE.fresh(),
            cursor: None,
        }
    }

    /// Start scanning `pattern`, clearing positions and queued lexemes
    pub fn restart(&mut self, pattern: &str) {
        self.cursor = Some(Cursor::new(pattern));
        self.fsm.reset();
    }

    /// Next lexeme, or `None` after [`Lexeme::End`] was returned
    pub fn next(&mut self) -> Result<Option<Lexeme>> {
        let cursor = self.cursor.as_mut().ok_or(MatchError::ScannerNotStarted)?;

        while cursor.pending.is_empty() && !self.fsm.is_finished() {
            let class = cursor.char_class();
            self.fsm.dispatch(cursor, class)?;
        }

        Ok(cursor.pending.pop_front())
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LexemeSource for Scanner {
    fn restart(&mut self, pattern: &str) {
        Scanner::restart(self, pattern);
    }

    fn next_lexeme(&mut self) -> Result<Option<Lexeme>> {
        self.next()
    }
}

/// Scan a whole pattern, including the trailing [`Lexeme::End`]
pub fn scan(pattern: &str) -> Result<Vec<Lexeme>> {
    let mut scanner = Scanner::new();
    scanner.restart(pattern);

    let mut lexemes = Vec::new();
    while let Some(lexeme) = scanner.next()? {
        lexemes.push(lexeme);
    }
    Ok(lexemes)
}
