//! Turns a lexeme stream into directives.
//!
//! Grammar, as transitions over lexeme kinds:
//!
//! ```text
//! Initial   --Literal-->  Begin     emits Begin(literal)
//! Initial   --Any------>  BeginAny
//! BeginAny  --Literal-->  Begin     emits BeginAny(literal)
//! Begin     --Any------>  ExprAny
//! Begin     --Strict--->  ExprStrict
//! ExprAny   --Literal-->  Begin     emits ExpressionAny(literal)
//! ExprStrict--Literal-->  Begin     emits ExpressionStrict(literal)
//! *         --End------>  Finished  (BeginAny emits BeginAny(""); ExprStrict fails)
//! ```

use crate::error::{MatchError, Result};
use crate::query::command::Command;
use crate::query::lexer::{Lexeme, LexemeKind, LexemeSource, Scanner};
use crate::utils::fsm::{Action, FiniteStateMachine};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GrammarState {
    Initial,
    Begin,
    BeginAny,
    ExprAny,
    ExprStrict,
    Finished,
}

/// Tokenizer side of a transition: the literal being consumed and the
/// directive it produced, if any
#[derive(Default)]
struct Pending {
    pattern: String,
    literal: String,
    command: Option<Command>,
}

type GrammarAction = Action<GrammarState, LexemeKind, Pending>;

fn emit_begin(p: &mut Pending, _: GrammarState, _: GrammarState, _: LexemeKind) -> Result<()> {
    p.command = Some(Command::Begin(std::mem::take(&mut p.literal)));
    Ok(())
}

fn emit_begin_any(p: &mut Pending, _: GrammarState, _: GrammarState, _: LexemeKind) -> Result<()> {
    p.command = Some(Command::BeginAny(std::mem::take(&mut p.literal)));
    Ok(())
}

fn emit_expression_any(
    p: &mut Pending,
    _: GrammarState,
    _: GrammarState,
    _: LexemeKind,
) -> Result<()> {
    p.command = Some(Command::ExpressionAny(std::mem::take(&mut p.literal)));
    Ok(())
}

fn emit_expression_strict(
    p: &mut Pending,
    _: GrammarState,
    _: GrammarState,
    _: LexemeKind,
) -> Result<()> {
    p.command = Some(Command::ExpressionStrict(std::mem::take(&mut p.literal)));
    Ok(())
}

fn emit_match_all(p: &mut Pending, _: GrammarState, _: GrammarState, _: LexemeKind) -> Result<()> {
    p.command = Some(Command::BeginAny(String::new()));
    Ok(())
}

fn dangling_strict(p: &mut Pending, _: GrammarState, _: GrammarState, _: LexemeKind) -> Result<()> {
    Err(MatchError::MalformedPattern {
        pattern: p.pattern.clone(),
        reason: "strict join with nothing after it".to_string(),
    })
}

fn no_command(_: &mut Pending, _: GrammarState, _: GrammarState, _: LexemeKind) -> Result<()> {
    Ok(())
}

static GRAMMAR_MACHINE: LazyLock<FiniteStateMachine<GrammarState, LexemeKind, Pending>> =
    LazyLock::new(|| {
        use GrammarState as S;
        use LexemeKind as K;

        let transitions: [(GrammarState, GrammarState, LexemeKind, GrammarAction); 13] = [
            (S::Initial, S::Begin, K::Literal, emit_begin),
            (S::Initial, S::BeginAny, K::AnyConcat, no_command),
            (S::Initial, S::Finished, K::End, no_command),
            (S::BeginAny, S::BeginAny, K::AnyConcat, no_command),
            (S::BeginAny, S::Begin, K::Literal, emit_begin_any),
            (S::BeginAny, S::Finished, K::End, emit_match_all),
            (S::Begin, S::ExprAny, K::AnyConcat, no_command),
            (S::Begin, S::ExprStrict, K::StrictConcat, no_command),
            (S::Begin, S::Finished, K::End, no_command),
            (S::ExprAny, S::ExprAny, K::AnyConcat, no_command),
            (S::ExprAny, S::Begin, K::Literal, emit_expression_any),
            (S::ExprAny, S::Finished, K::End, no_command),
            (S::ExprStrict, S::Begin, K::Literal, emit_expression_strict),
        ];

        transitions
            .into_iter()
            .fold(FiniteStateMachine::builder(), |builder, (from, to, event, action)| {
                builder.transition(from, to, event, action)
            })
            .transition(S::ExprStrict, S::Finished, K::End, dangling_strict)
            .initial_state(S::Initial)
            .finished_state(S::Finished)
            .build()
            .expect("grammar transition table declares initial and finished states")
    });

/// Produces directives for a pattern, one at a time
pub struct PatternCommandTokenizer<L = Scanner> {
    lexer: L,
    fsm: FiniteStateMachine<GrammarState, LexemeKind, Pending>,
    pending: Pending,
}

impl PatternCommandTokenizer<Scanner> {
    pub fn new() -> Self {
        Self::with_source(Scanner::new())
    }
}

impl Default for PatternCommandTokenizer<Scanner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LexemeSource> PatternCommandTokenizer<L> {
    /// Tokenize lexemes from any source instead of the pattern scanner
    pub fn with_source(lexer: L) -> Self {
        Self {
            lexer,
            fsm: GRAMMAR_MACHINE.fresh(),
            pending: Pending::default(),
        }
    }

    /// Start over on `pattern`
    pub fn restart(&mut self, pattern: &str) {
        self.lexer.restart(pattern);
        self.fsm.reset();
        self.pending = Pending {
            pattern: pattern.to_string(),
            ..Pending::default()
        };
    }

    /// Next directive, or `None` once the pattern is exhausted
    pub fn next_command(&mut self) -> Result<Option<Command>> {
        loop {
            if let Some(command) = self.pending.command.take() {
                return Ok(Some(command));
            }
            if self.fsm.is_finished() {
                return Ok(None);
            }

            let Some(lexeme) = self.lexer.next_lexeme()? else {
                return Ok(None);
            };
            let kind = lexeme.kind();
            if let Lexeme::Literal(text) = lexeme {
                self.pending.literal = text;
            }
            self.fsm.dispatch(&mut self.pending, kind)?;
        }
    }
}

/// All directives of `pattern`
pub fn compile(pattern: &str) -> Result<Vec<Command>> {
    let mut tokenizer = PatternCommandTokenizer::new();
    tokenizer.restart(pattern);

    let mut commands = Vec::new();
    while let Some(command) = tokenizer.next_command()? {
        commands.push(command);
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed lexeme sequence
    struct Scripted {
        script: Vec<Lexeme>,
        queue: VecDeque<Lexeme>,
    }

    impl Scripted {
        fn new(script: Vec<Lexeme>) -> Self {
            Self {
                script,
                queue: VecDeque::new(),
            }
        }
    }

    impl LexemeSource for Scripted {
        fn restart(&mut self, _pattern: &str) {
            self.queue = self.script.iter().cloned().collect();
        }

        fn next_lexeme(&mut self) -> Result<Option<Lexeme>> {
            Ok(self.queue.pop_front())
        }
    }

    fn begin(s: &str) -> Command {
        Command::Begin(s.to_string())
    }

    fn begin_any(s: &str) -> Command {
        Command::BeginAny(s.to_string())
    }

    fn any(s: &str) -> Command {
        Command::ExpressionAny(s.to_string())
    }

    fn strict(s: &str) -> Command {
        Command::ExpressionStrict(s.to_string())
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(compile("Abc").unwrap(), vec![begin("Abc")]);
        assert_eq!(compile("abc").unwrap(), vec![begin("abc")]);
    }

    #[test]
    fn test_leading_asterisk() {
        assert_eq!(compile("*Abc").unwrap(), vec![begin_any("Abc")]);
        assert_eq!(compile("***Abc").unwrap(), vec![begin_any("Abc")]);
    }

    #[test]
    fn test_camel_case_joins() {
        assert_eq!(compile("AD").unwrap(), vec![begin("A"), strict("D")]);
        assert_eq!(
            compile("AbcDefGh").unwrap(),
            vec![begin("Abc"), strict("Def"), strict("Gh")]
        );
    }

    #[test]
    fn test_asterisk_joins() {
        assert_eq!(compile("A*f").unwrap(), vec![begin("A"), any("f")]);
        assert_eq!(
            compile("*Ab*Cd").unwrap(),
            vec![begin_any("Ab"), any("Cd")]
        );
        assert_eq!(
            compile("*AbCd*ef").unwrap(),
            vec![begin_any("Ab"), strict("Cd"), any("ef")]
        );
    }

    #[test]
    fn test_trailing_asterisk_adds_nothing() {
        assert_eq!(compile("Abc*").unwrap(), vec![begin("Abc")]);
    }

    #[test]
    fn test_only_asterisks_matches_everything() {
        assert_eq!(compile("*").unwrap(), vec![begin_any("")]);
        assert_eq!(compile("****").unwrap(), vec![begin_any("")]);
    }

    #[test]
    fn test_empty_pattern_has_no_commands() {
        assert_eq!(compile("").unwrap(), Vec::<Command>::new());
    }

    #[test]
    fn test_exhausted_tokenizer_keeps_returning_none() {
        let mut tokenizer = PatternCommandTokenizer::new();
        tokenizer.restart("Ab");
        assert_eq!(tokenizer.next_command().unwrap(), Some(begin("Ab")));
        assert_eq!(tokenizer.next_command().unwrap(), None);
        assert_eq!(tokenizer.next_command().unwrap(), None);
    }

    #[test]
    fn test_restart_discards_previous_pattern() {
        let mut tokenizer = PatternCommandTokenizer::new();
        tokenizer.restart("AbCd");
        assert_eq!(tokenizer.next_command().unwrap(), Some(begin("Ab")));

        tokenizer.restart("*x");
        assert_eq!(tokenizer.next_command().unwrap(), Some(begin_any("x")));
        assert_eq!(tokenizer.next_command().unwrap(), None);
    }

    #[test]
    fn test_dangling_strict_join_is_malformed() {
        let mut tokenizer = PatternCommandTokenizer::with_source(Scripted::new(vec![
            Lexeme::literal("A"),
            Lexeme::StrictConcat,
            Lexeme::End,
        ]));
        tokenizer.restart("A?");

        assert_eq!(tokenizer.next_command().unwrap(), Some(begin("A")));
        let err = tokenizer.next_command().unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(
            err,
            MatchError::MalformedPattern {
                pattern: "A?".to_string(),
                reason: "strict join with nothing after it".to_string(),
            }
        );
    }

    #[test]
    fn test_grammar_violation_is_unexpected_event() {
        let mut tokenizer = PatternCommandTokenizer::with_source(Scripted::new(vec![
            Lexeme::StrictConcat,
            Lexeme::End,
        ]));
        tokenizer.restart("");
        let err = tokenizer.next_command().unwrap_err();
        assert!(matches!(err, MatchError::UnexpectedEvent { .. }));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_two_literals_in_a_row_are_rejected() {
        let mut tokenizer = PatternCommandTokenizer::with_source(Scripted::new(vec![
            Lexeme::literal("a"),
            Lexeme::literal("b"),
            Lexeme::End,
        ]));
        tokenizer.restart("ab");
        assert_eq!(tokenizer.next_command().unwrap(), Some(begin("a")));
        assert!(tokenizer.next_command().is_err());
    }
}
