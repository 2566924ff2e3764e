pub mod command;
pub mod lexer;
pub mod matcher;
pub mod tokenizer;

pub use command::Command;
pub use lexer::{Lexeme, LexemeKind, LexemeSource, Scanner};
pub use matcher::PatternMatcher;
pub use tokenizer::{PatternCommandTokenizer, compile};
