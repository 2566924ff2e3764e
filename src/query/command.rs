//! Pattern directives.
//!
//! Each directive folds the fresh index hits for its own literal into the
//! running result of the directives before it. Every word in the running
//! result carries a chain of anchors, one per literal, in textual order.

use crate::index::matching::{Matching, MatchingEntries, MatchingResultSet};
use crate::index::types::Word;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// First literal of a pattern without a leading `*`: must match at position 0
    Begin(String),
    /// First literal after a leading `*`: earliest occurrence anywhere.
    /// An empty literal comes from an all-`*` pattern and matches every word.
    BeginAny(String),
    /// Literal after a `*` join: next occurrence after the previous anchor
    ExpressionAny(String),
    /// Literal after a CamelCase join: next occurrence, with no capital letter
    /// between it and the previous anchor
    ExpressionStrict(String),
}

impl Command {
    /// The literal this directive searches the index for
    pub fn pattern(&self) -> &str {
        match self {
            Command::Begin(p)
            | Command::BeginAny(p)
            | Command::ExpressionAny(p)
            | Command::ExpressionStrict(p) => p,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Begin(_) => "Begin",
            Command::BeginAny(_) => "BeginAny",
            Command::ExpressionAny(_) => "ExpressionAny",
            Command::ExpressionStrict(_) => "ExpressionStrict",
        }
    }

    /// Fold `fresh` (index hits for [`Command::pattern`]) into `running`.
    /// Neither input is modified.
    pub fn execute<W: Word>(
        &self,
        running: &MatchingResultSet<W>,
        fresh: &MatchingResultSet<W>,
    ) -> MatchingResultSet<W> {
        match self {
            Command::Begin(_) => fresh.transform(|_, entries| {
                let first = entries.first()?;
                (first.from() == 0).then(|| MatchingEntries::from(*first))
            }),
            Command::BeginAny(pattern) if pattern.is_empty() => {
                fresh.transform(|word, _| Some(first_char(word.as_ref()).into()))
            }
            Command::BeginAny(_) => {
                fresh.transform(|_, entries| entries.first().map(|m| MatchingEntries::from(*m)))
            }
            Command::ExpressionAny(_) => running.combine(fresh, |_, chain, hits| {
                let next = hits.find_nearest(chain.last()?)?;
                Some(extend(chain, *next))
            }),
            Command::ExpressionStrict(_) => running.combine(fresh, |word, chain, hits| {
                let last = chain.last()?;
                let next = hits.find_nearest(last)?;
                let gap = byte_slice(word.as_ref(), last.to(), next.from());
                (!gap.iter().any(u8::is_ascii_uppercase)).then(|| extend(chain, *next))
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.name(), self.pattern())
    }
}

fn extend(chain: &MatchingEntries, next: Matching) -> MatchingEntries {
    let mut chain = chain.clone();
    chain.add(next);
    chain
}

/// Span of the first character; the sentinel slot for an empty word
fn first_char(word: &str) -> Matching {
    let len = word.chars().next().map_or(1, char::len_utf8);
    Matching::new(0, len as u32)
}

/// `word[from..to]` as bytes, clamped to the word
fn byte_slice(word: &str, from: u32, to: u32) -> &[u8] {
    let bytes = word.as_bytes();
    let to = (to as usize).min(bytes.len());
    let from = (from as usize).min(to);
    &bytes[from..to]
}
