use crate::error::Result;
use crate::index::matching::MatchingResultSet;
use crate::index::suffix_tree::SuffixTree;
use crate::index::types::Searchable;
use crate::query::lexer::LexemeSource;
use crate::query::tokenizer::PatternCommandTokenizer;
use std::time::Instant;

/// Matches wildcard and CamelCase patterns against an indexed vocabulary.
///
/// The index is immutable after construction and every query builds its own
/// tokenizer, so one matcher can serve concurrent queries through `&self`.
pub struct PatternMatcher<S> {
    index: S,
}

impl<W: Ord + AsRef<str>> PatternMatcher<SuffixTree<W>> {
    /// Index `words` in a suffix tree; `None` entries are skipped
    pub fn new<I, T>(words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<W>>,
    {
        Self::with_index(SuffixTree::new(words))
    }
}

impl<S: Searchable> PatternMatcher<S> {
    pub fn with_index(index: S) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &S {
        &self.index
    }

    /// Every word matching `pattern`, each with its anchor chain in textual
    /// order. A malformed pattern yields an error and no partial result.
    pub fn match_pattern(&self, pattern: &str) -> Result<MatchingResultSet<&S::Item>> {
        self.match_with(&mut PatternCommandTokenizer::new(), pattern)
    }

    /// Like [`PatternMatcher::match_pattern`], driving the given tokenizer
    pub fn match_with<L: LexemeSource>(
        &self,
        tokenizer: &mut PatternCommandTokenizer<L>,
        pattern: &str,
    ) -> Result<MatchingResultSet<&S::Item>> {
        let start = Instant::now();
        tokenizer.restart(pattern);

        let mut running = MatchingResultSet::empty();
        let mut directives = 0;
        while let Some(command) = tokenizer.next_command()? {
            let fresh = self.index.search(command.pattern());
            running = command.execute(&running, &fresh);
            directives += 1;
            log::trace!(
                "{}: {} hits -> {} words",
                command,
                fresh.len(),
                running.len()
            );
        }

        log::debug!(
            "pattern {:?}: {} directives, {} words in {:?}",
            pattern,
            directives,
            running.len(),
            start.elapsed()
        );
        Ok(running)
    }
}
