use crate::index::matching::MatchingResultSet;

/// Terminal sentinel appended to every indexed word.
///
/// `0xFF` never occurs in UTF-8, so it cannot collide with word content.
pub const SENTINEL: u8 = 0xFF;

/// Anything that can key a result set: ordered, cheaply cloned, and readable
/// as text. Implemented for `String`, `&str`, and references to any word type.
pub trait Word: Ord + Clone + AsRef<str> {}

impl<T: Ord + Clone + AsRef<str>> Word for T {}

/// Position of a word in the index's sorted vocabulary.
///
/// Ids are assigned in word order, so ordering ids orders words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(u32);

impl WordId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Substring search over a fixed vocabulary
pub trait Searchable {
    type Item: Ord + AsRef<str>;

    /// All occurrences of `pattern` in every word, one `[from, from + len)`
    /// interval per occurrence. An empty pattern matches the terminal sentinel.
    fn search(&self, pattern: &str) -> MatchingResultSet<&Self::Item>;
}
