//! Interval algebra over per-word match positions.
//!
//! A [`MatchingResultSet`] maps each word to the ordered list of half-open
//! intervals where something matched inside it. The suffix tree uses it to
//! annotate nodes, and pattern directives fold one result set into the next.
//!
//! Within one word, intervals are kept strictly increasing by `from`; adding
//! an interval that does not start after the last one is silently ignored.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Half-open interval `[from, to)` of byte positions in a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Matching {
    from: u32,
    to: u32,
}

impl Matching {
    /// # Panics
    ///
    /// Panics if `from >= to`; empty intervals cannot be represented.
    pub fn new(from: u32, to: u32) -> Self {
        assert!(from < to, "empty matching [{}, {})", from, to);
        Self { from, to }
    }

    pub fn from(&self) -> u32 {
        self.from
    }

    pub fn to(&self) -> u32 {
        self.to
    }

    pub fn len(&self) -> u32 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Byte range for slicing the word
    pub fn range(&self) -> std::ops::Range<usize> {
        self.from as usize..self.to as usize
    }

    /// First `len` positions, keeping `from`
    fn left(&self, len: u32) -> Option<Self> {
        (len > 0).then(|| Self::new(self.from, self.to.min(self.from.saturating_add(len))))
    }

    /// Positions after the first `offset`, keeping `to`
    fn right(&self, offset: u32) -> Option<Self> {
        (offset < self.len()).then(|| Self::new(self.from + offset, self.to))
    }

    /// `[from + offset, from + offset + len)`, or `None` if that starts before 0
    fn shifted(&self, offset: i64, len: u32) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let from = u32::try_from(i64::from(self.from) + offset).ok()?;
        Some(Self::new(from, from.checked_add(len)?))
    }
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

/// Ordered matchings of one word, strictly increasing by `from`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MatchingEntries {
    matchings: Vec<Matching>,
}

impl MatchingEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `matching` if it starts after the current last entry; otherwise a no-op.
    /// Returns whether the matching was added.
    pub fn add(&mut self, matching: Matching) -> bool {
        match self.matchings.last() {
            Some(last) if matching.from <= last.from => false,
            _ => {
                self.matchings.push(matching);
                true
            }
        }
    }

    /// Builder-style [`add`](Self::add)
    pub fn with(mut self, from: u32, to: u32) -> Self {
        self.add(Matching::new(from, to));
        self
    }

    pub fn matchings(&self) -> &[Matching] {
        &self.matchings
    }

    pub fn first(&self) -> Option<&Matching> {
        self.matchings.first()
    }

    pub fn last(&self) -> Option<&Matching> {
        self.matchings.last()
    }

    pub fn len(&self) -> usize {
        self.matchings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matching> {
        self.matchings.iter()
    }

    /// First entry starting at or after the end of `anchor`.
    ///
    /// Binary search; relies on the entries being sorted by `from`.
    pub fn find_nearest(&self, anchor: &Matching) -> Option<&Matching> {
        let idx = self.matchings.partition_point(|m| m.from < anchor.to);
        self.matchings.get(idx)
    }

    /// Each entry cut down to its first `len` positions
    pub fn truncate_left(&self, len: u32) -> Option<Self> {
        self.map_matchings(|m| m.left(len))
    }

    /// Each entry with its first `offset` positions removed
    pub fn truncate_right(&self, offset: u32) -> Option<Self> {
        self.map_matchings(|m| m.right(offset))
    }

    /// Each entry replaced with `[from + offset, from + offset + len)`
    pub fn shift(&self, offset: i64, len: u32) -> Option<Self> {
        self.map_matchings(|m| m.shifted(offset, len))
    }

    fn map_matchings(&self, mut f: impl FnMut(&Matching) -> Option<Matching>) -> Option<Self> {
        let mut entries = Self::new();
        for matching in self.matchings.iter().filter_map(&mut f) {
            entries.add(matching);
        }
        (!entries.is_empty()).then_some(entries)
    }
}

impl From<Matching> for MatchingEntries {
    fn from(matching: Matching) -> Self {
        Self {
            matchings: vec![matching],
        }
    }
}

impl<'a> IntoIterator for &'a MatchingEntries {
    type Item = &'a Matching;
    type IntoIter = std::slice::Iter<'a, Matching>;

    fn into_iter(self) -> Self::IntoIter {
        self.matchings.iter()
    }
}

impl fmt::Display for MatchingEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, matching) in self.matchings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", matching)?;
        }
        write!(f, "]")
    }
}

/// Matchings per word, iterated in word order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingResultSet<W> {
    entries: BTreeMap<W, MatchingEntries>,
}

impl<W> Default for MatchingResultSet<W> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<W> MatchingResultSet<W> {
    /// The empty result set. Does not allocate.
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, W, MatchingEntries> {
        self.entries.iter()
    }

    pub fn words(&self) -> impl Iterator<Item = &W> {
        self.entries.keys()
    }

    /// Total number of matchings across all words
    pub fn matching_count(&self) -> usize {
        self.entries.values().map(MatchingEntries::len).sum()
    }
}

impl<W: Ord> MatchingResultSet<W> {
    pub fn new() -> Self {
        Self::empty()
    }

    /// Append `[from, to)` to `word`'s entries (ignored if out of order)
    pub fn add(&mut self, word: W, from: u32, to: u32) -> &mut Self {
        self.entries
            .entry(word)
            .or_default()
            .add(Matching::new(from, to));
        self
    }

    /// Builder-style [`add`](Self::add)
    pub fn with(mut self, word: W, from: u32, to: u32) -> Self {
        self.add(word, from, to);
        self
    }

    pub fn get(&self, word: &W) -> Option<&MatchingEntries> {
        self.entries.get(word)
    }

    /// Build a new set from `f(word, entries)` for every word; words for which
    /// `f` returns `None` are dropped.
    pub fn transform<F>(&self, mut f: F) -> Self
    where
        W: Clone,
        F: FnMut(&W, &MatchingEntries) -> Option<MatchingEntries>,
    {
        self.entries
            .iter()
            .filter_map(|(word, entries)| Some((word.clone(), f(word, entries)?)))
            .collect()
    }

    /// Inner join on word. `f(word, left, right)` gives the merged entries,
    /// or `None` to drop the word.
    pub fn combine<F>(&self, other: &Self, mut f: F) -> Self
    where
        W: Clone,
        F: FnMut(&W, &MatchingEntries, &MatchingEntries) -> Option<MatchingEntries>,
    {
        let mut result = Self::new();
        let mut left = self.entries.iter().peekable();
        let mut right = other.entries.iter().peekable();

        // Both maps iterate in word order, so a merge join visits each word once
        while let (Some((lw, le)), Some((rw, re))) = (left.peek(), right.peek()) {
            match lw.cmp(rw) {
                Ordering::Less => {
                    left.next();
                }
                Ordering::Greater => {
                    right.next();
                }
                Ordering::Equal => {
                    if let Some(merged) = f(lw, le, re) {
                        result.entries.insert((*lw).clone(), merged);
                    }
                    left.next();
                    right.next();
                }
            }
        }

        result
    }

    /// Every entry truncated to its first `len` positions; `from` is kept
    pub fn split_left(&self, len: u32) -> Self
    where
        W: Clone,
    {
        self.transform(|_, entries| entries.truncate_left(len))
    }

    /// Every entry with its first `offset` positions removed; `to` is kept
    pub fn split_right(&self, offset: u32) -> Self
    where
        W: Clone,
    {
        self.transform(|_, entries| entries.truncate_right(offset))
    }

    /// Every entry replaced with `[from + offset, from + offset + len)`
    pub fn shift(&self, offset: i64, len: u32) -> Self
    where
        W: Clone,
    {
        self.transform(|_, entries| entries.shift(offset, len))
    }

    /// Re-key the set. `f` must preserve the word order.
    pub fn map_words<K: Ord>(self, mut f: impl FnMut(W) -> K) -> MatchingResultSet<K> {
        self.entries
            .into_iter()
            .map(|(word, entries)| (f(word), entries))
            .collect()
    }
}

impl<W: Ord> FromIterator<(W, MatchingEntries)> for MatchingResultSet<W> {
    fn from_iter<I: IntoIterator<Item = (W, MatchingEntries)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<W> IntoIterator for MatchingResultSet<W> {
    type Item = (W, MatchingEntries);
    type IntoIter = std::collections::btree_map::IntoIter<W, MatchingEntries>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, W> IntoIterator for &'a MatchingResultSet<W> {
    type Item = (&'a W, &'a MatchingEntries);
    type IntoIter = std::collections::btree_map::Iter<'a, W, MatchingEntries>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<W: fmt::Display> fmt::Display for MatchingResultSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (word, entries)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", word, entries)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(from: u32, to: u32) -> Matching {
        Matching::new(from, to)
    }

    #[test]
    fn test_add_matching_for_word() {
        let rs = MatchingResultSet::new().with("a", 0, 1);
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.get(&"a").unwrap().matchings(), &[m(0, 1)]);
    }

    #[test]
    fn test_add_many_matchings_in_order() {
        let rs = MatchingResultSet::new().with("a", 0, 1).with("a", 1, 2);
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.get(&"a").unwrap().matchings(), &[m(0, 1), m(1, 2)]);
    }

    #[test]
    fn test_add_matchings_for_many_words() {
        let rs = MatchingResultSet::new().with("b", 0, 1).with("a", 0, 1);
        assert_eq!(rs.words().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rs.matching_count(), 2);
    }

    #[test]
    fn test_out_of_order_add_is_ignored() {
        let mut entries = MatchingEntries::new();
        assert!(entries.add(m(1, 2)));
        assert!(!entries.add(m(0, 1)));
        assert!(!entries.add(m(1, 5)));
        assert_eq!(entries, MatchingEntries::new().with(1, 2));
    }

    #[test]
    #[should_panic(expected = "empty matching")]
    fn test_empty_matching_rejected() {
        Matching::new(3, 3);
    }

    #[test]
    fn test_first_and_last() {
        let entries = MatchingEntries::new().with(0, 1).with(1, 2);
        assert_eq!(entries.first(), Some(&m(0, 1)));
        assert_eq!(entries.last(), Some(&m(1, 2)));

        let empty = MatchingEntries::new();
        assert_eq!(empty.first(), None);
        assert_eq!(empty.last(), None);
    }

    #[test]
    fn test_nearest_when_adjacent() {
        let entries = MatchingEntries::new().with(1, 2).with(3, 4);
        assert_eq!(entries.find_nearest(&m(0, 1)), Some(&m(1, 2)));
    }

    #[test]
    fn test_nearest_when_greater() {
        let entries = MatchingEntries::new().with(2, 3).with(3, 4);
        assert_eq!(entries.find_nearest(&m(0, 1)), Some(&m(2, 3)));
    }

    #[test]
    fn test_nearest_between() {
        let entries = MatchingEntries::new().with(10, 20).with(30, 40).with(50, 60);
        assert_eq!(entries.find_nearest(&m(41, 42)), Some(&m(50, 60)));
    }

    #[test]
    fn test_no_nearest() {
        let entries = MatchingEntries::new().with(1, 2).with(3, 4);
        assert_eq!(entries.find_nearest(&m(3, 4)), None);
    }

    #[test]
    fn test_transform_drops_words() {
        let rs = MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1);
        let transformed = rs.transform(|word, entries| (*word == "a").then(|| entries.clone()));

        assert_eq!(transformed, MatchingResultSet::new().with("a", 0, 1));
        // source untouched
        assert_eq!(rs.len(), 2);
    }

    #[test]
    fn test_transform_replaces_entries() {
        let rs = MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1);
        let transformed = rs.transform(|_, _| Some(MatchingEntries::new().with(10, 20)));

        let expected = MatchingResultSet::new().with("a", 10, 20).with("b", 10, 20);
        assert_eq!(transformed, expected);
    }

    #[test]
    fn test_combine_drops_words() {
        let l = MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1);
        let r = MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1);

        let combined = l.combine(&r, |word, left, _| (*word == "a").then(|| left.clone()));
        assert_eq!(combined, MatchingResultSet::new().with("a", 0, 1));
    }

    #[test]
    fn test_combine_replaces_entries_and_keeps_sources() {
        let l = MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1);
        let r = MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1);

        let combined = l.combine(&r, |_, _, _| Some(MatchingEntries::new().with(10, 20)));

        assert_eq!(
            combined,
            MatchingResultSet::new().with("a", 10, 20).with("b", 10, 20)
        );
        assert_eq!(l, MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1));
        assert_eq!(r, MatchingResultSet::new().with("a", 0, 1).with("b", 0, 1));
    }

    #[test]
    fn test_combine_is_inner_join() {
        let l = MatchingResultSet::new()
            .with("a", 0, 1)
            .with("c", 0, 1)
            .with("d", 0, 1);
        let r = MatchingResultSet::new()
            .with("b", 0, 1)
            .with("c", 2, 3)
            .with("e", 0, 1);

        let mut seen = Vec::new();
        let combined = l.combine(&r, |word, left, right| {
            seen.push(*word);
            let mut merged = left.clone();
            merged.add(*right.first()?);
            Some(merged)
        });

        assert_eq!(seen, vec!["c"]);
        assert_eq!(combined, MatchingResultSet::new().with("c", 0, 1).with("c", 2, 3));
    }

    #[test]
    fn test_split_left() {
        let rs = MatchingResultSet::new().with("a", 1, 4).with("a", 2, 10);
        let expected = MatchingResultSet::new().with("a", 1, 2).with("a", 2, 3);
        assert_eq!(rs.split_left(1), expected);
    }

    #[test]
    fn test_split_left_of_zero_is_empty() {
        let rs = MatchingResultSet::new().with("a", 1, 4).with("a", 2, 10);
        assert_eq!(rs.split_left(0), MatchingResultSet::empty());
    }

    #[test]
    fn test_split_right() {
        let rs = MatchingResultSet::new().with("a", 1, 4).with("a", 2, 10);
        let expected = MatchingResultSet::new().with("a", 2, 4).with("a", 3, 10);
        assert_eq!(rs.split_right(1), expected);
    }

    #[test]
    fn test_split_right_out_of_bounds_is_empty() {
        let rs = MatchingResultSet::new().with("a", 1, 4).with("a", 2, 10);
        assert_eq!(rs.split_right(10), MatchingResultSet::empty());
    }

    #[test]
    fn test_split_right_drops_short_entries_only() {
        let rs = MatchingResultSet::new().with("a", 1, 3).with("a", 2, 10);
        assert_eq!(rs.split_right(3), MatchingResultSet::new().with("a", 5, 10));
    }

    #[test]
    fn test_shift() {
        let rs = MatchingResultSet::new().with("a", 1, 4).with("a", 2, 10);
        let expected = MatchingResultSet::new().with("a", 2, 4).with("a", 3, 5);
        assert_eq!(rs.shift(1, 2), expected);
    }

    #[test]
    fn test_shift_backwards() {
        let rs = MatchingResultSet::new().with("a", 3, 5).with("b", 7, 8);
        let expected = MatchingResultSet::new().with("a", 1, 4).with("b", 5, 8);
        assert_eq!(rs.shift(-2, 3), expected);
    }

    #[test]
    fn test_map_words() {
        let rs = MatchingResultSet::new().with(1u32, 0, 1).with(2u32, 3, 4);
        let names = ["zero", "one", "two"];
        let mapped = rs.map_words(|id| names[id as usize]);
        assert_eq!(
            mapped,
            MatchingResultSet::new().with("one", 0, 1).with("two", 3, 4)
        );
    }

    #[test]
    fn test_display() {
        let rs = MatchingResultSet::new().with("a", 0, 1).with("a", 2, 4);
        assert_eq!(rs.to_string(), "{a: [[0, 1), [2, 4)]}");
    }
}
