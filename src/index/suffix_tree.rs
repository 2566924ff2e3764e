//! Annotated suffix tree.
//!
//! Every word is extended with [`SENTINEL`] and all of its suffixes are
//! inserted into one compressed trie. Edges carry multi-byte labels that point
//! back into the vocabulary instead of owning text.
//!
//! Each node records, per word, where its *own* edge label occurs:
//! `[from, from + label_len)` with `from` the absolute byte position of the
//! label in the word. Path depth is not baked in, so splitting an edge only
//! truncates the node's intervals ([`MatchingResultSet::split_left`] /
//! [`MatchingResultSet::split_right`]) and a query recovers absolute starts
//! with a single [`MatchingResultSet::shift`].
//!
//! Nodes live in an arena addressed by index. Splitting rewrites one slot in
//! place (the prefix keeps the parent's link) and appends the suffix part.

use crate::index::matching::MatchingResultSet;
use crate::index::stats::TreeStats;
use crate::index::types::{SENTINEL, Searchable, WordId};
use rustc_hash::FxHashMap;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

const ROOT: NodeId = NodeId(0);

/// Edge label: bytes `[start, end)` of one augmented word
#[derive(Debug, Clone, Copy)]
struct Label {
    word: WordId,
    start: u32,
    end: u32,
}

impl Label {
    fn len(&self) -> u32 {
        self.end - self.start
    }

    fn split_at(&self, k: u32) -> (Label, Label) {
        let mid = self.start + k;
        (
            Label { end: mid, ..*self },
            Label { start: mid, ..*self },
        )
    }
}

struct Node {
    label: Label,
    children: FxHashMap<u8, NodeId>,
    matchings: MatchingResultSet<WordId>,
}

impl Node {
    fn root() -> Self {
        Self {
            label: Label {
                word: WordId::new(0),
                start: 0,
                end: 0,
            },
            children: FxHashMap::default(),
            matchings: MatchingResultSet::empty(),
        }
    }

    fn leaf(word: WordId, start: u32, end: u32) -> Self {
        Self {
            label: Label { word, start, end },
            children: FxHashMap::default(),
            matchings: MatchingResultSet::new().with(word, start, end),
        }
    }
}

/// Byte `i` of `label`, reading the sentinel past the end of the word
fn label_byte<W: AsRef<str>>(words: &[W], label: Label, i: u32) -> u8 {
    let bytes = words[label.word.index()].as_ref().as_bytes();
    bytes
        .get((label.start + i) as usize)
        .copied()
        .unwrap_or(SENTINEL)
}

fn augmented(word: &str) -> Vec<u8> {
    let mut text = Vec::with_capacity(word.len() + 1);
    text.extend_from_slice(word.as_bytes());
    text.push(SENTINEL);
    text
}

/// Compressed suffix tree over a fixed vocabulary
pub struct SuffixTree<W> {
    /// Sorted, de-duplicated vocabulary; `WordId` indexes into it
    words: Vec<W>,
    nodes: Vec<Node>,
}

impl<W: Ord + AsRef<str>> SuffixTree<W> {
    /// Index `words`. Absent entries (`None`) and duplicates are skipped; the
    /// input order does not affect query results.
    pub fn new<I, T>(words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<W>>,
    {
        let mut words: Vec<W> = words
            .into_iter()
            .filter_map(Into::into)
            .filter(|word: &W| word.as_ref().len() < u32::MAX as usize)
            .collect();
        words.sort();
        words.dedup();

        let mut tree = Self {
            words,
            nodes: vec![Node::root()],
        };

        for index in 0..tree.words.len() {
            tree.add_word(WordId::new(index));
        }

        log::debug!(
            "suffix tree: {} words, {} nodes",
            tree.words.len(),
            tree.nodes.len()
        );
        tree
    }

    fn add_word(&mut self, id: WordId) {
        let text = augmented(self.words[id.index()].as_ref());
        for start in 0..text.len() {
            self.insert_suffix(id, &text, start);
        }
    }

    fn insert_suffix(&mut self, id: WordId, text: &[u8], start: usize) {
        let mut parent = ROOT;
        let mut pos = start;

        while pos < text.len() {
            let Some(&child) = self.nodes[parent.index()].children.get(&text[pos]) else {
                break;
            };

            let label = self.nodes[child.index()].label;
            let edge_start = pos;
            let mut k = 0;
            while k < label.len()
                && pos < text.len()
                && label_byte(&self.words, label, k) == text[pos]
            {
                k += 1;
                pos += 1;
            }

            let partial = k < label.len();
            if partial {
                self.split(child, k);
            }
            self.nodes[child.index()]
                .matchings
                .add(id, edge_start as u32, pos as u32);
            parent = child;

            if partial {
                break;
            }
        }

        if pos < text.len() {
            let leaf = self.push(Node::leaf(id, pos as u32, text.len() as u32));
            self.nodes[parent.index()].children.insert(text[pos], leaf);
        }
    }

    /// Cut `node`'s edge after `k` bytes. The slot keeps the prefix; the rest
    /// moves to a new child that takes over the old children.
    fn split(&mut self, node: NodeId, k: u32) {
        let (prefix, suffix) = self.nodes[node.index()].label.split_at(k);
        let key = label_byte(&self.words, suffix, 0);

        let old = &mut self.nodes[node.index()];
        let tail = Node {
            label: suffix,
            children: std::mem::take(&mut old.children),
            matchings: old.matchings.split_right(k),
        };
        old.label = prefix;
        old.matchings = old.matchings.split_left(k);

        let tail_id = self.push(tail);
        self.nodes[node.index()].children.insert(key, tail_id);
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Walk `pattern` from the root. Returns the landing node and how much of
    /// its edge the pattern consumed.
    fn locate(&self, pattern: &[u8]) -> Option<(NodeId, u32)> {
        let mut node = ROOT;
        let mut pos = 0;
        let mut consumed = 0;

        while pos < pattern.len() {
            let &child = self.nodes[node.index()].children.get(&pattern[pos])?;
            let label = self.nodes[child.index()].label;

            consumed = 0;
            while consumed < label.len()
                && pos < pattern.len()
                && label_byte(&self.words, label, consumed) == pattern[pos]
            {
                consumed += 1;
                pos += 1;
            }

            node = child;
            if consumed < label.len() {
                break;
            }
        }

        (pos == pattern.len()).then_some((node, consumed))
    }

    /// The indexed vocabulary in word order
    pub fn words(&self) -> &[W] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            words: self.words.len(),
            nodes: self.nodes.len(),
            ..TreeStats::default()
        };

        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.index()];
            let depth = depth + node.label.len() as usize;

            stats.edge_bytes += u64::from(node.label.len());
            stats.annotations += node.matchings.matching_count();
            stats.max_depth = stats.max_depth.max(depth);
            if node.children.is_empty() && id != ROOT {
                stats.leaves += 1;
            }

            stack.extend(node.children.values().map(|&child| (child, depth)));
        }

        stats
    }

    /// Write the tree, one node per line, indented by depth. The sentinel
    /// prints as `$`.
    pub fn dump(&self, out: &mut impl Write) -> io::Result<()> {
        self.dump_node(out, ROOT, 0)
    }

    fn dump_node(&self, out: &mut impl Write, id: NodeId, depth: usize) -> io::Result<()> {
        let node = &self.nodes[id.index()];
        let label: Vec<u8> = (0..node.label.len())
            .map(|i| label_byte(&self.words, node.label, i))
            .map(|b| if b == SENTINEL { b'$' } else { b })
            .collect();

        write!(out, "{}'{}' :", "  ".repeat(depth), String::from_utf8_lossy(&label))?;
        for (word, entries) in &node.matchings {
            write!(out, " {}={}", self.words[word.index()].as_ref(), entries)?;
        }
        writeln!(out)?;

        let mut children: Vec<_> = node.children.iter().collect();
        children.sort_by_key(|(key, _)| **key);
        for (_, &child) in children {
            self.dump_node(out, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<W: Ord + AsRef<str>> Searchable for SuffixTree<W> {
    type Item = W;

    fn search(&self, pattern: &str) -> MatchingResultSet<&W> {
        let pattern: &[u8] = if pattern.is_empty() {
            &[SENTINEL]
        } else {
            pattern.as_bytes()
        };

        let Some((node, consumed)) = self.locate(pattern) else {
            return MatchingResultSet::empty();
        };

        // Annotations start at the landing edge; step back over the part of
        // the pattern matched above it and keep exactly the pattern's length.
        let len = pattern.len() as u32;
        self.nodes[node.index()]
            .matchings
            .shift(i64::from(consumed) - i64::from(len), len)
            .map_words(|id| &self.words[id.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(words: &[&'static str]) -> SuffixTree<&'static str> {
        SuffixTree::new(words.iter().copied())
    }

    fn expect<'a>(pairs: &[(&'a &'static str, u32, u32)]) -> MatchingResultSet<&'a &'static str> {
        let mut rs = MatchingResultSet::new();
        for &(word, from, to) in pairs {
            rs.add(word, from, to);
        }
        rs
    }

    #[test]
    fn test_finds_all_overlapping_occurrences() {
        let t = tree(&["abababa"]);
        let w = &t.words()[0];
        assert_eq!(t.search("aba"), expect(&[(w, 0, 3), (w, 2, 5), (w, 4, 7)]));
    }

    #[test]
    fn test_finds_occurrences_across_split_nodes() {
        let t = tree(&["aaab"]);
        let w = &t.words()[0];
        assert_eq!(t.search("aa"), expect(&[(w, 0, 2), (w, 1, 3)]));
    }

    #[test]
    fn test_finds_occurrences_in_all_words() {
        let t = tree(&["ab", "ac"]);
        let (ab, ac) = (&t.words()[0], &t.words()[1]);
        assert_eq!(t.search("a"), expect(&[(ab, 0, 1), (ac, 0, 1)]));
        assert_eq!(t.search("b"), expect(&[(ab, 1, 2)]));
        assert_eq!(t.search("c"), expect(&[(ac, 1, 2)]));
    }

    #[test]
    fn test_empty_pattern_matches_sentinel() {
        let t = tree(&["ab", "ac"]);
        let (ab, ac) = (&t.words()[0], &t.words()[1]);
        assert_eq!(t.search(""), expect(&[(ab, 2, 3), (ac, 2, 3)]));
    }

    #[test]
    fn test_duplicate_words_indexed_once() {
        let t = tree(&["ab", "ab"]);
        assert_eq!(t.word_count(), 1);
        let ab = &t.words()[0];
        assert_eq!(t.search("a"), expect(&[(ab, 0, 1)]));
    }

    #[test]
    fn test_all_substrings_of_distinct_letters() {
        let t = tree(&["abc"]);
        let w = &t.words()[0];
        assert_eq!(t.search("abc"), expect(&[(w, 0, 3)]));
        assert_eq!(t.search("ab"), expect(&[(w, 0, 2)]));
        assert_eq!(t.search("bc"), expect(&[(w, 1, 3)]));
        assert_eq!(t.search("a"), expect(&[(w, 0, 1)]));
        assert_eq!(t.search("b"), expect(&[(w, 1, 2)]));
        assert_eq!(t.search("c"), expect(&[(w, 2, 3)]));
    }

    #[test]
    fn test_all_substrings_of_repeated_letter() {
        let t = tree(&["aaa"]);
        let w = &t.words()[0];
        assert_eq!(t.search("aaa"), expect(&[(w, 0, 3)]));
        assert_eq!(t.search("aa"), expect(&[(w, 0, 2), (w, 1, 3)]));
        assert_eq!(t.search("a"), expect(&[(w, 0, 1), (w, 1, 2), (w, 2, 3)]));
    }

    #[test]
    fn test_unknown_substring_is_empty() {
        let t = tree(&["abc"]);
        assert!(t.search("ac").is_empty());
        assert!(t.search("d").is_empty());
        assert!(t.search("abcd").is_empty());
    }

    #[test]
    fn test_skips_absent_words() {
        let t: SuffixTree<&str> = SuffixTree::new(vec![Some("abc"), None, Some("bcd")]);
        assert_eq!(t.word_count(), 2);
        assert_eq!(t.search("bc").len(), 2);
    }

    #[test]
    fn test_empty_vocabulary() {
        let t: SuffixTree<String> = SuffixTree::new(Vec::<String>::new());
        assert!(t.is_empty());
        assert!(t.search("a").is_empty());
        assert!(t.search("").is_empty());
    }

    #[test]
    fn test_suffix_shared_between_words() {
        let t = tree(&["barfoo", "foobar"]);
        let (barfoo, foobar) = (&t.words()[0], &t.words()[1]);
        assert_eq!(t.search("foo"), expect(&[(barfoo, 3, 6), (foobar, 0, 3)]));
        assert_eq!(t.search("oob"), expect(&[(foobar, 1, 4)]));
        assert_eq!(t.search(""), expect(&[(barfoo, 6, 7), (foobar, 6, 7)]));
    }

    #[test]
    fn test_non_ascii_words() {
        let t = tree(&["größe", "maße"]);
        let (grosse, masse) = (&t.words()[0], &t.words()[1]);
        assert_eq!(t.search("ße"), expect(&[(grosse, 4, 7), (masse, 2, 5)]));
    }

    #[test]
    fn test_stats_and_dump() {
        let t = tree(&["ab", "b"]);
        let stats = t.stats();
        assert_eq!(stats.words, 2);
        assert!(stats.nodes > 1);
        // suffixes: ab$, b$ (shared by both words), $
        assert_eq!(stats.leaves, 3);
        assert_eq!(stats.max_depth, 3);

        let mut out = Vec::new();
        t.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("'' :\n"));
        assert!(text.contains("  'b$' : ab=[[1, 3)] b=[[0, 2)]"));
    }
}
