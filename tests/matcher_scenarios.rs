//! End-to-end matcher behavior against the public API.

use hump::index::{MatchingResultSet, Searchable, SuffixTree, Symbol};
use hump::query::PatternMatcher;

const VOCABULARY: [&str; 3] = ["AbcDef", "AbcDefGhj", "xyzAbcDef"];

type Spans = Vec<(String, Vec<(u32, u32)>)>;

/// Results as plain data, so sets from different indexes can be compared
fn spans<W: AsRef<str>>(results: &MatchingResultSet<&W>) -> Spans {
    results
        .iter()
        .map(|(word, entries)| {
            let word: &str = (**word).as_ref();
            (
                word.to_string(),
                entries.iter().map(|m| (m.from(), m.to())).collect(),
            )
        })
        .collect()
}

fn expected(pairs: &[(&str, &[(u32, u32)])]) -> Spans {
    pairs
        .iter()
        .map(|(word, chain)| (word.to_string(), chain.to_vec()))
        .collect()
}

fn run(words: &[&'static str], pattern: &str) -> Spans {
    let matcher = PatternMatcher::new(words.iter().copied());
    spans(&matcher.match_pattern(pattern).unwrap())
}

#[test]
fn test_literal_is_anchored_at_start() {
    assert_eq!(
        run(&VOCABULARY, "Abc"),
        expected(&[("AbcDef", &[(0, 3)]), ("AbcDefGhj", &[(0, 3)])])
    );
}

#[test]
fn test_leading_asterisk_matches_anywhere() {
    assert_eq!(
        run(&VOCABULARY, "*Abc"),
        expected(&[
            ("AbcDef", &[(0, 3)]),
            ("AbcDefGhj", &[(0, 3)]),
            ("xyzAbcDef", &[(3, 6)]),
        ])
    );
}

#[test]
fn test_camel_case_join() {
    assert_eq!(
        run(&VOCABULARY, "AD"),
        expected(&[("AbcDef", &[(0, 1), (3, 4)]), ("AbcDefGhj", &[(0, 1), (3, 4)])])
    );
}

#[test]
fn test_unanchored_camel_case_join() {
    assert_eq!(
        run(&VOCABULARY, "*AD"),
        expected(&[
            ("AbcDef", &[(0, 1), (3, 4)]),
            ("AbcDefGhj", &[(0, 1), (3, 4)]),
            ("xyzAbcDef", &[(3, 4), (6, 7)]),
        ])
    );
}

#[test]
fn test_three_part_camel_case() {
    assert_eq!(
        run(&VOCABULARY, "ADG"),
        expected(&[("AbcDefGhj", &[(0, 1), (3, 4), (6, 7)])])
    );
}

#[test]
fn test_wildcard_join_takes_nearest_following() {
    assert_eq!(run(&["AbcDef"], "A*f"), expected(&[("AbcDef", &[(0, 1), (5, 6)])]));
    assert_eq!(
        run(&["AfXf"], "A*f"),
        expected(&[("AfXf", &[(0, 1), (1, 2)])])
    );
}

#[test]
fn test_no_match_is_empty_not_error() {
    assert!(run(&[], "Abc").is_empty());
    assert!(run(&VOCABULARY, "Zzz").is_empty());
    assert!(run(&VOCABULARY, "*Zzz").is_empty());
}

#[test]
fn test_only_asterisks_match_every_word() {
    let all = expected(&[
        ("AbcDef", &[(0, 1)]),
        ("AbcDefGhj", &[(0, 1)]),
        ("xyzAbcDef", &[(0, 1)]),
    ]);
    assert_eq!(run(&VOCABULARY, "*"), all);
    assert_eq!(run(&VOCABULARY, "***"), all);
}

#[test]
fn test_empty_pattern_matches_nothing() {
    assert!(run(&VOCABULARY, "").is_empty());
}

#[test]
fn test_every_substring_is_found_at_its_position() {
    let words = ["abracadabra", "AbcDefGhj", "mississippi", "a"];
    let tree = SuffixTree::new(words);

    for word in &words {
        for from in 0..word.len() {
            for to in from + 1..=word.len() {
                let results = tree.search(&word[from..to]);
                let entries = results.get(&word).unwrap_or_else(|| {
                    panic!("{:?} not found in {:?}", &word[from..to], word)
                });
                assert!(
                    entries
                        .iter()
                        .any(|m| (m.from(), m.to()) == (from as u32, to as u32)),
                    "{:?} missing [{}, {}) in {:?}",
                    &word[from..to],
                    from,
                    to,
                    word
                );
            }
        }
    }
}

#[test]
fn test_search_intervals_are_sorted_and_pattern_sized() {
    let words = ["abababa", "aaaa", "banana", "xyz"];
    let tree = SuffixTree::new(words);

    for pattern in ["a", "aa", "aba", "ana", "b", "nan"] {
        let results = tree.search(pattern);
        for (_, entries) in &results {
            let list = entries.matchings();
            assert!(list.windows(2).all(|w| w[0].from() < w[1].from()));
            assert!(list.iter().all(|m| m.len() as usize == pattern.len()));
        }
    }
}

#[test]
fn test_construction_order_does_not_matter() {
    let forward = ["AbcDef", "xyzAbcDef", "AbcDefGhj", "abab", "ba"];
    let mut backward = forward;
    backward.reverse();
    let mut rotated = forward;
    rotated.rotate_left(2);

    for pattern in ["Abc", "*Abc", "AD", "*AD", "A*f", "*", "*ab", "b*a"] {
        let expected = run(&forward, pattern);
        assert_eq!(run(&backward, pattern), expected, "pattern {:?}", pattern);
        assert_eq!(run(&rotated, pattern), expected, "pattern {:?}", pattern);
    }
}

#[test]
fn test_chains_are_strictly_increasing() {
    let matcher = PatternMatcher::new(["AbcDefAbcDef", "ADADAD", "aXbXc"]);
    for pattern in ["AD", "*D*D", "A*A", "*X*X", "ADAD"] {
        let results = matcher.match_pattern(pattern).unwrap();
        for (_, entries) in &results {
            let list = entries.matchings();
            assert!(list.windows(2).all(|w| w[0].to() <= w[1].from()));
        }
    }
}

#[test]
fn test_symbols_match_on_name_only() {
    let symbols = vec![
        Symbol::new("HashMap", "java.util"),
        Symbol::new("HashMap", "std::collections"),
        Symbol::new("HashSet", "java.util"),
        Symbol::new("Map", "java.util"),
    ];
    let matcher = PatternMatcher::new(symbols);

    let results = matcher.match_pattern("HM").unwrap();
    let groups: Vec<&str> = results.words().map(|s| s.group.as_str()).collect();
    assert_eq!(groups, vec!["java.util", "std::collections"]);

    assert_eq!(matcher.match_pattern("*Map").unwrap().len(), 3);
    assert!(matcher.match_pattern("util").unwrap().is_empty());
}

#[test]
fn test_absent_entries_are_skipped() {
    let matcher: PatternMatcher<SuffixTree<&str>> = PatternMatcher::new(vec![Some("AbcDef"), None, Some("Abc")]);
    assert_eq!(matcher.index().word_count(), 2);
    assert_eq!(matcher.match_pattern("Abc").unwrap().len(), 2);
}
