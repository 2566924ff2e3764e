#![no_main]

use arbitrary::Arbitrary;
use hump::index::{Searchable, SuffixTree};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    words: Vec<&'a str>,
    pattern: &'a str,
}

fuzz_target!(|input: Input| {
    let tree = SuffixTree::new(input.words.iter().copied());

    // Every reported interval is an actual occurrence of the pattern
    for (word, entries) in &tree.search(input.pattern) {
        for m in entries {
            if input.pattern.is_empty() {
                assert_eq!(m.from() as usize, word.len());
            } else {
                assert_eq!(&word.as_bytes()[m.range()], input.pattern.as_bytes());
            }
        }
    }

    // ... and no occurrence is missed
    for word in &input.words {
        let expected = word.match_indices(input.pattern).count();
        if !input.pattern.is_empty() && expected > 0 {
            let results = tree.search(input.pattern);
            let found = results.get(&word).map_or(0, |e| e.len());
            assert!(found >= expected);
        }
    }
});
