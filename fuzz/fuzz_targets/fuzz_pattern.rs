#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::LazyLock;

static MATCHER: LazyLock<hump::query::PatternMatcher<hump::index::SuffixTree<&'static str>>> =
    LazyLock::new(|| {
        hump::query::PatternMatcher::new(["AbcDef", "AbcDefGhj", "xyzAbcDef", "", "größe", "a*b"])
    });

fuzz_target!(|pattern: &str| {
    // Patterns produced by the scanner always tokenize and match
    let lexemes = hump::query::lexer::scan(pattern).expect("scanner accepts any input");
    assert_eq!(lexemes.last(), Some(&hump::query::Lexeme::End));

    hump::query::compile(pattern).expect("scanner output always tokenizes");

    let results = MATCHER.match_pattern(pattern).expect("valid pattern");
    for (_, entries) in &results {
        let list = entries.matchings();
        assert!(list.windows(2).all(|w| w[0].to() <= w[1].from()));
    }
});
