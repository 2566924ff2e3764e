pub mod matching;
pub mod stats;
pub mod suffix_tree;
pub mod types;
pub mod vocabulary;

pub use matching::{Matching, MatchingEntries, MatchingResultSet};
pub use stats::TreeStats;
pub use suffix_tree::SuffixTree;
pub use types::*;
pub use vocabulary::{ScanOptions, Symbol};
