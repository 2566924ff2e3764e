//! Output formatting for match results

use crate::index::matching::{MatchingEntries, MatchingResultSet};
use crate::index::vocabulary::Symbol;
use serde::Serialize;
use std::io::{self, Write};
use std::ops::Range;
use std::time::Duration;
use termcolor::{Color, ColorSpec, WriteColor};

/// Split `[0, word_len)` into consecutive byte ranges, flagging the ones
/// covered by a match. Parts of matches past the end of the word (the
/// sentinel) are dropped.
pub fn highlight_segments(word_len: usize, entries: &MatchingEntries) -> Vec<(Range<usize>, bool)> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for matching in entries {
        let from = (matching.from() as usize).clamp(cursor, word_len);
        let to = (matching.to() as usize).clamp(from, word_len);
        if from > cursor {
            segments.push((cursor..from, false));
        }
        if to > from {
            segments.push((from..to, true));
        }
        cursor = to;
    }

    if cursor < word_len {
        segments.push((cursor..word_len, false));
    }
    segments
}

/// Print one line per matched symbol with matched spans highlighted, then a
/// summary line
pub fn print_matches(
    out: &mut impl WriteColor,
    results: &MatchingResultSet<&Symbol>,
    limit: Option<usize>,
    elapsed: Duration,
) -> io::Result<()> {
    let shown = limit.unwrap_or(usize::MAX);

    for (symbol, entries) in results.iter().take(shown) {
        print_match_line(out, symbol, entries)?;
    }

    if results.len() > shown {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        writeln!(out, "... and {} more", results.len() - shown)?;
        out.reset()?;
    }

    writeln!(out, "found {} in {} ms", results.len(), elapsed.as_millis())?;
    Ok(())
}

/// Print a symbol with its matched spans in bold red
fn print_match_line(
    out: &mut impl WriteColor,
    symbol: &Symbol,
    entries: &MatchingEntries,
) -> io::Result<()> {
    let bytes = symbol.name.as_bytes();

    for (range, highlighted) in highlight_segments(bytes.len(), entries) {
        if highlighted {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            out.write_all(&bytes[range])?;
            out.reset()?;
        } else {
            out.write_all(&bytes[range])?;
        }
    }

    if !symbol.group.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, " ({})", symbol.group)?;
        out.reset()?;
    }

    writeln!(out)
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    word: &'a str,
    group: &'a str,
    matches: Vec<[u32; 2]>,
}

/// Print results as a JSON array of `{word, group, matches}` objects
pub fn print_json(
    out: &mut impl Write,
    results: &MatchingResultSet<&Symbol>,
    limit: Option<usize>,
) -> io::Result<()> {
    let matches: Vec<JsonMatch> = results
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(symbol, entries)| JsonMatch {
            word: &symbol.name,
            group: &symbol.group,
            matches: entries.iter().map(|m| [m.from(), m.to()]).collect(),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &matches)?;
    writeln!(out)
}
