use rustc_hash::FxHashSet;

/// Upper bound on identifier length; longer runs are usually generated data
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Extract identifiers from source text: ASCII alphanumerics and `_`, not
/// starting with a digit, between `min_len` and 128 bytes long.
pub fn extract_identifiers(content: &str, min_len: usize) -> FxHashSet<String> {
    let mut identifiers = FxHashSet::default();
    let mut current = String::new();
    let mut in_identifier = false;

    let mut flush = |current: &mut String| {
        if current.len() >= min_len && current.len() <= MAX_IDENTIFIER_LENGTH {
            identifiers.insert(std::mem::take(current));
        } else {
            current.clear();
        }
    };

    for ch in content.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if !in_identifier && ch.is_ascii_digit() {
                // Can't start identifier with digit
                continue;
            }
            in_identifier = true;
            current.push(ch);
        } else {
            if in_identifier {
                flush(&mut current);
            }
            in_identifier = false;
        }
    }

    if in_identifier {
        flush(&mut current);
    }

    identifiers
}

/// Heuristic binary detection on the first 8 KiB
pub fn is_binary(content: &[u8]) -> bool {
    let sample = &content[..content.len().min(8192)];
    if sample.is_empty() {
        return false;
    }

    if sample.contains(&0) {
        return true;
    }

    let control = sample
        .iter()
        .filter(|&&b| b < 0x20 && b != b'\n' && b != b'\r' && b != b'\t')
        .count();
    control > sample.len() / 10
}
