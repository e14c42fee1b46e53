//! String helpers shared by the tag and step detectors.

/// Strip the leading `@` and lowercase. Used for vocabulary lookups and
/// case-insensitive equality.
pub fn bare_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('@').to_lowercase()
}

/// [`bare_tag`] with separator characters (`_`, `-`, `.`) removed, so that
/// `@API`, `@api` and `@a-p-i` compare equal.
pub fn normalize_tag(tag: &str) -> String {
    bare_tag(tag)
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Levenshtein edit distance over chars, two-row variant.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// First `max_chars` characters of `text`, with "..." appended when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}
