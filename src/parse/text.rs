//! Small text helpers shared by the parsers.
//!
//! The heuristics work on byte offsets into UTF-8 text; these helpers keep
//! every slice on a char boundary so degree signs and dashes in condition
//! labels can never split a code point.

/// Byte offset of the first occurrence of `needle` in `haystack`, compared
/// ASCII case-insensitively. Keyword tables are ASCII, so this is exact
/// while leaving non-ASCII text (°C, en dashes) untouched.
pub fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    (0..=hay.len() - pat.len())
        .find(|&i| haystack.is_char_boundary(i) && hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// Case-insensitive containment check over ASCII keywords.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    find_ignore_ascii_case(haystack, needle).is_some()
}

/// Largest char boundary at or below `idx`.
fn floor_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Smallest char boundary at or above `idx`.
fn ceil_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Context window around a byte offset: up to `before` bytes to the left
/// and `after` bytes to the right, clamped to char boundaries.
pub fn snippet_around(text: &str, idx: usize, before: usize, after: usize) -> &str {
    let start = floor_boundary(text, idx.saturating_sub(before));
    let end = ceil_boundary(text, idx.saturating_add(after).min(text.len()));
    &text[start..end]
}

/// First `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Title-case each word: "long-term" -> "Long-Term". Used for study
/// labels built from matched keywords.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_keyword_regardless_of_case() {
        assert_eq!(find_ignore_ascii_case("The ACCELERATED study", "accelerated"), Some(4));
        assert_eq!(find_ignore_ascii_case("no match here", "stress"), None);
    }

    #[test]
    fn find_handles_non_ascii_haystack() {
        let text = "stored at 25°C under accelerated conditions";
        let idx = find_ignore_ascii_case(text, "accelerated").unwrap();
        assert_eq!(&text[idx..idx + 11], "accelerated");
    }

    #[test]
    fn snippet_clamps_to_text_bounds() {
        let text = "short";
        assert_eq!(snippet_around(text, 2, 100, 200), "short");
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let text = "température 25°C élevée";
        // An offset landing inside a multi-byte char must not panic.
        for idx in 0..text.len() {
            let _ = snippet_around(text, idx, 3, 3);
        }
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("°°°°", 2), "°°");
    }

    #[test]
    fn title_case_matches_python_title_semantics() {
        assert_eq!(title_case("long-term"), "Long-Term");
        assert_eq!(title_case("long term"), "Long Term");
        assert_eq!(title_case("photostability"), "Photostability");
    }
}
