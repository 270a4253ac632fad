//! Text canonicalization for answer comparison.

use unicode_normalization::UnicodeNormalization;

/// Characters replaced by a space before comparison.
const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '“', '”', '‘', '’', '(', ')', '[', ']', '{', '}',
    '<', '>', '«', '»', '_', '-',
];

/// Lowercase, blank out punctuation, collapse whitespace and trim.
pub fn normalize(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical decomposition with combining diacritics (U+0300..=U+036F) removed.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_diacritic(*c)).collect()
}

/// [`normalize`] followed by [`strip_diacritics`].
pub fn normalize_no_diacritics(text: &str) -> String {
    strip_diacritics(&normalize(text))
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}
