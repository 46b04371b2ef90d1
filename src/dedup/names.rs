//! Name normalization and token-level comparison.
//!
//! Professor names arrive hand-typed from several places: course exports that
//! append a language or section tag ("Aitbayeva Asel - CHIN"), students who
//! write "Smith John" instead of "John Smith", and stray whitespace. The
//! functions here reduce that noise without touching case, which callers
//! handle explicitly at comparison time.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A trailing tag: a dash (spaced or glued), 2-5 letters, then optionally
/// more text. The greedy prefix makes this match the last qualifying dash.
///
/// A hyphenated surname followed by another word ("Abu-Lail Nehal") has the
/// same shape and is cut at the hyphen as well.
static TRAILING_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*\S)\s*[-\u{2010}-\u{2015}]\s*\p{Alphabetic}{2,5}(?:\s+.*)?$").unwrap()
});

/// Collapse runs of whitespace into single spaces and trim.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip trailing tags until none remain.
fn strip_trailing_tags(s: &str) -> String {
    let mut current = s.to_owned();
    while let Some(prefix) = TRAILING_TAG_RE
        .captures(&current)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
    {
        current = prefix;
    }
    current
}

/// Canonical comparison form of a name.
///
/// Pipeline: NFC compose -> strip trailing language/course tags -> collapse
/// whitespace -> trim. Case is preserved.
///
/// # Examples
///
/// ```
/// use profmerge::dedup::names::normalize;
///
/// assert_eq!(normalize("Aitbayeva Asel - CHIN"), "Aitbayeva Asel");
/// assert_eq!(normalize("  John   Smith "), "John Smith");
/// assert_eq!(normalize("Ivanova Marina-EN"), "Ivanova Marina");
/// ```
pub fn normalize(name: &str) -> String {
    let composed: String = name.nfc().collect();
    collapse_whitespace(&strip_trailing_tags(&composed))
}

/// Lowercase alphanumeric tokens, in original order.
///
/// Everything other than letters, digits, and whitespace is dropped before
/// splitting, so "O'Brien" becomes `obrien`.
pub fn tokenize(name: &str) -> Vec<String> {
    let cleaned: String = name
        .nfc()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Sorted, space-joined token form; equal for any reordering of the same words.
fn sorted_token_key(name: &str) -> String {
    let mut tokens = tokenize(name);
    tokens.sort_unstable();
    tokens.join(" ")
}

/// True when both names carry the same words in any order.
///
/// Two names without any tokens never match.
///
/// ```
/// use profmerge::dedup::names::words_swapped;
///
/// assert!(words_swapped("John Smith", "Smith John"));
/// assert!(!words_swapped("", ""));
/// ```
pub fn words_swapped(a: &str, b: &str) -> bool {
    let key_a = sorted_token_key(a);
    !key_a.is_empty() && key_a == sorted_token_key(b)
}

/// True when every token of `a` occurs somewhere in `b` (multiplicity ignored).
///
/// A name with no tokens is trivially a subset; callers gate on token count.
pub fn is_subset(a: &str, b: &str) -> bool {
    let haystack: HashSet<String> = tokenize(b).into_iter().collect();
    tokenize(a).iter().all(|t| haystack.contains(t))
}

/// True when `needle` occurs in `haystack` aligned to word boundaries on both
/// ends. Both inputs are expected lowercased already.
pub(crate) fn contains_on_word_boundary(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.char_indices().any(|(start, _)| {
        if !haystack[start..].starts_with(needle) {
            return false;
        }
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
