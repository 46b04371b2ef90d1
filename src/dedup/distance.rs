//! Edit distance between names.

/// Levenshtein distance over Unicode scalar values, unit cost for insert,
/// delete, and substitute.
///
/// Case-sensitive. Callers lowercase both sides first.
pub fn distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Length of a name in characters, the unit used by the typo length floor.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
