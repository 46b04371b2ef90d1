//! Pairwise match classification.
//!
//! Comparison runs an ordered cascade of pure rules; the first rule that fires
//! decides the pair. The cascade is the [`PAIR_RULES`] table, so its priority
//! order is data rather than control flow. Roster mode adds one set-level
//! rule on top ([`match_against_roster`]): a multi-word name that is a token
//! subset of exactly one roster entry.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::distance::{char_len, distance};
use super::models::{MatchReason, MatchVerdict, Side};
use super::names::{contains_on_word_boundary, is_subset, normalize, tokenize, words_swapped};

/// Tunable thresholds for matching and planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Case-insensitive substrings that mark a placeholder record (self-merge).
    pub placeholder_patterns: Vec<String>,
    /// Largest edit distance still treated as a typo.
    pub typo_max_distance: usize,
    /// The longer name must exceed this many characters for a typo match.
    pub typo_min_length: usize,
    /// Minimum tokens in a name before the roster subset rule applies.
    pub partial_min_tokens: usize,
    /// Minimum tokens in the contained name before containment applies.
    pub containment_min_tokens: usize,
    /// Only count containment that starts and ends on word boundaries.
    pub containment_word_boundary: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            placeholder_patterns: vec!["vacancy".to_owned()],
            typo_max_distance: 2,
            typo_min_length: 5,
            partial_min_tokens: 2,
            containment_min_tokens: 1,
            containment_word_boundary: false,
        }
    }
}

/// A name with its derived comparison forms computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedName<'a> {
    pub raw: &'a str,
    pub normalized: String,
    /// Lowercased normalized form.
    pub folded: String,
    raw_folded: String,
    pub token_count: usize,
}

impl<'a> PreparedName<'a> {
    pub fn new(raw: &'a str) -> Self {
        let normalized = normalize(raw);
        let folded = normalized.to_lowercase();
        let token_count = tokenize(&normalized).len();
        Self {
            raw,
            raw_folded: raw.to_lowercase(),
            normalized,
            folded,
            token_count,
        }
    }

    /// Length in characters of the normalized form.
    pub fn len(&self) -> usize {
        char_len(&self.normalized)
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

type RuleCheck = fn(&PreparedName<'_>, &PreparedName<'_>, &MatchConfig) -> Option<MatchReason>;

/// One step of the cascade.
pub struct Rule {
    pub name: &'static str,
    check: RuleCheck,
}

impl Rule {
    pub fn apply(
        &self,
        left: &PreparedName<'_>,
        right: &PreparedName<'_>,
        config: &MatchConfig,
    ) -> Option<MatchReason> {
        (self.check)(left, right, config)
    }
}

/// Pairwise rules in priority order.
pub const PAIR_RULES: &[Rule] = &[
    Rule {
        name: "exact_normalized",
        check: exact_normalized,
    },
    Rule {
        name: "case_insensitive_exact",
        check: case_insensitive_exact,
    },
    Rule {
        name: "contains_extra_words",
        check: contains_extra_words,
    },
    Rule {
        name: "swapped_words",
        check: swapped_words,
    },
    Rule {
        name: "typo",
        check: typo,
    },
];

fn exact_normalized(
    left: &PreparedName<'_>,
    right: &PreparedName<'_>,
    _config: &MatchConfig,
) -> Option<MatchReason> {
    (!left.is_empty() && left.normalized == right.normalized)
        .then_some(MatchReason::ExactNormalized)
}

fn case_insensitive_exact(
    left: &PreparedName<'_>,
    right: &PreparedName<'_>,
    _config: &MatchConfig,
) -> Option<MatchReason> {
    if left.is_empty() || right.is_empty() {
        return None;
    }
    (left.raw_folded == right.raw_folded || left.folded == right.folded)
        .then_some(MatchReason::CaseInsensitiveExact)
}

fn contains_extra_words(
    left: &PreparedName<'_>,
    right: &PreparedName<'_>,
    config: &MatchConfig,
) -> Option<MatchReason> {
    let (shorter, longer, longer_side) = match left.len().cmp(&right.len()) {
        std::cmp::Ordering::Less => (left, right, Side::Right),
        std::cmp::Ordering::Greater => (right, left, Side::Left),
        std::cmp::Ordering::Equal => return None,
    };
    if shorter.token_count < config.containment_min_tokens.max(1) {
        return None;
    }
    let contained = if config.containment_word_boundary {
        contains_on_word_boundary(&longer.folded, &shorter.folded)
    } else {
        longer.folded.contains(shorter.folded.as_str())
    };
    contained.then_some(
        MatchReason::ContainsExtraWords {
            longer: longer_side,
        },
    )
}

fn swapped_words(
    left: &PreparedName<'_>,
    right: &PreparedName<'_>,
    _config: &MatchConfig,
) -> Option<MatchReason> {
    words_swapped(&left.normalized, &right.normalized).then_some(MatchReason::SwappedWords)
}

fn typo(
    left: &PreparedName<'_>,
    right: &PreparedName<'_>,
    config: &MatchConfig,
) -> Option<MatchReason> {
    if left.len().max(right.len()) <= config.typo_min_length {
        return None;
    }
    let d = distance(&left.folded, &right.folded);
    (d <= config.typo_max_distance).then_some(MatchReason::Typo { distance: d })
}

/// Run the pairwise cascade. `None` means no match.
pub fn classify_pair(
    left: &PreparedName<'_>,
    right: &PreparedName<'_>,
    config: &MatchConfig,
) -> Option<MatchVerdict> {
    PAIR_RULES.iter().find_map(|rule| {
        let reason = rule.apply(left, right, config)?;
        trace!(rule = rule.name, left = left.raw, right = right.raw, "rule fired");
        Some(MatchVerdict::from(reason))
    })
}

/// Convenience wrapper over [`classify_pair`] for raw strings.
///
/// ```
/// use profmerge::dedup::{MatchConfig, MatchReason, classify};
///
/// let verdict = classify("Jon Smith", "John Smith", &MatchConfig::default()).unwrap();
/// assert_eq!(verdict.reason, MatchReason::Typo { distance: 1 });
/// assert!(classify("Li", "Lu", &MatchConfig::default()).is_none());
/// ```
pub fn classify(left: &str, right: &str, config: &MatchConfig) -> Option<MatchVerdict> {
    classify_pair(&PreparedName::new(left), &PreparedName::new(right), config)
}

/// Result of comparing one name against a whole roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterMatch {
    Matched { index: usize, verdict: MatchVerdict },
    /// Several roster entries qualify at the deciding tier (indices in roster order).
    Ambiguous { candidates: Vec<usize> },
    NoMatch,
}

/// Pick the single roster entry a name refers to, if one is clear.
///
/// Tiers, strongest first:
/// 1. A decisive pair verdict (exact, case-insensitive, swapped words) on any
///    entry wins immediately; first in roster order.
/// 2. Containment: must hold for exactly one entry, else ambiguous.
/// 3. Typo: lowest distance wins, ties go to the first entry seen.
/// 4. Token subset: with enough tokens, must hold for exactly one entry,
///    else ambiguous.
pub fn match_against_roster(
    name: &PreparedName<'_>,
    roster: &[PreparedName<'_>],
    config: &MatchConfig,
) -> RosterMatch {
    let mut containment: Vec<(usize, MatchReason)> = Vec::new();
    let mut best_typo: Option<(usize, usize)> = None;
    let mut subset: Vec<usize> = Vec::new();
    let subset_eligible = name.token_count >= config.partial_min_tokens.max(1);

    for (index, official) in roster.iter().enumerate() {
        if let Some(verdict) = classify_pair(name, official, config) {
            match verdict.reason {
                reason if reason.is_decisive() => {
                    return RosterMatch::Matched { index, verdict };
                }
                reason @ MatchReason::ContainsExtraWords { .. } => {
                    containment.push((index, reason));
                }
                MatchReason::Typo { distance } => {
                    if best_typo.is_none_or(|(_, best)| distance < best) {
                        best_typo = Some((index, distance));
                    }
                }
                // Set-level only; the pair cascade never yields it.
                _ => {}
            }
        }

        if subset_eligible && is_subset(&name.normalized, &official.normalized) {
            subset.push(index);
        }
    }

    match containment.as_slice() {
        [] => {}
        [(index, reason)] => {
            return RosterMatch::Matched {
                index: *index,
                verdict: MatchVerdict::from(*reason),
            };
        }
        many => {
            return RosterMatch::Ambiguous {
                candidates: many.iter().map(|(i, _)| *i).collect(),
            };
        }
    }

    if let Some((index, distance)) = best_typo {
        return RosterMatch::Matched {
            index,
            verdict: MatchVerdict::from(MatchReason::Typo { distance }),
        };
    }

    match subset.as_slice() {
        [] => RosterMatch::NoMatch,
        [index] => RosterMatch::Matched {
            index: *index,
            verdict: MatchVerdict::from(MatchReason::UnambiguousPartial),
        },
        _ => RosterMatch::Ambiguous { candidates: subset },
    }
}
