//! Turns pairwise verdicts into a conflict-free action plan.
//!
//! Two strategies:
//!
//! - [`plan_self_merge`]: dedupe one list against itself. Shorter names are
//!   preferred as primaries; every other record is folded into at most one.
//! - [`plan_roster`]: reconcile a list against an authoritative roster,
//!   renaming records in place or merging them into the record that already
//!   holds the canonical name.
//!
//! Both are pure: the returned [`Plan`] is the only effect. Nothing is applied.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use super::classifier::{MatchConfig, PreparedName, RosterMatch, classify_pair, match_against_roster};
use super::errors::InputError;
use super::models::{
    Action, MatchReason, MatchVerdict, NameRecord, Plan, RecordId, Side, SkipReason,
};

/// Reject input that would make the plan unsafe to apply.
///
/// Ids must be non-empty and unique; anything else aborts the run.
pub fn validate(records: &[NameRecord]) -> Result<(), InputError> {
    let mut seen: HashMap<&RecordId, usize> = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if record.id.is_empty() {
            return Err(InputError::MissingId { index });
        }
        if let Some(&first) = seen.get(&record.id) {
            return Err(InputError::DuplicateId {
                id: record.id.clone(),
                first,
                second: index,
            });
        }
        seen.insert(&record.id, index);
    }
    Ok(())
}

fn self_merge_reason(reason: MatchReason) -> String {
    match reason {
        MatchReason::ContainsExtraWords { longer: Side::Right } => {
            "duplicate has extra words/suffix".to_owned()
        }
        MatchReason::ContainsExtraWords { longer: Side::Left } => {
            "primary has extra words/suffix".to_owned()
        }
        other => other.to_string(),
    }
}

fn roster_reason(reason: MatchReason) -> String {
    match reason {
        MatchReason::ContainsExtraWords { longer: Side::Right } => {
            "roster name has extra words".to_owned()
        }
        MatchReason::ContainsExtraWords { longer: Side::Left } => {
            "database name has extra words/suffix".to_owned()
        }
        other => other.to_string(),
    }
}

/// The first configured placeholder pattern contained in `name`, if any.
fn placeholder_match<'c>(name: &str, patterns: &'c [String]) -> Option<&'c str> {
    let folded = name.to_lowercase();
    patterns
        .iter()
        .map(String::as_str)
        .find(|p| !p.is_empty() && folded.contains(p))
}

/// Deduplicate a single list against itself.
///
/// 1. Records whose name contains a placeholder pattern become `Delete`
///    actions and take no further part.
/// 2. The rest are stably sorted by normalized length, shortest first.
/// 3. Each unconsumed record, in that order, acts as a primary and absorbs
///    every later unconsumed record that the classifier matches against it.
///
/// A record is consumed at most once, so no id is the source of two actions.
pub fn plan_self_merge(records: &[NameRecord], config: &MatchConfig) -> Result<Plan, InputError> {
    validate(records)?;

    let patterns: Vec<String> = config
        .placeholder_patterns
        .iter()
        .map(|p| p.to_lowercase())
        .collect();

    let mut plan = Plan::default();
    plan.stats.total = records.len();

    let mut candidates: Vec<(&NameRecord, PreparedName<'_>)> = Vec::with_capacity(records.len());
    for record in records {
        if let Some(pattern) = placeholder_match(&record.name, &patterns) {
            debug!(id = %record.id, name = %record.name, pattern, "Placeholder record");
            plan.push_action(Action::delete(
                record,
                format!("placeholder record (matches \"{pattern}\")"),
            ));
            continue;
        }
        candidates.push((record, PreparedName::new(&record.name)));
    }

    candidates.sort_by_key(|(_, name)| name.len());

    let mut consumed: HashSet<&RecordId> = HashSet::new();
    for (i, (primary, primary_name)) in candidates.iter().enumerate() {
        if consumed.contains(&primary.id) {
            continue;
        }
        for (duplicate, duplicate_name) in &candidates[i + 1..] {
            if consumed.contains(&duplicate.id) {
                continue;
            }
            let Some(verdict) = classify_pair(primary_name, duplicate_name, config) else {
                continue;
            };
            consumed.insert(&duplicate.id);
            let reason = self_merge_reason(verdict.reason);
            debug!(
                primary_id = %primary.id,
                primary = %primary.name,
                duplicate_id = %duplicate.id,
                duplicate = %duplicate.name,
                %reason,
                "Merging duplicate"
            );
            plan.push_action(Action::merge(
                duplicate,
                &primary.id,
                &primary.name,
                verdict,
                reason,
            ));
        }
    }

    info!(
        total = plan.stats.total,
        merges = plan.stats.merges,
        deletes = plan.stats.deletes,
        "Self-merge plan complete"
    );

    Ok(plan)
}

/// Emit a `Merge` into the record already holding `canonical`, or a `Rename`
/// when no other record holds it yet.
///
/// A renamed record takes over the canonical name, so later records resolving
/// to the same name merge into it instead of producing a second copy.
fn resolve<'r>(
    plan: &mut Plan,
    record: &'r NameRecord,
    canonical: &'r str,
    verdict: MatchVerdict,
    holders: &mut HashMap<&'r str, &'r RecordId>,
) {
    let reason = roster_reason(verdict.reason);
    let existing = holders
        .get(canonical)
        .copied()
        .filter(|id| *id != &record.id);
    match existing {
        Some(existing) => {
            debug!(
                id = %record.id,
                name = %record.name,
                into = %existing,
                canonical,
                %reason,
                "Merging into canonical record"
            );
            plan.push_action(Action::merge(record, existing, canonical, verdict, reason));
        }
        None => {
            debug!(id = %record.id, name = %record.name, canonical, %reason, "Renaming record");
            plan.push_action(Action::rename(record, canonical, verdict, reason));
            holders.insert(canonical, &record.id);
        }
    }
}

/// Reconcile records against an authoritative roster.
///
/// Per record, in input order:
/// 1. Name present verbatim in the roster: clean, no action.
/// 2. Case-insensitive roster hit: resolve to the roster's spelling.
/// 3. Otherwise the classifier picks at most one roster entry
///    ([`match_against_roster`]); ambiguity and no-match are recorded in
///    [`Plan::skipped`], never guessed.
pub fn plan_roster<S: AsRef<str>>(
    records: &[NameRecord],
    roster: &[S],
    config: &MatchConfig,
) -> Result<Plan, InputError> {
    validate(records)?;

    let roster: Vec<&str> = roster.iter().map(|s| s.as_ref()).collect();
    let verbatim: HashSet<&str> = roster.iter().copied().collect();

    // First spelling wins when the roster repeats a name in different case.
    let mut by_folded: HashMap<String, &str> = HashMap::with_capacity(roster.len());
    for &name in &roster {
        by_folded.entry(name.to_lowercase()).or_insert(name);
    }

    let prepared: Vec<PreparedName<'_>> = roster.iter().map(|n| PreparedName::new(n)).collect();

    let mut holders: HashMap<&str, &RecordId> = HashMap::with_capacity(records.len());
    for record in records {
        holders.entry(record.name.as_str()).or_insert(&record.id);
    }

    let mut plan = Plan::default();
    plan.stats.total = records.len();

    for record in records {
        if verbatim.contains(record.name.as_str()) {
            plan.push_skipped(record, SkipReason::Clean);
            continue;
        }

        if let Some(&canonical) = by_folded.get(&record.name.to_lowercase()) {
            let verdict = MatchVerdict::from(MatchReason::CaseInsensitiveExact);
            resolve(&mut plan, record, canonical, verdict, &mut holders);
            continue;
        }

        match match_against_roster(&PreparedName::new(&record.name), &prepared, config) {
            RosterMatch::Matched { index, verdict } => {
                resolve(&mut plan, record, roster[index], verdict, &mut holders);
            }
            RosterMatch::Ambiguous { candidates } => {
                let candidates: Vec<String> =
                    candidates.iter().map(|&i| roster[i].to_owned()).collect();
                warn!(
                    id = %record.id,
                    name = %record.name,
                    ?candidates,
                    "Ambiguous roster match, leaving for manual review"
                );
                plan.push_skipped(record, SkipReason::Ambiguous { candidates });
            }
            RosterMatch::NoMatch => {
                debug!(id = %record.id, name = %record.name, "No confident roster match");
                plan.push_skipped(record, SkipReason::NoConfidentMatch);
            }
        }
    }

    info!(
        total = plan.stats.total,
        merges = plan.stats.merges,
        renames = plan.stats.renames,
        clean = plan.stats.clean,
        ambiguous = plan.stats.ambiguous,
        unmatched = plan.stats.unmatched,
        "Roster reconciliation plan complete"
    );

    Ok(plan)
}
